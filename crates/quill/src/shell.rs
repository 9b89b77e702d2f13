//! The page shell every view is rendered into.
//!
//! A shell receives already-rendered [`Markup`] for each named region, so anything a view interpolates has been escaped before it reaches the shell.
use maud::{DOCTYPE, Markup, html};

use crate::GENERATOR;

/// Named content regions of a page.
pub struct Slots {
    /// Document title, shown in the browser tab. May be empty.
    pub title: String,
    pub header: Markup,
    pub body: Markup,
}

impl Slots {
    pub fn new(title: impl Into<String>, header: Markup, body: Markup) -> Self {
        Self {
            title: title.into(),
            header,
            body,
        }
    }
}

pub trait PageShell: Send + Sync {
    fn render(&self, slots: Slots) -> Markup;
}

/// Default application layout: navigation bar, page header, main content and footer.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub site_name: String,
    /// Target of the site name link in the navigation bar.
    pub home_href: String,
    /// Whether to emit a `<meta name="generator">` tag.
    pub generator: bool,
}

impl AppLayout {
    pub fn new(site_name: impl Into<String>, home_href: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            home_href: home_href.into(),
            generator: true,
        }
    }

    fn document_title(&self, title: &str) -> String {
        if title.is_empty() {
            self.site_name.clone()
        } else {
            format!("{} | {}", title, self.site_name)
        }
    }
}

impl PageShell for AppLayout {
    fn render(&self, slots: Slots) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    @if self.generator {
                        meta name="generator" content=(GENERATOR);
                    }
                    title { (self.document_title(&slots.title)) }
                }
                body.font-sans.antialiased {
                    div.min-h-screen.bg-gray-100 {
                        nav.bg-white.border-b.border-gray-100 {
                            div.max-w-7xl.mx-auto.px-4 {
                                a.font-semibold href=(self.home_href) { (self.site_name) }
                            }
                        }
                        header.bg-white.shadow {
                            div.max-w-7xl.mx-auto.py-6.px-4 {
                                (slots.header)
                            }
                        }
                        main {
                            (slots.body)
                        }
                        footer {
                            p { "Powered by " (GENERATOR) }
                        }
                    }
                }
            }
        }
    }
}
