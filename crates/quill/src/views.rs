//! Blog listing and detail views.
//!
//! The `render_*` functions produce the body fragment of a page, the `*_page` functions compose a fragment with its header inside a [`PageShell`].
//! Every value coming from a post goes through a maud splice, which HTML-escapes it.
//!
//! ## Example
//! ```rust
//! use quill::model::{BlogId, BlogPost};
//! use quill::routes::RouteTable;
//! use quill::views::render_blog_list;
//!
//! let post = BlogPost::new(BlogId::new("1").unwrap(), "Hello", "World");
//! let list = render_blog_list(&[post.summary()], &RouteTable::blogs()).unwrap();
//!
//! assert!(list.into_string().contains(r#"href="/blogs/1/">Hello</a>"#));
//! ```
use maud::{DOCTYPE, Markup, html};

use crate::errors::UrlError;
use crate::model::{BlogPost, BlogPostSummary};
use crate::routes::{BLOGS_INDEX, BLOGS_SHOW, RouteResolver};
use crate::shell::{PageShell, Slots};

pub const INDEX_HEADING: &str = "My Blogs";

fn page_heading(text: &str) -> Markup {
    html! {
        h2.font-semibold.text-xl.text-gray-800.leading-tight { (text) }
    }
}

fn card(content: Markup) -> Markup {
    html! {
        div.py-12 {
            div.max-w-7xl.mx-auto {
                div.bg-white.overflow-hidden.shadow-sm {
                    (content)
                }
            }
        }
    }
}

/// A list with one link per summary, in the given order, each pointing at the `blogs.show` route of its post.
pub fn render_blog_list(
    summaries: &[BlogPostSummary],
    routes: &dyn RouteResolver,
) -> Result<Markup, UrlError> {
    let items = summaries
        .iter()
        .map(|summary| {
            let href = routes.resolve(BLOGS_SHOW, &summary.id)?;

            Ok(html! {
                li {
                    a.text-blue-500 href=(href) { (summary.title) }
                }
            })
        })
        .collect::<Result<Vec<_>, UrlError>>()?;

    Ok(card(html! {
        div.p-6.text-gray-900 {
            ul {
                @for item in items {
                    (item)
                }
            }
        }
    }))
}

/// The content of a post as plain text.
pub fn render_blog_detail(post: &BlogPost) -> Markup {
    card(html! {
        p.text-lg.text-gray-700.leading-relaxed.p-6 { (post.content) }
    })
}

pub fn blog_index_page(
    summaries: &[BlogPostSummary],
    routes: &dyn RouteResolver,
    shell: &dyn PageShell,
) -> Result<Markup, UrlError> {
    let body = render_blog_list(summaries, routes)?;

    // The listing is the home page, so it keeps the bare site name as document title
    Ok(shell.render(Slots::new("", page_heading(INDEX_HEADING), body)))
}

pub fn blog_show_page(post: &BlogPost, shell: &dyn PageShell) -> Markup {
    shell.render(Slots::new(
        post.title.as_str(),
        page_heading(&post.title),
        render_blog_detail(post),
    ))
}

/// Page shown when no post matches `id`. `id` is whatever was requested and is not assumed to be a valid [`BlogId`](crate::model::BlogId).
pub fn not_found_page(
    id: Option<&str>,
    routes: &dyn RouteResolver,
    shell: &dyn PageShell,
) -> Result<Markup, UrlError> {
    let index_url = routes.resolve_static(BLOGS_INDEX)?;

    let body = card(html! {
        div.p-6.text-gray-900 {
            @if let Some(id) = id {
                p { "There is no blog post with id " code { (id) } "." }
            } @else {
                p { "This page does not exist." }
            }
            a.text-blue-500 href=(index_url) { "Back to all posts" }
        }
    });

    Ok(shell.render(Slots::new(
        "Not found",
        page_heading("Post not found"),
        body,
    )))
}

/// Standalone document sending the browser to `target`, for static hosts that can't redirect.
pub fn redirect_page(target: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta http-equiv="refresh" content=(format!("0; url={}", target));
                link rel="canonical" href=(target);
                title { "Redirecting" }
            }
            body {
                a href=(target) { "Continue to " (target) }
            }
        }
    }
}
