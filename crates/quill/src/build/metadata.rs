use std::{path::PathBuf, process::Termination, time::Instant};

/// Metadata returned by [`build_site()`](crate::build::build_site) for a single page.
#[derive(Debug)]
pub struct PageOutput {
    /// Name of the route the page was rendered for, e.g. `blogs.show`.
    pub route: String,
    pub url: String,
    pub file_path: PathBuf,
}

/// Metadata returned by [`build_site()`](crate::build::build_site) after a successful build.
#[derive(Debug)]
pub struct BuildOutput {
    pub start_time: Instant,
    pub pages: Vec<PageOutput>,
    pub sitemap: Option<PathBuf>,
}

impl BuildOutput {
    pub fn new(start_time: Instant) -> Self {
        Self {
            start_time,
            pages: Vec::new(),
            sitemap: None,
        }
    }

    pub(crate) fn add_page(&mut self, route: &str, url: String, file_path: PathBuf) {
        self.pages.push(PageOutput {
            route: route.to_string(),
            url,
            file_path,
        });
    }

    pub fn pages_for<'a>(&'a self, route: &'a str) -> impl Iterator<Item = &'a PageOutput> {
        self.pages.iter().filter(move |page| page.route == route)
    }
}

impl Default for BuildOutput {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Termination for BuildOutput {
    fn report(self) -> std::process::ExitCode {
        0.into()
    }
}
