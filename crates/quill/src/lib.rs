//! Server-rendered blog pages: a listing of every post and a detail page per post.
//!
//! Posts come from a [`BlogStore`](store::BlogStore), URLs from a [`RouteResolver`](routes::RouteResolver), and every page is composed inside a [`PageShell`](shell::PageShell).
//! The same views back both the static build ([`publish()`]) and the `quill serve` HTTP server.
//!
//! ## Example
//! ```rust
//! use quill::model::{BlogId, BlogPost};
//! use quill::routes::RouteTable;
//! use quill::shell::AppLayout;
//! use quill::views::blog_show_page;
//!
//! let post = BlogPost::new(BlogId::new("1").unwrap(), "Hello", "World");
//! let page = blog_show_page(&post, &AppLayout::new("My Blogs", "/blogs")).into_string();
//!
//! assert!(page.contains("World"));
//! ```

// Modules the end-user will interact directly or indirectly with
pub mod build;
pub mod errors;
pub mod model;
pub mod routes;
pub mod shell;
pub mod sitemap;
pub mod store;
pub mod views;

mod routing;

// Exports for end-users
pub use build::{BuildOutput, PageOutput, SiteOptions};
pub use logging::{FormatElapsedTimeOptions, format_elapsed_time};

// Internal modules
mod logging;

use build::build_site;
use errors::QuillError;
use log::info;
use logging::init_logging;
use routes::{BLOGS_INDEX, RouteResolver, RouteTable};
use shell::AppLayout;
use store::{BlogStore, load_posts};

/// The version of Quill being used.
///
/// Emitted as a generator meta tag by [`AppLayout`].
pub const GENERATOR: &str = concat!("Quill v", env!("CARGO_PKG_VERSION"));

/// The default layout for a site: [`AppLayout`] named after [`SiteOptions::site_name`], linking home to the listing.
pub fn default_layout(options: &SiteOptions, routes: &RouteTable) -> Result<AppLayout, QuillError> {
    Ok(AppLayout::new(
        options.site_name.clone(),
        routes.resolve_static(BLOGS_INDEX)?,
    ))
}

/// Quill entrypoint. Loads the posts in [`SiteOptions::content_dir`] and builds the site into [`SiteOptions::output_dir`].
///
/// ## Example
/// Should be called from the main function of a binary crate.
/// ```rust,no_run
/// use quill::{publish, BuildOutput, SiteOptions};
///
/// fn main() -> Result<BuildOutput, quill::errors::QuillError> {
///     publish(SiteOptions::from_env())
/// }
/// ```
pub fn publish(options: SiteOptions) -> Result<BuildOutput, QuillError> {
    init_logging();

    let store = load_posts(&options.content_pattern())?;
    info!(target: "content", "Loaded {} posts from {}", store.len(), options.content_dir.display());

    let routes = RouteTable::blogs().with_base_url(options.base_url.clone());
    let layout = default_layout(&options, &routes)?;

    build_site(&store, &routes, &layout, &options)
}
