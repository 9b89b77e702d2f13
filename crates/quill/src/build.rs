use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Instant,
};

use colored::Colorize;
use log::{info, warn};
use rayon::prelude::*;

use crate::{
    errors::{BuildError, QuillError},
    logging::{FormatElapsedTimeOptions, format_elapsed_time, print_title},
    routes::{BLOGS_INDEX, BLOGS_SHOW, RouteParams, RouteTable},
    shell::PageShell,
    sitemap::generate_sitemap,
    store::BlogStore,
    views::{blog_index_page, blog_show_page, not_found_page, redirect_page},
};

pub mod metadata;
pub mod options;

pub use metadata::{BuildOutput, PageOutput};
pub use options::SiteOptions;

pub const NOT_FOUND_FILE: &str = "404.html";

/// Renders every page of the blog into [`SiteOptions::output_dir`].
///
/// Writes the listing, a root `index.html` redirecting to it, one detail page per post, a `404.html` page and, when `routes` has a base URL, a sitemap.
pub fn build_site(
    store: &dyn BlogStore,
    routes: &RouteTable,
    shell: &dyn PageShell,
    options: &SiteOptions,
) -> Result<BuildOutput, QuillError> {
    let build_start = Instant::now();
    let mut build_metadata = BuildOutput::new(build_start);
    let output_dir = &options.output_dir;

    if options.clean_output_dir && output_dir.exists() {
        fs::remove_dir_all(output_dir).map_err(|source| BuildError::CleanFailed {
            path: output_dir.clone(),
            source,
        })?;
    }
    fs::create_dir_all(output_dir)?;

    info!(target: "build", "Output directory: {}", output_dir.display());

    print_title("generating pages");
    let pages_start = Instant::now();
    let page_format_options = FormatElapsedTimeOptions::page();

    let summaries = store.summaries();
    if summaries.is_empty() {
        warn!(target: "build", "No blog posts found, the listing will be empty");
    }

    let page_start = Instant::now();
    let index_params = RouteParams::default();
    let index_url = routes.url(BLOGS_INDEX, &index_params)?;
    let index_path = routes.file_path(BLOGS_INDEX, &index_params, output_dir)?;
    let index = blog_index_page(&summaries, routes, shell)?;
    write_page(index.into_string().as_bytes(), &index_path)?;
    log_page(&index_url, &index_path, page_start, &page_format_options);

    // Static hosts serve the root directly, send it to the listing
    let root_path = output_dir.join("index.html");
    if index_path != root_path {
        write_page(redirect_page(&index_url).into_string().as_bytes(), &root_path)?;
        info!(target: "pages", "/ -> {} {}", root_path.to_string_lossy().dimmed(), "(redirect)".dimmed());
    }

    build_metadata.add_page(BLOGS_INDEX, index_url, index_path);

    // Posts are independent of each other, render them in parallel
    let detail_pages = summaries
        .par_iter()
        .map(|summary| -> Result<(String, PathBuf), QuillError> {
            let page_start = Instant::now();
            let post = store.find(summary.id.as_str())?;
            let params = routes.params_for(BLOGS_SHOW, &post.id)?;
            let url = routes.url(BLOGS_SHOW, &params)?;
            let file_path = routes.file_path(BLOGS_SHOW, &params, output_dir)?;

            write_page(blog_show_page(post, shell).into_string().as_bytes(), &file_path)?;
            log_page(&url, &file_path, page_start, &page_format_options);

            Ok((url, file_path))
        })
        .collect::<Result<Vec<_>, QuillError>>()?;

    for (url, file_path) in detail_pages {
        build_metadata.add_page(BLOGS_SHOW, url, file_path);
    }

    let not_found_path = output_dir.join(NOT_FOUND_FILE);
    write_page(
        not_found_page(None, routes, shell)?.into_string().as_bytes(),
        &not_found_path,
    )?;

    info!(target: "pages", "{}", format!("generated {} pages in {}", build_metadata.pages.len(), format_elapsed_time(pages_start.elapsed(), &FormatElapsedTimeOptions::default())).bold());

    if routes.base_url().is_some() {
        let urls = build_metadata
            .pages
            .iter()
            .map(|page| page.url.clone())
            .collect();
        build_metadata.sitemap = generate_sitemap(urls, output_dir, &options.sitemap)?;
    } else if options.sitemap.enabled {
        info!(target: "sitemap", "{}", "No base URL set, skipping sitemap".dimmed());
    }

    info!(target: "SKIP_FORMAT", "{}", "");
    info!(target: "build", "{}", format!("Build completed in {}", format_elapsed_time(build_start.elapsed(), &FormatElapsedTimeOptions::default())).bold());

    Ok(build_metadata)
}

fn log_page(url: &str, file_path: &Path, start: Instant, options: &FormatElapsedTimeOptions) {
    info!(target: "pages", "{} -> {} {}", url, file_path.to_string_lossy().dimmed(), format_elapsed_time(start.elapsed(), options));
}

fn write_page(content: &[u8], file_path: &PathBuf) -> Result<(), BuildError> {
    let write = || -> Result<(), io::Error> {
        if let Some(parent_dir) = file_path.parent() {
            fs::create_dir_all(parent_dir)?;
        }
        fs::write(file_path, content)
    };

    write().map_err(|source| BuildError::WriteFailed {
        path: file_path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlogId, BlogPost};
    use crate::shell::AppLayout;
    use crate::store::MemoryStore;
    use tempfile::tempdir;

    fn store() -> MemoryStore {
        MemoryStore::try_from(vec![
            BlogPost::new(BlogId::new("1").unwrap(), "Hello", "World"),
            BlogPost::new(BlogId::new("second").unwrap(), "Again", "<i>plain</i>"),
        ])
        .unwrap()
    }

    fn options(output_dir: &Path) -> SiteOptions {
        SiteOptions {
            output_dir: output_dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_writes_every_page() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("dist");
        let layout = AppLayout::new("My Blogs", "/blogs");

        let output =
            build_site(&store(), &RouteTable::blogs(), &layout, &options(&output_dir)).unwrap();

        assert_eq!(output.pages.len(), 3);
        assert_eq!(output.pages_for(BLOGS_SHOW).count(), 2);
        assert!(output.sitemap.is_none());

        let index = fs::read_to_string(output_dir.join("blogs/index.html")).unwrap();
        assert!(index.contains(r#"href="/blogs/1/">Hello</a>"#));
        assert!(index.contains(r#"href="/blogs/second/">Again</a>"#));

        let detail = fs::read_to_string(output_dir.join("blogs/second/index.html")).unwrap();
        assert!(detail.contains(">Again</h2>"));
        assert!(detail.contains("&lt;i&gt;plain&lt;/i&gt;"));

        let not_found = fs::read_to_string(output_dir.join(NOT_FOUND_FILE)).unwrap();
        assert!(not_found.contains("Post not found"));

        let root = fs::read_to_string(output_dir.join("index.html")).unwrap();
        assert!(root.contains(r#"content="0; url=/blogs""#));
    }

    #[test]
    fn test_build_with_base_url_writes_sitemap() {
        let dir = tempdir().unwrap();
        let routes = RouteTable::blogs().with_base_url(Some("https://example.com".into()));
        let layout = AppLayout::new("My Blogs", "/blogs");

        let output = build_site(&store(), &routes, &layout, &options(dir.path())).unwrap();

        let root = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(root.contains(r#"content="0; url=https://example.com/blogs""#));

        let sitemap = fs::read_to_string(output.sitemap.unwrap()).unwrap();
        assert!(!sitemap.contains("<loc>https://example.com/</loc>"));
        assert!(sitemap.contains("<loc>https://example.com/blogs</loc>"));
        assert!(sitemap.contains("<loc>https://example.com/blogs/1/</loc>"));
        assert!(sitemap.contains("<loc>https://example.com/blogs/second/</loc>"));
    }

    #[test]
    fn test_build_cleans_output_dir() {
        let dir = tempdir().unwrap();
        let stale = dir.path().join("blogs/deleted/index.html");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let layout = AppLayout::new("My Blogs", "/blogs");
        build_site(&store(), &RouteTable::blogs(), &layout, &options(dir.path())).unwrap();

        assert!(!stale.exists());
    }

    #[test]
    fn test_build_empty_store() {
        let dir = tempdir().unwrap();
        let layout = AppLayout::new("My Blogs", "/blogs");

        let output = build_site(
            &MemoryStore::new(),
            &RouteTable::blogs(),
            &layout,
            &options(dir.path()),
        )
        .unwrap();

        assert_eq!(output.pages.len(), 1);
        let index = fs::read_to_string(dir.path().join("blogs/index.html")).unwrap();
        assert!(index.contains("<ul></ul>"));
    }
}
