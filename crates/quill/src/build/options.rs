use std::{env, path::PathBuf};

use glob::Pattern;

use crate::sitemap::SitemapOptions;

/// Quill site options. Should be passed to [`publish()`](crate::publish()) or [`build_site()`](crate::build::build_site()).
///
/// ## Examples
/// Default values:
/// ```rust
/// use quill::SiteOptions;
///
/// let options = SiteOptions::default();
/// assert_eq!(options.output_dir, std::path::PathBuf::from("dist"));
/// ```
/// Custom values:
/// ```rust
/// use quill::SiteOptions;
///
/// let options = SiteOptions {
///     site_name: "Field notes".into(),
///     base_url: Some("https://example.com".into()),
///     content_dir: "posts".into(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct SiteOptions {
    /// Name shown in the navigation bar and in document titles.
    pub site_name: String,

    /// Base URL for the site, e.g. `https://example.com`. Links stay relative when unset; the sitemap requires it.
    pub base_url: Option<String>,

    /// Directory holding the post files.
    pub content_dir: PathBuf,

    pub output_dir: PathBuf,

    /// Whether to remove the output directory before building, so that deleted posts don't linger.
    pub clean_output_dir: bool,

    pub sitemap: SitemapOptions,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            site_name: "My Blogs".to_string(),
            base_url: None,
            content_dir: "content/blogs".into(),
            output_dir: "dist".into(),
            clean_output_dir: true,
            sitemap: SitemapOptions::default(),
        }
    }
}

impl SiteOptions {
    /// Defaults overridden by `QUILL_BASE_URL`, `QUILL_CONTENT_DIR` and `QUILL_OUTPUT_DIR`.
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Ok(base_url) = env::var("QUILL_BASE_URL") {
            options.base_url = Some(base_url).filter(|url| !url.is_empty());
        }
        if let Ok(content_dir) = env::var("QUILL_CONTENT_DIR") {
            options.content_dir = content_dir.into();
        }
        if let Ok(output_dir) = env::var("QUILL_OUTPUT_DIR") {
            options.output_dir = output_dir.into();
        }

        options
    }

    /// Glob pattern matching every file in [`content_dir`](Self::content_dir). Glob metacharacters in the directory name match literally.
    pub fn content_pattern(&self) -> String {
        let content_dir = Pattern::escape(&self.content_dir.to_string_lossy());
        PathBuf::from(content_dir)
            .join("*")
            .to_string_lossy()
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized
        unsafe {
            env::remove_var("QUILL_BASE_URL");
            env::remove_var("QUILL_CONTENT_DIR");
            env::remove_var("QUILL_OUTPUT_DIR");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables_is_default() {
        clear_env();
        let options = SiteOptions::from_env();

        assert_eq!(options.base_url, None);
        assert_eq!(options.content_dir, PathBuf::from("content/blogs"));
        assert_eq!(options.output_dir, PathBuf::from("dist"));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("QUILL_BASE_URL", "https://example.com");
            env::set_var("QUILL_CONTENT_DIR", "posts");
            env::set_var("QUILL_OUTPUT_DIR", "public");
        }

        let options = SiteOptions::from_env();
        clear_env();

        assert_eq!(options.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(options.content_dir, PathBuf::from("posts"));
        assert_eq!(options.output_dir, PathBuf::from("public"));
    }

    #[test]
    #[serial]
    fn test_empty_base_url_is_ignored() {
        clear_env();
        unsafe { env::set_var("QUILL_BASE_URL", "") };

        let options = SiteOptions::from_env();
        clear_env();

        assert_eq!(options.base_url, None);
    }

    #[test]
    fn test_content_pattern() {
        let options = SiteOptions::default();

        assert_eq!(options.content_pattern(), "content/blogs/*");
    }

    #[test]
    fn test_content_pattern_escapes_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let content_dir = dir.path().join("posts [2024]");
        std::fs::create_dir_all(&content_dir).unwrap();
        std::fs::write(content_dir.join("a.md"), "---\ntitle: Alpha\n---\nfirst").unwrap();

        let options = SiteOptions {
            content_dir,
            ..Default::default()
        };
        let store = crate::store::load_posts(&options.content_pattern()).unwrap();

        assert_eq!(store.posts().len(), 1);
        assert_eq!(store.posts()[0].title, "Alpha");
    }
}
