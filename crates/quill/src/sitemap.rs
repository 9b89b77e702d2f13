//! `sitemap.xml` generation for built sites.
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::BuildError;

/// Options for sitemap generation.
#[derive(Debug, Clone)]
pub struct SitemapOptions {
    /// Whether to generate a sitemap. Only takes effect when a base URL is set, since sitemap locations must be absolute. Default: `true`
    pub enabled: bool,
    /// Default: `"sitemap.xml"`
    pub filename: String,
    /// Change frequency written for every entry. Default: `None`
    ///
    /// Note that changefreq is often ignored by search engines nowadays.
    pub changefreq: Option<ChangeFreq>,
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            filename: "sitemap.xml".to_string(),
            changefreq: None,
        }
    }
}

/// See <https://www.sitemaps.org/protocol.html#changefreqdef>.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    fn as_str(&self) -> &str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

#[derive(Debug)]
pub struct SitemapEntry {
    pub loc: String,
    pub changefreq: Option<ChangeFreq>,
}

impl SitemapEntry {
    fn to_xml(&self) -> String {
        let mut xml = format!("<url><loc>{}</loc>", escape_xml(&self.loc));

        if let Some(changefreq) = self.changefreq {
            xml.push_str(&format!("<changefreq>{}</changefreq>", changefreq.as_str()));
        }

        xml.push_str("</url>");
        xml
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);

    for entry in entries {
        xml.push_str(&entry.to_xml());
    }

    xml.push_str("</urlset>");
    xml
}

/// Writes the sitemap for absolute `urls` into `output_dir`, sorted by location.
///
/// Returns `None` when generation is disabled or there is nothing to list.
pub fn generate_sitemap(
    urls: Vec<String>,
    output_dir: &Path,
    options: &SitemapOptions,
) -> Result<Option<PathBuf>, BuildError> {
    if !options.enabled || urls.is_empty() {
        return Ok(None);
    }

    let mut entries: Vec<SitemapEntry> = urls
        .into_iter()
        .map(|loc| SitemapEntry {
            loc,
            changefreq: options.changefreq,
        })
        .collect();
    entries.sort_by(|a, b| a.loc.cmp(&b.loc));

    let path = output_dir.join(&options.filename);
    fs::write(&path, render_sitemap(&entries)).map_err(|source| BuildError::WriteFailed {
        path: path.clone(),
        source,
    })?;

    log::info!(
        target: "sitemap",
        "Generated sitemap with {} URLs at {}",
        entries.len(),
        path.display()
    );

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml("https://example.com/?a=1&b=<2>"),
            "https://example.com/?a=1&amp;b=&lt;2&gt;"
        );
    }

    #[test]
    fn test_entry_with_changefreq() {
        let entry = SitemapEntry {
            loc: "https://example.com/blogs/".to_string(),
            changefreq: Some(ChangeFreq::Weekly),
        };

        assert_eq!(
            entry.to_xml(),
            "<url><loc>https://example.com/blogs/</loc><changefreq>weekly</changefreq></url>"
        );
    }

    #[test]
    fn test_generate_sitemap_sorts_entries() {
        let dir = tempdir().unwrap();
        let urls = vec![
            "https://example.com/blogs/b/".to_string(),
            "https://example.com/blogs".to_string(),
            "https://example.com/blogs/a/".to_string(),
        ];

        let path = generate_sitemap(urls, dir.path(), &SitemapOptions::default())
            .unwrap()
            .unwrap();
        let content = fs::read_to_string(path).unwrap();

        assert!(content.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        let index = content.find("/blogs</loc>").unwrap();
        let a = content.find("/blogs/a/</loc>").unwrap();
        let b = content.find("/blogs/b/</loc>").unwrap();
        assert!(index < a && a < b);
    }

    #[test]
    fn test_disabled_or_empty_sitemap_is_not_written() {
        let dir = tempdir().unwrap();
        let disabled = SitemapOptions {
            enabled: false,
            ..Default::default()
        };

        assert!(
            generate_sitemap(vec!["https://example.com/".into()], dir.path(), &disabled)
                .unwrap()
                .is_none()
        );
        assert!(
            generate_sitemap(vec![], dir.path(), &SitemapOptions::default())
                .unwrap()
                .is_none()
        );
        assert!(!dir.path().join("sitemap.xml").exists());
    }
}
