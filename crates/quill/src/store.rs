//! Where blog posts come from.
//!
//! Views only ever see what a [`BlogStore`] hands them: a list of summaries for the index, and a single post (or [`StoreError::NotFound`]) for a detail page.
//! [`load_posts`] fills a [`MemoryStore`] from a directory of post files.
//!
//! ## Post files
//! A post file is YAML frontmatter followed by the content of the post, which is kept as plain text:
//! ```text
//! ---
//! title: Hello
//! id: 1
//! ---
//! World
//! ```
//! `id` is optional and defaults to the slugified file name.
use std::path::{Path, PathBuf};

use glob::glob as glob_fs;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::errors::StoreError;
use crate::model::{BlogId, BlogPost, BlogPostSummary};

const POST_EXTENSIONS: [&str; 2] = ["md", "txt"];

pub trait BlogStore: Send + Sync {
    /// Summaries of every post, in display order.
    fn summaries(&self) -> Vec<BlogPostSummary>;

    fn find(&self, id: &str) -> Result<&BlogPost, StoreError>;

    fn len(&self) -> usize {
        self.summaries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Posts kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: Vec<BlogPost>,
    index: FxHashMap<BlogId, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, post: BlogPost) -> Result<(), StoreError> {
        if self.index.contains_key(&post.id) {
            return Err(StoreError::DuplicateId {
                id: post.id.to_string(),
            });
        }

        self.index.insert(post.id.clone(), self.posts.len());
        self.posts.push(post);

        Ok(())
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }
}

impl TryFrom<Vec<BlogPost>> for MemoryStore {
    type Error = StoreError;

    fn try_from(posts: Vec<BlogPost>) -> Result<Self, Self::Error> {
        let mut store = MemoryStore::new();
        for post in posts {
            store.insert(post)?;
        }
        Ok(store)
    }
}

impl BlogStore for MemoryStore {
    fn summaries(&self) -> Vec<BlogPostSummary> {
        self.posts.iter().map(BlogPostSummary::from).collect()
    }

    fn find(&self, id: &str) -> Result<&BlogPost, StoreError> {
        self.index
            .get(id)
            .map(|&position| &self.posts[position])
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn len(&self) -> usize {
        self.posts.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
struct PostFrontmatter {
    title: String,
    #[serde(default)]
    id: Option<RawId>,
}

/// Splits `---` delimited frontmatter from the rest of the file.
fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = raw.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != "---" {
        return None;
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if line.trim_end() == "---" {
            return Some((&raw[start..offset], &raw[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

/// Parses a single post file. `path` is used for the fallback id and error messages only.
pub fn parse_post(path: &Path, raw: &str) -> Result<BlogPost, StoreError> {
    let (frontmatter, content) =
        split_frontmatter(raw).ok_or_else(|| StoreError::MissingFrontmatter {
            path: path.to_path_buf(),
        })?;

    let frontmatter: PostFrontmatter =
        serde_yaml::from_str(frontmatter).map_err(|source| StoreError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;

    let id = match frontmatter.id {
        Some(RawId::Number(id)) => BlogId::try_from(id)?,
        Some(RawId::Text(id)) => BlogId::new(id)?,
        None => {
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy())
                .unwrap_or_default();
            BlogId::new(slug::slugify(stem))?
        }
    };

    Ok(BlogPost::new(
        id,
        frontmatter.title,
        content.trim_matches(|c| c == '\n' || c == '\r'),
    ))
}

/// Loads every post file matching `pattern`, in path order.
pub fn load_posts(pattern: &str) -> Result<MemoryStore, StoreError> {
    let paths = glob_fs(pattern).map_err(|source| StoreError::Glob {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut store = MemoryStore::new();

    for entry in paths {
        let path: PathBuf = entry.map_err(|err| StoreError::Read {
            path: err.path().to_path_buf(),
            source: err.into(),
        })?;

        if path.is_dir() {
            continue;
        }

        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| POST_EXTENSIONS.contains(&ext));

        if !supported {
            warn!(target: "content", "Skipping {}, only .md and .txt posts are supported", path.display());
            continue;
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;

        let post = parse_post(&path, &raw)?;
        debug!(target: "content", "loaded {} from {}", post.id, path.display());
        store.insert(post)?;
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn post(id: &str, title: &str) -> BlogPost {
        BlogPost::new(BlogId::new(id).unwrap(), title, "")
    }

    #[test]
    fn test_memory_store_keeps_insertion_order() {
        let store = MemoryStore::try_from(vec![post("2", "Two"), post("1", "One")]).unwrap();
        let titles: Vec<_> = store.summaries().into_iter().map(|s| s.title).collect();

        assert_eq!(titles, vec!["Two", "One"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_memory_store_rejects_duplicate_ids() {
        let result = MemoryStore::try_from(vec![post("1", "One"), post("1", "Again")]);

        assert!(matches!(result, Err(StoreError::DuplicateId { id }) if id == "1"));
    }

    #[test]
    fn test_find() {
        let store = MemoryStore::try_from(vec![post("1", "One")]).unwrap();

        assert_eq!(store.find("1").unwrap().title, "One");

        let err = store.find("404").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No blog post with id `404`");
    }

    #[test]
    fn test_parse_post() {
        let raw = "---\ntitle: Hello\nid: 1\n---\nWorld\n";
        let post = parse_post(Path::new("content/hello.md"), raw).unwrap();

        assert_eq!(post.id.as_str(), "1");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.content, "World");
    }

    #[test]
    fn test_parse_post_keeps_content_verbatim() {
        let raw = "---\r\ntitle: Hello\r\n---\r\n\r\n  indented <b>text</b>\r\n\r\nsecond paragraph\r\n";
        let post = parse_post(Path::new("hello.md"), raw).unwrap();

        assert_eq!(
            post.content,
            "  indented <b>text</b>\r\n\r\nsecond paragraph"
        );
    }

    #[test]
    fn test_parse_post_falls_back_to_file_name() {
        let raw = "---\ntitle: Hello\n---\nWorld";
        let post = parse_post(Path::new("content/My First Post.md"), raw).unwrap();

        assert_eq!(post.id.as_str(), "my-first-post");
    }

    #[test]
    fn test_parse_post_invalid_id() {
        let raw = "---\ntitle: Hello\nid: ../escape\n---\nWorld";

        assert!(matches!(
            parse_post(Path::new("hello.md"), raw),
            Err(StoreError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_parse_post_requires_frontmatter() {
        assert!(matches!(
            parse_post(Path::new("hello.md"), "just text"),
            Err(StoreError::MissingFrontmatter { .. })
        ));
        assert!(matches!(
            parse_post(Path::new("hello.md"), "---\ntitle: never closed\n"),
            Err(StoreError::MissingFrontmatter { .. })
        ));
    }

    #[test]
    fn test_parse_post_requires_title() {
        assert!(matches!(
            parse_post(Path::new("hello.md"), "---\nid: 1\n---\nWorld"),
            Err(StoreError::Frontmatter { .. })
        ));
    }

    #[test]
    fn test_load_posts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "---\ntitle: Bravo\n---\nsecond").unwrap();
        fs::write(dir.path().join("a.txt"), "---\ntitle: Alpha\n---\nfirst").unwrap();
        fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let store = load_posts(&pattern).unwrap();

        let ids: Vec<_> = store
            .summaries()
            .into_iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.find("b").unwrap().content, "second");
    }

    #[test]
    fn test_load_posts_reports_duplicates() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "---\ntitle: A\nid: same\n---\n").unwrap();
        fs::write(dir.path().join("b.md"), "---\ntitle: B\nid: same\n---\n").unwrap();

        let pattern = format!("{}/*.md", dir.path().display());

        assert!(matches!(
            load_posts(&pattern),
            Err(StoreError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_load_posts_invalid_pattern() {
        assert!(matches!(
            load_posts("content/[*.md"),
            Err(StoreError::Glob { .. })
        ));
    }
}
