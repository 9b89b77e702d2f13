//! Blog records as the renderers see them.
//!
//! Records are created by a [`BlogStore`](crate::store::BlogStore) and are read-only from there on: nothing in this crate mutates a post after it has been loaded.
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

use crate::errors::StoreError;

/// Opaque identifier of a blog post.
///
/// Ids end up as a single URL path segment and as a directory name in the build output, so they are restricted to ASCII alphanumerics, `-` and `_`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlogId(String);

impl BlogId {
    pub fn new(id: impl Into<String>) -> Result<Self, StoreError> {
        let id = id.into();

        if !is_valid_id(&id) {
            return Err(StoreError::InvalidId { id });
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Display for BlogId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlogId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BlogId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<u64> for BlogId {
    type Error = StoreError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        BlogId::new(value.to_string())
    }
}

/// A full blog article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogPost {
    pub id: BlogId,
    pub title: String,
    pub content: String,
}

impl BlogPost {
    pub fn new(id: BlogId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn summary(&self) -> BlogPostSummary {
        BlogPostSummary::from(self)
    }
}

/// The part of a [`BlogPost`] shown in listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlogPostSummary {
    pub id: BlogId,
    pub title: String,
}

impl From<&BlogPost> for BlogPostSummary {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
        }
    }
}
