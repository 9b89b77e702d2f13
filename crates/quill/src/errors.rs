//! Error types for Quill.
use std::fmt::{self, Debug, Formatter};
use std::path::PathBuf;
use thiserror::Error;

macro_rules! impl_debug_for_error {
    ($($t:ty),*) => {
        $(
            impl Debug for $t {
                fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                    // Errors returned from main are printed with Debug, but thiserror only derives Display.
                    write!(f, "{}", self)
                }
            }
        )*
    };
}

#[derive(Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Route `{name}` is not defined")]
    RouteNotFound { name: String },
    #[error("Route {route:?} is missing parameter {key:?}")]
    MissingParameter { route: String, key: String },
}

#[derive(Error)]
pub enum StoreError {
    #[error("No blog post with id `{id}`")]
    NotFound { id: String },
    #[error("A blog post with id `{id}` already exists")]
    DuplicateId { id: String },
    #[error(
        "`{id}` is not a valid blog post id, ids may only contain ASCII letters, digits, `-` and `_`"
    )]
    InvalidId { id: String },
    #[error("Invalid glob pattern `{pattern}`")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Failed to read blog post file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid frontmatter in {path}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{path} has no frontmatter, a `title` is required")]
    MissingFrontmatter { path: PathBuf },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[derive(Error)]
pub enum BuildError {
    #[error("Failed to write {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to clean output directory {path}")]
    CleanFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum QuillError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl_debug_for_error!(UrlError, StoreError, BuildError);
