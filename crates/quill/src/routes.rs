//! Named routes and URL generation.
//!
//! Views never hard-code URLs: they ask a [`RouteResolver`] for the URL of a named route, the same way a template would call `route('blogs.show', $id)`.
//! [`RouteTable`] is the resolver used by the build and the server.
//!
//! ## Example
//! ```rust
//! use quill::model::BlogId;
//! use quill::routes::{RouteResolver, RouteTable, BLOGS_SHOW};
//!
//! let routes = RouteTable::blogs();
//! let id = BlogId::new("hello-world").unwrap();
//! assert_eq!(routes.resolve(BLOGS_SHOW, &id).unwrap(), "/blogs/hello-world/");
//! ```
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::errors::UrlError;
use crate::model::BlogId;
use crate::routing::{ParameterDef, extract_params_from_pattern, guess_if_pattern_is_endpoint};

pub const BLOGS_INDEX: &str = "blogs.index";
pub const BLOGS_SHOW: &str = "blogs.show";

/// Maps a route name, and optionally a post id, to a URL.
pub trait RouteResolver: Send + Sync {
    /// URL of a route taking a single post id. The id is bound to the first parameter of the route.
    fn resolve(&self, name: &str, id: &BlogId) -> Result<String, UrlError>;

    /// URL of a route without parameters.
    fn resolve_static(&self, name: &str) -> Result<String, UrlError>;
}

/// Values for the `[name]` placeholders of a route. `None` drops the segment.
#[derive(Clone, Default, Debug)]
pub struct RouteParams(pub FxHashMap<String, Option<String>>);

impl RouteParams {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), Some(value.into()));
        self
    }
}

/// A route pattern with its placeholders parsed once.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    params_def: Vec<ParameterDef>,
    is_endpoint: bool,
}

impl RoutePattern {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            params_def: extract_params_from_pattern(&raw),
            is_endpoint: guess_if_pattern_is_endpoint(&raw),
            raw,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn first_param(&self) -> Option<&str> {
        self.params_def.first().map(|p| p.key.as_str())
    }

    /// The pattern with each placeholder replaced by `placeholder(key)`. Escaped brackets are left as written.
    pub fn replace_params(&self, placeholder: impl Fn(&str) -> String) -> String {
        let mut result = self.raw.clone();

        for param_def in self.params_def.iter().rev() {
            result.replace_range(
                param_def.index..param_def.index + param_def.length,
                &placeholder(&param_def.key),
            );
        }

        result
    }

    pub fn url(&self, params: &RouteParams) -> Result<String, UrlError> {
        let route = self.substitute(params)?;

        if self.params_def.is_empty() {
            return Ok(route);
        }

        let mut result = route
            .split('/')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        if !result.starts_with('/') {
            result.insert(0, '/');
        }

        if !self.is_endpoint && !result.ends_with('/') {
            result.push('/');
        }

        Ok(result)
    }

    pub fn file_path(&self, params: &RouteParams, output_dir: &Path) -> Result<PathBuf, UrlError> {
        let route = self.substitute(params)?;

        let mut path = PathBuf::from(output_dir);
        path.extend(route.split('/').filter(|s| !s.is_empty()));

        if !self.is_endpoint {
            path.push("index.html");
        }

        Ok(path)
    }

    fn substitute(&self, params: &RouteParams) -> Result<String, UrlError> {
        let mut result = self.raw.clone();

        // Placeholders are replaced back to front so earlier indices stay valid
        for param_def in self.params_def.iter().rev() {
            let value = params
                .0
                .get(&param_def.key)
                .ok_or_else(|| UrlError::MissingParameter {
                    route: self.raw.clone(),
                    key: param_def.key.clone(),
                })?;

            result.replace_range(
                param_def.index..param_def.index + param_def.length,
                value.as_deref().unwrap_or(""),
            );
        }

        Ok(result)
    }
}

/// Route names mapped to their patterns.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: FxHashMap<String, RoutePattern>,
    base_url: Option<String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two routes of a blog: `blogs.index` at `/blogs` and `blogs.show` at `/blogs/[blog]`.
    pub fn blogs() -> Self {
        Self::new()
            .with_route(BLOGS_INDEX, "/blogs")
            .with_route(BLOGS_SHOW, "/blogs/[blog]")
    }

    pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.routes.insert(name.into(), RoutePattern::new(pattern));
        self
    }

    /// Prefix generated URLs with `base_url`, e.g. `https://example.com`, to make them absolute.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url.map(|base| base.trim_end_matches('/').to_string());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn get(&self, name: &str) -> Result<&RoutePattern, UrlError> {
        self.routes.get(name).ok_or_else(|| UrlError::RouteNotFound {
            name: name.to_string(),
        })
    }

    /// Path of the route relative to the site root, without the base URL.
    pub fn path(&self, name: &str, params: &RouteParams) -> Result<String, UrlError> {
        self.get(name)?.url(params)
    }

    pub fn url(&self, name: &str, params: &RouteParams) -> Result<String, UrlError> {
        let path = self.path(name, params)?;

        Ok(match &self.base_url {
            Some(base) => format!("{}{}", base, path),
            None => path,
        })
    }

    pub fn file_path(
        &self,
        name: &str,
        params: &RouteParams,
        output_dir: &Path,
    ) -> Result<PathBuf, UrlError> {
        self.get(name)?.file_path(params, output_dir)
    }

    /// Parameters binding `id` to the first placeholder of the route.
    pub fn params_for(&self, name: &str, id: &BlogId) -> Result<RouteParams, UrlError> {
        let route = self.get(name)?;

        Ok(match route.first_param() {
            Some(key) => RouteParams::default().with(key, id.as_str()),
            None => RouteParams::default(),
        })
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, name: &str, id: &BlogId) -> Result<String, UrlError> {
        self.url(name, &self.params_for(name, id)?)
    }

    fn resolve_static(&self, name: &str) -> Result<String, UrlError> {
        self.url(name, &RouteParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> BlogId {
        BlogId::new(value).unwrap()
    }

    #[test]
    fn test_replace_params_skips_escaped_brackets() {
        let pattern = RoutePattern::new(r"/notes/\[draft\]/[blog]");

        assert_eq!(
            pattern.replace_params(|key| format!("<{}>", key)),
            r"/notes/\[draft\]/<blog>"
        );
        assert_eq!(
            RoutePattern::new("/blogs").replace_params(|_| String::new()),
            "/blogs"
        );
    }

    #[test]
    fn test_blogs_routes() {
        let routes = RouteTable::blogs();

        assert_eq!(routes.resolve_static(BLOGS_INDEX).unwrap(), "/blogs");
        assert_eq!(routes.resolve(BLOGS_SHOW, &id("1")).unwrap(), "/blogs/1/");
    }

    #[test]
    fn test_base_url_prefix() {
        let routes = RouteTable::blogs().with_base_url(Some("https://example.com/".into()));

        assert_eq!(
            routes.resolve(BLOGS_SHOW, &id("hello")).unwrap(),
            "https://example.com/blogs/hello/"
        );
        assert_eq!(routes.base_url(), Some("https://example.com"));
    }

    #[test]
    fn test_unknown_route() {
        let routes = RouteTable::blogs();

        assert_eq!(
            routes.resolve("posts.show", &id("1")),
            Err(UrlError::RouteNotFound {
                name: "posts.show".to_string()
            })
        );
    }

    #[test]
    fn test_missing_parameter() {
        let routes = RouteTable::blogs();

        assert_eq!(
            routes.resolve_static(BLOGS_SHOW),
            Err(UrlError::MissingParameter {
                route: "/blogs/[blog]".to_string(),
                key: "blog".to_string()
            })
        );
    }

    #[test]
    fn test_multiple_parameters_different_lengths() {
        let routes = RouteTable::new().with_route("tagged", "/tags/[tag]/[page]");
        let params = RouteParams::default()
            .with("tag", "development-experience")
            .with("page", "1");

        assert_eq!(
            routes.url("tagged", &params).unwrap(),
            "/tags/development-experience/1/"
        );
    }

    #[test]
    fn test_optional_parameter_collapses_slashes() {
        let routes = RouteTable::new().with_route("archive", "/[year]/[month]/posts");
        let mut params = RouteParams::default().with("month", "05");
        params.0.insert("year".to_string(), None);

        assert_eq!(routes.url("archive", &params).unwrap(), "/05/posts/");
    }

    #[test]
    fn test_endpoint_has_no_trailing_slash() {
        let routes = RouteTable::new().with_route("feed", "/blogs/[blog]/feed.xml");
        let params = RouteParams::default().with("blog", "1");

        assert_eq!(routes.url("feed", &params).unwrap(), "/blogs/1/feed.xml");
        assert_eq!(
            routes.file_path("feed", &params, Path::new("/dist")).unwrap(),
            Path::new("/dist/blogs/1/feed.xml")
        );
    }

    #[test]
    fn test_file_paths() {
        let routes = RouteTable::blogs();
        let output_dir = Path::new("/dist");

        assert_eq!(
            routes
                .file_path(BLOGS_INDEX, &RouteParams::default(), output_dir)
                .unwrap(),
            Path::new("/dist/blogs/index.html")
        );
        assert_eq!(
            routes
                .file_path(BLOGS_SHOW, &routes.params_for(BLOGS_SHOW, &id("7")).unwrap(), output_dir)
                .unwrap(),
            Path::new("/dist/blogs/7/index.html")
        );
    }

    #[test]
    fn test_route_without_parameter_ignores_id() {
        let routes = RouteTable::blogs();

        assert_eq!(routes.resolve(BLOGS_INDEX, &id("1")).unwrap(), "/blogs");
    }
}
