//! A first-match-wins URL route matcher.
//!
//! Routes are named path patterns with placeholders, defaults, requirements
//! and method or scheme constraints. They are tried in the order they were
//! added, and the first route whose path and method both match wins.
//!
//! ```rust
//! use routematch::{MatchError, Matcher, RequestContext, Route, RouteCollection, UrlMatcher};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut routes = RouteCollection::new();
//! routes.add("blog_show", Route::new("/blog/{slug}").methods(["GET"]))?;
//! routes.add("blog_list", Route::new("/blog/{page}").requirement("page", r"\d+").default("page", "1"))?;
//!
//! let matcher = UrlMatcher::new(&routes)?;
//!
//! let matched = matcher.match_path("/blog/hello-world")?;
//! assert_eq!(matched.route, "blog_show");
//! assert_eq!(matched.params.get("slug"), Some("hello-world"));
//!
//! let matched = matcher.match_path("/blog")?;
//! assert_eq!(matched.route, "blog_list");
//! assert_eq!(matched.params.get("page"), Some("1"));
//!
//! let err = matcher.match_request("/blog/hello", &RequestContext::new("POST")).unwrap_err();
//! assert_eq!(err, MatchError::MethodNotAllowed { allowed: vec!["GET".into()] });
//! # Ok(())
//! # }
//! ```
//!
//! # Patterns
//!
//! Placeholders are written `{name}` and match one path segment up to the
//! next separator. A requirement restricts what a placeholder matches, and
//! placeholders at the end of a pattern that have a default are optional:
//!
//! ```text
//!  Pattern: /blog/{page<\d+>?1}
//!
//!  /blog          match, page = "1"
//!  /blog/2        match, page = "2"
//!  /blog/two      no match
//! ```
//!
//! # Engines
//!
//! [`UrlMatcher`] tries each route's regex in order. [`CompiledUrlMatcher`]
//! answers the same questions from precompiled tables: static paths are
//! found by hash lookup and dynamic routes in a single regex set pass.
//! [`RustMatcherDumper`] writes those tables out as Rust source. Both
//! engines return identical results for the same routes.
//!
//! A [`RouteCollection`] is compiled once into a [`CompiledCollection`] and
//! shared read-only between matchers and the [`UrlGenerator`], so matching
//! is safe from any number of threads.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

mod collection;
mod compiled;
mod compiler;
mod dumper;
mod error;
mod generator;
mod matcher;
mod params;
mod path;
mod redirect;
mod request;
mod route;

pub mod config;

pub use collection::{CompiledCollection, RouteCollection};
pub use compiled::{CompiledRoutes, CompiledUrlMatcher, RouteEntry};
pub use compiler::{CompiledPattern, CompiledRoute, Token};
pub use dumper::{DumpOptions, RustMatcherDumper};
pub use error::{GenerateError, MatchError, RouteError};
pub use generator::UrlGenerator;
pub use matcher::{Match, Matcher, UrlMatcher};
pub use params::{Params, ParamsIter};
pub use path::toggle_trailing_slash;
pub use redirect::RedirectPolicy;
pub use request::RequestContext;
pub use route::Route;
