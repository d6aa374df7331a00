//! The ahead-of-time matching engine.
//!
//! [`CompiledRoutes`] is plain data: the compiled form of every route plus
//! a lookup table for static paths. It can be produced once, embedded in
//! generated source by the [`RustMatcherDumper`](crate::RustMatcherDumper),
//! and turned back into a [`CompiledUrlMatcher`] at startup.
//!
//! Instead of trying every route in turn, the matcher collects candidates
//! from a hash lookup on static paths and a single [`RegexSet`] pass over
//! the dynamic ones, then resolves the candidates in priority order. The
//! results are the same as [`UrlMatcher`](crate::UrlMatcher)'s.
use crate::collection::{CompiledCollection, RouteCollection};
use crate::compiler::{CompiledPattern, CompiledRoute, Token};
use crate::error::{MatchError, RouteError};
use crate::matcher::{traced, Candidate, Match, Matcher, Resolver};
use crate::path::decode_path;
use crate::redirect::RedirectPolicy;
use crate::request::RequestContext;

use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// The compiled form of one route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// The route name.
    pub name: String,
    /// The pattern tokens.
    pub tokens: Vec<Token>,
    /// The literal path of a route without placeholders.
    pub static_path: Option<String>,
    /// The anchored regex source.
    pub regex_source: String,
    /// The regex source with the trailing slash toggled.
    pub slash_source: Option<String>,
    /// Default parameter values, sorted by name.
    pub defaults: Vec<(String, String)>,
    /// Accepted methods, empty for any.
    pub methods: Vec<String>,
    /// Accepted schemes, empty for any.
    pub schemes: Vec<String>,
}

/// Precompiled matching tables for a route collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledRoutes {
    /// Every route, in priority order.
    pub routes: Vec<RouteEntry>,
    /// Static paths, sorted, with the indices of the routes that declare them.
    pub static_paths: Vec<(String, Vec<usize>)>,
    /// Indices of the routes matched by regex.
    pub dynamic: Vec<usize>,
}

impl CompiledRoutes {
    /// Builds the tables for a compiled collection.
    pub fn new(collection: &CompiledCollection) -> Self {
        let mut static_paths: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut dynamic = Vec::new();
        let mut routes = Vec::with_capacity(collection.len());

        for (i, route) in collection.iter().enumerate() {
            let pattern = route.pattern();
            match pattern.static_path() {
                Some(path) => static_paths.entry(path.to_owned()).or_default().push(i),
                None => dynamic.push(i),
            }

            routes.push(RouteEntry {
                name: route.name().to_owned(),
                tokens: pattern.tokens().to_vec(),
                static_path: pattern.static_path().map(str::to_owned),
                regex_source: pattern.regex_source().to_owned(),
                slash_source: pattern.slash_source().map(str::to_owned),
                defaults: route
                    .defaults()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                methods: route.methods().to_vec(),
                schemes: route.schemes().to_vec(),
            });
        }

        CompiledRoutes {
            routes,
            static_paths: static_paths.into_iter().collect(),
            dynamic,
        }
    }
}

impl From<&CompiledCollection> for CompiledRoutes {
    fn from(collection: &CompiledCollection) -> Self {
        CompiledRoutes::new(collection)
    }
}

/// Matches requests using precompiled tables.
///
/// ```rust
/// use routematch::{CompiledUrlMatcher, Matcher, RedirectPolicy, Route, RouteCollection};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut routes = RouteCollection::new();
/// routes.add("home", Route::new("/"))?;
/// routes.add("post", Route::new("/posts/{id}").requirement("id", r"\d+"))?;
///
/// let matcher = CompiledUrlMatcher::from_collection(&routes, RedirectPolicy::none())?;
/// let matched = matcher.match_path("/posts/7")?;
///
/// assert_eq!(matched.route, "post");
/// assert_eq!(matched.params.get("id"), Some("7"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CompiledUrlMatcher {
    routes: Arc<CompiledCollection>,
    redirect: RedirectPolicy,
    static_paths: HashMap<String, Vec<usize>>,
    dynamic: Vec<usize>,
    exact: RegexSet,
    slash: RegexSet,
    slash_routes: Vec<usize>,
}

impl CompiledUrlMatcher {
    /// Creates a matcher from precompiled tables.
    pub fn new(tables: CompiledRoutes, redirect: RedirectPolicy) -> Result<Self, RouteError> {
        let mut routes = Vec::with_capacity(tables.routes.len());
        for entry in tables.routes {
            let pattern = CompiledPattern::from_parts(
                entry.tokens,
                entry.static_path,
                entry.regex_source,
                entry.slash_source,
            )?;

            routes.push(CompiledRoute {
                name: entry.name,
                pattern,
                defaults: entry.defaults.into_iter().collect(),
                methods: entry.methods,
                schemes: entry.schemes,
            });
        }

        let routes = CompiledCollection::new(routes)?;
        Self::build(Arc::new(routes), tables.static_paths, tables.dynamic, redirect)
    }

    /// Compiles a route collection and creates a matcher for it.
    pub fn from_collection(
        routes: &RouteCollection,
        redirect: RedirectPolicy,
    ) -> Result<Self, RouteError> {
        Self::from_compiled(Arc::new(routes.compile()?), redirect)
    }

    /// Creates a matcher sharing an already compiled collection.
    pub fn from_compiled(
        routes: Arc<CompiledCollection>,
        redirect: RedirectPolicy,
    ) -> Result<Self, RouteError> {
        let tables = CompiledRoutes::new(&routes);
        Self::build(routes, tables.static_paths, tables.dynamic, redirect)
    }

    /// Returns the compiled routes.
    pub fn routes(&self) -> &CompiledCollection {
        &self.routes
    }

    fn build(
        routes: Arc<CompiledCollection>,
        static_paths: Vec<(String, Vec<usize>)>,
        dynamic: Vec<usize>,
        redirect: RedirectPolicy,
    ) -> Result<Self, RouteError> {
        let set_error = |err: regex::Error| RouteError::InvalidRequirement {
            name: "<route set>".to_owned(),
            reason: err.to_string(),
        };

        let dynamic: Vec<usize> = dynamic.into_iter().filter(|&i| i < routes.len()).collect();

        let exact = RegexSet::new(
            dynamic
                .iter()
                .filter_map(|&i| routes.at(i))
                .map(|route| route.pattern().regex_source()),
        )
        .map_err(set_error)?;

        let slash_routes: Vec<usize> = dynamic
            .iter()
            .copied()
            .filter(|&i| routes.at(i).map_or(false, |r| r.pattern().slash_source().is_some()))
            .collect();

        let slash = RegexSet::new(
            slash_routes
                .iter()
                .filter_map(|&i| routes.at(i))
                .filter_map(|route| route.pattern().slash_source()),
        )
        .map_err(set_error)?;

        tracing::debug!(
            routes = routes.len(),
            static_paths = static_paths.len(),
            dynamic = dynamic.len(),
            "created compiled url matcher"
        );

        Ok(CompiledUrlMatcher {
            routes,
            redirect,
            static_paths: static_paths.into_iter().collect(),
            dynamic,
            exact,
            slash,
            slash_routes,
        })
    }

    // Every route that may produce a result for the path, in the order the
    // interpretive matcher would consider them.
    fn candidates(&self, raw_path: &str, path: &str, ctx: &RequestContext) -> Vec<(usize, Candidate)> {
        let mut candidates = Vec::new();

        if let Some(indices) = self.static_paths.get(path) {
            candidates.extend(indices.iter().map(|&i| (i, Candidate::Exact)));
        }

        candidates.extend(
            self.exact
                .matches(path)
                .into_iter()
                .map(|i| (self.dynamic[i], Candidate::Exact)),
        );

        if self.redirect.applies(raw_path, ctx) {
            // a static pattern ending in `//` is reached by appending a slash
            // to a path that already ends in one
            let appended = format!("{}/", path);
            let toggled = [Some(appended.as_str()), path.strip_suffix('/')];

            for static_path in toggled.into_iter().flatten() {
                if let Some(indices) = self.static_paths.get(static_path) {
                    candidates.extend(indices.iter().map(|&i| (i, Candidate::Slash)));
                }
            }

            candidates.extend(
                self.slash
                    .matches(path)
                    .into_iter()
                    .map(|i| (self.slash_routes[i], Candidate::Slash)),
            );
        }

        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }
}

impl Matcher for CompiledUrlMatcher {
    fn match_request(&self, path: &str, ctx: &RequestContext) -> Result<Match<'_>, MatchError> {
        let decoded = decode_path(path);
        let mut resolver = Resolver::new(path, &decoded, ctx, self.redirect);

        for (i, candidate) in self.candidates(path, &decoded, ctx) {
            let route = match self.routes.at(i) {
                Some(route) => route,
                None => continue,
            };

            if let Some(result) = resolver.consider(route, candidate) {
                return traced(path, ctx, result);
            }
        }

        traced(path, ctx, Err(resolver.finish()))
    }
}
