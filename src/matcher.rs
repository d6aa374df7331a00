//! Matches request paths against a route collection.
//!
//! Routes are tried in insertion order and the first route whose path and
//! method both match wins, even if a later route looks more specific:
//!
//! ```text
//!  Routes:
//!   foo1   /foo       methods = POST
//!   foo2   /foo       methods = PUT, DELETE
//!   page   /{page}
//!
//!  Requests:
//!   POST /foo    match: foo1
//!   GET  /foo    match: page, page="foo"
//!   GET  /bar    match: page, page="bar"
//! ```
//!
//! When some route's path matches but no route accepts the method, the
//! result is [`MatchError::MethodNotAllowed`] with the methods of *every*
//! path-matching route, deduplicated in the order they were first seen.
//! A `HEAD` request is accepted by any route accepting `GET`.
//!
//! Captured values are percent-decoded as UTF-8. An escape that does not
//! form valid UTF-8, such as `%FF`, decodes to U+FFFD rather than failing
//! the match.
use crate::collection::{CompiledCollection, RouteCollection};
use crate::compiler::CompiledRoute;
use crate::error::{MatchError, RouteError};
use crate::params::Params;
use crate::path::{decode_param, decode_path};
use crate::redirect::RedirectPolicy;
use crate::request::RequestContext;

use std::borrow::Cow;
use std::sync::Arc;

/// A successful match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match<'m> {
    /// The name of the matched route.
    pub route: &'m str,
    /// The route defaults merged with the parameters captured from the path.
    pub params: Params<'m>,
}

/// Matches a request path to a route.
///
/// Both the interpretive [`UrlMatcher`] and the ahead-of-time
/// [`CompiledUrlMatcher`](crate::CompiledUrlMatcher) implement this trait
/// and return identical results for the same routes.
pub trait Matcher {
    /// Matches a raw (percent-encoded) request path.
    fn match_request(&self, path: &str, ctx: &RequestContext) -> Result<Match<'_>, MatchError>;

    /// Matches a path as a plain `GET` request.
    fn match_path(&self, path: &str) -> Result<Match<'_>, MatchError> {
        self.match_request(path, &RequestContext::default())
    }
}

/// Matches requests by trying every route's regex in order.
///
/// ```rust
/// use routematch::{Matcher, RequestContext, Route, RouteCollection, UrlMatcher};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut routes = RouteCollection::new();
/// routes.add("foo", Route::new("/foo/{bar}").default("def", "test"))?;
///
/// let matcher = UrlMatcher::new(&routes)?;
/// let matched = matcher.match_request("/foo/baz", &RequestContext::new("GET"))?;
///
/// assert_eq!(matched.route, "foo");
/// assert_eq!(matched.params.get("bar"), Some("baz"));
/// assert_eq!(matched.params.get("def"), Some("test"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct UrlMatcher {
    routes: Arc<CompiledCollection>,
    redirect: RedirectPolicy,
}

impl UrlMatcher {
    /// Compiles the collection and creates a matcher for it.
    pub fn new(routes: &RouteCollection) -> Result<Self, RouteError> {
        Ok(Self::from_compiled(Arc::new(routes.compile()?)))
    }

    /// Creates a matcher sharing an already compiled collection.
    pub fn from_compiled(routes: Arc<CompiledCollection>) -> Self {
        tracing::debug!(routes = routes.len(), "created url matcher");

        UrlMatcher {
            routes,
            redirect: RedirectPolicy::none(),
        }
    }

    /// Sets the redirect policy.
    pub fn with_redirect(mut self, redirect: RedirectPolicy) -> Self {
        self.redirect = redirect;
        self
    }

    /// Returns the compiled routes.
    pub fn routes(&self) -> &CompiledCollection {
        &self.routes
    }
}

impl Matcher for UrlMatcher {
    fn match_request(&self, path: &str, ctx: &RequestContext) -> Result<Match<'_>, MatchError> {
        let decoded = decode_path(path);
        let mut resolver = Resolver::new(path, &decoded, ctx, self.redirect);

        for route in self.routes.iter() {
            for candidate in [Candidate::Exact, Candidate::Slash] {
                if let Some(result) = resolver.consider(route, candidate) {
                    return traced(path, ctx, result);
                }
            }
        }

        traced(path, ctx, Err(resolver.finish()))
    }
}

// How a route became a candidate for a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Candidate {
    // the path may match the route's pattern
    Exact,
    // the path may match the pattern with its trailing slash toggled
    Slash,
}

// The first-match-wins state shared by every matcher.
//
// Candidates must be considered in route order, `Exact` before `Slash` for
// the same route. Returns as soon as a route accepts the request or a
// redirect applies.
pub(crate) struct Resolver<'m, 'p> {
    raw_path: &'p str,
    path: &'p str,
    ctx: &'p RequestContext,
    redirect: RedirectPolicy,
    allowed: Vec<&'m str>,
}

impl<'m, 'p> Resolver<'m, 'p> {
    pub(crate) fn new(
        raw_path: &'p str,
        path: &'p str,
        ctx: &'p RequestContext,
        redirect: RedirectPolicy,
    ) -> Self {
        Resolver {
            raw_path,
            path,
            ctx,
            redirect,
            allowed: Vec::new(),
        }
    }

    pub(crate) fn consider(
        &mut self,
        route: &'m CompiledRoute,
        candidate: Candidate,
    ) -> Option<Result<Match<'m>, MatchError>> {
        if !route.schemes().is_empty() && !route.schemes().iter().any(|s| s == self.ctx.scheme()) {
            return None;
        }

        match candidate {
            Candidate::Exact => self.exact(route),
            Candidate::Slash => self
                .redirect
                .redirect(self.raw_path, self.path, route, self.ctx)
                .map(Err),
        }
    }

    pub(crate) fn finish(self) -> MatchError {
        if self.allowed.is_empty() {
            MatchError::NotFound
        } else {
            MatchError::MethodNotAllowed {
                allowed: self.allowed.into_iter().map(str::to_owned).collect(),
            }
        }
    }

    fn exact(&mut self, route: &'m CompiledRoute) -> Option<Result<Match<'m>, MatchError>> {
        let pattern = route.pattern();

        let captures = match pattern.static_path() {
            Some(static_path) if static_path == self.path => None,
            Some(_) => return None,
            None => Some(pattern.regex().captures(self.path)?),
        };

        if !self.ctx.accepts(route.methods()) {
            for method in route.methods() {
                if !self.allowed.contains(&method.as_str()) {
                    self.allowed.push(method.as_str());
                }
            }
            return None;
        }

        let mut params = Params::new();
        for (key, value) in route.defaults() {
            params.set(key.as_str(), Cow::Borrowed(value.as_str()));
        }

        if let Some(captures) = captures {
            for name in pattern.variables() {
                if let Some(value) = captures.name(name) {
                    params.set(name.as_str(), Cow::Owned(decode_param(value.as_str()).into_owned()));
                }
            }
        }

        Some(Ok(Match {
            route: route.name(),
            params,
        }))
    }
}

pub(crate) fn traced<'m>(
    path: &str,
    ctx: &RequestContext,
    result: Result<Match<'m>, MatchError>,
) -> Result<Match<'m>, MatchError> {
    match &result {
        Ok(matched) => {
            tracing::trace!(path, method = ctx.method(), route = matched.route, "matched route")
        }
        Err(err) => tracing::trace!(path, method = ctx.method(), %err, "no route matched"),
    }
    result
}
