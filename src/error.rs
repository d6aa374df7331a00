use std::fmt;

/// Represents errors that can occur while building a route collection.
///
/// These are configuration errors: they are reported when a route is added
/// or compiled, never while matching.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// A route with the same name was already registered.
    #[error("a route named '{name}' is already registered")]
    DuplicateName {
        /// The conflicting route name.
        name: String,
    },
    /// The same placeholder appears more than once in a pattern.
    #[error("placeholder '{name}' is used more than once in '{pattern}'")]
    DuplicatePlaceholder {
        /// The repeated placeholder.
        name: String,
        /// The offending pattern.
        pattern: String,
    },
    /// Unbalanced or empty braces.
    #[error("malformed placeholder at byte {position} in '{pattern}'")]
    MalformedPlaceholder {
        /// The offending pattern.
        pattern: String,
        /// Byte offset of the opening brace.
        position: usize,
    },
    /// Placeholder names must be word characters, not start with a digit
    /// and be at most 32 bytes long.
    #[error("invalid placeholder name '{name}' in '{pattern}'")]
    InvalidPlaceholderName {
        /// The rejected name.
        name: String,
        /// The offending pattern.
        pattern: String,
    },
    /// A requirement was declared for a placeholder the pattern does not contain.
    #[error("requirement for '{name}' does not match any placeholder in '{pattern}'")]
    UnknownRequirement {
        /// The requirement key.
        name: String,
        /// The offending pattern.
        pattern: String,
    },
    /// A requirement is empty or is not a valid regular expression.
    #[error("invalid requirement for '{name}': {reason}")]
    InvalidRequirement {
        /// The placeholder the requirement belongs to.
        name: String,
        /// Why the expression was rejected.
        reason: String,
    },
}

/// Errors returned when generating a URL from a route name.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum GenerateError {
    /// No route is registered under the given name.
    #[error("route '{0}' does not exist")]
    UnknownRoute(String),
    /// Mandatory placeholders were not given a value.
    #[error("missing parameters {missing:?} to generate a URL for route '{route}'")]
    MissingParameters {
        /// The route being generated.
        route: String,
        /// The placeholders without a value, in pattern order.
        missing: Vec<String>,
    },
    /// A value does not satisfy the placeholder's requirement.
    #[error("parameter '{name}' for route '{route}' must match '{requirement}' ('{value}' given)")]
    InvalidParameter {
        /// The route being generated.
        route: String,
        /// The placeholder name.
        name: String,
        /// The placeholder's requirement.
        requirement: String,
        /// The rejected value.
        value: String,
    },
}

/// A failed match attempt.
///
/// These are ordinary outcomes of matching, not faults.
///
/// ```
/// use routematch::{MatchError, Matcher, Route, RouteCollection, UrlMatcher};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut routes = RouteCollection::new();
/// routes.add("home", Route::new("/home"))?;
///
/// let matcher = UrlMatcher::new(&routes)?;
///
/// // no routes match
/// if let Err(err) = matcher.match_path("/foobar") {
///     assert_eq!(err, MatchError::NotFound);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MatchError {
    /// No route's path matched.
    NotFound,
    /// At least one route's path matched, but none accepted the request method.
    MethodNotAllowed {
        /// The methods accepted by the path-matching routes, in first-seen order.
        allowed: Vec<String>,
    },
    /// The path only matches once its trailing slash is toggled.
    RedirectTo {
        /// The corrected path.
        path: String,
        /// The route the corrected path matches.
        route: String,
    },
}

impl MatchError {
    /// The HTTP status code the request layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            MatchError::NotFound => 404,
            MatchError::MethodNotAllowed { .. } => 405,
            MatchError::RedirectTo { .. } => 301,
        }
    }

    /// The value of the `Allow` header, if this is a method mismatch.
    pub fn allow_header(&self) -> Option<String> {
        match self {
            MatchError::MethodNotAllowed { allowed } => Some(allowed.join(", ")),
            _ => None,
        }
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::NotFound => write!(f, "matching route not found"),
            MatchError::MethodNotAllowed { allowed } => {
                write!(f, "method not allowed, expected one of: {}", allowed.join(", "))
            }
            MatchError::RedirectTo { path, .. } => write!(f, "redirect to '{}'", path),
        }
    }
}

impl std::error::Error for MatchError {}
