use std::collections::BTreeMap;

/// A route definition: a path pattern plus the constraints a request must
/// satisfy to match it.
///
/// Routes are built with a builder-like pattern and become read-only once
/// they are added to a [`RouteCollection`](crate::RouteCollection).
///
/// ```rust
/// use routematch::Route;
///
/// let route = Route::new("/blog/{slug}")
///     .requirement("slug", "[a-z0-9-]+")
///     .default("page", "1")
///     .methods(["get", "head"]);
///
/// assert_eq!(route.get_methods(), ["GET", "HEAD"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pattern: String,
    defaults: BTreeMap<String, String>,
    requirements: BTreeMap<String, String>,
    methods: Vec<String>,
    schemes: Vec<String>,
    case_insensitive: bool,
}

impl Route {
    /// Creates a route for the given path pattern.
    ///
    /// The pattern is normalized to begin with a `/`.
    pub fn new(pattern: impl AsRef<str>) -> Self {
        Route {
            pattern: normalize_pattern(pattern.as_ref()),
            ..Default::default()
        }
    }

    /// Sets the default value of a parameter.
    pub fn default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    /// Sets the regular expression a placeholder must match.
    ///
    /// Leading `^` and trailing `$` anchors are removed, the expression is
    /// always matched against the whole segment.
    ///
    /// The expression sees the value as it appears in the matched path, not
    /// the decoded parameter: a percent sign is `%25` and an encoded slash
    /// is `%2F`. A value of `a%` is therefore matched as `a%25`, and
    /// `{v<.{2}>}` does not accept it.
    pub fn requirement(mut self, name: impl Into<String>, regex: impl AsRef<str>) -> Self {
        self.requirements
            .insert(name.into(), sanitize_requirement(regex.as_ref()));
        self
    }

    /// Restricts the route to the given HTTP methods.
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods = dedup(methods.into_iter().map(|m| m.as_ref().to_uppercase()));
        self
    }

    /// Restricts the route to the given URI schemes.
    pub fn schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.schemes = dedup(schemes.into_iter().map(|s| s.as_ref().to_lowercase()));
        self
    }

    /// Matches literal parts of the pattern without regard to case.
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Returns the path pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the default parameter values.
    pub fn defaults(&self) -> &BTreeMap<String, String> {
        &self.defaults
    }

    /// Returns the per-placeholder requirements.
    pub fn requirements(&self) -> &BTreeMap<String, String> {
        &self.requirements
    }

    /// Returns the accepted methods. Empty means any method.
    pub fn get_methods(&self) -> &[String] {
        &self.methods
    }

    /// Returns the accepted schemes. Empty means any scheme.
    pub fn get_schemes(&self) -> &[String] {
        &self.schemes
    }

    /// Returns `true` if literal text is matched case-insensitively.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub(crate) fn set_pattern(&mut self, pattern: &str) {
        self.pattern = normalize_pattern(pattern);
    }

    pub(crate) fn defaults_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.defaults
    }

    pub(crate) fn requirements_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.requirements
    }
}

// Patterns always begin with a slash, the empty pattern is the root.
fn normalize_pattern(pattern: &str) -> String {
    if pattern.starts_with('/') {
        pattern.to_owned()
    } else {
        format!("/{}", pattern)
    }
}

pub(crate) fn sanitize_requirement(regex: &str) -> String {
    let regex = regex.strip_prefix('^').unwrap_or(regex);

    // an escaped dollar sign is a literal
    match regex.strip_suffix('$') {
        Some(stripped) if !stripped.ends_with('\\') => stripped.to_owned(),
        _ => regex.to_owned(),
    }
}

fn dedup(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
