/// The parts of a request, other than its path, that take part in matching.
///
/// ```rust
/// use routematch::RequestContext;
///
/// let ctx = RequestContext::new("post").with_scheme("HTTPS");
/// assert_eq!(ctx.method(), "POST");
/// assert_eq!(ctx.scheme(), "https");
///
/// let ctx = RequestContext::default();
/// assert_eq!(ctx.method(), "GET");
/// assert_eq!(ctx.scheme(), "http");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RequestContext {
    method: String,
    scheme: String,
}

impl RequestContext {
    /// Creates a context for the given method over plain HTTP.
    pub fn new(method: impl AsRef<str>) -> Self {
        RequestContext {
            method: method.as_ref().to_uppercase(),
            scheme: "http".to_owned(),
        }
    }

    /// Sets the URI scheme of the request.
    pub fn with_scheme(mut self, scheme: impl AsRef<str>) -> Self {
        self.scheme = scheme.as_ref().to_lowercase();
        self
    }

    /// Returns the uppercase request method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the lowercase URI scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    // HEAD is answered by any route that answers GET.
    pub(crate) fn accepts(&self, methods: &[String]) -> bool {
        methods.is_empty()
            || methods.iter().any(|m| *m == self.method)
            || (self.method == "HEAD" && methods.iter().any(|m| m == "GET"))
    }

    pub(crate) fn is_safe(&self) -> bool {
        self.method == "GET" || self.method == "HEAD"
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        RequestContext::new("GET")
    }
}
