use crate::collection::{CompiledCollection, RouteCollection};
use crate::compiler::{CompiledRoute, Token};
use crate::error::{GenerateError, RouteError};
use crate::path::{encode_query, encode_segment};

use regex::{Regex, RegexBuilder};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Builds paths from route names and parameters.
///
/// Generation is the reverse of matching: the path generated for a route
/// matches that route with the same parameters. Trailing placeholders whose
/// value equals their default are left out, and parameters the pattern does
/// not use are appended as a query string, sorted by key.
///
/// ```rust
/// use routematch::{Route, RouteCollection, UrlGenerator};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut routes = RouteCollection::new();
/// routes.add(
///     "blog",
///     Route::new("/blog/{page}").requirement("page", r"\d+").default("page", "1"),
/// )?;
///
/// let generator = UrlGenerator::from_collection(&routes)?;
/// assert_eq!(generator.generate("blog", [("page", "2")])?, "/blog/2");
/// assert_eq!(generator.generate("blog", [("page", "1")])?, "/blog");
/// assert_eq!(generator.generate("blog", [("sort", "date")])?, "/blog?sort=date");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct UrlGenerator {
    routes: Arc<CompiledCollection>,
    requirements: HashMap<String, HashMap<String, Regex>>,
}

impl UrlGenerator {
    /// Compiles the collection and creates a generator for it.
    pub fn from_collection(routes: &RouteCollection) -> Result<Self, RouteError> {
        Self::new(Arc::new(routes.compile()?))
    }

    /// Creates a generator sharing an already compiled collection.
    pub fn new(routes: Arc<CompiledCollection>) -> Result<Self, RouteError> {
        let mut requirements = HashMap::with_capacity(routes.len());

        for route in routes.iter() {
            let case_insensitive = route.pattern().regex_source().starts_with("(?i)");
            let mut checks = HashMap::new();

            for token in route.pattern().tokens() {
                if let Token::Variable {
                    name, requirement, ..
                } = token
                {
                    let regex = RegexBuilder::new(&format!("^(?:{})$", requirement))
                        .case_insensitive(case_insensitive)
                        .build()
                        .map_err(|err| RouteError::InvalidRequirement {
                            name: name.clone(),
                            reason: err.to_string(),
                        })?;
                    checks.insert(name.clone(), regex);
                }
            }

            requirements.insert(route.name().to_owned(), checks);
        }

        Ok(UrlGenerator {
            routes,
            requirements,
        })
    }

    /// Generates the path of a route.
    pub fn generate<I, K, V>(&self, name: &str, params: I) -> Result<String, GenerateError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let route = self
            .routes
            .get(name)
            .ok_or_else(|| GenerateError::UnknownRoute(name.to_owned()))?;

        let params: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let path = self.path(route, &params)?;

        let query: Vec<String> = params
            .iter()
            .filter(|(key, _)| !route.pattern().variables().contains(*key))
            .filter(|(key, value)| route.defaults().get(*key) != Some(*value))
            .map(|(key, value)| format!("{}={}", encode_query(key), encode_query(value)))
            .collect();

        let url = if query.is_empty() {
            path
        } else {
            format!("{}?{}", path, query.join("&"))
        };

        tracing::trace!(route = name, url = url.as_str(), "generated url");
        Ok(url)
    }

    fn path(
        &self,
        route: &CompiledRoute,
        params: &BTreeMap<String, String>,
    ) -> Result<String, GenerateError> {
        let value = |name: &str| params.get(name).or_else(|| route.defaults().get(name));

        let missing: Vec<String> = route
            .pattern()
            .variables()
            .iter()
            .filter(|name| value(name.as_str()).is_none())
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(GenerateError::MissingParameters {
                route: route.name().to_owned(),
                missing,
            });
        }

        // built back to front so trailing defaults can be left out
        let mut pieces = Vec::new();
        let mut optional = true;

        for token in route.pattern().tokens().iter().rev() {
            match token {
                Token::Text(text) => {
                    pieces.push(text.replace('%', "%25"));
                    optional = false;
                }
                Token::Variable {
                    prefix,
                    name,
                    requirement,
                } => {
                    let given = value(name.as_str()).map(String::as_str).unwrap_or_default();
                    let default = route.defaults().get(name);

                    if !optional || default.map(String::as_str) != Some(given) {
                        self.check(route, name, requirement, given)?;
                        pieces.push(format!("{}{}", prefix, encode_segment(given)));
                        optional = false;
                    }
                }
            }
        }

        let path: String = pieces.into_iter().rev().collect();
        Ok(if path.is_empty() { "/".to_owned() } else { path })
    }

    fn check(
        &self,
        route: &CompiledRoute,
        name: &str,
        requirement: &str,
        value: &str,
    ) -> Result<(), GenerateError> {
        let valid = self
            .requirements
            .get(route.name())
            .and_then(|checks| checks.get(name))
            .map_or(true, |regex| regex.is_match(value));

        if valid {
            Ok(())
        } else {
            Err(GenerateError::InvalidParameter {
                route: route.name().to_owned(),
                name: name.to_owned(),
                requirement: requirement.to_owned(),
                value: value.to_owned(),
            })
        }
    }
}
