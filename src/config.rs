//! Route tables loaded from TOML.
//!
//! ```toml
//! prefix = "/api"
//!
//! [redirect]
//! trailing_slash = true
//!
//! [[routes]]
//! name = "blog_show"
//! path = "/blog/{slug}"
//! methods = ["GET"]
//! defaults = { _format = "html" }
//! requirements = { slug = "[a-z0-9-]+" }
//! ```
//!
//! Routes keep the order of the file, which is their match priority.

use crate::collection::RouteCollection;
use crate::error::RouteError;
use crate::redirect::RedirectPolicy;
use crate::route::Route;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Error type for route table loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid route table.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// A route is invalid.
    #[error("Route error: {0}")]
    Route(#[from] RouteError),
}

/// A route table file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesFile {
    /// Prepended to every route path.
    pub prefix: Option<String>,
    /// The redirect policy for matchers built from this table.
    pub redirect: RedirectPolicy,
    /// Route definitions, in priority order.
    pub routes: Vec<RouteConfig>,
}

/// A single route definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Unique route name.
    pub name: String,
    /// Path pattern, e.g. `/blog/{slug}`.
    pub path: String,
    /// Accepted methods. Empty means any method.
    #[serde(default)]
    pub methods: Vec<String>,
    /// Accepted schemes. Empty means any scheme.
    #[serde(default)]
    pub schemes: Vec<String>,
    /// Default parameter values.
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    /// Placeholder requirements.
    #[serde(default)]
    pub requirements: BTreeMap<String, String>,
    /// Match literal text without regard to case.
    #[serde(default)]
    pub case_insensitive: bool,
}

impl RouteConfig {
    /// Builds the route definition.
    pub fn to_route(&self) -> Route {
        let mut route = Route::new(&self.path)
            .methods(&self.methods)
            .schemes(&self.schemes)
            .case_insensitive(self.case_insensitive);

        for (name, value) in &self.defaults {
            route = route.default(name.as_str(), value.as_str());
        }

        for (name, regex) in &self.requirements {
            route = route.requirement(name.as_str(), regex);
        }

        route
    }
}

impl RoutesFile {
    /// Reads a route table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let file = toml::from_str(&content)?;

        tracing::debug!(path = %path.display(), "loaded route table");
        Ok(file)
    }

    /// Builds the route collection.
    pub fn to_collection(&self) -> Result<RouteCollection, RouteError> {
        let mut collection = RouteCollection::new();
        for route in &self.routes {
            collection.add(route.name.as_str(), route.to_route())?;
        }

        if let Some(prefix) = &self.prefix {
            collection.add_prefix(prefix)?;
        }

        Ok(collection)
    }
}

/// Loads and validates a route collection from a TOML file.
pub fn load_routes(path: &Path) -> Result<RouteCollection, ConfigError> {
    Ok(RoutesFile::load(path)?.to_collection()?)
}

/// Parses and validates a route collection from TOML text.
pub fn routes_from_str(content: &str) -> Result<RouteCollection, ConfigError> {
    let file: RoutesFile = toml::from_str(content)?;
    Ok(file.to_collection()?)
}
