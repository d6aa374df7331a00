use crate::compiler::CompiledRoute;
use crate::error::RouteError;
use crate::route::{sanitize_requirement, Route};

use std::collections::HashMap;

/// An ordered set of named routes.
///
/// Insertion order is match priority: the first route added is the first
/// route tried. Names are unique, and every route is compiled when it is
/// added so configuration errors surface immediately.
///
/// ```rust
/// use routematch::{Route, RouteCollection, RouteError};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut routes = RouteCollection::new();
/// routes.add("home", Route::new("/"))?;
/// routes.add("post", Route::new("/posts/{id}"))?;
///
/// assert_eq!(
///     routes.add("home", Route::new("/index")),
///     Err(RouteError::DuplicateName { name: "home".into() })
/// );
/// assert_eq!(routes.names().collect::<Vec<_>>(), ["home", "post"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteCollection {
    routes: Vec<(String, Route)>,
    index: HashMap<String, usize>,
}

impl RouteCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route, which will be tried after every route already added.
    pub fn add(&mut self, name: impl Into<String>, route: Route) -> Result<(), RouteError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(RouteError::DuplicateName { name });
        }

        CompiledRoute::new(name.as_str(), &route)?;

        self.index.insert(name.clone(), self.routes.len());
        self.routes.push((name, route));
        Ok(())
    }

    /// Returns the route registered under the given name.
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.index.get(name).map(|&i| &self.routes[i].1)
    }

    /// Removes a route, keeping the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Route> {
        let i = self.index.remove(name)?;
        let (_, route) = self.routes.remove(i);

        for position in self.index.values_mut() {
            if *position > i {
                *position -= 1;
            }
        }

        Some(route)
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the collection has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the routes in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    /// Iterates over the route names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(name, _)| name.as_str())
    }

    /// Appends the routes of another collection, in its order.
    ///
    /// Fails without modifying `self` if a name is already registered.
    pub fn merge(&mut self, other: RouteCollection) -> Result<(), RouteError> {
        if let Some(name) = other.names().find(|name| self.index.contains_key(*name)) {
            return Err(RouteError::DuplicateName {
                name: name.to_owned(),
            });
        }

        for (name, route) in other.routes {
            self.index.insert(name.clone(), self.routes.len());
            self.routes.push((name, route));
        }
        Ok(())
    }

    /// Prefixes the pattern of every route.
    ///
    /// ```rust
    /// use routematch::{Route, RouteCollection};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut routes = RouteCollection::new();
    /// routes.add("index", Route::new("/"))?;
    /// routes.add("show", Route::new("/{id}"))?;
    /// routes.add_prefix("/blog/")?;
    ///
    /// assert_eq!(routes.get("index").unwrap().pattern(), "/blog/");
    /// assert_eq!(routes.get("show").unwrap().pattern(), "/blog/{id}");
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_prefix(&mut self, prefix: &str) -> Result<(), RouteError> {
        let prefix = prefix.trim().trim_end_matches('/');
        if prefix.is_empty() {
            return Ok(());
        }

        self.update(|route| {
            let pattern = format!("{}{}", prefix, route.pattern());
            route.set_pattern(&pattern);
        })
    }

    /// Adds defaults to every route, overriding existing values.
    pub fn add_defaults<K, V>(&mut self, defaults: impl IntoIterator<Item = (K, V)>) -> Result<(), RouteError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let defaults: Vec<(String, String)> = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        self.update(|route| route.defaults_mut().extend(defaults.iter().cloned()))
    }

    /// Adds requirements to every route that has the corresponding
    /// placeholder, overriding existing requirements.
    pub fn add_requirements<K, V>(
        &mut self,
        requirements: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), RouteError>
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        let requirements: Vec<(String, String)> = requirements
            .into_iter()
            .map(|(k, v)| (k.into(), sanitize_requirement(v.as_ref())))
            .collect();

        let mut updated = self.clone();
        for (name, route) in updated.routes.iter_mut() {
            let compiled = CompiledRoute::new(name.as_str(), route)?;
            for (key, requirement) in &requirements {
                if compiled.pattern().variables().contains(key) {
                    route.requirements_mut().insert(key.clone(), requirement.clone());
                }
            }
            CompiledRoute::new(name.as_str(), route)?;
        }

        *self = updated;
        Ok(())
    }

    /// Restricts every route to the given methods.
    pub fn set_methods<S: AsRef<str>>(&mut self, methods: &[S]) -> Result<(), RouteError> {
        self.update(|route| *route = std::mem::take(route).methods(methods))
    }

    /// Restricts every route to the given schemes.
    pub fn set_schemes<S: AsRef<str>>(&mut self, schemes: &[S]) -> Result<(), RouteError> {
        self.update(|route| *route = std::mem::take(route).schemes(schemes))
    }

    /// Compiles every route, in priority order.
    pub fn compile(&self) -> Result<CompiledCollection, RouteError> {
        let routes = self
            .routes
            .iter()
            .map(|(name, route)| CompiledRoute::new(name.as_str(), route))
            .collect::<Result<Vec<_>, _>>()?;

        CompiledCollection::new(routes)
    }

    // Applies a change to every route, keeping the collection untouched if
    // any changed route fails to compile.
    fn update(&mut self, mut f: impl FnMut(&mut Route)) -> Result<(), RouteError> {
        let mut updated = self.clone();
        for (name, route) in updated.routes.iter_mut() {
            f(route);
            CompiledRoute::new(name.as_str(), route)?;
        }

        *self = updated;
        Ok(())
    }
}

/// The compiled form of a [`RouteCollection`].
///
/// Compiled once and then shared, read-only, by any number of matchers and
/// generators. Rebuilding routes means compiling a new collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledCollection {
    routes: Vec<CompiledRoute>,
    index: HashMap<String, usize>,
}

impl CompiledCollection {
    /// Creates a collection from compiled routes, in priority order.
    pub fn new(routes: Vec<CompiledRoute>) -> Result<Self, RouteError> {
        let mut index = HashMap::with_capacity(routes.len());
        for (i, route) in routes.iter().enumerate() {
            if index.insert(route.name().to_owned(), i).is_some() {
                return Err(RouteError::DuplicateName {
                    name: route.name().to_owned(),
                });
            }
        }

        tracing::debug!(
            routes = routes.len(),
            static_routes = routes.iter().filter(|r| r.pattern().static_path().is_some()).count(),
            "compiled route collection"
        );

        Ok(CompiledCollection { routes, index })
    }

    /// Returns the route registered under the given name.
    pub fn get(&self, name: &str) -> Option<&CompiledRoute> {
        self.index.get(name).map(|&i| &self.routes[i])
    }

    /// Returns the route at the given priority.
    pub fn at(&self, i: usize) -> Option<&CompiledRoute> {
        self.routes.get(i)
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the collection has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the routes in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRoute> {
        self.routes.iter()
    }
}
