use std::borrow::Cow;
use std::{fmt, iter, mem, slice};

/// A single route parameter, consisting of a key and a value.
#[derive(PartialEq, Eq, Ord, PartialOrd, Clone)]
struct Param<'m> {
    // Keys are borrowed from the matcher. Values are either defaults,
    // borrowed from the matcher as well, or decoded captures.
    key: &'m str,
    value: Cow<'m, str>,
}

const EMPTY: Param<'static> = Param {
    key: "",
    value: Cow::Borrowed(""),
};

impl Default for Param<'_> {
    fn default() -> Self {
        EMPTY
    }
}

/// The parameters of a successful match: defaults merged with the values
/// captured from the path.
///
/// ```rust
/// # use routematch::{Matcher, Route, RouteCollection, UrlMatcher};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let mut routes = RouteCollection::new();
/// # routes.add("user", Route::new("/users/{id}").default("tab", "profile"))?;
/// # let matcher = UrlMatcher::new(&routes)?;
/// let matched = matcher.match_path("/users/1")?;
///
/// // Iterate through the keys and values.
/// for (key, value) in matched.params.iter() {
///     println!("key: {}, value: {}", key, value);
/// }
///
/// // Get a specific value by name.
/// assert_eq!(matched.params.get("id"), Some("1"));
/// assert_eq!(matched.params.get("tab"), Some("profile"));
/// # Ok(())
/// # }
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Clone)]
pub struct Params<'m> {
    kind: ParamsKind<'m>,
}

// Most routes have a small number of parameters, so we can avoid
// heap allocations in the common case.
const SMALL: usize = 3;

// A list of parameters, optimized to avoid allocations when possible.
#[derive(PartialEq, Eq, Ord, PartialOrd, Clone)]
enum ParamsKind<'m> {
    Small([Param<'m>; SMALL], usize),
    Large(Vec<Param<'m>>),
}

impl<'m> Params<'m> {
    pub(crate) fn new() -> Self {
        Self {
            kind: ParamsKind::Small([EMPTY; SMALL], 0),
        }
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        match self.kind {
            ParamsKind::Small(_, len) => len,
            ParamsKind::Large(ref vec) => vec.len(),
        }
    }

    /// Returns the value of the parameter registered under the given key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.slice()
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_ref())
    }

    /// Returns an iterator over the parameters in the list.
    pub fn iter(&self) -> ParamsIter<'_, 'm> {
        ParamsIter::new(self)
    }

    /// Returns `true` if there are no parameters in the list.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts the parameters into owned key-value pairs.
    pub fn into_owned(self) -> Vec<(String, String)> {
        self.iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect()
    }

    // Sets a parameter, replacing the value of an existing key.
    pub(crate) fn set(&mut self, key: &'m str, value: Cow<'m, str>) {
        #[cold]
        fn drain_to_vec<T: Default>(len: usize, elem: T, arr: &mut [T; SMALL]) -> Vec<T> {
            let mut vec = Vec::with_capacity(len + 1);
            vec.extend(arr.iter_mut().map(mem::take));
            vec.push(elem);
            vec
        }

        if let Some(param) = self.slice_mut().iter_mut().find(|param| param.key == key) {
            param.value = value;
            return;
        }

        let param = Param { key, value };
        match &mut self.kind {
            ParamsKind::Small(arr, len) => {
                if *len == SMALL {
                    self.kind = ParamsKind::Large(drain_to_vec(*len, param, arr));
                    return;
                }

                arr[*len] = param;
                *len += 1;
            }
            ParamsKind::Large(vec) => vec.push(param),
        }
    }

    fn slice(&self) -> &[Param<'m>] {
        match &self.kind {
            ParamsKind::Small(arr, len) => &arr[..*len],
            ParamsKind::Large(vec) => vec,
        }
    }

    fn slice_mut(&mut self) -> &mut [Param<'m>] {
        match &mut self.kind {
            ParamsKind::Small(arr, len) => &mut arr[..*len],
            ParamsKind::Large(vec) => vec,
        }
    }
}

impl fmt::Debug for Params<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// An iterator over the keys and values of a match's [parameters](crate::Params).
pub struct ParamsIter<'ps, 'm> {
    inner: slice::Iter<'ps, Param<'m>>,
}

impl<'ps, 'm> ParamsIter<'ps, 'm> {
    fn new(params: &'ps Params<'m>) -> Self {
        Self {
            inner: params.slice().iter(),
        }
    }
}

impl<'ps, 'm> Iterator for ParamsIter<'ps, 'm> {
    type Item = (&'m str, &'ps str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|p| (p.key, p.value.as_ref()))
    }
}

impl ExactSizeIterator for ParamsIter<'_, '_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl iter::FusedIterator for ParamsIter<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_alloc() {
        let vec = vec![
            ("hello", "hello"),
            ("world", "world"),
            ("foo", "foo"),
            ("bar", "bar"),
            ("baz", "baz"),
        ];

        let mut params = Params::new();
        for (key, value) in vec.clone() {
            params.set(key, Cow::Borrowed(value));
            assert_eq!(params.get(key), Some(value));
        }

        match params.kind {
            ParamsKind::Large(..) => {}
            _ => panic!(),
        }

        assert!(params.iter().eq(vec.clone()));
    }

    #[test]
    fn stack_alloc() {
        let vec = vec![("hello", "hello"), ("world", "world"), ("baz", "baz")];

        let mut params = Params::new();
        for (key, value) in vec.clone() {
            params.set(key, Cow::Borrowed(value));
            assert_eq!(params.get(key), Some(value));
        }

        match params.kind {
            ParamsKind::Small(..) => {}
            _ => panic!(),
        }

        assert!(params.iter().eq(vec.clone()));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut params = Params::new();
        params.set("def", Cow::Borrowed("test"));
        params.set("bar", Cow::Owned("baz".to_owned()));
        params.set("def", Cow::Owned("override".to_owned()));

        assert_eq!(params.len(), 2);
        assert!(params.iter().eq(vec![("def", "override"), ("bar", "baz")]));
    }

    #[test]
    fn ignore_array_default() {
        let params = Params::new();
        assert!(params.get("").is_none());
    }
}
