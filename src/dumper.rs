//! Generates Rust source for a matcher specialized to one route collection.
//!
//! The generated module defines a struct wrapping a
//! [`CompiledUrlMatcher`](crate::CompiledUrlMatcher) whose tables are
//! written out as literals, so nothing is parsed or compiled from route
//! patterns at startup. The output is deterministic: dumping the same
//! collection twice yields identical source.
use crate::collection::CompiledCollection;
use crate::compiled::{CompiledRoutes, RouteEntry};
use crate::compiler::Token;

use std::fmt;

/// Options for the generated matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpOptions {
    /// The name of the generated struct.
    pub type_name: String,
    /// The trait the generated struct implements. It must declare
    /// `match_request` with the signature of [`Matcher`](crate::Matcher).
    pub base_trait: String,
    /// Whether the generated matcher redirects trailing-slash mismatches.
    pub redirect_trailing_slash: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            type_name: "ProjectUrlMatcher".to_owned(),
            base_trait: "::routematch::Matcher".to_owned(),
            redirect_trailing_slash: false,
        }
    }
}

/// Dumps a compiled collection as Rust source.
///
/// ```rust
/// use routematch::{DumpOptions, Route, RouteCollection, RustMatcherDumper};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut routes = RouteCollection::new();
/// routes.add("home", Route::new("/"))?;
///
/// let compiled = routes.compile()?;
/// let source = RustMatcherDumper::new(&compiled).dump(&DumpOptions::default());
///
/// assert!(source.contains("pub struct ProjectUrlMatcher"));
/// assert!(source.contains("impl ::routematch::Matcher for ProjectUrlMatcher"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct RustMatcherDumper {
    tables: CompiledRoutes,
}

impl RustMatcherDumper {
    /// Creates a dumper for the given routes.
    pub fn new(routes: &CompiledCollection) -> Self {
        RustMatcherDumper {
            tables: CompiledRoutes::new(routes),
        }
    }

    /// Returns the tables that will be written out.
    pub fn tables(&self) -> &CompiledRoutes {
        &self.tables
    }

    /// Generates the source of the matcher.
    pub fn dump(&self, options: &DumpOptions) -> String {
        let out = Source {
            tables: &self.tables,
            options,
        }
        .to_string();

        tracing::debug!(
            type_name = options.type_name.as_str(),
            routes = self.tables.routes.len(),
            bytes = out.len(),
            "dumped url matcher"
        );

        out
    }
}

// The generated source, rendered through `Display`.
struct Source<'a> {
    tables: &'a CompiledRoutes,
    options: &'a DumpOptions,
}

impl fmt::Display for Source<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self.options;
        let name = &options.type_name;
        let redirect = if options.redirect_trailing_slash {
            "::routematch::RedirectPolicy::trailing_slash()"
        } else {
            "::routematch::RedirectPolicy::none()"
        };

        writeln!(out, "// This file is generated by routematch. Do not edit.")?;
        writeln!(out)?;
        writeln!(out, "/// Matches requests against the dumped routes.")?;
        writeln!(out, "#[derive(Clone, Debug)]")?;
        writeln!(out, "pub struct {} {{", name)?;
        writeln!(out, "    inner: ::routematch::CompiledUrlMatcher,")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "impl {} {{", name)?;
        writeln!(out, "    /// Builds the matcher from the dumped tables.")?;
        writeln!(
            out,
            "    pub fn new() -> ::std::result::Result<Self, ::routematch::RouteError> {{"
        )?;
        writeln!(
            out,
            "        let inner = ::routematch::CompiledUrlMatcher::new(tables(), {})?;",
            redirect
        )?;
        writeln!(out, "        Ok({} {{ inner }})", name)?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "impl {} for {} {{", options.base_trait, name)?;
        writeln!(out, "    fn match_request(")?;
        writeln!(out, "        &self,")?;
        writeln!(out, "        path: &str,")?;
        writeln!(out, "        ctx: &::routematch::RequestContext,")?;
        writeln!(
            out,
            "    ) -> ::std::result::Result<::routematch::Match<'_>, ::routematch::MatchError> {{"
        )?;
        writeln!(
            out,
            "        ::routematch::Matcher::match_request(&self.inner, path, ctx)"
        )?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "fn tables() -> ::routematch::CompiledRoutes {{")?;
        writeln!(out, "    ::routematch::CompiledRoutes {{")?;

        writeln!(out, "        routes: vec![")?;
        for entry in &self.tables.routes {
            write_entry(out, entry)?;
        }
        writeln!(out, "        ],")?;

        writeln!(out, "        static_paths: vec![")?;
        for (path, indices) in &self.tables.static_paths {
            writeln!(out, "            ({}, vec!{:?}),", string(path), indices)?;
        }
        writeln!(out, "        ],")?;

        writeln!(out, "        dynamic: vec!{:?},", self.tables.dynamic)?;
        writeln!(out, "    }}")?;
        writeln!(out, "}}")
    }
}

fn write_entry(out: &mut fmt::Formatter<'_>, entry: &RouteEntry) -> fmt::Result {
    writeln!(out, "            ::routematch::RouteEntry {{")?;
    writeln!(out, "                name: {},", string(&entry.name))?;

    writeln!(out, "                tokens: vec![")?;
    for token in &entry.tokens {
        match token {
            Token::Text(text) => {
                writeln!(out, "                    ::routematch::Token::Text({}),", string(text))?
            }
            Token::Variable {
                prefix,
                name,
                requirement,
            } => writeln!(
                out,
                "                    ::routematch::Token::Variable {{ prefix: {}, name: {}, requirement: {} }},",
                string(prefix),
                string(name),
                string(requirement)
            )?,
        }
    }
    writeln!(out, "                ],")?;

    writeln!(out, "                static_path: {},", optional(entry.static_path.as_deref()))?;
    writeln!(out, "                regex_source: {},", string(&entry.regex_source))?;
    writeln!(out, "                slash_source: {},", optional(entry.slash_source.as_deref()))?;
    writeln!(out, "                defaults: vec![{}],", pairs(&entry.defaults))?;
    writeln!(out, "                methods: vec![{}],", list(&entry.methods))?;
    writeln!(out, "                schemes: vec![{}],", list(&entry.schemes))?;
    writeln!(out, "            }},")
}

// `str`'s debug output is a valid Rust string literal.
fn string(s: &str) -> String {
    format!("{:?}.to_owned()", s)
}

fn optional(s: Option<&str>) -> String {
    match s {
        Some(s) => format!("Some({})", string(s)),
        None => "None".to_owned(),
    }
}

fn list(values: &[String]) -> String {
    values.iter().map(|v| string(v)).collect::<Vec<_>>().join(", ")
}

fn pairs(values: &[(String, String)]) -> String {
    values
        .iter()
        .map(|(k, v)| format!("({}, {})", string(k), string(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::RouteCollection;
    use crate::route::Route;

    fn compiled() -> CompiledCollection {
        let mut routes = RouteCollection::new();
        routes.add("home", Route::new("/")).unwrap();
        routes
            .add(
                "post",
                Route::new("/posts/{id}")
                    .requirement("id", r"\d+")
                    .default("_format", "html")
                    .methods(["GET"]),
            )
            .unwrap();
        routes.compile().unwrap()
    }

    #[test]
    fn escapes_literals() {
        assert_eq!(string(r#"a"b\c"#), r#""a\"b\\c".to_owned()"#);
        assert_eq!(optional(None), "None");
    }

    #[test]
    fn dumps_tables() {
        let source = RustMatcherDumper::new(&compiled()).dump(&DumpOptions::default());

        assert!(source.contains(r#"name: "post".to_owned(),"#));
        assert!(source.contains(r#"regex_source: "^/posts/(?P<id>\\d+)$".to_owned(),"#));
        assert!(source.contains(r#"defaults: vec![("_format".to_owned(), "html".to_owned())],"#));
        assert!(source.contains(r#"methods: vec!["GET".to_owned()],"#));
        assert!(source.contains(r#"("/".to_owned(), vec![0]),"#));
        assert!(source.contains("dynamic: vec![1],"));
        assert!(source.contains("::routematch::RedirectPolicy::none()"));
    }

    #[test]
    fn dump_options() {
        let options = DumpOptions {
            type_name: "AppMatcher".to_owned(),
            base_trait: "crate::routing::Matcher".to_owned(),
            redirect_trailing_slash: true,
        };
        let source = RustMatcherDumper::new(&compiled()).dump(&options);

        assert!(source.contains("pub struct AppMatcher {"));
        assert!(source.contains("impl crate::routing::Matcher for AppMatcher {"));
        assert!(source.contains("::routematch::RedirectPolicy::trailing_slash()"));
    }

    #[test]
    fn dump_is_deterministic() {
        let options = DumpOptions::default();
        assert_eq!(
            RustMatcherDumper::new(&compiled()).dump(&options),
            RustMatcherDumper::new(&compiled()).dump(&options)
        );
    }
}
