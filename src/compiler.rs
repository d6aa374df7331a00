//! Compiles route patterns into regular expressions.
//!
//! A pattern such as `/blog/{slug}.{_format}` is split into tokens:
//!
//! ```text
//!  Text("/blog")
//!  Variable { prefix: "/", name: "slug",    requirement: "[^/\.]+" }
//!  Variable { prefix: ".", name: "_format", requirement: "[^/]+" }
//! ```
//!
//! A variable's prefix is the separator directly in front of it, which lets
//! an optional variable swallow its separator: with a default for `_format`
//! the regex becomes `^/blog/(?P<slug>[^/\.]+)(?:\.(?P<_format>[^/]+))?$`
//! and `/blog/hello` matches.
//!
//! Placeholders can carry an inline requirement and default:
//!
//! ```text
//!  {page<\d+>?1}    requirement \d+, default 1
//!  {page?}          default ""
//! ```
//!
//! Explicit requirements and defaults declared on the route take precedence
//! over inline ones.
use crate::error::RouteError;
use crate::route::{sanitize_requirement, Route};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// characters that may separate two path elements
const SEPARATORS: &str = "/,;.:-_~+*=@|";

// placeholder names longer than this are rejected
const MAX_NAME_LEN: usize = 32;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{([^{}<>?]*)(<.*?>)?(\?[^{}]*)?\}").expect("placeholder syntax is a valid regex")
});

static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("name syntax is a valid regex"));

/// A piece of a compiled pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Literal text.
    Text(String),
    /// A placeholder, with the separator that precedes it.
    Variable {
        /// The separator in front of the placeholder, or the empty string.
        prefix: String,
        /// The placeholder name.
        name: String,
        /// The regex the captured value must match.
        requirement: String,
    },
}

/// The regex form of a route pattern.
///
/// Compiling is deterministic: the same route always yields the same
/// tokens and regex sources.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    tokens: Vec<Token>,
    variables: Vec<String>,
    static_path: Option<String>,
    regex_source: String,
    slash_source: Option<String>,
    regex: Regex,
    slash_regex: Option<Regex>,
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
            && self.regex_source == other.regex_source
            && self.slash_source == other.slash_source
    }
}

impl Eq for CompiledPattern {}

impl CompiledPattern {
    /// Rebuilds a pattern from previously compiled parts.
    pub fn from_parts(
        tokens: Vec<Token>,
        static_path: Option<String>,
        regex_source: String,
        slash_source: Option<String>,
    ) -> Result<Self, RouteError> {
        let variables = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable { name, .. } => Some(name.clone()),
                Token::Text(_) => None,
            })
            .collect();

        let regex = build_regex("", &regex_source)?;
        let slash_regex = slash_source
            .as_deref()
            .map(|source| build_regex("", source))
            .transpose()?;

        Ok(CompiledPattern {
            tokens,
            variables,
            static_path,
            regex_source,
            slash_source,
            regex,
            slash_regex,
        })
    }

    /// The tokens, in pattern order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The placeholder names, in pattern order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// The literal path, if the pattern has no placeholders and is matched
    /// case-sensitively. Percent signs are encoded as `%25`.
    pub fn static_path(&self) -> Option<&str> {
        self.static_path.as_deref()
    }

    /// The anchored regex source.
    pub fn regex_source(&self) -> &str {
        &self.regex_source
    }

    /// The regex source of the pattern with its trailing slash toggled.
    pub fn slash_source(&self) -> Option<&str> {
        self.slash_source.as_deref()
    }

    /// The anchored regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The regex matching the pattern with its trailing slash toggled.
    pub fn slash_regex(&self) -> Option<&Regex> {
        self.slash_regex.as_ref()
    }
}

/// A compiled route, ready for matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledRoute {
    pub(crate) name: String,
    pub(crate) pattern: CompiledPattern,
    pub(crate) defaults: BTreeMap<String, String>,
    pub(crate) methods: Vec<String>,
    pub(crate) schemes: Vec<String>,
}

impl CompiledRoute {
    /// Compiles a route definition.
    pub fn new(name: impl Into<String>, route: &Route) -> Result<Self, RouteError> {
        let compiled = compile(route)?;

        Ok(CompiledRoute {
            name: name.into(),
            pattern: compiled.pattern,
            defaults: compiled.defaults,
            methods: route.get_methods().to_vec(),
            schemes: route.get_schemes().to_vec(),
        })
    }

    /// The route name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// The default parameter values, inline defaults included.
    pub fn defaults(&self) -> &BTreeMap<String, String> {
        &self.defaults
    }

    /// The accepted methods. Empty means any method.
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// The accepted schemes. Empty means any scheme.
    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }
}

struct Compiled {
    pattern: CompiledPattern,
    defaults: BTreeMap<String, String>,
}

// A placeholder found while scanning the pattern.
struct Placeholder<'p> {
    start: usize,
    end: usize,
    name: &'p str,
    requirement: Option<&'p str>,
    default: Option<&'p str>,
}

fn compile(route: &Route) -> Result<Compiled, RouteError> {
    let pattern = route.pattern();
    let placeholders = scan(pattern)?;

    let mut defaults = route.defaults().clone();
    let mut requirements = route.requirements().clone();
    for placeholder in &placeholders {
        if let Some(default) = placeholder.default {
            defaults
                .entry(placeholder.name.to_owned())
                .or_insert_with(|| default.to_owned());
        }

        if let Some(requirement) = placeholder.requirement {
            requirements
                .entry(placeholder.name.to_owned())
                .or_insert_with(|| sanitize_requirement(requirement));
        }
    }

    let mut tokens = Vec::new();
    let mut variables: Vec<String> = Vec::new();
    let mut pos = 0;

    for placeholder in &placeholders {
        let preceding = &pattern[pos..placeholder.start];
        pos = placeholder.end;

        let separator = preceding
            .chars()
            .last()
            .filter(|c| SEPARATORS.contains(*c));

        let prefix = match separator {
            Some(c) => {
                let text = &preceding[..preceding.len() - c.len_utf8()];
                if !text.is_empty() {
                    tokens.push(Token::Text(text.to_owned()));
                }
                c.to_string()
            }
            None => {
                if !preceding.is_empty() {
                    tokens.push(Token::Text(preceding.to_owned()));
                }
                String::new()
            }
        };

        if variables.iter().any(|v| v == placeholder.name) {
            return Err(RouteError::DuplicatePlaceholder {
                name: placeholder.name.to_owned(),
                pattern: pattern.to_owned(),
            });
        }

        let requirement = match requirements.get(placeholder.name) {
            Some(requirement) => {
                validate_requirement(placeholder.name, requirement)?;
                requirement.clone()
            }
            None => default_requirement(&pattern[pos..]),
        };

        variables.push(placeholder.name.to_owned());
        tokens.push(Token::Variable {
            prefix,
            name: placeholder.name.to_owned(),
            requirement,
        });
    }

    if pos < pattern.len() {
        tokens.push(Token::Text(pattern[pos..].to_owned()));
    }

    if let Some(name) = requirements.keys().find(|name| !variables.contains(*name)) {
        return Err(RouteError::UnknownRequirement {
            name: name.clone(),
            pattern: pattern.to_owned(),
        });
    }

    // trailing variables with a default are optional, text ends the run
    let mut first_optional = tokens.len();
    for (i, token) in tokens.iter().enumerate().rev() {
        match token {
            Token::Variable { name, .. } if defaults.contains_key(name) => first_optional = i,
            _ => break,
        }
    }

    let flags = if route.is_case_insensitive() { "(?i)" } else { "" };
    let regex_source = format!("{}^{}$", flags, regex_body(&tokens, first_optional));

    let slash_source = if pattern == "/" {
        None
    } else {
        match tokens.last() {
            Some(Token::Text(text)) if text.ends_with('/') => {
                let mut toggled = tokens.clone();
                let trimmed = text[..text.len() - 1].to_owned();
                toggled.pop();
                if !trimmed.is_empty() {
                    toggled.push(Token::Text(trimmed));
                }
                let body = regex_body(&toggled, toggled.len());
                Some(format!("{}^{}$", flags, body))
            }
            _ => Some(format!("{}^{}/$", flags, regex_body(&tokens, first_optional))),
        }
    };

    let static_path = if variables.is_empty() && !route.is_case_insensitive() {
        Some(pattern.replace('%', "%25"))
    } else {
        None
    };

    let regex = build_regex(pattern, &regex_source)?;
    let slash_regex = slash_source
        .as_deref()
        .map(|source| build_regex(pattern, source))
        .transpose()?;

    Ok(Compiled {
        pattern: CompiledPattern {
            tokens,
            variables,
            static_path,
            regex_source,
            slash_source,
            regex,
            slash_regex,
        },
        defaults,
    })
}

// Finds every placeholder, rejecting stray or unbalanced braces.
fn scan(pattern: &str) -> Result<Vec<Placeholder<'_>>, RouteError> {
    let malformed = |position| RouteError::MalformedPlaceholder {
        pattern: pattern.to_owned(),
        position,
    };

    let mut placeholders = Vec::new();
    let mut i = 0;

    while let Some(offset) = pattern[i..].find(|c: char| c == '{' || c == '}') {
        let start = i + offset;
        if pattern[start..].starts_with('}') {
            return Err(malformed(start));
        }

        let captures = PLACEHOLDER
            .captures(&pattern[start..])
            .ok_or_else(|| malformed(start))?;

        let whole = captures.get(0).ok_or_else(|| malformed(start))?;
        let name = captures.get(1).map_or("", |m| m.as_str());

        if name.is_empty() {
            return Err(malformed(start));
        }

        if name.len() > MAX_NAME_LEN || !NAME.is_match(name) {
            return Err(RouteError::InvalidPlaceholderName {
                name: name.to_owned(),
                pattern: pattern.to_owned(),
            });
        }

        let requirement = captures
            .get(2)
            .map(|m| &m.as_str()[1..m.as_str().len() - 1]);
        let default = captures.get(3).map(|m| &m.as_str()[1..]);

        placeholders.push(Placeholder {
            start,
            end: start + whole.end(),
            name,
            requirement,
            default,
        });

        i = start + whole.end();
    }

    Ok(placeholders)
}

// The default requirement matches up to the next separator.
fn default_requirement(following: &str) -> String {
    let next = following
        .chars()
        .next()
        .filter(|c| *c != '/' && *c != '{' && SEPARATORS.contains(*c));

    match next {
        Some(c) => format!("[^/{}]+", regex::escape(&c.to_string())),
        None => "[^/]+".to_owned(),
    }
}

fn validate_requirement(name: &str, requirement: &str) -> Result<(), RouteError> {
    let invalid = |reason: String| RouteError::InvalidRequirement {
        name: name.to_owned(),
        reason,
    };

    if requirement.is_empty() {
        return Err(invalid("requirement is empty".to_owned()));
    }

    Regex::new(&format!("^(?:{})$", requirement))
        .map(|_| ())
        .map_err(|err| invalid(err.to_string()))
}

fn regex_body(tokens: &[Token], first_optional: usize) -> String {
    let mut body = String::new();
    for i in 0..tokens.len() {
        body.push_str(&token_regex(tokens, i, first_optional));
    }
    body
}

fn token_regex(tokens: &[Token], index: usize, first_optional: usize) -> String {
    match &tokens[index] {
        Token::Text(text) => escape_text(text),
        Token::Variable {
            prefix,
            name,
            requirement,
        } => {
            // the leading separator stays required when every token is
            // optional, and the first group spans the whole tail
            if index == 0 && first_optional == 0 {
                if tokens.len() == 1 {
                    return format!("{}(?P<{}>{})?", escape_text(prefix), name, requirement);
                }
                return format!("{}(?:(?P<{}>{})", escape_text(prefix), name, requirement);
            }

            let mut regex = format!("{}(?P<{}>{})", escape_text(prefix), name, requirement);
            if index >= first_optional {
                regex.insert_str(0, "(?:");

                let last = tokens.len() - 1;
                if index == last {
                    regex.push_str(&")?".repeat(tokens.len() - first_optional));
                }
            }
            regex
        }
    }
}

// Literal percent signs are matched in their encoded form, see `path::decode`.
fn escape_text(text: &str) -> String {
    regex::escape(&text.replace('%', "%25"))
}

fn build_regex(pattern: &str, source: &str) -> Result<Regex, RouteError> {
    Regex::new(source).map_err(|err| RouteError::InvalidRequirement {
        name: pattern.to_owned(),
        reason: err.to_string(),
    })
}
