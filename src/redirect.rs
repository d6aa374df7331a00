use crate::compiler::CompiledRoute;
use crate::error::MatchError;
use crate::path::toggle_trailing_slash;
use crate::request::RequestContext;

use serde::{Deserialize, Serialize};

/// Decides whether a near miss is answered with a redirect.
///
/// With trailing-slash redirection enabled, a `GET` or `HEAD` request for
/// `/foo` that only a route for `/foo/` would match is answered with
/// [`MatchError::RedirectTo`] instead of [`MatchError::NotFound`], and the
/// other way around. Redirect candidates are considered in route order like
/// any other candidate, so an earlier redirect wins over a later exact
/// match, and a redirect wins over a method mismatch.
///
/// Scheme corrections are left to the request layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RedirectPolicy {
    trailing_slash: bool,
}

impl RedirectPolicy {
    /// Never redirect, trailing-slash mismatches are not found.
    pub const fn none() -> Self {
        RedirectPolicy {
            trailing_slash: false,
        }
    }

    /// Redirect requests whose path only matches once its trailing slash is
    /// added or removed.
    pub const fn trailing_slash() -> Self {
        RedirectPolicy {
            trailing_slash: true,
        }
    }

    /// Returns `true` if trailing-slash mismatches are redirected.
    pub fn redirects_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    // Only GET and HEAD requests are redirected.
    pub(crate) fn applies(&self, raw_path: &str, ctx: &RequestContext) -> bool {
        self.trailing_slash && ctx.is_safe() && raw_path != "/" && !raw_path.is_empty()
    }

    // The redirect for a route matched through its trailing-slash variant.
    pub(crate) fn redirect(
        &self,
        raw_path: &str,
        decoded_path: &str,
        route: &CompiledRoute,
        ctx: &RequestContext,
    ) -> Option<MatchError> {
        if !self.applies(raw_path, ctx) {
            return None;
        }

        let methods = route.methods();
        if !methods.is_empty() && !methods.iter().any(|m| m == "GET") {
            return None;
        }

        let variant = route.pattern().slash_regex()?;
        if !variant.is_match(decoded_path) {
            return None;
        }

        Some(MatchError::RedirectTo {
            path: toggle_trailing_slash(raw_path)?,
            route: route.name().to_owned(),
        })
    }
}
