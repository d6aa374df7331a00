#![no_main]
use libfuzzer_sys::fuzz_target;
use routematch::{CompiledUrlMatcher, Matcher, RedirectPolicy, RequestContext, Route, RouteCollection, UrlMatcher};

fuzz_target!(|data: (Vec<(String, String)>, String, bool)| {
    let mut routes = RouteCollection::new();

    for (i, (pattern, method)) in data.0.into_iter().enumerate() {
        let route = Route::new(pattern).methods([method]);
        if routes.add(format!("route_{}", i), route).is_err() {
            return;
        }
    }

    let redirect = if data.2 {
        RedirectPolicy::trailing_slash()
    } else {
        RedirectPolicy::none()
    };

    let interpretive = match UrlMatcher::new(&routes) {
        Ok(matcher) => matcher.with_redirect(redirect),
        Err(_) => return,
    };
    let compiled = match CompiledUrlMatcher::from_collection(&routes, redirect) {
        Ok(matcher) => matcher,
        Err(_) => return,
    };

    for method in ["GET", "HEAD", "POST"] {
        let ctx = RequestContext::new(method);
        assert_eq!(
            interpretive.match_request(&data.1, &ctx),
            compiled.match_request(&data.1, &ctx)
        );
    }
});
