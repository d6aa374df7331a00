// This file is generated by routematch. Do not edit.

/// Matches requests against the dumped routes.
#[derive(Clone, Debug)]
pub struct ProjectUrlMatcher {
    inner: ::routematch::CompiledUrlMatcher,
}

impl ProjectUrlMatcher {
    /// Builds the matcher from the dumped tables.
    pub fn new() -> ::std::result::Result<Self, ::routematch::RouteError> {
        let inner = ::routematch::CompiledUrlMatcher::new(tables(), ::routematch::RedirectPolicy::trailing_slash())?;
        Ok(ProjectUrlMatcher { inner })
    }
}

impl ::routematch::Matcher for ProjectUrlMatcher {
    fn match_request(
        &self,
        path: &str,
        ctx: &::routematch::RequestContext,
    ) -> ::std::result::Result<::routematch::Match<'_>, ::routematch::MatchError> {
        ::routematch::Matcher::match_request(&self.inner, path, ctx)
    }
}

fn tables() -> ::routematch::CompiledRoutes {
    ::routematch::CompiledRoutes {
        routes: vec![
            ::routematch::RouteEntry {
                name: "home".to_owned(),
                tokens: vec![
                    ::routematch::Token::Text("/".to_owned()),
                ],
                static_path: Some("/".to_owned()),
                regex_source: "^/$".to_owned(),
                slash_source: None,
                defaults: vec![],
                methods: vec![],
                schemes: vec![],
            },
            ::routematch::RouteEntry {
                name: "post".to_owned(),
                tokens: vec![
                    ::routematch::Token::Text("/posts".to_owned()),
                    ::routematch::Token::Variable { prefix: "/".to_owned(), name: "id".to_owned(), requirement: "\\d+".to_owned() },
                ],
                static_path: None,
                regex_source: "^/posts/(?P<id>\\d+)$".to_owned(),
                slash_source: Some("^/posts/(?P<id>\\d+)/$".to_owned()),
                defaults: vec![],
                methods: vec!["GET".to_owned()],
                schemes: vec![],
            },
            ::routematch::RouteEntry {
                name: "foo".to_owned(),
                tokens: vec![
                    ::routematch::Token::Text("/foo/".to_owned()),
                ],
                static_path: Some("/foo/".to_owned()),
                regex_source: "^/foo/$".to_owned(),
                slash_source: Some("^/foo$".to_owned()),
                defaults: vec![],
                methods: vec![],
                schemes: vec![],
            },
            ::routematch::RouteEntry {
                name: "quote".to_owned(),
                tokens: vec![
                    ::routematch::Token::Text("/say/\"hi\"".to_owned()),
                ],
                static_path: Some("/say/\"hi\"".to_owned()),
                regex_source: "^/say/\"hi\"$".to_owned(),
                slash_source: Some("^/say/\"hi\"/$".to_owned()),
                defaults: vec![],
                methods: vec![],
                schemes: vec![],
            },
            ::routematch::RouteEntry {
                name: "list".to_owned(),
                tokens: vec![
                    ::routematch::Token::Text("/list".to_owned()),
                    ::routematch::Token::Variable { prefix: "/".to_owned(), name: "page".to_owned(), requirement: "[^/]+".to_owned() },
                ],
                static_path: None,
                regex_source: "^/list(?:/(?P<page>[^/]+))?$".to_owned(),
                slash_source: Some("^/list(?:/(?P<page>[^/]+))?/$".to_owned()),
                defaults: vec![("page".to_owned(), "1".to_owned())],
                methods: vec![],
                schemes: vec![],
            },
        ],
        static_paths: vec![
            ("/".to_owned(), vec![0]),
            ("/foo/".to_owned(), vec![2]),
            ("/say/\"hi\"".to_owned(), vec![3]),
        ],
        dynamic: vec![1, 4],
    }
}
