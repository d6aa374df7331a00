use routematch::{config, GenerateError, Matcher, RedirectPolicy, Route, RouteCollection, UrlGenerator, UrlMatcher};

use std::sync::Arc;

const NONE: [(&str, &str); 0] = [];

fn blog() -> RouteCollection {
    let mut routes = RouteCollection::new();
    routes
        .add(
            "blog_list",
            Route::new("/blog/{page}.{_format}")
                .requirement("page", r"\d+")
                .default("page", "1")
                .default("_format", "html"),
        )
        .unwrap();
    routes.add("blog_show", Route::new("/blog/posts/{slug}")).unwrap();
    routes
}

#[test]
fn generated_paths_match_their_route() {
    let routes = blog();
    let compiled = Arc::new(routes.compile().unwrap());
    let generator = UrlGenerator::new(compiled.clone()).unwrap();
    let matcher = UrlMatcher::from_compiled(compiled);

    let cases: Vec<(&str, Vec<(&str, &str)>)> = vec![
        ("blog_list", vec![]),
        ("blog_list", vec![("page", "3")]),
        ("blog_list", vec![("page", "3"), ("_format", "rss")]),
        ("blog_show", vec![("slug", "hello world")]),
        ("blog_show", vec![("slug", "a/b")]),
        ("blog_show", vec![("slug", "100%")]),
    ];

    for (name, params) in cases {
        let url = generator.generate(name, params.clone()).unwrap();
        let matched = matcher.match_path(&url).unwrap();
        assert_eq!(matched.route, name, "{}", url);

        for (key, value) in params {
            assert_eq!(matched.params.get(key), Some(value), "{}", url);
        }
    }
}

#[test]
fn generation_errors() {
    let generator = UrlGenerator::from_collection(&blog()).unwrap();

    assert_eq!(
        generator.generate("blog_show", NONE),
        Err(GenerateError::MissingParameters {
            route: "blog_show".into(),
            missing: vec!["slug".into()]
        })
    );
    assert!(matches!(
        generator.generate("blog_list", [("page", "two")]),
        Err(GenerateError::InvalidParameter { name, .. }) if name == "page"
    ));
    assert_eq!(
        generator.generate("missing", NONE),
        Err(GenerateError::UnknownRoute("missing".into()))
    );
}

#[test]
fn routes_from_config_file() {
    let table = r#"
        prefix = "/shop"

        [redirect]
        trailing_slash = true

        [[routes]]
        name = "product"
        path = "/products/{id}/"
        requirements = { id = '\d+' }

        [[routes]]
        name = "cart_add"
        path = "/cart"
        methods = ["POST"]
    "#;

    let path = std::env::temp_dir().join(format!("routematch-{}.toml", std::process::id()));
    std::fs::write(&path, table).unwrap();

    let file = config::RoutesFile::load(&path).unwrap();
    let routes = config::load_routes(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(file.redirect, RedirectPolicy::trailing_slash());

    let matcher = UrlMatcher::new(&routes).unwrap().with_redirect(file.redirect);
    assert_eq!(matcher.match_path("/shop/products/9/").unwrap().route, "product");
    assert_eq!(
        matcher.match_path("/shop/products/9").unwrap_err().status(),
        301
    );
    assert_eq!(
        matcher.match_path("/shop/cart").unwrap_err().allow_header().as_deref(),
        Some("POST")
    );

    let generator = UrlGenerator::from_collection(&routes).unwrap();
    assert_eq!(
        generator.generate("product", [("id", "9")]).unwrap(),
        "/shop/products/9/"
    );
}
