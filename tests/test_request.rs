use wicket::http::request::{Method, RequestBuilder};

#[test]
fn test_request_header_retrieval() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .header("Host", "example.com")
        .header("Content-Type", "application/json")
        .build()
        .unwrap();

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_keep_alive_absent_header_is_false() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .build()
        .unwrap();

    assert!(!req.wants_keep_alive());
}

#[test]
fn test_request_keep_alive_case_insensitive() {
    for value in ["keep-alive", "Keep-Alive", "KEEP-ALIVE"] {
        let req = RequestBuilder::new()
            .method(Method::GET)
            .path("/")
            .header("connection", value)
            .build()
            .unwrap();

        assert!(req.wants_keep_alive(), "{value}");
    }
}

#[test]
fn test_request_keep_alive_close() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/")
        .header("Connection", "close")
        .build()
        .unwrap();

    assert!(!req.wants_keep_alive());
}

#[test]
fn test_request_builder_splits_query() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .path("/search?q=a+b&lang=en%2Dgb&q=c")
        .build()
        .unwrap();

    assert_eq!(req.path, "/search");
    assert_eq!(
        req.query_params(),
        vec![
            ("q".to_string(), "a b".to_string()),
            ("lang".to_string(), "en-gb".to_string()),
            ("q".to_string(), "c".to_string()),
        ]
    );
    assert_eq!(req.query_param("q").as_deref(), Some("a b"));
    assert_eq!(req.query_param("missing"), None);
}

#[test]
fn test_request_builder_requires_method_and_path() {
    assert!(RequestBuilder::new().path("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
}

#[test]
fn test_request_method_parse() {
    assert_eq!(Method::parse("GET"), Some(Method::GET));
    assert_eq!(Method::parse("POST"), Some(Method::POST));
    assert_eq!(Method::parse("get"), Some(Method::Extension("get".to_string())));
    assert_eq!(Method::parse(""), None);
    assert_eq!(Method::parse("BAD METHOD"), None);
}

#[test]
fn test_request_method_display() {
    assert_eq!(Method::DELETE.to_string(), "DELETE");
    assert_eq!(Method::Extension("PURGE".into()).to_string(), "PURGE");
}
