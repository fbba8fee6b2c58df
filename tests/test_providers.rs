//! Tests for the built-in resource providers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use wicket::dispatch::{FilterAction, FilterMapping, ResourceProvider};
use wicket::error::DispatchError;
use wicket::http::request::{Method, Request, RequestBuilder};
use wicket::http::response::{Response, StatusCode};
use wicket::providers::{FileSystemProvider, HandlerProvider};

fn get(path: &str) -> Request {
    RequestBuilder::new()
        .method(Method::GET)
        .path(path)
        .build()
        .unwrap()
}

fn document_root() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/index.html"), "<h1>Docs</h1>").unwrap();
    std::fs::write(dir.path().join("hello.txt"), "Hello\n").unwrap();
    dir
}

#[test]
fn test_files_can_load_only_regular_files() {
    let root = document_root();
    let files = FileSystemProvider::new(root.path());

    assert!(files.can_load("/hello.txt"));
    assert!(files.can_load("/docs/index.html"));
    assert!(!files.can_load("/docs"));
    assert!(!files.can_load("/docs/"));
    assert!(!files.can_load("/missing.txt"));
    assert!(!files.can_load("/../hello.txt"));
}

#[tokio::test]
async fn test_files_load_sets_body_and_type() {
    let root = document_root();
    let files = FileSystemProvider::new(root.path());
    let request = get("/hello.txt");

    let mut response = Response::default();
    files.load("/hello.txt", &request, &mut response).await.unwrap();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello\n".to_vec());
    assert_eq!(response.header("Content-Type"), Some("text/plain; charset=utf-8"));
    assert!(response.header("Last-Modified").is_some());
}

#[tokio::test]
async fn test_files_load_vanished_file_is_not_found() {
    let root = document_root();
    let files = FileSystemProvider::new(root.path());
    let request = get("/hello.txt");

    assert!(files.can_load("/hello.txt"));
    std::fs::remove_file(root.path().join("hello.txt")).unwrap();

    let mut response = Response::default();
    let err = files
        .load("/hello.txt", &request, &mut response)
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::NotFound { .. }));
}

#[tokio::test]
async fn test_handlers_route_exact_paths() {
    let handlers = HandlerProvider::new().route("/status", |_req: &Request, res: &mut Response| {
        res.set_body("up");
        Ok(())
    });

    assert!(handlers.can_load("/status"));
    assert!(!handlers.can_load("/status/"));
    assert!(!handlers.can_load("/other"));

    let request = get("/status");
    let mut response = Response::default();
    handlers.load("/status", &request, &mut response).await.unwrap();

    assert_eq!(response.body, b"up".to_vec());
}

#[tokio::test]
async fn test_handlers_run_matching_filters_in_order() {
    let handlers = HandlerProvider::new()
        .route("/admin/users", |_req: &Request, res: &mut Response| {
            res.write(b"handler");
            Ok(())
        })
        .route("/admin/login", |_req: &Request, res: &mut Response| {
            res.write(b"login");
            Ok(())
        })
        .filter("first", |_req: &Request, res: &mut Response| {
            res.write(b"first,");
            Ok(FilterAction::Continue)
        })
        .filter("second", |_req: &Request, res: &mut Response| {
            res.write(b"second,");
            Ok(FilterAction::Continue)
        })
        .with_filter_mappings([
            FilterMapping::new("/admin/.*", Some("/admin/login"), "first").unwrap(),
            FilterMapping::new("/admin/.*", None, "second").unwrap(),
        ])
        .unwrap();

    let mut response = Response::default();
    handlers
        .load("/admin/users", &get("/admin/users"), &mut response)
        .await
        .unwrap();
    assert_eq!(response.body, b"first,second,handler".to_vec());

    let mut response = Response::default();
    handlers
        .load("/admin/login", &get("/admin/login"), &mut response)
        .await
        .unwrap();
    assert_eq!(response.body, b"second,login".to_vec());
}

#[tokio::test]
async fn test_filter_stop_skips_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let handlers = HandlerProvider::new()
        .route("/private", move |_req: &Request, _res: &mut Response| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .filter("deny", |req: &Request, res: &mut Response| {
            if req.header("Authorization").is_some() {
                return Ok(FilterAction::Continue);
            }
            res.set_status(StatusCode::Forbidden);
            Ok(FilterAction::Stop)
        })
        .with_filter_mappings([FilterMapping::new("/private", None, "deny").unwrap()])
        .unwrap();

    let mut response = Response::default();
    handlers
        .load("/private", &get("/private"), &mut response)
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::Forbidden);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let authorized = RequestBuilder::new()
        .method(Method::GET)
        .path("/private")
        .header("Authorization", "Bearer t")
        .build()
        .unwrap();
    let mut response = Response::default();
    handlers.load("/private", &authorized, &mut response).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_filter_error_propagates() {
    let handlers = HandlerProvider::new()
        .route("/x", |_req: &Request, _res: &mut Response| Ok(()))
        .filter("boom", |_req: &Request, _res: &mut Response| {
            Err(DispatchError::Unclassified(anyhow::anyhow!("filter failed")))
        })
        .with_filter_mappings([FilterMapping::new("/.*", None, "boom").unwrap()])
        .unwrap();

    let mut response = Response::default();
    let err = handlers.load("/x", &get("/x"), &mut response).await.unwrap_err();

    assert!(matches!(err, DispatchError::Unclassified(_)));
}

#[test]
fn test_unknown_filter_mapping_is_rejected() {
    let result = HandlerProvider::new()
        .with_filter_mappings([FilterMapping::new("/.*", None, "nope").unwrap()]);

    assert!(result.is_err());
}

#[test]
fn test_mappings_for_path() {
    let handlers = HandlerProvider::new()
        .filter("a", |_req: &Request, _res: &mut Response| Ok(FilterAction::Continue))
        .with_filter_mappings([
            FilterMapping::new("/api/.*", None, "a").unwrap(),
            FilterMapping::new("/web/.*", None, "a").unwrap(),
        ])
        .unwrap();

    let applied: Vec<_> = handlers.mappings_for("/api/v1").collect();
    assert_eq!(applied.len(), 1);
    assert!(handlers.mappings_for("/other").next().is_none());
}
