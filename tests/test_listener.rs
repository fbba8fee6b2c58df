//! Serving real TCP connections with a settings-built dispatcher

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use wicket::config::{ErrorDocuments, Settings};
use wicket::dispatch::FilterAction;
use wicket::http::request::Request;
use wicket::http::response::Response;
use wicket::providers::HandlerProvider;
use wicket::server::{dispatcher_from_settings, listener, standalone_dispatcher};

async fn start(settings: Settings, handlers: HandlerProvider) -> SocketAddr {
    let dispatcher = dispatcher_from_settings(&settings, handlers).unwrap();
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();

    tokio::spawn(listener::serve(tcp, Arc::new(dispatcher)));
    addr
}

async fn send(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    String::from_utf8_lossy(&raw).into_owned()
}

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs/index.html"), "<h1>Docs</h1>").unwrap();
    std::fs::write(dir.path().join("404.html"), "<h1>Nothing here</h1>").unwrap();
    dir
}

fn settings_for(root: &tempfile::TempDir) -> Settings {
    Settings {
        document_root: Some(root.path().to_path_buf()),
        error_documents: ErrorDocuments {
            not_found: Some(root.path().join("404.html")),
            forbidden: None,
        },
        signature: "wicket-it".to_string(),
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_directory_redirect_and_index_over_tcp() {
    let root = site();
    let addr = start(settings_for(&root), HandlerProvider::new()).await;

    let redirect = send(addr, "GET /docs HTTP/1.1\r\nHost: t\r\n\r\n").await;
    assert!(redirect.starts_with("HTTP/1.1 301 Moved Permanently\r\n"));
    assert!(redirect.contains("Location: /docs/\r\n"));
    assert!(redirect.contains("Server: wicket-it\r\n"));

    let index = send(addr, "GET /docs/ HTTP/1.1\r\nHost: t\r\n\r\n").await;
    assert!(index.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(index.contains("Content-Type: text/html; charset=utf-8\r\n"));
    assert!(index.ends_with("<h1>Docs</h1>"));
}

#[tokio::test]
async fn test_not_found_uses_error_document() {
    let root = site();
    let addr = start(settings_for(&root), HandlerProvider::new()).await;

    let missing = send(addr, "GET /missing HTTP/1.1\r\n\r\n").await;

    assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(missing.ends_with("<h1>Nothing here</h1>"));
}

#[tokio::test]
async fn test_traversal_and_method_over_tcp() {
    let root = site();
    let addr = start(settings_for(&root), HandlerProvider::new()).await;

    let denied = send(addr, "GET /docs/../../etc/passwd HTTP/1.1\r\n\r\n").await;
    assert!(denied.starts_with("HTTP/1.1 403 Forbidden\r\n"));

    let not_allowed = send(addr, "DELETE /docs/index.html HTTP/1.1\r\n\r\n").await;
    assert!(not_allowed.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
    assert!(not_allowed.contains("Allow: GET, HEAD, POST\r\n"));
}

#[tokio::test]
async fn test_handlers_take_precedence_and_filters_apply() {
    let root = site();
    let mut settings = settings_for(&root);
    settings.filters = serde_yaml::from_str(
        "- include: \"/docs/.*\"\n  filter: stamp\n",
    )
    .unwrap();

    let handlers = HandlerProvider::new()
        .route("/docs/index.html", |_req: &Request, res: &mut Response| {
            res.set_body("dynamic");
            Ok(())
        })
        .filter("stamp", |_req: &Request, res: &mut Response| {
            res.set_header("X-Stamp", "1");
            Ok(FilterAction::Continue)
        });
    let addr = start(settings, handlers).await;

    let response = send(addr, "GET /docs/ HTTP/1.1\r\nConnection: keep-alive\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("X-Stamp: 1\r\n"));
    assert!(response.contains("Connection: keep-alive\r\n"));
    assert!(response.ends_with("dynamic"));
}

#[tokio::test]
async fn test_client_disconnect_does_not_stop_listener() {
    let root = site();
    let addr = start(settings_for(&root), HandlerProvider::new()).await;

    let stream = TcpStream::connect(addr).await.unwrap();
    drop(stream);

    let index = send(addr, "GET /docs/ HTTP/1.1\r\n\r\n").await;
    assert!(index.starts_with("HTTP/1.1 200 OK\r\n"));
}

#[tokio::test]
async fn test_standalone_dispatcher_serves_document_root() {
    let root = site();
    let dispatcher = standalone_dispatcher(&settings_for(&root)).unwrap();
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    tokio::spawn(listener::serve(tcp, Arc::new(dispatcher)));

    let index = send(addr, "GET /docs/ HTTP/1.1\r\n\r\n").await;

    assert!(index.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(index.ends_with("<h1>Docs</h1>"));
}

#[test]
fn test_standalone_dispatcher_rejects_filter_mappings() {
    let settings =
        Settings::from_yaml("filters:\n  - {include: \"/admin/.*\", filter: auth}\n").unwrap();

    let err = standalone_dispatcher(&settings).unwrap_err().to_string();

    assert!(err.contains("\"auth\""));
    assert!(err.contains("standalone server has no filters"));
    assert!(err.contains("HandlerProvider"));
}

#[test]
fn test_embedded_dispatcher_accepts_registered_filter_mappings() {
    let settings =
        Settings::from_yaml("filters:\n  - {include: \"/admin/.*\", filter: auth}\n").unwrap();
    let handlers = HandlerProvider::new()
        .filter("auth", |_req: &Request, _res: &mut Response| Ok(FilterAction::Stop));

    assert!(dispatcher_from_settings(&settings, handlers).is_ok());
}
