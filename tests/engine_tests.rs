/// Integration tests for the reqwest-backed HTTP requester
/// Uses a wiremock server; the blocking client runs on a blocking thread
use authorisation_check::auditor::RouteAuditor;
use authorisation_check::config::AuditConfig;
use authorisation_check::engine::{HttpRequester, ReqwestRequester};
use authorisation_check::error::RequestError;
use authorisation_check::models::{HttpResponse, Route};
use authorisation_check::reporting::ConsoleReporter;
use authorisation_check::router::RouteTable;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn fetch(url: String, max_redirects: usize) -> Result<HttpResponse, RequestError> {
    tokio::task::spawn_blocking(move || ReqwestRequester::new(Duration::from_secs(5)).get(&url, max_redirects))
        .await
        .expect("blocking task should not panic")
}

async fn redirect(server: &MockServer, from: &str, to: &str) {
    Mock::given(method("GET"))
        .and(path(from))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", to))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plain_response_reports_requested_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = format!("{}/admin/1", server.uri());
    let response = fetch(url.clone(), 1).await.expect("request should succeed");

    assert_eq!(response.status, 500);
    assert_eq!(response.final_url, url);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_root_url_is_reported_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = format!("{}/", server.uri());
    let response = fetch(url.clone(), 1).await.unwrap();

    assert_eq!(response, HttpResponse { status: 200, final_url: url });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_redirect_is_followed() {
    let server = MockServer::start().await;
    redirect(&server, "/account", "/login").await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let response = fetch(format!("{}/account", server.uri()), 1).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.final_url, format!("{}/login", server.uri()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redirect_limit_returns_last_redirect() {
    let server = MockServer::start().await;
    redirect(&server, "/a", "/b").await;
    redirect(&server, "/b", "/c").await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let response = fetch(format!("{}/a", server.uri()), 1).await.unwrap();

    assert_eq!(response.status, 302);
    assert_eq!(response.final_url, format!("{}/b", server.uri()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zero_redirects_stops_at_first_hop() {
    let server = MockServer::start().await;
    redirect(&server, "/a", "/b").await;

    let url = format!("{}/a", server.uri());
    let response = fetch(url.clone(), 0).await.unwrap();

    assert_eq!(response.status, 302);
    assert_eq!(response.final_url, url);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_url_is_rejected_before_sending() {
    let err = fetch("not a url".to_string(), 1).await.unwrap_err();
    assert!(matches!(err, RequestError::InvalidUrl { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_host_is_a_request_error() {
    // Bind then drop a listener to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
    let err = fetch(format!("http://127.0.0.1:{}/", port), 1).await.unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_audit_against_live_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    redirect(&server, "/profile/7/edit", "/login").await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/debug/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let host = server.address().to_string();
    let output = tokio::task::spawn_blocking(move || {
        let table = RouteTable::from_routes([
            Route::new("home", "/"),
            Route::new("_wdt", "/_wdt/{token}"),
            Route::new("admin", "/admin/{id}"),
            Route::new("profile", "/profile/{id}/edit").with_default("id", 7),
            Route::new("debug", "/debug/{id}"),
        ]);
        let requester = ReqwestRequester::new(Duration::from_secs(5));
        let mut auditor = RouteAuditor::new(table, requester, AuditConfig::new(host, "http"));
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        let summary = auditor.run(&mut reporter).expect("audit should complete");
        (summary, String::from_utf8(reporter.into_inner()).unwrap())
    })
    .await
    .unwrap();

    let (summary, text) = output;
    assert_eq!(summary.exposed_routes(), vec!["home", "debug"]);
    assert_eq!(summary.errors, 0);
    assert!(text.contains(&format!(
        "Route debug is accessible without authorisation, statusCode : 500, url : {}/debug/1",
        server.uri()
    )));
    assert!(text.ends_with("Done!\n"));
}
