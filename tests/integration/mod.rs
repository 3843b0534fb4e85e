//! Integration tests: a real server on a loopback port, probed the way the
//! static site calls it, plus a render of the shipped `site/` directory.

use std::net::SocketAddr;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tokio::net::TcpListener;

use starter_api::api::handlers::HELLO_MESSAGE;
use starter_api::api::{create_router, AppState};
use starter_api::config::CorsPolicy;
use starter_api::error::SiteError;
use starter_api::site::{build_site, probe_backend, SiteConfig, SITE_CONFIG_FILE};

/// Start the API on an ephemeral loopback port.
async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = create_router(AppState::new(), &CorsPolicy::Any);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

fn site_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("site")
}

fn site_for(addr: SocketAddr) -> SiteConfig {
    SiteConfig {
        title: "Integration".to_string(),
        baseurl: String::new(),
        backend_url: format!("http://{}", addr),
    }
}

#[tokio::test]
async fn probe_reaches_running_server() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let report = probe_backend(&client, &site_for(addr)).await.unwrap();

    assert_eq!(report.status, 200);
    assert_eq!(report.message, HELLO_MESSAGE);
    assert_eq!(report.url, format!("http://{}/hello", addr));
}

#[tokio::test]
async fn probe_reports_wrong_backend() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let mut site = site_for(addr);
    site.backend_url = format!("http://{}/nowhere", addr);

    let err = probe_backend(&client, &site).await.unwrap_err();
    assert!(matches!(err, SiteError::ProbeFailed { .. }));
}

#[tokio::test]
async fn served_responses_are_identical_and_cross_origin() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let url = format!("http://{}/hello", addr);

    let mut bodies = Vec::new();
    for _ in 0..3 {
        let response = client
            .get(&url)
            .header("Origin", "https://someone.github.io")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
        bodies.push(response.bytes().await.unwrap());
    }

    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn highlight_round_trips_over_http() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .post(format!("http://{}/highlight", addr))
        .json(&serde_json::json!({ "text": "brown fox", "start": 10, "end": 19 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "success");
    assert_eq!(body["received"]["text"], "brown fox");
    assert_eq!(body["received"]["start"], 10);
}

#[test]
fn shipped_site_config_is_valid() {
    let site = SiteConfig::load(&site_dir().join(SITE_CONFIG_FILE)).unwrap();
    assert!(!site.title.is_empty());
    assert!(site.backend_url.starts_with("http"));
}

#[test]
fn rendered_site_contains_backend_url() {
    let site = SiteConfig::load(&site_dir().join(SITE_CONFIG_FILE)).unwrap();
    let out = tempfile::tempdir().unwrap();

    let report = build_site(&site_dir(), out.path(), &site).unwrap();
    assert!(report.rendered.contains(&PathBuf::from("index.html")));

    let index = std::fs::read_to_string(out.path().join("index.html")).unwrap();
    assert!(index.contains(&format!("\"{}\"", site.backend_url)));
    assert!(index.contains(&format!("<title>{}</title>", site.title)));
    assert!(!index.contains("{{"));
}
