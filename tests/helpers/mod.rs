//! Local stand-in for pbinfo.ro serving the pages under `tests/fixtures`.
//!
//! Layout: `{id}/index.html` (problem page), `{id}/test-cases.html` (test
//! listing) and `chunks/{id}.{tip}` (downloads). Anything missing is a 404.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{self, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bmoisil::config::Config;
use bmoisil::pbinfo::PbInfoClient;
use serde::Deserialize;
use tokio::task::JoinHandle;
use url::Url;

/// Problem whose page is only served after [`SLOW_DELAY`].
pub const SLOW_PROBLEM: u32 = 999;
/// Test download only served after [`SLOW_DELAY`].
pub const SLOW_CHUNK: u32 = 20101;
pub const SLOW_DELAY: Duration = Duration::from_secs(5);

type RequestLog = Arc<Mutex<Vec<String>>>;

pub struct FixtureServer {
    pub base_url: Url,
    requests: RequestLog,
    handle: JoinHandle<()>,
}

impl FixtureServer {
    pub async fn start() -> Self {
        let requests = RequestLog::default();
        let app = Router::new()
            .route("/probleme/{id}", get(problem_page))
            .route("/ajx-module/ajx-problema-afisare-teste.php", get(test_listing))
            .route("/php/descarca-test.php", get(download))
            .layer(middleware::from_fn_with_state(requests.clone(), record));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            requests,
            handle,
        }
    }

    pub fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(2),
            ..Config::default()
        }
    }

    /// Client for this server. Proxies from the environment are bypassed.
    pub fn client(&self) -> PbInfoClient {
        let config = self.config();
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(config.timeout)
            .build()
            .unwrap();
        PbInfoClient::with_http_client(&config, http)
    }

    /// Paths (with query) requested so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn was_requested(&self, path: &str) -> bool {
        self.requests().iter().any(|r| r == path)
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

async fn serve(path: PathBuf) -> Response {
    match tokio::fs::read(&path).await {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn record(State(log): State<RequestLog>, request: Request, next: Next) -> Response {
    log.lock().unwrap().push(request.uri().to_string());
    next.run(request).await
}

async fn problem_page(extract::Path(id): extract::Path<u32>) -> Response {
    if id == SLOW_PROBLEM {
        tokio::time::sleep(SLOW_DELAY).await;
    }
    serve(fixtures().join(id.to_string()).join("index.html")).await
}

#[derive(Deserialize)]
struct ListingQuery {
    id: u32,
}

async fn test_listing(Query(query): Query<ListingQuery>) -> Response {
    serve(fixtures().join(query.id.to_string()).join("test-cases.html")).await
}

#[derive(Deserialize)]
struct DownloadQuery {
    id: u32,
    tip: String,
}

async fn download(Query(query): Query<DownloadQuery>) -> Response {
    if !query.tip.chars().all(|c| c.is_ascii_alphanumeric()) {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if query.id == SLOW_CHUNK {
        tokio::time::sleep(SLOW_DELAY).await;
    }
    serve(fixtures().join("chunks").join(format!("{}.{}", query.id, query.tip))).await
}
