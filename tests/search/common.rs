// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Local test site served on 127.0.0.1:0
//!
//! Routes:
//! - `/page/:name`   200 with a title and meta description
//! - `/forbidden`    403
//! - `/rate-limited` 429
//! - `/error`        500
//! - `/no-content`   204
//! - `/slow`         200 after two seconds
//! - `/flaky/:name`  503 twice, then 200
//! - `/redirect`     302 to `/page/redirected`
//! - `/late-title`   ~300 KB of filler before the `<title>`
//! - `/whoami`       echoes the User-Agent header as the title
//! - `/ddg`          DuckDuckGo-style result page linking to `/page/*`
//! - `/ddg-empty`    result page without links

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct SiteState {
    base: String,
    flaky_hits: Arc<Mutex<HashMap<String, usize>>>,
}

pub struct TestSite {
    pub base: String,
}

impl TestSite {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

pub async fn spawn_site() -> TestSite {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let state = SiteState {
        base: base.clone(),
        flaky_hits: Arc::new(Mutex::new(HashMap::new())),
    };

    let app = Router::new()
        .route("/page/:name", get(page))
        .route("/forbidden", get(|| async { StatusCode::FORBIDDEN }))
        .route("/rate-limited", get(|| async { StatusCode::TOO_MANY_REQUESTS }))
        .route("/error", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/no-content", get(|| async { StatusCode::NO_CONTENT }))
        .route("/slow", get(slow))
        .route("/flaky/:name", get(flaky))
        .route("/redirect", get(|| async { Redirect::temporary("/page/redirected") }))
        .route("/late-title", get(late_title))
        .route("/whoami", get(whoami))
        .route("/ddg", post(ddg_results))
        .route("/ddg-empty", post(|| async { Html("<html><body>No results.</body></html>") }))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestSite { base }
}

pub fn page_html(name: &str) -> String {
    format!(
        "<html><head><title>Page {name}</title>\
         <meta name=\"description\" content=\"Description of page {name}\"></head>\
         <body><p>Body text for page {name} that is long enough to count.</p></body></html>"
    )
}

async fn page(Path(name): Path<String>) -> Html<String> {
    Html(page_html(&name))
}

async fn slow() -> Html<String> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Html(page_html("slow"))
}

async fn flaky(State(state): State<SiteState>, Path(name): Path<String>) -> impl IntoResponse {
    let hits = {
        let mut counts = state.flaky_hits.lock().unwrap();
        let hits = counts.entry(name.clone()).or_insert(0);
        *hits += 1;
        *hits
    };

    if hits <= 2 {
        (StatusCode::SERVICE_UNAVAILABLE, Html(String::new()))
    } else {
        (StatusCode::OK, Html(page_html(&name)))
    }
}

async fn late_title() -> Html<String> {
    let filler = "<p></p>".repeat(300 * 1024 / 7);
    Html(format!(
        "<html><body>{}<title>Late</title></body></html>",
        filler
    ))
}

async fn whoami(headers: HeaderMap) -> Html<String> {
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Html(format!("<html><head><title>{}</title></head></html>", agent))
}

async fn ddg_results(State(state): State<SiteState>) -> Html<String> {
    let links: String = ["one", "two", "three", "four", "five", "six"]
        .iter()
        .map(|name| {
            let target = format!("{}/page/{}", state.base, name);
            let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
            format!(
                "<div class=\"result\"><h2 class=\"result__title\">\
                 <a rel=\"nofollow\" class=\"result__a\" href=\"//duckduckgo.com/l/?uddg={}&amp;rut=x\">{}</a>\
                 </h2></div>",
                encoded, name
            )
        })
        .collect();

    Html(format!("<html><body>{}</body></html>", links))
}
