use crate::models::DocumentSnapshot;
use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder, header};
use std::time::{Duration, Instant};

/// Default user agent announced by audits and link probes
pub const DEFAULT_USER_AGENT: &str = "SEO-Audit-Bot/1.0";
const ACCEPT: &str = "text/html,application/xhtml+xml,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Creates a reqwest client with the audit user agent and standard headers
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );

    let client = ClientBuilder::new()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
        .context("Failed to build HTTP client")?;

    Ok(client)
}

/// Fetches `url` and records the body, response headers and wall-clock load time.
pub async fn fetch_snapshot(client: &Client, url: &str) -> Result<DocumentSnapshot> {
    let started = Instant::now();
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url = %url, status = %status, "Audited page returned a non-success status");
    }

    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let html = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?;
    let load_time_ms = started.elapsed().as_millis() as u64;

    tracing::debug!(url = %url, load_time_ms, bytes = html.len(), "Fetched page");

    Ok(DocumentSnapshot::new(url, &html, headers, load_time_ms))
}
