use crate::auditor::StatusLinkHealth;
use crate::http_client::build_http_client;
use crate::models::Link;
use anyhow::Result;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};

/// Probes link targets over HTTP so the links audit can use real statuses.
pub struct LinkChecker {
    client: reqwest::Client,
}

impl LinkChecker {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs, user_agent)?,
        })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Checks every unique link URL concurrently. `None` means unreachable.
    pub async fn check_links(&self, links: &[Link]) -> HashMap<String, Option<u16>> {
        let mut seen = HashSet::new();
        let urls: Vec<&str> = links
            .iter()
            .map(|l| l.url.as_str())
            .filter(|url| seen.insert(*url))
            .collect();

        let results = join_all(urls.iter().map(|url| self.check_link(url))).await;

        urls.into_iter()
            .map(str::to_string)
            .zip(results)
            .collect()
    }

    /// Probes `links` and wraps the statuses in a link-health policy.
    pub async fn link_health(&self, links: &[Link]) -> StatusLinkHealth {
        StatusLinkHealth::new(self.check_links(links).await)
    }

    async fn check_link(&self, url: &str) -> Option<u16> {
        // Use GET (many sites block HEAD requests)
        match self.client.get(url).send().await {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Link probe failed");
                None
            }
        }
    }
}
