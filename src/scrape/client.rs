use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use crate::config::Settings;
use crate::error::{Error, Result};

/// HTTP session shared by the listing crawl and abstract extraction.
///
/// Every request waits `request_delay` first so a full crawl stays polite
/// towards dblp and the publishers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    request_delay: Duration,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(HttpClient {
            client,
            request_delay: settings.request_delay,
        })
    }

    /// GET `url` and return the body. 404 maps to [`Error::NotFound`], any
    /// other non-success status to [`Error::Status`].
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
