use crate::config::FetchConfig;
use crate::error::{ApiDocError, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Raw bytes of a remote document together with its content-type header.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Turns a URL into a [`FetchedDocument`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        info!(url, "Fetching API documentation");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Fetch returned non-success status");
            return Err(ApiDocError::Network {
                status_code: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.bytes().await?.to_vec();

        debug!(url, content_type = %content_type, bytes = body.len(), "Fetched document");
        Ok(FetchedDocument { content_type, body })
    }
}
