//! HTTP fetcher built on wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Fetches remote pages and images - enables mocking for tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs a GET and returns the decoded page body as text.
    async fn fetch_page(&self, url: &str) -> Result<String>;

    /// Downloads raw image bytes.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher with browser impersonation and transport decompression.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the configured timeouts and proxy.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url)
                .map_err(|e| Error::Fetch(format!("bad proxy {proxy_url}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| Error::Fetch(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<wreq::Response> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            warn!("Request to {} failed with status {}", url, status);
            return Err(Error::Fetch(format!("status {status} from {url}")));
        }

        Ok(response)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| Error::Fetch(e.to_string()))
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await.map_err(|e| match e {
            Error::Fetch(msg) => Error::ImageDownload(msg),
            other => other,
        })?;

        let bytes =
            response.bytes().await.map_err(|e| Error::ImageDownload(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
