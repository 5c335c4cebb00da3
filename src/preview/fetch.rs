use std::time::Duration;

use axum::async_trait;
use reqwest::header::ACCEPT;
use reqwest::redirect::Policy;
use reqwest::{Client as ReqwestClient, Response};
use thiserror::Error;
use url::Url;

use super::normalize::strip_scheme;

pub const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const MAX_REDIRECTS: usize = 10;
/// Only the `<head>` matters; anything past this is dropped unread.
pub const DEFAULT_MAX_HTML_BYTES: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not build mirror url: {0}")]
    MirrorUrl(#[from] url::ParseError),
}

/// Raw page as returned by a fetch strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub final_url: String,
    pub html: String,
}

/// A way of getting HTML for a URL.
///
/// Only transport-level failures are errors; a 4xx/5xx page is still a page.
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Fetches the target itself, posing as a desktop browser.
pub struct DirectFetcher {
    client: ReqwestClient,
    max_bytes: usize,
}

impl DirectFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(DirectFetcher {
            client,
            max_bytes: DEFAULT_MAX_HTML_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

#[async_trait]
impl HtmlFetcher for DirectFetcher {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!(
                status = %response.status(),
                url = %url,
                "Direct fetch returned non-success status, reading body anyway"
            );
        }

        let final_url = response.url().to_string();
        // Read as text whatever Content-Type claims.
        let html = read_capped(response, self.max_bytes).await?;

        Ok(FetchedPage { final_url, html })
    }
}

/// Fetches the target through an HTML-mirroring proxy.
///
/// The proxy's own URL never leaks out: `final_url` is the target.
pub struct MirrorFetcher {
    client: ReqwestClient,
    base_url: String,
    max_bytes: usize,
}

impl MirrorFetcher {
    pub fn new(timeout: Duration, base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(MirrorFetcher {
            client,
            base_url: base_url.into(),
            max_bytes: DEFAULT_MAX_HTML_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn mirror_url(&self, url: &Url) -> Result<Url, FetchError> {
        Ok(Url::parse(&format!(
            "{}http://{}",
            self.base_url,
            strip_scheme(url.as_str())
        ))?)
    }
}

#[async_trait]
impl HtmlFetcher for MirrorFetcher {
    fn name(&self) -> &'static str {
        "mirror"
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let mirror_url = self.mirror_url(url)?;
        tracing::debug!(mirror = %mirror_url, "Fetching preview HTML through mirror");

        let response = self.client.get(mirror_url).send().await?;
        let html = read_capped(response, self.max_bytes).await?;

        Ok(FetchedPage {
            final_url: url.to_string(),
            html,
        })
    }
}

/// Buffer at most `max_bytes` of the body, decoding lossily as UTF-8.
async fn read_capped(mut response: Response, max_bytes: usize) -> Result<String, FetchError> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = max_bytes - buf.len();
        if chunk.len() > room {
            buf.extend_from_slice(&chunk[..room]);
            tracing::debug!(max_bytes, "Truncated preview HTML at size cap");
            break;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
