pub mod extract;
pub mod fetch;
pub mod normalize;

use std::sync::Arc;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::Preview;

use fetch::{DirectFetcher, FetchError, FetchedPage, HtmlFetcher, MirrorFetcher};
use normalize::Target;

pub const FETCH_FAILED: &str = "Could not fetch HTML for preview";

/// Normalized URL in, preview record out.
///
/// Tries the direct fetcher first and the mirror only when the direct
/// attempt failed or came back too short. At most two outbound requests,
/// one after the other.
pub struct PreviewResolver {
    direct: Arc<dyn HtmlFetcher>,
    mirror: Arc<dyn HtmlFetcher>,
    min_html_len: usize,
}

impl PreviewResolver {
    pub fn new(
        direct: Arc<dyn HtmlFetcher>,
        mirror: Arc<dyn HtmlFetcher>,
        min_html_len: usize,
    ) -> Self {
        PreviewResolver {
            direct,
            mirror,
            min_html_len,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let direct = DirectFetcher::new(config.fetch_timeout, &config.user_agent)?
            .with_max_bytes(config.max_html_bytes);
        let mirror = MirrorFetcher::new(config.fetch_timeout, config.mirror_base_url.clone())?
            .with_max_bytes(config.max_html_bytes);
        Ok(Self::new(
            Arc::new(direct),
            Arc::new(mirror),
            config.min_html_len,
        ))
    }

    /// Fetch errors never surface here: they end up as `ok: false`.
    /// The only `Err` is a failed extraction task.
    pub async fn resolve(&self, target: &Target) -> AppResult<Preview> {
        let mut final_url = target.input_url.clone();
        let mut html: Option<String> = None;

        if let Some(page) = self.attempt(self.direct.as_ref(), target).await {
            final_url = page.final_url;
            html = Some(page.html);
        }

        if !self.is_usable(html.as_deref()) {
            tracing::debug!(
                url = %target.url,
                "Direct fetch yielded no usable HTML, falling back to mirror"
            );
            if let Some(page) = self.attempt(self.mirror.as_ref(), target).await {
                final_url = page.final_url;
                html = Some(page.html);
            }
        }

        let html = match html {
            Some(html) if self.is_usable(Some(&html)) => html,
            _ => {
                tracing::info!(url = %target.url, "No usable HTML for link preview");
                return Ok(Preview::unavailable(
                    target.input_url.clone(),
                    final_url,
                    FETCH_FAILED,
                ));
            }
        };

        // Parsing untrusted pages is CPU-bound; keep it off the async workers.
        let base_url = final_url.clone();
        let meta = tokio::task::spawn_blocking(move || extract::extract_metadata(&html, &base_url))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let preview = Preview::resolved(target.input_url.clone(), final_url, meta);
        tracing::debug!(
            url = %preview.final_url,
            preview_type = %preview.kind,
            has_title = preview.title.is_some(),
            "Link preview resolved"
        );
        Ok(preview)
    }

    async fn attempt(&self, fetcher: &dyn HtmlFetcher, target: &Target) -> Option<FetchedPage> {
        match fetcher.fetch(&target.url).await {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fetcher = fetcher.name(),
                    url = %target.url,
                    "Failed to fetch URL for link preview"
                );
                None
            }
        }
    }

    fn is_usable(&self, html: Option<&str>) -> bool {
        html.is_some_and(|h| h.trim().len() >= self.min_html_len)
    }
}
