//! End-to-end ingestion: bytes or URL → detect → extract → assemble.

mod assembler;

pub use assembler::assemble;

use crate::error::{ApiDocError, Result};
use crate::models::ApiDoc;
use crate::parser::{self, Format};
use crate::scraper::Fetcher;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct DocPipeline {
    fetcher: Arc<dyn Fetcher>,
    html_fallback: bool,
}

impl DocPipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            html_fallback: false,
        }
    }

    /// Walk the whole candidate chain instead of stopping at the detected format.
    pub fn with_html_fallback(mut self, enabled: bool) -> Self {
        self.html_fallback = enabled;
        self
    }

    /// Detects the format of `body` and extracts it.
    ///
    /// With fallback disabled only the detected format is tried. With it
    /// enabled, every entry of [`parser::candidate_formats`] is tried in
    /// order and the detected format's error is returned if none succeeds.
    pub fn ingest_bytes(
        &self,
        content_type: &str,
        body: &[u8],
        source_url: &str,
        description: Option<&str>,
    ) -> Result<ApiDoc> {
        let candidates = parser::candidate_formats(content_type, body);
        debug!(?candidates, content_type, "Selected extraction strategies");

        let mut first_error = None;
        for (attempt, &format) in candidates.iter().enumerate() {
            if attempt > 0 && !self.html_fallback {
                break;
            }
            match parser::extract(format, body) {
                Ok(doc) => return Ok(self.finish(doc, format, source_url, description)),
                Err(e) => {
                    warn!(%format, error = %e, "Extraction strategy failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(first_error
            .unwrap_or_else(|| ApiDocError::UnsupportedContentType(content_type.to_string())))
    }

    /// Extracts `body` with a caller-chosen format, skipping detection.
    pub fn ingest_with_format(
        &self,
        format: Format,
        body: &[u8],
        source_url: &str,
        description: Option<&str>,
    ) -> Result<ApiDoc> {
        let doc = parser::extract(format, body)?;
        Ok(self.finish(doc, format, source_url, description))
    }

    /// Fetches `url` and ingests the response body.
    pub async fn ingest_url(&self, url: &str, description: Option<&str>) -> Result<ApiDoc> {
        let fetched = self.fetcher.fetch(url).await?;
        self.ingest_bytes(&fetched.content_type, &fetched.body, url, description)
    }

    fn finish(
        &self,
        doc: ApiDoc,
        format: Format,
        source_url: &str,
        description: Option<&str>,
    ) -> ApiDoc {
        let doc = assemble(doc, source_url, description);
        info!(
            id = %doc.id,
            %format,
            endpoints = doc.endpoints.len(),
            "Assembled API document"
        );
        doc
    }
}
