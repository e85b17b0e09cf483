use crate::config::SourceConfig;
use crate::parser::{ParseError, parse_case_table};
use crate::types::CaseRecord;

use reqwest::Client;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

#[derive(Debug, Clone)]
pub struct CaseScraper {
    client: Client,
    source: SourceConfig,
}

impl CaseScraper {
    pub fn new(source: SourceConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(source.timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client, source })
    }

    /// Downloads the case listing page. Non-success statuses are errors.
    pub async fn fetch_page(&self) -> Result<String, ScraperError> {
        let url = self.source.page_url();
        log::info!("Fetching case listing from {}...", url);

        let html = self
            .client
            .get(&url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        Ok(html)
    }

    /// Fetches the page and extracts every data row, without merging.
    pub async fn fetch_cases(&self) -> Result<Vec<CaseRecord>, ScraperError> {
        let html = self.fetch_page().await?;
        let records = parse_case_table(&html, &self.source)?;
        log::info!("Extracted {} case record(s)", records.len());
        Ok(records)
    }
}
