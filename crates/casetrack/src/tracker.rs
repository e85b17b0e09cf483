use std::fmt::Display;

use crate::config::{Config, SourceConfig};
use crate::merge::{MergeSummary, merge_all};
use crate::parser::{ParseError, parse_case_table};
use crate::scraper::{CaseScraper, ScraperError};
use crate::store::{self, StoreError};
use crate::types::Dataset;

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Fetch stage failed: {0}")]
    Fetch(#[from] ScraperError),
    #[error("Parse stage failed: {0}")]
    Parse(#[from] ParseError),
    #[error("Output stage failed: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackReport {
    pub summary: MergeSummary,
    pub total: usize,
}

impl Display for TrackReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}; {} record(s) tracked", self.summary, self.total)
    }
}

/// Extracts the rows of `html` and merges them into `dataset` in page order.
pub fn merge_page(
    dataset: &mut Dataset,
    html: &str,
    source: &SourceConfig,
) -> Result<MergeSummary, ParseError> {
    let records = parse_case_table(html, source)?;
    Ok(merge_all(dataset, records))
}

/// One tracking run: load the previous snapshot, fetch, merge, save.
#[derive(Debug, Clone)]
pub struct Tracker {
    scraper: CaseScraper,
    config: Config,
}

impl Tracker {
    pub fn new(config: Config) -> Result<Self, ScraperError> {
        let scraper = CaseScraper::new(config.source.clone())?;
        Ok(Self { scraper, config })
    }

    pub async fn run(&self) -> Result<TrackReport, TrackError> {
        let mut dataset = store::load_dataset(&self.config.output.json_path);

        let html = self.scraper.fetch_page().await?;
        let summary = merge_page(&mut dataset, &html, &self.config.source)?;

        store::save_dataset(&dataset, &self.config.output)?;

        Ok(TrackReport {
            summary,
            total: dataset.len(),
        })
    }
}
