pub mod config;
pub mod merge;
mod parser;
pub mod scraper;
pub mod store;
pub mod tracker;
pub mod types;

pub use config::Config;
pub use parser::{ParseError, clean, extract_record, parse_case_table};
pub use self::scraper::{CaseScraper, ScraperError};
pub use tracker::{TrackError, TrackReport, Tracker};
pub use types::{CaseRecord, Dataset};

pub(crate) const BASE_URL: &str = "https://www.justice.gov";
pub(crate) const PAGE_PATH: &str = "/opa/investigations-regarding-violence-capitol";
