use std::path::PathBuf;
use std::time::Duration;

/// Where the case table lives and how its rows are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub base_url: String,
    pub page_path: String,
    pub row_selector: String,
    pub skip_header: bool,
    pub timeout: Duration,
}

impl SourceConfig {
    /// Joins origin and path with exactly one slash between them.
    pub fn page_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.page_path.trim_start_matches('/')
        )
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: crate::BASE_URL.to_string(),
            page_path: crate::PAGE_PATH.to_string(),
            row_selector: "tr".to_string(),
            skip_header: true,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub yaml_path: PathBuf,
    /// Also the file the previous dataset is loaded from.
    pub json_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            yaml_path: PathBuf::from("cases.yml"),
            json_path: PathBuf::from("cases.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub source: SourceConfig,
    pub output: OutputConfig,
}
