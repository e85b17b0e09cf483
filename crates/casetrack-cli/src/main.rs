use std::path::PathBuf;
use std::process;
use std::time::Duration;

use casetrack::config::{Config, OutputConfig, SourceConfig};
use casetrack::scraper::CaseScraper;
use casetrack::tracker::Tracker;
use casetrack::types::DatasetStats;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "casetrack")]
#[command(about = "A court case table scraper and tracker", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
    Text,
}

#[derive(Debug, Args)]
struct SourceArgs {
    #[arg(long, help = "Origin prepended to the page path and to every link")]
    base_url: Option<String>,

    #[arg(long = "path", help = "Path of the page holding the case table")]
    page_path: Option<String>,

    #[arg(long, help = "CSS selector matching one table row per case")]
    row_selector: Option<String>,

    #[arg(long, help = "Treat the first matched row as data instead of a header")]
    include_header: bool,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "HTTP request timeout",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,
}

impl SourceArgs {
    fn into_config(self) -> SourceConfig {
        let defaults = SourceConfig::default();
        SourceConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            page_path: self.page_path.unwrap_or(defaults.page_path),
            row_selector: self.row_selector.unwrap_or(defaults.row_selector),
            skip_header: !self.include_header,
            timeout: self
                .timeout
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the current case table into the saved dataset and rewrite the YAML and JSON snapshots
    Track {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_name = "FILE", help = "YAML snapshot path")]
        yaml_out: Option<PathBuf>,

        #[arg(
            long,
            value_name = "FILE",
            help = "JSON snapshot path, also read as the previous dataset"
        )]
        json_out: Option<PathBuf>,
    },
    /// Print the current case table without touching any saved dataset
    Scrape {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "yaml",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn exit_with(context: &str, e: impl std::fmt::Display) -> ! {
    log::error!("{}: {}", context, e);
    process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    match cli.command {
        Commands::Track {
            source,
            yaml_out,
            json_out,
        } => {
            let defaults = OutputConfig::default();
            let config = Config {
                source: source.into_config(),
                output: OutputConfig {
                    yaml_path: yaml_out.unwrap_or(defaults.yaml_path),
                    json_path: json_out.unwrap_or(defaults.json_path),
                },
            };

            let tracker =
                Tracker::new(config).unwrap_or_else(|e| exit_with("Error creating scraper", e));

            let report = tracker
                .run()
                .await
                .unwrap_or_else(|e| exit_with("Error tracking cases", e));

            println!("{}", report);
        }

        Commands::Scrape { source, format } => {
            let scraper = CaseScraper::new(source.into_config())
                .unwrap_or_else(|e| exit_with("Error creating scraper", e));

            let records = scraper
                .fetch_cases()
                .await
                .unwrap_or_else(|e| exit_with("Error fetching cases", e));

            match format {
                OutputFormat::Yaml => match serde_yaml::to_string(&records) {
                    Ok(yaml) => print!("{}", yaml),
                    Err(e) => exit_with("Error serializing to YAML", e),
                },
                OutputFormat::Json => match serde_json::to_string_pretty(&records) {
                    Ok(json) => println!("{}", json),
                    Err(e) => exit_with("Error serializing to JSON", e),
                },
                OutputFormat::Text => {
                    if records.is_empty() {
                        println!("No cases to display.");
                    } else {
                        for (i, record) in records.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, record);
                        }
                        print!("{}", DatasetStats::from_records(&records));
                    }
                }
            }
        }
    }
}
