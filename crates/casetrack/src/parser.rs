use std::sync::LazyLock;

use crate::config::SourceConfig;
use crate::types::CaseRecord;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Document is empty")]
    EmptyDocument,
    #[error("Invalid row selector: {0}")]
    InvalidSelector(String),
}

static RE_BREAKING_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r\n|[\t\r\n\x0B\x0C\x{00A0}\x{0085}\x{2028}\x{2029}]")
        .expect("invalid regex: breaking space")
});

static TD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("invalid selector: td"));
static P: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("invalid selector: p"));
static A: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("invalid selector: a"));

/// Replaces each line break, tab, feed and non-breaking or separator space with
/// one ASCII space, then trims. Runs of ordinary spaces are left alone.
pub fn clean(text: &str) -> String {
    RE_BREAKING_SPACE.replace_all(text, " ").trim().to_string()
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// One string per `p` child, or the whole cell when it has none.
fn cell_texts(cell: ElementRef) -> Vec<String> {
    let texts: Vec<String> = cell.select(&P).map(|p| clean(&elem_text(p))).collect();
    if texts.is_empty() {
        vec![clean(&elem_text(cell))]
    } else {
        texts
    }
}

fn cell_links(cell: ElementRef, base_url: &str) -> Vec<String> {
    cell.select(&A)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| format!("{}{}", base_url, clean(href)))
        .collect()
}

/// Maps the cells of one table row onto a record by position. Missing cells
/// leave their fields empty; cells past the seventh are ignored.
pub fn extract_record(row: ElementRef, base_url: &str) -> CaseRecord {
    let mut record = CaseRecord::default();

    for (i, cell) in row.select(&TD).enumerate() {
        match i {
            0 => record.case_number = clean(&elem_text(cell)),
            1 => record.name = clean(&elem_text(cell)),
            2 => record.charges = cell_texts(cell),
            3 => record.links = cell_links(cell, base_url),
            4 => record.residency = clean(&elem_text(cell)),
            5 => record.case_status = cell_texts(cell),
            6 => record.last_updated = clean(&elem_text(cell)),
            _ => break,
        }
    }

    record
}

pub fn parse_case_table(
    html: &str,
    source: &SourceConfig,
) -> Result<Vec<CaseRecord>, ParseError> {
    if html.trim().is_empty() {
        return Err(ParseError::EmptyDocument);
    }

    let row_selector = Selector::parse(&source.row_selector).map_err(|e| {
        ParseError::InvalidSelector(format!("'{}': {:?}", source.row_selector, e))
    })?;

    let document = Html::parse_document(html);
    let skip = usize::from(source.skip_header);

    let records: Vec<CaseRecord> = document
        .select(&row_selector)
        .skip(skip)
        .map(|row| {
            let record = extract_record(row, &source.base_url);
            log::debug!("Extracted row: {} : {}", record.name, record.case_number);
            record
        })
        .collect();

    if records.is_empty() {
        log::warn!("No case rows matched selector '{}'", source.row_selector);
    }

    Ok(records)
}
