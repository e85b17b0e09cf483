use std::fmt::Display;

use crate::types::{CaseRecord, Dataset};

/// Whether two records describe the same case.
///
/// When either side lacks a case number the names decide, and both must be
/// non-empty. Otherwise case number and name must both agree, so a reused or
/// mistyped case number on a different person never matches. A record with a
/// case number never matches one without unless the names are equal.
pub fn is_same_case(existing: &CaseRecord, incoming: &CaseRecord) -> bool {
    if existing.case_number.is_empty() || incoming.case_number.is_empty() {
        return !existing.name.is_empty() && existing.name == incoming.name;
    }

    existing.case_number == incoming.case_number && existing.name == incoming.name
}

impl CaseRecord {
    /// Takes the incoming links, charges, status and last-updated value where
    /// they are non-empty. Identity fields and residency stay as first seen.
    pub fn absorb(&mut self, incoming: CaseRecord) {
        if !incoming.links.is_empty() {
            self.links = incoming.links;
        }
        if !incoming.charges.is_empty() {
            self.charges = incoming.charges;
        }
        if !incoming.case_status.is_empty() {
            self.case_status = incoming.case_status;
        }
        if !incoming.last_updated.is_empty() {
            self.last_updated = incoming.last_updated;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Index of the existing record that absorbed the new one.
    Updated(usize),
    /// Index the new record was appended at.
    Added(usize),
}

impl MergeOutcome {
    pub fn matched(&self) -> bool {
        matches!(self, MergeOutcome::Updated(_))
    }
}

impl Dataset {
    /// Folds one freshly scraped record in: the first matching record is
    /// updated, otherwise the record is appended.
    pub fn merge(&mut self, record: CaseRecord) -> MergeOutcome {
        let records = self.records_mut();

        match records.iter().position(|existing| is_same_case(existing, &record)) {
            Some(index) => {
                log::info!("updated : {} : {}", record.name, record.case_number);
                records[index].absorb(record);
                MergeOutcome::Updated(index)
            }
            None => {
                log::info!("added : {} : {}", record.name, record.case_number);
                records.push(record);
                MergeOutcome::Added(records.len() - 1)
            }
        }
    }
}

/// Value-style form of [`Dataset::merge`], returning whether a record matched.
pub fn merge(mut dataset: Dataset, record: CaseRecord) -> (Dataset, bool) {
    let matched = dataset.merge(record).matched();
    (dataset, matched)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
}

impl MergeSummary {
    pub fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Updated(_) => self.updated += 1,
            MergeOutcome::Added(_) => self.added += 1,
        }
    }

    pub fn seen(&self) -> usize {
        self.added + self.updated
    }
}

impl Display for MergeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} row(s) scraped: {} added, {} updated",
            self.seen(),
            self.added,
            self.updated
        )
    }
}

/// Merges every record in order, returning the tally.
pub fn merge_all(
    dataset: &mut Dataset,
    records: impl IntoIterator<Item = CaseRecord>,
) -> MergeSummary {
    let mut summary = MergeSummary::default();
    for record in records {
        summary.record(dataset.merge(record));
    }
    summary
}
