use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

/// Saved snapshots may carry `null` lists or omit keys entirely; both read
/// as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseRecord {
    #[serde(rename = "casenumber", deserialize_with = "null_as_default")]
    pub case_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub charges: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub residency: String,
    #[serde(rename = "casestatus", deserialize_with = "null_as_default")]
    pub case_status: Vec<String>,
    #[serde(rename = "lastupdated", deserialize_with = "null_as_default")]
    pub last_updated: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Display for CaseRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.case_number.is_empty() {
            write!(f, "{} [no case number]", self.name)?;
        } else {
            write!(f, "{} [{}]", self.name, self.case_number)?;
        }
        if !self.residency.is_empty() {
            write!(f, "\n     Residency: {}", self.residency)?;
        }
        for charge in &self.charges {
            write!(f, "\n     Charge:    {}", charge)?;
        }
        for status in &self.case_status {
            write!(f, "\n     Status:    {}", status)?;
        }
        if !self.last_updated.is_empty() {
            write!(f, "\n     Updated:   {}", self.last_updated)?;
        }
        for link in &self.links {
            write!(f, "\n     Link:      {}", link)?;
        }
        Ok(())
    }
}

/// Case records in first-seen order. Serializes as a bare sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<CaseRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<CaseRecord> {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<CaseRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseRecord> {
        self.records.iter()
    }
}

impl From<Vec<CaseRecord>> for Dataset {
    fn from(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a CaseRecord;
    type IntoIter = std::slice::Iter<'a, CaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug)]
pub struct DatasetStats {
    pub with_case_number: usize,
    pub with_links: usize,
    pub total: usize,
}

impl DatasetStats {
    pub fn from_records(records: &[CaseRecord]) -> DatasetStats {
        DatasetStats {
            with_case_number: records
                .iter()
                .filter(|r| !r.case_number.is_empty())
                .count(),
            with_links: records.iter().filter(|r| !r.links.is_empty()).count(),
            total: records.len(),
        }
    }
}

impl Display for DatasetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  With case number: {}", self.with_case_number)?;
        writeln!(f, "  With links:       {}", self.with_links)?;
        writeln!(f, "  Total:            {}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CaseRecord {
        CaseRecord {
            case_number: "1:21-mj-00123".to_string(),
            name: "Doe, Jane".to_string(),
            charges: vec!["Entering a Restricted Building".to_string()],
            links: vec!["https://www.justice.gov/usao-dc/case/doe".to_string()],
            residency: "Ohio".to_string(),
            case_status: vec!["Arrested".to_string()],
            last_updated: "January 20, 2021".to_string(),
        }
    }

    #[test]
    fn test_serialized_keys_are_lowercase_without_separators() {
        let json = serde_json::to_value(sample()).expect("Failed to serialize");
        let object = json.as_object().expect("Record should be an object");

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "casenumber",
                "casestatus",
                "charges",
                "lastupdated",
                "links",
                "name",
                "residency"
            ]
        );
    }

    #[test]
    fn test_dataset_serializes_as_bare_sequence() {
        let dataset = Dataset::from(vec![sample()]);
        let json = serde_json::to_value(&dataset).expect("Failed to serialize");

        assert!(json.is_array());
        assert_eq!(json[0]["casenumber"], "1:21-mj-00123");
        assert_eq!(json[0]["lastupdated"], "January 20, 2021");
    }

    #[test]
    fn test_null_and_missing_fields_read_as_empty() {
        let json = r#"[{"casenumber": null, "name": "Doe, Jane", "charges": null, "casestatus": ["Arrested"]}]"#;

        let dataset: Dataset = serde_json::from_str(json).expect("Failed to deserialize");

        let record = &dataset.records()[0];
        assert_eq!(record.name, "Doe, Jane");
        assert!(record.case_number.is_empty());
        assert!(record.charges.is_empty());
        assert!(record.links.is_empty());
        assert!(record.residency.is_empty());
        assert_eq!(record.case_status, vec!["Arrested"]);
        assert!(record.last_updated.is_empty());
    }

    #[test]
    fn test_dataset_stats() {
        let mut no_number = sample();
        no_number.case_number.clear();
        no_number.links.clear();

        let stats = DatasetStats::from_records(&[sample(), no_number]);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.with_case_number, 1);
        assert_eq!(stats.with_links, 1);
    }

    #[test]
    fn test_display_marks_missing_case_number() {
        let mut record = sample();
        record.case_number.clear();

        let text = record.to_string();
        assert!(text.starts_with("Doe, Jane [no case number]"));
        assert!(text.contains("Charge:    Entering a Restricted Building"));
    }
}
