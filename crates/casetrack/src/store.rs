use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::types::Dataset;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Sibling file a snapshot is written to before being renamed over `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(".tmp");
    PathBuf::from(o)
}

/// Reads a previously saved JSON dataset. A missing or unreadable file
/// starts the run from an empty dataset.
pub fn load_dataset(path: &Path) -> Dataset {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No previous dataset at {}, starting empty", path.display());
            return Dataset::new();
        }
        Err(e) => {
            log::warn!(
                "Could not read previous dataset {}: {}; starting empty",
                path.display(),
                e
            );
            return Dataset::new();
        }
    };

    match serde_json::from_str::<Dataset>(&text) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} case record(s) from {}",
                dataset.len(),
                path.display()
            );
            dataset
        }
        Err(e) => {
            log::warn!(
                "Previous dataset {} is not a case list: {}; starting empty",
                path.display(),
                e
            );
            Dataset::new()
        }
    }
}

pub fn to_json(dataset: &Dataset) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(dataset)?)
}

pub fn to_yaml(dataset: &Dataset) -> Result<String, StoreError> {
    Ok(serde_yaml::to_string(dataset)?)
}

fn write_temp(path: &Path, contents: &str) -> Result<PathBuf, StoreError> {
    let temp = temp_path(path);
    fs::write(&temp, contents).map_err(|source| StoreError::Io {
        path: temp.clone(),
        source,
    })?;
    Ok(temp)
}

fn discard(temp: &Path) {
    if let Err(e) = fs::remove_file(temp) {
        log::warn!("Could not remove {}: {}", temp.display(), e);
    }
}

fn replace(temp: &Path, path: &Path) -> Result<(), StoreError> {
    fs::rename(temp, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the YAML and JSON snapshots. Both are serialized before any file is
/// touched, and each lands through a rename of its `.tmp` sibling.
///
/// The JSON snapshot is replaced first since the next run loads from it. If
/// that fails neither file changes. A failure on the YAML rename afterwards
/// leaves the new JSON beside the old YAML.
pub fn save_dataset(dataset: &Dataset, output: &OutputConfig) -> Result<(), StoreError> {
    let yaml = to_yaml(dataset)?;
    let json = to_json(dataset)?;

    let yaml_temp = write_temp(&output.yaml_path, &yaml)?;
    let json_temp = write_temp(&output.json_path, &json)
        .inspect_err(|_| discard(&yaml_temp))?;

    replace(&json_temp, &output.json_path).inspect_err(|_| {
        discard(&json_temp);
        discard(&yaml_temp);
    })?;
    replace(&yaml_temp, &output.yaml_path).inspect_err(|_| discard(&yaml_temp))?;

    log::info!(
        "Saved {} case record(s) to {} and {}",
        dataset.len(),
        output.yaml_path.display(),
        output.json_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaseRecord;

    fn sample_dataset() -> Dataset {
        Dataset::from(vec![
            CaseRecord {
                case_number: "1:21-mj-00012".to_string(),
                name: "ADAMS, Avery".to_string(),
                charges: vec!["Assault".to_string(), "Trespassing".to_string()],
                links: vec!["https://www.justice.gov/usao-dc/file/1/download".to_string()],
                residency: "Ohio".to_string(),
                case_status: vec!["Arrested".to_string()],
                last_updated: "January 14, 2021".to_string(),
            },
            CaseRecord {
                name: "CARTER, Casey".to_string(),
                charges: vec!["Disorderly Conduct".to_string()],
                case_status: vec!["Complaint filed".to_string()],
                ..CaseRecord::default()
            },
        ])
    }

    fn output_in(dir: &Path) -> OutputConfig {
        OutputConfig {
            yaml_path: dir.join("cases.yml"),
            json_path: dir.join("cases.json"),
        }
    }

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(
            temp_path(Path::new("/tmp/cases.json")),
            PathBuf::from("/tmp/cases.json.tmp")
        );
    }

    #[test]
    fn test_json_round_trip_preserves_order_and_fields() {
        let dataset = sample_dataset();
        let json = to_json(&dataset).unwrap();
        let parsed: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dataset);
    }

    #[test]
    fn test_json_is_indented() {
        let json = to_json(&sample_dataset()).unwrap();
        assert!(json.starts_with("[\n  {\n    \"casenumber\""));
    }

    #[test]
    fn test_yaml_is_top_level_sequence() {
        let yaml = to_yaml(&sample_dataset()).unwrap();
        assert!(yaml.starts_with("- casenumber:"));
        assert!(yaml.contains("  lastupdated:"));

        let parsed: Dataset = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, sample_dataset());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());

        save_dataset(&sample_dataset(), &output).unwrap();

        assert!(output.yaml_path.exists());
        assert!(output.json_path.exists());
        assert!(!temp_path(&output.yaml_path).exists());
        assert!(!temp_path(&output.json_path).exists());
        assert_eq!(load_dataset(&output.json_path), sample_dataset());
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());

        save_dataset(&sample_dataset(), &output).unwrap();
        let smaller = Dataset::from(vec![sample_dataset().into_records().remove(0)]);
        save_dataset(&smaller, &output).unwrap();

        assert_eq!(load_dataset(&output.json_path).len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dataset(&dir.path().join("absent.json")).is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        fs::write(&path, "{\"not\": \"a list\"").unwrap();

        assert!(load_dataset(&path).is_empty());
    }

    #[test]
    fn test_load_tolerates_null_and_missing_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.json");
        fs::write(
            &path,
            r#"[
              {"casenumber": "1:21-mj-00012", "name": "ADAMS, Avery", "charges": null,
               "residency": "Ohio", "casestatus": null, "lastupdated": ""},
              {"casenumber": "", "name": "CARTER, Casey", "charges": ["Disorderly Conduct"],
               "links": [], "residency": "", "casestatus": ["Complaint filed"], "lastupdated": ""}
            ]"#,
        )
        .unwrap();

        let dataset = load_dataset(&path);

        assert_eq!(dataset.len(), 2);
        let first = &dataset.records()[0];
        assert_eq!(first.name, "ADAMS, Avery");
        assert!(first.charges.is_empty());
        assert!(first.links.is_empty());
        assert!(first.case_status.is_empty());
        assert_eq!(dataset.records()[1].charges, vec!["Disorderly Conduct"]);
    }

    #[test]
    fn test_failed_json_replace_leaves_previous_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());
        fs::write(&output.yaml_path, "OLD").unwrap();
        fs::create_dir(&output.json_path).unwrap();
        fs::write(output.json_path.join("occupied"), "x").unwrap();

        let err = save_dataset(&sample_dataset(), &output).unwrap_err();

        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().starts_with("I/O error on "));
        assert_eq!(fs::read_to_string(&output.yaml_path).unwrap(), "OLD");
        assert!(!temp_path(&output.yaml_path).exists());
        assert!(!temp_path(&output.json_path).exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(&dir.path().join("missing"));

        let result = save_dataset(&sample_dataset(), &output);

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(!output.json_path.exists());
    }
}
