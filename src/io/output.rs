use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::ParseOutcome;

/// Write a parse outcome as pretty JSON.
pub fn write_outcome(outcome: &ParseOutcome, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, outcome).context("Failed to write JSON")?;
    Ok(())
}

/// Roster of documents that failed during a batch run. Batch callers
/// record failures here and continue; a later run can retry only these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureRoster {
    failed: BTreeSet<String>,
}

impl FailureRoster {
    /// Load a roster file; a missing file is an empty roster.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster: {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse failure roster")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create roster: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write failure roster")?;
        Ok(())
    }

    pub fn record(&mut self, document: &str) {
        self.failed.insert(document.to_string());
    }

    pub fn clear(&mut self, document: &str) {
        self.failed.remove(document);
    }

    pub fn contains(&self, document: &str) -> bool {
        self.failed.contains(document)
    }

    pub fn len(&self) -> usize {
        self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DialogueStore;

    #[test]
    fn test_roster_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failed_files.json");

        let mut roster = FailureRoster::default();
        roster.record("tata_motors.json");
        roster.record("apollo.json");
        roster.clear("apollo.json");
        roster.save(&path).unwrap();

        let loaded = FailureRoster::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains("tata_motors.json"));

        // Serializes as a bare list of document names.
        let content = std::fs::read_to_string(&path).unwrap();
        let names: Vec<String> = serde_json::from_str(&content).unwrap();
        assert_eq!(names, vec!["tata_motors.json"]);
    }

    #[test]
    fn test_missing_roster_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let roster = FailureRoster::load(&dir.path().join("absent.json")).unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn test_write_outcome_keeps_bucket_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let mut store = DialogueStore::new();
        store.append_end("Raj", "Thank you everyone");
        write_outcome(&ParseOutcome::Segmented(store), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["commentary_and_future_outlook"].is_array());
        assert!(value["analyst_discussion"].is_object());
        assert_eq!(value["end"][0]["dialogue"], "thank you everyone");
    }
}
