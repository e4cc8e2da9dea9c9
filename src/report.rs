use crate::model::{format_timestamp, now, NoteId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Ok,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub at: String,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<NoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub outcome: Outcome,
}

impl ReportEntry {
    pub fn new(action: Action, note: Option<NoteId>, title: Option<String>, outcome: Outcome) -> Self {
        ReportEntry {
            at: format_timestamp(&now()),
            action,
            note,
            title,
            outcome,
        }
    }
}

/// Append-only record of mutation outcomes. Entries are never rewritten.
pub trait ReportSink: Send {
    fn record(&mut self, entry: &ReportEntry) -> Result<()>;
}

/// One JSON object per line.
pub struct JsonlReport {
    path: PathBuf,
}

impl JsonlReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonlReport { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for JsonlReport {
    fn record(&mut self, entry: &ReportEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {:?}", self.path))?;
        let line = serde_json::to_string(entry).context("serializing report entry")?;
        writeln!(file, "{}", line).with_context(|| format!("writing {:?}", self.path))?;
        Ok(())
    }
}

pub fn read_entries(path: &Path) -> Result<Vec<ReportEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    data.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("parsing report entry"))
        .collect()
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct MemoryReport {
        pub entries: Arc<Mutex<Vec<ReportEntry>>>,
    }

    impl MemoryReport {
        pub fn entries(&self) -> Vec<ReportEntry> {
            self.entries.lock().unwrap().clone()
        }
    }

    impl ReportSink for MemoryReport {
        fn record(&mut self, entry: &ReportEntry) -> Result<()> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_appended_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("activity.jsonl");
        let mut report = JsonlReport::new(&path);
        let created = ReportEntry::new(Action::Create, None, Some("A".into()), Outcome::Ok);
        let failed = ReportEntry::new(
            Action::Delete,
            Some(NoteId(4)),
            None,
            Outcome::Failed {
                reason: "network error: refused".into(),
            },
        );
        report.record(&created).unwrap();
        report.record(&failed).unwrap();

        let entries = read_entries(report.path()).unwrap();
        assert_eq!(entries, vec![created, failed]);
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.contains(r#""status":"failed""#));
    }

    #[test]
    fn missing_report_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_entries(&dir.path().join("activity.jsonl"))
            .unwrap()
            .is_empty());
    }
}
