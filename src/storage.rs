use std::cell::RefCell;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::domain::HistoryData;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode history: {0}")]
    JsonEncode(#[from] serde_json::Error),
}

/// A missing or blank file is an empty history. So is a file that no longer
/// parses, after it has been copied aside to `<name>.bak`.
pub fn load_history(path: &Path) -> Result<HistoryData, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no history file yet");
            return Ok(HistoryData::new());
        }
        Err(err) => return Err(StorageError::Io(err)),
    };

    if raw.trim().is_empty() {
        return Ok(HistoryData::new());
    }

    match serde_json::from_str::<HistoryData>(&raw) {
        Ok(history) => {
            tracing::debug!(path = %path.display(), days = history.len(), "history loaded");
            Ok(history)
        }
        Err(err) => {
            let backup = backup_path(path);
            fs::copy(path, &backup)?;
            tracing::warn!(
                path = %path.display(),
                backup = %backup.display(),
                %err,
                "failed to load history, starting empty"
            );
            Ok(HistoryData::new())
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

pub fn save_history(path: &Path, history: &HistoryData) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let encoded = serde_json::to_string(history)?;
    let mut file = fs::File::create(path)?;
    file.write_all(encoded.as_bytes())?;
    tracing::debug!(path = %path.display(), days = history.len(), "history saved");
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SaveStatus(Rc<RefCell<Option<StorageError>>>);

impl SaveStatus {
    pub fn take_error(&self) -> Option<StorageError> {
        self.0.borrow_mut().take()
    }
}

/// Persistence hook that rewrites the history file after every change.
///
/// Writes are fire-and-forget: a failure is logged and parked in the
/// returned [`SaveStatus`] for the caller to report.
pub fn file_hook(path: PathBuf) -> (impl FnMut(&HistoryData) + 'static, SaveStatus) {
    let status = SaveStatus::default();
    let failures = status.clone();
    let hook = move |history: &HistoryData| {
        if let Err(err) = save_history(&path, history) {
            tracing::error!(path = %path.display(), %err, "failed to save history");
            *failures.0.borrow_mut() = Some(err);
        }
    };
    (hook, status)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use crate::domain::{DailyData, HistoryData};

    use super::{file_hook, load_history, save_history};

    #[test]
    fn round_trips_history_file() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("history.json");

        let mut history = HistoryData::new();
        let mut day = DailyData::from_templates(Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap());
        day.schedule[0].sub_tasks[0].completed = true;
        history.insert("2024-03-07".to_string(), day.clone());

        save_history(&path, &history).expect("save should succeed");
        let loaded = load_history(&path).expect("load should succeed");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["2024-03-07"], day);
    }

    #[test]
    fn missing_and_blank_files_are_empty() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("history.json");
        assert!(load_history(&path).expect("missing file").is_empty());

        fs::write(&path, "  \n").expect("write blank file");
        assert!(load_history(&path).expect("blank file").is_empty());
    }

    #[test]
    fn corrupt_file_recovers_to_empty() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("history.json");
        fs::write(&path, "{\"2024-03-07\": {\"schedule\": [").expect("write corrupt file");

        let loaded = load_history(&path).expect("corrupt content is not an error");
        assert!(loaded.is_empty());

        let backup = fs::read_to_string(dir.path().join("history.json.bak")).expect("backup kept");
        assert_eq!(backup, "{\"2024-03-07\": {\"schedule\": [");
    }

    #[test]
    fn day_missing_its_timestamp_keeps_the_rest() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("history.json");
        fs::write(
            &path,
            r#"{"2024-03-06":{"schedule":[],"priorities":[{"id":1,"text":"Ship","done":true}]},
               "2024-03-07":{"schedule":[],"priorities":[],"lastUpdated":1709800000000}}"#,
        )
        .expect("write history");

        let loaded = load_history(&path).expect("load should succeed");
        assert_eq!(loaded.len(), 2);
        assert!(loaded["2024-03-06"].priorities[0].done);
        assert!(!dir.path().join("history.json.bak").exists());
    }

    #[test]
    fn stored_layout_is_a_plain_date_map() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("history.json");
        let mut history = HistoryData::new();
        history.insert(
            "2024-03-07".to_string(),
            DailyData::from_templates(Utc.timestamp_millis_opt(1_709_800_000_000).unwrap()),
        );
        save_history(&path, &history).expect("save should succeed");

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read back")).expect("json");
        let day = &raw["2024-03-07"];
        assert_eq!(day["lastUpdated"], 1_709_800_000_000_i64);
        assert_eq!(day["schedule"][10]["timeRange"], "22:00 - End");
        assert_eq!(day["priorities"][0]["id"], 1);
    }

    #[test]
    fn file_hook_writes_and_reports_failures() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("history.json");
        let mut history = HistoryData::new();
        history.insert(
            "2024-03-07".to_string(),
            DailyData::from_templates(Utc.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap()),
        );

        let (mut hook, status) = file_hook(path.clone());
        hook(&history);
        assert!(status.take_error().is_none());
        assert_eq!(load_history(&path).expect("load").len(), 1);

        let blocked = dir.path().join("file");
        fs::write(&blocked, "not a directory").expect("write blocker");
        let (mut hook, status) = file_hook(blocked.join("history.json"));
        hook(&history);
        assert!(status.take_error().is_some());
        assert!(status.take_error().is_none());
    }
}
