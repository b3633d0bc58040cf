use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::{Job, StatusUpdate};
use crate::service::{ServiceError, StatusSink};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid job file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a correction job from a JSON file
pub fn read_job(path: &Path) -> Result<Job, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write a job (typically exported from a session) as pretty JSON
pub fn write_job(path: &Path, job: &Job) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, job)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Status sink appending every update to a JSON Lines file
#[derive(Debug)]
pub struct StatusLog {
    path: PathBuf,
    file: File,
}

impl StatusLog {
    /// Open `path` for appending, creating it and its parent directories
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, IoError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append<T: Serialize>(&mut self, record: &T) -> Result<(), ServiceError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        Ok(())
    }
}

impl StatusSink for StatusLog {
    fn save_status(&mut self, update: &StatusUpdate) -> Result<(), ServiceError> {
        self.append(update)
    }
}

/// Read back every update written by a [`StatusLog`]
pub fn read_status_log(path: &Path) -> Result<Vec<StatusUpdate>, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(IoError::Json))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Status, TransformId};
    use crate::session::{Session, SessionOptions};
    use crate::tests::{create_test_dir, create_test_file, he_hzve_job};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_job_from_service_json() {
        let dir = create_test_dir();
        let path = create_test_file(
            &dir,
            "job.json",
            r#"{
                "id": 42,
                "status": 201,
                "grammarScore": null,
                "corrected": "The cat.",
                "rulesApplied": [{
                    "originalSentence": [{"id": 1, "value": "Teh", "after": " "}, {"id": 2, "value": "cat", "after": "."}],
                    "transformations": [{
                        "tokensAffected": [{"id": 1, "value": "Teh", "after": " "}],
                        "tokensAdded": [{"id": 3, "value": "The", "after": " "}],
                        "hasReplacement": true,
                        "isSuggestion": false,
                        "ruleId": "SPELLING"
                    }]
                }]
            }"#,
        );

        let job = read_job(&path).unwrap();

        assert!(job.is_successful());
        assert_eq!(job.grammar_score(), None);
        assert_eq!(job.rules_applied.len(), 1);
        assert_eq!(job.rules_applied[0].transformations[0].status, None);
        assert!(job.extra.contains_key("corrected"));
    }

    #[test]
    fn test_read_job_not_found() {
        let dir = create_test_dir();
        let result = read_job(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_read_job_invalid_json() {
        let dir = create_test_dir();
        let path = create_test_file(&dir, "broken.json", "{ not json");
        assert!(matches!(read_job(&path), Err(IoError::Json(_))));
    }

    #[test]
    fn test_write_then_read_job_keeps_decisions() {
        let dir = create_test_dir();
        let path = dir.path().join("nested").join("progress.json");

        let mut session = Session::new(he_hzve_job());
        session.accept_correction(TransformId(0)).unwrap();
        write_job(&path, &session.to_job()).unwrap();

        let recovered = Session::new(read_job(&path).unwrap());
        assert_eq!(recovered.current_text(), "He have be there befor.");
        assert!(recovered.is_accepted(TransformId(0)));
    }

    #[test]
    fn test_status_log_appends_json_lines() {
        let dir = create_test_dir();
        let path = dir.path().join("status.jsonl");

        let log = StatusLog::open(&path).unwrap();
        assert_eq!(log.path(), path.as_path());

        let mut session = Session::new(he_hzve_job())
            .with_options(SessionOptions {
                persist: true,
                ..Default::default()
            })
            .with_sink(log);
        session.accept_correction(TransformId(0)).unwrap();
        session.reject_correction(TransformId(2)).unwrap();
        drop(session);

        let updates = read_status_log(&path).unwrap();
        let statuses: Vec<Status> = updates.iter().map(|u| u.status).collect();
        assert_eq!(statuses, vec![Status::Accepted, Status::Rejected]);
        assert_eq!(updates[0].sentence, "He hzve be there befor.");
        assert_eq!(updates[1].sentence, "He have be there befor.");
    }
}
