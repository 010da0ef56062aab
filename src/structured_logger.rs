//! Structured JSONL logger for auditing engine decisions.
//!
//! This module provides machine-parseable logging with:
//! - Monotonic sequence numbers for ordering
//! - ISO 8601 timestamps with microsecond precision
//! - Case IDs for correlation
//! - Structured event data in JSON format
//!
//! Notification decisions are written here as the engine's metric stream.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::config::EngineConfig;
use crate::domain::{CaseId, NotificationTemplate};
use crate::review::NotificationDirective;
use crate::state_machine::{StepCommand, StepEvent};

pub struct StructuredLogger {
    seq: AtomicU64,
    log_file: Mutex<File>,
    log_path: PathBuf,
}

/// A single log entry in JSONL format.
#[derive(Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number (unique per logger)
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds
    pub ts: String,
    pub case_id: String,
    /// Component that emitted the log
    pub component: String,
    pub event: Value,
}

impl StructuredLogger {
    /// Creates a logger writing to `<logs_dir>/events.jsonl`, appending if the
    /// file already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The logs directory cannot be created
    /// - The log file cannot be opened
    pub fn new(logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join("events.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
            log_path,
        })
    }

    /// Opens the logger named by `config.logs_dir`, or `None` when the config
    /// has no log directory.
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Option<Self>> {
        config.logs_dir.as_deref().map(Self::new).transpose()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event as a single line. Thread-safe; write failures
    /// are dropped.
    pub fn log(&self, case_id: &CaseId, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            case_id: case_id.to_string(),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    pub fn log_command(&self, case_id: &CaseId, command: &StepCommand) {
        self.log(
            case_id,
            "Application",
            serde_json::json!({
                "type": "StepCommand",
                "command": command
            }),
        );
    }

    pub fn log_event(&self, case_id: &CaseId, event: &StepEvent) {
        self.log(
            case_id,
            "Application",
            serde_json::json!({
                "type": "StepEvent",
                "event": event
            }),
        );
    }

    /// Logs the notification chosen for a completed review.
    pub fn log_notification(
        &self,
        case_id: &CaseId,
        directive: NotificationDirective,
        template: NotificationTemplate,
    ) {
        self.log(
            case_id,
            "Review",
            serde_json::json!({
                "type": "NotificationSent",
                "directive": directive,
                "template": template
            }),
        );
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
#[path = "tests/structured_logger_tests.rs"]
mod tests;
