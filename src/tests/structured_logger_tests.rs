use super::*;
use crate::domain::{Section, YesNo};
use tempfile::TempDir;

fn create_test_logger() -> (StructuredLogger, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = StructuredLogger::new(temp_dir.path()).expect("Failed to create logger");
    (logger, temp_dir)
}

fn read_entries(temp_dir: &TempDir) -> Vec<LogEntry> {
    let content = std::fs::read_to_string(temp_dir.path().join("events.jsonl"))
        .expect("Failed to read log file");
    content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Failed to parse log entry"))
        .collect()
}

fn case() -> CaseId {
    CaseId::from("M-1111-2222-3333")
}

#[test]
fn test_log_entries_are_valid_json() {
    let (logger, temp_dir) = create_test_logger();

    logger.log(&case(), "TestComponent", serde_json::json!({"key": "value1"}));
    logger.log(&case(), "TestComponent", serde_json::json!({"key": "value2"}));

    let entries = read_entries(&temp_dir);
    assert_eq!(entries.len(), 2);
    for entry in entries {
        assert_eq!(entry.case_id, "M-1111-2222-3333");
        assert_eq!(entry.component, "TestComponent");
    }
}

#[test]
fn test_sequence_numbers_monotonic() {
    let (logger, temp_dir) = create_test_logger();

    for i in 0..10 {
        logger.log(&case(), "Test", serde_json::json!({"iteration": i}));
    }

    let mut prev_seq = 0u64;
    for entry in read_entries(&temp_dir) {
        assert!(
            entry.seq > prev_seq,
            "Sequence numbers should be monotonically increasing"
        );
        prev_seq = entry.seq;
    }
}

#[test]
fn test_concurrent_logging() {
    use std::sync::Arc;
    use std::thread;

    let (logger, temp_dir) = create_test_logger();
    let logger = Arc::new(logger);

    let handles: Vec<_> = (0..5)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..20 {
                    logger.log(&case(), "Thread", serde_json::json!({"thread": t, "iteration": i}));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(read_entries(&temp_dir).len(), 100);
}

#[test]
fn test_timestamp_format() {
    let (logger, temp_dir) = create_test_logger();

    logger.log(&case(), "Test", serde_json::json!({"msg": "test"}));

    let entry = read_entries(&temp_dir).remove(0);
    assert!(entry.ts.contains('T'));
    assert!(entry.ts.ends_with('Z'));
    let micros_part = entry.ts.split('.').nth(1).unwrap();
    assert_eq!(micros_part.len(), 7); // 6 digits + 'Z'
}

#[test]
fn test_command_and_event_logging() {
    let (logger, temp_dir) = create_test_logger();

    logger.log_command(&case(), &StepCommand::SetCanSign { can_sign: YesNo::No });
    logger.log_event(
        &case(),
        &StepEvent::AnswerRecorded {
            section: Section::YourDetails,
            field: "can_sign",
        },
    );

    let entries = read_entries(&temp_dir);
    assert_eq!(entries[0].component, "Application");
    assert_eq!(entries[0].event["type"], "StepCommand");
    assert_eq!(entries[0].event["command"]["type"], "SetCanSign");
    assert_eq!(entries[0].event["command"]["can_sign"], "no");
    assert_eq!(entries[1].event["type"], "StepEvent");
    assert_eq!(entries[1].event["event"]["section"], "your_details");
}

#[test]
fn test_notification_logging() {
    let (logger, temp_dir) = create_test_logger();

    logger.log_notification(
        &case(),
        NotificationDirective::MeetingPrompt,
        NotificationTemplate::CertificateProviderMeetingPrompt,
    );

    let entry = read_entries(&temp_dir).remove(0);
    assert_eq!(entry.component, "Review");
    assert_eq!(entry.event["type"], "NotificationSent");
    assert_eq!(entry.event["directive"], "meeting_prompt");
    assert_eq!(
        entry.event["template"],
        "certificate_provider_meeting_prompt"
    );
}

#[test]
fn test_reopening_appends() {
    let temp_dir = TempDir::new().unwrap();
    {
        let logger = StructuredLogger::new(temp_dir.path()).unwrap();
        logger.log(&case(), "Test", serde_json::json!({"run": 1}));
    }
    let logger = StructuredLogger::new(temp_dir.path()).unwrap();
    logger.log(&case(), "Test", serde_json::json!({"run": 2}));

    assert_eq!(read_entries(&temp_dir).len(), 2);
    assert_eq!(logger.path(), &temp_dir.path().join("events.jsonl"));
}

#[test]
fn test_from_config_uses_logs_dir() {
    let temp_dir = TempDir::new().unwrap();
    let config = EngineConfig {
        logs_dir: Some(temp_dir.path().join("logs")),
        ..EngineConfig::default()
    };

    let logger = StructuredLogger::from_config(&config).unwrap().unwrap();
    logger.log(&case(), "Test", serde_json::json!({"run": 1}));

    assert!(temp_dir.path().join("logs").join("events.jsonl").exists());
    assert!(StructuredLogger::from_config(&EngineConfig::default())
        .unwrap()
        .is_none());
}
