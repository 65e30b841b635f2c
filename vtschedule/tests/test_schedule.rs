use serde_json::json;
use std::fs;
use vtschedule::{Error, Schedule, ScheduleBlock, ScheduleService};

fn short_day() -> Schedule {
    Schedule {
        school_start: "09:00".into(),
        school_end: "10:00".into(),
        blocks: vec![
            ScheduleBlock::new("09:00", "09:40", "Math", "lesson"),
            ScheduleBlock::new("09:40", "10:00", "Recess", "break"),
        ],
    }
}

#[test]
fn test_missing_document_returns_default_day() {
    let dir = tempfile::tempdir().unwrap();
    let service = ScheduleService::new(dir.path().join("schedule.json"));

    let schedule = service.get().unwrap();
    assert_eq!(schedule.school_start, "08:50");
    assert_eq!(schedule.school_end, "15:55");
    assert_eq!(schedule.blocks[7].name, "Öğle Arası");
    assert_eq!(schedule.blocks[7].kind, "lunch");
    // La lecture n'écrit rien
    assert!(!dir.path().join("schedule.json").exists());
}

#[test]
fn test_ensure_default_writes_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let service = ScheduleService::new(&path);

    service.ensure_default().unwrap();
    assert!(path.exists());

    service.set(short_day()).unwrap();
    assert_eq!(service.ensure_default().unwrap(), short_day());
}

#[test]
fn test_update_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let service = ScheduleService::new(dir.path().join("schedule.json"));

    service
        .apply_update(&serde_json::to_value(short_day()).unwrap())
        .unwrap();
    assert_eq!(service.get().unwrap(), short_day());

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("schedule.json")).unwrap())
            .unwrap();
    assert_eq!(raw["blocks"][1]["type"], "break");
}

#[test]
fn test_invalid_schedules_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let service = ScheduleService::new(dir.path().join("schedule.json"));

    let cases = [
        (
            json!({"school_start": "9:00", "school_end": "10:00"}),
            "school_start has invalid time '9:00'. Must be HH:MM.",
        ),
        (
            json!({"school_start": "11:00", "school_end": "10:00"}),
            "school_start must be before school_end.",
        ),
        (
            json!({"school_start": "09:00", "school_end": "10:00", "blocks": [
                {"start_time": "09:30", "end_time": "09:10", "name": "Math", "type": "lesson"}
            ]}),
            "Block 0 must start before it ends.",
        ),
        (
            json!({"school_start": "09:00", "school_end": "10:00", "blocks": [
                {"start_time": "09:00", "end_time": "09:40", "name": "Math", "type": "lesson"},
                {"start_time": "09:40", "end_time": "25:00", "name": "Late", "type": "lesson"}
            ]}),
            "Block 1 end_time has invalid time '25:00'. Must be HH:MM.",
        ),
    ];

    for (payload, message) in cases {
        let err = service.apply_update(&payload).unwrap_err();
        assert!(matches!(err, Error::InvalidSchedule(_)));
        assert_eq!(err.to_string(), message);
    }

    let err = service.apply_update(&json!({"blocks": []})).unwrap_err();
    assert!(err.to_string().starts_with("Invalid schedule format"));
    assert!(!dir.path().join("schedule.json").exists());
}
