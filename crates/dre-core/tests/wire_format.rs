//! Wire-format checks for records that leave the process: the feedback
//! ledger entry and the described record sent to the embedder.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use dre_core::{
    DamageArea, DamageRecord, DamageType, DescribedRecord, FeedbackEntry, FeedbackForm,
    FeedbackPolarity, MatchResult, Severity,
};

fn record() -> DamageRecord {
    DamageRecord::new(
        "Make_2",
        "Model_2",
        "FL",
        [DamageArea::RearLeft, DamageArea::Wheel],
        [DamageType::Scratch],
        Severity::Light,
    )
    .unwrap()
}

#[test]
fn feedback_entry_uses_ledger_field_names() {
    let form = FeedbackForm {
        service_center: "Gulf Collision".into(),
        repair_cost: 650,
        parts_for_repair: FeedbackForm::parse_parts("Rear bumper, Paint"),
        labor_hours: 3,
        parts_cost: 400,
        labor_cost: 250,
    };
    let recorded_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let entry = FeedbackEntry::new(
        &record(),
        "Scratched rear left panel",
        &form,
        "https://uploads.example/ses-1/0001-car.jpg",
        FeedbackPolarity::Positive,
        recorded_at,
    );

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(
        value,
        json!({
            "make": "Make_2",
            "model": "Model_2",
            "state": "FL",
            "damage": ["Rear Left", "Wheel"],
            "damage_severity": "light",
            "damage_type": ["Scratch"],
            "damage_description": "Scratched rear left panel",
            "service_center": "Gulf Collision",
            "repair_cost": 650,
            "parts_for_repair": ["Rear bumper", "Paint"],
            "labor_hours": 3,
            "parts_cost": 400,
            "labor_cost": 250,
            "s3_location": "https://uploads.example/ses-1/0001-car.jpg",
            "feedback": "positive",
            "recorded_at": "2024-05-01T12:00:00Z"
        })
    );

    let back: FeedbackEntry = serde_json::from_value(value).unwrap();
    assert_eq!(back, entry);
}

#[test]
fn described_record_parses_from_model_shape() {
    let raw = json!({
        "make": "Make_2",
        "model": "Model_2",
        "state": "FL",
        "damage": ["Rear Left", "Wheel"],
        "damage_severity": "light",
        "damage_type": ["Scratch"],
        "damage_description": "Scratched rear left panel"
    });
    let described: DescribedRecord = serde_json::from_value(raw).unwrap();
    assert_eq!(described.record, record());
    assert_eq!(described.damage_description, "Scratched rear left panel");
}

#[test]
fn match_result_metadata_is_preserved_verbatim() {
    let metadata = json!({
        "make": "Make_1",
        "repair_cost": 500,
        "state": "FL",
        "service_provider_name": "Bay Auto Body",
        "s3_location": "images/1.jpg",
        "extra": {"nested": true}
    });
    let result = MatchResult {
        rank: 1,
        score: 0.91,
        metadata: metadata.as_object().cloned().unwrap(),
        image_location: "images/1.jpg".into(),
    };
    let text = result.metadata_json();
    let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed, metadata);
    assert_eq!(result.state(), Some("FL"));
    assert_eq!(result.repair_cost(), Some(500.0));
}
