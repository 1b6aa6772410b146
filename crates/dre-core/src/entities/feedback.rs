use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::DamageRecord;
use crate::enums::{DamageArea, DamageType, FeedbackPolarity, Severity};

/// User-entered outcome fields collected after an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackForm {
    pub service_center: String,
    /// Total repair cost in whole dollars.
    pub repair_cost: u32,
    pub parts_for_repair: Vec<String>,
    pub labor_hours: u32,
    pub parts_cost: u32,
    pub labor_cost: u32,
}

impl Default for FeedbackForm {
    fn default() -> Self {
        Self {
            service_center: String::new(),
            repair_cost: 0,
            parts_for_repair: Self::parse_parts("Right fender, Paint"),
            labor_hours: 0,
            parts_cost: 0,
            labor_cost: 0,
        }
    }
}

impl FeedbackForm {
    /// Split comma-separated part names, trimming and dropping empties.
    #[must_use]
    pub fn parse_parts(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    }
}

/// One outcome record appended to the feedback ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub make: String,
    pub model: String,
    pub state: String,
    pub damage: Vec<DamageArea>,
    pub damage_severity: Severity,
    pub damage_type: Vec<DamageType>,
    pub damage_description: String,
    pub service_center: String,
    pub repair_cost: u32,
    pub parts_for_repair: Vec<String>,
    pub labor_hours: u32,
    pub parts_cost: u32,
    pub labor_cost: u32,
    pub s3_location: String,
    pub feedback: FeedbackPolarity,
    pub recorded_at: DateTime<Utc>,
}

impl FeedbackEntry {
    #[must_use]
    pub fn new(
        record: &DamageRecord,
        damage_description: &str,
        form: &FeedbackForm,
        s3_location: &str,
        feedback: FeedbackPolarity,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            make: record.make.clone(),
            model: record.model.clone(),
            state: record.state.clone(),
            damage: record.damage.clone(),
            damage_severity: record.damage_severity,
            damage_type: record.damage_type.clone(),
            damage_description: damage_description.to_string(),
            service_center: form.service_center.clone(),
            repair_cost: form.repair_cost,
            parts_for_repair: form.parts_for_repair.clone(),
            labor_hours: form.labor_hours,
            parts_cost: form.parts_cost,
            labor_cost: form.labor_cost,
            s3_location: s3_location.to_string(),
            feedback,
            recorded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parts_are_trimmed_and_empties_dropped() {
        assert_eq!(
            FeedbackForm::parse_parts(" Bumper , ,Paint,  "),
            vec!["Bumper".to_string(), "Paint".to_string()]
        );
        assert!(FeedbackForm::parse_parts(" , ").is_empty());
    }

    #[test]
    fn default_form_matches_initial_values() {
        let form = FeedbackForm::default();
        assert!(form.service_center.is_empty());
        assert_eq!(form.parts_for_repair, vec!["Right fender", "Paint"]);
        assert_eq!(form.repair_cost, 0);
    }
}
