use serde::{Deserialize, Serialize};

use crate::enums::{DamageArea, DamageType, Severity};
use crate::errors::CoreError;

/// User-asserted facts about one damage event.
///
/// Built from the selections made before upload and never mutated by the
/// pipeline afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub make: String,
    pub model: String,
    pub state: String,
    pub damage: Vec<DamageArea>,
    pub damage_severity: Severity,
    pub damage_type: Vec<DamageType>,
}

impl DamageRecord {
    /// Build a record, deduplicating areas and types in first-selection order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if make, model, or state is blank, or
    /// if no damage area was selected.
    pub fn new(
        make: impl Into<String>,
        model: impl Into<String>,
        state: impl Into<String>,
        areas: impl IntoIterator<Item = DamageArea>,
        types: impl IntoIterator<Item = DamageType>,
        severity: Severity,
    ) -> Result<Self, CoreError> {
        let record = Self {
            make: make.into().trim().to_string(),
            model: model.into().trim().to_string(),
            state: state.into().trim().to_uppercase(),
            damage: dedup_in_order(areas),
            damage_severity: severity,
            damage_type: dedup_in_order(types),
        };
        record.validate()?;
        Ok(record)
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] naming the first missing field.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("make", &self.make),
            ("model", &self.model),
            ("state", &self.state),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!("{field} must not be empty")));
            }
        }
        if self.damage.is_empty() {
            return Err(CoreError::Validation(
                "at least one damage area must be selected".to_string(),
            ));
        }
        Ok(())
    }
}

fn dedup_in_order<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// A [`DamageRecord`] plus the short model-generated damage description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribedRecord {
    #[serde(flatten)]
    pub record: DamageRecord,
    pub damage_description: String,
}

impl DescribedRecord {
    #[must_use]
    pub const fn new(record: DamageRecord, damage_description: String) -> Self {
        Self {
            record,
            damage_description,
        }
    }
}
