//! Selection enums for damage records, feedback, and upload handling.
//!
//! Damage areas and types serialize with the human labels used by the
//! historical repair records (`"Front Left"`, `"Fender Bender"`), severity and
//! the policy enums use `snake_case`. Every enum parses leniently from labels,
//! `snake_case`, or `kebab-case` via [`FromStr`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Normalize a user-supplied label: lowercase, `-`/`_` as spaces, single spaces.
fn normalize(raw: &str) -> String {
    raw.replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn parse_from_labels<T: Copy>(
    raw: &str,
    all: &[T],
    label: impl Fn(T) -> &'static str,
    kind: &str,
) -> Result<T, CoreError> {
    let wanted = normalize(raw);
    all.iter()
        .copied()
        .find(|candidate| normalize(label(*candidate)) == wanted)
        .ok_or_else(|| CoreError::Validation(format!("invalid {kind} '{raw}'")))
}

// ---------------------------------------------------------------------------
// DamageArea
// ---------------------------------------------------------------------------

/// Vehicle area affected by the damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageArea {
    #[serde(rename = "Hood")]
    Hood,
    #[serde(rename = "Rear Left")]
    RearLeft,
    #[serde(rename = "Rear Right")]
    RearRight,
    #[serde(rename = "Front Left")]
    FrontLeft,
    #[serde(rename = "Front Right")]
    FrontRight,
    #[serde(rename = "Wheel")]
    Wheel,
    #[serde(rename = "Driver Side")]
    DriverSide,
    #[serde(rename = "Passenger Side")]
    PassengerSide,
    #[serde(rename = "Driver Side Door")]
    DriverSideDoor,
    #[serde(rename = "Passenger Side Door")]
    PassengerSideDoor,
    #[serde(rename = "Windshield")]
    Windshield,
}

impl DamageArea {
    pub const ALL: [Self; 11] = [
        Self::Hood,
        Self::RearLeft,
        Self::RearRight,
        Self::FrontLeft,
        Self::FrontRight,
        Self::Wheel,
        Self::DriverSide,
        Self::PassengerSide,
        Self::DriverSideDoor,
        Self::PassengerSideDoor,
        Self::Windshield,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hood => "Hood",
            Self::RearLeft => "Rear Left",
            Self::RearRight => "Rear Right",
            Self::FrontLeft => "Front Left",
            Self::FrontRight => "Front Right",
            Self::Wheel => "Wheel",
            Self::DriverSide => "Driver Side",
            Self::PassengerSide => "Passenger Side",
            Self::DriverSideDoor => "Driver Side Door",
            Self::PassengerSideDoor => "Passenger Side Door",
            Self::Windshield => "Windshield",
        }
    }
}

impl fmt::Display for DamageArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DamageArea {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from_labels(s, &Self::ALL, Self::as_str, "damage area")
    }
}

// ---------------------------------------------------------------------------
// DamageType
// ---------------------------------------------------------------------------

/// Kind of damage observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageType {
    #[serde(rename = "Scratch")]
    Scratch,
    #[serde(rename = "Dent")]
    Dent,
    #[serde(rename = "Fender Bender")]
    FenderBender,
    #[serde(rename = "Broken")]
    Broken,
}

impl DamageType {
    pub const ALL: [Self; 4] = [Self::Scratch, Self::Dent, Self::FenderBender, Self::Broken];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scratch => "Scratch",
            Self::Dent => "Dent",
            Self::FenderBender => "Fender Bender",
            Self::Broken => "Broken",
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DamageType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from_labels(s, &Self::ALL, Self::as_str, "damage type")
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// User-asserted damage severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Light,
    Moderate,
    Severe,
    Major,
}

impl Severity {
    pub const ALL: [Self; 4] = [Self::Light, Self::Moderate, Self::Severe, Self::Major];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_from_labels(s, &Self::ALL, Self::as_str, "severity")
    }
}

// ---------------------------------------------------------------------------
// FeedbackPolarity
// ---------------------------------------------------------------------------

/// Thumbs up / thumbs down on an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackPolarity {
    Positive,
    Negative,
}

impl FeedbackPolarity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for FeedbackPolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackPolarity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "positive" | "up" | "thumbs up" => Ok(Self::Positive),
            "negative" | "down" | "thumbs down" => Ok(Self::Negative),
            _ => Err(CoreError::Validation(format!("invalid feedback '{s}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// UploadPolicy
// ---------------------------------------------------------------------------

/// When an uploaded image is persisted relative to the vehicle presence check.
///
/// ```text
/// store_then_validate:  put → detect → (reject | continue)
/// validate_then_store:  detect → (reject | put → continue)
/// ```
///
/// `store_then_validate` keeps rejected uploads in the bucket for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPolicy {
    #[default]
    StoreThenValidate,
    ValidateThenStore,
}

impl UploadPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StoreThenValidate => "store_then_validate",
            Self::ValidateThenStore => "validate_then_store",
        }
    }

    /// Whether the upload is persisted before the presence check runs.
    #[must_use]
    pub const fn stores_before_validation(self) -> bool {
        matches!(self, Self::StoreThenValidate)
    }
}

impl fmt::Display for UploadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Front Left", DamageArea::FrontLeft)]
    #[case("front-left", DamageArea::FrontLeft)]
    #[case("front_left", DamageArea::FrontLeft)]
    #[case(" Driver side Door", DamageArea::DriverSideDoor)]
    #[case("windshield", DamageArea::Windshield)]
    fn damage_area_parses_loose_labels(#[case] raw: &str, #[case] expected: DamageArea) {
        assert_eq!(raw.parse::<DamageArea>().unwrap(), expected);
    }

    #[test]
    fn damage_area_rejects_unknown() {
        let err = "roof".parse::<DamageArea>().unwrap_err();
        assert!(err.to_string().contains("invalid damage area 'roof'"));
    }

    #[test]
    fn damage_type_serializes_with_label() {
        let json = serde_json::to_string(&DamageType::FenderBender).unwrap();
        assert_eq!(json, "\"Fender Bender\"");
        assert_eq!(
            "fender-bender".parse::<DamageType>().unwrap(),
            DamageType::FenderBender
        );
    }

    #[test]
    fn severity_is_ordered_and_snake_case() {
        assert!(Severity::Light < Severity::Major);
        assert_eq!(serde_json::to_string(&Severity::Moderate).unwrap(), "\"moderate\"");
        assert_eq!("SEVERE".parse::<Severity>().unwrap(), Severity::Severe);
    }

    #[rstest]
    #[case("positive", FeedbackPolarity::Positive)]
    #[case("thumbs-up", FeedbackPolarity::Positive)]
    #[case("down", FeedbackPolarity::Negative)]
    fn feedback_polarity_aliases(#[case] raw: &str, #[case] expected: FeedbackPolarity) {
        assert_eq!(raw.parse::<FeedbackPolarity>().unwrap(), expected);
    }

    #[test]
    fn upload_policy_defaults_to_store_first() {
        let policy = UploadPolicy::default();
        assert!(policy.stores_before_validation());
        assert!(!UploadPolicy::ValidateThenStore.stores_before_validation());
        assert_eq!(
            serde_json::from_str::<UploadPolicy>("\"validate_then_store\"").unwrap(),
            UploadPolicy::ValidateThenStore
        );
    }
}
