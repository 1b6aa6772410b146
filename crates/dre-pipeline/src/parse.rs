//! Parse-and-validate steps applied to generative model output.

use dre_core::{DamageRecord, DescribedRecord, MatchResult};
use serde_json::Value;
use tracing::debug;

use crate::error::PipelineError;
use crate::prompts::PROVIDER_LINE_PREFIX;

/// Descriptions must stay under this many words.
pub const MAX_DESCRIPTION_WORDS: usize = 10;

/// Extract the described record from the description model's answer.
///
/// The answer may wrap the JSON in code fences, XML tags, or prose; the
/// outermost `{...}` span is parsed. The user's `record` stays authoritative:
/// only `damage_description` is taken from the model.
pub fn described_record(raw: &str, record: &DamageRecord) -> Result<DescribedRecord, PipelineError> {
    let json = outermost_object(raw)
        .ok_or_else(|| PipelineError::ModelOutput("description is not a JSON object".to_string()))?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| PipelineError::ModelOutput(format!("description is not valid JSON: {e}")))?;

    let description = value
        .get("damage_description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            PipelineError::ModelOutput("description has no damage_description".to_string())
        })?;

    let words = description.split_whitespace().count();
    if words >= MAX_DESCRIPTION_WORDS {
        return Err(PipelineError::ModelOutput(format!(
            "damage_description has {words} words; limit is fewer than {MAX_DESCRIPTION_WORDS}"
        )));
    }

    if value.get("make").and_then(Value::as_str) != Some(record.make.as_str()) {
        debug!("model echoed a different make; keeping the selected one");
    }

    Ok(DescribedRecord::new(record.clone(), description.to_string()))
}

fn outermost_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

/// Provider named on the final `Recommended Service Provider Name:` line.
#[must_use]
pub fn recommended_provider(text: &str) -> Option<String> {
    let prefix = PROVIDER_LINE_PREFIX.to_ascii_lowercase();
    text.lines().rev().find_map(|line| {
        let lower = line.to_ascii_lowercase();
        let at = lower.find(&prefix)?;
        let name = line[at + prefix.len()..]
            .trim()
            .trim_matches(|c: char| matches!(c, '*' | '"' | '\'' | '<' | '>' | '`'))
            .trim_end_matches('.')
            .trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}

/// The neighbor's spelling of `named`, if a matched record lists that
/// provider. Comparison ignores case and runs of whitespace.
#[must_use]
pub fn matched_provider(named: &str, matches: &[MatchResult]) -> Option<String> {
    let wanted = fold(named);
    matches
        .iter()
        .filter_map(MatchResult::service_provider)
        .find(|provider| fold(provider) == wanted)
        .map(|provider| provider.trim().to_string())
}

fn fold(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Escape `$` so display surfaces do not read it as math markup.
#[must_use]
pub fn escape_markup(text: &str) -> String {
    text.replace('$', "\\$")
}
