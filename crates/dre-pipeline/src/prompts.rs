//! Prompt text for the description and synthesis models.

use dre_core::{DamageRecord, MatchResult};

use crate::error::PipelineError;

/// Line the synthesis answer must end with.
pub const PROVIDER_LINE_PREFIX: &str = "Recommended Service Provider Name:";

const DESCRIPTION_EXAMPLE: &str = r#"<model>
{
  "make": "XXXXX",
  "model": "XXXXX",
  "state": "FL",
  "damage": "Front and Rear",
  "damage_severity": "moderate",
  "damage_description": "Front and rear bumper cover repairs"
}
</model>"#;

const DESCRIPTION_INSTRUCTION: &str = "Instruction: You are a car damage assessor that needs to \
create a short description for the damage in the image. Analyze the image and populate the json \
output adding an extra field called damage_description, this description has to be short and \
less than 10 words, provide ONLY the json as a response and no other data, the xml tags also must \
not be in the response.";

const SYNTHESIS_INSTRUCTION: &str = "Instruction: You are calculating the estimated repair cost \
based on previous data of similar car damages. Take the repair cost of the data set provided \
within <dataset> and calculate the average cost among all example data sets. You also need to \
provide a recommended service provider name from the dataset provided within <dataset> based on \
the state in which the car is damaged and it should be the closest one. Explain the math, but you \
must be brief, and the service provider name should be on the next line with the sentence \
\"Recommended Service Provider Name: <service-provider-name>\". The answer cannot have more than \
3 sentences.";

/// One-shot example, the user's record, and the output constraints.
pub fn description_prompt(record: &DamageRecord) -> Result<String, PipelineError> {
    let real_data = serde_json::to_string_pretty(record)?;
    Ok(format!(
        "{DESCRIPTION_EXAMPLE}\n<real_data>\n{real_data}\n</real_data>\n{DESCRIPTION_INSTRUCTION}"
    ))
}

/// Current record plus the metadata of every neighbor, in rank order.
#[must_use]
pub fn synthesis_prompt(current_json: &str, matches: &[MatchResult]) -> String {
    let dataset = matches
        .iter()
        .map(MatchResult::metadata_json)
        .collect::<Vec<_>>()
        .join("\n");
    format!("<current>{current_json}</current>\n<dataset>\n{dataset}\n</dataset>\n{SYNTHESIS_INSTRUCTION}")
}
