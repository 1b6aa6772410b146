//! Ranking of raw index hits and the local cross-check of the estimate.

use std::cmp::Ordering;

use dre_core::MatchResult;
use dre_services::{SearchHit, ServiceError};
use serde::Serialize;
use serde_json::Value;

use crate::error::{PipelineError, Step};

/// Sort hits by non-increasing score, keep the first `k`, and rank them 1..n.
///
/// # Errors
///
/// Returns a search-step [`PipelineError::Service`] when a kept hit has no
/// `s3_location` in its metadata.
pub fn rank_hits(mut hits: Vec<SearchHit>, k: usize) -> Result<Vec<MatchResult>, PipelineError> {
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    hits.truncate(k);

    hits.into_iter()
        .enumerate()
        .map(|(i, hit)| {
            let image_location = hit
                .metadata
                .get("s3_location")
                .and_then(Value::as_str)
                .filter(|loc| !loc.trim().is_empty())
                .map(String::from)
                .ok_or_else(|| {
                    PipelineError::at(Step::Search)(ServiceError::Parse(format!(
                        "hit {} has no s3_location",
                        i + 1
                    )))
                })?;
            Ok(MatchResult {
                rank: i + 1,
                score: hit.score,
                metadata: hit.metadata,
                image_location,
            })
        })
        .collect()
}

/// Figures computed locally from the neighbors, independent of the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborSummary {
    /// Mean of the neighbors that report a numeric repair cost.
    pub average_repair_cost: Option<f64>,
    pub costed_neighbors: usize,
    /// Best-scoring provider in the query's state, else best-scoring overall.
    pub closest_provider: Option<String>,
}

impl NeighborSummary {
    /// `matches` must already be in rank order.
    #[must_use]
    pub fn from_matches(matches: &[MatchResult], state: &str) -> Self {
        let costs: Vec<f64> = matches.iter().filter_map(MatchResult::repair_cost).collect();
        #[allow(clippy::cast_precision_loss)]
        let average_repair_cost =
            (!costs.is_empty()).then(|| costs.iter().sum::<f64>() / costs.len() as f64);

        let in_state = matches
            .iter()
            .filter(|m| m.state().is_some_and(|s| s.eq_ignore_ascii_case(state)))
            .find_map(MatchResult::service_provider);
        let closest_provider = in_state
            .or_else(|| matches.iter().find_map(MatchResult::service_provider))
            .map(String::from);

        Self {
            average_repair_cost,
            costed_neighbors: costs.len(),
            closest_provider,
        }
    }
}
