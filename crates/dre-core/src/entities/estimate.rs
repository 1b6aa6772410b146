use serde::{Deserialize, Serialize};

/// Synthesized cost answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Model answer exactly as streamed.
    pub text: String,
    /// The same answer with markup-sensitive characters escaped for display.
    pub display_text: String,
    /// Provider named on the `Recommended Service Provider Name:` line.
    pub recommended_provider: String,
}
