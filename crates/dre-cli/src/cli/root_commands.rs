use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Estimate the repair cost for a photo of a damaged vehicle.
    Estimate(EstimateArgs),
    /// List feedback entries recorded so far.
    Ledger(LedgerArgs),
    /// List the makes, models, damage areas, damage types and severities.
    Options,
}

/// Arguments for `dre estimate`.
#[derive(Clone, Debug, Args)]
pub struct EstimateArgs {
    /// Image file (PNG, JPEG, GIF or WebP).
    pub image: PathBuf,
    #[arg(long)]
    pub make: String,
    #[arg(long)]
    pub model: String,
    /// Damaged area; repeat for several.
    #[arg(long = "area", required = true)]
    pub areas: Vec<String>,
    /// Damage type; repeat for several.
    #[arg(long = "damage-type")]
    pub damage_types: Vec<String>,
    #[arg(long)]
    pub severity: String,
    /// Two-letter state (defaults to `general.state`).
    #[arg(long)]
    pub state: Option<String>,
    /// Historical matches to retrieve (defaults to `general.default_matches`).
    #[arg(short = 'k', long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub matches: Option<u8>,
    #[command(flatten)]
    pub feedback: FeedbackArgs,
}

/// Optional feedback recorded right after the estimate.
#[derive(Clone, Debug, Args)]
pub struct FeedbackArgs {
    /// positive | negative (also up/down)
    #[arg(long)]
    pub feedback: Option<String>,
    #[arg(long, default_value = "")]
    pub service_center: String,
    #[arg(long, default_value_t = 0)]
    pub repair_cost: u32,
    /// Comma-separated parts list.
    #[arg(long, default_value = "Right fender, Paint")]
    pub parts: String,
    #[arg(long, default_value_t = 0)]
    pub labor_hours: u32,
    #[arg(long, default_value_t = 0)]
    pub parts_cost: u32,
    #[arg(long, default_value_t = 0)]
    pub labor_cost: u32,
}

/// Arguments for `dre ledger`.
#[derive(Clone, Debug, Args)]
pub struct LedgerArgs {
    /// Show only the last N entries.
    #[arg(short, long)]
    pub limit: Option<usize>,
}
