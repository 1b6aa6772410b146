use std::collections::BTreeMap;

use dre_core::{DamageArea, DamageType, Severity};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SelectionOptions<'a> {
    makes: &'a BTreeMap<String, Vec<String>>,
    damage_areas: Vec<&'static str>,
    damage_types: Vec<&'static str>,
    severities: Vec<&'static str>,
    default_state: &'a str,
    default_matches: u8,
}

/// Handle `dre options`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = &ctx.config;
    let options = SelectionOptions {
        makes: &config.catalog.makes,
        damage_areas: DamageArea::ALL.iter().map(|a| a.as_str()).collect(),
        damage_types: DamageType::ALL.iter().map(|t| t.as_str()).collect(),
        severities: Severity::ALL.iter().map(|s| s.as_str()).collect(),
        default_state: &config.general.state,
        default_matches: config.general.default_matches,
    };
    output(&options, flags.format)
}
