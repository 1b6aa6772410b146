use std::io::Write;
use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use dre_config::DreConfig;
use dre_core::{
    DamageArea, DamageRecord, DamageType, FeedbackForm, FeedbackPolarity, MatchCount, Session,
    Severity,
};
use dre_pipeline::{EstimateOutcome, EstimateRequest, FeedbackOutcome};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::cli::{EstimateArgs, FeedbackArgs, GlobalFlags};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Debug, Serialize)]
struct EstimateReport<'a> {
    session: &'a str,
    outcome: &'a EstimateOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    feedback: Option<FeedbackOutcome>,
}

/// Handle `dre estimate`.
pub async fn handle(args: &EstimateArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let record = build_record(args, &ctx.config)?;
    let matches = match args.matches {
        Some(k) => MatchCount::try_from(k)?,
        None => ctx.config.general.match_count()?,
    };
    let polarity = args
        .feedback
        .feedback
        .as_deref()
        .map(str::parse::<FeedbackPolarity>)
        .transpose()?;

    let (image, filename) = read_upload(&args.image).await?;

    let pipeline = ctx.pipeline().await?;
    let mut session = Session::start()?;
    session.form = feedback_form(&args.feedback);

    let progress = Progress::spinner("estimating repair cost");
    let (tx, rx) = mpsc::channel(64);
    let printer = tokio::spawn(print_fragments(rx, progress.clone(), flags.quiet));

    let request = EstimateRequest {
        image,
        filename,
        record,
        matches,
    };
    let result = pipeline.estimate(&mut session, request, tx).await;
    printer.await.context("synthesis printer task failed")?;

    let outcome = match result {
        Ok(outcome) => {
            progress.finish_clear();
            outcome
        }
        Err(error) => {
            progress.finish_err("estimate failed");
            return Err(error).context("estimate failed");
        }
    };

    let feedback = match (&outcome, polarity) {
        (EstimateOutcome::Rejected { reason, .. }, _) => {
            if !flags.quiet {
                eprintln!("{reason}");
            }
            None
        }
        (EstimateOutcome::Estimated(_), Some(polarity)) => {
            let recorder = ctx.recorder()?;
            Some(recorder.submit(&mut session, polarity).await?)
        }
        (EstimateOutcome::Estimated(_), None) => None,
    };

    output(
        &EstimateReport {
            session: &session.id,
            outcome: &outcome,
            feedback,
        },
        flags.format,
    )
}

async fn print_fragments(mut rx: mpsc::Receiver<String>, progress: Progress, quiet: bool) {
    let mut printed = false;
    while let Some(fragment) = rx.recv().await {
        if quiet {
            continue;
        }
        if !printed {
            progress.set_message("streaming cost calculation");
        }
        printed = true;
        progress.suspend(|| {
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "{fragment}");
            let _ = stderr.flush();
        });
    }
    if printed {
        eprintln!();
    }
}

/// Image bytes plus the file name used for the stored object.
async fn read_upload(path: &Path) -> anyhow::Result<(Bytes, String)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))?;
    if bytes.is_empty() {
        anyhow::bail!("image {} is empty", path.display());
    }
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok((Bytes::from(bytes), filename))
}

fn build_record(args: &EstimateArgs, config: &DreConfig) -> anyhow::Result<DamageRecord> {
    config.catalog.validate(&args.make, &args.model)?;

    let areas = args
        .areas
        .iter()
        .map(|raw| raw.parse::<DamageArea>())
        .collect::<Result<Vec<_>, _>>()?;
    let types = args
        .damage_types
        .iter()
        .map(|raw| raw.parse::<DamageType>())
        .collect::<Result<Vec<_>, _>>()?;
    let severity = args.severity.parse::<Severity>()?;
    let state = args.state.as_deref().unwrap_or(&config.general.state);

    Ok(DamageRecord::new(
        &args.make,
        &args.model,
        state,
        areas,
        types,
        severity,
    )?)
}

fn feedback_form(args: &FeedbackArgs) -> FeedbackForm {
    FeedbackForm {
        service_center: args.service_center.trim().to_string(),
        repair_cost: args.repair_cost,
        parts_for_repair: FeedbackForm::parse_parts(&args.parts),
        labor_hours: args.labor_hours,
        parts_cost: args.parts_cost,
        labor_cost: args.labor_cost,
    }
}
