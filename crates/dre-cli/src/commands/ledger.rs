use crate::cli::{GlobalFlags, LedgerArgs};
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `dre ledger`.
pub async fn handle(args: &LedgerArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ledger = ctx.ledger()?;
    let progress = Progress::spinner("reading feedback ledger");
    let mut entries = match ledger.entries().await {
        Ok(entries) => {
            progress.finish_clear();
            entries
        }
        Err(error) => {
            progress.finish_err("failed to read ledger");
            return Err(error.into());
        }
    };

    if let Some(limit) = args.limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }
    output(&entries, flags.format)
}
