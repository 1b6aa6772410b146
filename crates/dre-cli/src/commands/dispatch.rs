use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Estimate(args) => commands::estimate::handle(&args, ctx, flags).await,
        Commands::Ledger(args) => commands::ledger::handle(&args, ctx, flags).await,
        Commands::Options => commands::options::handle(ctx, flags),
    }
}
