use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, EstimateArgs, FeedbackArgs, LedgerArgs};

/// Top-level CLI parser for the `dre` binary.
#[derive(Debug, Parser)]
#[command(name = "dre", version, about = "Damage repair estimator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (no streamed text, errors only in the log)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["dre", "--format", "table", "--verbose", "options"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Options));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["dre", "ledger", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Ledger(_)));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["dre", "--format", "xml", "options"]).is_err());
    }

    #[test]
    fn estimate_collects_repeated_selections() {
        let cli = Cli::try_parse_from([
            "dre",
            "estimate",
            "car.jpg",
            "--make",
            "Make_1",
            "--model",
            "Model_1",
            "--area",
            "front-left",
            "--area",
            "hood",
            "--damage-type",
            "dent",
            "--severity",
            "moderate",
            "--matches",
            "2",
            "--feedback",
            "up",
            "--repair-cost",
            "650",
        ])
        .expect("cli should parse");

        let Commands::Estimate(args) = cli.command else {
            panic!("expected estimate");
        };
        assert_eq!(args.areas, vec!["front-left", "hood"]);
        assert_eq!(args.damage_types, vec!["dent"]);
        assert_eq!(args.matches, Some(2));
        assert_eq!(args.feedback.feedback.as_deref(), Some("up"));
        assert_eq!(args.feedback.repair_cost, 650);
        assert_eq!(args.feedback.parts, "Right fender, Paint");
    }

    #[test]
    fn estimate_rejects_out_of_range_matches() {
        let parsed = Cli::try_parse_from([
            "dre", "estimate", "car.jpg", "--make", "M", "--model", "N", "--area", "hood",
            "--severity", "light", "--matches", "4",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn estimate_requires_an_area() {
        let parsed = Cli::try_parse_from([
            "dre", "estimate", "car.jpg", "--make", "M", "--model", "N", "--severity", "light",
        ]);
        assert!(parsed.is_err());
    }
}
