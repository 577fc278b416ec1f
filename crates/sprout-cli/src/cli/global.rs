//! Flags shared by every subcommand, flattened into [`super::Cli`].

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum, builder::FalseyValueParser};

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more: `-v` shows provisioning steps, `-vv` the commands run and
    /// files copied, `-vvv` everything.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print errors and the install retry command only.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain output without ANSI colours. Any non-empty `NO_COLOR` other
    /// than a falsey word (`0`, `false`, `no`, `off`) turns it on.
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Read settings from FILE instead of the per-user config file.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rendering of command results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise.
    #[default]
    Auto,
    /// Coloured, with a spinner during the install.
    Human,
    /// No colours, no spinner.
    Plain,
    /// A single JSON document on stdout.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        global: GlobalArgs,
    }

    #[test]
    fn no_color_flag_sets_field() {
        let parsed = Harness::try_parse_from(["sprout", "--no-color"]).unwrap();
        assert!(parsed.global.no_color);
        assert_eq!(parsed.global.output_format, OutputFormat::Auto);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Harness::try_parse_from(["sprout", "-q", "-v"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let parsed = Harness::try_parse_from(["sprout", "-vvv"]).unwrap();
        assert_eq!(parsed.global.verbose, 3);
    }
}
