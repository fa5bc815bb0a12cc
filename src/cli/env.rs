use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::analyse::AnalyseArgs;
use super::find::FindArgs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Enable debug mode
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Relay the game open in a browser tab to the analysis board
    Analyse(AnalyseArgs),

    /// Look a game up in a player's archive and print its move record
    Find(FindArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_find_with_globals() {
        let cli = CliArgs::try_parse_from([
            "game-relay",
            "--log-format",
            "json",
            "find",
            "--player",
            "bob",
            "--game",
            "https://www.chess.com/game/live/55",
            "--recent",
            "1",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Find(args) => {
                assert_eq!(args.player, "bob");
                assert_eq!(args.recent, Some(1));
                assert_eq!(args.time_limit_ms, None);
            }
            Commands::Analyse(_) => panic!("expected find"),
        }
    }

    #[test]
    fn analyse_needs_no_arguments() {
        let cli = CliArgs::try_parse_from(["game-relay", "analyse"]).unwrap();
        assert!(matches!(cli.command, Commands::Analyse(ref args) if args.tab.is_none()));
    }
}
