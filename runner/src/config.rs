// ═══════════════════════════════════════════════════════════════════════
// Runner configuration — command line with environment fallbacks
// ═══════════════════════════════════════════════════════════════════════

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mesbg", about = "Warband army list builder")]
pub struct Cli {
    #[command(flatten)]
    pub config: RunnerConfig,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the catalog lives. Shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding the manifest and army files
    #[arg(long, global = true, env = "MESBG_DATA_DIR", default_value = "data")]
    pub data: PathBuf,

    /// Manifest file name inside the data directory
    #[arg(long, global = true, env = "MESBG_MANIFEST", default_value = "armies.json")]
    pub manifest: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the armies in the manifest
    Armies,
    /// Build a list interactively: one JSON action per line
    Play {
        /// Army to load, by file or display name
        #[arg(short, long)]
        army: String,
        /// Read actions from this file instead of stdin
        #[arg(short, long)]
        script: Option<PathBuf>,
    },
    /// Load and check every army in the manifest
    Audit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["mesbg", "play", "--army", "gondor.json"]).unwrap();
        match cli.command {
            Commands::Play { army, script } => {
                assert_eq!(army, "gondor.json");
                assert!(script.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cli.config.manifest, "armies.json");
    }

    #[test]
    fn data_dir_can_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["mesbg", "audit", "--data", "/srv/armies"]).unwrap();
        assert!(matches!(cli.command, Commands::Audit));
        assert_eq!(cli.config.data, PathBuf::from("/srv/armies"));
    }
}
