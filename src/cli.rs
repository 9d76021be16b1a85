use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vibemap",
    about = "Heuristic music library analyzer: groups tracks by energy, brightness and tempo"
)]
pub struct Cli {
    /// Audio files or directories to analyze (directories are walked recursively)
    pub inputs: Vec<PathBuf>,

    /// Write a JSON report (bare --json uses music_analysis_results.json)
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "music_analysis_results.json"
    )]
    pub json: Option<PathBuf>,

    /// Write a CSV spreadsheet (bare --csv uses music_analysis_results.csv)
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "music_analysis_results.csv"
    )]
    pub csv: Option<PathBuf>,

    /// Print a style prompt for each track in the summary
    #[arg(long)]
    pub prompts: bool,

    /// Load a previously exported JSON report instead of analyzing files
    #[arg(long, value_name = "PATH")]
    pub import: Option<PathBuf>,

    /// With --import, run the grouping pass again over the loaded records
    #[arg(long)]
    pub recluster: bool,

    /// Config file (default: ./vibemap.toml, then the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
