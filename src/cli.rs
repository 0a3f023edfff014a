use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lcm2foxglove",
    about = "Convert LCM sensor logs into Foxglove MCAP files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List channels, schemas, message counts and time span of a log
    Inspect {
        /// Path to the LCM log
        log: PathBuf,
        /// Print the summary as JSON
        #[arg(long = "json")]
        json: bool,
        /// Also index the reserved POSE and GPS_TO_LOCAL channels
        #[arg(long = "include-reserved")]
        include_reserved: bool,
    },

    /// Convert a log into an .mcap file of Foxglove protobuf messages
    Convert {
        /// Path to the LCM log
        log: PathBuf,
        /// Output .mcap path
        out: PathBuf,
        /// Keep only these channels (can be repeated)
        #[arg(long = "channel", action = ArgAction::Append)]
        channel: Vec<String>,
        /// Keep only channels matching this regex
        #[arg(long = "channel-regex")]
        channel_regex: Option<String>,
        /// Start offset in seconds from the beginning of the log
        #[arg(long = "start")]
        start: Option<f64>,
        /// End offset in seconds from the beginning of the log
        #[arg(long = "end")]
        end: Option<f64>,
        /// Dry-run: count messages but do not write any MCAP
        #[arg(long = "dry-run")]
        dry_run: bool,
        /// Show progress spinner (enabled by default)
        #[arg(long = "progress", action = ArgAction::SetTrue, default_value_t = true)]
        progress: bool,
        /// Velodyne calibration JSON (defaults to the built-in HDL-64E table)
        #[arg(long = "calibration")]
        calibration: Option<PathBuf>,
        /// Also index the reserved POSE and GPS_TO_LOCAL channels
        #[arg(long = "include-reserved")]
        include_reserved: bool,
    },

    /// Show supported LCM → Foxglove mappings
    Schema {},
}
