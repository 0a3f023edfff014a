use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use lcm2foxglove::cli::{Cli, Commands};
use lcm2foxglove::{ConvertOptions, convert_log, inspect_log, schema};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect {
            log,
            json,
            include_reserved,
        } => inspect_log(&log, json, include_reserved),
        Commands::Convert {
            log,
            out,
            channel,
            channel_regex,
            start,
            end,
            dry_run,
            progress,
            calibration,
            include_reserved,
        } => {
            let options = ConvertOptions {
                log_path: log,
                output_path: out,
                channels: channel,
                channel_regex,
                start_time: start,
                end_time: end,
                dry_run,
                show_progress: progress,
                calibration,
                include_reserved,
            };
            convert_log(&options).map(|_| ())
        }
        Commands::Schema {} => schema::print_schema(),
    }
}
