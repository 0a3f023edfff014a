use anyhow::{Context, Result};
use prettytable::{Table, row};
use std::path::Path;

use crate::channels::SchemaKind;
use crate::loader::{DataLoader, Initialization, LoaderOptions};

pub fn inspect_log(path: &Path, json: bool, include_reserved: bool) -> Result<()> {
    let options = LoaderOptions {
        include_reserved_channels: include_reserved,
        calibration: None,
    };
    let mut loader = DataLoader::new(vec![path.to_path_buf()], options);
    let init = loader
        .initialize()
        .with_context(|| format!("failed to open LCM log: {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&init)?);
        return Ok(());
    }

    print_summary(path, &init);
    Ok(())
}

fn print_summary(path: &Path, init: &Initialization) {
    let total: u64 = init.channels.iter().map(|c| c.message_count).sum();

    println!("Log: {}", path.display());
    match init.time_range {
        Some(range) => println!(
            "Start (s): {:.6}, End (s): {:.6}, Duration (s): {:.6}, Total messages: {}\n",
            ns_to_secs(range.start_time_ns),
            ns_to_secs(range.end_time_ns),
            ns_to_secs(range.duration_ns()),
            total
        ),
        None => println!("No messages on known channels\n"),
    }

    let mut table = Table::new();
    table.add_row(row!["ID", "Channel", "Schema", "Count"]);
    for channel in &init.channels {
        let schema = SchemaKind::from_id(channel.schema_id).map_or("?", |k| k.name());
        table.add_row(row![channel.id, channel.topic_name, schema, channel.message_count]);
    }
    table.printstd();
}

fn ns_to_secs(ns: u64) -> f64 {
    ns as f64 / 1_000_000_000.0
}
