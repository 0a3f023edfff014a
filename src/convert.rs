use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::channels::{Channel, Schema};
use crate::iterator::{Message, MessageIteratorArgs};
use crate::loader::{DataLoader, LoaderOptions};

/// Options for converting an LCM log to MCAP
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Path to the input LCM log
    pub log_path: PathBuf,
    /// Path to the output .mcap file
    pub output_path: PathBuf,
    /// Keep only these channels (empty means every known channel)
    pub channels: Vec<String>,
    /// Keep only channels whose name matches this pattern
    pub channel_regex: Option<String>,
    /// Start time offset in seconds from log start
    pub start_time: Option<f64>,
    /// End time offset in seconds from log start
    pub end_time: Option<f64>,
    /// Dry run: iterate and count but don't write output
    pub dry_run: bool,
    /// Show progress spinner
    pub show_progress: bool,
    /// Velodyne calibration JSON
    pub calibration: Option<PathBuf>,
    /// Also index the reserved POSE and GPS_TO_LOCAL channels
    pub include_reserved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub written: u64,
    pub skipped: u64,
    pub per_channel: BTreeMap<String, u64>,
}

/// Convert an LCM log to an MCAP file of Foxglove protobuf messages
///
/// Messages that fail to transcode are logged and skipped. A corrupted
/// buffer aborts the conversion.
///
/// # Example
///
/// ```rust,no_run
/// use lcm2foxglove::{convert_log, ConvertOptions};
///
/// let options = ConvertOptions {
///     log_path: "run.lcm".into(),
///     output_path: "run.mcap".into(),
///     channels: vec!["VELODYNE".to_string()],
///     ..Default::default()
/// };
///
/// let stats = convert_log(&options)?;
/// println!("wrote {} messages", stats.written);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn convert_log(options: &ConvertOptions) -> Result<ConvertStats> {
    for (name, offset) in [("start", options.start_time), ("end", options.end_time)] {
        if let Some(v) = offset && (v.is_nan() || v < 0.0) {
            anyhow::bail!("{name} must be a non-negative number of seconds, got {v}");
        }
    }
    if let (Some(s), Some(e)) = (options.start_time, options.end_time) && s > e {
        anyhow::bail!("start ({s}) must not be after end ({e})");
    }
    let channel_regex = options
        .channel_regex
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid channel regex")?;

    let loader_options = LoaderOptions {
        include_reserved_channels: options.include_reserved,
        calibration: options.calibration.clone(),
    };
    let mut loader = DataLoader::new(vec![options.log_path.clone()], loader_options);
    let init = loader
        .initialize()
        .with_context(|| format!("failed to open LCM log: {}", options.log_path.display()))?;

    let selected = select_channels(&init.channels, &options.channels, channel_regex.as_ref());
    let topics: HashMap<u16, &str> = selected
        .iter()
        .map(|c| (c.id, c.topic_name.as_str()))
        .collect();

    let args = match init.time_range {
        Some(range) => {
            let start = range
                .start_time_ns
                .saturating_add(options.start_time.map_or(0, secs_to_ns));
            let end = options.end_time.map_or(range.end_time_ns, |e| {
                range.start_time_ns.saturating_add(secs_to_ns(e))
            });
            MessageIteratorArgs::new(start, end, selected.iter().map(|c| c.id))
        }
        None => MessageIteratorArgs::over(None, []),
    };

    let mut sink = if options.dry_run {
        None
    } else {
        Some(McapSink::create(&options.output_path, &init.schemas, &selected)?)
    };

    let pb = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {pos} msgs") {
            pb.set_style(style);
        }
        Some(pb)
    } else {
        None
    };

    let log_every = std::env::var("LCM2FOXGLOVE_LOG_EVERY")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|v| *v > 0);
    let started = Instant::now();
    let mut stats = ConvertStats::default();

    for item in loader.create_iterator(&args)? {
        let msg = match item {
            Ok(msg) => msg,
            Err(e) if e.is_fatal() => {
                return Err(e).with_context(|| {
                    format!("failed to convert {}", options.log_path.display())
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping message");
                stats.skipped += 1;
                continue;
            }
        };

        if let Some(sink) = sink.as_mut() {
            sink.write(&msg)?;
        }
        stats.written += 1;
        if let Some(topic) = topics.get(&msg.channel_id) {
            *stats.per_channel.entry(topic.to_string()).or_default() += 1;
        }
        if let Some(pb) = &pb {
            pb.inc(1);
        }
        if let Some(n) = log_every && stats.written % n == 0 {
            info!(
                written = stats.written,
                skipped = stats.skipped,
                elapsed = ?started.elapsed(),
                "conversion progress"
            );
        }
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    println!(
        "Plan: {} messages kept, {} skipped, {} channels → output: {}",
        stats.written,
        stats.skipped,
        selected.len(),
        options.output_path.display()
    );

    if let Some(sink) = sink {
        sink.finish()?;
        info!(path = %options.output_path.display(), written = stats.written, "saved MCAP");
    }
    Ok(stats)
}

fn select_channels<'a>(
    channels: &'a [Channel],
    names: &[String],
    pattern: Option<&Regex>,
) -> Vec<&'a Channel> {
    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    for name in &wanted {
        if !channels.iter().any(|c| c.topic_name == *name) {
            warn!(channel = *name, "requested channel is not indexed");
        }
    }
    channels
        .iter()
        .filter(|c| wanted.is_empty() || wanted.contains(c.topic_name.as_str()))
        .filter(|c| pattern.is_none_or(|re| re.is_match(&c.topic_name)))
        .collect()
}

/// Rounded so decimal microsecond offsets land on indexed timestamps.
fn secs_to_ns(secs: f64) -> u64 {
    (secs * 1_000_000_000.0).round() as u64
}

struct McapSink {
    writer: mcap::Writer<BufWriter<File>>,
    /// log channel id → (mcap channel id, next sequence)
    channels: HashMap<u16, (u16, u32)>,
}

impl McapSink {
    fn create(path: &Path, schemas: &[Schema], selected: &[&Channel]) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = mcap::Writer::new(BufWriter::new(file))?;

        let mut schema_ids = HashMap::new();
        let mut channels = HashMap::new();
        for channel in selected {
            let schema_id = match schema_ids.get(&channel.schema_id) {
                Some(id) => *id,
                None => {
                    let schema = schemas
                        .iter()
                        .find(|s| s.id == channel.schema_id)
                        .with_context(|| {
                            format!(
                                "no schema {} for channel {}",
                                channel.schema_id, channel.topic_name
                            )
                        })?;
                    let id = writer.add_schema(&schema.name, &schema.encoding, &schema.data)?;
                    schema_ids.insert(channel.schema_id, id);
                    id
                }
            };
            let mcap_id = writer.add_channel(
                schema_id,
                &channel.topic_name,
                &channel.message_encoding,
                &BTreeMap::new(),
            )?;
            channels.insert(channel.id, (mcap_id, 0));
        }

        Ok(Self { writer, channels })
    }

    fn write(&mut self, msg: &Message) -> Result<()> {
        let (channel_id, sequence) = self
            .channels
            .get_mut(&msg.channel_id)
            .with_context(|| format!("message on unregistered channel {}", msg.channel_id))?;
        let header = mcap::records::MessageHeader {
            channel_id: *channel_id,
            sequence: *sequence,
            log_time: msg.log_time_ns,
            publish_time: msg.publish_time_ns,
        };
        self.writer.write_to_known_channel(&header, &msg.data)?;
        *sequence += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.writer.finish()?;
        Ok(())
    }
}
