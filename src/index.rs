//! Whole-log index: one entry per record on a known channel

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::channels::Channel;
use crate::error::{LoaderError, Result};
use crate::event_log::{FrameError, FrameRead, decode_frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub offset: u64,
    pub channel_id: u16,
    pub schema_id: u16,
    pub timestamp_ns: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start_time_ns: u64,
    pub end_time_ns: u64,
}

impl TimeRange {
    fn include(range: Option<TimeRange>, ts: u64) -> TimeRange {
        match range {
            Some(r) => TimeRange {
                start_time_ns: r.start_time_ns.min(ts),
                end_time_ns: r.end_time_ns.max(ts),
            },
            None => TimeRange {
                start_time_ns: ts,
                end_time_ns: ts,
            },
        }
    }

    pub fn duration_ns(&self) -> u64 {
        self.end_time_ns - self.start_time_ns
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogIndex {
    /// Sorted by `timestamp_ns`, ties in log order.
    pub entries: Vec<IndexEntry>,
    /// `None` when nothing was indexed.
    pub time_range: Option<TimeRange>,
}

impl LogIndex {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan `buffer` front to back and index every record whose channel name is
/// in `channels`, bumping the matching `message_count`.
///
/// Records on other channels are skipped. Any framing error aborts the whole
/// scan; no partial index is returned.
pub fn build_index(buffer: &[u8], channels: &mut [Channel]) -> Result<LogIndex> {
    let mut entries = Vec::new();
    let mut time_range = None;
    let mut skipped: u64 = 0;
    let mut pos = 0usize;

    loop {
        let offset = pos as u64;
        let (event, consumed) = match decode_frame(&buffer[pos..]) {
            Ok(FrameRead::EndOfInput) => break,
            Ok(FrameRead::Event(event, consumed)) => (event, consumed),
            Err(FrameError::UnexpectedEof) => return Err(LoaderError::TruncatedLog { offset }),
            Err(FrameError::MalformedFrame) => return Err(LoaderError::CorruptLog { offset }),
        };

        match channels.iter_mut().find(|c| c.topic_name == event.channel) {
            Some(channel) => {
                channel.message_count += 1;
                let timestamp_ns = event.timestamp_us.saturating_mul(1000);
                time_range = Some(TimeRange::include(time_range, timestamp_ns));
                entries.push(IndexEntry {
                    offset,
                    channel_id: channel.id,
                    schema_id: channel.schema_id,
                    timestamp_ns,
                });
            }
            None => {
                trace!(channel = %event.channel, offset, "skipping unindexed channel");
                skipped += 1;
            }
        }

        pos += consumed;
    }

    if entries.windows(2).any(|w| w[1].timestamp_ns < w[0].timestamp_ns) {
        warn!("log records are not in timestamp order; sorting index");
        entries.sort_by_key(|e| e.timestamp_ns);
    }

    debug!(indexed = entries.len(), skipped, bytes = buffer.len(), "built log index");
    Ok(LogIndex {
        entries,
        time_range,
    })
}
