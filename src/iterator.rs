//! Time- and channel-filtered iteration over an indexed log

use std::iter::FusedIterator;

use smallvec::SmallVec;
use tracing::error;

use crate::channels::channel_def;
use crate::error::{LoaderError, Result};
use crate::event_log::{FrameRead, decode_frame};
use crate::index::{IndexEntry, TimeRange};
use crate::mappings::Transcoder;

/// Query for one iterator. Bounds are inclusive, in nanoseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageIteratorArgs {
    pub start_time_ns: u64,
    pub end_time_ns: u64,
    pub channel_ids: SmallVec<[u16; 10]>,
}

impl MessageIteratorArgs {
    pub fn new(
        start_time_ns: u64,
        end_time_ns: u64,
        channel_ids: impl IntoIterator<Item = u16>,
    ) -> Self {
        Self {
            start_time_ns,
            end_time_ns,
            channel_ids: channel_ids.into_iter().collect(),
        }
    }

    /// Cover `range`; an unset range yields an empty window.
    pub fn over(range: Option<TimeRange>, channel_ids: impl IntoIterator<Item = u16>) -> Self {
        match range {
            Some(r) => Self::new(r.start_time_ns, r.end_time_ns, channel_ids),
            None => Self::new(1, 0, channel_ids),
        }
    }
}

/// One transcoded message, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub channel_id: u16,
    pub log_time_ns: u64,
    pub publish_time_ns: u64,
    pub data: Vec<u8>,
}

pub struct MessageIterator<'a> {
    buffer: &'a [u8],
    entries: &'a [IndexEntry],
    transcoder: &'a Transcoder,
    args: MessageIteratorArgs,
    pos: usize,
}

impl<'a> MessageIterator<'a> {
    /// `entries` must be sorted by timestamp.
    pub fn new(
        buffer: &'a [u8],
        entries: &'a [IndexEntry],
        transcoder: &'a Transcoder,
        args: MessageIteratorArgs,
    ) -> Self {
        let mut pos = entries.partition_point(|e| e.timestamp_ns < args.start_time_ns);
        if entries.get(pos).is_some_and(|e| e.timestamp_ns > args.end_time_ns) {
            pos = entries.len();
        }
        Self {
            buffer,
            entries,
            transcoder,
            args,
            pos,
        }
    }

    pub fn args(&self) -> &MessageIteratorArgs {
        &self.args
    }

    fn read_entry(&self, entry: &IndexEntry) -> Result<Message> {
        let window = self.buffer.get(entry.offset as usize..).unwrap_or_default();
        let event = match decode_frame(window) {
            Ok(FrameRead::Event(event, _)) => event,
            _ => {
                error!(offset = entry.offset, "failed to parse event at indexed offset");
                return Err(LoaderError::DecodeFailure {
                    offset: entry.offset,
                });
            }
        };

        let Some(def) = channel_def(entry.channel_id) else {
            error!(channel_id = entry.channel_id, "unrecognized indexed channel");
            return Err(LoaderError::InternalInconsistency {
                channel_id: entry.channel_id,
            });
        };

        let data = self
            .transcoder
            .transcode(def.schema.transcoder(), def.topic, &event.data, def.frame_id)?;

        Ok(Message {
            channel_id: entry.channel_id,
            log_time_ns: entry.timestamp_ns,
            publish_time_ns: entry.timestamp_ns,
            data,
        })
    }
}

impl Iterator for MessageIterator<'_> {
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.entries.get(self.pos) {
            if entry.timestamp_ns > self.args.end_time_ns {
                self.pos = self.entries.len();
                return None;
            }
            self.pos += 1;
            if self.args.channel_ids.contains(&entry.channel_id) {
                return Some(self.read_entry(entry));
            }
        }
        None
    }
}

impl FusedIterator for MessageIterator<'_> {}
