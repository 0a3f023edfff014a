//! LCM event log framing
//!
//! Every record in the log is laid out big-endian as:
//!
//! ```text
//! [sync u32][event_number u64][timestamp_us u64][channel_len u32][data_len u32][channel][data]
//! ```

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

pub const SYNC_WORD: u32 = 0xEDA1_DA01;

/// Size of the fixed part of a frame, before the channel name.
pub const HEADER_LEN: usize = 4 + 8 + 8 + 4 + 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcmEvent {
    pub event_number: u64,
    pub timestamp_us: u64,
    pub channel: String,
    pub data: Vec<u8>,
}

/// Outcome of a successful read at the start of a byte window.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameRead {
    /// One decoded event and the number of bytes it occupied.
    Event(LcmEvent, usize),
    /// The window was empty.
    EndOfInput,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    #[error("unexpected EOF")]
    UnexpectedEof,
    #[error("malformed event")]
    MalformedFrame,
}

/// Decode the frame at the start of `buf`.
///
/// The window is never resynchronised: a bad sync word or a length prefix
/// running past the end of `buf` is reported as [`FrameError::MalformedFrame`].
pub fn decode_frame(buf: &[u8]) -> Result<FrameRead, FrameError> {
    if buf.is_empty() {
        return Ok(FrameRead::EndOfInput);
    }
    if buf.len() < HEADER_LEN {
        return Err(FrameError::UnexpectedEof);
    }
    if BigEndian::read_u32(&buf[0..4]) != SYNC_WORD {
        return Err(FrameError::MalformedFrame);
    }

    let event_number = BigEndian::read_u64(&buf[4..12]);
    let timestamp_us = BigEndian::read_u64(&buf[12..20]);
    let channel_len = BigEndian::read_u32(&buf[20..24]) as usize;
    let data_len = BigEndian::read_u32(&buf[24..28]) as usize;

    let channel_end = HEADER_LEN
        .checked_add(channel_len)
        .ok_or(FrameError::MalformedFrame)?;
    let data_end = channel_end
        .checked_add(data_len)
        .ok_or(FrameError::MalformedFrame)?;
    if data_end > buf.len() {
        return Err(FrameError::MalformedFrame);
    }

    let channel = String::from_utf8_lossy(&buf[HEADER_LEN..channel_end]).into_owned();
    let data = buf[channel_end..data_end].to_vec();

    Ok(FrameRead::Event(
        LcmEvent {
            event_number,
            timestamp_us,
            channel,
            data,
        },
        data_end,
    ))
}

/// Serialize an event with the same framing [`decode_frame`] reads.
pub fn encode_frame(event: &LcmEvent) -> Vec<u8> {
    let mut out = vec![0u8; HEADER_LEN];
    BigEndian::write_u32(&mut out[0..4], SYNC_WORD);
    BigEndian::write_u64(&mut out[4..12], event.event_number);
    BigEndian::write_u64(&mut out[12..20], event.timestamp_us);
    BigEndian::write_u32(&mut out[20..24], event.channel.len() as u32);
    BigEndian::write_u32(&mut out[24..28], event.data.len() as u32);
    out.extend_from_slice(event.channel.as_bytes());
    out.extend_from_slice(&event.data);
    out
}
