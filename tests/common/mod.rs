//! Fixture builders for synthetic LCM logs.
#![allow(dead_code)]

use std::io::Write;

use lcm2foxglove::event_log::{LcmEvent, encode_frame};
use tempfile::NamedTempFile;

const FINGERPRINT: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde, 0xf0];

pub fn laser_payload(
    utime: i64,
    ranges: &[f32],
    intensities: &[f32],
    rad0: f32,
    radstep: f32,
) -> Vec<u8> {
    let mut out = FINGERPRINT.to_vec();
    out.extend_from_slice(&utime.to_be_bytes());
    out.extend_from_slice(&(ranges.len() as i32).to_be_bytes());
    for r in ranges {
        out.extend_from_slice(&r.to_be_bytes());
    }
    out.extend_from_slice(&(intensities.len() as i32).to_be_bytes());
    for i in intensities {
        out.extend_from_slice(&i.to_be_bytes());
    }
    out.extend_from_slice(&rad0.to_be_bytes());
    out.extend_from_slice(&radstep.to_be_bytes());
    out
}

pub fn image_payload(utime: i64, jpeg: &[u8]) -> Vec<u8> {
    let mut out = FINGERPRINT.to_vec();
    out.extend_from_slice(&utime.to_be_bytes());
    for v in [160i32, 120, 480, 0x4A504547] {
        out.extend_from_slice(&v.to_be_bytes());
    }
    out.extend_from_slice(&(jpeg.len() as i32).to_be_bytes());
    out.extend_from_slice(jpeg);
    out.extend_from_slice(&0i32.to_be_bytes());
    out
}

/// One upper firing block with every laser at `distance` (2 mm units),
/// padded to a full packet with unknown blocks and status bytes.
pub fn velodyne_packet(distance: u16) -> Vec<u8> {
    let mut packet = Vec::with_capacity(1206);
    packet.extend_from_slice(&0xEEFFu16.to_le_bytes());
    packet.extend_from_slice(&9000u16.to_le_bytes());
    for _ in 0..32 {
        packet.extend_from_slice(&distance.to_le_bytes());
        packet.push(200);
    }
    packet.resize(1206, 0);
    packet
}

pub fn velodyne_payload(utime: i64, packet: &[u8]) -> Vec<u8> {
    let mut out = FINGERPRINT.to_vec();
    out.extend_from_slice(&utime.to_be_bytes());
    out.extend_from_slice(&(packet.len() as i32).to_be_bytes());
    out.extend_from_slice(packet);
    out
}

#[derive(Default)]
pub struct LogBuilder {
    bytes: Vec<u8>,
    next_event: u64,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(mut self, channel: &str, timestamp_us: u64, data: Vec<u8>) -> Self {
        self.bytes.extend(encode_frame(&LcmEvent {
            event_number: self.next_event,
            timestamp_us,
            channel: channel.to_string(),
            data,
        }));
        self.next_event += 1;
        self
    }

    pub fn broom(self, channel: &str, timestamp_us: u64) -> Self {
        let utime = timestamp_us as i64;
        let payload = laser_payload(utime, &[1.0, 2.0, 3.0], &[0.5, 0.5, 0.5], -0.5, 0.25);
        self.event(channel, timestamp_us, payload)
    }

    pub fn velodyne(self, timestamp_us: u64) -> Self {
        let payload = velodyne_payload(timestamp_us as i64, &velodyne_packet(1000));
        self.event("VELODYNE", timestamp_us, payload)
    }

    pub fn image(self, channel: &str, timestamp_us: u64) -> Self {
        let payload = image_payload(timestamp_us as i64, &[0xFF, 0xD8, 0xFF, 0xD9]);
        self.event(channel, timestamp_us, payload)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&self.bytes).unwrap();
        file.flush().unwrap();
        file
    }
}

/// A short drive: three BROOM_L scans, one LIDAR sweep, one thumbnail and
/// some chatter on channels the loader does not know about.
pub fn sample_log() -> LogBuilder {
    LogBuilder::new()
        .event("HEARTBEAT", 50, vec![1, 2, 3])
        .broom("BROOM_L", 100)
        .velodyne(150)
        .broom("BROOM_L", 200)
        .image("CAM_THUMB_RFR", 250)
        .broom("BROOM_L", 300)
        .event("GPS_TO_LOCAL", 310, vec![0; 16])
}
