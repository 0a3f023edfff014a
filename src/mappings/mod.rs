//! LCM payload → Foxglove protobuf transcoders

pub mod gps;
pub mod images;
pub mod laserscan;
pub mod lcm;
pub mod pointcloud;
pub mod poses;

use prost::Message;
use prost_types::Timestamp;

use crate::channels::TranscoderKind;
use crate::error::Result;
use crate::velodyne::{PacketDecoder, VelodyneDecoder};

/// Owns the device decoder (and its calibration) for the lifetime of a loader.
pub struct Transcoder {
    packet_decoder: Box<dyn PacketDecoder>,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(Box::new(VelodyneDecoder::default()))
    }
}

impl Transcoder {
    pub fn new(packet_decoder: Box<dyn PacketDecoder>) -> Self {
        Self { packet_decoder }
    }

    /// Transcode one raw payload and return the serialized protobuf message.
    pub fn transcode(
        &self,
        kind: TranscoderKind,
        topic: &str,
        payload: &[u8],
        frame_id: &str,
    ) -> Result<Vec<u8>> {
        match kind {
            TranscoderKind::PointCloud => encode(&pointcloud::velodyne_to_point_cloud(
                self.packet_decoder.as_ref(),
                payload,
                frame_id,
            )?),
            TranscoderKind::LaserScan => {
                encode(&laserscan::laser_to_laser_scan(payload, frame_id)?)
            }
            TranscoderKind::Image => encode(&images::image_to_compressed(payload, frame_id)?),
            TranscoderKind::Gps => gps::gps_to_location_fix(topic, payload, frame_id),
            TranscoderKind::PosesInFrame => poses::pose_to_poses_in_frame(topic, payload, frame_id),
        }
    }
}

fn encode<M: Message>(msg: &M) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(msg.encoded_len());
    msg.encode(&mut buf)?;
    Ok(buf)
}

/// Split a microsecond epoch time into seconds and nanoseconds.
pub fn utime_to_timestamp(utime: i64) -> Timestamp {
    Timestamp {
        seconds: utime.div_euclid(1_000_000),
        nanos: (utime.rem_euclid(1_000_000) * 1000) as i32,
    }
}
