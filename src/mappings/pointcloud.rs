//! velodyne_t → foxglove.PointCloud

use crate::error::Result;
use crate::foxglove::{NumericType, PackedElementField, PointCloud, Pose};
use crate::mappings::lcm::LcmReader;
use crate::mappings::utime_to_timestamp;
use crate::velodyne::PacketDecoder;

/// Returns closer than this are sensor noise.
pub const MIN_RANGE: f64 = 0.01;
pub const POINT_STRIDE: u32 = 32;

/// Decoded `velodyne_t`.
#[derive(Debug, Clone, PartialEq)]
pub struct VelodyneMsg {
    pub utime: i64,
    pub data: Vec<u8>,
}

pub fn velodyne_to_point_cloud(
    decoder: &dyn PacketDecoder,
    payload: &[u8],
    frame_id: &str,
) -> Result<PointCloud> {
    let msg = parse_velodyne(payload)?;
    let samples = decoder.decode(&msg.data)?;

    let mut data = Vec::with_capacity(samples.len() * POINT_STRIDE as usize);
    for sample in samples.iter().filter(|s| s.range >= MIN_RANGE) {
        for v in [sample.xyz.x, sample.xyz.y, sample.xyz.z, sample.intensity] {
            data.extend_from_slice(&v.to_le_bytes());
        }
    }
    tracing::trace!(
        decoded = samples.len(),
        kept = data.len() / POINT_STRIDE as usize,
        "transcoding velodyne packet"
    );

    Ok(PointCloud {
        timestamp: Some(utime_to_timestamp(msg.utime)),
        frame_id: frame_id.to_string(),
        pose: Some(Pose::identity()),
        point_stride: POINT_STRIDE,
        fields: point_fields(),
        data,
    })
}

fn point_fields() -> Vec<PackedElementField> {
    [("x", 0), ("y", 8), ("z", 16), ("intensity", 24)]
        .into_iter()
        .map(|(name, offset)| PackedElementField {
            name: name.to_string(),
            offset,
            r#type: NumericType::Float64 as i32,
        })
        .collect()
}

pub fn parse_velodyne(payload: &[u8]) -> Result<VelodyneMsg> {
    let mut reader = LcmReader::new("velodyne_t", payload)?;
    let utime = reader.read_i64("utime")?;
    let datalen = reader.read_len("datalen")?;
    let data = reader.read_bytes(datalen, "data")?;
    Ok(VelodyneMsg { utime, data })
}
