//! laser_t → foxglove.LaserScan

use crate::error::Result;
use crate::foxglove::{LaserScan, Pose};
use crate::mappings::lcm::LcmReader;
use crate::mappings::utime_to_timestamp;

/// Decoded `laser_t`.
#[derive(Debug, Clone, PartialEq)]
pub struct LaserMsg {
    pub utime: i64,
    pub ranges: Vec<f32>,
    pub intensities: Vec<f32>,
    pub rad0: f32,
    pub radstep: f32,
}

pub fn laser_to_laser_scan(payload: &[u8], frame_id: &str) -> Result<LaserScan> {
    let msg = parse_laser(payload)?;

    let start_angle = msg.rad0 as f64;
    let end_angle = start_angle + msg.radstep as f64 * msg.ranges.len() as f64;

    Ok(LaserScan {
        timestamp: Some(utime_to_timestamp(msg.utime)),
        frame_id: frame_id.to_string(),
        pose: Some(Pose::identity()),
        start_angle,
        end_angle,
        ranges: msg.ranges.iter().map(|&r| r as f64).collect(),
        intensities: msg.intensities.iter().map(|&i| i as f64).collect(),
    })
}

pub fn parse_laser(payload: &[u8]) -> Result<LaserMsg> {
    let mut reader = LcmReader::new("laser_t", payload)?;

    let utime = reader.read_i64("utime")?;
    let nranges = reader.read_len("nranges")?;
    let ranges = reader.read_f32_array(nranges, "ranges")?;
    let nintensities = reader.read_len("nintensities")?;
    let intensities = reader.read_f32_array(nintensities, "intensities")?;
    let rad0 = reader.read_f32("rad0")?;
    let radstep = reader.read_f32("radstep")?;

    Ok(LaserMsg {
        utime,
        ranges,
        intensities,
        rad0,
        radstep,
    })
}
