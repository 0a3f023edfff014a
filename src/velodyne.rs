//! Velodyne HDL-64E packet decoding
//!
//! A packet carries 12 firing blocks of 100 bytes followed by 6 status bytes:
//!
//! ```text
//! [block id u16 LE][rotation u16 LE, 0.01 deg][32 x (distance u16 LE, 2 mm)(intensity u8)]
//! ```
//!
//! Block id `0xEEFF` fires lasers 0-31, `0xDDFF` fires lasers 32-63.

use std::fs;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use nalgebra::Vector3;
use serde::Deserialize;
use tracing::debug;

use crate::error::{LoaderError, Result};

pub const BLOCK_LEN: usize = 100;
pub const BLOCKS_PER_PACKET: usize = 12;
pub const LASERS_PER_BLOCK: usize = 32;
pub const UPPER_BLOCK: u16 = 0xEEFF;
pub const LOWER_BLOCK: u16 = 0xDDFF;
const DISTANCE_RESOLUTION_M: f64 = 0.002;

/// One return, in the sensor frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LidarSample {
    pub xyz: Vector3<f64>,
    pub range: f64,
    /// Normalized to 0..1.
    pub intensity: f64,
    pub laser: u8,
    /// Corrected azimuth, radians.
    pub theta: f64,
}

/// Turns one device-native packet into Cartesian samples.
pub trait PacketDecoder: Send + Sync {
    fn decode(&self, packet: &[u8]) -> Result<Vec<LidarSample>>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LaserCorrection {
    pub vertical_deg: f64,
    #[serde(default)]
    pub rotational_deg: f64,
    #[serde(default)]
    pub distance_m: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VelodyneCalibration {
    pub lasers: Vec<LaserCorrection>,
}

impl Default for VelodyneCalibration {
    fn default() -> Self {
        Self::hdl64e()
    }
}

impl VelodyneCalibration {
    /// Nominal HDL-64E layout: 64 lasers from +2.0 to -24.8 degrees, no corrections.
    pub fn hdl64e() -> Self {
        let top = 2.0;
        let bottom = -24.8;
        let n = 2 * LASERS_PER_BLOCK;
        let step = (top - bottom) / (n - 1) as f64;
        let lasers = (0..n)
            .map(|i| LaserCorrection {
                vertical_deg: top - step * i as f64,
                rotational_deg: 0.0,
                distance_m: 0.0,
            })
            .collect();
        Self { lasers }
    }

    /// Load per-laser corrections from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let calibration: VelodyneCalibration =
            serde_json::from_str(&text).map_err(|e| LoaderError::Calibration {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if calibration.lasers.len() != 2 * LASERS_PER_BLOCK {
            return Err(LoaderError::Calibration {
                path: path.to_path_buf(),
                reason: format!(
                    "expected {} lasers, found {}",
                    2 * LASERS_PER_BLOCK,
                    calibration.lasers.len()
                ),
            });
        }
        Ok(calibration)
    }
}

/// Calibration-driven decoder for HDL-64E packets.
#[derive(Debug, Clone, Default)]
pub struct VelodyneDecoder {
    calibration: VelodyneCalibration,
}

impl VelodyneDecoder {
    pub fn new(calibration: VelodyneCalibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> &VelodyneCalibration {
        &self.calibration
    }
}

impl PacketDecoder for VelodyneDecoder {
    fn decode(&self, packet: &[u8]) -> Result<Vec<LidarSample>> {
        if packet.len() < BLOCK_LEN {
            return Err(LoaderError::malformed(
                "velodyne packet",
                format!("{} bytes is shorter than one firing block", packet.len()),
            ));
        }

        let mut samples = Vec::with_capacity(BLOCKS_PER_PACKET * LASERS_PER_BLOCK);
        for block in packet.chunks_exact(BLOCK_LEN).take(BLOCKS_PER_PACKET) {
            let laser_base = match LittleEndian::read_u16(&block[0..2]) {
                UPPER_BLOCK => 0,
                LOWER_BLOCK => LASERS_PER_BLOCK,
                other => {
                    debug!(block_id = other, "skipping unknown firing block");
                    continue;
                }
            };
            let rotation = (LittleEndian::read_u16(&block[2..4]) as f64 / 100.0).to_radians();

            for (i, ret) in block[4..].chunks_exact(3).enumerate() {
                let laser = laser_base + i;
                let Some(correction) = self.calibration.lasers.get(laser) else {
                    continue;
                };
                let raw = LittleEndian::read_u16(&ret[0..2]);
                let range = raw as f64 * DISTANCE_RESOLUTION_M + correction.distance_m;
                let theta = rotation - correction.rotational_deg.to_radians();
                let phi = correction.vertical_deg.to_radians();
                let xyz = Vector3::new(
                    range * phi.cos() * theta.sin(),
                    range * phi.cos() * theta.cos(),
                    range * phi.sin(),
                );
                samples.push(LidarSample {
                    xyz,
                    range,
                    intensity: ret[2] as f64 / 255.0,
                    laser: laser as u8,
                    theta,
                });
            }
        }
        Ok(samples)
    }
}
