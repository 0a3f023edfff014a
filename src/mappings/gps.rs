//! GPS_TO_LOCAL → foxglove.LocationFix
//!
//! The source payload layout for this channel is not decoded yet, so every
//! message is reported as unsupported rather than emitted half-populated.

use crate::error::{LoaderError, Result};

pub fn gps_to_location_fix(topic: &str, _payload: &[u8], _frame_id: &str) -> Result<Vec<u8>> {
    Err(LoaderError::UnsupportedChannel {
        topic: topic.to_string(),
    })
}
