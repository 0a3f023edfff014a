//! POSE → foxglove.PosesInFrame
//!
//! Not transcoded; see [`super::gps`] for the same policy.

use crate::error::{LoaderError, Result};

pub fn pose_to_poses_in_frame(topic: &str, _payload: &[u8], _frame_id: &str) -> Result<Vec<u8>> {
    Err(LoaderError::UnsupportedChannel {
        topic: topic.to_string(),
    })
}
