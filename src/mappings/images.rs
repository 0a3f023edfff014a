//! image_t → foxglove.CompressedImage

use crate::error::Result;
use crate::foxglove::CompressedImage;
use crate::mappings::lcm::LcmReader;
use crate::mappings::utime_to_timestamp;

/// Camera thumbnails in these logs are always JPEG.
pub const IMAGE_FORMAT: &str = "jpeg";

/// Decoded `image_t`. Trailing metadata is not read.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMsg {
    pub utime: i64,
    pub width: i32,
    pub height: i32,
    pub row_stride: i32,
    pub pixelformat: i32,
    pub data: Vec<u8>,
}

pub fn image_to_compressed(payload: &[u8], frame_id: &str) -> Result<CompressedImage> {
    let msg = parse_image(payload)?;
    tracing::trace!(
        width = msg.width,
        height = msg.height,
        bytes = msg.data.len(),
        "transcoding image"
    );

    Ok(CompressedImage {
        timestamp: Some(utime_to_timestamp(msg.utime)),
        frame_id: frame_id.to_string(),
        data: msg.data,
        format: IMAGE_FORMAT.to_string(),
    })
}

pub fn parse_image(payload: &[u8]) -> Result<ImageMsg> {
    let mut reader = LcmReader::new("image_t", payload)?;

    let utime = reader.read_i64("utime")?;
    let width = reader.read_i32("width")?;
    let height = reader.read_i32("height")?;
    let row_stride = reader.read_i32("row_stride")?;
    let pixelformat = reader.read_i32("pixelformat")?;
    let size = reader.read_len("size")?;
    let data = reader.read_bytes(size, "image")?;

    Ok(ImageMsg {
        utime,
        width,
        height,
        row_stride,
        pixelformat,
        data,
    })
}
