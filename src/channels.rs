//! Fixed LCM channel → Foxglove schema enumeration

use serde::Serialize;

use crate::schema;

pub const MESSAGE_ENCODING: &str = "protobuf";

/// Output schemas this loader can report, keyed by their numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    PosesInFrame = 1,
    CompressedImage = 2,
    LocationFix = 3,
    PointCloud = 4,
    LaserScan = 5,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 5] = [
        SchemaKind::PosesInFrame,
        SchemaKind::CompressedImage,
        SchemaKind::LocationFix,
        SchemaKind::PointCloud,
        SchemaKind::LaserScan,
    ];

    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            SchemaKind::PosesInFrame => "foxglove.PosesInFrame",
            SchemaKind::CompressedImage => "foxglove.CompressedImage",
            SchemaKind::LocationFix => "foxglove.LocationFix",
            SchemaKind::PointCloud => "foxglove.PointCloud",
            SchemaKind::LaserScan => "foxglove.LaserScan",
        }
    }

    pub fn from_id(id: u16) -> Option<SchemaKind> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Transcoder that produces messages of this schema.
    pub fn transcoder(self) -> TranscoderKind {
        match self {
            SchemaKind::PosesInFrame => TranscoderKind::PosesInFrame,
            SchemaKind::CompressedImage => TranscoderKind::Image,
            SchemaKind::LocationFix => TranscoderKind::Gps,
            SchemaKind::PointCloud => TranscoderKind::PointCloud,
            SchemaKind::LaserScan => TranscoderKind::LaserScan,
        }
    }
}

/// One variant per source payload family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscoderKind {
    PointCloud,
    LaserScan,
    Image,
    Gps,
    PosesInFrame,
}

/// Static description of a known LCM channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelDef {
    pub id: u16,
    pub topic: &'static str,
    pub schema: SchemaKind,
    pub frame_id: &'static str,
    /// Reserved channels are only indexed when explicitly requested.
    pub reserved: bool,
}

pub const CHANNEL_DEFS: [ChannelDef; 10] = [
    def(0, "POSE", SchemaKind::PosesInFrame, "poses", true),
    def(1, "CAM_THUMB_RFR", SchemaKind::CompressedImage, "cam_thumb_rfr", false),
    def(2, "CAM_THUMB_RFC", SchemaKind::CompressedImage, "cam_thumb_rfc", false),
    def(3, "GPS_TO_LOCAL", SchemaKind::LocationFix, "gps", true),
    def(4, "VELODYNE", SchemaKind::PointCloud, "velodyne", false),
    def(5, "BROOM_L", SchemaKind::LaserScan, "broom_l", false),
    def(6, "BROOM_R", SchemaKind::LaserScan, "broom_r", false),
    def(7, "BROOM_C", SchemaKind::LaserScan, "broom_c", false),
    def(8, "BROOM_CL", SchemaKind::LaserScan, "broom_cl", false),
    def(9, "BROOM_CR", SchemaKind::LaserScan, "broom_cr", false),
];

const fn def(
    id: u16,
    topic: &'static str,
    schema: SchemaKind,
    frame_id: &'static str,
    reserved: bool,
) -> ChannelDef {
    ChannelDef {
        id,
        topic,
        schema,
        frame_id,
        reserved,
    }
}

pub fn channel_def(id: u16) -> Option<&'static ChannelDef> {
    CHANNEL_DEFS.iter().find(|def| def.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: u16,
    pub schema_id: u16,
    pub topic_name: String,
    pub message_encoding: String,
    pub message_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub id: u16,
    pub name: String,
    pub encoding: String,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Channels the loader indexes. Counts start at zero.
pub fn build_channels(include_reserved: bool) -> Vec<Channel> {
    CHANNEL_DEFS
        .iter()
        .filter(|def| include_reserved || !def.reserved)
        .map(|def| Channel {
            id: def.id,
            schema_id: def.schema.id(),
            topic_name: def.topic.to_string(),
            message_encoding: MESSAGE_ENCODING.to_string(),
            message_count: 0,
        })
        .collect()
}

/// Every output schema, reserved ones included.
pub fn build_schemas() -> Vec<Schema> {
    SchemaKind::ALL
        .into_iter()
        .map(|kind| Schema {
            id: kind.id(),
            name: kind.name().to_string(),
            encoding: MESSAGE_ENCODING.to_string(),
            data: schema::descriptor_set(kind).to_vec(),
        })
        .collect()
}
