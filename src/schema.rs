//! Foxglove protobuf schema descriptors and the `schema` command

use std::collections::HashMap;

use anyhow::Result;
use once_cell::sync::Lazy;
use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet,
};

use crate::channels::{CHANNEL_DEFS, SchemaKind};

const TIMESTAMP_PROTO: &str = "google/protobuf/timestamp.proto";
const VECTOR3_PROTO: &str = "foxglove/Vector3.proto";
const QUATERNION_PROTO: &str = "foxglove/Quaternion.proto";
const POSE_PROTO: &str = "foxglove/Pose.proto";
const PACKED_ELEMENT_FIELD_PROTO: &str = "foxglove/PackedElementField.proto";

static DESCRIPTORS: Lazy<HashMap<SchemaKind, Vec<u8>>> = Lazy::new(|| {
    SchemaKind::ALL
        .into_iter()
        .map(|kind| (kind, build_descriptor_set(kind).encode_to_vec()))
        .collect()
});

/// Encoded `FileDescriptorSet` for one output schema, dependencies first.
pub fn descriptor_set(kind: SchemaKind) -> &'static [u8] {
    DESCRIPTORS.get(&kind).map(Vec::as_slice).unwrap_or_default()
}

pub fn build_descriptor_set(kind: SchemaKind) -> FileDescriptorSet {
    let file = match kind {
        SchemaKind::PointCloud => vec![
            timestamp_file(),
            vector3_file(),
            quaternion_file(),
            pose_file(),
            packed_element_field_file(),
            point_cloud_file(),
        ],
        SchemaKind::LaserScan => vec![
            timestamp_file(),
            vector3_file(),
            quaternion_file(),
            pose_file(),
            laser_scan_file(),
        ],
        SchemaKind::CompressedImage => vec![timestamp_file(), compressed_image_file()],
        SchemaKind::LocationFix => vec![timestamp_file(), location_fix_file()],
        SchemaKind::PosesInFrame => vec![
            timestamp_file(),
            vector3_file(),
            quaternion_file(),
            pose_file(),
            poses_in_frame_file(),
        ],
    };
    FileDescriptorSet { file }
}

/// Print every LCM channel → Foxglove schema mapping
pub fn print_schema() -> Result<()> {
    println!("Supported LCM → Foxglove mappings:");
    println!("---------------------------------------------------------------");

    for def in CHANNEL_DEFS {
        let status = if def.reserved { "reserved" } else { "active" };
        println!("{:<20} → {:<28} {:<16} {}", def.topic, def.schema.name(), def.frame_id, status);
    }

    Ok(())
}

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(json_name(name)),
        ..Default::default()
    }
}

fn repeated(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..field(name, number, ty)
    }
}

fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, Type::Message)
    }
}

fn enum_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, Type::Enum)
    }
}

fn json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn enumeration(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.to_string()),
        value: values
            .iter()
            .map(|(value, number)| EnumValueDescriptorProto {
                name: Some(value.to_string()),
                number: Some(*number),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn message(name: &str, field: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field,
        ..Default::default()
    }
}

fn file(
    name: &str,
    package: &str,
    dependency: &[&str],
    message_type: DescriptorProto,
) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        dependency: dependency.iter().map(|d| d.to_string()).collect(),
        message_type: vec![message_type],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn timestamp_file() -> FileDescriptorProto {
    file(
        TIMESTAMP_PROTO,
        "google.protobuf",
        &[],
        message(
            "Timestamp",
            vec![field("seconds", 1, Type::Int64), field("nanos", 2, Type::Int32)],
        ),
    )
}

fn vector3_file() -> FileDescriptorProto {
    file(
        VECTOR3_PROTO,
        "foxglove",
        &[],
        message(
            "Vector3",
            vec![
                field("x", 1, Type::Double),
                field("y", 2, Type::Double),
                field("z", 3, Type::Double),
            ],
        ),
    )
}

fn quaternion_file() -> FileDescriptorProto {
    file(
        QUATERNION_PROTO,
        "foxglove",
        &[],
        message(
            "Quaternion",
            vec![
                field("x", 1, Type::Double),
                field("y", 2, Type::Double),
                field("z", 3, Type::Double),
                field("w", 4, Type::Double),
            ],
        ),
    )
}

fn pose_file() -> FileDescriptorProto {
    file(
        POSE_PROTO,
        "foxglove",
        &[QUATERNION_PROTO, VECTOR3_PROTO],
        message(
            "Pose",
            vec![
                message_field("position", 1, ".foxglove.Vector3"),
                message_field("orientation", 2, ".foxglove.Quaternion"),
            ],
        ),
    )
}

fn packed_element_field_file() -> FileDescriptorProto {
    let mut msg = message(
        "PackedElementField",
        vec![
            field("name", 1, Type::String),
            field("offset", 2, Type::Fixed32),
            enum_field("type", 3, ".foxglove.PackedElementField.NumericType"),
        ],
    );
    msg.enum_type.push(enumeration(
        "NumericType",
        &[
            ("UNKNOWN", 0),
            ("UINT8", 1),
            ("INT8", 2),
            ("UINT16", 3),
            ("INT16", 4),
            ("UINT32", 5),
            ("INT32", 6),
            ("FLOAT32", 7),
            ("FLOAT64", 8),
        ],
    ));
    file(PACKED_ELEMENT_FIELD_PROTO, "foxglove", &[], msg)
}

fn point_cloud_file() -> FileDescriptorProto {
    file(
        "foxglove/PointCloud.proto",
        "foxglove",
        &[PACKED_ELEMENT_FIELD_PROTO, POSE_PROTO, TIMESTAMP_PROTO],
        message(
            "PointCloud",
            vec![
                message_field("timestamp", 1, ".google.protobuf.Timestamp"),
                field("frame_id", 2, Type::String),
                message_field("pose", 3, ".foxglove.Pose"),
                field("point_stride", 4, Type::Fixed32),
                FieldDescriptorProto {
                    label: Some(Label::Repeated as i32),
                    ..message_field("fields", 5, ".foxglove.PackedElementField")
                },
                field("data", 6, Type::Bytes),
            ],
        ),
    )
}

fn laser_scan_file() -> FileDescriptorProto {
    file(
        "foxglove/LaserScan.proto",
        "foxglove",
        &[POSE_PROTO, TIMESTAMP_PROTO],
        message(
            "LaserScan",
            vec![
                message_field("timestamp", 1, ".google.protobuf.Timestamp"),
                field("frame_id", 2, Type::String),
                message_field("pose", 3, ".foxglove.Pose"),
                field("start_angle", 4, Type::Double),
                field("end_angle", 5, Type::Double),
                repeated("ranges", 6, Type::Double),
                repeated("intensities", 7, Type::Double),
            ],
        ),
    )
}

fn compressed_image_file() -> FileDescriptorProto {
    file(
        "foxglove/CompressedImage.proto",
        "foxglove",
        &[TIMESTAMP_PROTO],
        message(
            "CompressedImage",
            vec![
                message_field("timestamp", 1, ".google.protobuf.Timestamp"),
                field("frame_id", 4, Type::String),
                field("data", 2, Type::Bytes),
                field("format", 3, Type::String),
            ],
        ),
    )
}

fn location_fix_file() -> FileDescriptorProto {
    let mut msg = message(
        "LocationFix",
        vec![
            message_field("timestamp", 6, ".google.protobuf.Timestamp"),
            field("frame_id", 7, Type::String),
            field("latitude", 1, Type::Double),
            field("longitude", 2, Type::Double),
            field("altitude", 3, Type::Double),
            repeated("position_covariance", 4, Type::Double),
            enum_field(
                "position_covariance_type",
                5,
                ".foxglove.LocationFix.PositionCovarianceType",
            ),
        ],
    );
    msg.enum_type.push(enumeration(
        "PositionCovarianceType",
        &[("UNKNOWN", 0), ("APPROXIMATED", 1), ("DIAGONAL_KNOWN", 2), ("KNOWN", 3)],
    ));
    file("foxglove/LocationFix.proto", "foxglove", &[TIMESTAMP_PROTO], msg)
}

fn poses_in_frame_file() -> FileDescriptorProto {
    file(
        "foxglove/PosesInFrame.proto",
        "foxglove",
        &[POSE_PROTO, TIMESTAMP_PROTO],
        message(
            "PosesInFrame",
            vec![
                message_field("timestamp", 1, ".google.protobuf.Timestamp"),
                field("frame_id", 2, Type::String),
                FieldDescriptorProto {
                    label: Some(Label::Repeated as i32),
                    ..message_field("poses", 3, ".foxglove.Pose")
                },
            ],
        ),
    )
}
