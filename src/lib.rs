//! lcm2foxglove - Read LCM sensor logs as Foxglove protobuf messages
//!
//! This library indexes an LCM event log held in memory and serves
//! time- and channel-filtered iterators whose messages are transcoded to
//! Foxglove schemas, ready to be written to MCAP or handed to a viewer.
//!
//! # Features
//!
//! - **Point clouds**: `velodyne_t` HDL-64E packets → `foxglove.PointCloud`
//! - **Laser scans**: `laser_t` planar scans → `foxglove.LaserScan`
//! - **Images**: `image_t` JPEG thumbnails → `foxglove.CompressedImage`
//! - **Index**: one pass over the log, binary-searched by timestamp
//! - **MCAP export**: `convert_log` writes protobuf channels with descriptor sets
//!
//! # Example
//!
//! ```rust,no_run
//! use lcm2foxglove::{DataLoader, LoaderOptions, MessageIteratorArgs};
//!
//! let mut loader = DataLoader::new(vec!["run.lcm".into()], LoaderOptions::default());
//! let init = loader.initialize()?;
//!
//! let ids = init.channels.iter().map(|c| c.id);
//! for msg in loader.create_iterator(&MessageIteratorArgs::over(init.time_range, ids))? {
//!     match msg {
//!         Ok(msg) => println!("{} @ {} ns", msg.channel_id, msg.log_time_ns),
//!         Err(e) if e.is_fatal() => return Err(e.into()),
//!         Err(e) => eprintln!("skipped: {e}"),
//!     }
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod channels;
pub mod cli;
pub mod convert;
pub mod error;
pub mod event_log;
pub mod foxglove;
pub mod index;
pub mod iterator;
pub mod lcm_io;
pub mod loader;
pub mod mappings;
pub mod schema;
pub mod velodyne;

// Re-export main types for convenience
pub use convert::{ConvertOptions, ConvertStats, convert_log};
pub use error::LoaderError;
pub use iterator::{Message, MessageIterator, MessageIteratorArgs};
pub use lcm_io::inspect_log;
pub use loader::{DataLoader, Initialization, LoaderOptions};
