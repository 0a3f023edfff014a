//! Entry point for reading an LCM log: load it whole, index it, hand out iterators.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::channels::{Channel, Schema, build_channels, build_schemas};
use crate::error::{LoaderError, Result};
use crate::index::{LogIndex, TimeRange, build_index};
use crate::iterator::{MessageIterator, MessageIteratorArgs};
use crate::mappings::Transcoder;
use crate::velodyne::{VelodyneCalibration, VelodyneDecoder};

/// Blocking source of log bytes.
pub trait LogReader {
    fn size(&self) -> u64;

    /// Fill `buf` as far as possible and return the number of bytes read.
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<u64>;
}

pub struct FileReader {
    file: File,
    size: u64,
}

impl FileReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }
}

impl LogReader for FileReader {
    fn size(&self) -> u64 {
        self.size
    }

    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<u64> {
        let mut total = 0;
        while total < buf.len() {
            match self.file.read(&mut buf[total..])? {
                0 => break,
                n => total += n,
            }
        }
        Ok(total as u64)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Also index `POSE` and `GPS_TO_LOCAL`. Their messages fail to transcode.
    pub include_reserved_channels: bool,
    /// JSON Velodyne calibration; the built-in HDL-64E table otherwise.
    pub calibration: Option<PathBuf>,
}

/// What a host learns about the log after initialization.
#[derive(Debug, Clone, Serialize)]
pub struct Initialization {
    pub channels: Vec<Channel>,
    pub schemas: Vec<Schema>,
    pub time_range: Option<TimeRange>,
}

struct LoadedLog {
    buffer: Vec<u8>,
    index: LogIndex,
    transcoder: Transcoder,
}

pub struct DataLoader {
    paths: Vec<PathBuf>,
    options: LoaderOptions,
    loaded: Option<LoadedLog>,
}

impl DataLoader {
    pub fn new(paths: Vec<PathBuf>, options: LoaderOptions) -> Self {
        Self {
            paths,
            options,
            loaded: None,
        }
    }

    /// Load an in-memory log.
    pub fn from_bytes(buffer: Vec<u8>, options: LoaderOptions) -> Result<(Self, Initialization)> {
        let mut loader = Self::new(Vec::new(), options);
        let init = loader.load(buffer)?;
        Ok((loader, init))
    }

    pub fn initialize(&mut self) -> Result<Initialization> {
        let [path] = self.paths.as_slice() else {
            return Err(LoaderError::UnsupportedInput("only one file supported".to_string()));
        };
        let path = path.clone();
        info!(path = %path.display(), "opening LCM log");
        let mut reader = FileReader::open(&path)?;
        self.initialize_from(&mut reader)
    }

    /// Read the whole of `reader` into memory and index it.
    pub fn initialize_from(&mut self, reader: &mut dyn LogReader) -> Result<Initialization> {
        let expected = reader.size();
        let mut buffer = vec![0u8; expected as usize];
        let actual = reader.read(&mut buffer)?;
        if actual != expected {
            return Err(LoaderError::ShortRead { expected, actual });
        }
        self.load(buffer)
    }

    fn load(&mut self, buffer: Vec<u8>) -> Result<Initialization> {
        let calibration = match &self.options.calibration {
            Some(path) => VelodyneCalibration::from_json_file(path)?,
            None => VelodyneCalibration::default(),
        };
        let transcoder = Transcoder::new(Box::new(VelodyneDecoder::new(calibration)));

        let mut channels = build_channels(self.options.include_reserved_channels);
        let index = build_index(&buffer, &mut channels)?;
        info!(
            bytes = buffer.len(),
            indexed = index.len(),
            channels = channels.len(),
            "indexed LCM log"
        );

        let init = Initialization {
            channels,
            schemas: build_schemas(),
            time_range: index.time_range,
        };
        self.loaded = Some(LoadedLog {
            buffer,
            index,
            transcoder,
        });
        Ok(init)
    }

    pub fn index(&self) -> Option<&LogIndex> {
        self.loaded.as_ref().map(|l| &l.index)
    }

    pub fn create_iterator(&self, args: &MessageIteratorArgs) -> Result<MessageIterator<'_>> {
        let loaded = self.loaded.as_ref().ok_or(LoaderError::NotInitialized)?;
        Ok(MessageIterator::new(
            &loaded.buffer,
            &loaded.index.entries,
            &loaded.transcoder,
            args.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::{LcmEvent, encode_frame};

    struct StubReader {
        data: Vec<u8>,
        claimed: u64,
    }

    impl LogReader for StubReader {
        fn size(&self) -> u64 {
            self.claimed
        }

        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<u64> {
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            Ok(n as u64)
        }
    }

    fn broom_frame(timestamp_us: u64) -> Vec<u8> {
        let mut data = vec![0u8; 8];
        data.extend_from_slice(&(timestamp_us as i64).to_be_bytes());
        data.extend_from_slice(&0i32.to_be_bytes());
        data.extend_from_slice(&0i32.to_be_bytes());
        data.extend_from_slice(&0.0f32.to_be_bytes());
        data.extend_from_slice(&0.0f32.to_be_bytes());
        encode_frame(&LcmEvent {
            event_number: 0,
            timestamp_us,
            channel: "BROOM_C".to_string(),
            data,
        })
    }

    #[test]
    fn test_multiple_paths_rejected() {
        let paths = vec!["a.lcm".into(), "b.lcm".into()];
        let mut loader = DataLoader::new(paths, LoaderOptions::default());
        let err = loader.initialize().unwrap_err();
        assert_eq!(err.to_string(), "only one file supported");
        let mut empty = DataLoader::new(vec![], LoaderOptions::default());
        assert!(matches!(empty.initialize(), Err(LoaderError::UnsupportedInput(_))));
    }

    #[test]
    fn test_iterator_before_initialize() {
        let loader = DataLoader::new(vec!["a.lcm".into()], LoaderOptions::default());
        let args = MessageIteratorArgs::new(0, u64::MAX, [7]);
        assert!(matches!(loader.create_iterator(&args), Err(LoaderError::NotInitialized)));
        assert!(loader.index().is_none());
    }

    #[test]
    fn test_short_read() {
        let mut loader = DataLoader::new(vec![], LoaderOptions::default());
        let mut reader = StubReader {
            data: broom_frame(10),
            claimed: 1000,
        };
        let err = loader.initialize_from(&mut reader).unwrap_err();
        assert!(matches!(err, LoaderError::ShortRead { expected: 1000, .. }));
    }

    #[test]
    fn test_initialize_from_reader() {
        let data = [broom_frame(10), broom_frame(20)].concat();
        let mut loader = DataLoader::new(vec![], LoaderOptions::default());
        let mut reader = StubReader {
            claimed: data.len() as u64,
            data,
        };
        let init = loader.initialize_from(&mut reader).unwrap();
        assert_eq!(init.schemas.len(), 5);
        assert_eq!(init.channels.len(), 8);
        let broom_c = init.channels.iter().find(|c| c.topic_name == "BROOM_C").unwrap();
        assert_eq!(broom_c.message_count, 2);
        assert_eq!(
            init.time_range,
            Some(TimeRange {
                start_time_ns: 10_000,
                end_time_ns: 20_000
            })
        );

        let args = MessageIteratorArgs::over(init.time_range, [broom_c.id]);
        assert_eq!(loader.create_iterator(&args).unwrap().count(), 2);
    }

    #[test]
    fn test_reserved_channels_opt_in() {
        let options = LoaderOptions {
            include_reserved_channels: true,
            ..Default::default()
        };
        let (_, init) = DataLoader::from_bytes(Vec::new(), options).unwrap();
        assert_eq!(init.channels.len(), 10);
        assert!(init.time_range.is_none());
    }

    #[test]
    fn test_missing_calibration_file() {
        let options = LoaderOptions {
            calibration: Some("/nonexistent/calibration.json".into()),
            ..Default::default()
        };
        assert!(DataLoader::from_bytes(Vec::new(), options).is_err());
    }
}
