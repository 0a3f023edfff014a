//! Big-endian reader for LCM-encoded payloads
//!
//! Every LCM message starts with an 8-byte type fingerprint, followed by its
//! fields in declaration order. Arrays are preceded by an `int32` length field.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::error::{LoaderError, Result};

pub struct LcmReader<'a> {
    type_name: &'static str,
    cursor: Cursor<&'a [u8]>,
}

impl<'a> LcmReader<'a> {
    /// Position a reader just past the fingerprint of `payload`.
    pub fn new(type_name: &'static str, payload: &'a [u8]) -> Result<Self> {
        let mut reader = Self {
            type_name,
            cursor: Cursor::new(payload),
        };
        reader.read_i64("fingerprint")?;
        Ok(reader)
    }

    fn short(&self, field: &str) -> LoaderError {
        LoaderError::malformed(
            self.type_name,
            format!("payload too short for {field} at byte {}", self.cursor.position()),
        )
    }

    pub fn read_i64(&mut self, field: &str) -> Result<i64> {
        self.cursor
            .read_i64::<BigEndian>()
            .map_err(|_| self.short(field))
    }

    pub fn read_i32(&mut self, field: &str) -> Result<i32> {
        self.cursor
            .read_i32::<BigEndian>()
            .map_err(|_| self.short(field))
    }

    pub fn read_f32(&mut self, field: &str) -> Result<f32> {
        self.cursor
            .read_f32::<BigEndian>()
            .map_err(|_| self.short(field))
    }

    /// Read an `int32` array length, rejecting negative values.
    pub fn read_len(&mut self, field: &str) -> Result<usize> {
        let len = self.read_i32(field)?;
        usize::try_from(len)
            .map_err(|_| LoaderError::malformed(self.type_name, format!("negative {field}: {len}")))
    }

    pub fn read_f32_array(&mut self, len: usize, field: &str) -> Result<Vec<f32>> {
        let remaining = self.remaining();
        if len.saturating_mul(4) > remaining {
            return Err(self.short(field));
        }
        let mut values = vec![0f32; len];
        self.cursor
            .read_f32_into::<BigEndian>(&mut values)
            .map_err(|_| self.short(field))?;
        Ok(values)
    }

    pub fn read_bytes(&mut self, len: usize, field: &str) -> Result<Vec<u8>> {
        if len > self.remaining() {
            return Err(self.short(field));
        }
        let mut bytes = vec![0u8; len];
        self.cursor
            .read_exact(&mut bytes)
            .map_err(|_| self.short(field))?;
        Ok(bytes)
    }

    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len() as u64;
        len.saturating_sub(self.cursor.position()) as usize
    }
}
