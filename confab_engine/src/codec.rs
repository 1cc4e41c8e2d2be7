//! Structured node reader/writer contract and its binary implementation.
//!
//! Serialization code in this crate speaks only to [`NodeReader`] and
//! [`NodeWriter`]: fixed-width integers, length-prefixed UTF-8 strings, and
//! repeated-node counts. [`BinReader`]/[`BinWriter`] implement the contract
//! over any `io::Read`/`io::Write` in little-endian byte order, which is the
//! stable on-disk and wire representation.

#![allow(clippy::cast_possible_truncation)]

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use confab_data::DialogError;

/// Errors produced while encoding or decoding structured records.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("string field is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("string of {0} bytes exceeds the length-prefix limit")]
    StringTooLong(usize),
    #[error("{0} repeated nodes exceeds the count-prefix limit")]
    TooManyNodes(usize),
    #[error("malformed dialog record: {0}")]
    BadDialog(#[from] DialogError),
    #[error("invalid bank magic {found:?}")]
    InvalidMagic { found: [u8; 4] },
    #[error("unsupported bank format version {0}")]
    UnsupportedVersion(u16),
}

/// Write half of the structured node contract.
pub trait NodeWriter {
    /// # Errors
    /// Fails when the underlying sink fails.
    fn put_u16(&mut self, value: u16) -> Result<(), WireError>;
    /// # Errors
    /// Fails when the underlying sink fails.
    fn put_u32(&mut self, value: u32) -> Result<(), WireError>;
    /// Write a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Fails when the underlying sink fails or the string is too long for
    /// the length prefix.
    fn put_str(&mut self, value: &str) -> Result<(), WireError>;
    /// Announce `count` repeated child nodes to follow.
    ///
    /// # Errors
    /// Fails when the underlying sink fails.
    fn begin_nodes(&mut self, count: u32) -> Result<(), WireError>;
}

/// Read half of the structured node contract.
pub trait NodeReader {
    /// # Errors
    /// Fails when the underlying source fails or is truncated.
    fn take_u16(&mut self) -> Result<u16, WireError>;
    /// # Errors
    /// Fails when the underlying source fails or is truncated.
    fn take_u32(&mut self) -> Result<u32, WireError>;
    /// Read a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Fails on I/O problems or invalid UTF-8 in the string bytes.
    fn take_str(&mut self) -> Result<String, WireError>;
    /// Number of repeated child nodes to follow.
    ///
    /// # Errors
    /// Fails when the underlying source fails or is truncated.
    fn node_count(&mut self) -> Result<u32, WireError>;
}

/// Little-endian binary node writer.
pub struct BinWriter<W: Write> {
    out: W,
}

impl<W: Write> BinWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> NodeWriter for BinWriter<W> {
    fn put_u16(&mut self, value: u16) -> Result<(), WireError> {
        self.out.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    fn put_u32(&mut self, value: u32) -> Result<(), WireError> {
        self.out.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    fn put_str(&mut self, value: &str) -> Result<(), WireError> {
        let len = u32::try_from(value.len()).map_err(|_| WireError::StringTooLong(value.len()))?;
        self.out.write_u32::<LittleEndian>(len)?;
        self.out.write_all(value.as_bytes())?;
        Ok(())
    }

    fn begin_nodes(&mut self, count: u32) -> Result<(), WireError> {
        self.put_u32(count)
    }
}

/// Little-endian binary node reader.
pub struct BinReader<R: Read> {
    src: R,
}

impl<R: Read> BinReader<R> {
    pub fn new(src: R) -> Self {
        Self { src }
    }

    pub fn into_inner(self) -> R {
        self.src
    }
}

impl<R: Read> NodeReader for BinReader<R> {
    fn take_u16(&mut self) -> Result<u16, WireError> {
        Ok(self.src.read_u16::<LittleEndian>()?)
    }

    fn take_u32(&mut self) -> Result<u32, WireError> {
        Ok(self.src.read_u32::<LittleEndian>()?)
    }

    fn take_str(&mut self) -> Result<String, WireError> {
        let len = self.take_u32()? as usize;
        let mut bytes = vec![0u8; len];
        self.src.read_exact(&mut bytes)?;
        Ok(String::from_utf8(bytes)?)
    }

    fn node_count(&mut self) -> Result<u32, WireError> {
        self.take_u32()
    }
}
