//! Fixed-width primitive I/O.
//!
//! All multi-byte values are little-endian. Floating point values are
//! transferred as their IEEE-754 bit patterns, so NaN payloads and signed
//! zeros survive a round trip and the output does not depend on host byte
//! order. Strings are raw bytes followed by a single zero byte.
//!
//! These methods work on whole bytes and never touch the pending bit
//! buffer; align first when mixing them with bit-level calls.

use crate::backend::GrowingBufferSink;
use crate::config::GrowthConfig;
use crate::error::{BitioError, Result};
use crate::stream::{ByteSink, ByteSource, Reader, Writer};
use std::ffi::CString;

/// Staging growth used while collecting a null-terminated string.
const STRING_STAGING: GrowthConfig = GrowthConfig {
    initial_capacity: 16,
    increment: 16,
};

impl<S: ByteSource> Reader<S> {
    /// Read an unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read a little-endian IEEE-754 single precision value.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Read a little-endian IEEE-754 double precision value.
    pub fn read_f64(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(f64::from_bits(u64::from_le_bytes(buf)))
    }

    /// Read bytes up to and including the next zero byte.
    ///
    /// The terminator is consumed from the stream but not part of the
    /// returned string. Fails with `UnexpectedEof` if the stream ends first.
    pub fn read_string(&mut self) -> Result<CString> {
        let mut staging = Writer::new(GrowingBufferSink::with_config(STRING_STAGING));
        loop {
            let byte = self.read_u8()?;
            if byte == 0 {
                break;
            }
            staging.write_u8(byte)?;
        }
        let bytes = staging.take_buffer()?;
        CString::new(bytes).map_err(|err| BitioError::InteriorNul {
            offset: err.nul_position(),
        })
    }
}

impl<S: ByteSink> Writer<S> {
    /// Write an unsigned byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_all(&[value])
    }

    /// Write a little-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    /// Write a little-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_all(&value.to_le_bytes())
    }

    /// Write a little-endian IEEE-754 single precision value.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.write_u32(value.to_bits())
    }

    /// Write a little-endian IEEE-754 double precision value.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.write_all(&value.to_bits().to_le_bytes())
    }

    /// Write `value` followed by a zero byte.
    ///
    /// Strings with an embedded zero byte cannot be represented and are
    /// rejected before anything is written.
    pub fn write_string(&mut self, value: impl AsRef<[u8]>) -> Result<()> {
        let bytes = value.as_ref();
        if let Some(offset) = bytes.iter().position(|&b| b == 0) {
            return Err(BitioError::InteriorNul { offset });
        }
        self.write_all(bytes)?;
        self.write_all(&[0])
    }
}
