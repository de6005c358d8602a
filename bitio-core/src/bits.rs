//! Bit-level I/O on top of [`Reader`] and [`Writer`].
//!
//! # Bit Ordering
//!
//! Bits are packed MSB-first (Most Significant Bit first) within each
//! byte: the first bit written lands in bit 7, the eighth in bit 0. Reading
//! consumes bits in the same order, so `write_bits(v, n)` followed by
//! `read_bits(n)` returns `v`.
//!
//! A writer holds at most one partial byte. It is handed to the backend
//! when the next bit needs room, or on [`Writer::align_byte`]. Alignment
//! pads with zero bits.
//!
//! # Example
//!
//! ```
//! use bitio_core::{Reader, Writer};
//!
//! let mut buffer = [0u8; 2];
//! {
//!     let mut writer = Writer::fixed(&mut buffer);
//!     writer.write_bits(0x3FF, 10).unwrap();
//!     writer.align_byte().unwrap();
//! }
//! assert_eq!(buffer, [0xFF, 0xC0]);
//!
//! let mut reader = Reader::fixed(&buffer);
//! assert_eq!(reader.read_bits(10).unwrap(), 0x3FF);
//! ```

use crate::error::{BitioError, Result};
use crate::stream::{ByteSink, ByteSource, Reader, Writer};

/// Widest value handled by a single `read_bits`/`write_bits` call.
pub const MAX_BITS: u8 = 32;

impl<S: ByteSource> Reader<S> {
    /// Read a single bit.
    ///
    /// Fetches a new byte from the backend when the current one is used up.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_cursor == 8 {
            let mut byte = [0u8; 1];
            if self.read(&mut byte)? == 0 {
                return Err(BitioError::unexpected_eof(1));
            }
            self.pending = byte[0];
            self.bit_cursor = 0;
        }
        let bit = (self.pending >> (7 - self.bit_cursor)) & 1;
        self.bit_cursor += 1;
        Ok(bit != 0)
    }

    /// Read up to 32 bits, most significant first.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of bits to read (0-32)
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        if count > MAX_BITS {
            return Err(BitioError::InvalidBitWidth(count));
        }

        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }

    /// Drop the partially consumed byte so the next bit read fetches a
    /// fresh one.
    ///
    /// This does not skip anything in the backend: the byte stream must
    /// already be positioned at a boundary, which holds when the data was
    /// produced with [`Writer::align_byte`].
    pub fn align_byte(&mut self) {
        self.pending = 0;
        self.bit_cursor = 8;
    }
}

impl<S: ByteSink> Writer<S> {
    /// Hand the pending byte to the backend and start a new one.
    fn flush_pending(&mut self) -> Result<()> {
        let byte = [self.pending];
        self.write_all(&byte)?;
        self.pending = 0;
        self.bit_cursor = 0;
        Ok(())
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if self.bit_cursor == 8 {
            self.flush_pending()?;
        }
        if bit {
            self.pending |= 1 << (7 - self.bit_cursor);
        }
        self.bit_cursor += 1;
        Ok(())
    }

    /// Write the low `count` bits of `value`, most significant first.
    ///
    /// # Arguments
    ///
    /// * `value` - The bits to write; bits above `count` are ignored
    /// * `count` - Number of bits to write (0-32)
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        if count > MAX_BITS {
            return Err(BitioError::InvalidBitWidth(count));
        }

        for t in 0..count {
            self.write_bit((value >> (count - t - 1)) & 1 != 0)?;
        }
        Ok(())
    }

    /// Pad the pending byte with zero bits and hand it to the backend.
    ///
    /// Does nothing when no bits are pending.
    pub fn align_byte(&mut self) -> Result<()> {
        if self.bit_cursor > 0 {
            self.flush_pending()?;
        }
        Ok(())
    }
}
