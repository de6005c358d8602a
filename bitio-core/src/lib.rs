//! # bitio core
//!
//! Uniform stream I/O for binary formats: one [`Reader`]/[`Writer`] pair
//! over interchangeable byte backends, with bit-level and primitive codecs
//! layered on top.
//!
//! - [`stream`]: the [`Reader`]/[`Writer`] wrappers and the
//!   [`ByteSource`]/[`ByteSink`] backend traits
//! - [`backend`]: discard, file and in-memory backends
//! - [`bits`]: MSB-first bit I/O
//! - [`primitive`]: little-endian integers, floats and null-terminated strings
//! - [`inflate`] / [`deflate`]: adapters running a nested stream through a
//!   [`Decompressor`] or [`Compressor`]
//! - [`codec`]: the streaming compression engine traits
//! - [`config`]: buffer growth and staging parameters
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Codecs                                                  │
//! │     bits (MSB-first), primitives (LE, C strings)       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Reader / Writer                                         │
//! │     pending bit byte, bit cursor, position             │
//! ├─────────────────────────────────────────────────────────┤
//! │ Backends                                                │
//! │     Discard, File, Memory, GrowingMemory,              │
//! │     Inflate/Deflate over a nested Reader/Writer        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The zlib engines live in the `bitio-zlib` crate; this crate only knows
//! the [`Compressor`]/[`Decompressor`] traits.
//!
//! ## Example
//!
//! ```rust
//! use bitio_core::{Reader, Writer};
//!
//! let mut writer = Writer::growing(64);
//! writer.write_bits(0b101, 3).unwrap();
//! writer.align_byte().unwrap();
//! writer.write_u32(42).unwrap();
//! writer.write_string("name").unwrap();
//! let bytes = writer.take_buffer().unwrap();
//! assert_eq!(bytes[0], 0xA0);
//!
//! let mut reader = Reader::fixed(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! reader.align_byte();
//! assert_eq!(reader.read_u32().unwrap(), 42);
//! assert_eq!(reader.read_string().unwrap().to_str().unwrap(), "name");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod bits;
pub mod codec;
pub mod config;
pub mod deflate;
pub mod error;
pub mod inflate;
#[cfg(feature = "mmap")]
pub mod mmap;
pub mod primitive;
pub mod stream;

// Re-exports for convenience
pub use backend::{
    DiscardSink, DiscardSource, FileSink, FileSource, FixedBufferSink, FixedBufferSource,
    GrowingBufferSink,
};
pub use codec::{
    CompressStatus, CompressionLevel, Compressor, DecompressStatus, Decompressor, FlushMode,
};
pub use config::{GrowthConfig, StreamConfig};
pub use deflate::DeflateSink;
pub use error::{BitioError, Result};
pub use inflate::InflateSource;
#[cfg(feature = "mmap")]
pub use mmap::MappedFile;
pub use stream::{ByteSink, ByteSource, Reader, ReaderKind, Writer, WriterKind};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::codec::{CompressionLevel, Compressor, Decompressor};
    pub use crate::config::{GrowthConfig, StreamConfig};
    pub use crate::error::{BitioError, Result};
    pub use crate::stream::{ByteSink, ByteSource, Reader, ReaderKind, Writer, WriterKind};
}
