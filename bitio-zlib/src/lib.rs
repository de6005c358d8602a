//! # bitio zlib
//!
//! zlib-compressed streams for `bitio-core`.
//!
//! [`inflate_reader`] wraps a nested [`Reader`] so that everything read
//! from it is decompressed; [`deflate_writer`] wraps a nested [`Writer`] so
//! that everything written to it is compressed. Both adapters borrow the
//! nested stream and never release or finish it.
//!
//! ## Example
//!
//! ```rust
//! use bitio_core::{Reader, Writer};
//!
//! let mut nested = Writer::growing(256);
//! {
//!     let mut writer = bitio_zlib::deflate_writer(&mut nested)?;
//!     writer.write_string("Hello, World!")?;
//!     writer.write_bits(0b101, 3)?;
//!     writer.finish()?;
//! }
//! let compressed = nested.take_buffer()?;
//!
//! let mut input = Reader::fixed(&compressed);
//! let mut reader = bitio_zlib::inflate_reader(&mut input)?;
//! assert_eq!(reader.read_string()?.to_str().unwrap(), "Hello, World!");
//! assert_eq!(reader.read_bits(3)?, 0b101);
//! # Ok::<(), bitio_core::BitioError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;

pub use engine::{ZlibCompressor, ZlibDecompressor};

use bitio_core::{
    ByteSink, ByteSource, CompressionLevel, DeflateSink, InflateSource, Reader, Result,
    StreamConfig, Writer,
};

/// A reader decompressing a zlib stream from a nested reader.
pub type ZlibReader<'a, S> = Reader<InflateSource<'a, S, ZlibDecompressor>>;

/// A writer compressing into a zlib stream on a nested writer.
pub type ZlibWriter<'a, S> = Writer<DeflateSink<'a, S, ZlibCompressor>>;

/// Whether this build carries a zlib engine.
pub const fn is_supported() -> bool {
    cfg!(feature = "flate2")
}

/// Decompressing reader over `input` with the default staging chunk.
pub fn inflate_reader<S: ByteSource>(input: &mut Reader<S>) -> Result<ZlibReader<'_, S>> {
    inflate_reader_with(input, StreamConfig::DEFAULT)
}

/// Decompressing reader over `input` with an explicit staging chunk.
pub fn inflate_reader_with<S: ByteSource>(
    input: &mut Reader<S>,
    config: StreamConfig,
) -> Result<ZlibReader<'_, S>> {
    let engine = ZlibDecompressor::new()?;
    Ok(Reader::new(InflateSource::with_config(input, engine, config)))
}

/// Compressing writer over `output` at [`CompressionLevel::BEST`].
pub fn deflate_writer<S: ByteSink>(output: &mut Writer<S>) -> Result<ZlibWriter<'_, S>> {
    deflate_writer_with(output, StreamConfig::DEFAULT)
}

/// Compressing writer over `output` with an explicit level and staging chunk.
pub fn deflate_writer_with<S: ByteSink>(
    output: &mut Writer<S>,
    config: StreamConfig,
) -> Result<ZlibWriter<'_, S>> {
    let engine = ZlibCompressor::new(config.level)?;
    Ok(Writer::new(DeflateSink::with_config(output, engine, config)))
}

/// Compress `data` into a complete zlib stream at [`CompressionLevel::BEST`].
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    compress_with_level(data, CompressionLevel::BEST)
}

/// Compress `data` into a complete zlib stream at `level`.
pub fn compress_with_level(data: &[u8], level: impl Into<CompressionLevel>) -> Result<Vec<u8>> {
    let mut nested = Writer::growing(data.len() / 2 + 64);
    {
        let mut writer = deflate_writer_with(&mut nested, StreamConfig::with_level(level))?;
        writer.write_all(data)?;
        writer.finish()?;
    }
    nested.take_buffer()
}

/// Decompress a complete zlib stream. Bytes after the stream end are ignored.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut input = Reader::fixed(data);
    let mut reader = inflate_reader(&mut input)?;
    let mut out = Writer::growing(data.len().saturating_mul(2).max(64));
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        out.write_all(&chunk[..n])?;
    }
    out.take_buffer()
}
