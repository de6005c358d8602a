//! Streaming compression engine traits.
//!
//! The inflate and deflate adapters in [`crate::inflate`] and
//! [`crate::deflate`] are generic over these traits so that the engine
//! (zlib, or a test double) is pluggable.

use crate::error::Result;

/// Status of a streaming decompression step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressStatus {
    /// More input is needed to continue decompression.
    NeedsInput,
    /// More output buffer space is needed.
    NeedsOutput,
    /// The logical end of the compressed stream was reached.
    Done,
}

/// Status of a streaming compression step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressStatus {
    /// More input data can be accepted.
    NeedsInput,
    /// More output buffer space is needed.
    NeedsOutput,
    /// Compression is complete.
    Done,
}

/// Flush mode for compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushMode {
    /// No flush - buffer data for best compression.
    #[default]
    None,
    /// Sync flush - emit all pending output.
    Sync,
    /// Finish - complete the stream.
    Finish,
}

/// A streaming decompressor.
pub trait Decompressor {
    /// Decompress data from `input` into `output`.
    ///
    /// # Returns
    ///
    /// A tuple of (bytes consumed from input, bytes written to output, status).
    /// An error from this method is fatal for the stream.
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)>;

    /// Check if the logical end of the stream has been reached.
    fn is_finished(&self) -> bool;
}

/// A streaming compressor.
pub trait Compressor {
    /// Compress data from `input` into `output`.
    ///
    /// # Returns
    ///
    /// A tuple of (bytes consumed from input, bytes written to output, status).
    /// An error from this method is fatal for the stream.
    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)>;

    /// Check if the compressor has emitted the end of the stream.
    fn is_finished(&self) -> bool;
}

impl<D: Decompressor + ?Sized> Decompressor for Box<D> {
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)> {
        (**self).decompress(input, output)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

impl<C: Compressor + ?Sized> Compressor for Box<C> {
    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)> {
        (**self).compress(input, output, flush)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

/// Compression level for engines that support it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// No compression (store only).
    pub const NONE: Self = Self(0);
    /// Fastest compression.
    pub const FAST: Self = Self(1);
    /// Default compression (balanced).
    pub const DEFAULT: Self = Self(6);
    /// Best compression (slowest).
    pub const BEST: Self = Self(9);

    /// Create a custom compression level (0-9).
    pub fn new(level: u8) -> Self {
        Self(level.min(9))
    }

    /// Get the level value.
    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::BEST
    }
}

impl From<u8> for CompressionLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}
