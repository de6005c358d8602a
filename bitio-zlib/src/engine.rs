//! zlib (RFC 1950) engines.
//!
//! Thin wrappers over `flate2`'s low-level [`flate2::Compress`] and
//! [`flate2::Decompress`] state machines, exposing them through the
//! [`Compressor`]/[`Decompressor`] traits the stream adapters drive.
//!
//! When the crate is built without the `flate2` feature both constructors
//! fail with [`BitioError::Unsupported`].

use bitio_core::{
    BitioError, CompressStatus, CompressionLevel, Compressor, DecompressStatus, Decompressor,
    FlushMode, Result,
};
use std::fmt;

#[cfg(feature = "flate2")]
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

#[cfg(not(feature = "flate2"))]
fn unsupported() -> BitioError {
    BitioError::unsupported("zlib compression (bitio-zlib built without the `flate2` feature)")
}

/// Streaming zlib compressor.
pub struct ZlibCompressor {
    #[cfg(feature = "flate2")]
    inner: Compress,
    level: CompressionLevel,
    finished: bool,
}

impl ZlibCompressor {
    /// Create a compressor producing a zlib stream at `level`.
    pub fn new(level: CompressionLevel) -> Result<Self> {
        #[cfg(feature = "flate2")]
        {
            Ok(Self {
                inner: Compress::new(Compression::new(u32::from(level.level())), true),
                level,
                finished: false,
            })
        }
        #[cfg(not(feature = "flate2"))]
        {
            let _ = level;
            Err(unsupported())
        }
    }

    /// The configured compression level.
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Total uncompressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        #[cfg(feature = "flate2")]
        {
            self.inner.total_in()
        }
        #[cfg(not(feature = "flate2"))]
        {
            0
        }
    }

    /// Total compressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        #[cfg(feature = "flate2")]
        {
            self.inner.total_out()
        }
        #[cfg(not(feature = "flate2"))]
        {
            0
        }
    }
}

impl fmt::Debug for ZlibCompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZlibCompressor")
            .field("level", &self.level)
            .field("total_in", &self.total_in())
            .field("total_out", &self.total_out())
            .field("finished", &self.finished)
            .finish()
    }
}

impl Compressor for ZlibCompressor {
    #[cfg(feature = "flate2")]
    fn compress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)> {
        if self.finished {
            return Ok((0, 0, CompressStatus::Done));
        }
        let flush = match flush {
            FlushMode::None => FlushCompress::None,
            FlushMode::Sync => FlushCompress::Sync,
            FlushMode::Finish => FlushCompress::Finish,
        };

        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();
        let status = self
            .inner
            .compress(input, output, flush)
            .map_err(|err| BitioError::compression("deflate", err.to_string()))?;
        let consumed = (self.inner.total_in() - before_in) as usize;
        let produced = (self.inner.total_out() - before_out) as usize;

        let status = match status {
            Status::StreamEnd => {
                self.finished = true;
                CompressStatus::Done
            }
            _ if produced == output.len() => CompressStatus::NeedsOutput,
            _ => CompressStatus::NeedsInput,
        };
        Ok((consumed, produced, status))
    }

    #[cfg(not(feature = "flate2"))]
    fn compress(
        &mut self,
        _input: &[u8],
        _output: &mut [u8],
        _flush: FlushMode,
    ) -> Result<(usize, usize, CompressStatus)> {
        Err(unsupported())
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Streaming zlib decompressor.
pub struct ZlibDecompressor {
    #[cfg(feature = "flate2")]
    inner: Decompress,
    finished: bool,
}

impl ZlibDecompressor {
    /// Create a decompressor expecting a zlib stream.
    pub fn new() -> Result<Self> {
        #[cfg(feature = "flate2")]
        {
            Ok(Self {
                inner: Decompress::new(true),
                finished: false,
            })
        }
        #[cfg(not(feature = "flate2"))]
        {
            Err(unsupported())
        }
    }

    /// Total compressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        #[cfg(feature = "flate2")]
        {
            self.inner.total_in()
        }
        #[cfg(not(feature = "flate2"))]
        {
            0
        }
    }

    /// Total decompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        #[cfg(feature = "flate2")]
        {
            self.inner.total_out()
        }
        #[cfg(not(feature = "flate2"))]
        {
            0
        }
    }
}

impl fmt::Debug for ZlibDecompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZlibDecompressor")
            .field("total_in", &self.total_in())
            .field("total_out", &self.total_out())
            .field("finished", &self.finished)
            .finish()
    }
}

impl Decompressor for ZlibDecompressor {
    #[cfg(feature = "flate2")]
    fn decompress(
        &mut self,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)> {
        if self.finished {
            return Ok((0, 0, DecompressStatus::Done));
        }

        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();
        let status = self
            .inner
            .decompress(input, output, FlushDecompress::None)
            .map_err(|err| BitioError::compression("inflate", err.to_string()))?;
        let consumed = (self.inner.total_in() - before_in) as usize;
        let produced = (self.inner.total_out() - before_out) as usize;

        let status = match status {
            Status::StreamEnd => {
                self.finished = true;
                DecompressStatus::Done
            }
            _ if produced == output.len() => DecompressStatus::NeedsOutput,
            _ => DecompressStatus::NeedsInput,
        };
        Ok((consumed, produced, status))
    }

    #[cfg(not(feature = "flate2"))]
    fn decompress(
        &mut self,
        _input: &[u8],
        _output: &mut [u8],
    ) -> Result<(usize, usize, DecompressStatus)> {
        Err(unsupported())
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
