//! The Reader/Writer capability abstraction.
//!
//! A backend implements raw byte transfer only: [`ByteSource`] for input,
//! [`ByteSink`] for output. [`Reader`] and [`Writer`] wrap a backend and add
//! the state every stream shares regardless of medium: a one-byte pending
//! bit buffer, a bit cursor and a byte position counter. The bit codec
//! ([`crate::bits`]) and primitive codec ([`crate::primitive`]) are
//! implemented on top of these wrappers.
//!
//! # Example
//!
//! ```
//! use bitio_core::{Reader, Writer};
//!
//! let mut buffer = [0u8; 4];
//! {
//!     let mut writer = Writer::fixed(&mut buffer);
//!     writer.write_u16(0xBEEF).unwrap();
//!     writer.finish().unwrap();
//! }
//! assert_eq!(&buffer[..2], &[0xEF, 0xBE]);
//!
//! let mut reader = Reader::fixed(&buffer);
//! assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
//! assert_eq!(reader.position(), 2);
//! ```

use crate::error::{BitioError, Result, fatal_misuse};
use std::io;

/// Which backend a [`Reader`] is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderKind {
    /// Infinite zero-filled stream.
    Discard,
    /// OS file or other `io::Read` handle.
    File,
    /// Fixed in-memory buffer.
    Memory,
    /// zlib-decompressing adapter over another reader.
    Inflate,
}

/// Which backend a [`Writer`] is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterKind {
    /// Counts and drops everything.
    Discard,
    /// OS file or other `io::Write` handle.
    File,
    /// Fixed in-memory buffer.
    Memory,
    /// Self-growing in-memory buffer.
    GrowingMemory,
    /// zlib-compressing adapter over another writer.
    Deflate,
}

/// Raw byte input of a [`Reader`].
pub trait ByteSource {
    /// Read up to `buf.len()` bytes into `buf`.
    ///
    /// Returns the number of bytes obtained; `0` means end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Free backend state. Called at most once by the owning [`Reader`].
    fn release(&mut self) {}

    /// The backend variant.
    fn kind(&self) -> ReaderKind;
}

/// Raw byte output of a [`Writer`].
pub trait ByteSink {
    /// Store up to `buf.len()` bytes from `buf`.
    ///
    /// Returns the number of bytes actually stored.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Push buffered data towards the medium without ending the stream.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Flush everything and free backend state. Called at most once by the
    /// owning [`Writer`].
    fn finish(&mut self) -> Result<()>;

    /// The backend variant.
    fn kind(&self) -> WriterKind;
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn kind(&self) -> ReaderKind {
        (**self).kind()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn kind(&self) -> ReaderKind {
        (**self).kind()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for Box<S> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }

    fn kind(&self) -> WriterKind {
        (**self).kind()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }

    fn kind(&self) -> WriterKind {
        (**self).kind()
    }
}

/// A byte and bit reader over a [`ByteSource`] backend.
#[derive(Debug)]
pub struct Reader<S> {
    /// Backend.
    pub(crate) source: S,
    /// Byte currently being consumed bit by bit.
    pub(crate) pending: u8,
    /// Bits of `pending` already consumed; 8 means nothing is buffered.
    pub(crate) bit_cursor: u8,
    /// Bytes obtained from the backend so far.
    pub(crate) position: u64,
    released: bool,
}

impl<S: ByteSource> Reader<S> {
    /// Create a reader over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            pending: 0,
            bit_cursor: 8,
            position: 0,
            released: false,
        }
    }

    /// Read up to `buf.len()` bytes. `Ok(0)` signals end of stream.
    ///
    /// Bytes are taken from the backend directly; bits buffered by
    /// [`Reader::read_bit`] are not involved.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.released {
            return Err(fatal_misuse("read from a released reader"));
        }
        let obtained = self.source.read(buf)?;
        debug_assert!(obtained <= buf.len());
        self.position += obtained as u64;
        Ok(obtained)
    }

    /// Fill `buf` completely, failing with `UnexpectedEof` if the stream
    /// ends first.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => return Err(BitioError::unexpected_eof(buf.len() - filled)),
                n => filled += n,
            }
        }
        Ok(())
    }

    /// Free the backend state. Further calls are no-ops.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.source.release();
        }
    }

    /// Whether [`Reader::release`] has been called.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Number of bytes obtained from the backend so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bits consumed from the current byte (8 when none are buffered).
    pub fn bit_cursor(&self) -> u8 {
        self.bit_cursor
    }

    /// The backend variant.
    pub fn kind(&self) -> ReaderKind {
        self.source.kind()
    }

    /// Get a reference to the backend.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the backend.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: ByteSource> io::Read for Reader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Reader::read(self, buf).map_err(BitioError::into_io)
    }
}

/// A byte and bit writer over a [`ByteSink`] backend.
///
/// Dropping a writer that was not finished performs a best-effort
/// [`Writer::finish`]; call it explicitly to observe errors.
#[derive(Debug)]
pub struct Writer<S: ByteSink> {
    /// Backend.
    pub(crate) sink: S,
    /// Byte currently being assembled bit by bit.
    pub(crate) pending: u8,
    /// Bits of `pending` already produced; 8 means the byte is full.
    pub(crate) bit_cursor: u8,
    /// Bytes accepted by the backend so far.
    pub(crate) position: u64,
    finished: bool,
}

impl<S: ByteSink> Writer<S> {
    /// Create a writer over `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            pending: 0,
            bit_cursor: 0,
            position: 0,
            finished: false,
        }
    }

    /// Write up to `buf.len()` bytes, returning how many the backend stored.
    ///
    /// Bytes go to the backend directly; bits buffered by
    /// [`Writer::write_bit`] are not flushed first.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.finished {
            return Err(fatal_misuse("write to a finished writer"));
        }
        let accepted = self.sink.write(buf)?;
        debug_assert!(accepted <= buf.len());
        self.position += accepted as u64;
        Ok(accepted)
    }

    /// Write all of `buf` in one backend call, failing with `ShortWrite` if
    /// the backend stores less.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let accepted = self.write(buf)?;
        if accepted < buf.len() {
            return Err(BitioError::short_write(buf.len(), accepted));
        }
        Ok(())
    }

    /// Flush backend buffers without ending the stream.
    pub fn flush(&mut self) -> Result<()> {
        if self.finished {
            return Err(fatal_misuse("flush of a finished writer"));
        }
        self.sink.flush()
    }

    /// Pad any pending bits to a full byte, flush and release the backend.
    ///
    /// Only the first call has an effect.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.align_byte()?;
        self.finished = true;
        self.sink.finish()
    }

    /// Whether [`Writer::finish`] has run.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of bytes accepted by the backend so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bits produced in the current byte (8 when it is full).
    pub fn bit_cursor(&self) -> u8 {
        self.bit_cursor
    }

    /// The backend variant.
    pub fn kind(&self) -> WriterKind {
        self.sink.kind()
    }

    /// Get a reference to the backend.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the backend.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: ByteSink> Drop for Writer<S> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = self.finish() {
                log::warn!("best-effort finish of dropped {:?} writer failed: {err}", self.kind());
            }
        }
    }
}

impl<S: ByteSink> io::Write for Writer<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Writer::write(self, buf).map_err(BitioError::into_io)
    }

    fn flush(&mut self) -> io::Result<()> {
        Writer::flush(self).map_err(BitioError::into_io)
    }
}
