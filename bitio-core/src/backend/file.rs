//! Pass-through backends over OS files and other `std::io` handles.
//!
//! Ownership of the handle follows the type parameter: a `File` moved into
//! the backend is closed when the stream is released or finished, while a
//! `&mut File` is left open for the caller.

use crate::error::{Result, fatal_misuse};
use crate::stream::{ByteSink, ByteSource, Reader, ReaderKind, Writer, WriterKind};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Reads from an `io::Read` handle.
#[derive(Debug)]
pub struct FileSource<R> {
    inner: Option<R>,
}

impl<R: Read> FileSource<R> {
    /// Wrap a handle.
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }

    /// Get a reference to the handle, if not yet released.
    pub fn get_ref(&self) -> Option<&R> {
        self.inner.as_ref()
    }
}

impl FileSource<File> {
    /// Open `path` for reading. The file is closed on release.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> ByteSource for FileSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.inner.as_mut() {
            Some(inner) => Ok(inner.read(buf)?),
            None => Err(fatal_misuse("read from a released file source")),
        }
    }

    fn release(&mut self) {
        self.inner = None;
    }

    fn kind(&self) -> ReaderKind {
        ReaderKind::File
    }
}

/// Writes to an `io::Write` handle.
#[derive(Debug)]
pub struct FileSink<W> {
    inner: Option<W>,
}

impl<W: Write> FileSink<W> {
    /// Wrap a handle.
    pub fn new(inner: W) -> Self {
        Self { inner: Some(inner) }
    }

    /// Get a reference to the handle, if not yet finished.
    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }
}

impl FileSink<File> {
    /// Create (or truncate) `path` for writing. The file is closed on finish.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> ByteSink for FileSink<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        match self.inner.as_mut() {
            Some(inner) => Ok(inner.write(buf)?),
            None => Err(fatal_misuse("write to a finished file sink")),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(inner) = self.inner.as_mut() {
            inner.flush()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(mut inner) = self.inner.take() {
            inner.flush()?;
        }
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::File
    }
}

impl<R: Read> Reader<FileSource<R>> {
    /// A reader over a file or other `io::Read` handle.
    pub fn file(inner: R) -> Self {
        Self::new(FileSource::new(inner))
    }
}

impl<W: Write> Writer<FileSink<W>> {
    /// A writer over a file or other `io::Write` handle.
    pub fn file(inner: W) -> Self {
        Self::new(FileSink::new(inner))
    }
}
