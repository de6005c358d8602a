//! Backends that produce zeros and swallow output.

use crate::error::Result;
use crate::stream::{ByteSink, ByteSource, Reader, ReaderKind, Writer, WriterKind};

/// An endless stream of zero bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSource;

impl ByteSource for DiscardSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        buf.fill(0);
        Ok(buf.len())
    }

    fn kind(&self) -> ReaderKind {
        ReaderKind::Discard
    }
}

/// Accepts every byte and keeps none of them.
#[derive(Debug, Clone, Default)]
pub struct DiscardSink {
    discarded: u64,
}

impl DiscardSink {
    /// Create a new discarding sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of bytes accepted.
    pub fn bytes_discarded(&self) -> u64 {
        self.discarded
    }
}

impl ByteSink for DiscardSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.discarded += buf.len() as u64;
        Ok(buf.len())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::Discard
    }
}

impl Reader<DiscardSource> {
    /// A reader that never ends and only yields zeros.
    pub fn discard() -> Self {
        Self::new(DiscardSource)
    }
}

impl Writer<DiscardSink> {
    /// A writer that counts its input and drops it.
    pub fn discard() -> Self {
        Self::new(DiscardSink::new())
    }
}
