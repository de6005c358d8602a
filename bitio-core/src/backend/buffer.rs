//! In-memory backends.
//!
//! Fixed buffers borrow caller memory and are bounded by its length.
//! A growing buffer owns its allocation, extends it in configured steps and
//! can hand it over to the caller exactly once.

use crate::config::GrowthConfig;
use crate::error::{Result, fatal_misuse};
use crate::stream::{ByteSink, ByteSource, Reader, ReaderKind, Writer, WriterKind};
use std::io;

/// Reads from a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct FixedBufferSource<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> FixedBufferSource<'a> {
    /// Create a source over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Number of bytes not yet read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// The unread part of the buffer.
    pub fn remaining_slice(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}

impl ByteSource for FixedBufferSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let obtained = buf.len().min(self.remaining());
        buf[..obtained].copy_from_slice(&self.data[self.offset..self.offset + obtained]);
        self.offset += obtained;
        Ok(obtained)
    }

    fn kind(&self) -> ReaderKind {
        ReaderKind::Memory
    }
}

/// Writes into a borrowed byte slice, dropping whatever does not fit.
#[derive(Debug)]
pub struct FixedBufferSink<'a> {
    data: &'a mut [u8],
    offset: usize,
}

impl<'a> FixedBufferSink<'a> {
    /// Create a sink over `data`.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Number of bytes stored so far.
    pub fn written(&self) -> usize {
        self.offset
    }

    /// Space left in the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// The bytes stored so far.
    pub fn contents(&self) -> &[u8] {
        &self.data[..self.offset]
    }
}

impl ByteSink for FixedBufferSink<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let accepted = buf.len().min(self.remaining());
        self.data[self.offset..self.offset + accepted].copy_from_slice(&buf[..accepted]);
        self.offset += accepted;
        Ok(accepted)
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::Memory
    }
}

/// Owns a buffer that grows to fit every write.
#[derive(Debug)]
pub struct GrowingBufferSink {
    /// Allocation; its length is the current capacity. `None` once taken
    /// or finished.
    data: Option<Vec<u8>>,
    /// Bytes written.
    len: usize,
    config: GrowthConfig,
}

impl GrowingBufferSink {
    /// Create a sink with the default initial capacity and the given
    /// growth increment.
    pub fn new(increment: usize) -> Self {
        Self::with_config(GrowthConfig::with_increment(increment))
    }

    /// Create a sink with an explicit growth policy.
    pub fn with_config(config: GrowthConfig) -> Self {
        let config = GrowthConfig::new(config.initial_capacity, config.increment);
        Self {
            data: Some(vec![0; config.initial_capacity]),
            len: 0,
            config,
        }
    }

    /// Current capacity, or 0 once the buffer has been taken.
    pub fn capacity(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Number of bytes written.
    pub fn written(&self) -> usize {
        self.len
    }

    /// The bytes written so far, unless the buffer has been taken.
    pub fn contents(&self) -> Option<&[u8]> {
        self.data.as_deref().map(|data| &data[..self.len])
    }

    /// Whether the buffer has been handed over (or freed).
    pub fn is_taken(&self) -> bool {
        self.data.is_none()
    }

    /// Hand the written bytes over to the caller.
    ///
    /// Can succeed only once; every later write is a fatal misuse.
    pub fn take_buffer(&mut self) -> Result<Vec<u8>> {
        match self.data.take() {
            Some(mut data) => {
                data.truncate(self.len);
                Ok(data)
            }
            None => Err(fatal_misuse("buffer already given away")),
        }
    }
}

impl ByteSink for GrowingBufferSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let Some(data) = self.data.as_mut() else {
            return Err(fatal_misuse("write to a growing buffer whose data was already given away"));
        };

        let Some(required) = self.len.checked_add(buf.len()) else {
            return Err(io::Error::new(
                io::ErrorKind::OutOfMemory,
                "growing buffer length overflows usize",
            )
            .into());
        };
        if data.len() < required {
            let capacity = self.config.grown_capacity(data.len(), required);
            log::trace!("growing buffer {} -> {} bytes", data.len(), capacity);
            data.resize(capacity, 0);
        }
        data[self.len..required].copy_from_slice(buf);
        self.len = required;
        Ok(buf.len())
    }

    fn finish(&mut self) -> Result<()> {
        self.data = None;
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::GrowingMemory
    }
}

impl<'a> Reader<FixedBufferSource<'a>> {
    /// A reader over a borrowed byte slice.
    pub fn fixed(data: &'a [u8]) -> Self {
        Self::new(FixedBufferSource::new(data))
    }
}

impl<'a> Writer<FixedBufferSink<'a>> {
    /// A writer into a borrowed byte slice. Excess output is dropped.
    pub fn fixed(data: &'a mut [u8]) -> Self {
        Self::new(FixedBufferSink::new(data))
    }
}

impl Writer<GrowingBufferSink> {
    /// A writer into an owned buffer growing by `increment` bytes at a time.
    pub fn growing(increment: usize) -> Self {
        Self::new(GrowingBufferSink::new(increment))
    }

    /// A writer into an owned buffer with an explicit growth policy.
    pub fn growing_with(config: GrowthConfig) -> Self {
        Self::new(GrowingBufferSink::with_config(config))
    }

    /// Pad pending bits, then hand the written bytes over to the caller.
    ///
    /// After this, every write through this writer is a fatal misuse;
    /// [`Writer::finish`] only releases the wrapper.
    pub fn take_buffer(&mut self) -> Result<Vec<u8>> {
        if self.is_finished() {
            return Err(fatal_misuse("buffer of a finished writer requested"));
        }
        self.align_byte()?;
        self.sink.take_buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BitioError;

    #[test]
    fn test_fixed_reader_bounds() {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = Reader::fixed(&data);

        let mut buf = [0u8; 3];
        assert_eq!(reader.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);

        let mut buf = [0u8; 3];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(reader.position(), 5);

        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(reader.source().remaining(), 0);
    }

    #[test]
    fn test_fixed_reader_exact_boundary() {
        let data = [9u8; 4];
        let mut reader = Reader::fixed(&data);
        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf).unwrap(), 4);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_fixed_writer_truncates() {
        let mut buffer = [0u8; 4];
        {
            let mut writer = Writer::fixed(&mut buffer);
            assert_eq!(writer.write(&[1, 2, 3]).unwrap(), 3);
            assert_eq!(writer.write(&[4, 5, 6]).unwrap(), 1);
            assert_eq!(writer.write(&[7]).unwrap(), 0);
            assert_eq!(writer.position(), 4);
            assert_eq!(writer.sink().contents(), &[1, 2, 3, 4]);
            writer.finish().unwrap();
        }
        assert_eq!(buffer, [1, 2, 3, 4]);
    }

    #[test]
    fn test_growing_initial_capacity() {
        let writer = Writer::growing(16);
        assert_eq!(writer.sink().capacity(), 4096);
        assert_eq!(writer.kind(), WriterKind::GrowingMemory);
    }

    #[test]
    fn test_growing_expands_in_increments() {
        let mut writer = Writer::growing_with(GrowthConfig::new(8, 16));
        let payload: Vec<u8> = (0..100u8).collect();

        writer.write_all(&payload[..5]).unwrap();
        assert_eq!(writer.sink().capacity(), 8);

        writer.write_all(&payload[5..]).unwrap();
        assert_eq!(writer.sink().capacity(), 104);
        assert_eq!(writer.sink().written(), 100);

        let bytes = writer.take_buffer().unwrap();
        assert_eq!(bytes, payload);
    }

    #[test]
    fn test_growing_with_huge_increment() {
        let mut writer = Writer::growing(usize::MAX);
        let payload = vec![0xA5u8; 4097];
        writer.write_all(&payload).unwrap();
        assert_eq!(writer.sink().capacity(), 4097);
        writer.write_u8(1).unwrap();
        assert_eq!(writer.sink().capacity(), 4098);
        assert_eq!(writer.take_buffer().unwrap().len(), 4098);
    }

    #[test]
    fn test_growing_many_small_writes() {
        let mut writer = Writer::growing_with(GrowthConfig::new(0, 3));
        for i in 0..1000u32 {
            writer.write_u8(i as u8).unwrap();
        }
        let bytes = writer.take_buffer().unwrap();
        assert_eq!(bytes.len(), 1000);
        assert!(bytes.iter().enumerate().all(|(i, &b)| b == i as u8));
    }

    #[test]
    fn test_take_buffer_aa_pattern() {
        let mut writer = Writer::growing(16);
        for _ in 0..100 {
            writer.write_u8(0xAA).unwrap();
        }
        let bytes = writer.take_buffer().unwrap();
        assert!(bytes.len() >= 100);
        assert!(bytes[..100].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_write_after_take_is_fatal() {
        let mut writer = Writer::growing(16);
        writer.write_all(b"data").unwrap();
        let bytes = writer.take_buffer().unwrap();
        assert_eq!(bytes, b"data");
        assert!(writer.sink().is_taken());
        assert_eq!(writer.sink().contents(), None);

        let err = writer.write(b"more").unwrap_err();
        assert!(matches!(err, BitioError::Misuse { .. }));
        assert!(err.is_fatal());

        assert!(writer.take_buffer().unwrap_err().is_fatal());

        // finish still releases the wrapper
        writer.finish().unwrap();
        assert!(writer.is_finished());
    }

    #[test]
    fn test_take_buffer_flushes_pending_bits() {
        let mut writer = Writer::growing(16);
        writer.write_bits(0b1, 1).unwrap();
        assert_eq!(writer.take_buffer().unwrap(), vec![0x80]);
    }

    #[test]
    fn test_take_after_finish_is_fatal() {
        let mut writer = Writer::growing(16);
        writer.write_all(b"x").unwrap();
        writer.finish().unwrap();
        assert!(writer.take_buffer().unwrap_err().is_fatal());
    }
}
