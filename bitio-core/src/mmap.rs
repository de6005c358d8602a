//! Memory-mapped file input.
//!
//! [`MappedFile`] maps a file read-only and exposes it as a fixed memory
//! buffer, so a [`Reader`] over it behaves exactly like [`Reader::fixed`]
//! without copying the file into memory first.
//!
//! # Example
//!
//! ```no_run
//! use bitio_core::mmap::MappedFile;
//!
//! let mapped = MappedFile::open("frames.bin")?;
//! let mut reader = mapped.reader();
//! let magic = reader.read_u32()?;
//! # Ok::<(), bitio_core::BitioError>(())
//! ```
//!
//! # Safety
//!
//! The mapping is read-only, but the file must not be truncated or modified
//! by another process while it is mapped.

use crate::backend::FixedBufferSource;
use crate::error::Result;
use crate::stream::Reader;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// A read-only memory mapping of a whole file.
#[derive(Debug)]
pub struct MappedFile {
    mmap: Mmap,
}

impl MappedFile {
    /// Open and map the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BitioError::Io`] if the file cannot be opened or
    /// mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_file(&file)
    }

    /// Map an already open file. The handle may be closed afterwards.
    pub fn from_file(file: &File) -> Result<Self> {
        // SAFETY: read-only mapping; the caller must not modify the file
        // while it is mapped.
        let mmap = unsafe { Mmap::map(file)? };
        log::trace!("mapped {} bytes", mmap.len());
        Ok(Self { mmap })
    }

    /// Size of the mapping in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Whether the mapped file is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// The mapped bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    /// A reader over the mapped bytes.
    pub fn reader(&self) -> Reader<FixedBufferSource<'_>> {
        Reader::fixed(self.as_slice())
    }
}

impl AsRef<[u8]> for MappedFile {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BitioError;
    use crate::stream::{ReaderKind, Writer};
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bitio_mmap_test_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_mapped_reader() {
        let path = temp_path("reader");
        {
            let mut writer = Writer::file(File::create(&path).unwrap());
            writer.write_u16(0x1234).unwrap();
            writer.write_string("mapped").unwrap();
            writer.write_bits(0b1011, 4).unwrap();
            writer.finish().unwrap();
        }

        let mapped = MappedFile::open(&path).unwrap();
        assert_eq!(mapped.len(), 10);
        assert!(!mapped.is_empty());

        let mut reader = mapped.reader();
        assert_eq!(reader.kind(), ReaderKind::Memory);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_string().unwrap().as_bytes(), b"mapped");
        assert_eq!(reader.read_bits(4).unwrap(), 0b1011);
        assert_eq!(reader.read(&mut [0u8; 4]).unwrap(), 0);

        drop(reader);
        drop(mapped);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_file() {
        let path = temp_path("empty");
        File::create(&path).unwrap();

        let mapped = MappedFile::open(&path).unwrap();
        assert!(mapped.is_empty());
        assert!(matches!(
            mapped.reader().read_u8(),
            Err(BitioError::UnexpectedEof { .. })
        ));

        drop(mapped);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            MappedFile::open(temp_path("missing")),
            Err(BitioError::Io(_))
        ));
    }
}
