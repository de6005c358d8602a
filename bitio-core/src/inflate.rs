//! Decompressing reader adapter.
//!
//! [`InflateSource`] pulls compressed bytes from a borrowed nested
//! [`Reader`] in chunks, runs them through a [`Decompressor`] and yields the
//! decompressed bytes. The nested reader is never released by the adapter.
//!
//! Once the engine reports the logical end of the stream it is dropped and
//! every further read returns 0. An engine failure is fatal: it is logged,
//! returned as [`BitioError::Compression`] and the adapter refuses all later
//! reads.

use crate::codec::{DecompressStatus, Decompressor};
use crate::config::StreamConfig;
use crate::error::{BitioError, Result, fatal_misuse};
use crate::stream::{ByteSource, Reader, ReaderKind};

/// Reads decompressed data from a nested reader.
#[derive(Debug)]
pub struct InflateSource<'a, S, D> {
    input: &'a mut Reader<S>,
    engine: Option<D>,
    /// Compressed bytes pulled from `input`; `staging[start..end]` is unread.
    staging: Vec<u8>,
    start: usize,
    end: usize,
    /// Nested read error held back until the bytes already produced have
    /// been returned.
    deferred: Option<BitioError>,
    ended: bool,
    poisoned: bool,
}

impl<'a, S: ByteSource, D: Decompressor> InflateSource<'a, S, D> {
    /// Create an adapter with the default staging chunk size.
    pub fn new(input: &'a mut Reader<S>, engine: D) -> Self {
        Self::with_config(input, engine, StreamConfig::DEFAULT)
    }

    /// Create an adapter with an explicit configuration.
    pub fn with_config(input: &'a mut Reader<S>, engine: D, config: StreamConfig) -> Self {
        Self {
            input,
            engine: Some(engine),
            staging: vec![0; config.chunk_size.max(1)],
            start: 0,
            end: 0,
            deferred: None,
            ended: false,
            poisoned: false,
        }
    }

    /// Whether the logical end of the compressed stream has been reached.
    pub fn is_finished(&self) -> bool {
        self.ended
    }

    /// Position of the nested reader.
    pub fn input_position(&self) -> u64 {
        self.input.position()
    }

    /// Move unread compressed bytes to the front and read more behind them.
    fn refill(&mut self) -> Result<usize> {
        if self.start > 0 {
            self.staging.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.end == self.staging.len() {
            return Ok(0);
        }
        let obtained = self.input.read(&mut self.staging[self.end..])?;
        self.end += obtained;
        Ok(obtained)
    }

    fn fail(&mut self, err: BitioError) -> BitioError {
        log::error!("inflate stream failed after {} input bytes: {err}", self.input.position());
        self.poisoned = true;
        self.engine = None;
        self.staging = Vec::new();
        self.start = 0;
        self.end = 0;
        err
    }
}

impl<S: ByteSource, D: Decompressor> ByteSource for InflateSource<'_, S, D> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.poisoned {
            return Err(fatal_misuse("read from an inflate stream after an engine failure"));
        }
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }
        let Some(mut engine) = self.engine.take() else {
            return Ok(0);
        };
        if buf.is_empty() {
            self.engine = Some(engine);
            return Ok(0);
        }

        let mut filled = 0;
        loop {
            let mut input_ended = false;
            if self.start == self.end {
                match self.refill() {
                    Ok(0) => input_ended = true,
                    Ok(_) => {}
                    Err(err) => {
                        self.engine = Some(engine);
                        if filled == 0 {
                            return Err(err);
                        }
                        self.deferred = Some(err);
                        return Ok(filled);
                    }
                }
            }

            let step = engine.decompress(&self.staging[self.start..self.end], &mut buf[filled..]);
            let (consumed, produced, status) = match step {
                Ok(step) => step,
                Err(err) => return Err(self.fail(err)),
            };
            self.start += consumed;
            filled += produced;

            if status == DecompressStatus::Done {
                log::debug!(
                    "inflate stream ended after {} input bytes",
                    self.input.position() - (self.end - self.start) as u64
                );
                self.ended = true;
                self.staging = Vec::new();
                self.start = 0;
                self.end = 0;
                return Ok(filled);
            }
            if filled == buf.len() {
                break;
            }
            if consumed == 0 && produced == 0 {
                if input_ended {
                    return Err(self.fail(BitioError::compression(
                        "inflate",
                        "compressed stream ended before its logical end",
                    )));
                }
                match self.refill() {
                    Ok(0) if self.end == self.staging.len() => {
                        return Err(self.fail(BitioError::compression(
                            "inflate",
                            "engine made no progress on a full staging buffer",
                        )));
                    }
                    Ok(0) => {
                        return Err(self.fail(BitioError::compression(
                            "inflate",
                            "compressed stream ended before its logical end",
                        )));
                    }
                    Ok(_) => {}
                    Err(err) => {
                        self.engine = Some(engine);
                        if filled == 0 {
                            return Err(err);
                        }
                        self.deferred = Some(err);
                        return Ok(filled);
                    }
                }
            }
        }

        self.engine = Some(engine);
        Ok(filled)
    }

    fn release(&mut self) {
        self.engine = None;
        self.staging = Vec::new();
        self.start = 0;
        self.end = 0;
    }

    fn kind(&self) -> ReaderKind {
        ReaderKind::Inflate
    }
}

impl<'a, S: ByteSource, D: Decompressor> Reader<InflateSource<'a, S, D>> {
    /// A reader decompressing the output of `input` with `engine`.
    pub fn inflate(input: &'a mut Reader<S>, engine: D) -> Self {
        Self::new(InflateSource::new(input, engine))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::stream::Writer;

    /// Stored-block test codec: each block is a length byte followed by that
    /// many literal bytes; a zero length ends the stream.
    #[derive(Debug, Default)]
    pub(crate) struct BlockDecoder {
        remaining_in_block: usize,
        finished: bool,
    }

    impl Decompressor for BlockDecoder {
        fn decompress(
            &mut self,
            input: &[u8],
            output: &mut [u8],
        ) -> Result<(usize, usize, DecompressStatus)> {
            let mut consumed = 0;
            let mut produced = 0;
            while !self.finished {
                if self.remaining_in_block == 0 {
                    let Some(&len) = input.get(consumed) else {
                        break;
                    };
                    consumed += 1;
                    if len == 0xFF {
                        return Err(BitioError::compression("inflate", "invalid block length"));
                    }
                    if len == 0 {
                        self.finished = true;
                        break;
                    }
                    self.remaining_in_block = len as usize;
                }
                let n = self
                    .remaining_in_block
                    .min(input.len() - consumed)
                    .min(output.len() - produced);
                if n == 0 {
                    break;
                }
                output[produced..produced + n].copy_from_slice(&input[consumed..consumed + n]);
                consumed += n;
                produced += n;
                self.remaining_in_block -= n;
            }

            let status = if self.finished {
                DecompressStatus::Done
            } else if produced == output.len() {
                DecompressStatus::NeedsOutput
            } else {
                DecompressStatus::NeedsInput
            };
            Ok((consumed, produced, status))
        }

        fn is_finished(&self) -> bool {
            self.finished
        }
    }

    pub(crate) fn encode_blocks(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in data.chunks(200) {
            out.push(chunk.len() as u8);
            out.extend_from_slice(chunk);
        }
        out.push(0);
        out
    }

    #[test]
    fn test_inflate_small_chunks() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 7) as u8).collect();
        let encoded = encode_blocks(&data);
        let mut trailing = encoded.clone();
        trailing.extend_from_slice(b"tail");

        let mut nested = Reader::fixed(&trailing);
        {
            let source = InflateSource::with_config(
                &mut nested,
                BlockDecoder::default(),
                StreamConfig::with_chunk_size(7),
            );
            let mut reader = Reader::new(source);
            let mut out = Vec::new();
            let mut buf = [0u8; 33];
            loop {
                let n = reader.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                out.extend_from_slice(&buf[..n]);
            }
            assert_eq!(out, data);
            assert_eq!(reader.position(), data.len() as u64);
            assert!(reader.source().is_finished());
            assert_eq!(reader.read(&mut buf).unwrap(), 0);
        }
        // The nested reader stays usable; it advanced by whole chunks.
        assert!(nested.position() >= encoded.len() as u64);
    }

    #[test]
    fn test_inflate_primitives() {
        let mut plain = Writer::growing(64);
        plain.write_u32(0xCAFEBABE).unwrap();
        plain.write_string("inner").unwrap();
        plain.write_bits(0b101, 3).unwrap();
        let plain = plain.take_buffer().unwrap();
        let encoded = encode_blocks(&plain);

        let mut nested = Reader::fixed(&encoded);
        let mut reader = Reader::inflate(&mut nested, BlockDecoder::default());
        assert_eq!(reader.kind(), ReaderKind::Inflate);
        assert_eq!(reader.read_u32().unwrap(), 0xCAFEBABE);
        assert_eq!(reader.read_string().unwrap().as_bytes(), b"inner");
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
    }

    #[test]
    fn test_truncated_stream_is_fatal() {
        let encoded = encode_blocks(b"hello world");
        let truncated = &encoded[..encoded.len() - 3];

        let mut nested = Reader::fixed(truncated);
        let mut reader = Reader::inflate(&mut nested, BlockDecoder::default());
        let mut buf = [0u8; 64];
        let err = reader.read(&mut buf).unwrap_err();
        assert!(matches!(err, BitioError::Compression { .. }));
        assert!(err.is_fatal());

        // Poisoned from now on.
        assert!(reader.read(&mut buf).unwrap_err().is_fatal());
    }

    #[test]
    fn test_engine_error_is_fatal() {
        let corrupt = [3u8, b'a', b'b', b'c', 0xFF, 1, 2];
        let mut nested = Reader::fixed(&corrupt);
        let mut reader = Reader::inflate(&mut nested, BlockDecoder::default());
        let err = reader.read(&mut [0u8; 16]).unwrap_err();
        assert!(matches!(err, BitioError::Compression { stage: "inflate", .. }));
        assert!(!reader.source().is_finished());
    }

    #[test]
    fn test_release_before_end() {
        let encoded = encode_blocks(&[1u8; 500]);
        let mut nested = Reader::fixed(&encoded);
        let mut reader = Reader::inflate(&mut nested, BlockDecoder::default());
        assert_eq!(reader.read_u8().unwrap(), 1);
        reader.release();
        reader.release();
        assert!(!reader.source().is_finished());
        assert!(reader.read(&mut [0u8; 4]).unwrap_err().is_fatal());
    }

    /// Copies whole four-byte records and leaves a partial record unconsumed.
    #[derive(Debug, Default)]
    struct RecordDecoder;

    impl Decompressor for RecordDecoder {
        fn decompress(
            &mut self,
            input: &[u8],
            output: &mut [u8],
        ) -> Result<(usize, usize, DecompressStatus)> {
            let n = input.len().min(output.len()) / 4 * 4;
            output[..n].copy_from_slice(&input[..n]);
            let status = if n == output.len() {
                DecompressStatus::NeedsOutput
            } else {
                DecompressStatus::NeedsInput
            };
            Ok((n, n, status))
        }

        fn is_finished(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_partial_record_at_end_of_input_is_fatal() {
        let mut nested = Reader::fixed(&[1u8, 2]);
        let mut reader = Reader::inflate(&mut nested, RecordDecoder);
        let err = reader.read(&mut [0u8; 16]).unwrap_err();
        assert!(matches!(err, BitioError::Compression { stage: "inflate", .. }));
        assert!(err.is_fatal());
        assert!(!reader.source().is_finished());
        assert!(reader.read(&mut [0u8; 16]).unwrap_err().is_fatal());
    }

    #[test]
    fn test_partial_record_completed_by_next_chunk() {
        let data = *b"abcdefgh";
        let mut nested = Reader::fixed(&data);
        let source =
            InflateSource::with_config(&mut nested, RecordDecoder, StreamConfig::with_chunk_size(6));
        let mut reader = Reader::new(source);
        let mut out = [0u8; 8];
        reader.read_exact(&mut out).unwrap();
        assert_eq!(out, data);
    }
}
