//! Compressing writer adapter.
//!
//! [`DeflateSink`] runs everything written to it through a [`Compressor`]
//! and pushes the compressed output into a borrowed nested [`Writer`]
//! whenever its staging buffer fills. Finishing the adapter flushes the
//! compressor to the end of the stream but leaves the nested writer open:
//! finishing that one is the caller's job.
//!
//! Any failure, including the nested writer refusing compressed output,
//! poisons the adapter: the engine has already consumed the input, so the
//! stream cannot be resumed.

use crate::codec::{CompressStatus, Compressor, FlushMode};
use crate::config::StreamConfig;
use crate::error::{BitioError, Result, fatal_misuse};
use crate::stream::{ByteSink, Writer, WriterKind};

/// Writes compressed data to a nested writer.
#[derive(Debug)]
pub struct DeflateSink<'a, S: ByteSink, C> {
    output: &'a mut Writer<S>,
    engine: Option<C>,
    /// Compressed bytes not yet handed to `output`: `staging[..filled]`.
    staging: Vec<u8>,
    filled: usize,
    poisoned: bool,
}

impl<'a, S: ByteSink, C: Compressor> DeflateSink<'a, S, C> {
    /// Create an adapter with the default staging chunk size.
    pub fn new(output: &'a mut Writer<S>, engine: C) -> Self {
        Self::with_config(output, engine, StreamConfig::DEFAULT)
    }

    /// Create an adapter with an explicit configuration.
    ///
    /// Only `chunk_size` is used here; the level is applied when the engine
    /// is constructed.
    pub fn with_config(output: &'a mut Writer<S>, engine: C, config: StreamConfig) -> Self {
        Self {
            output,
            engine: Some(engine),
            staging: vec![0; config.chunk_size.max(1)],
            filled: 0,
            poisoned: false,
        }
    }

    /// Position of the nested writer.
    pub fn output_position(&self) -> u64 {
        self.output.position()
    }

    /// Hand the staged compressed bytes to the nested writer.
    fn drain(&mut self) -> Result<()> {
        if self.filled == 0 {
            return Ok(());
        }
        match self.output.write_all(&self.staging[..self.filled]) {
            Ok(()) => {
                self.filled = 0;
                Ok(())
            }
            Err(err) if err.is_fatal() => Err(self.fail(err)),
            Err(err) => Err(self.fail(BitioError::compression(
                "deflate",
                format!("nested writer rejected compressed output: {err}"),
            ))),
        }
    }

    fn sync_flush(&mut self, engine: &mut C) -> Result<()> {
        self.flush_engine(engine, FlushMode::Sync)?;
        self.drain()?;
        self.output.flush()
    }

    fn fail(&mut self, err: BitioError) -> BitioError {
        log::error!("deflate stream failed after {} output bytes: {err}", self.output.position());
        self.poisoned = true;
        self.engine = None;
        self.staging = Vec::new();
        self.filled = 0;
        err
    }

    /// Run the engine with `flush` and no new input until it stops producing.
    fn flush_engine(&mut self, engine: &mut C, flush: FlushMode) -> Result<()> {
        loop {
            let step = engine.compress(&[], &mut self.staging[self.filled..], flush);
            let (_, produced, status) = match step {
                Ok(step) => step,
                Err(err) => return Err(self.fail(err)),
            };
            self.filled += produced;

            if status == CompressStatus::Done {
                return Ok(());
            }
            if self.filled == self.staging.len() {
                self.drain()?;
            } else if flush != FlushMode::Finish || produced == 0 {
                if flush == FlushMode::Finish {
                    return Err(self.fail(BitioError::compression(
                        "deflate",
                        "engine made no progress while finishing",
                    )));
                }
                return Ok(());
            }
        }
    }
}

impl<S: ByteSink, C: Compressor> ByteSink for DeflateSink<'_, S, C> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.poisoned {
            return Err(fatal_misuse("write to a deflate stream after an engine failure"));
        }
        let Some(mut engine) = self.engine.take() else {
            return Err(fatal_misuse("write to a finished deflate stream"));
        };
        if buf.is_empty() {
            self.engine = Some(engine);
            return Ok(0);
        }

        let mut consumed_total = 0;
        loop {
            let step = engine.compress(
                &buf[consumed_total..],
                &mut self.staging[self.filled..],
                FlushMode::None,
            );
            let (consumed, produced, _) = match step {
                Ok(step) => step,
                Err(err) => return Err(self.fail(err)),
            };
            consumed_total += consumed;
            self.filled += produced;

            if self.filled == self.staging.len() {
                self.drain()?;
            } else if consumed_total == buf.len() {
                break;
            } else if consumed == 0 && produced == 0 {
                return Err(self.fail(BitioError::compression(
                    "deflate",
                    "engine made no progress on pending input",
                )));
            }
        }

        self.engine = Some(engine);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        if self.poisoned {
            return Err(fatal_misuse("flush of a deflate stream after an engine failure"));
        }
        let Some(mut engine) = self.engine.take() else {
            return Ok(());
        };
        let result = self.sync_flush(&mut engine);
        if !self.poisoned {
            self.engine = Some(engine);
        }
        result
    }

    fn finish(&mut self) -> Result<()> {
        let Some(mut engine) = self.engine.take() else {
            return Ok(());
        };
        self.flush_engine(&mut engine, FlushMode::Finish)?;
        self.drain()?;
        self.staging = Vec::new();
        log::debug!(
            "deflate stream finished with {} compressed bytes in nested writer",
            self.output.position()
        );
        Ok(())
    }

    fn kind(&self) -> WriterKind {
        WriterKind::Deflate
    }
}

impl<'a, S: ByteSink, C: Compressor> Writer<DeflateSink<'a, S, C>> {
    /// A writer compressing into `output` with `engine`.
    pub fn deflate(output: &'a mut Writer<S>, engine: C) -> Self {
        Self::new(DeflateSink::new(output, engine))
    }
}
