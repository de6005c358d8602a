//! Byte transfer backends.
//!
//! Each backend implements [`ByteSource`](crate::stream::ByteSource),
//! [`ByteSink`](crate::stream::ByteSink) or both halves separately:
//!
//! | Backend | Read | Write |
//! |---|---|---|
//! | Discard | [`DiscardSource`] | [`DiscardSink`] |
//! | File | [`FileSource`] | [`FileSink`] |
//! | Fixed buffer | [`FixedBufferSource`] | [`FixedBufferSink`] |
//! | Growing buffer | - | [`GrowingBufferSink`] |
//!
//! The compression adapters live in [`crate::inflate`] and [`crate::deflate`].

mod buffer;
mod discard;
mod file;

pub use buffer::{FixedBufferSink, FixedBufferSource, GrowingBufferSink};
pub use discard::{DiscardSink, DiscardSource};
pub use file::{FileSink, FileSource};
