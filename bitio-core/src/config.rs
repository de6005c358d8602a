//! Construction parameters for buffer and compression backends.

use crate::codec::CompressionLevel;

/// Allocation policy for a growing buffer writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthConfig {
    /// Capacity allocated at construction.
    pub initial_capacity: usize,
    /// Amount added to the capacity, repeatedly, until a write fits.
    pub increment: usize,
}

impl GrowthConfig {
    /// 4 KiB up front, growing in 4 KiB steps.
    pub const DEFAULT: Self = Self {
        initial_capacity: 4096,
        increment: 4096,
    };

    /// Default initial capacity with a custom increment.
    ///
    /// An increment of zero is treated as one.
    pub fn with_increment(increment: usize) -> Self {
        Self {
            initial_capacity: Self::DEFAULT.initial_capacity,
            increment: increment.max(1),
        }
    }

    /// Create a configuration with both values given explicitly.
    pub fn new(initial_capacity: usize, increment: usize) -> Self {
        Self {
            initial_capacity,
            increment: increment.max(1),
        }
    }

    /// Smallest capacity reachable from `capacity` in whole increments
    /// that is at least `required`, or exactly `required` when the next
    /// increment would not fit in `usize`.
    pub fn grown_capacity(&self, capacity: usize, required: usize) -> usize {
        let step = self.increment.max(1);
        if capacity >= required {
            return capacity;
        }
        let steps = (required - capacity).div_ceil(step);
        steps
            .checked_mul(step)
            .and_then(|grow| capacity.checked_add(grow))
            .unwrap_or(required)
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters shared by the inflate reader and deflate writer adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// Size of the staging buffer between the engine and the nested stream.
    pub chunk_size: usize,
    /// Compression level used by deflate writers.
    pub level: CompressionLevel,
}

impl StreamConfig {
    /// 16 KiB staging chunks at maximum compression.
    pub const DEFAULT: Self = Self {
        chunk_size: 16384,
        level: CompressionLevel::BEST,
    };

    /// Default configuration with a different staging chunk size.
    ///
    /// A chunk size of zero is treated as one.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            ..Self::DEFAULT
        }
    }

    /// Default configuration with a different compression level.
    pub fn with_level(level: impl Into<CompressionLevel>) -> Self {
        Self {
            level: level.into(),
            ..Self::DEFAULT
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_defaults() {
        let config = GrowthConfig::DEFAULT;
        assert_eq!(config.initial_capacity, 4096);
        assert_eq!(config.increment, 4096);
        assert_eq!(GrowthConfig::with_increment(0).increment, 1);
    }

    #[test]
    fn test_grown_capacity() {
        let config = GrowthConfig::new(8, 16);
        assert_eq!(config.grown_capacity(8, 8), 8);
        assert_eq!(config.grown_capacity(8, 9), 24);
        assert_eq!(config.grown_capacity(8, 24), 24);
        assert_eq!(config.grown_capacity(8, 100), 104);

        let huge = GrowthConfig::with_increment(usize::MAX);
        assert_eq!(huge.grown_capacity(4096, 4097), 4097);
        let wide = GrowthConfig::new(0, usize::MAX / 2 + 1);
        assert_eq!(wide.grown_capacity(0, usize::MAX), usize::MAX);
    }

    #[test]
    fn test_stream_defaults() {
        let config = StreamConfig::DEFAULT;
        assert_eq!(config.chunk_size, 16384);
        assert_eq!(config.level, CompressionLevel::BEST);
        assert_eq!(StreamConfig::with_chunk_size(0).chunk_size, 1);
        assert_eq!(StreamConfig::with_level(3u8).level.level(), 3);
    }
}
