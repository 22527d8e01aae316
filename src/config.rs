//! Construction-time stream settings.

use crate::codec::MAX_PRIMITIVE_WIDTH;
use crate::error::{Error, Result};

/// Work buffer size for the default (heap) mode.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Work buffer size for direct mode, used by long-running, high-volume transfers.
pub const DIRECT_BUFFER_SIZE: usize = 1024 * 1024;

/// Sizing policy for a stream's work buffer.
///
/// Both modes allocate an ordinary boxed slice; they differ only in the
/// default capacity they pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferMode {
    /// 8 KiB default, suited to short-lived streams.
    #[default]
    Heap,
    /// 1 MiB default, amortizing backend calls over bulk transfers.
    Direct,
}

impl BufferMode {
    /// The buffer capacity this mode allocates when no explicit size is given.
    pub fn default_capacity(self) -> usize {
        match self {
            BufferMode::Heap => DEFAULT_BUFFER_SIZE,
            BufferMode::Direct => DIRECT_BUFFER_SIZE,
        }
    }
}

/// Settings applied when a reader or writer is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    mode: BufferMode,
    capacity: usize,
}

impl StreamConfig {
    /// Creates a config for `mode` with that mode's default capacity.
    pub fn new(mode: BufferMode) -> Self {
        Self {
            mode,
            capacity: mode.default_capacity(),
        }
    }

    /// Shorthand for `StreamConfig::new(BufferMode::Direct)`.
    pub fn direct() -> Self {
        Self::new(BufferMode::Direct)
    }

    /// Overrides the work buffer capacity.
    ///
    /// The buffer must hold at least one value of the widest primitive.
    pub fn with_capacity(self, capacity: usize) -> Result<Self> {
        if capacity < MAX_PRIMITIVE_WIDTH {
            return Err(Error::invalid_config(format!(
                "work buffer of {capacity} bytes is smaller than the {MAX_PRIMITIVE_WIDTH}-byte minimum"
            )));
        }
        Ok(Self { capacity, ..self })
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::new(BufferMode::Heap)
    }
}
