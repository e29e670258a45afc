//! Cross-platform wall clock and block id generation
//!
//! Uses `std::time::SystemTime` on native targets and `js_sys::Date::now()`
//! on `wasm32` targets (where `SystemTime::now()` panics with
//! "time not implemented on this platform").

use std::sync::Arc;

use crate::core::block::{BlockId, BlockType};

/// Source of millisecond timestamps
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;
}

// ── Native implementation ───────────────────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use std::time::{SystemTime, UNIX_EPOCH};

    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl super::Clock for SystemClock {
        fn now_ms(&self) -> u64 {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        }
    }
}

// ── WASM implementation ─────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
mod imp {
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl super::Clock for SystemClock {
        fn now_ms(&self) -> u64 {
            js_sys::Date::now() as u64
        }
    }
}

pub use imp::SystemClock;

/// A clock that always reports the same instant. Useful in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.0
    }
}

/// Issues `{type}-{timestamp}-{position}` block ids.
///
/// Each batch (one extraction pass, one append) gets its own timestamp, and
/// batch timestamps strictly increase even when the clock stands still, so an
/// id is never handed out twice by the same generator.
#[derive(Clone)]
pub struct IdGenerator {
    clock: Arc<dyn Clock>,
    last_timestamp: u64,
}

impl IdGenerator {
    /// Create a generator over the given clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last_timestamp: 0,
        }
    }

    /// Start a new batch and return its timestamp
    pub fn next_batch(&mut self) -> IdBatch {
        let now = self.clock.now_ms();
        let timestamp = if now > self.last_timestamp {
            now
        } else {
            self.last_timestamp + 1
        };
        self.last_timestamp = timestamp;
        IdBatch { timestamp }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("last_timestamp", &self.last_timestamp)
            .finish()
    }
}

/// Timestamp shared by all ids of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdBatch {
    pub timestamp: u64,
}

impl IdBatch {
    /// Id for the block created at `position`
    pub fn id(&self, block_type: BlockType, position: usize) -> BlockId {
        BlockId::compose(block_type, self.timestamp, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_increase_with_frozen_clock() {
        let mut ids = IdGenerator::new(Arc::new(FixedClock(1_000)));
        let a = ids.next_batch();
        let b = ids.next_batch();
        let c = ids.next_batch();
        assert_eq!(a.timestamp, 1_000);
        assert_eq!(b.timestamp, 1_001);
        assert_eq!(c.timestamp, 1_002);
    }

    #[test]
    fn test_batch_ids_differ_by_position() {
        let mut ids = IdGenerator::new(Arc::new(FixedClock(5)));
        let batch = ids.next_batch();
        assert_ne!(batch.id(BlockType::List, 0), batch.id(BlockType::List, 1));
        assert_eq!(batch.id(BlockType::List, 2).as_str(), "list-5-2");
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
