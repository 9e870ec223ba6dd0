//! Time sources for record timestamps.

use chrono::{FixedOffset, Local};
use std::fmt::Debug;

/// Supplies the "now" written into `createdAt` and `updatedAt`.
pub trait Clock: Send + Sync + Debug {
    /// Current time as epoch seconds.
    fn now_epoch_seconds(&self) -> i64;
}

/// Reads the host's local wall-clock time and interprets it in a fixed UTC offset.
///
/// On a host whose local zone matches the offset this is plain epoch time.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Clock for OffsetClock {
    fn now_epoch_seconds(&self) -> i64 {
        let wall = Local::now().naive_local();

        wall.and_utc().timestamp() - i64::from(self.offset.local_minus_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_shift_the_reading() {
        let utc = OffsetClock::new(FixedOffset::east_opt(0).unwrap());
        let plus_eight = OffsetClock::new(FixedOffset::east_opt(8 * 3600).unwrap());

        let difference = utc.now_epoch_seconds() - plus_eight.now_epoch_seconds();

        // Both readings happen within the same second or two
        assert!((8 * 3600 - 2..=8 * 3600 + 2).contains(&difference));
    }
}
