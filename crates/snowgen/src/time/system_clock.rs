use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The operating system's wall clock.
///
/// This clock follows every adjustment made to the system time, including
/// steps backwards (e.g., an NTP correction). The generator tolerates small
/// backward jumps by waiting them out.
///
/// A system time before 1970 reads as `0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        unix_millis()
    }
}

pub(crate) fn unix_millis() -> u64 {
    #[allow(clippy::cast_possible_truncation)]
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64);
    millis
}
