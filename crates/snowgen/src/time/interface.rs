use std::sync::Arc;

/// A source of wall-clock time in **Unix milliseconds**.
///
/// The generator reads the clock once per call (more while waiting out a
/// backward jump or an exhausted sequence), so implementations should be
/// cheap. Plug in a mocked source in tests to script clock behavior.
///
/// # Example
///
/// ```
/// use snowgen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_672_527_600_123
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_672_527_600_123);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
