use crate::SnowflakeId;

/// The outcome of a non-blocking generation attempt.
///
/// - [`Poll::Ready`] indicates a new ID was generated.
/// - [`Poll::Pending`] means the generator cannot issue an ID right now,
///   either because the sequence for the current millisecond is exhausted or
///   because the clock reads earlier than the last issued timestamp. Wait
///   `yield_for` milliseconds and try again.
///
/// This is the retry-signal counterpart of the blocking
/// [`Generator::next_id`]: the caller owns the wait policy.
///
/// # Example
///
/// ```
/// use snowgen::{Generator, Poll, SystemClock};
///
/// let generator = Generator::with_default_layout(3, SystemClock).unwrap();
/// let id = loop {
///     match generator.poll_id() {
///         Poll::Ready { id } => break id,
///         Poll::Pending { yield_for } => {
///             std::thread::sleep(std::time::Duration::from_millis(yield_for));
///         }
///     }
/// };
/// assert_eq!(generator.decode(id).identity, 3);
/// ```
///
/// [`Generator::next_id`]: crate::Generator::next_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID could be generated yet.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}
