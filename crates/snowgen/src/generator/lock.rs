use core::{cmp::Ordering, time::Duration};

use parking_lot::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdGenerator, IdParts, Layout, Poll, Result, SnowflakeId, TimeSource};

/// Mutable state, only ever touched under the generator's mutex.
#[derive(Debug, Clone, Copy, Default)]
struct State {
    /// Unix milliseconds of the last issued ID; `0` until the first one.
    last_timestamp: u64,
    sequence: u64,
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// Every generation attempt runs start to finish inside one
/// [`parking_lot::Mutex`] critical section: reading the clock, comparing it
/// with the last issued timestamp, advancing the sequence and packing the ID.
/// Callers may be delayed, but never observe a duplicate or out-of-order ID.
///
/// Share one instance across threads with [`Arc`](std::sync::Arc). Distinct
/// instances share nothing; giving each a distinct identity is the caller's
/// job.
///
/// ## Clock handling
/// - **Same millisecond**: the sequence advances. Once it wraps, the
///   generator spins until the clock moves past the current millisecond.
/// - **Clock moved backwards**: the generator sleeps for exactly the gap and
///   reads the clock again, until it catches up. There is no upper bound on
///   that wait.
///
/// ## See Also
/// - [`Generator::poll_id`] for a non-blocking variant that hands the wait
///   back to the caller.
pub struct Generator<T>
where
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<State>,
    identity: u64,
    layout: Layout,
    pub(crate) clock: T,
}

impl<T> Generator<T>
where
    T: TimeSource,
{
    /// Creates a generator for `identity` using the given layout and clock.
    ///
    /// The last-issued timestamp and the sequence both start at zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `identity` exceeds
    /// [`Layout::max_identity`]. Treat this as fatal: the generator must not
    /// start with an identity it cannot encode.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use snowgen::{Error, Generator, Layout, SystemClock};
    ///
    /// let layout = Layout::new(Duration::from_millis(1_672_527_600_000), 5, 12).unwrap();
    ///
    /// assert!(Generator::new(31, layout, SystemClock).is_ok());
    /// assert!(matches!(
    ///     Generator::new(32, layout, SystemClock),
    ///     Err(Error::InvalidIdentity { identity: 32, max: 31 })
    /// ));
    /// ```
    pub fn new(identity: u64, layout: Layout, clock: T) -> Result<Self> {
        Self::from_components(identity, layout, 0, 0, clock)
    }

    /// Creates a generator with [`Layout::DEFAULT`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `identity` exceeds 31.
    pub fn with_default_layout(identity: u64, clock: T) -> Result<Self> {
        Self::new(identity, Layout::DEFAULT, clock)
    }

    /// Creates a generator preloaded with an explicit last-issued timestamp
    /// (Unix milliseconds) and sequence.
    ///
    /// This is primarily useful for restoring state or controlling the
    /// starting point manually. The sequence is masked to the layout's width.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::new`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `identity` exceeds
    /// [`Layout::max_identity`].
    pub fn from_components(
        identity: u64,
        layout: Layout,
        last_timestamp: u64,
        sequence: u64,
        clock: T,
    ) -> Result<Self> {
        let max = layout.max_identity();
        if identity > max {
            return Err(Error::InvalidIdentity { identity, max });
        }

        let state = Mutex::new(State {
            last_timestamp,
            sequence: sequence & layout.max_sequence(),
        });
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(state),
            #[cfg(not(feature = "cache-padded"))]
            state,
            identity,
            layout,
            clock,
        })
    }

    /// The identity encoded into every ID from this generator.
    pub const fn identity(&self) -> u64 {
        self.identity
    }

    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Splits an ID back into its fields using this generator's layout.
    pub const fn decode(&self, id: SnowflakeId) -> IdParts {
        self.layout.decode(id)
    }

    /// Generates the next ID, blocking while the clock is behind or the
    /// current millisecond's sequence is exhausted.
    ///
    /// Never fails. If the clock never advances, this never returns.
    ///
    /// # Example
    /// ```
    /// use snowgen::{Generator, SystemClock};
    ///
    /// let generator = Generator::with_default_layout(7, SystemClock).unwrap();
    /// let a = generator.next_id();
    /// let b = generator.next_id();
    /// assert!(a < b);
    /// assert_eq!(generator.decode(b).identity, 7);
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> SnowflakeId {
        let mut state = self.state.lock();
        let mut now = self.clock.current_millis();

        while now < state.last_timestamp {
            now = self.cold_wait_clock_behind(state.last_timestamp, now);
        }

        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & self.layout.max_sequence();
            if state.sequence == 0 {
                now = self.cold_wait_next_millis(state.last_timestamp);
            }
        } else {
            state.sequence = 0;
        }

        state.last_timestamp = now;
        self.layout.pack(now, self.identity, state.sequence)
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// Returns [`Poll::Pending`] instead of waiting; the generator state is
    /// left untouched in that case, so retrying later is always safe.
    ///
    /// # Returns
    /// - `Poll::Ready { id }`: a new ID is available
    /// - `Poll::Pending { yield_for }`: the time to wait (in milliseconds)
    ///   before trying again. `1` when the sequence is exhausted, the size of
    ///   the gap when the clock reads earlier than the last issued timestamp.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> Poll {
        let mut state = self.state.lock();
        let now = self.clock.current_millis();

        match now.cmp(&state.last_timestamp) {
            Ordering::Equal => {
                if state.sequence < self.layout.max_sequence() {
                    state.sequence += 1;
                    Poll::Ready {
                        id: self.layout.pack(now, self.identity, state.sequence),
                    }
                } else {
                    self.cold_sequence_exhausted(now)
                }
            }
            Ordering::Greater => {
                state.last_timestamp = now;
                state.sequence = 0;
                Poll::Ready {
                    id: self.layout.pack(now, self.identity, 0),
                }
            }
            Ordering::Less => self.cold_clock_behind(state.last_timestamp, now),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(&self, _now: u64) -> Poll {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            identity = self.identity,
            last_timestamp = _now,
            "sequence exhausted, retry in the next millisecond"
        );
        Poll::Pending { yield_for: 1 }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, last_timestamp: u64, now: u64) -> Poll {
        let behind = last_timestamp - now;
        #[cfg(feature = "tracing")]
        tracing::warn!(
            identity = self.identity,
            behind_ms = behind,
            "clock moved backwards, retry once it catches up"
        );
        Poll::Pending { yield_for: behind }
    }

    /// Sleeps out a backward clock jump and returns a fresh clock reading.
    #[cold]
    #[inline(never)]
    fn cold_wait_clock_behind(&self, last_timestamp: u64, now: u64) -> u64 {
        let behind = last_timestamp - now;
        #[cfg(feature = "tracing")]
        tracing::warn!(
            identity = self.identity,
            behind_ms = behind,
            "clock moved backwards, waiting for it to catch up"
        );
        std::thread::sleep(Duration::from_millis(behind));
        self.clock.current_millis()
    }

    /// Spins until the clock passes `last_timestamp`.
    #[cold]
    #[inline(never)]
    fn cold_wait_next_millis(&self, last_timestamp: u64) -> u64 {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            identity = self.identity,
            last_timestamp,
            "sequence exhausted, spinning until next millisecond"
        );
        loop {
            let now = self.clock.current_millis();
            if now > last_timestamp {
                break now;
            }
            core::hint::spin_loop();
        }
    }
}

impl<T> IdGenerator for Generator<T>
where
    T: TimeSource,
{
    fn next_id(&self) -> SnowflakeId {
        self.next_id()
    }

    fn poll_id(&self) -> Poll {
        self.poll_id()
    }

    fn layout(&self) -> Layout {
        self.layout()
    }
}

impl<T> core::fmt::Debug for Generator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Generator")
            .field("identity", &self.identity)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
