use core::time::Duration;
use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread::scope,
    time::Instant,
};

use crate::{
    DEFAULT_EPOCH, Error, Generator, IdGenerator, Layout, MonotonicClock, Poll, SnowflakeId,
    SystemClock, TimeSource,
};

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

/// Replays `values` one read at a time, then repeats the last one.
struct MockStepTime {
    values: Vec<u64>,
    index: AtomicUsize,
}

impl MockStepTime {
    fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            index: AtomicUsize::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }
}

impl TimeSource for MockStepTime {
    fn current_millis(&self) -> u64 {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        self.values[i.min(self.values.len() - 1)]
    }
}

trait PollExt {
    fn unwrap_ready(self) -> SnowflakeId;
    fn unwrap_pending(self) -> u64;
}

impl PollExt for Poll {
    fn unwrap_ready(self) -> SnowflakeId {
        match self {
            Self::Ready { id } => id,
            Self::Pending { yield_for } => {
                panic!("unexpected pending (yield for: {yield_for})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            Self::Ready { id } => panic!("unexpected ready ({id})"),
            Self::Pending { yield_for } => yield_for,
        }
    }
}

/// Epoch at zero so decoded timestamps equal raw clock readings.
fn zero_epoch(identity_bits: u8, sequence_bits: u8) -> Layout {
    Layout::new(Duration::ZERO, identity_bits, sequence_bits).unwrap()
}

fn run_generator_monotonic<G: IdGenerator>(generator: &G, identity: u64) {
    const TOTAL_IDS: usize = 4096 * 64;

    let layout = generator.layout();
    let mut last = layout.decode(generator.next_id());
    assert!(last.timestamp >= layout.epoch_millis());

    for _ in 0..TOTAL_IDS {
        let parts = layout.decode(generator.next_id());
        assert!(parts.timestamp >= last.timestamp);
        if parts.timestamp == last.timestamp {
            assert_eq!(parts.sequence, last.sequence + 1);
        } else {
            assert_eq!(parts.sequence, 0);
        }
        assert_eq!(parts.identity, identity);
        assert!(parts.sequence <= layout.max_sequence());
        last = parts;
    }
}

fn run_generator_unique_threaded<G>(generator: G)
where
    G: IdGenerator + Send + Sync,
{
    const THREADS: usize = 8;
    const TOTAL_IDS: usize = 4096 * 64;
    const IDS_PER_THREAD: usize = TOTAL_IDS / THREADS;

    let generator = Arc::new(generator);
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let mut last = None;
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.next_id();
                    // Calls from one thread never overlap, so they must be
                    // strictly increasing.
                    assert!(last < Some(id));
                    last = Some(id);
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}

#[test]
fn accepts_every_identity_in_range() {
    let layout = Layout::DEFAULT;
    for identity in 0..=layout.max_identity() {
        let generator = Generator::new(identity, layout, SystemClock).unwrap();
        assert_eq!(generator.identity(), identity);
    }

    let wide = Layout::new(DEFAULT_EPOCH, 10, 12).unwrap();
    for identity in 0..=wide.max_identity() {
        assert!(Generator::new(identity, wide, SystemClock).is_ok());
    }
}

#[test]
fn rejects_identity_out_of_range() {
    let layout = Layout::DEFAULT;
    for identity in [32, 33, 1024, u64::MAX] {
        let err = Generator::new(identity, layout, SystemClock).unwrap_err();
        assert_eq!(err, Error::InvalidIdentity { identity, max: 31 });
    }
    assert_eq!(
        Generator::new(32, layout, SystemClock).unwrap_err().to_string(),
        "identity 32 is out of range (must be between 0 and 31)"
    );
}

#[test]
fn generates_reference_example() {
    let generator = Generator::with_default_layout(
        7,
        MockTime {
            millis: 1_672_527_600_123,
        },
    )
    .unwrap();

    let id = generator.next_id();
    assert_eq!(id.to_raw(), (123 << 17) | (7 << 12));
}

#[test]
fn sequence_increments_within_same_tick() {
    let generator = Generator::new(1, zero_epoch(5, 12), MockTime { millis: 42 }).unwrap();

    let ids: Vec<_> = (0..3).map(|_| generator.next_id()).collect();
    for (i, id) in ids.iter().enumerate() {
        let parts = generator.decode(*id);
        assert_eq!(parts.timestamp, 42);
        assert_eq!(parts.identity, 1);
        assert_eq!(parts.sequence, i as u64);
    }
    assert!(ids[0] < ids[1] && ids[1] < ids[2]);
}

#[test]
fn sequence_resets_on_new_millisecond() {
    let clock = MockStepTime::new(vec![42, 42, 43]);
    let generator = Generator::new(0, zero_epoch(5, 12), clock).unwrap();

    let a = generator.decode(generator.next_id());
    let b = generator.decode(generator.next_id());
    let c = generator.decode(generator.next_id());
    assert_eq!((a.timestamp, a.sequence), (42, 0));
    assert_eq!((b.timestamp, b.sequence), (42, 1));
    assert_eq!((c.timestamp, c.sequence), (43, 0));
}

#[test]
fn exhausted_sequence_spins_into_next_millisecond() {
    let layout = zero_epoch(5, 2);
    let calls = layout.max_sequence() as usize + 2;
    let mut values = vec![42; calls];
    values.push(43);
    let generator = Generator::new(3, layout, MockStepTime::new(values)).unwrap();

    let ids: Vec<_> = (0..calls).map(|_| generator.next_id()).collect();
    let first = generator.decode(ids[0]);
    let last = generator.decode(ids[calls - 1]);

    assert_eq!(first.timestamp, 42);
    assert!(last.timestamp > first.timestamp);
    assert_eq!(last.sequence, 0);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    // One read per call, plus the extra spin read.
    assert_eq!(generator.clock.reads(), calls + 1);
}

#[test]
fn preloaded_exhausted_sequence_waits_for_next_millisecond() {
    let layout = zero_epoch(5, 12);
    let clock = MockStepTime::new(vec![42, 42, 42, 43]);
    let generator =
        Generator::from_components(0, layout, 42, layout.max_sequence(), clock).unwrap();

    let parts = generator.decode(generator.next_id());
    assert_eq!((parts.timestamp, parts.sequence), (43, 0));
}

#[test]
fn backward_clock_jump_blocks_until_caught_up() {
    let clock = MockStepTime::new(vec![1_000, 995, 1_000]);
    let generator = Generator::new(9, zero_epoch(5, 12), clock).unwrap();

    let before = generator.decode(generator.next_id());

    let start = Instant::now();
    let after = generator.decode(generator.next_id());
    let waited = start.elapsed();

    assert!(waited >= Duration::from_millis(5), "waited only {waited:?}");
    assert!(after.timestamp >= before.timestamp);
    assert_eq!((after.timestamp, after.sequence), (1_000, 1));
}

#[test]
fn backward_clock_jump_repeats_wait_while_still_behind() {
    let clock = MockStepTime::new(vec![1_000, 990, 996, 1_001]);
    let generator = Generator::new(0, zero_epoch(5, 12), clock).unwrap();

    let before = generator.decode(generator.next_id());
    let start = Instant::now();
    let after = generator.decode(generator.next_id());

    assert!(start.elapsed() >= Duration::from_millis(14));
    assert!(after.timestamp > before.timestamp);
    assert_eq!(after.sequence, 0);
}

#[test]
fn poll_returns_pending_when_sequence_exhausted() {
    let layout = zero_epoch(5, 12);
    let generator =
        Generator::from_components(0, layout, 42, layout.max_sequence(), MockTime { millis: 42 })
            .unwrap();

    assert_eq!(generator.poll_id().unwrap_pending(), 1);
    // State is untouched, so it stays pending.
    assert_eq!(generator.poll_id().unwrap_pending(), 1);
}

#[test]
fn poll_returns_gap_when_clock_behind() {
    let generator =
        Generator::from_components(0, zero_epoch(5, 12), 50, 0, MockTime { millis: 45 }).unwrap();
    assert_eq!(generator.poll_id().unwrap_pending(), 5);
}

#[test]
fn poll_handles_rollover() {
    let layout = zero_epoch(5, 3);
    let mut values = vec![42; layout.max_sequence() as usize + 2];
    values.push(43);
    let generator = Generator::new(1, layout, MockStepTime::new(values)).unwrap();

    for i in 0..=layout.max_sequence() {
        let parts = generator.decode(generator.poll_id().unwrap_ready());
        assert_eq!(parts.sequence, i);
        assert_eq!(parts.timestamp, 42);
    }

    assert_eq!(generator.poll_id().unwrap_pending(), 1);

    let parts = generator.decode(generator.poll_id().unwrap_ready());
    assert_eq!((parts.timestamp, parts.sequence), (43, 0));
}

#[test]
fn poll_and_next_share_state() {
    let generator = Generator::new(2, zero_epoch(5, 12), MockTime { millis: 7 }).unwrap();

    let a = generator.next_id();
    let b = generator.poll_id().unwrap_ready();
    let c = generator.next_id();
    assert!(a < b && b < c);
    assert_eq!(generator.decode(c).sequence, 2);
}

#[test]
fn decoded_ids_round_trip() {
    let layout = Layout::new(DEFAULT_EPOCH, 10, 12).unwrap();
    let generator = Generator::new(1023, layout, SystemClock).unwrap();

    for _ in 0..10_000 {
        let id = generator.next_id();
        let parts = generator.decode(id);
        assert!(parts.timestamp >= layout.epoch_millis());
        assert_eq!(parts.identity, 1023);
        assert!(parts.sequence <= layout.max_sequence());
        assert_eq!(layout.pack(parts.timestamp, parts.identity, parts.sequence), id);
    }
}

#[test]
fn system_clock_sequence_increments() {
    let generator = Generator::with_default_layout(5, SystemClock).unwrap();
    run_generator_monotonic(&generator, 5);
}

#[test]
fn monotonic_clock_sequence_increments() {
    let generator = Generator::with_default_layout(0, MonotonicClock::new()).unwrap();
    run_generator_monotonic(&generator, 0);
}

#[test]
fn system_clock_threaded_unique() {
    run_generator_unique_threaded(Generator::with_default_layout(31, SystemClock).unwrap());
}

#[test]
fn monotonic_clock_threaded_unique() {
    let clock = MonotonicClock::new();
    run_generator_unique_threaded(Generator::with_default_layout(0, clock).unwrap());
}

#[test]
fn shared_clock_distinct_identities_never_collide() {
    let clock = Arc::new(MonotonicClock::new());
    let a = Generator::with_default_layout(1, Arc::clone(&clock)).unwrap();
    let b = Generator::with_default_layout(2, Arc::clone(&clock)).unwrap();

    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        assert!(seen.insert(a.next_id()));
        assert!(seen.insert(b.next_id()));
    }
}
