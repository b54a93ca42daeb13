use snowgen::{Generator, MonotonicClock, SystemClock, TimeSource};

use crate::server::config::{ClockKind, IdentitySource, ServerConfig};

/// Clock implementation used by the generator, chosen at startup.
#[derive(Clone, Debug)]
pub enum Clock {
    System(SystemClock),
    Monotonic(MonotonicClock),
}

impl From<ClockKind> for Clock {
    fn from(kind: ClockKind) -> Self {
        match kind {
            ClockKind::System => Self::System(SystemClock),
            ClockKind::Monotonic => Self::Monotonic(MonotonicClock::new()),
        }
    }
}

impl TimeSource for Clock {
    fn current_millis(&self) -> u64 {
        match self {
            Self::System(clock) => clock.current_millis(),
            Self::Monotonic(clock) => clock.current_millis(),
        }
    }
}

/// The one generator this process serves IDs from.
pub type IdGen = Generator<Clock>;

/// Builds the generator described by `config`.
///
/// # Errors
///
/// Returns [`snowgen::Error::InvalidIdentity`] if the identity does not fit
/// the configured layout. The server must not start in that case.
pub fn build_generator(config: &ServerConfig) -> snowgen::Result<IdGen> {
    let generator = Generator::new(config.identity, config.layout, Clock::from(config.clock))?;

    if config.identity_source == IdentitySource::Random {
        tracing::warn!(
            identity = config.identity,
            "identity picked at random; instances sharing an ID namespace may collide"
        );
    }
    tracing::info!(
        identity = config.identity,
        identity_bits = config.layout.identity_bits(),
        sequence_bits = config.layout.sequence_bits(),
        epoch_ms = config.layout.epoch_millis(),
        clock = ?config.clock,
        "generator ready"
    );

    Ok(generator)
}
