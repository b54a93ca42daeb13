use core::time::Duration;

use anyhow::bail;
use clap::{Parser, ValueEnum};
use rand::Rng;
use snowgen::{
    DEFAULT_EPOCH, DEFAULT_IDENTITY_BITS, DEFAULT_SEQUENCE_BITS, Layout, SystemClock, TimeSource,
};

/// Runtime configuration for the `snowgen-server` binary.
///
/// All values are parsed from CLI arguments or environment variables, with
/// defaults matching [`Layout::DEFAULT`].
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowgen-server",
    version,
    about = "An HTTP service for Snowflake-like IDs"
)]
pub struct CliArgs {
    /// Identity of this generator instance, encoded into every ID.
    ///
    /// Must be unique across all instances sharing an ID namespace and fit in
    /// `IDENTITY_BITS`.
    ///
    /// Environment variable: `GENERATOR_IDENTITY`
    #[arg(long, env = "GENERATOR_IDENTITY")]
    pub identity: Option<u64>,

    /// Pick the identity uniformly at random on startup instead.
    ///
    /// Nothing stops two instances from drawing the same identity, in which
    /// case they can issue duplicate IDs.
    ///
    /// Environment variable: `RANDOM_IDENTITY`
    #[arg(long, env = "RANDOM_IDENTITY", default_value_t = false)]
    pub random_identity: bool,

    /// Width of the identity field in bits.
    ///
    /// Environment variable: `IDENTITY_BITS`
    #[arg(long, env = "IDENTITY_BITS", default_value_t = DEFAULT_IDENTITY_BITS)]
    pub identity_bits: u8,

    /// Width of the per-millisecond sequence field in bits.
    ///
    /// Environment variable: `SEQUENCE_BITS`
    #[arg(long, env = "SEQUENCE_BITS", default_value_t = DEFAULT_SEQUENCE_BITS)]
    pub sequence_bits: u8,

    /// Epoch as Unix milliseconds. Timestamps are stored relative to it.
    ///
    /// Environment variable: `EPOCH_MS`
    #[arg(long, env = "EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Time source: the OS wall clock, or a monotonic ticker anchored to it
    /// at startup.
    ///
    /// Environment variable: `CLOCK`
    #[arg(long, env = "CLOCK", value_enum, default_value_t = ClockKind::System)]
    pub clock: ClockKind,

    /// Address to listen on.
    ///
    /// Example: "0.0.0.0:8080"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ClockKind {
    /// Follows the system time, including backward steps.
    System,
    /// Never moves backwards once started.
    Monotonic,
}

/// Where the configured identity came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentitySource {
    Configured,
    Random,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub identity: u64,
    pub identity_source: IdentitySource,
    pub layout: Layout,
    pub clock: ClockKind,
    pub server_addr: String,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    /// Validates the layout and resolves the identity. The identity's range
    /// is checked when the generator is built.
    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let now = SystemClock.current_millis();
        if args.epoch_ms > now {
            bail!(
                "EPOCH_MS {} is later than the system clock ({now})",
                args.epoch_ms
            );
        }

        let layout = Layout::new(
            Duration::from_millis(args.epoch_ms),
            args.identity_bits,
            args.sequence_bits,
        )?;

        let (identity, identity_source) = match (args.identity, args.random_identity) {
            (Some(identity), false) => (identity, IdentitySource::Configured),
            (None, true) => (
                rand::rng().random_range(0..=layout.max_identity()),
                IdentitySource::Random,
            ),
            (Some(_), true) => {
                bail!("GENERATOR_IDENTITY and RANDOM_IDENTITY are mutually exclusive")
            }
            (None, false) => bail!("GENERATOR_IDENTITY must be set (or enable RANDOM_IDENTITY)"),
        };

        Ok(Self {
            identity,
            identity_source,
            layout,
            clock: args.clock,
            server_addr: args.server_addr,
        })
    }
}
