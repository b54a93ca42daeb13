use core::time::Duration;

use crate::{Error, Result, SnowflakeId};

/// Default epoch: Sunday, January 1, 2023 00:00:00 CET (Unix ms
/// `1_672_527_600_000`).
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_672_527_600_000);

/// Default identity field width (32 distinct generators).
pub const DEFAULT_IDENTITY_BITS: u8 = 5;

/// Default sequence field width (4096 IDs per millisecond).
pub const DEFAULT_SEQUENCE_BITS: u8 = 12;

/// The bit partition of a [`SnowflakeId`] together with its epoch.
///
/// A layout is fixed when a generator is built and never changes afterwards.
/// The sign bit is always left clear, so every field budget is carved out of
/// the remaining 63 bits:
///
/// ```text
///  Bit Index:  63   62                                                    0
///              +----+----------------+----------------+-------------------+
///  Field:      | 0  | timestamp (T)  | identity (I)   | sequence (S)      |
///              +----+----------------+----------------+-------------------+
///                     T = 63 - I - S
/// ```
///
/// The timestamp field stores milliseconds elapsed since [`Layout::epoch`].
/// Time past `epoch + 2^T - 1` ms wraps silently; choose the epoch and widths
/// so that horizon is far away.
///
/// # Example
///
/// ```
/// use snowgen::Layout;
///
/// let layout = Layout::DEFAULT;
/// assert_eq!(layout.max_identity(), 31);
/// assert_eq!(layout.max_sequence(), 4095);
/// assert_eq!(layout.timestamp_bits(), 46);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    epoch: u64, // in milliseconds
    identity_bits: u8,
    sequence_bits: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Layout {
    /// Usable bits in the signed 64-bit identifier.
    pub const USABLE_BITS: u8 = 63;

    /// [`DEFAULT_EPOCH`], [`DEFAULT_IDENTITY_BITS`] and
    /// [`DEFAULT_SEQUENCE_BITS`].
    pub const DEFAULT: Self = Self {
        epoch: DEFAULT_EPOCH.as_millis() as u64,
        identity_bits: DEFAULT_IDENTITY_BITS,
        sequence_bits: DEFAULT_SEQUENCE_BITS,
    };

    /// Builds a layout from an epoch (as a [`Duration`] since 1970-01-01 UTC)
    /// and the identity and sequence field widths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLayout`] if the identity and sequence widths
    /// together leave no bit for the timestamp.
    pub fn new(epoch: Duration, identity_bits: u8, sequence_bits: u8) -> Result<Self> {
        let claimed = u16::from(identity_bits) + u16::from(sequence_bits);
        if claimed >= u16::from(Self::USABLE_BITS) {
            return Err(Error::InvalidLayout {
                identity_bits,
                sequence_bits,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        let epoch = epoch.as_millis() as u64;
        Ok(Self {
            epoch,
            identity_bits,
            sequence_bits,
        })
    }

    /// The reference instant, as a [`Duration`] since the Unix epoch.
    pub const fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch)
    }

    /// The reference instant in Unix milliseconds.
    pub const fn epoch_millis(&self) -> u64 {
        self.epoch
    }

    /// Width of the identity field.
    pub const fn identity_bits(&self) -> u8 {
        self.identity_bits
    }

    /// Width of the per-millisecond sequence field.
    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    /// Width of the timestamp field: whatever identity and sequence leave.
    pub const fn timestamp_bits(&self) -> u8 {
        Self::USABLE_BITS - self.identity_bits - self.sequence_bits
    }

    /// Largest encodable identity, `2^identity_bits - 1`.
    pub const fn max_identity(&self) -> u64 {
        mask(self.identity_bits)
    }

    /// Largest encodable sequence, `2^sequence_bits - 1`.
    pub const fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }

    /// Largest encodable elapsed-milliseconds value.
    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits())
    }

    /// Number of bits to shift the identity to its position.
    pub const fn identity_shift(&self) -> u8 {
        self.sequence_bits
    }

    /// Number of bits to shift the timestamp to its position.
    pub const fn timestamp_shift(&self) -> u8 {
        self.identity_bits + self.sequence_bits
    }

    /// Packs an absolute Unix-millisecond timestamp, an identity and a
    /// sequence into a [`SnowflakeId`].
    ///
    /// Each field is masked to its width. A timestamp before the epoch or past
    /// the timestamp horizon wraps rather than failing.
    ///
    /// # Example
    ///
    /// ```
    /// use snowgen::Layout;
    ///
    /// let id = Layout::DEFAULT.pack(1_672_527_600_123, 7, 0);
    /// assert_eq!(id.to_raw(), (123 << 17) | (7 << 12));
    /// ```
    pub const fn pack(&self, timestamp: u64, identity: u64, sequence: u64) -> SnowflakeId {
        debug_assert!(identity <= self.max_identity(), "identity overflow");
        debug_assert!(sequence <= self.max_sequence(), "sequence overflow");

        let elapsed = timestamp.wrapping_sub(self.epoch) & self.max_timestamp();
        let raw = (elapsed << self.timestamp_shift())
            | ((identity & self.max_identity()) << self.identity_shift())
            | (sequence & self.max_sequence());

        #[allow(clippy::cast_possible_wrap)]
        let raw = raw as i64;
        SnowflakeId::from_raw(raw)
    }

    /// Splits a [`SnowflakeId`] back into its fields. The returned timestamp
    /// is absolute (epoch re-added, wrapping like [`Layout::pack`]).
    pub const fn decode(&self, id: SnowflakeId) -> IdParts {
        #[allow(clippy::cast_sign_loss)]
        let raw = id.to_raw() as u64;
        IdParts {
            timestamp: self
                .epoch
                .wrapping_add((raw >> self.timestamp_shift()) & self.max_timestamp()),
            identity: (raw >> self.identity_shift()) & self.max_identity(),
            sequence: raw & self.max_sequence(),
        }
    }
}

/// The three fields of a decoded [`SnowflakeId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdParts {
    /// Unix milliseconds.
    pub timestamp: u64,
    /// The generator identity that issued the ID.
    pub identity: u64,
    /// Position within its millisecond.
    pub sequence: u64,
}

const fn mask(bits: u8) -> u64 {
    if bits == 0 { 0 } else { u64::MAX >> (64 - bits as u32) }
}
