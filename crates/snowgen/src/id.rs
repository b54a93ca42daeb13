use core::{fmt, num::ParseIntError, str::FromStr};

/// A packed, time-ordered 64-bit identifier.
///
/// The value is opaque without the [`Layout`] that produced it; use
/// [`Layout::decode`] (or [`Generator::decode`]) to recover the timestamp,
/// identity and sequence. Because the timestamp occupies the most significant
/// bits, IDs from one generator order the same way their issue times do.
///
/// Displays as plain decimal.
///
/// ```
/// use snowgen::SnowflakeId;
///
/// let id = SnowflakeId::from_raw(16_150_528);
/// assert_eq!(id.to_string(), "16150528");
/// assert_eq!(id.to_padded_string(), "0000000000016150528");
/// assert_eq!("16150528".parse::<SnowflakeId>().unwrap(), id);
/// ```
///
/// [`Layout`]: crate::Layout
/// [`Layout::decode`]: crate::Layout::decode
/// [`Generator::decode`]: crate::Generator::decode
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: i64,
}

impl SnowflakeId {
    /// Wraps a raw value.
    pub const fn from_raw(raw: i64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw signed 64-bit value.
    pub const fn to_raw(&self) -> i64 {
        self.id
    }

    /// Returns the ID as a zero-padded 19-digit string, so that string order
    /// matches numeric order.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<i64> for SnowflakeId {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl FromStr for SnowflakeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self::from_raw)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("bits", &format_args!("{:#066b}", self.id))
            .finish()
    }
}
