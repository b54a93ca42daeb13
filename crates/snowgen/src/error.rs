/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `snowgen` can emit.
///
/// Every variant is a construction-time failure. Once a [`Generator`] exists,
/// producing IDs never fails: clock anomalies and sequence exhaustion are
/// absorbed by waiting.
///
/// [`Generator`]: crate::Generator
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The identity does not fit in the layout's identity field.
    #[error("identity {identity} is out of range (must be between 0 and {max})")]
    InvalidIdentity {
        /// The rejected identity.
        identity: u64,
        /// The largest identity the layout can encode.
        max: u64,
    },

    /// The identity and sequence fields leave no room for a timestamp.
    #[error(
        "layout with {identity_bits} identity bits and {sequence_bits} sequence bits leaves no timestamp bits"
    )]
    InvalidLayout {
        /// Requested identity field width.
        identity_bits: u8,
        /// Requested sequence field width.
        sequence_bits: u8,
    },
}
