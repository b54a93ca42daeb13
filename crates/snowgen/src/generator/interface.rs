use crate::{Layout, Poll, SnowflakeId};

/// A minimal interface for generating [`SnowflakeId`]s.
///
/// Implemented by [`Generator`]; async extensions and test helpers are written
/// against this trait.
///
/// [`Generator`]: crate::Generator
pub trait IdGenerator {
    /// Generates the next ID, blocking until one can be issued.
    fn next_id(&self) -> SnowflakeId;

    /// Attempts to generate the next ID without blocking.
    ///
    /// The returned [`Poll`] contains either:
    /// - the newly generated ID, or
    /// - a duration (in milliseconds) to wait before trying again.
    fn poll_id(&self) -> Poll;

    /// The layout used to pack and decode IDs.
    fn layout(&self) -> Layout;
}
