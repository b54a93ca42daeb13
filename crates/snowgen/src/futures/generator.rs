use core::{future::Future, time::Duration};

use super::SleepProvider;
use crate::{IdGenerator, Poll, SnowflakeId};

/// Extension trait for awaiting IDs instead of blocking a thread.
///
/// The future drives [`IdGenerator::poll_id`]: whenever the generator reports
/// [`Poll::Pending`] it sleeps through the given [`SleepProvider`] for the
/// suggested duration and retries. The generator's mutex is never held across
/// an `.await`, so an exhausted sequence or a backward clock jump delays only
/// the waiting task, not the runtime worker it runs on.
pub trait GeneratorAsyncExt {
    /// Returns a future that resolves to the next available ID, sleeping with
    /// `S` while the generator is not ready.
    fn next_id_async_with<S>(&self) -> impl Future<Output = SnowflakeId> + Send
    where
        S: SleepProvider;
}

impl<G> GeneratorAsyncExt for G
where
    G: IdGenerator + Sync,
{
    fn next_id_async_with<S>(&self) -> impl Future<Output = SnowflakeId> + Send
    where
        S: SleepProvider,
    {
        async {
            loop {
                let dur = match self.poll_id() {
                    Poll::Ready { id } => return id,
                    Poll::Pending { yield_for } => Duration::from_millis(yield_for),
                };
                S::sleep_for(dur).await;
            }
        }
    }
}
