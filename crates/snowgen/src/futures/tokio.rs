use core::{future::Future, time::Duration};

use super::{GeneratorAsyncExt, SleepProvider};
use crate::{IdGenerator, SnowflakeId};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    async fn sleep_for(dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// Yields to the scheduler instead of arming a timer. Lower latency when few
/// tasks compete, at the cost of a tighter polling loop and more CPU under
/// load.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    async fn sleep_for(_dur: Duration) {
        tokio::task::yield_now().await;
    }
}

/// Extension trait for asynchronously generating IDs on the
/// [`tokio`](https://docs.rs/tokio) runtime with [`TokioSleep`].
///
/// # Example
///
/// ```
/// use snowgen::{Generator, GeneratorAsyncTokioExt, SystemClock};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let generator = Generator::with_default_layout(4, SystemClock).unwrap();
/// let id = generator.next_id_async().await;
/// assert_eq!(generator.decode(id).identity, 4);
/// # }
/// ```
pub trait GeneratorAsyncTokioExt {
    /// Returns a future that resolves to the next available ID.
    fn next_id_async(&self) -> impl Future<Output = SnowflakeId> + Send;
}

impl<G> GeneratorAsyncTokioExt for G
where
    G: IdGenerator + Sync,
{
    fn next_id_async(&self) -> impl Future<Output = SnowflakeId> + Send {
        <Self as GeneratorAsyncExt>::next_id_async_with::<TokioSleep>(self)
    }
}
