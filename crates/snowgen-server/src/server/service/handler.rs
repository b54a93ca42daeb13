use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use snowgen::{GeneratorAsyncTokioExt, IdGenerator, SnowflakeId};

/// Body of a successful `GET /`.
///
/// The ID travels as a decimal string so clients with 53-bit numbers keep
/// every digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    #[serde(with = "snowgen::as_decimal_snow")]
    pub id: SnowflakeId,
}

/// Shared state handed to every request: one generator for the process.
pub struct IdService<G> {
    generator: Arc<G>,
}

impl<G> Clone for IdService<G> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<G> IdService<G>
where
    G: IdGenerator + Send + Sync + 'static,
{
    pub fn new(generator: G) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }

    /// Builds the HTTP routes:
    ///
    /// - `GET /` -> `{"id":"<decimal>"}`
    /// - `GET /healthz` -> `ok`
    pub fn router(self) -> Router {
        Router::new()
            .route("/", get(next_id::<G>))
            .route("/healthz", get(health))
            .with_state(self)
    }
}

#[tracing::instrument(level = "debug", skip_all)]
async fn next_id<G>(State(service): State<IdService<G>>) -> Json<IdResponse>
where
    G: IdGenerator + Send + Sync + 'static,
{
    // Awaits instead of blocking so a backward clock jump never stalls a
    // runtime worker.
    let id = service.generator.next_id_async().await;
    tracing::debug!(%id, "issued id");
    Json(IdResponse { id })
}

async fn health() -> &'static str {
    "ok"
}
