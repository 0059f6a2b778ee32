use farewatch_core::CoreError;
use farewatch_notify::NotifyError;
use farewatch_store::StoreError;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::gate::GateClosed;

/// Why one alert's processing stopped early.
///
/// These never abort the batch; the scheduler records them and moves on.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("record error: {0}")]
    Record(#[from] CoreError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("price fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("message rendering failed: {0}")]
    Render(#[from] NotifyError),

    #[error(transparent)]
    Gate(#[from] GateClosed),
}
