use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{Record, SourceError};

/// Storage capability the resolver reads from.
///
/// Implementations own persistence entirely; the engine never names a
/// concrete backend. One instance is shared by every request, so it must
/// be safe to call concurrently.
pub trait RecordSource: Send + Sync {
    /// Return up to `limit` records for `device_id`, newest first.
    ///
    /// `cancel` fires when the caller no longer wants the answer. Backends
    /// that can abandon in-flight work should stop and return
    /// [`SourceError::cancelled`].
    fn get_records(
        &self,
        device_id: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Record>, SourceError>> + Send + '_>>;
}
