use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use lastseen_api::{Event, Record, RecordSource, now_secs};

use crate::error::ResolveError;
use crate::measures::Measures;

// ═══════════════════════════════════════════════════════════════
//  EventResolver
// ═══════════════════════════════════════════════════════════════

/// Picks the newest live record for a device and decodes it.
///
/// Stateless apart from the shared source and metric handles, so one
/// instance serves every request.
pub struct EventResolver {
    source: Arc<dyn RecordSource>,
    measures: Measures,
}

impl EventResolver {
    pub fn new(source: Arc<dyn RecordSource>, measures: Measures) -> Self {
        Self { source, measures }
    }

    /// Latest live event for `device_id`, looking at most `limit` records back.
    pub async fn resolve(
        &self,
        device_id: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Event, ResolveError> {
        self.resolve_at(device_id, limit, now_secs(), cancel).await
    }

    /// Same as [`resolve`](Self::resolve) with an explicit clock.
    ///
    /// The source's newest-first order is trusted: the first record with
    /// `death_date > now` is the one decoded, even if a later record would
    /// also qualify. A corrupt first pick is reported as `NoRecords`, never
    /// skipped over.
    pub async fn resolve_at(
        &self,
        device_id: &str,
        limit: usize,
        now: i64,
        cancel: &CancellationToken,
    ) -> Result<Event, ResolveError> {
        let records = self.fetch(device_id, limit, cancel).await?;

        let record = records
            .iter()
            .find(|r| !r.is_expired_at(now))
            .ok_or_else(|| {
                tracing::debug!(device_id, candidates = records.len(), "all records expired");
                ResolveError::NoRecords
            })?;

        self.decode(record).ok_or(ResolveError::NoRecords)
    }

    /// Every live, decodable event for `device_id` in source order.
    ///
    /// Each live record that fails to decode is counted once and dropped.
    pub async fn resolve_all(
        &self,
        device_id: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Event>, ResolveError> {
        let now = now_secs();
        let records = self.fetch(device_id, limit, cancel).await?;

        let events: Vec<Event> = records
            .iter()
            .filter(|r| !r.is_expired_at(now))
            .filter_map(|r| self.decode(r))
            .collect();

        if events.is_empty() {
            return Err(ResolveError::NoRecords);
        }
        Ok(events)
    }

    async fn fetch(
        &self,
        device_id: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Record>, ResolveError> {
        if device_id.is_empty() {
            return Err(ResolveError::NoRecords);
        }

        let records = self
            .source
            .get_records(device_id, limit, cancel)
            .await
            .map_err(ResolveError::Query)?;

        if records.is_empty() {
            tracing::debug!(device_id, limit, "no records");
            return Err(ResolveError::NoRecords);
        }
        Ok(records)
    }

    fn decode(&self, record: &Record) -> Option<Event> {
        match Event::from_slice(&record.data) {
            Ok(event) => Some(event),
            Err(e) => {
                self.measures.unmarshal_failure();
                tracing::warn!(
                    record_id = record.id,
                    device_id = %record.device_id,
                    error = %e,
                    "failed to unmarshal event"
                );
                None
            }
        }
    }
}
