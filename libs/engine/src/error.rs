use http::StatusCode;
use lastseen_api::SourceError;

/// Why the resolver could not produce an event.
///
/// Empty results, all-expired results and corrupt payloads are all
/// `NoRecords`: callers cannot tell "never reported" from "reported but
/// stale or bad". Corruption is only visible through the failure counter.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to get records: {0}")]
    Query(#[source] SourceError),

    #[error("No events found")]
    NoRecords,
}

impl ResolveError {
    /// HTTP status this outcome maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ResolveError::NoRecords => StatusCode::NOT_FOUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_classification() {
        let query = ResolveError::Query(SourceError::new("get records test error"));
        assert_eq!(query.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(query.to_string().contains("get records test error"));

        assert_eq!(ResolveError::NoRecords.status(), StatusCode::NOT_FOUND);
        assert_eq!(ResolveError::NoRecords.to_string(), "No events found");
    }
}
