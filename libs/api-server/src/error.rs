use axum::response::{IntoResponse, Response};

use lastseen_engine::ResolveError;

/// Resolver outcome rendered as an HTTP response.
///
/// The status comes from the resolver's own classification; nothing here
/// reinterprets it. The body is the error's display text.
#[derive(Debug)]
pub struct ApiError(pub ResolveError);

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "event lookup failed");
        } else {
            tracing::debug!(status = status.as_u16(), "no event to return");
        }
        (status, self.0.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use lastseen_api::SourceError;

    use super::*;

    #[test]
    fn response_status_is_carried_from_the_error() {
        let not_found = ApiError(ResolveError::NoRecords).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let internal = ApiError(ResolveError::Query(SourceError::io("down"))).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
