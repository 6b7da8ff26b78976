use thiserror::Error;

/// Failure to resolve or dispatch a request before any task result exists.
///
/// The `Display` text is what the caller sees after `Request error: `.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Looks like you didn't specify a task")]
    NoTaskSpecified,

    #[error("No such task")]
    NoSuchTask,

    #[error("Empty real ttl header")]
    EmptyRealTtlHeader,

    #[error("Empty real IP header, looks like you misconfigured your reverse-proxy")]
    EmptyRealIpHeader,

    #[error("Malformed IP: {0}")]
    MalformedIp(String),

    #[error("Malformed path: {0}")]
    MalformedPath(String),

    #[error("Malformed TTL: '{0}'")]
    MalformedTtl(String),

    #[error("Unable to determine client address")]
    MissingPeerAddress,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<knock_core::CoreError> for ApiError {
    fn from(err: knock_core::CoreError) -> Self {
        match err {
            knock_core::CoreError::UnknownTask(_) => ApiError::NoSuchTask,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::{StatusCode, header};

        // 418 for every request that never reached a task.
        let parts = (
            StatusCode::IM_A_TEAPOT,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            format!("Request error: {self}\n"),
        );
        axum::response::IntoResponse::into_response(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_maps_to_no_such_task() {
        let err = ApiError::from(knock_core::CoreError::UnknownTask("ssh".into()));
        assert_eq!(err, ApiError::NoSuchTask);
        assert_eq!(err.to_string(), "No such task");
    }

    #[test]
    fn messages() {
        assert_eq!(
            ApiError::MalformedIp("1.2.3".into()).to_string(),
            "Malformed IP: 1.2.3"
        );
        assert!(
            ApiError::EmptyRealIpHeader
                .to_string()
                .contains("misconfigured your reverse-proxy")
        );
    }
}
