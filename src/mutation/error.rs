use web_time::Duration;

/// Why a task mutation did not go through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// The client knows it is offline; nothing was attempted.
    #[error("network unavailable")]
    NetworkUnavailable,
    #[error("request failed{}: {detail}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    MutationFailed { status: Option<u16>, detail: String },
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("session expired")]
    SessionExpired,
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },
}

impl MutationError {
    pub fn failed(detail: impl Into<String>) -> Self {
        MutationError::MutationFailed {
            status: None,
            detail: detail.into(),
        }
    }

    /// Map an HTTP status to the taxonomy. `retry_after` comes from the
    /// response header when present.
    pub fn from_status(status: u16, detail: impl Into<String>, retry_after: Option<Duration>) -> Self {
        match status {
            401 | 403 | 419 => MutationError::SessionExpired,
            400 | 422 => MutationError::ValidationFailed(detail.into()),
            429 => MutationError::RateLimited {
                retry_after: retry_after.unwrap_or(Duration::from_secs(5)),
            },
            _ => MutationError::MutationFailed {
                status: Some(status),
                detail: detail.into(),
            },
        }
    }

    /// Text for the toast. Technical detail stays in the log.
    pub fn user_message(&self) -> String {
        match self {
            MutationError::NetworkUnavailable => "You're offline. Try again when connected.".into(),
            MutationError::MutationFailed { .. } => "Couldn't save your change.".into(),
            MutationError::ValidationFailed(msg) => msg.clone(),
            MutationError::SessionExpired => "Your session expired. Refresh to continue.".into(),
            MutationError::RateLimited { retry_after } => {
                format!("Too many requests. Retrying in {}s.", retry_after.as_secs().max(1))
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MutationError::MutationFailed { .. } | MutationError::RateLimited { .. }
        )
    }
}
