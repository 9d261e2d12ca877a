use thiserror::Error;

/// Failure of a single upstream source. Every variant names the source so one
/// failing view can be reported without affecting the others.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name} is not configured: {reason}")]
    NotConfigured {
        source_name: &'static str,
        reason: String,
    },

    #[error("{source_name} request failed: {source}")]
    Http {
        source_name: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{source_name} returned {status}: {body}")]
    Status {
        source_name: &'static str,
        status: u16,
        body: String,
    },

    #[error("{source_name} authentication failed: {message}")]
    Auth {
        source_name: &'static str,
        message: String,
    },

    #[error("{source_name} rate limit exceeded")]
    RateLimited { source_name: &'static str },

    #[error("failed to decode {source_name} response: {message}")]
    Decode {
        source_name: &'static str,
        message: String,
    },
}

impl SourceError {
    pub fn not_configured(source_name: &'static str, reason: impl Into<String>) -> Self {
        SourceError::NotConfigured {
            source_name,
            reason: reason.into(),
        }
    }

    /// Adapter for `map_err` on reqwest futures
    pub fn http(source_name: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| SourceError::Http {
            source_name,
            source,
        }
    }

    pub fn decode(source_name: &'static str, message: impl ToString) -> Self {
        SourceError::Decode {
            source_name,
            message: message.to_string(),
        }
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            SourceError::NotConfigured { source_name, .. }
            | SourceError::Http { source_name, .. }
            | SourceError::Status { source_name, .. }
            | SourceError::Auth { source_name, .. }
            | SourceError::RateLimited { source_name }
            | SourceError::Decode { source_name, .. } => source_name,
        }
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, SourceError::NotConfigured { .. })
    }
}

/// Read the body of a non-2xx response into a `Status` error.
pub(crate) async fn status_error(source_name: &'static str, response: reqwest::Response) -> SourceError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    SourceError::Status {
        source_name,
        status,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_source() {
        let err = SourceError::not_configured("goodreads", "GOODREADS_RSS_URL is not set");
        assert_eq!(
            err.to_string(),
            "goodreads is not configured: GOODREADS_RSS_URL is not set"
        );
        assert!(err.is_not_configured());
        assert_eq!(err.source_name(), "goodreads");
    }

    #[test]
    fn test_status_display() {
        let err = SourceError::Status {
            source_name: "trakt",
            status: 500,
            body: "oops".to_string(),
        };
        assert_eq!(err.to_string(), "trakt returned 500: oops");
        assert!(!err.is_not_configured());
    }
}
