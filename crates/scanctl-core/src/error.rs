// ── Core error types ──
//
// User-facing errors from scanctl-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<scanctl_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
///
/// `Clone` is required because a loader both persists the error into the
/// entity store and returns it to its caller.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to gateway at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not connected to a gateway")]
    NotConnected,

    #[error("Gateway connection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Protocol errors (wrapped, not exposed raw) ───────────────────
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        /// The protocol status code (e.g. "400").
        status: Option<String>,
    },

    // ── Supersession ─────────────────────────────────────────────────
    /// A load was deliberately abandoned. Clears the in-flight flag but
    /// is never persisted as an error.
    #[error("Load cancelled")]
    Cancelled,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether this error should be persisted into an entity store's
    /// error map. Cancellations only transition the loading flag.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<scanctl_api::Error> for CoreError {
    fn from(err: scanctl_api::Error) -> Self {
        match err {
            scanctl_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            scanctl_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            scanctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    CoreError::NotFound {
                        entity_type: "resource".into(),
                        identifier: e.url().map(|u| u.path().to_string()).unwrap_or_default(),
                    }
                } else {
                    CoreError::Protocol {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16().to_string()),
                    }
                }
            }
            scanctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            scanctl_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            scanctl_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            scanctl_api::Error::Gmp { status, message } if status == "404" => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            scanctl_api::Error::Gmp { status, message } => CoreError::Protocol {
                message,
                status: Some(status),
            },
            scanctl_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            scanctl_api::Error::Cancelled => CoreError::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_predicate() {
        assert!(CoreError::Cancelled.is_cancellation());
        assert!(
            !CoreError::Protocol {
                message: "boom".into(),
                status: Some("400".into()),
            }
            .is_cancellation()
        );
    }

    #[test]
    fn api_cancelled_maps_to_core_cancelled() {
        let core: CoreError = scanctl_api::Error::Cancelled.into();
        assert!(core.is_cancellation());
    }

    #[test]
    fn gmp_404_maps_to_not_found() {
        let core: CoreError = scanctl_api::Error::Gmp {
            status: "404".into(),
            message: "Task not found".into(),
        }
        .into();
        assert!(matches!(core, CoreError::NotFound { .. }));
    }
}
