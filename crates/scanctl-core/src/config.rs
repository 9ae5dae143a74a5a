// ── Session configuration ──
//
// Connection parameters for a gateway session. Built by scanctl-config
// from profiles, or directly by library consumers.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Default threshold for the two-phase report loader: summaries reporting
/// fewer filtered results than this are upgraded to a detailed fetch.
pub const DEFAULT_REPORT_RESULTS_THRESHOLD: u64 = 25_000;

/// TLS verification policy for the gateway connection.
#[derive(Debug, Clone)]
pub enum TlsVerification {
    SystemDefaults,
    CustomCa(PathBuf),
    DangerAcceptInvalid,
}

/// Gateway credentials. The gateway requires a session login; passwords
/// stay wrapped in `SecretString` until the login call.
#[derive(Debug, Clone)]
pub struct AuthCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Full configuration for a [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Gateway base URL (e.g. `https://scanner.example:9392`).
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Result-count threshold for the two-phase report loader.
    pub report_results_threshold: u64,
}

impl SessionConfig {
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::SystemDefaults,
            timeout: Duration::from_secs(30),
            report_results_threshold: DEFAULT_REPORT_RESULTS_THRESHOLD,
        }
    }
}
