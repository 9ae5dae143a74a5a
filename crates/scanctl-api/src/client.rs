// Gateway HTTP client
//
// Wraps `reqwest::Client` with gateway URL construction and envelope
// unwrapping. Entity endpoints (tasks, reports, etc.) are implemented as
// inherent methods in `endpoints.rs` to keep this module focused on
// transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::elements::GmpResponse;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Options for single-entity fetches.
///
/// `filter` is the canonical filter string; `details` selects the
/// expanded representation (`details=1`) or the summary (`details=0`).
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    pub filter: Option<String>,
    pub details: Option<bool>,
}

/// Raw HTTP client for the management-protocol gateway.
///
/// Handles the `{ status, status_text, data }` envelope and session-cookie
/// authentication. All methods return unwrapped `data` payloads -- the
/// envelope is stripped before the caller sees it.
#[derive(Clone)]
pub struct GmpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GmpClient {
    /// Create a new gateway client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). The `base_url`
    /// should be the gateway root (e.g. `https://scanner.example:9392`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a gateway client with a pre-built `reqwest::Client`.
    ///
    /// Use this when you already have a client with a session cookie in
    /// its jar.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The gateway base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Authenticate against the gateway, storing the session cookie in
    /// the client's jar.
    ///
    /// `POST /gmp/login`
    pub async fn login(&self, username: &str, password: &str) -> Result<(), Error> {
        let url = self.api_url("login");
        debug!(username, "logging in");
        let _: serde_json::Value = self
            .post(
                url,
                &json!({
                    "username": username,
                    "password": password,
                }),
            )
            .await
            .map_err(|e| match e {
                Error::Gmp { status, message } if status == "401" => {
                    Error::Authentication { message }
                }
                other => other,
            })?;
        Ok(())
    }

    /// End the session.
    ///
    /// `POST /gmp/logout`
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("logout");
        debug!("logging out");
        let _: serde_json::Value = self.post(url, &json!({})).await?;
        Ok(())
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a gateway API path: `{base}/gmp/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/gmp/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Send a GET request with entity options as query parameters.
    pub(crate) async fn get_with<T: DeserializeOwned>(
        &self,
        mut url: Url,
        options: &GetOptions,
    ) -> Result<T, Error> {
        {
            let mut query = url.query_pairs_mut();
            if let Some(ref filter) = options.filter {
                query.append_pair("filter", filter);
            }
            if let Some(details) = options.details {
                query.append_pair("details", if details { "1" } else { "0" });
            }
        }
        self.get(url).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        self.parse_envelope(resp).await
    }

    /// Parse the `{ status, status_text, data }` envelope, returning
    /// the deserialized `data` when the protocol status is 2xx or an
    /// `Error::Gmp` otherwise.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        let envelope: GmpResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if !envelope.status.starts_with('2') {
            return Err(Error::Gmp {
                message: envelope
                    .status_text
                    .unwrap_or_else(|| format!("status={}", envelope.status)),
                status: envelope.status,
            });
        }

        serde_json::from_value(envelope.data).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
