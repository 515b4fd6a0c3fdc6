// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::time::Duration;
use std::time::Instant;

use reqwest::Method;
use reqwest::blocking::Response;
use serde::de::DeserializeOwned;
use slog::Logger;
use slog::debug;

use super::*;

/// Per-request timeout applied when [`ClientConfig::timeout`] is unset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`Client`]. Credentials are supplied once at
/// construction and are immutable for the client's lifetime.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,

    /// The account subdomain, as in `https://{subdomain}.onelogin.com`.
    pub subdomain: String,

    /// Timeout for one logical operation. The token fetch embedded in a
    /// call shares this window with the call itself.
    pub timeout: Option<Duration>,

    /// Overrides the URL derived from the subdomain. Used to point the
    /// client at a test server or a private deployment.
    pub base_url: Option<String>,
}

impl ClientConfig {
    fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.onelogin.com", self.subdomain),
        }
    }
}

/// A bearer token issued by the client credentials grant.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AccessToken {
    #[serde(default)]
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
}

/// Common paging parameters for list endpoints. Each value is sent only
/// when it differs from its zero value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paging {
    pub limit: i64,
    pub page: i64,
    pub cursor: String,
}

pub(crate) fn append_paging(
    params: &mut BTreeMap<String, String>,
    paging: &Paging,
) {
    if paging.limit > 0 {
        params.insert("limit".to_string(), paging.limit.to_string());
    }
    if paging.page > 0 {
        params.insert("page".to_string(), paging.page.to_string());
    }
    if !paging.cursor.is_empty() {
        params.insert("cursor".to_string(), paging.cursor.clone());
    }
}

/// Synchronous OneLogin API client.
///
/// Every public operation blocks until its HTTP exchange(s) complete. A
/// fresh access token is fetched for each outbound request; nothing is
/// cached between calls.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    http: reqwest::blocking::Client,
    log: Logger,
}

impl Client {
    /// Create a client and immediately fetch a token, failing fast on bad
    /// credentials.
    pub fn new(log: Logger, config: ClientConfig) -> Result<Self> {
        let client = Self::with_config(log, config)?;
        client.fetch_token()?;
        Ok(client)
    }

    /// Create a client without contacting the token endpoint. Used by
    /// tests that must observe validation failures before any network I/O.
    pub fn with_config(log: Logger, config: ClientConfig) -> Result<Self> {
        // Timeouts are applied per logical operation, not here; every
        // request this client sends carries an explicit deadline.
        let http = reqwest::blocking::Client::builder().build()?;

        Ok(Self { config, http, log })
    }

    fn timeout(&self) -> Duration {
        self.config.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Exchange the configured client id and secret for a bearer token.
    ///
    /// Tokens are deliberately not cached: this runs once per outbound
    /// request, plus once at construction.
    pub fn fetch_token(&self) -> Result<AccessToken> {
        self.fetch_token_before(Instant::now() + self.timeout())
    }

    /// Token fetch constrained to the remaining slice of an operation's
    /// deadline.
    fn fetch_token_before(&self, deadline: Instant) -> Result<AccessToken> {
        let url = format!("{}/auth/oauth2/v2/token", self.config.base_url());

        debug!(self.log, "fetching access token"; "url" => &url);

        let response = self
            .http
            .post(&url)
            .timeout(deadline.saturating_duration_since(Instant::now()))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&serde_json::json!({
                "grant_type": "client_credentials",
            }))
            .send()?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        Ok(response.json()?)
    }

    /// Execute a request and decode the 2xx response body into `T`.
    pub(crate) fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &BTreeMap<String, String>,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let response = self.send(method, path, query, body)?;
        Ok(response.json()?)
    }

    /// Execute a request where no response body is expected; any 2xx body
    /// is discarded.
    pub(crate) fn execute_empty(
        &self,
        method: Method,
        path: &str,
        query: &BTreeMap<String, String>,
        body: Option<&serde_json::Value>,
    ) -> Result<()> {
        self.send(method, path, query, body)?;
        Ok(())
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        query: &BTreeMap<String, String>,
        body: Option<&serde_json::Value>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.config.base_url(), path);

        debug!(self.log, "executing request";
            "method" => method.as_str().to_string(),
            "url" => &url,
        );

        // One deadline spans the whole logical call: the embedded token
        // fetch and the request itself draw from the same window.
        let deadline = Instant::now() + self.timeout();

        // One fresh token per request.
        let token = self.fetch_token_before(deadline)?;

        let mut builder = self.http.request(method, &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        builder = builder
            .timeout(deadline.saturating_duration_since(Instant::now()))
            .bearer_auth(&token.access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_to_subdomain() {
        let config = ClientConfig {
            subdomain: "example".to_string(),
            ..Default::default()
        };

        assert_eq!(config.base_url(), "https://example.onelogin.com");
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let config = ClientConfig {
            subdomain: "example".to_string(),
            base_url: Some("http://127.0.0.1:4567/".to_string()),
            ..Default::default()
        };

        assert_eq!(config.base_url(), "http://127.0.0.1:4567");
    }

    #[test]
    fn paging_params_skip_zero_values() {
        let mut params = BTreeMap::new();
        append_paging(&mut params, &Paging::default());
        assert!(params.is_empty());

        let mut params = BTreeMap::new();
        append_paging(
            &mut params,
            &Paging { limit: 3, page: 1, cursor: String::new() },
        );
        assert_eq!(params.get("limit").map(String::as_str), Some("3"));
        assert_eq!(params.get("page").map(String::as_str), Some("1"));
        assert!(!params.contains_key("cursor"));
    }

    #[test]
    fn paging_params_include_cursor() {
        let mut params = BTreeMap::new();
        append_paging(
            &mut params,
            &Paging { limit: 0, page: 0, cursor: "abc".to_string() },
        );
        assert_eq!(params.get("cursor").map(String::as_str), Some("abc"));
        assert!(!params.contains_key("limit"));
        assert!(!params.contains_key("page"));
    }
}
