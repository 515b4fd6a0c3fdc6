// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the OneLogin client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token endpoint rejected the client credentials.
    #[error("authentication failed with status code {status}")]
    AuthenticationFailed { status: u16 },

    /// The API returned a non-2xx status. The raw response body is kept
    /// for diagnostics.
    #[error("request failed with status code {status}\n{body}")]
    RequestFailed { status: u16, body: String },

    /// A required field was empty or unset. Raised before any network I/O.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The operation has no working implementation in this client.
    #[error("not implemented")]
    NotImplemented,

    /// The provider's API for this operation is known to be broken; the
    /// call is never attempted.
    #[error("OneLogin API is broken")]
    ApiBroken,

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encode or decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
