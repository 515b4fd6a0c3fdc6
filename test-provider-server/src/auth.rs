// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::SecondsFormat;
use chrono::Utc;

use super::*;

#[derive(Deserialize, JsonSchema)]
pub struct TokenRequest {
    grant_type: String,
}

#[endpoint {
    method = POST,
    path = "/auth/oauth2/v2/token"
}]
pub async fn generate_token(
    rqctx: RequestContext<Arc<ServerContext>>,
    body: TypedBody<TokenRequest>,
) -> Result<Response<Body>, HttpError> {
    let request = body.into_inner();

    let delay = rqctx.context().store.response_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let expected = format!(
        "Basic {}",
        STANDARD.encode(format!("{TEST_CLIENT_ID}:{TEST_CLIENT_SECRET}")),
    );

    let credentials_ok = rqctx
        .request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == expected)
        .unwrap_or(false);

    if !credentials_ok {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "invalid client credentials",
        );
    }

    if request.grant_type != "client_credentials" {
        return error_response(
            StatusCode::BAD_REQUEST,
            "unsupported grant type",
        );
    }

    json_response(
        StatusCode::OK,
        &serde_json::json!({
            "access_token": TEST_ACCESS_TOKEN,
            "created_at": Utc::now()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            "expires_in": 36000,
            "refresh_token": "",
            "token_type": "bearer",
            "account_id": 111111,
        }),
    )
}
