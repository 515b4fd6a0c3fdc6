// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An in-memory OneLogin lookalike for exercising the client against.
//! It implements the slice of the v2 API the client uses, with fixed
//! test credentials.

use std::net::SocketAddr;
use std::sync::Arc;

use dropshot::ApiDescription;
use dropshot::Body;
use dropshot::ConfigDropshot;
use dropshot::ConfigLogging;
use dropshot::ConfigLoggingLevel;
use dropshot::HttpError;
use dropshot::HttpServer;
use dropshot::Path;
use dropshot::Query;
use dropshot::RequestContext;
use dropshot::ServerBuilder;
use dropshot::TypedBody;
use dropshot::endpoint;
use http::Response;
use http::StatusCode;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

mod apps;
mod auth;
mod connectors;
mod roles;
mod store;
mod users;

pub use store::InMemoryStore;
pub use store::OpCounts;
pub use store::SEEDED_CONNECTOR_ID;
pub use store::StoreState;
pub use store::Stored;

pub(crate) use store::AppFilter;
pub(crate) use store::UserFilter;

/// The only credentials the token endpoint accepts.
pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";

/// The only bearer token the API endpoints accept.
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

pub struct ServerContext {
    pub store: Arc<InMemoryStore>,
}

pub(crate) fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Body>, HttpError> {
    let body = serde_json::to_string(body)
        .map_err(|e| HttpError::for_internal_error(e.to_string()))?;

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(body.into())
        .map_err(HttpError::from)
}

pub(crate) fn empty_response(
    status: StatusCode,
) -> Result<Response<Body>, HttpError> {
    Response::builder()
        .status(status)
        .body(Body::empty())
        .map_err(HttpError::from)
}

pub(crate) fn error_response(
    status: StatusCode,
    message: &str,
) -> Result<Response<Body>, HttpError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({
                "message": message,
            })
            .to_string()
            .into(),
        )
        .map_err(HttpError::from)
}

pub(crate) fn not_found(id: i64) -> Result<Response<Body>, HttpError> {
    error_response(StatusCode::NOT_FOUND, &format!("{id} not found"))
}

/// Whether the request carries the test bearer token.
pub(crate) fn authorized(rqctx: &RequestContext<Arc<ServerContext>>) -> bool {
    rqctx
        .request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token == TEST_ACCESS_TOKEN)
        .unwrap_or(false)
}

pub(crate) fn unauthorized() -> Result<Response<Body>, HttpError> {
    error_response(StatusCode::UNAUTHORIZED, "missing or invalid bearer token")
}

pub fn create_http_server(
    bind_addr: Option<SocketAddr>,
) -> anyhow::Result<HttpServer<Arc<ServerContext>>> {
    create_http_server_with_store(bind_addr, Arc::new(InMemoryStore::new()))
}

pub fn create_http_server_with_store(
    bind_addr: Option<SocketAddr>,
    store: Arc<InMemoryStore>,
) -> anyhow::Result<HttpServer<Arc<ServerContext>>> {
    let config_logging =
        ConfigLogging::StderrTerminal { level: ConfigLoggingLevel::Info };
    let log = config_logging.to_logger("onelogin-test-provider-server")?;

    let mut api = ApiDescription::new();

    api.register(auth::generate_token)?;

    api.register(apps::list_apps)?;
    api.register(apps::get_app)?;
    api.register(apps::create_app)?;
    api.register(apps::update_app)?;
    api.register(apps::delete_app)?;

    api.register(connectors::list_connectors)?;

    api.register(users::list_users)?;
    api.register(users::get_user)?;
    api.register(users::create_user)?;
    api.register(users::update_user)?;
    api.register(users::delete_user)?;

    api.register(roles::create_role)?;
    api.register(roles::get_role)?;
    api.register(roles::rename_role)?;
    api.register(roles::delete_role)?;
    api.register(roles::set_role_apps)?;
    api.register(roles::add_role_users)?;
    api.register(roles::remove_role_users)?;
    api.register(roles::add_role_admins)?;
    api.register(roles::remove_role_admins)?;

    let ctx = Arc::new(ServerContext { store });

    let bind_address =
        bind_addr.unwrap_or_else(|| "127.0.0.1:0".parse().unwrap());

    let server = ServerBuilder::new(api, ctx, log)
        .config(ConfigDropshot { bind_address, ..Default::default() })
        .start()?;

    Ok(server)
}
