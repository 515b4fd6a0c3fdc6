// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use onelogin_rs::App;

use super::*;

#[derive(Deserialize, JsonSchema)]
pub struct ListAppsQuery {
    name: Option<String>,
    connector_id: Option<String>,
    auth_method: Option<String>,
    limit: Option<String>,
    page: Option<String>,
    cursor: Option<String>,
}

#[endpoint {
    method = GET,
    path = "/api/2/apps"
}]
pub async fn list_apps(
    rqctx: RequestContext<Arc<ServerContext>>,
    query_params: Query<ListAppsQuery>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let query = query_params.into_inner();

    let filter = AppFilter {
        name: query.name.unwrap_or_default(),
        connector_id: query
            .connector_id
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        auth_method: query.auth_method.and_then(|v| v.parse().ok()),
        limit: query.limit.and_then(|v| v.parse().ok()).unwrap_or(0),
        page: query.page.and_then(|v| v.parse().ok()).unwrap_or(0),
    };

    // Cursor paging is not modeled here.
    let _ = query.cursor;

    json_response(StatusCode::OK, &apictx.store.list_apps(&filter))
}

#[derive(Deserialize, JsonSchema)]
pub struct AppPathParam {
    app_id: i64,
}

#[endpoint {
    method = GET,
    path = "/api/2/apps/{app_id}"
}]
pub async fn get_app(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<AppPathParam>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    let delay = apictx.store.response_delay();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    match apictx.store.get_app(path_param.app_id) {
        Some(app) => json_response(StatusCode::OK, &app),
        None => not_found(path_param.app_id),
    }
}

#[endpoint {
    method = POST,
    path = "/api/2/apps"
}]
pub async fn create_app(
    rqctx: RequestContext<Arc<ServerContext>>,
    body: TypedBody<App>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let app = body.into_inner();

    if app.name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "name is required");
    }

    json_response(StatusCode::CREATED, &apictx.store.create_app(app))
}

#[endpoint {
    method = PUT,
    path = "/api/2/apps/{app_id}"
}]
pub async fn update_app(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<AppPathParam>,
    body: TypedBody<App>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let app = body.into_inner();

    match apictx.store.update_app(path_param.app_id, app) {
        Some(app) => json_response(StatusCode::OK, &app),
        None => not_found(path_param.app_id),
    }
}

#[endpoint {
    method = DELETE,
    path = "/api/2/apps/{app_id}"
}]
pub async fn delete_app(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<AppPathParam>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    if apictx.store.delete_app(path_param.app_id) {
        empty_response(StatusCode::NO_CONTENT)
    } else {
        not_found(path_param.app_id)
    }
}
