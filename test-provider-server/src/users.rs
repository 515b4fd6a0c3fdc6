// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use onelogin_rs::User;

use super::*;

#[derive(Deserialize, JsonSchema)]
pub struct ListUsersQuery {
    username: Option<String>,
    email: Option<String>,
    limit: Option<String>,
    page: Option<String>,
    cursor: Option<String>,
}

#[endpoint {
    method = GET,
    path = "/api/2/users"
}]
pub async fn list_users(
    rqctx: RequestContext<Arc<ServerContext>>,
    query_params: Query<ListUsersQuery>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let query = query_params.into_inner();

    let filter = UserFilter {
        username: query.username.unwrap_or_default(),
        email: query.email.unwrap_or_default(),
        limit: query.limit.and_then(|v| v.parse().ok()).unwrap_or(0),
        page: query.page.and_then(|v| v.parse().ok()).unwrap_or(0),
    };

    let _ = query.cursor;

    json_response(StatusCode::OK, &apictx.store.list_users(&filter))
}

#[derive(Deserialize, JsonSchema)]
pub struct UserPathParam {
    user_id: i64,
}

#[endpoint {
    method = GET,
    path = "/api/2/users/{user_id}"
}]
pub async fn get_user(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<UserPathParam>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    match apictx.store.get_user(path_param.user_id) {
        Some(user) => json_response(StatusCode::OK, &user),
        None => not_found(path_param.user_id),
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct MutateUserQuery {
    mappings: Option<String>,
    validate_policy: Option<String>,
}

#[endpoint {
    method = POST,
    path = "/api/2/users"
}]
pub async fn create_user(
    rqctx: RequestContext<Arc<ServerContext>>,
    query_params: Query<MutateUserQuery>,
    body: TypedBody<User>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let user = body.into_inner();

    // Directory mappings and policy validation are accepted but not
    // modeled.
    let query = query_params.into_inner();
    let _ = (query.mappings, query.validate_policy);

    if user.username.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "username is required",
        );
    }

    json_response(StatusCode::CREATED, &apictx.store.create_user(user))
}

#[endpoint {
    method = PUT,
    path = "/api/2/users/{user_id}"
}]
pub async fn update_user(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<UserPathParam>,
    query_params: Query<MutateUserQuery>,
    body: TypedBody<User>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let user = body.into_inner();

    let query = query_params.into_inner();
    let _ = (query.mappings, query.validate_policy);

    match apictx.store.update_user(path_param.user_id, user) {
        Some(user) => json_response(StatusCode::OK, &user),
        None => not_found(path_param.user_id),
    }
}

#[endpoint {
    method = DELETE,
    path = "/api/2/users/{user_id}"
}]
pub async fn delete_user(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<UserPathParam>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    if apictx.store.delete_user(path_param.user_id) {
        empty_response(StatusCode::NO_CONTENT)
    } else {
        not_found(path_param.user_id)
    }
}
