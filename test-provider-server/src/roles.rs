// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use onelogin_rs::Role;

use super::*;

#[endpoint {
    method = POST,
    path = "/api/2/roles"
}]
pub async fn create_role(
    rqctx: RequestContext<Arc<ServerContext>>,
    body: TypedBody<Role>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let role = body.into_inner();

    if role.name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "name is required");
    }

    json_response(StatusCode::CREATED, &apictx.store.create_role(role))
}

#[derive(Deserialize, JsonSchema)]
pub struct RolePathParam {
    role_id: i64,
}

#[endpoint {
    method = GET,
    path = "/api/2/roles/{role_id}"
}]
pub async fn get_role(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<RolePathParam>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    match apictx.store.get_role(path_param.role_id) {
        Some(role) => json_response(StatusCode::OK, &role),
        None => not_found(path_param.role_id),
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct RenameRoleRequest {
    name: String,
}

#[endpoint {
    method = PUT,
    path = "/api/2/roles/{role_id}"
}]
pub async fn rename_role(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<RolePathParam>,
    body: TypedBody<RenameRoleRequest>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let request = body.into_inner();

    if apictx.store.rename_role(path_param.role_id, request.name) {
        empty_response(StatusCode::OK)
    } else {
        not_found(path_param.role_id)
    }
}

#[endpoint {
    method = DELETE,
    path = "/api/2/roles/{role_id}"
}]
pub async fn delete_role(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<RolePathParam>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();

    if apictx.store.delete_role(path_param.role_id) {
        empty_response(StatusCode::NO_CONTENT)
    } else {
        not_found(path_param.role_id)
    }
}

#[endpoint {
    method = PUT,
    path = "/api/2/roles/{role_id}/apps"
}]
pub async fn set_role_apps(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<RolePathParam>,
    body: TypedBody<Vec<i64>>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let apps = body.into_inner();

    if apictx.store.set_role_apps(path_param.role_id, apps) {
        empty_response(StatusCode::OK)
    } else {
        not_found(path_param.role_id)
    }
}

#[endpoint {
    method = POST,
    path = "/api/2/roles/{role_id}/users"
}]
pub async fn add_role_users(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<RolePathParam>,
    body: TypedBody<Vec<i64>>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let user_ids = body.into_inner();

    if apictx.store.add_role_users(path_param.role_id, &user_ids) {
        empty_response(StatusCode::OK)
    } else {
        not_found(path_param.role_id)
    }
}

#[endpoint {
    method = DELETE,
    path = "/api/2/roles/{role_id}/users"
}]
pub async fn remove_role_users(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<RolePathParam>,
    body: TypedBody<Vec<i64>>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let user_ids = body.into_inner();

    if apictx.store.remove_role_users(path_param.role_id, &user_ids) {
        empty_response(StatusCode::OK)
    } else {
        not_found(path_param.role_id)
    }
}

#[endpoint {
    method = POST,
    path = "/api/2/roles/{role_id}/admins"
}]
pub async fn add_role_admins(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<RolePathParam>,
    body: TypedBody<Vec<i64>>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let user_ids = body.into_inner();

    if apictx.store.add_role_admins(path_param.role_id, &user_ids) {
        empty_response(StatusCode::OK)
    } else {
        not_found(path_param.role_id)
    }
}

#[endpoint {
    method = DELETE,
    path = "/api/2/roles/{role_id}/admins"
}]
pub async fn remove_role_admins(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_param: Path<RolePathParam>,
    body: TypedBody<Vec<i64>>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let path_param = path_param.into_inner();
    let user_ids = body.into_inner();

    if apictx.store.remove_role_admins(path_param.role_id, &user_ids) {
        empty_response(StatusCode::OK)
    } else {
        not_found(path_param.role_id)
    }
}
