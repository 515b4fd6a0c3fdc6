// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

#[derive(Deserialize, JsonSchema)]
pub struct ListConnectorsQuery {
    name: Option<String>,
    auth_method: Option<String>,
    limit: Option<String>,
    page: Option<String>,
    cursor: Option<String>,
}

#[endpoint {
    method = GET,
    path = "/api/2/connectors"
}]
pub async fn list_connectors(
    rqctx: RequestContext<Arc<ServerContext>>,
    query_params: Query<ListConnectorsQuery>,
) -> Result<Response<Body>, HttpError> {
    if !authorized(&rqctx) {
        return unauthorized();
    }

    let apictx = rqctx.context();
    let query = query_params.into_inner();

    // The seeded connector set is small enough that the remaining
    // filters are not modeled.
    let _ = (query.auth_method, query.limit, query.page, query.cursor);

    let connectors =
        apictx.store.list_connectors(&query.name.unwrap_or_default());

    json_response(StatusCode::OK, &connectors)
}
