// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use reqwest::Method;

use super::*;

/// A connector: the provider-side template an app is created from.
/// Connectors are read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Connector {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub auth_method: i64,

    #[serde(default)]
    pub allows_new_parameters: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Filters for [`Client::list_connectors`].
#[derive(Debug, Clone, Default)]
pub struct ConnectorQuery {
    pub paging: Paging,
    pub name: String,
    pub auth_method: AuthMethod,
}

impl ConnectorQuery {
    pub(crate) fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();

        if !self.name.is_empty() {
            params.insert("name".to_string(), self.name.clone());
        }

        if self.auth_method != AuthMethod::Unset {
            params.insert(
                "auth_method".to_string(),
                self.auth_method.to_wire().to_string(),
            );
        }

        append_paging(&mut params, &self.paging);
        params
    }
}

impl Client {
    pub fn list_connectors(
        &self,
        query: &ConnectorQuery,
    ) -> Result<Vec<Connector>> {
        self.execute(
            Method::GET,
            "/api/2/connectors",
            &query.to_params(),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_query_params_skip_unset_filters() {
        let params = ConnectorQuery::default().to_params();
        assert!(params.is_empty());
    }

    #[test]
    fn connector_query_params_full() {
        let params = ConnectorQuery {
            paging: Paging { limit: 10, page: 0, cursor: String::new() },
            name: "Google".to_string(),
            auth_method: AuthMethod::Saml,
        }
        .to_params();

        assert_eq!(params.get("name").map(String::as_str), Some("Google"));
        assert_eq!(params.get("auth_method").map(String::as_str), Some("2"));
        assert_eq!(params.get("limit").map(String::as_str), Some("10"));
        assert!(!params.contains_key("page"));
    }
}
