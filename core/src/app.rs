// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use reqwest::Method;

use super::*;

/// A OneLogin application. Optional fields are omitted from request bodies
/// when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct App {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default)]
    pub connector_id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    /// Raw wire value; see [`AuthMethod`] for the query-filter encoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_ids: Vec<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_assumed_signin: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning: Option<Provisioning>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso: Option<Sso>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Configuration>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement_point: Option<EnforcementPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Provisioning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Sso {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acs_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sls_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<Certificate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Certificate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// SSO protocol configuration. OIDC and SAML apps populate disjoint
/// subsets of these fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expiration_minutes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_application_type: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint_auth_method: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_expiration_minutes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_arn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idp_list: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_logout_redirect_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<String>,

    #[serde(
        default,
        rename = "relaystate",
        skip_serializing_if = "Option::is_none"
    )]
    pub relay_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<String>,

    #[serde(
        default,
        rename = "saml_notonorafter",
        skip_serializing_if = "Option::is_none"
    )]
    pub saml_not_valid_on_or_after: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_attribute_value_tags: Option<String>,

    #[serde(
        default,
        rename = "saml_initiater_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub saml_initiater_id: Option<String>,

    #[serde(
        default,
        rename = "saml_notbefore",
        skip_serializing_if = "Option::is_none"
    )]
    pub saml_not_valid_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saml_issuer_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saml_sign_element: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypt_assertion: Option<String>,

    #[serde(
        default,
        rename = "saml_sessionnotonorafter",
        skip_serializing_if = "Option::is_none"
    )]
    pub saml_session_not_valid_on_or_after: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saml_encryption_method_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saml_nameid_format_id: Option<String>,
}

/// An app parameter: a mapping from a parameter name to attribute
/// mappings or macros evaluated at sign-in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Parameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attribute_mappings: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attribute_macros: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_transformations: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioned_entitlements: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if_blank: Option<bool>,

    // The provider sends an explicit null here, so this is always
    // serialized.
    #[serde(default)]
    pub default_values: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_in_saml_assertion: Option<bool>,
}

/// Access-enforcement policy attached to an app.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EnforcementPoint {
    #[serde(default)]
    pub require_sitewide_authentication: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Conditions>,

    #[serde(default)]
    pub session_expiry_fixed: Option<SessionExpiry>,

    #[serde(default)]
    pub session_expiry_inactivity: Option<SessionExpiry>,

    #[serde(default)]
    pub permissions: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub resources: Vec<PathResource>,

    #[serde(default)]
    pub context_root: String,

    #[serde(default)]
    pub use_target_host_header: bool,

    #[serde(default)]
    pub vhost: String,

    #[serde(default)]
    pub landing_page: String,

    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Conditions {
    #[serde(default, rename = "type")]
    pub condition_type: String,

    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SessionExpiry {
    #[serde(default)]
    pub value: i64,

    #[serde(default)]
    pub unit: i64,
}

/// A path-level resource permission inside an enforcement point.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PathResource {
    #[serde(default)]
    pub path: String,

    #[serde(default, rename = "require_authentication")]
    pub require_auth: String,

    #[serde(default)]
    pub permissions: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_path_regex: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
}

/// Authentication method filter value.
///
/// The domain values sit at a 1-based offset from the wire encoding
/// (wire = domain − 1) so that [`AuthMethod::Unset`] can serve as the
/// "filter not set" sentinel: it is never sent on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMethod {
    #[default]
    Unset,
    Password,
    OpenId,
    Saml,
    Api,
    Google,
    Forms,
    WsFed,
    Oidc,
}

impl AuthMethod {
    pub fn to_wire(self) -> i64 {
        self as i64 - 1
    }

    pub fn from_wire(value: i64) -> AuthMethod {
        match value {
            0 => AuthMethod::Password,
            1 => AuthMethod::OpenId,
            2 => AuthMethod::Saml,
            3 => AuthMethod::Api,
            4 => AuthMethod::Google,
            5 => AuthMethod::Forms,
            6 => AuthMethod::WsFed,
            7 => AuthMethod::Oidc,
            _ => AuthMethod::Unset,
        }
    }
}

/// Filters for [`Client::list_apps`].
#[derive(Debug, Clone, Default)]
pub struct AppQuery {
    pub paging: Paging,
    pub name: String,
    pub connector_id: i64,
    pub auth_method: AuthMethod,
}

impl AppQuery {
    pub(crate) fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();

        if !self.name.is_empty() {
            params.insert("name".to_string(), self.name.clone());
        }

        // The provider has no connector id 0, so zero means "no filter".
        if self.connector_id != 0 {
            params.insert(
                "connector_id".to_string(),
                self.connector_id.to_string(),
            );
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

/// The abbreviated application record returned by the list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppSummary {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub connector_id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub visible: bool,

    #[serde(default)]
    pub auth_method: i64,

    #[serde(default)]
    pub tab_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub allow_assumed_signin: bool,
}

impl Client {
    /// List apps matching the query, in the abbreviated list shape.
    pub fn list_apps(&self, query: &AppQuery) -> Result<Vec<AppSummary>> {
        self.execute(Method::GET, "/api/2/apps", &query.to_params(), None)
    }

    /// Fetch the full application record.
    pub fn get_app(&self, id: i64) -> Result<App> {
        self.execute(
            Method::GET,
            &format!("/api/2/apps/{id}"),
            &BTreeMap::new(),
            None,
        )
    }

    /// Create an app. On success the server-assigned id is copied back
    /// onto (a clone of) the input app, which is returned.
    pub fn create_app(&self, app: &App) -> Result<App> {
        let body = serde_json::to_value(app)?;
        let created: App = self.execute(
            Method::POST,
            "/api/2/apps",
            &BTreeMap::new(),
            Some(&body),
        )?;

        let mut app = app.clone();
        app.id = created.id;
        Ok(app)
    }

    /// Replace the app's provided fields. The id must be set.
    pub fn update_app(&self, app: &App) -> Result<()> {
        let id = app
            .id
            .filter(|id| *id != 0)
            .ok_or(Error::MissingField("id"))?;

        let body = serde_json::to_value(app)?;
        let _: App = self.execute(
            Method::PUT,
            &format!("/api/2/apps/{id}"),
            &BTreeMap::new(),
            Some(&body),
        )?;

        Ok(())
    }

    pub fn delete_app(&self, id: i64) -> Result<()> {
        self.execute_empty(
            Method::DELETE,
            &format!("/api/2/apps/{id}"),
            &BTreeMap::new(),
            None,
        )
    }

    /// Remove a single parameter from an app.
    ///
    /// The provider's endpoint for this currently does not work, so the
    /// call is never attempted.
    pub fn delete_app_parameter(
        &self,
        _app_id: i64,
        _parameter_id: i64,
    ) -> Result<()> {
        Err(Error::ApiBroken)
    }

    /// List the ids of users assigned to an app.
    pub fn list_app_users(&self, _app_id: i64) -> Result<Vec<i64>> {
        Err(Error::NotImplemented)
    }
}
