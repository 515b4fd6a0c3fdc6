// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::fmt;

use chrono::SecondsFormat;
use reqwest::Method;

use super::*;

/// A OneLogin user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_idp_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_ad_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_user_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openid_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_of: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samaccountname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userprincipalname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinguished_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_login_attempts: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_algorithm: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role_ids: Vec<i64>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_attributes: BTreeMap<String, CustomAttributeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_until: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_sent_at: Option<DateTime<Utc>>,
}

/// A custom attribute value. The provider stores these loosely typed;
/// we preserve whatever scalar came over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CustomAttributeValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for CustomAttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomAttributeValue::String(s) => write!(f, "{s}"),
            CustomAttributeValue::Int(i) => write!(f, "{i}"),
            CustomAttributeValue::Float(x) => write!(f, "{x}"),
            CustomAttributeValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Filters for [`Client::list_users`]. All fields are optional; only
/// set filters become query parameters.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub paging: Paging,
    pub created_since: Option<DateTime<Utc>>,
    pub created_until: Option<DateTime<Utc>>,
    pub updated_since: Option<DateTime<Utc>>,
    pub updated_until: Option<DateTime<Utc>>,
    pub last_login_since: Option<DateTime<Utc>>,
    pub last_login_until: Option<DateTime<Utc>>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub username: String,
    pub samaccountname: String,
    pub external_id: String,
    pub directory_id: String,
    pub app_id: String,
    pub user_ids: Vec<i64>,
    pub custom_attributes: BTreeMap<String, CustomAttributeValue>,
    pub fields: Vec<String>,
}

fn insert_time(
    params: &mut BTreeMap<String, String>,
    key: &str,
    value: &Option<DateTime<Utc>>,
) {
    if let Some(t) = value {
        params.insert(
            key.to_string(),
            t.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }
}

fn insert_string(
    params: &mut BTreeMap<String, String>,
    key: &str,
    value: &str,
) {
    if !value.is_empty() {
        params.insert(key.to_string(), value.to_string());
    }
}

impl UserQuery {
    pub(crate) fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();

        insert_time(&mut params, "created_since", &self.created_since);
        insert_time(&mut params, "created_until", &self.created_until);
        insert_time(&mut params, "updated_since", &self.updated_since);
        insert_time(&mut params, "updated_until", &self.updated_until);
        insert_time(&mut params, "last_login_since", &self.last_login_since);
        insert_time(&mut params, "last_login_until", &self.last_login_until);

        insert_string(&mut params, "firstname", &self.firstname);
        insert_string(&mut params, "lastname", &self.lastname);
        insert_string(&mut params, "email", &self.email);
        insert_string(&mut params, "username", &self.username);
        insert_string(&mut params, "samaccountname", &self.samaccountname);
        insert_string(&mut params, "external_id", &self.external_id);
        insert_string(&mut params, "directory_id", &self.directory_id);
        insert_string(&mut params, "app_id", &self.app_id);

        if !self.user_ids.is_empty() {
            params.insert(
                "user_ids".to_string(),
                crate::set_ops::join_ids(&self.user_ids),
            );
        }

        for (key, value) in &self.custom_attributes {
            params.insert(key.clone(), value.to_string());
        }

        if !self.fields.is_empty() {
            params.insert("fields".to_string(), self.fields.join(","));
        }

        append_paging(&mut params, &self.paging);
        params
    }
}

impl Client {
    pub fn list_users(&self, query: &UserQuery) -> Result<Vec<User>> {
        self.execute(Method::GET, "/api/2/users", &query.to_params(), None)
    }

    pub fn get_user(&self, id: i64) -> Result<User> {
        self.execute(
            Method::GET,
            &format!("/api/2/users/{id}"),
            &BTreeMap::new(),
            None,
        )
    }

    /// Create a user. Returns the record as the server stored it,
    /// including the assigned id and timestamps.
    ///
    /// Directory mappings run asynchronously and the user's password
    /// policy is validated, matching the admin console's behavior.
    pub fn create_user(&self, user: &User) -> Result<User> {
        if user.username.is_empty() {
            return Err(Error::MissingField("username"));
        }
        if user.email.is_empty() {
            return Err(Error::MissingField("email"));
        }

        let mut params = BTreeMap::new();
        params.insert("mappings".to_string(), "async".to_string());
        params.insert("validate_policy".to_string(), "true".to_string());

        let body = serde_json::to_value(user)?;
        self.execute(Method::POST, "/api/2/users", &params, Some(&body))
    }

    /// Update the user's provided fields. The id must be set.
    pub fn update_user(&self, user: &User) -> Result<()> {
        let id = user
            .id
            .filter(|id| *id != 0)
            .ok_or(Error::MissingField("id"))?;

        let mut params = BTreeMap::new();
        params.insert("mappings".to_string(), "async".to_string());
        params.insert("validate_policy".to_string(), "true".to_string());

        let body = serde_json::to_value(user)?;
        let _: User = self.execute(
            Method::PUT,
            &format!("/api/2/users/{id}"),
            &params,
            Some(&body),
        )?;

        Ok(())
    }

    pub fn delete_user(&self, id: i64) -> Result<()> {
        self.execute_empty(
            Method::DELETE,
            &format!("/api/2/users/{id}"),
            &BTreeMap::new(),
            None,
        )
    }

    /// List the apps a user can sign in to.
    pub fn get_user_apps(&self, _user_id: i64) -> Result<Vec<i64>> {
        Err(Error::NotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn offline_client() -> Client {
        let log = slog::Logger::root(slog::Discard, slog::o!());
        let config = ClientConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            subdomain: "example".to_string(),
            timeout: None,
            base_url: Some("http://127.0.0.1:9".to_string()),
        };
        Client::with_config(log, config).unwrap()
    }

    #[test]
    fn create_user_requires_username_then_email() {
        let client = offline_client();

        match client.create_user(&User::default()) {
            Err(Error::MissingField("username")) => {}
            other => panic!("expected missing username, got {other:?}"),
        }

        let user = User {
            username: "testuser".to_string(),
            ..Default::default()
        };
        match client.create_user(&user) {
            Err(Error::MissingField("email")) => {}
            other => panic!("expected missing email, got {other:?}"),
        }
    }

    #[test]
    fn update_user_requires_id() {
        let client = offline_client();

        let user = User {
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            ..Default::default()
        };
        match client.update_user(&user) {
            Err(Error::MissingField("id")) => {}
            other => panic!("expected missing id, got {other:?}"),
        }
    }

    #[test]
    fn get_user_apps_not_implemented() {
        let client = offline_client();

        match client.get_user_apps(1) {
            Err(Error::NotImplemented) => {}
            other => panic!("expected NotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn user_query_times_are_rfc3339_utc() {
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap();
        let params = UserQuery {
            created_since: Some(t),
            ..Default::default()
        }
        .to_params();

        assert_eq!(
            params.get("created_since").map(String::as_str),
            Some("2024-03-05T12:30:00Z"),
        );
        assert!(!params.contains_key("created_until"));
    }

    #[test]
    fn user_query_joins_lists_with_commas() {
        let params = UserQuery {
            user_ids: vec![3, 14, 159],
            fields: vec!["id".to_string(), "username".to_string()],
            ..Default::default()
        }
        .to_params();

        assert_eq!(
            params.get("user_ids").map(String::as_str),
            Some("3,14,159"),
        );
        assert_eq!(
            params.get("fields").map(String::as_str),
            Some("id,username"),
        );
    }

    #[test]
    fn user_query_custom_attributes_become_params() {
        let mut custom_attributes = BTreeMap::new();
        custom_attributes.insert(
            "employee_id".to_string(),
            CustomAttributeValue::Int(42),
        );

        let params =
            UserQuery { custom_attributes, ..Default::default() }.to_params();

        assert_eq!(params.get("employee_id").map(String::as_str), Some("42"));
    }

    #[test]
    fn user_body_omits_empty_username_and_email() {
        let value = serde_json::to_value(User::default()).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.is_empty());
    }

    #[test]
    fn user_openid_name_round_trips() {
        let user = User {
            openid_name: Some("pbeesly".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value.as_object().unwrap().get("openid_name").unwrap(),
            "pbeesly",
        );

        let decoded: User = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.openid_name.as_deref(), Some("pbeesly"));
    }
}
