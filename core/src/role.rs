// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use reqwest::Method;

use super::*;
use crate::set_ops;

/// A OneLogin role: a named grouping of apps, the users assigned to
/// them, and the users who administer the role.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema,
)]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admins: Vec<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apps: Vec<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<i64>,
}

impl Client {
    pub fn list_roles(&self) -> Result<Vec<Role>> {
        Err(Error::NotImplemented)
    }

    /// Create a role. On success the server-assigned id is copied back
    /// onto (a clone of) the input role, which is returned.
    pub fn create_role(&self, role: &Role) -> Result<Role> {
        let body = serde_json::to_value(role)?;
        let created: Role = self.execute(
            Method::POST,
            "/api/2/roles",
            &BTreeMap::new(),
            Some(&body),
        )?;

        let mut role = role.clone();
        role.id = created.id;
        Ok(role)
    }

    pub fn get_role(&self, id: i64) -> Result<Role> {
        self.execute(
            Method::GET,
            &format!("/api/2/roles/{id}"),
            &BTreeMap::new(),
            None,
        )
    }

    /// Bring the server-side role in line with `role` by diffing against
    /// the current state: the name is replaced if it differs, the app
    /// list is replaced wholesale if its membership differs, and users
    /// and admins are added and removed incrementally. Calls that are
    /// not needed are not made.
    ///
    /// The steps run in that order and are not transactional; an error
    /// partway through leaves the earlier steps applied.
    pub fn update_role(&self, role: &Role) -> Result<Role> {
        let id = role
            .id
            .filter(|id| *id != 0)
            .ok_or(Error::MissingField("id"))?;

        let current = self.get_role(id)?;

        if role.name != current.name {
            let body = serde_json::json!({ "name": role.name });
            self.execute_empty(
                Method::PUT,
                &format!("/api/2/roles/{id}"),
                &BTreeMap::new(),
                Some(&body),
            )?;
        }

        if !set_ops::equal(&role.apps, &current.apps) {
            self.set_role_apps(id, &role.apps)?;
        }

        let (add, remove) = set_ops::diff(&role.users, &current.users);
        if !add.is_empty() {
            self.modify_role_members(Method::POST, id, "users", &add)?;
        }
        if !remove.is_empty() {
            self.modify_role_members(Method::DELETE, id, "users", &remove)?;
        }

        let (add, remove) = set_ops::diff(&role.admins, &current.admins);
        if !add.is_empty() {
            self.modify_role_members(Method::POST, id, "admins", &add)?;
        }
        if !remove.is_empty() {
            self.modify_role_members(Method::DELETE, id, "admins", &remove)?;
        }

        Ok(role.clone())
    }

    pub fn delete_role(&self, id: i64) -> Result<()> {
        self.execute_empty(
            Method::DELETE,
            &format!("/api/2/roles/{id}"),
            &BTreeMap::new(),
            None,
        )
    }

    fn set_role_apps(&self, id: i64, apps: &[i64]) -> Result<()> {
        let body = serde_json::to_value(apps)?;
        self.execute_empty(
            Method::PUT,
            &format!("/api/2/roles/{id}/apps"),
            &BTreeMap::new(),
            Some(&body),
        )
    }

    fn modify_role_members(
        &self,
        method: Method,
        id: i64,
        kind: &str,
        user_ids: &[i64],
    ) -> Result<()> {
        let body = serde_json::to_value(user_ids)?;
        self.execute_empty(
            method,
            &format!("/api/2/roles/{id}/{kind}"),
            &BTreeMap::new(),
            Some(&body),
        )
    }
}

#[cfg(test)]
mod tests {
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
    fn list_roles_not_implemented() {
        let client = offline_client();

        match client.list_roles() {
            Err(Error::NotImplemented) => {}
            other => panic!("expected NotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn update_role_requires_id() {
        let client = offline_client();

        let role = Role { name: "admins".to_string(), ..Default::default() };
        match client.update_role(&role) {
            Err(Error::MissingField("id")) => {}
            other => panic!("expected missing id, got {other:?}"),
        }
    }

    #[test]
    fn role_body_omits_empty_membership() {
        let role = Role { name: "admins".to_string(), ..Default::default() };
        let value = serde_json::to_value(&role).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 1);
        assert_eq!(object.get("name").unwrap(), "admins");
    }
}
