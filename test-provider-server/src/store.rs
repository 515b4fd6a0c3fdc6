// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::SecondsFormat;
use chrono::Utc;
use onelogin_rs::App;
use onelogin_rs::AppSummary;
use onelogin_rs::Connector;
use onelogin_rs::Role;
use onelogin_rs::User;

/// The connector the store is seeded with; apps in tests are created
/// from it.
pub const SEEDED_CONNECTOR_ID: i64 = 110016;

#[derive(Clone)]
pub struct Stored<R> {
    pub resource: R,
    pub created: chrono::DateTime<Utc>,
    pub last_modified: chrono::DateTime<Utc>,
}

/// How many times each role-mutating endpoint has been hit. Tests use
/// these to check that a reconciliation run made exactly the calls it
/// needed to.
#[derive(Clone, Debug, Default)]
pub struct OpCounts {
    pub rename_role: usize,
    pub set_role_apps: usize,
    pub add_role_users: usize,
    pub remove_role_users: usize,
    pub add_role_admins: usize,
    pub remove_role_admins: usize,
}

#[derive(Clone)]
pub struct StoreState {
    pub apps: BTreeMap<i64, Stored<App>>,
    pub users: BTreeMap<i64, Stored<User>>,
    pub roles: BTreeMap<i64, Stored<Role>>,
    pub connectors: Vec<Connector>,
    pub counts: OpCounts,
    next_id: i64,
    response_delay: Duration,
}

impl StoreState {
    fn alloc_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Filters accepted by [`InMemoryStore::list_apps`]. Zero values mean
/// "no filter", mirroring the provider's query semantics.
#[derive(Debug, Default)]
pub struct AppFilter {
    pub name: String,
    pub connector_id: i64,
    pub auth_method: Option<i64>,
    pub limit: usize,
    pub page: usize,
}

#[derive(Debug, Default)]
pub struct UserFilter {
    pub username: String,
    pub email: String,
    pub limit: usize,
    pub page: usize,
}

fn paginate<T>(items: Vec<T>, limit: usize, page: usize) -> Vec<T> {
    if limit == 0 {
        return items;
    }
    let start = page.saturating_sub(1) * limit;
    items.into_iter().skip(start).take(limit).collect()
}

/// A non-optimized store implementation for use with tests.
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        let connectors = vec![
            Connector {
                id: SEEDED_CONNECTOR_ID,
                name: "Tableau".to_string(),
                auth_method: 2,
                allows_new_parameters: true,
                icon_url: None,
            },
            Connector {
                id: 50534,
                name: "Amazon Web Services (AWS) Multi Role".to_string(),
                auth_method: 2,
                allows_new_parameters: false,
                icon_url: None,
            },
        ];

        Self {
            state: Mutex::new(StoreState {
                apps: BTreeMap::new(),
                users: BTreeMap::new(),
                roles: BTreeMap::new(),
                connectors,
                counts: OpCounts::default(),
                next_id: 1000,
                response_delay: Duration::ZERO,
            }),
        }
    }

    pub fn state(&self) -> StoreState {
        self.state.lock().unwrap().clone()
    }

    /// Delay subsequent token and single-app responses by `delay`. Lets
    /// tests exercise client-side deadlines.
    pub fn set_response_delay(&self, delay: Duration) {
        self.state.lock().unwrap().response_delay = delay;
    }

    pub fn response_delay(&self) -> Duration {
        self.state.lock().unwrap().response_delay
    }

    pub fn create_app(&self, mut app: App) -> App {
        let mut state = self.state.lock().unwrap();

        let id = state.alloc_id();
        app.id = Some(id);

        // Parameters get their own ids.
        let mut parameter_ids = Vec::new();
        for _ in app.parameters.values() {
            parameter_ids.push(state.alloc_id());
        }
        for (parameter, id) in app.parameters.values_mut().zip(parameter_ids) {
            parameter.id = Some(id);
        }

        let now = Utc::now();
        app.created_at =
            Some(now.to_rfc3339_opts(SecondsFormat::Secs, true));
        app.updated_at = app.created_at.clone();

        let stored =
            Stored { resource: app.clone(), created: now, last_modified: now };
        state.apps.insert(id, stored);

        app
    }

    pub fn get_app(&self, id: i64) -> Option<App> {
        let state = self.state.lock().unwrap();
        state.apps.get(&id).map(|stored| stored.resource.clone())
    }

    pub fn update_app(&self, id: i64, mut app: App) -> Option<App> {
        let mut state = self.state.lock().unwrap();

        if !state.apps.contains_key(&id) {
            return None;
        }

        app.id = Some(id);

        let mut parameter_ids = Vec::new();
        for parameter in app.parameters.values() {
            if parameter.id.is_none() {
                parameter_ids.push(state.alloc_id());
            }
        }
        let mut parameter_ids = parameter_ids.into_iter();
        for parameter in app.parameters.values_mut() {
            if parameter.id.is_none() {
                parameter.id = parameter_ids.next();
            }
        }

        let stored = state.apps.get_mut(&id).unwrap();
        let now = Utc::now();
        app.created_at = Some(
            stored.created.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        app.updated_at =
            Some(now.to_rfc3339_opts(SecondsFormat::Secs, true));

        stored.resource = app.clone();
        stored.last_modified = now;

        Some(app)
    }

    pub fn delete_app(&self, id: i64) -> bool {
        let mut state = self.state.lock().unwrap();
        state.apps.remove(&id).is_some()
    }

    pub fn list_apps(&self, filter: &AppFilter) -> Vec<AppSummary> {
        let state = self.state.lock().unwrap();

        let summaries = state
            .apps
            .values()
            .filter(|stored| {
                let app = &stored.resource;

                (filter.name.is_empty() || app.name == filter.name)
                    && (filter.connector_id == 0
                        || app.connector_id == filter.connector_id)
                    && (filter.auth_method.is_none()
                        || app.auth_method == filter.auth_method)
            })
            .map(|stored| {
                let app = &stored.resource;
                AppSummary {
                    id: app.id.unwrap_or(0),
                    connector_id: app.connector_id,
                    name: app.name.clone(),
                    description: app.description.clone().unwrap_or_default(),
                    notes: app.notes.clone().unwrap_or_default(),
                    visible: app.visible.unwrap_or(true),
                    auth_method: app.auth_method.unwrap_or(0),
                    tab_id: app.tab_id.unwrap_or(0),
                    created_at: Some(stored.created),
                    updated_at: Some(stored.last_modified),
                    allow_assumed_signin: app
                        .allow_assumed_signin
                        .unwrap_or(false),
                }
            })
            .collect();

        paginate(summaries, filter.limit, filter.page)
    }

    pub fn list_connectors(&self, name: &str) -> Vec<Connector> {
        let state = self.state.lock().unwrap();
        state
            .connectors
            .iter()
            .filter(|connector| name.is_empty() || connector.name == name)
            .cloned()
            .collect()
    }

    pub fn create_user(&self, mut user: User) -> User {
        let mut state = self.state.lock().unwrap();

        let id = state.alloc_id();
        user.id = Some(id);

        let now = Utc::now();
        user.created_at = Some(now);
        user.updated_at = Some(now);
        if user.status.is_none() {
            user.status = Some(1);
        }

        let stored =
            Stored { resource: user.clone(), created: now, last_modified: now };
        state.users.insert(id, stored);

        user
    }

    pub fn get_user(&self, id: i64) -> Option<User> {
        let state = self.state.lock().unwrap();
        state.users.get(&id).map(|stored| stored.resource.clone())
    }

    pub fn update_user(&self, id: i64, mut user: User) -> Option<User> {
        let mut state = self.state.lock().unwrap();
        let stored = state.users.get_mut(&id)?;

        let now = Utc::now();
        user.id = Some(id);
        user.created_at = Some(stored.created);
        user.updated_at = Some(now);

        stored.resource = user.clone();
        stored.last_modified = now;

        Some(user)
    }

    pub fn delete_user(&self, id: i64) -> bool {
        let mut state = self.state.lock().unwrap();
        state.users.remove(&id).is_some()
    }

    pub fn list_users(&self, filter: &UserFilter) -> Vec<User> {
        let state = self.state.lock().unwrap();

        let users = state
            .users
            .values()
            .filter(|stored| {
                let user = &stored.resource;

                (filter.username.is_empty()
                    || user.username == filter.username)
                    && (filter.email.is_empty() || user.email == filter.email)
            })
            .map(|stored| stored.resource.clone())
            .collect();

        paginate(users, filter.limit, filter.page)
    }

    pub fn create_role(&self, mut role: Role) -> Role {
        let mut state = self.state.lock().unwrap();

        let id = state.alloc_id();
        role.id = Some(id);

        let now = Utc::now();
        let stored =
            Stored { resource: role.clone(), created: now, last_modified: now };
        state.roles.insert(id, stored);

        role
    }

    pub fn get_role(&self, id: i64) -> Option<Role> {
        let state = self.state.lock().unwrap();
        state.roles.get(&id).map(|stored| stored.resource.clone())
    }

    pub fn rename_role(&self, id: i64, name: String) -> bool {
        let mut state = self.state.lock().unwrap();
        state.counts.rename_role += 1;

        match state.roles.get_mut(&id) {
            Some(stored) => {
                stored.resource.name = name;
                stored.last_modified = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn set_role_apps(&self, id: i64, apps: Vec<i64>) -> bool {
        let mut state = self.state.lock().unwrap();
        state.counts.set_role_apps += 1;

        match state.roles.get_mut(&id) {
            Some(stored) => {
                stored.resource.apps = apps;
                stored.last_modified = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn add_role_users(&self, id: i64, user_ids: &[i64]) -> bool {
        let mut state = self.state.lock().unwrap();
        state.counts.add_role_users += 1;

        match state.roles.get_mut(&id) {
            Some(stored) => {
                for user_id in user_ids {
                    if !stored.resource.users.contains(user_id) {
                        stored.resource.users.push(*user_id);
                    }
                }
                stored.last_modified = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn remove_role_users(&self, id: i64, user_ids: &[i64]) -> bool {
        let mut state = self.state.lock().unwrap();
        state.counts.remove_role_users += 1;

        match state.roles.get_mut(&id) {
            Some(stored) => {
                stored.resource.users.retain(|u| !user_ids.contains(u));
                stored.last_modified = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn add_role_admins(&self, id: i64, user_ids: &[i64]) -> bool {
        let mut state = self.state.lock().unwrap();
        state.counts.add_role_admins += 1;

        match state.roles.get_mut(&id) {
            Some(stored) => {
                for user_id in user_ids {
                    if !stored.resource.admins.contains(user_id) {
                        stored.resource.admins.push(*user_id);
                    }
                }
                stored.last_modified = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn remove_role_admins(&self, id: i64, user_ids: &[i64]) -> bool {
        let mut state = self.state.lock().unwrap();
        state.counts.remove_role_admins += 1;

        match state.roles.get_mut(&id) {
            Some(stored) => {
                stored.resource.admins.retain(|u| !user_ids.contains(u));
                stored.last_modified = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn delete_role(&self, id: i64) -> bool {
        let mut state = self.state.lock().unwrap();
        state.roles.remove(&id).is_some()
    }
}
