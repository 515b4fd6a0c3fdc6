// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::Context;
use anyhow::bail;

use onelogin_rs::App;
use onelogin_rs::AppQuery;
use onelogin_rs::Client;
use onelogin_rs::ClientConfig;
use onelogin_rs::ConnectorQuery;
use onelogin_rs::Error;
use onelogin_rs::Parameter;
use onelogin_rs::Role;
use onelogin_rs::User;
use onelogin_rs::UserQuery;

pub struct Tester {
    client: Client,
}

impl Tester {
    pub fn new(log: slog::Logger, config: ClientConfig) -> anyhow::Result<Self> {
        let client = Client::new(log, config).context("authenticating")?;
        Ok(Self { client })
    }

    pub fn run(&self) -> anyhow::Result<()> {
        self.nonexistent_resource_tests()
            .context("nonexistent_resource_tests")?;

        let connector_id =
            self.connector_tests().context("connector_tests")?;

        self.app_lifecycle_tests(connector_id)
            .context("app_lifecycle_tests")?;

        let (pam, ryan) =
            self.user_lifecycle_tests().context("user_lifecycle_tests")?;

        self.role_reconciliation_tests(connector_id, &pam, &ryan)
            .context("role_reconciliation_tests")?;

        // Clean up so the run can be repeated against the same server.
        self.client.delete_user(pam.id.unwrap())?;
        self.client.delete_user(ryan.id.unwrap())?;

        Ok(())
    }

    fn nonexistent_resource_tests(&self) -> anyhow::Result<()> {
        let random_id = 999999;

        match self.client.get_app(random_id) {
            Err(Error::RequestFailed { status: 404, .. }) => {}
            other => bail!("GET of nonexistent app returned {other:?}"),
        }

        match self.client.get_user(random_id) {
            Err(Error::RequestFailed { status: 404, .. }) => {}
            other => bail!("GET of nonexistent user returned {other:?}"),
        }

        match self.client.delete_role(random_id) {
            Err(Error::RequestFailed { status: 404, .. }) => {}
            other => bail!("DELETE of nonexistent role returned {other:?}"),
        }

        Ok(())
    }

    fn connector_tests(&self) -> anyhow::Result<i64> {
        let connectors =
            self.client.list_connectors(&ConnectorQuery::default())?;

        if connectors.is_empty() {
            bail!("connector list is empty");
        }

        let Some(connector) =
            connectors.iter().find(|c| c.allows_new_parameters)
        else {
            bail!("no connector allows new parameters");
        };

        Ok(connector.id)
    }

    fn app_lifecycle_tests(&self, connector_id: i64) -> anyhow::Result<()> {
        let app = self.client.create_app(&App {
            connector_id,
            name: "test_app".to_string(),
            description: Some("created by the test client".to_string()),
            ..Default::default()
        })?;

        let Some(app_id) = app.id.filter(|id| *id != 0) else {
            bail!("created app has no id");
        };

        // Add a parameter through update, then confirm the server stored
        // it and gave it an id.
        let mut app = app;
        app.parameters.insert(
            "new_test_param".to_string(),
            Parameter {
                label: Some("New Test Param".to_string()),
                user_attribute_mappings: Some("email".to_string()),
                ..Default::default()
            },
        );
        self.client.update_app(&app)?;

        let fetched = self.client.get_app(app_id)?;
        let Some(parameter) = fetched.parameters.get("new_test_param") else {
            bail!("updated app is missing new_test_param");
        };
        if parameter.id.is_none() {
            bail!("stored parameter was not assigned an id");
        }

        let listed = self.client.list_apps(&AppQuery {
            name: "test_app".to_string(),
            ..Default::default()
        })?;
        if listed.len() != 1 {
            bail!("list by name returned {} apps, not 1", listed.len());
        }
        if listed[0].id != app_id {
            bail!("listed app id {} != created id {}", listed[0].id, app_id);
        }

        self.client.delete_app(app_id)?;

        match self.client.get_app(app_id) {
            Err(Error::RequestFailed { status: 404, .. }) => {}
            other => bail!("GET of deleted app returned {other:?}"),
        }

        Ok(())
    }

    fn user_lifecycle_tests(&self) -> anyhow::Result<(User, User)> {
        // Field validation happens before any request is made.
        match self.client.create_user(&User::default()) {
            Err(Error::MissingField("username")) => {}
            other => bail!("create of empty user returned {other:?}"),
        }

        let pam = self.client.create_user(&User {
            username: "pbeesly".to_string(),
            email: "pbeesly@dundermifflin.com".to_string(),
            firstname: Some("Pam".to_string()),
            lastname: Some("Beesly".to_string()),
            ..Default::default()
        })?;

        let Some(pam_id) = pam.id.filter(|id| *id != 0) else {
            bail!("created user has no id");
        };

        let mut renamed = pam.clone();
        renamed.lastname = Some("Halpert".to_string());
        self.client.update_user(&renamed)?;

        let fetched = self.client.get_user(pam_id)?;
        if fetched.lastname.as_deref() != Some("Halpert") {
            bail!("update did not stick: lastname is {:?}", fetched.lastname);
        }

        let ryan = self.client.create_user(&User {
            username: "rhoward".to_string(),
            email: "rhoward@dundermifflin.com".to_string(),
            ..Default::default()
        })?;

        let listed = self.client.list_users(&UserQuery {
            username: "rhoward".to_string(),
            ..Default::default()
        })?;
        if listed.len() != 1 {
            bail!("list by username returned {} users, not 1", listed.len());
        }

        Ok((fetched, ryan))
    }

    fn role_reconciliation_tests(
        &self,
        connector_id: i64,
        pam: &User,
        ryan: &User,
    ) -> anyhow::Result<()> {
        let app = self.client.create_app(&App {
            connector_id,
            name: "role_test_app".to_string(),
            ..Default::default()
        })?;
        let app_id = app.id.unwrap();

        let role = self.client.create_role(&Role {
            name: "sales".to_string(),
            apps: vec![app_id],
            users: vec![pam.id.unwrap()],
            ..Default::default()
        })?;
        let role_id = role.id.unwrap();

        // Swap membership to ryan only and rename in one update.
        let updated = self.client.update_role(&Role {
            id: Some(role_id),
            name: "sales reps".to_string(),
            apps: vec![app_id],
            users: vec![ryan.id.unwrap()],
            ..Default::default()
        })?;

        if updated.name != "sales reps" {
            bail!("update_role returned name {:?}", updated.name);
        }

        let fetched = self.client.get_role(role_id)?;
        if fetched.name != "sales reps" {
            bail!("role rename did not stick: {:?}", fetched.name);
        }
        if fetched.users != vec![ryan.id.unwrap()] {
            bail!("role users were not reconciled: {:?}", fetched.users);
        }
        if fetched.apps != vec![app_id] {
            bail!("role apps changed unexpectedly: {:?}", fetched.apps);
        }

        self.client.delete_role(role_id)?;
        self.client.delete_app(app_id)?;

        Ok(())
    }
}
