// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests that run the blocking client against an in-process
//! lookalike server.

use std::sync::Arc;
use std::time::Duration;

use onelogin_rs::App;
use onelogin_rs::AppQuery;
use onelogin_rs::Client;
use onelogin_rs::ClientConfig;
use onelogin_rs::Error;
use onelogin_rs::Paging;
use onelogin_rs::Parameter;
use onelogin_rs::Role;
use onelogin_rs::User;
use onelogin_rs::UserQuery;
use onelogin_test_provider_server::InMemoryStore;
use onelogin_test_provider_server::SEEDED_CONNECTOR_ID;
use onelogin_test_provider_server::TEST_CLIENT_ID;
use onelogin_test_provider_server::TEST_CLIENT_SECRET;
use onelogin_test_provider_server::create_http_server_with_store;

fn test_config(url: String) -> ClientConfig {
    ClientConfig {
        client_id: TEST_CLIENT_ID.to_string(),
        client_secret: TEST_CLIENT_SECRET.to_string(),
        subdomain: "unused".to_string(),
        timeout: None,
        base_url: Some(url),
    }
}

fn test_logger() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

/// Starts a server on an ephemeral port, runs `f` with the client on a
/// blocking thread, then shuts the server down.
async fn with_client<F>(store: Arc<InMemoryStore>, f: F)
where
    F: FnOnce(Client) + Send + 'static,
{
    let server = create_http_server_with_store(None, store).unwrap();
    let url = format!("http://{}", server.local_addr());

    tokio::task::spawn_blocking(move || {
        let client = Client::new(test_logger(), test_config(url)).unwrap();
        f(client);
    })
    .await
    .unwrap();

    server.close().await.unwrap();
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let server = create_http_server_with_store(None, store).unwrap();
    let url = format!("http://{}", server.local_addr());

    tokio::task::spawn_blocking(move || {
        let config = ClientConfig {
            client_secret: "wrong".to_string(),
            ..test_config(url)
        };

        match Client::new(test_logger(), config) {
            Err(Error::AuthenticationFailed { status: 401 }) => {}
            other => {
                panic!("expected authentication failure, got {other:?}")
            }
        }
    })
    .await
    .unwrap();

    server.close().await.unwrap();
}

#[tokio::test]
async fn token_fetch_succeeds_with_test_credentials() {
    let store = Arc::new(InMemoryStore::new());

    with_client(store, |client| {
        let token = client.fetch_token().unwrap();
        assert!(!token.access_token.is_empty());
        assert_eq!(token.token_type.as_deref(), Some("bearer"));
    })
    .await;
}

#[tokio::test]
async fn app_lifecycle() {
    let store = Arc::new(InMemoryStore::new());

    with_client(store, |client| {
        let app = client
            .create_app(&App {
                connector_id: SEEDED_CONNECTOR_ID,
                name: "test_app".to_string(),
                ..Default::default()
            })
            .unwrap();

        let app_id = app.id.unwrap();
        assert_ne!(app_id, 0);

        // Add a parameter via update; the server assigns it an id.
        let mut app = app;
        app.parameters.insert(
            "new_test_param".to_string(),
            Parameter {
                label: Some("New Test Param".to_string()),
                user_attribute_mappings: Some("email".to_string()),
                ..Default::default()
            },
        );
        client.update_app(&app).unwrap();

        let fetched = client.get_app(app_id).unwrap();
        assert_eq!(fetched.name, "test_app");
        let parameter = fetched.parameters.get("new_test_param").unwrap();
        assert!(parameter.id.is_some());
        assert_eq!(parameter.label.as_deref(), Some("New Test Param"));

        client.delete_app(app_id).unwrap();

        match client.get_app(app_id) {
            Err(Error::RequestFailed { status: 404, .. }) => {}
            other => panic!("expected 404 after delete, got {other:?}"),
        }
    })
    .await;
}

#[tokio::test]
async fn list_apps_filters_and_pages() {
    let store = Arc::new(InMemoryStore::new());

    with_client(store, |client| {
        for name in ["alpha", "beta", "gamma"] {
            client
                .create_app(&App {
                    connector_id: SEEDED_CONNECTOR_ID,
                    name: name.to_string(),
                    ..Default::default()
                })
                .unwrap();
        }

        let all = client.list_apps(&AppQuery::default()).unwrap();
        assert_eq!(all.len(), 3);

        let by_name = client
            .list_apps(&AppQuery {
                name: "beta".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "beta");

        // Second page of two holds the single remaining app.
        let page = client
            .list_apps(&AppQuery {
                paging: Paging { limit: 2, page: 2, cursor: String::new() },
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.len(), 1);
    })
    .await;
}

#[tokio::test]
async fn user_lifecycle() {
    let store = Arc::new(InMemoryStore::new());

    with_client(store, |client| {
        let user = client
            .create_user(&User {
                username: "pbeesly".to_string(),
                email: "pbeesly@dundermifflin.com".to_string(),
                firstname: Some("Pam".to_string()),
                lastname: Some("Beesly".to_string()),
                ..Default::default()
            })
            .unwrap();

        let user_id = user.id.unwrap();
        assert_ne!(user_id, 0);
        assert!(user.created_at.is_some());

        let mut renamed = user.clone();
        renamed.lastname = Some("Halpert".to_string());
        client.update_user(&renamed).unwrap();

        let fetched = client.get_user(user_id).unwrap();
        assert_eq!(fetched.lastname.as_deref(), Some("Halpert"));

        let listed = client
            .list_users(&UserQuery {
                username: "pbeesly".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(listed.len(), 1);

        let empty = client
            .list_users(&UserQuery {
                username: "nobody".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert!(empty.is_empty());

        client.delete_user(user_id).unwrap();

        match client.get_user(user_id) {
            Err(Error::RequestFailed { status: 404, .. }) => {}
            other => panic!("expected 404 after delete, got {other:?}"),
        }
    })
    .await;
}

#[tokio::test]
async fn role_update_makes_only_needed_calls() {
    let store = Arc::new(InMemoryStore::new());
    let inspect = store.clone();

    with_client(store, move |client| {
        let role = client
            .create_role(&Role {
                name: "sales".to_string(),
                apps: vec![5],
                users: vec![1, 2],
                ..Default::default()
            })
            .unwrap();
        let role_id = role.id.unwrap();

        // An update that changes nothing issues no mutating calls.
        client.update_role(&role).unwrap();

        let counts = inspect.state().counts;
        assert_eq!(counts.rename_role, 0);
        assert_eq!(counts.set_role_apps, 0);
        assert_eq!(counts.add_role_users, 0);
        assert_eq!(counts.remove_role_users, 0);
        assert_eq!(counts.add_role_admins, 0);
        assert_eq!(counts.remove_role_admins, 0);

        // App membership differs as a set: one wholesale replacement,
        // still no user calls.
        client
            .update_role(&Role { apps: vec![5, 6], ..role.clone() })
            .unwrap();

        let counts = inspect.state().counts;
        assert_eq!(counts.set_role_apps, 1);
        assert_eq!(counts.add_role_users, 0);
        assert_eq!(counts.remove_role_users, 0);

        // Users [1, 2] -> [2, 3]: one add and one remove.
        client
            .update_role(&Role {
                apps: vec![5, 6],
                users: vec![2, 3],
                ..role.clone()
            })
            .unwrap();

        let counts = inspect.state().counts;
        assert_eq!(counts.add_role_users, 1);
        assert_eq!(counts.remove_role_users, 1);

        let stored = client.get_role(role_id).unwrap();
        assert_eq!(stored.users, vec![2, 3]);

        // Renaming only touches the role record itself.
        client
            .update_role(&Role {
                name: "sales reps".to_string(),
                apps: vec![5, 6],
                users: vec![2, 3],
                ..role.clone()
            })
            .unwrap();

        let counts = inspect.state().counts;
        assert_eq!(counts.rename_role, 1);
        assert_eq!(counts.set_role_apps, 1);
        assert_eq!(counts.add_role_users, 1);
        assert_eq!(counts.remove_role_users, 1);

        assert_eq!(client.get_role(role_id).unwrap().name, "sales reps");

        client.delete_role(role_id).unwrap();
    })
    .await;
}

#[tokio::test]
async fn timeout_spans_token_fetch_and_request() {
    let store = Arc::new(InMemoryStore::new());
    store.set_response_delay(Duration::from_millis(600));

    let server = create_http_server_with_store(None, store).unwrap();
    let url = format!("http://{}", server.local_addr());

    tokio::task::spawn_blocking(move || {
        // Each exchange takes ~600ms here, so a lone token fetch fits the
        // one second window and construction succeeds.
        let config = ClientConfig {
            timeout: Some(Duration::from_millis(1000)),
            ..test_config(url)
        };
        let client = Client::new(test_logger(), config).unwrap();

        // A resource call spends most of its window on the embedded token
        // fetch; the request itself must then run out of budget, even
        // though either exchange alone would fit.
        match client.get_app(1) {
            Err(Error::Http(e)) if e.is_timeout() => {}
            other => panic!("expected a timeout, got {other:?}"),
        }
    })
    .await
    .unwrap();

    server.close().await.unwrap();
}

#[tokio::test]
async fn role_app_set_shrinks_with_one_replace_call() {
    let store = Arc::new(InMemoryStore::new());
    let inspect = store.clone();

    with_client(store, move |client| {
        let role = client
            .create_role(&Role {
                name: "sales".to_string(),
                apps: vec![5, 6],
                users: vec![1, 2],
                ..Default::default()
            })
            .unwrap();

        // Desired {5} against current {5, 6}: exactly one wholesale
        // replacement carrying the full desired list, and no user or
        // admin calls since those sets are unchanged.
        client.update_role(&Role { apps: vec![5], ..role.clone() }).unwrap();

        let counts = inspect.state().counts;
        assert_eq!(counts.set_role_apps, 1);
        assert_eq!(counts.rename_role, 0);
        assert_eq!(counts.add_role_users, 0);
        assert_eq!(counts.remove_role_users, 0);
        assert_eq!(counts.add_role_admins, 0);
        assert_eq!(counts.remove_role_admins, 0);

        let stored = client.get_role(role.id.unwrap()).unwrap();
        assert_eq!(stored.apps, vec![5]);
    })
    .await;
}

#[tokio::test]
async fn role_admins_are_reconciled_incrementally() {
    let store = Arc::new(InMemoryStore::new());
    let inspect = store.clone();

    with_client(store, move |client| {
        let role = client
            .create_role(&Role {
                name: "managers".to_string(),
                admins: vec![10, 11],
                ..Default::default()
            })
            .unwrap();

        client
            .update_role(&Role { admins: vec![11, 12], ..role.clone() })
            .unwrap();

        let counts = inspect.state().counts;
        assert_eq!(counts.add_role_admins, 1);
        assert_eq!(counts.remove_role_admins, 1);

        let stored = client.get_role(role.id.unwrap()).unwrap();
        assert_eq!(stored.admins, vec![11, 12]);
    })
    .await;
}

#[tokio::test]
async fn connectors_are_seeded() {
    let store = Arc::new(InMemoryStore::new());

    with_client(store, |client| {
        let connectors =
            client.list_connectors(&Default::default()).unwrap();
        assert!(connectors.iter().any(|c| c.id == SEEDED_CONNECTOR_ID));
    })
    .await;
}
