#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use std::{net::TcpListener, sync::Arc};
use subgate::api::{ApiClient, ApiConfig};
use subgate::guard::{Navigation, RouteGuard};
use subgate::session::{FileStorage, SessionStore, UserLookup};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn open_store(server: &MockServer, file: &std::path::Path) -> Arc<SessionStore> {
    let api = ApiClient::new(&ApiConfig::with_base(&server.uri())).unwrap();
    let storage = Arc::new(FileStorage::new(file));
    Arc::new(SessionStore::open(api, storage).unwrap())
}

#[tokio::test]
async fn login_guard_and_logout_across_runs() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start().await;
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("session.json");

    let user = json!({
        "id": "u-1",
        "email": "ada@example.com",
        "name": "Ada",
        "roles": [],
        "restricted": false,
        "subscription": null
    });

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "token_type": "bearer",
            "user": user
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("Authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user.clone()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    // First run signs in and persists the token pair.
    let store = open_store(&server, &file);
    let lookup = store
        .login("ada@example.com", &SecretString::from("hunter2".to_string()))
        .await
        .unwrap();
    assert!(matches!(lookup, UserLookup::Authenticated(_)));
    drop(store);

    // Second run picks the session up from disk; no subscription means /subscribe.
    let store = open_store(&server, &file);
    assert!(store.is_signed_in());

    let guard = RouteGuard::new(Some(store.clone()));
    assert_eq!(
        guard.before_each("/dashboard").await,
        Navigation::Redirect("/subscribe".to_string())
    );
    assert_eq!(guard.before_each("/subscribe?plan=pro").await, Navigation::Proceed);

    assert_eq!(
        store.logout().await,
        Navigation::Redirect("/signin".to_string())
    );
    drop(store);

    // Third run starts signed out.
    let store = open_store(&server, &file);
    assert!(!store.is_signed_in());
    assert!(matches!(store.get_user().await, UserLookup::SignedOut));
}
