mod common;

use common::*;
use juzeng_admin::api::auth::LANDING_ROUTE;
use juzeng_admin::api::{ApiRequest, Method};
use juzeng_admin::error::Error;
use juzeng_admin::session::{Role, Session, SessionContext};

#[tokio::test]
async fn test_send_attaches_bearer_token() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "events/", 200, "[]");
    let api = api(&transport, logged_in("teacher"));

    let response = api.client().send(ApiRequest::get("events/")).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(transport.requests()[0].bearer.as_deref(), Some("access-1"));
}

#[tokio::test]
async fn test_refreshes_once_and_retries_on_401() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "events/", 401, r#"{"detail": "expired"}"#)
        .respond(Method::Get, "events/", 200, "[]")
        .respond(Method::Post, "token/refresh/", 200, r#"{"access": "access-2"}"#);
    let session = logged_in("teacher");
    let api = api(&transport, session.clone());

    let response = api.client().send(ApiRequest::get("events/")).await.unwrap();
    assert_eq!(response.status, 200);

    let refresh = transport.requests_to(Method::Post, "token/refresh/");
    assert_eq!(refresh.len(), 1);
    assert_eq!(refresh[0].body.as_ref().unwrap()["refresh"], "refresh-1");
    assert_eq!(refresh[0].bearer, None);

    let sent = transport.requests_to(Method::Get, "events/");
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].bearer.as_deref(), Some("access-2"));

    assert_eq!(session.access_token().await.unwrap().as_deref(), Some("access-2"));
    assert_eq!(session.refresh_token().await.unwrap().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_rotated_refresh_token_is_stored() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "users/", 401, "")
        .respond(Method::Get, "users/", 200, "[]")
        .respond(
            Method::Post,
            "token/refresh/",
            200,
            r#"{"access": "access-2", "refresh": "refresh-2"}"#,
        );
    let session = logged_in("supervisor");
    let api = api(&transport, session.clone());

    api.users.list().await.unwrap();
    assert_eq!(session.refresh_token().await.unwrap().as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_second_401_means_session_expired() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "events/", 401, "")
        .respond(Method::Post, "token/refresh/", 200, r#"{"access": "access-2"}"#);
    let api = api(&transport, logged_in("teacher"));

    let err = api.events.list().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired), "{err:?}");
    // original, one refresh, one retry
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn test_failed_refresh_means_session_expired() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "events/", 401, "")
        .respond(Method::Post, "token/refresh/", 401, r#"{"detail": "Token is invalid"}"#);
    let api = api(&transport, logged_in("teacher"));

    let err = api.events.list().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired), "{err:?}");
    assert_eq!(transport.requests_to(Method::Get, "events/").len(), 1);
}

#[tokio::test]
async fn test_401_without_refresh_token() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "events/", 401, "");
    let session = SessionContext::in_memory(Session {
        access_token: Some("access-1".to_string()),
        ..Session::default()
    });
    let api = api(&transport, session);

    let err = api.events.list().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired), "{err:?}");
    assert!(transport.requests_to(Method::Post, "token/refresh/").is_empty());
}

#[tokio::test]
async fn test_non_401_errors_pass_through() {
    let transport = MockTransport::new();
    transport.respond(Method::Get, "events/", 500, "oops");
    let api = api(&transport, logged_in("teacher"));

    let err = api.events.list().await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 500, .. }), "{err:?}");
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_login_stores_session() {
    let transport = MockTransport::new();
    transport.respond(
        Method::Post,
        "token/",
        200,
        r#"{"access": "a", "refresh": "r", "role": "supervisor"}"#,
    );
    let session = logged_out();
    let api = api(&transport, session.clone());

    let tokens = api.auth.login("admin@juzeng.kz", "secret").await.unwrap();
    assert_eq!(tokens.role, "supervisor");
    assert_eq!(LANDING_ROUTE, "/calendar");

    let sent = &transport.requests()[0];
    assert_eq!(sent.body.as_ref().unwrap()["email"], "admin@juzeng.kz");
    assert_eq!(sent.bearer, None);

    assert_eq!(session.access_token().await.unwrap().as_deref(), Some("a"));
    assert_eq!(session.refresh_token().await.unwrap().as_deref(), Some("r"));
    assert_eq!(session.role().await.unwrap(), Some(Role::Supervisor));
}

#[tokio::test]
async fn test_login_failure_uses_server_message() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Post, "token/", 401, r#"{"message": "Wrong password"}"#);
    let session = logged_out();
    let api = api(&transport, session.clone());

    let err = api.auth.login("admin@juzeng.kz", "nope").await.unwrap_err();
    assert!(matches!(err, Error::Login(ref m) if m == "Wrong password"), "{err:?}");
    assert_eq!(session.access_token().await.unwrap(), None);
}

#[tokio::test]
async fn test_login_failure_default_message() {
    let transport = MockTransport::new();
    transport.respond(Method::Post, "token/", 400, "");
    let api = api(&transport, logged_out());

    let err = api.auth.login("a@b.c", "x").await.unwrap_err();
    assert!(matches!(err, Error::Login(ref m) if m == "Invalid credentials"), "{err:?}");
}

#[tokio::test]
async fn test_me_falls_back_to_users_me() {
    let transport = MockTransport::new();
    transport
        .respond(Method::Get, "me", 404, "")
        .respond(
            Method::Get,
            "users/me",
            200,
            r#"{"first_name": "Aruzhan", "last_name": "Sadykova", "role": "curator"}"#,
        );
    let api = api(&transport, logged_in("curator"));

    let profile = api.auth.me().await.unwrap();
    assert_eq!(profile.display_name(), "Aruzhan Sadykova");
    assert_eq!(profile.role.as_deref(), Some("curator"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let transport = MockTransport::new();
    let session = logged_in("teacher");
    let api = api(&transport, session.clone());

    api.auth.logout().await.unwrap();
    assert_eq!(session.access_token().await.unwrap(), None);
    assert_eq!(session.refresh_token().await.unwrap(), None);
    assert_eq!(session.role().await.unwrap(), None);
    assert!(transport.requests().is_empty());
}
