use super::*;
use crate::web::http::MockHttpClient;
use crate::web::storage::MemoryStorage;
use plantdoc_shared::HttpMethod;
use serde_json::json;

const BASE: &str = "http://api.test";
const USER_JSON: &str = r#"{"id":"u1","name":"Asha","email":"asha@farm.io"}"#;

fn setup() -> PlantApi<MockHttpClient> {
    PlantApi::new(BASE, MockHttpClient::new())
}

fn login_credentials() -> Credentials {
    Credentials::Login(LoginRequest {
        email: "asha@farm.io".into(),
        password: "secret".into(),
    })
}

fn signup_credentials() -> Credentials {
    Credentials::Signup(SignupRequest {
        name: "Asha".into(),
        email: "asha@farm.io".into(),
        password: "secret".into(),
    })
}

// =========================================================
// 初始化
// =========================================================

#[test]
fn test_restore_valid_session() {
    let store = SessionStore::new(MemoryStorage::with(&[
        (STORAGE_TOKEN_KEY, "tok"),
        (STORAGE_USER_KEY, USER_JSON),
    ]));

    match restore_session(&store, AppRoute::Dashboard) {
        InitOutcome::Restored(session) => {
            assert_eq!(session.token.as_str(), "tok");
            assert_eq!(session.user.display_name(), "Asha");
        }
        other => panic!("expected a restored session, got {:?}", other),
    }
    assert_eq!(store.storage().len(), 2);
}

#[test]
fn test_placeholder_token_is_cleared() {
    for placeholder in ["undefined", "null", "", "  "] {
        let store = SessionStore::new(MemoryStorage::with(&[
            (STORAGE_TOKEN_KEY, placeholder),
            (STORAGE_USER_KEY, USER_JSON),
        ]));

        assert_eq!(
            restore_session(&store, AppRoute::Experts),
            InitOutcome::Cleared {
                redirect: Some(AppRoute::Login)
            },
            "token {:?}",
            placeholder
        );
        assert_eq!(store.storage().len(), 0, "stale entries removed for {:?}", placeholder);
    }
}

#[test]
fn test_unparsable_user_is_cleared() {
    let store = SessionStore::new(MemoryStorage::with(&[
        (STORAGE_TOKEN_KEY, "tok"),
        (STORAGE_USER_KEY, "{not json"),
    ]));

    assert!(matches!(
        restore_session(&store, AppRoute::Root),
        InitOutcome::Cleared { .. }
    ));
    assert!(!store.storage().contains(STORAGE_TOKEN_KEY));
}

#[test]
fn test_missing_user_on_auth_page_does_not_redirect() {
    let store = SessionStore::new(MemoryStorage::with(&[(STORAGE_TOKEN_KEY, "tok")]));

    assert_eq!(
        restore_session(&store, AppRoute::Signup),
        InitOutcome::Cleared { redirect: None }
    );
    assert_eq!(store.storage().len(), 0);
}

// =========================================================
// 持久化
// =========================================================

#[test]
fn test_save_is_both_or_neither() {
    let storage = MemoryStorage::new();
    storage.fail_writes_for(STORAGE_USER_KEY);
    let store = SessionStore::new(storage);

    let session = Session {
        user: serde_json::from_str(USER_JSON).unwrap(),
        token: Token::parse("tok").unwrap(),
    };
    assert_eq!(store.save(&session), Err(AuthError::Storage));
    assert_eq!(store.storage().len(), 0);
    assert_eq!(store.load(), None);
}

#[test]
fn test_user_round_trips_through_storage() {
    let store = SessionStore::new(MemoryStorage::new());
    let user: User =
        serde_json::from_value(json!({"_id": "u9", "name": "Ravi", "region": "Punjab"})).unwrap();
    let session = Session {
        user: user.clone(),
        token: Token::parse("tok").unwrap(),
    };

    store.save(&session).unwrap();
    assert_eq!(store.load(), Some(session));

    store.clear();
    assert_eq!(store.storage().len(), 0);
}

// =========================================================
// 登录 / 注册
// =========================================================

#[tokio::test]
async fn test_login_persists_session() {
    let api = setup();
    api.client().mock_response(
        HttpMethod::Post,
        &format!("{}/auth/login", BASE),
        200,
        json!({"user": {"id": "u1", "name": "Asha"}, "token": "tok-1"}),
    );
    let store = SessionStore::new(MemoryStorage::new());

    let session = authenticate(&api, &store, &login_credentials()).await.unwrap();
    assert_eq!(session.token.as_str(), "tok-1");
    assert_eq!(store.storage().get(STORAGE_TOKEN_KEY).as_deref(), Some("tok-1"));
    assert_eq!(store.load(), Some(session));
}

#[tokio::test]
async fn test_signup_surfaces_server_message() {
    let api = setup();
    api.client().mock_response(
        HttpMethod::Post,
        &format!("{}/auth/signup", BASE),
        400,
        json!({"error": "Email already registered"}),
    );
    let store = SessionStore::new(MemoryStorage::new());

    let err = authenticate(&api, &store, &signup_credentials())
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Server("Email already registered".into()));
    assert_eq!(store.storage().len(), 0);
}

#[tokio::test]
async fn test_generic_messages_without_payload() {
    let api = setup();
    api.client().mock_network_error(
        HttpMethod::Post,
        &format!("{}/auth/signup", BASE),
        "offline",
    );
    api.client()
        .mock_raw(HttpMethod::Post, &format!("{}/auth/login", BASE), 500, "oops");
    let store = SessionStore::new(MemoryStorage::new());

    let err = authenticate(&api, &store, &signup_credentials())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Connection error. Please try again.");

    let err = authenticate(&api, &store, &login_credentials())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Login failed. Please try again.");
}

#[tokio::test]
async fn test_incomplete_response_keeps_existing_session() {
    let api = setup();
    api.client().mock_response(
        HttpMethod::Post,
        &format!("{}/auth/login", BASE),
        200,
        json!({"user": {"id": "u2"}}),
    );
    let store = SessionStore::new(MemoryStorage::with(&[
        (STORAGE_TOKEN_KEY, "old"),
        (STORAGE_USER_KEY, USER_JSON),
    ]));

    let err = authenticate(&api, &store, &login_credentials())
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::IncompleteResponse);
    assert_eq!(err.to_string(), "Invalid login credentials.");
    assert_eq!(store.load().map(|s| s.token), Token::parse("old"));
}

#[tokio::test]
async fn test_placeholder_token_in_response_is_rejected() {
    let api = setup();
    api.client().mock_response(
        HttpMethod::Post,
        &format!("{}/auth/login", BASE),
        200,
        json!({"user": {"id": "u1"}, "token": "undefined"}),
    );
    let store = SessionStore::new(MemoryStorage::new());

    let err = authenticate(&api, &store, &login_credentials())
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::IncompleteResponse);
    assert_eq!(store.storage().len(), 0);
}
