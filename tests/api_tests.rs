use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use watchall::auth::TokenValidator;
use watchall::config::{AuthConfig, Config};

const ISSUER: &str = "https://identity.watch-all.com/";
const SECRET: &str = "integration-test-secret";

fn test_config() -> Config {
    let mut config = Config::default();
    config.database.connection_string = "sqlite::memory:".to_string();
    config.auth.signing_key = SECRET.to_string();
    config
}

async fn spawn_app() -> (Router, String) {
    let config = test_config();
    let token = TokenValidator::new(&config.auth)
        .expect("valid auth config")
        .issue("integration-tests")
        .expect("failed to sign token");

    let state = watchall::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    (watchall::api::router(state), token)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["backend"], "sqlite");
}

#[tokio::test]
async fn test_writes_require_bearer_token() {
    let (app, token) = spawn_app().await;
    let show = json!({ "id": "s1", "name": "Foo", "rating": 8.0 });

    let (status, body) = send(&app, "POST", "/api/shows", None, Some(show.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "POST", "/api/shows", Some("garbage"), Some(show.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", "/api/shows/s1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Nothing was written by the rejected requests.
    let (_, body) = send(&app, "GET", "/api/shows", None, None).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(&app, "POST", "/api/shows", Some(&token), Some(show)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rejects_wrong_issuer_wrong_key_and_expired_tokens() {
    let (app, _) = spawn_app().await;
    let channel = json!({ "name": "HBO" });

    let wrong_issuer = TokenValidator::new(&AuthConfig {
        issuer: "https://someone-else.example/".to_string(),
        signing_key: SECRET.to_string(),
        token_lifetime_minutes: 5,
    })
    .unwrap()
    .issue("mallory")
    .unwrap();

    let wrong_key = TokenValidator::new(&AuthConfig {
        issuer: ISSUER.to_string(),
        signing_key: "not-the-secret".to_string(),
        token_lifetime_minutes: 5,
    })
    .unwrap()
    .issue("mallory")
    .unwrap();

    let expired = TokenValidator::new(&test_config().auth)
        .unwrap()
        .issue_with_lifetime("alice", chrono::Duration::seconds(-5))
        .unwrap();

    for token in [wrong_issuer, wrong_key, expired] {
        let (status, _) =
            send(&app, "POST", "/api/channels", Some(&token), Some(channel.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_show_crud_flow() {
    let (app, token) = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/shows",
        Some(&token),
        Some(json!({ "id": "s1", "name": "Foo", "rating": 8.5, "genreIds": ["g1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "s1");

    let (status, body) = send(&app, "GET", "/api/shows/s1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Foo");
    assert_eq!(body["data"]["genreIds"], json!(["g1"]));

    let (status, _) = send(
        &app,
        "POST",
        "/api/shows",
        Some(&token),
        Some(json!({ "id": "s1", "name": "Again", "rating": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/shows/s1",
        Some(&token),
        Some(json!({ "name": "Foo Reloaded", "rating": 9.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "s1");

    let (_, body) = send(&app, "GET", "/api/shows/s1", None, None).await;
    assert_eq!(body["data"]["name"], "Foo Reloaded");

    let (status, _) = send(&app, "DELETE", "/api/shows/s1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/shows/s1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "DELETE", "/api/shows/s1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_never_creates() {
    let (app, token) = spawn_app().await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/genres/g404",
        Some(&token),
        Some(json!({ "name": "Drama" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/genres", None, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_update_rejects_mismatched_body_id() {
    let (app, token) = spawn_app().await;
    send(
        &app,
        "POST",
        "/api/channels",
        Some(&token),
        Some(json!({ "id": "c1", "name": "HBO" })),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/channels/c1",
        Some(&token),
        Some(json!({ "id": "c2", "name": "HBO Max" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_padded_path_id_is_rejected_not_trimmed() {
    let (app, token) = spawn_app().await;
    send(
        &app,
        "POST",
        "/api/shows",
        Some(&token),
        Some(json!({ "id": "s1", "name": "Foo", "rating": 7.0 })),
    )
    .await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/shows/%20s1",
        Some(&token),
        Some(json!({ "name": "Bar", "rating": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/api/shows/%20s1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/api/shows/s1", None, None).await;
    assert_eq!(body["data"]["name"], "Foo");
}

#[tokio::test]
async fn test_top_shows() {
    let (app, token) = spawn_app().await;

    for (id, name, rating) in [
        ("s1", "The Office", 8.9),
        ("s2", "Office Space", 7.7),
        ("s3", "Breaking Bad", 9.5),
        ("s4", "The Wire", 9.3),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/shows",
            Some(&token),
            Some(json!({ "id": id, "name": name, "rating": rating })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", "/api/shows/top?count=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["s3", "s4"]);

    let (_, body) = send(&app, "GET", "/api/shows/top?name=Office&count=10", None, None).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["s1", "s2"]);

    let (_, body) = send(&app, "GET", "/api/shows/top?name=office", None, None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_deleting_show_leaves_seasons_and_episodes() {
    let (app, token) = spawn_app().await;

    send(
        &app,
        "POST",
        "/api/shows",
        Some(&token),
        Some(json!({ "id": "s1", "name": "Foo", "rating": 7.0 })),
    )
    .await;
    for (id, number) in [("se2", 2), ("se1", 1)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/seasons",
            Some(&token),
            Some(json!({ "id": id, "showId": "s1", "number": number })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(
        &app,
        "POST",
        "/api/episodes",
        Some(&token),
        Some(json!({
            "id": "e1",
            "seasonId": "se1",
            "number": 1,
            "title": "Pilot",
            "airDate": "2024-01-07"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/shows/s1/seasons", None, None).await;
    assert_eq!(body["data"][0]["id"], "se1");
    assert_eq!(body["data"][1]["id"], "se2");

    let (status, _) = send(&app, "DELETE", "/api/shows/s1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/shows/s1/seasons", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/seasons/se1/episodes", None, None).await;
    assert_eq!(body["data"][0]["title"], "Pilot");
    assert_eq!(body["data"][0]["airDate"], "2024-01-07");
}

#[tokio::test]
async fn test_users_are_protected_and_never_expose_password_hash() {
    let (app, token) = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(&token),
        Some(json!({
            "id": "u1",
            "login": "alice",
            "email": "alice@example.com",
            "passwordHash": "$argon2id$secret"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("passwordHash").is_none());

    for uri in [
        "/api/users/u1",
        "/api/users/by-login/alice",
        "/api/users/by-email/alice@example.com",
    ] {
        let (status, body) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["data"]["id"], "u1");
        assert!(body["data"].get("passwordHash").is_none());
    }

    let (_, body) = send(&app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert!(!body.to_string().contains("argon2"));

    let (status, _) = send(&app, "GET", "/api/users/by-login/bob", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(&token),
        Some(json!({ "login": "bob", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_password_is_not_implemented() {
    let (app, token) = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/validate-password",
        Some(&token),
        Some(json!({ "login": "alice", "password": "hunter2" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_openapi_lists_entity_routes() {
    let (app, _) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/api/shows",
        "/api/shows/top",
        "/api/shows/{id}/seasons",
        "/api/seasons/{id}/episodes",
        "/api/channels/{id}",
        "/api/genres",
        "/api/episodes/{id}",
        "/api/users/validate-password",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }

    assert!(body["components"]["securitySchemes"]["bearer"].is_object());
    assert!(body["paths"]["/api/genres/{id}"]["delete"]["security"].is_array());
}
