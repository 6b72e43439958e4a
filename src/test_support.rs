use axum::{
    body::{to_bytes, Body},
    extract::FromRef,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    app::build_app,
    auth::jwt::{AuthUser, JwtKeys},
    state::AppState,
    users::repo::{NewUser, UserRepo},
};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::fake();
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    pub fn keys(&self) -> JwtKeys {
        JwtKeys::from_ref(&self.state)
    }

    /// Inserts a user directly; the password hash is not a usable credential.
    pub async fn seed_user(&self, username: &str) -> AuthUser {
        let user = self
            .state
            .store
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "unusable".into(),
            })
            .await
            .unwrap();
        AuthUser {
            id: user.id,
            username: user.username,
        }
    }

    pub fn token(&self, user: &AuthUser) -> String {
        self.keys().sign_access(user).unwrap()
    }
}

/// Drives one request through the router; empty bodies decode to `Null`.
pub async fn send(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let authorization = token.map(|t| format!("Bearer {t}"));
    send_with_header(router, method, path, authorization.as_deref(), body).await
}

/// Like [`send`], with the raw `Authorization` header value.
pub async fn send_with_header(
    router: &Router,
    method: Method,
    path: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(path);
    if let Some(value) = authorization {
        req = req.header(header::AUTHORIZATION, value);
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}
