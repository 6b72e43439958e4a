use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RefreshRequest, SignupRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
    },
    error::{AppError, AppResult},
    state::AppState,
    users::{
        dto::PublicUser,
        repo::{NewUser, User, UserRepo},
    },
    validation,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

fn issue_tokens(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let keys = JwtKeys::from_ref(state);
    let identity = AuthUser {
        id: user.id,
        username: user.username.clone(),
    };
    Ok(AuthResponse {
        access_token: keys.sign_access(&identity)?,
        refresh_token: keys.sign_refresh(&identity)?,
        user: PublicUser::from(user),
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let Json(payload) = payload?;
    let username = validation::username(&payload.username)?;
    let email = validation::email(&payload.email)?;
    let password = validation::password(&payload.password)?;

    if state.store.find_user_by_username(&username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::Conflict("Username already registered".into()));
    }

    let password_hash = hash_password(password).await?;
    let user = state
        .store
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(issue_tokens(&state, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let username = validation::username(&payload.username)?;
    let password = validation::non_empty_str(&payload.password, "password")?;

    let Some(user) = state.store.find_user_by_username(&username).await? else {
        warn!(%username, "login unknown username");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(password, user.password_hash.clone()).await? {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AuthResponse>> {
    let Json(payload) = payload?;
    let token = validation::non_empty_str(&payload.refresh_token, "refresh token")?;

    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Forbidden("Invalid or expired refresh token".into())
    })?;

    let user = state
        .store
        .find_user_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    Ok(Json(issue_tokens(&state, user)?))
}
