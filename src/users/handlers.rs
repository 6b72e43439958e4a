use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{PublicUser, UpdateUserRequest, UserProfileResponse, UserResponse},
    repo::{UserRepo, UserUpdate},
};
use crate::{
    auth::{jwt::AuthUser, password::hash_password},
    error::{AppError, AppResult},
    extract::UsernamePath,
    projects::repo::ProjectRepo,
    state::AppState,
    validation,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:username", get(get_user).put(update_user))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    UsernamePath(username): UsernamePath,
) -> AppResult<Json<UserProfileResponse>> {
    let user = state
        .store
        .find_user_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let projects = state.store.list_projects_by_owner(user.id).await?;
    Ok(Json(UserProfileResponse {
        user: PublicUser::from(user),
        projects,
    }))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    UsernamePath(username): UsernamePath,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    if username != user.username {
        warn!(target_username = %username, "attempt to update another user");
        return Err(AppError::Forbidden("You can only update your own profile".into()));
    }

    let Json(body) = body?;
    let email = body.email.as_deref().map(validation::email).transpose()?;
    let password_hash = match body.password.as_deref() {
        Some(p) => Some(hash_password(validation::password(p)?).await?),
        None => None,
    };
    let bio = body
        .bio
        .as_deref()
        .map(|b| validation::bounded_str(b, "bio", 1, validation::BIO_MAX))
        .transpose()?;
    if email.is_none() && password_hash.is_none() && bio.is_none() {
        return Err(AppError::invalid(
            "request body",
            "at least one of email, password or bio is required",
        ));
    }

    let updated = state
        .store
        .update_user(
            user.id,
            UserUpdate {
                email,
                password_hash,
                bio,
            },
        )
        .await?;
    info!(username = %updated.username, "user updated");
    Ok(Json(UserResponse {
        user: PublicUser::from(updated),
        message: Some("User updated successfully".into()),
    }))
}
