use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo::BookmarkRepo;
use crate::{
    auth::jwt::AuthUser,
    error::AppResult,
    extract::ProjectId,
    projects::dto::ProjectsResponse,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedByResponse {
    pub saved_by: Vec<Uuid>,
}

pub fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/:project_id/bookmark",
            post(add_bookmark).delete(remove_bookmark),
        )
        .route("/bookmarks", get(list_bookmarks))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn add_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    ProjectId(project_id): ProjectId,
) -> AppResult<(StatusCode, Json<SavedByResponse>)> {
    let saved_by = state.store.add_bookmark(project_id, &user).await?;
    info!(%project_id, "project bookmarked");
    Ok((StatusCode::CREATED, Json(SavedByResponse { saved_by })))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn remove_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    ProjectId(project_id): ProjectId,
) -> AppResult<Json<SavedByResponse>> {
    let saved_by = state.store.remove_bookmark(project_id, &user).await?;
    info!(%project_id, "bookmark removed");
    Ok(Json(SavedByResponse { saved_by }))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn list_bookmarks(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ProjectsResponse>> {
    let projects = state.store.list_bookmarked_projects(user.id).await?;
    Ok(Json(ProjectsResponse { projects }))
}
