use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CommentRequest, CommentResponse, CommentsResponse};
use super::repo::CommentRepo;
use crate::{
    auth::jwt::AuthUser,
    error::AppResult,
    extract::{CommentId, ProjectId},
    state::AppState,
};

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/:project_id/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/projects/:project_id/comments/:comment_id",
            delete(delete_comment),
        )
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    ProjectId(project_id): ProjectId,
) -> AppResult<Json<CommentsResponse>> {
    let comments = state.store.list_comments(project_id).await?;
    Ok(Json(CommentsResponse { comments }))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    ProjectId(project_id): ProjectId,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CommentResponse>)> {
    let Json(body) = body?;
    let text = body.validate()?;
    let comment = state.store.create_comment(project_id, text, &user).await?;
    info!(%project_id, comment_id = %comment.id, "comment created");
    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    ProjectId(project_id): ProjectId,
    CommentId(comment_id): CommentId,
) -> AppResult<Json<CommentsResponse>> {
    let comments = state
        .store
        .remove_comment(project_id, comment_id, &user)
        .await?;
    info!(%project_id, %comment_id, "comment deleted");
    Ok(Json(CommentsResponse { comments }))
}
