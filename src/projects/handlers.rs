use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{
    DeleteProjectResponse, DeleteStatus, LikesResponse, ProjectFilter, ProjectRequest,
    ProjectResponse, ProjectsResponse, TechnologiesResponse,
};
use super::repo::ProjectRepo;
use crate::{
    auth::jwt::AuthUser,
    error::AppResult,
    extract::ProjectId,
    state::AppState,
    technologies::TECHNOLOGY_TAGS,
};

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/technologies", get(list_technologies))
        .route(
            "/projects/:project_id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route(
            "/projects/:project_id/likes",
            post(like_project).delete(unlike_project),
        )
}

#[instrument(skip(state, query))]
pub async fn list_projects(
    State(state): State<AppState>,
    query: Result<Query<ProjectFilter>, QueryRejection>,
) -> AppResult<Json<ProjectsResponse>> {
    let Query(filter) = query?;
    let query = filter.validate()?;
    let projects = state.store.list_projects(&query).await?;
    Ok(Json(ProjectsResponse { projects }))
}

pub async fn list_technologies() -> Json<TechnologiesResponse> {
    Json(TechnologiesResponse {
        technologies: TECHNOLOGY_TAGS.iter().map(|t| t.to_string()).collect(),
    })
}

#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
) -> AppResult<Json<ProjectResponse>> {
    let project = state.store.get_project(id).await?;
    Ok(Json(ProjectResponse {
        project,
        message: None,
    }))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<ProjectRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ProjectResponse>)> {
    let Json(body) = body?;
    let input = body.validate()?;
    let project = state.store.create_project(input, &user).await?;
    info!(project_id = %project.id, name = %project.name, "project created");
    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            project,
            message: None,
        }),
    ))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    ProjectId(id): ProjectId,
    body: Result<Json<ProjectRequest>, JsonRejection>,
) -> AppResult<Json<ProjectResponse>> {
    let Json(body) = body?;
    let input = body.validate()?;
    let project = state.store.update_project(id, input, &user).await?;
    info!(project_id = %project.id, "project updated");
    Ok(Json(ProjectResponse {
        project,
        message: Some("Project updated successfully".into()),
    }))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn delete_project(
    State(state): State<AppState>,
    user: AuthUser,
    ProjectId(id): ProjectId,
) -> AppResult<Json<DeleteProjectResponse>> {
    state.store.remove_project(id, &user).await?;
    info!(project_id = %id, "project deleted");
    Ok(Json(DeleteProjectResponse {
        status: DeleteStatus {
            project_id: id,
            deleted: true,
        },
    }))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn like_project(
    State(state): State<AppState>,
    user: AuthUser,
    ProjectId(id): ProjectId,
) -> AppResult<(StatusCode, Json<LikesResponse>)> {
    let likes = state.store.like_project(id, &user).await?;
    info!(project_id = %id, "project liked");
    Ok((StatusCode::CREATED, Json(LikesResponse { likes })))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn unlike_project(
    State(state): State<AppState>,
    user: AuthUser,
    ProjectId(id): ProjectId,
) -> AppResult<Json<LikesResponse>> {
    let likes = state.store.unlike_project(id, &user).await?;
    info!(project_id = %id, "project unliked");
    Ok(Json(LikesResponse { likes }))
}
