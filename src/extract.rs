//! Path extractors that validate identifiers before a handler runs.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{error::AppError, validation};

async fn path_param<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
    name: &str,
    label: &str,
) -> Result<String, AppError> {
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| AppError::invalid(label, e.body_text()))?;
    params
        .get(name)
        .cloned()
        .ok_or_else(|| AppError::invalid(label, "is required"))
}

/// `:project_id` segment, validated as an id.
#[derive(Debug, Clone, Copy)]
pub struct ProjectId(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ProjectId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = path_param(parts, state, "project_id", "project id").await?;
        Ok(Self(validation::object_id(&raw, "project id")?))
    }
}

/// `:comment_id` segment, validated as an id.
#[derive(Debug, Clone, Copy)]
pub struct CommentId(pub Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CommentId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = path_param(parts, state, "comment_id", "comment id").await?;
        Ok(Self(validation::object_id(&raw, "comment id")?))
    }
}

/// `:username` segment, normalized.
#[derive(Debug, Clone)]
pub struct UsernamePath(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UsernamePath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = path_param(parts, state, "username", "username").await?;
        Ok(Self(validation::username(&raw)?))
    }
}
