use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    db::{self, MemberSet, PgStore},
    error::{AppError, AppResult},
};

/// Project record as stored and returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub github: Option<String>,
    pub technologies: Vec<String>,
    pub deployment_link: Option<String>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub likes: Vec<Uuid>,
    pub saved_by: Vec<Uuid>,
    pub comments: Vec<Uuid>, // comment ids, oldest first
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated user-editable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub github: Option<String>,
    pub technologies: Vec<String>,
    pub deployment_link: Option<String>,
}

/// Validated listing filter.
#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Every tag must be present on the project.
    pub technologies: Vec<String>,
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn list_projects(&self, query: &ProjectQuery) -> AppResult<Vec<Project>>;
    async fn list_projects_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Project>>;
    /// `NotFound` when absent.
    async fn get_project(&self, id: Uuid) -> AppResult<Project>;
    async fn create_project(&self, input: ProjectInput, owner: &AuthUser) -> AppResult<Project>;
    /// `NotFound` when absent, `Forbidden` when `user` is not the owner.
    async fn update_project(&self, id: Uuid, input: ProjectInput, user: &AuthUser)
        -> AppResult<Project>;
    /// Deletes the project and, by cascade, its comments.
    async fn remove_project(&self, id: Uuid, user: &AuthUser) -> AppResult<()>;
    /// Returns the like-set after adding; `Conflict` if already liked.
    async fn like_project(&self, id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>>;
    /// Returns the like-set after removal; `Conflict` if not liked.
    async fn unlike_project(&self, id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>>;
}

pub(crate) const PROJECT_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.github, p.technologies, p.deployment_link,
           p.owner_id, u.username AS owner_username, p.likes, p.saved_by,
           ARRAY(SELECT c.id FROM comments c
                  WHERE c.project_id = p.id
                  ORDER BY c.created_at, c.id) AS comments,
           p.created_at, p.updated_at
      FROM projects p
      JOIN users u ON u.id = p.owner_id
"#;

/// Escapes LIKE wildcards so the filter matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl PgStore {
    async fn ensure_owner(&self, id: Uuid, user: &AuthUser) -> AppResult<()> {
        let owner: Option<(Uuid,)> = sqlx::query_as("SELECT owner_id FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match owner {
            None => Err(AppError::NotFound("Project not found".into())),
            Some((owner_id,)) if owner_id != user.id => Err(AppError::Forbidden(
                "Only the project owner can modify this project".into(),
            )),
            Some(_) => Ok(()),
        }
    }
}

#[async_trait]
impl ProjectRepo for PgStore {
    async fn list_projects(&self, query: &ProjectQuery) -> AppResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            r#"{PROJECT_SELECT}
             WHERE ($1::text IS NULL OR p.name ILIKE $1)
               AND p.technologies @> $2::text[]
             ORDER BY p.created_at DESC, p.id
             LIMIT $3 OFFSET $4"#
        ))
        .bind(query.name.as_deref().map(like_pattern))
        .bind(&query.technologies)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_projects_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "{PROJECT_SELECT} WHERE p.owner_id = $1 ORDER BY p.created_at DESC, p.id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_project(&self, id: Uuid) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(&format!("{PROJECT_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn create_project(&self, input: ProjectInput, owner: &AuthUser) -> AppResult<Project> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO projects (name, description, github, technologies, deployment_link, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.github)
        .bind(&input.technologies)
        .bind(&input.deployment_link)
        .bind(owner.id)
        .fetch_one(&self.pool)
        .await?;
        self.get_project(id).await
    }

    async fn update_project(
        &self,
        id: Uuid,
        input: ProjectInput,
        user: &AuthUser,
    ) -> AppResult<Project> {
        self.ensure_owner(id, user).await?;
        sqlx::query(
            r#"
            UPDATE projects
               SET name = $3, description = $4, github = $5, technologies = $6,
                   deployment_link = $7, updated_at = now()
             WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(user.id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.github)
        .bind(&input.technologies)
        .bind(&input.deployment_link)
        .execute(&self.pool)
        .await?;
        self.get_project(id).await
    }

    async fn remove_project(&self, id: Uuid, user: &AuthUser) -> AppResult<()> {
        self.ensure_owner(id, user).await?;
        sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn like_project(&self, id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>> {
        db::push_member(&self.pool, MemberSet::Likes, id, user.id).await
    }

    async fn unlike_project(&self, id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>> {
        db::pull_member(&self.pool, MemberSet::Likes, id, user.id).await
    }
}
