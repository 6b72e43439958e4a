use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    db::PgStore,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait CommentRepo: Send + Sync {
    /// `NotFound` when the parent project does not exist.
    async fn create_comment(&self, project_id: Uuid, text: String, author: &AuthUser)
        -> AppResult<Comment>;
    async fn get_comment(&self, id: Uuid) -> AppResult<Comment>;
    /// Comments of a project, oldest first; `NotFound` for a missing project.
    async fn list_comments(&self, project_id: Uuid) -> AppResult<Vec<Comment>>;
    /// Deletes one comment and returns the project's remaining comments.
    ///
    /// `NotFound` when the comment is absent or belongs to another project,
    /// `Forbidden` when `user` did not write it.
    async fn remove_comment(&self, project_id: Uuid, comment_id: Uuid, user: &AuthUser)
        -> AppResult<Vec<Comment>>;
}

const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.project_id, c.user_id, u.username, c.comment, c.created_at
      FROM comments c
      JOIN users u ON u.id = c.user_id
"#;

impl PgStore {
    async fn project_exists(&self, project_id: Uuid) -> AppResult<()> {
        let found: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        found
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }
}

#[async_trait]
impl CommentRepo for PgStore {
    async fn create_comment(
        &self,
        project_id: Uuid,
        text: String,
        author: &AuthUser,
    ) -> AppResult<Comment> {
        self.project_exists(project_id).await?;
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO comments (project_id, user_id, comment)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(project_id)
        .bind(author.id)
        .bind(&text)
        .fetch_one(&self.pool)
        .await?;
        self.get_comment(id).await
    }

    async fn get_comment(&self, id: Uuid) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(&format!("{COMMENT_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))
    }

    async fn list_comments(&self, project_id: Uuid) -> AppResult<Vec<Comment>> {
        self.project_exists(project_id).await?;
        let rows = sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} WHERE c.project_id = $1 ORDER BY c.created_at, c.id"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn remove_comment(
        &self,
        project_id: Uuid,
        comment_id: Uuid,
        user: &AuthUser,
    ) -> AppResult<Vec<Comment>> {
        self.project_exists(project_id).await?;
        let comment = self.get_comment(comment_id).await?;
        if comment.project_id != project_id {
            return Err(AppError::NotFound("Comment not found".into()));
        }
        if comment.user_id != user.id {
            return Err(AppError::Forbidden(
                "Only the comment author can delete this comment".into(),
            ));
        }
        sqlx::query("DELETE FROM comments WHERE id = $1 AND user_id = $2")
            .bind(comment_id)
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        self.list_comments(project_id).await
    }
}
