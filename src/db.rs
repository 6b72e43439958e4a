use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    bookmarks::repo::BookmarkRepo,
    comments::repo::CommentRepo,
    config::AppConfig,
    error::{AppError, AppResult},
    projects::repo::ProjectRepo,
    users::repo::UserRepo,
};

/// Everything the handlers need from persistence.
pub trait Store: UserRepo + ProjectRepo + CommentRepo + BookmarkRepo + Send + Sync {}

impl<T> Store for T where T: UserRepo + ProjectRepo + CommentRepo + BookmarkRepo + Send + Sync {}

/// PostgreSQL implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

/// Array columns on `projects` holding user-id sets.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MemberSet {
    Likes,
    SavedBy,
}

impl MemberSet {
    fn column(self) -> &'static str {
        match self {
            MemberSet::Likes => "likes",
            MemberSet::SavedBy => "saved_by",
        }
    }

    pub(crate) fn present_msg(self) -> &'static str {
        match self {
            MemberSet::Likes => "Project already liked",
            MemberSet::SavedBy => "Project already bookmarked",
        }
    }

    pub(crate) fn absent_msg(self) -> &'static str {
        match self {
            MemberSet::Likes => "Project is not liked",
            MemberSet::SavedBy => "Project is not bookmarked",
        }
    }
}

/// Adds `user_id` to the set in one conditional update.
///
/// Fails with `NotFound` when the project is missing and `Conflict` when
/// the user is already a member.
pub(crate) async fn push_member(
    pool: &PgPool,
    set: MemberSet,
    project_id: Uuid,
    user_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let col = set.column();
    let updated: Option<(Vec<Uuid>,)> = sqlx::query_as(&format!(
        r#"
        UPDATE projects
           SET {col} = array_append({col}, $2)
         WHERE id = $1 AND NOT ($2 = ANY({col}))
        RETURNING {col}
        "#
    ))
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some((members,)) => Ok(members),
        None => {
            current_members(pool, set, project_id).await?;
            Err(AppError::Conflict(set.present_msg().into()))
        }
    }
}

/// Removes `user_id` from the set; `Conflict` when it was not a member.
pub(crate) async fn pull_member(
    pool: &PgPool,
    set: MemberSet,
    project_id: Uuid,
    user_id: Uuid,
) -> AppResult<Vec<Uuid>> {
    let col = set.column();
    let updated: Option<(Vec<Uuid>,)> = sqlx::query_as(&format!(
        r#"
        UPDATE projects
           SET {col} = array_remove({col}, $2)
         WHERE id = $1 AND $2 = ANY({col})
        RETURNING {col}
        "#
    ))
    .bind(project_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some((members,)) => Ok(members),
        None => {
            current_members(pool, set, project_id).await?;
            Err(AppError::Conflict(set.absent_msg().into()))
        }
    }
}

async fn current_members(pool: &PgPool, set: MemberSet, project_id: Uuid) -> AppResult<Vec<Uuid>> {
    let col = set.column();
    let row: Option<(Vec<Uuid>,)> =
        sqlx::query_as(&format!("SELECT {col} FROM projects WHERE id = $1"))
            .bind(project_id)
            .fetch_optional(pool)
            .await?;
    row.map(|(m,)| m)
        .ok_or_else(|| AppError::NotFound("Project not found".into()))
}
