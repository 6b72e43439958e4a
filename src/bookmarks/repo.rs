use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    db::{self, MemberSet, PgStore},
    error::AppResult,
    projects::repo::{Project, PROJECT_SELECT},
};

#[async_trait]
pub trait BookmarkRepo: Send + Sync {
    /// Returns the bookmark-set after adding; `Conflict` if already saved.
    async fn add_bookmark(&self, project_id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>>;
    /// Returns the bookmark-set after removal; `Conflict` if not saved.
    async fn remove_bookmark(&self, project_id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>>;
    async fn list_bookmarked_projects(&self, user_id: Uuid) -> AppResult<Vec<Project>>;
}

#[async_trait]
impl BookmarkRepo for PgStore {
    async fn add_bookmark(&self, project_id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>> {
        db::push_member(&self.pool, MemberSet::SavedBy, project_id, user.id).await
    }

    async fn remove_bookmark(&self, project_id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>> {
        db::pull_member(&self.pool, MemberSet::SavedBy, project_id, user.id).await
    }

    async fn list_bookmarked_projects(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "{PROJECT_SELECT} WHERE $1 = ANY(p.saved_by) ORDER BY p.created_at DESC, p.id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
