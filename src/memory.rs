//! In-process store used by the handler tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    bookmarks::repo::BookmarkRepo,
    comments::repo::{Comment, CommentRepo},
    db::MemberSet,
    error::{AppError, AppResult},
    projects::repo::{Project, ProjectInput, ProjectQuery, ProjectRepo},
    users::repo::{NewUser, User, UserRepo, UserUpdate},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>, // insertion order
    comments: Vec<Comment>, // insertion order
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Tables {
    fn username_of(&self, id: Uuid) -> String {
        self.users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn materialize(&self, project: &Project) -> Project {
        let mut p = project.clone();
        p.owner_username = self.username_of(p.owner_id);
        p.comments = self
            .comments
            .iter()
            .filter(|c| c.project_id == p.id)
            .map(|c| c.id)
            .collect();
        p
    }

    fn newest_first(&self, keep: impl Fn(&Project) -> bool) -> Vec<Project> {
        self.projects
            .iter()
            .rev()
            .filter(|p| keep(p))
            .map(|p| self.materialize(p))
            .collect()
    }

    fn project_mut(&mut self, id: Uuid) -> AppResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    fn owned_project_mut(&mut self, id: Uuid, user: &AuthUser) -> AppResult<&mut Project> {
        let project = self.project_mut(id)?;
        if project.owner_id != user.id {
            return Err(AppError::Forbidden(
                "Only the project owner can modify this project".into(),
            ));
        }
        Ok(project)
    }

    fn project_exists(&self, id: Uuid) -> AppResult<()> {
        if self.projects.iter().any(|p| p.id == id) {
            Ok(())
        } else {
            Err(AppError::NotFound("Project not found".into()))
        }
    }

    fn comment(&self, id: Uuid) -> AppResult<Comment> {
        let mut c = self
            .comments
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;
        c.username = self.username_of(c.user_id);
        Ok(c)
    }

    fn comments_of(&self, project_id: Uuid) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.project_id == project_id)
            .map(|c| {
                let mut c = c.clone();
                c.username = self.username_of(c.user_id);
                c
            })
            .collect()
    }

    fn members(&mut self, set: MemberSet, id: Uuid) -> AppResult<&mut Vec<Uuid>> {
        let project = self.project_mut(id)?;
        Ok(match set {
            MemberSet::Likes => &mut project.likes,
            MemberSet::SavedBy => &mut project.saved_by,
        })
    }

    fn push_member(&mut self, set: MemberSet, id: Uuid, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let members = self.members(set, id)?;
        if members.contains(&user_id) {
            return Err(AppError::Conflict(set.present_msg().into()));
        }
        members.push(user_id);
        Ok(members.clone())
    }

    fn pull_member(&mut self, set: MemberSet, id: Uuid, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let members = self.members(set, id)?;
        if !members.contains(&user_id) {
            return Err(AppError::Conflict(set.absent_msg().into()));
        }
        members.retain(|m| *m != user_id);
        Ok(members.clone())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.lock();
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict("Resource already exists".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            bio: None,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> AppResult<User> {
        let mut tables = self.lock();
        if let Some(email) = &update.email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::Conflict("Resource already exists".into()));
            }
        }
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(hash) = update.password_hash {
            user.password_hash = hash;
        }
        if let Some(bio) = update.bio {
            user.bio = Some(bio);
        }
        Ok(user.clone())
    }
}

#[async_trait]
impl ProjectRepo for MemoryStore {
    async fn list_projects(&self, query: &ProjectQuery) -> AppResult<Vec<Project>> {
        let tables = self.lock();
        let needle = query.name.as_ref().map(|n| n.to_lowercase());
        Ok(tables
            .newest_first(|p| {
                needle
                    .as_ref()
                    .map_or(true, |n| p.name.to_lowercase().contains(n))
                    && query.technologies.iter().all(|t| p.technologies.contains(t))
            })
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }

    async fn list_projects_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Project>> {
        Ok(self.lock().newest_first(|p| p.owner_id == owner_id))
    }

    async fn get_project(&self, id: Uuid) -> AppResult<Project> {
        let tables = self.lock();
        tables
            .projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.materialize(p))
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    async fn create_project(&self, input: ProjectInput, owner: &AuthUser) -> AppResult<Project> {
        let now = OffsetDateTime::now_utc();
        let project = Project {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            github: input.github,
            technologies: input.technologies,
            deployment_link: input.deployment_link,
            owner_id: owner.id,
            owner_username: owner.username.clone(),
            likes: Vec::new(),
            saved_by: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let mut tables = self.lock();
        tables.projects.push(project.clone());
        Ok(tables.materialize(&project))
    }

    async fn update_project(
        &self,
        id: Uuid,
        input: ProjectInput,
        user: &AuthUser,
    ) -> AppResult<Project> {
        let mut tables = self.lock();
        let project = tables.owned_project_mut(id, user)?;
        project.name = input.name;
        project.description = input.description;
        project.github = input.github;
        project.technologies = input.technologies;
        project.deployment_link = input.deployment_link;
        project.updated_at = OffsetDateTime::now_utc();
        let project = project.clone();
        Ok(tables.materialize(&project))
    }

    async fn remove_project(&self, id: Uuid, user: &AuthUser) -> AppResult<()> {
        let mut tables = self.lock();
        tables.owned_project_mut(id, user)?;
        tables.projects.retain(|p| p.id != id);
        tables.comments.retain(|c| c.project_id != id);
        Ok(())
    }

    async fn like_project(&self, id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>> {
        self.lock().push_member(MemberSet::Likes, id, user.id)
    }

    async fn unlike_project(&self, id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>> {
        self.lock().pull_member(MemberSet::Likes, id, user.id)
    }
}

#[async_trait]
impl CommentRepo for MemoryStore {
    async fn create_comment(
        &self,
        project_id: Uuid,
        text: String,
        author: &AuthUser,
    ) -> AppResult<Comment> {
        let mut tables = self.lock();
        tables.project_exists(project_id)?;
        let comment = Comment {
            id: Uuid::new_v4(),
            project_id,
            user_id: author.id,
            username: author.username.clone(),
            comment: text,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: Uuid) -> AppResult<Comment> {
        self.lock().comment(id)
    }

    async fn list_comments(&self, project_id: Uuid) -> AppResult<Vec<Comment>> {
        let tables = self.lock();
        tables.project_exists(project_id)?;
        Ok(tables.comments_of(project_id))
    }

    async fn remove_comment(
        &self,
        project_id: Uuid,
        comment_id: Uuid,
        user: &AuthUser,
    ) -> AppResult<Vec<Comment>> {
        let mut tables = self.lock();
        tables.project_exists(project_id)?;
        let comment = tables.comment(comment_id)?;
        if comment.project_id != project_id {
            return Err(AppError::NotFound("Comment not found".into()));
        }
        if comment.user_id != user.id {
            return Err(AppError::Forbidden(
                "Only the comment author can delete this comment".into(),
            ));
        }
        tables.comments.retain(|c| c.id != comment_id);
        Ok(tables.comments_of(project_id))
    }
}

#[async_trait]
impl BookmarkRepo for MemoryStore {
    async fn add_bookmark(&self, project_id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>> {
        self.lock().push_member(MemberSet::SavedBy, project_id, user.id)
    }

    async fn remove_bookmark(&self, project_id: Uuid, user: &AuthUser) -> AppResult<Vec<Uuid>> {
        self.lock().pull_member(MemberSet::SavedBy, project_id, user.id)
    }

    async fn list_bookmarked_projects(&self, user_id: Uuid) -> AppResult<Vec<Project>> {
        Ok(self.lock().newest_first(move |p| p.saved_by.contains(&user_id)))
    }
}
