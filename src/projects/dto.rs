use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::{Project, ProjectInput, ProjectQuery};
use crate::{
    error::{AppError, AppResult},
    validation,
};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// Body of `POST /projects` and `PUT /projects/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub deployment_link: Option<String>,
}

impl ProjectRequest {
    pub fn validate(self) -> AppResult<ProjectInput> {
        let name = validation::project_name(&self.name)?;
        let description = validation::optional_str(
            self.description.as_deref(),
            "project description",
            validation::DESCRIPTION_MAX,
        )?;
        let github = match self.github.as_deref() {
            None | Some("") => None,
            Some(g) => Some(validation::github(g)?),
        };
        let technologies = validation::technologies(&self.technologies)?;
        let deployment_link = validation::optional_str(
            self.deployment_link.as_deref(),
            "project deployment link",
            validation::DEPLOYMENT_LINK_MAX,
        )?;
        Ok(ProjectInput {
            name,
            description,
            github,
            technologies,
            deployment_link,
        })
    }
}

/// Query string of `GET /projects`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub name: Option<String>,
    pub technologies: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProjectFilter {
    pub fn validate(self) -> AppResult<ProjectQuery> {
        let name = match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => {
                Some(validation::non_empty_str(n, "project name query param")?)
            }
            _ => None,
        };
        let technologies = match self.technologies.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => validation::query_technologies(t)?,
            _ => Vec::new(),
        };
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::invalid(
                "limit",
                format!("must be between 1 and {MAX_LIMIT}"),
            ));
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::invalid("offset", "must not be negative"));
        }
        Ok(ProjectQuery {
            name,
            technologies,
            limit,
            offset,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub project: Project,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStatus {
    pub project_id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteProjectResponse {
    pub status: DeleteStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikesResponse {
    pub likes: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TechnologiesResponse {
    pub technologies: Vec<String>,
}
