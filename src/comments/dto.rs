use serde::{Deserialize, Serialize};

use super::repo::Comment;
use crate::{error::AppResult, validation};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
}

impl CommentRequest {
    pub fn validate(self) -> AppResult<String> {
        validation::bounded_str(&self.comment, "comment", 1, validation::COMMENT_MAX)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}
