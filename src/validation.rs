//! Pure input validators.
//!
//! Every validator takes the raw value plus a label used in the error
//! message, and returns the normalized value or `AppError::InvalidInput`.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::technologies;

pub const DESCRIPTION_MAX: usize = 2000;
pub const DEPLOYMENT_LINK_MAX: usize = 500;
pub const COMMENT_MAX: usize = 1000;
pub const BIO_MAX: usize = 500;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-z0-9_]{3,30}$").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref PROJECT_NAME_RE: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._\-]{2,99}$").unwrap();
}

pub fn object_id(raw: &str, label: &str) -> AppResult<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::invalid(label, "is required"));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::invalid(label, "is not a valid id"))
}

pub fn non_empty_str(raw: &str, label: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(label, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Trimmed string whose char count lies in `min..=max`.
pub fn bounded_str(raw: &str, label: &str, min: usize, max: usize) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(label, "must not be empty"));
    }
    let len = trimmed.chars().count();
    if len < min {
        return Err(AppError::invalid(
            label,
            format!("must be at least {min} characters"),
        ));
    }
    if len > max {
        return Err(AppError::invalid(
            label,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Optional field: absent or `""` become `None`; whitespace-only is rejected.
pub fn optional_str(raw: Option<&str>, label: &str, max: usize) -> AppResult<Option<String>> {
    match raw {
        None | Some("") => Ok(None),
        Some(v) => bounded_str(v, label, 1, max).map(Some),
    }
}

pub fn username(raw: &str) -> AppResult<String> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AppError::invalid("username", "is required"));
    }
    if !USERNAME_RE.is_match(&normalized) {
        return Err(AppError::invalid(
            "username",
            "must be 3-30 characters of letters, digits or underscores",
        ));
    }
    Ok(normalized)
}

pub fn email(raw: &str) -> AppResult<String> {
    let normalized = raw.trim().to_lowercase();
    if !EMAIL_RE.is_match(&normalized) {
        return Err(AppError::invalid("email", "is not a valid email address"));
    }
    Ok(normalized)
}

pub fn password(raw: &str) -> AppResult<String> {
    let len = raw.chars().count();
    if len < 8 {
        return Err(AppError::invalid("password", "must be at least 8 characters"));
    }
    if len > 128 {
        return Err(AppError::invalid("password", "must be at most 128 characters"));
    }
    Ok(raw.to_string())
}

pub fn project_name(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid("project name", "is required"));
    }
    if !PROJECT_NAME_RE.is_match(trimmed) {
        return Err(AppError::invalid(
            "project name",
            "must be 3-100 characters of letters, digits, spaces, '.', '_' or '-'",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn github(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid("project github", "must not be empty"));
    }
    let url = Url::parse(trimmed)
        .map_err(|_| AppError::invalid("project github", "is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::invalid("project github", "must use http or https"));
    }
    match url.host_str() {
        Some("github.com") | Some("www.github.com") => {}
        _ => {
            return Err(AppError::invalid(
                "project github",
                "must be a github.com link",
            ))
        }
    }
    if url.path().trim_matches('/').is_empty() {
        return Err(AppError::invalid(
            "project github",
            "must point to a user or repository",
        ));
    }
    Ok(trimmed.to_string())
}

/// Non-empty list of known tags without duplicates, in canonical spelling.
pub fn technologies(raw: &[String]) -> AppResult<Vec<String>> {
    const LABEL: &str = "project technologies";
    if raw.is_empty() {
        return Err(AppError::invalid(LABEL, "must contain at least one technology"));
    }
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        let Some(known) = technologies::canonical(tag) else {
            return Err(AppError::invalid(LABEL, format!("unknown technology '{tag}'")));
        };
        if out.iter().any(|t| t == known) {
            return Err(AppError::invalid(LABEL, format!("duplicate technology '{known}'")));
        }
        out.push(known.to_string());
    }
    Ok(out)
}

/// Comma separated form used by the `technologies` query parameter.
pub fn query_technologies(raw: &str) -> AppResult<Vec<String>> {
    let parts: Vec<String> = raw.split(',').map(|p| p.trim().to_string()).collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(AppError::invalid(
            "technologies query param",
            "must be a comma separated list of technologies",
        ));
    }
    technologies(&parts).map_err(|e| match e {
        AppError::InvalidInput { reason, .. } => {
            AppError::invalid("technologies query param", reason)
        }
        other => other,
    })
}
