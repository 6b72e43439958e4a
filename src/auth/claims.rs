use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload. `sub` and `username` identify the caller; `kind` keeps
/// refresh tokens out of authenticated routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

impl Claims {
    pub fn issue(
        user_id: Uuid,
        username: &str,
        kind: TokenKind,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            sub: user_id,
            username: username.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
            iss: issuer.to_string(),
            aud: audience.to_string(),
            kind,
        }
    }
}
