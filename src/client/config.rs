use std::time::Duration;

use super::error::{ClientError, ClientResult};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("projectshare-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Reads `PROJECTSHARE_SERVER_URL` and `PROJECTSHARE_TIMEOUT_SECS`.
    pub fn from_env() -> ClientResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PROJECTSHARE_SERVER_URL") {
            config.base_url = url;
        }

        if let Ok(timeout) = std::env::var("PROJECTSHARE_TIMEOUT_SECS") {
            let secs: u64 = timeout
                .parse()
                .map_err(|_| ClientError::Config(format!("Invalid timeout value: {timeout}")))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parses the base URL, normalized to end with `/` so endpoints join under it.
    pub(crate) fn parsed_base_url(&self) -> ClientResult<url::Url> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::Config("Base URL cannot be empty".into()));
        }
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = url::Url::parse(&raw)
            .map_err(|e| ClientError::Config(format!("Invalid base URL: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::Config(format!("Unsupported URL scheme: {other}"))),
        }
    }
}
