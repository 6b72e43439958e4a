//! HTTP client for the projectshare API.
//!
//! One `ApiClient` wraps a configured `reqwest::Client`; every call takes an
//! optional bearer token rather than storing credentials.

pub mod config;
pub mod error;

use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

use crate::auth::dto::{AuthResponse, LoginRequest, SignupRequest};
use crate::users::dto::{UpdateUserRequest, UserResponse};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = config.parsed_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("projectshare-client")),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    pub async fn get<T, Q>(&self, endpoint: &str, query: &Q, token: Option<&str>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(Method::GET, endpoint, Some(query), None::<&()>, token)
            .await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, None::<&()>, Some(body), token)
            .await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B, token: Option<&str>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, endpoint, None::<&()>, Some(body), token)
            .await
    }

    pub async fn delete<T>(&self, endpoint: &str, token: Option<&str>) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        self.request(Method::DELETE, endpoint, None::<&()>, None::<&()>, token)
            .await
    }

    /// `POST /auth/signup`
    pub async fn signup(&self, user: &SignupRequest) -> ClientResult<AuthResponse> {
        self.post("/auth/signup", user, None).await
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &LoginRequest) -> ClientResult<AuthResponse> {
        self.post("/auth/login", credentials, None).await
    }

    /// `PUT /users/:username` with the caller's access token.
    pub async fn update_user(
        &self,
        username: &str,
        update: &UpdateUserRequest,
        token: &str,
    ) -> ClientResult<UserResponse> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config("Base URL cannot hold a path".into()))?
            .pop_if_empty()
            .extend(["users", username]);
        self.send(Method::PUT, url, None::<&()>, Some(update), Some(token))
            .await
    }

    fn url_for(&self, endpoint: &str) -> ClientResult<url::Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("Invalid endpoint {endpoint}: {e}")))
    }

    async fn request<T, Q, B>(
        &self,
        method: Method,
        endpoint: &str,
        query: Option<&Q>,
        body: Option<&B>,
        token: Option<&str>,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.send(method, self.url_for(endpoint)?, query, body, token)
            .await
    }

    async fn send<T, Q, B>(
        &self,
        method: Method,
        url: url::Url,
        query: Option<&Q>,
        body: Option<&B>,
        token: Option<&str>,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(query) = query {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        debug!(%method, %url, "api request");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(%method, %url, status = status.as_u16(), "api error response");
            return Err(ClientError::from_response(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
