use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::error::ApiError;
use super::types::{
    Application, ApplyRequest, AuthResponse, LoginRequest, MessageBody, Profile, SignupRequest,
};
use crate::modules::utils::logging::log_api_call;

/// HTTP client for the portal REST API
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build a client for `base_url`. `timeout` bounds every request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = base_url.into();
        // Trim trailing slashes for consistent URL building
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("internlink-client"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and decode the JSON answer
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let result = self.http.post(self.url(path)).json(body).send().await;
        self.finish(Method::POST, path, result).await
    }

    /// GET and decode the JSON answer
    pub(crate) async fn get_json<R>(&self, path: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let result = self.http.get(self.url(path)).send().await;
        self.finish(Method::GET, path, result).await
    }

    async fn finish<R>(
        &self,
        method: Method,
        path: &str,
        result: Result<Response, reqwest::Error>,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                log_api_call(method.as_str(), path, None, Some(&e.to_string()));
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log_api_call(method.as_str(), path, Some(status.as_u16()), Some(&e.to_string()));
                return Err(e.into());
            }
        };

        if !status.is_success() {
            let message = extract_message(&body);
            log_api_call(method.as_str(), path, Some(status.as_u16()), message.as_deref());
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        log_api_call(method.as_str(), path, Some(status.as_u16()), None);
        // Some endpoints answer 200 with an empty body
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| {
            ApiError::Transport(format!("undecodable response from {}: {}", path, e))
        })
    }

    /// POST /api/login
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/login", &LoginRequest { email, password })
            .await
    }

    /// POST /api/signup
    pub async fn signup(&self, request: &SignupRequest<'_>) -> Result<AuthResponse, ApiError> {
        self.post_json("/api/signup", request).await
    }

    /// GET /api/profile/{user_id}. A 404 means the student has no profile yet.
    pub async fn fetch_profile(&self, user_id: i64) -> Result<Option<Profile>, ApiError> {
        match self.get_json(&format!("/api/profile/{}", user_id)).await {
            Ok(profile) => Ok(Some(profile)),
            Err(ApiError::Rejected { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// POST /api/profile, creating or updating the profile
    pub async fn save_profile(&self, profile: &Profile) -> Result<Profile, ApiError> {
        self.post_json("/api/profile", profile).await
    }

    /// GET /api/applications/{user_id}
    pub async fn fetch_applications(&self, user_id: i64) -> Result<Vec<Application>, ApiError> {
        self.get_json(&format!("/api/applications/{}", user_id))
            .await
    }

    /// POST /api/apply
    pub async fn apply(
        &self,
        user_id: i64,
        position: &str,
        company: &str,
    ) -> Result<Application, ApiError> {
        self.post_json(
            "/api/apply",
            &ApplyRequest {
                user_id,
                position,
                company,
            },
        )
        .await
    }
}

/// Pull the `message` field out of an error body, if it is JSON and has one
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<MessageBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
