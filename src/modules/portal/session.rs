use log::warn;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

use crate::modules::api::types::SignupRequest;
use crate::modules::api::{ApiClient, ApiError, Application, Profile, User};
use crate::modules::reset::password::{validate_new_password, PasswordError};
use crate::modules::utils::logging::{log_data_operation, log_session_event};
use crate::MIN_PASSWORD_LENGTH;

pub const MSG_LOGIN_REQUIRED: &str = "Please login first.";
pub const MSG_LOGIN_TO_APPLY: &str = "Please login to apply for internships";
pub const MSG_PROFILE_INCOMPLETE: &str =
    "Please complete your profile before applying for internships";
pub const MSG_ALREADY_APPLIED: &str = "You have already applied for this internship!";

/// Errors surfaced by session shell operations; `Display` is the user-facing text
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Rejected(String),
    #[error("Unable to connect to server. Please try again later.")]
    Transport,
    #[error("Failed to access session file: {0}")]
    Storage(#[from] io::Error),
    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PortalError {
    /// Map an API failure, using `default` when the server gave no message
    fn from_api(err: ApiError, default: &str) -> Self {
        if err.is_connectivity() {
            return PortalError::Transport;
        }
        PortalError::Rejected(err.server_message().unwrap_or(default).to_string())
    }
}

/// Signup form as entered by the user
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Local checks before the form is sent
    pub fn validate(&self) -> Result<(), PortalError> {
        match validate_new_password(&self.password, &self.confirm_password) {
            Ok(()) => Ok(()),
            Err(PasswordError::Mismatch) => Err(PortalError::Validation(
                PasswordError::Mismatch.to_string(),
            )),
            Err(PasswordError::TooShort) => Err(PortalError::Validation(format!(
                "Password must be at least {} characters long!",
                MIN_PASSWORD_LENGTH
            ))),
        }
    }
}

/// Everything the client knows about the logged-in student
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub current_user: Option<User>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl SessionContext {
    /// Load the saved session; a missing or unreadable file means logged out
    pub fn load(path: &Path) -> Result<Self, PortalError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&data) {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Persist the session so the next invocation stays logged in
    pub fn save(&self, path: &Path) -> Result<(), PortalError> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::File::create(path)?.write_all(data.as_bytes())?;
        Ok(())
    }

    /// Forget the saved session
    pub fn discard(path: &Path) -> Result<(), PortalError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn has_complete_profile(&self) -> bool {
        self.profile.as_ref().map(Profile::is_complete).unwrap_or(false)
    }

    pub fn has_applied(&self, position: &str, company: &str) -> bool {
        self.applications
            .iter()
            .any(|app| app.matches(position, company))
    }

    fn user(&self) -> Result<&User, PortalError> {
        self.current_user
            .as_ref()
            .ok_or_else(|| PortalError::Validation(MSG_LOGIN_REQUIRED.to_string()))
    }

    pub async fn login(
        &mut self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<&User, PortalError> {
        match client.login(email.trim(), password).await {
            Ok(response) => {
                log_session_event("login", &response.user.email, true, None);
                self.start_session(client, response.user).await
            }
            Err(e) => {
                log_session_event("login", email, false, Some(&e.to_string()));
                Err(PortalError::from_api(e, "Login failed. Please try again."))
            }
        }
    }

    pub async fn signup(
        &mut self,
        client: &ApiClient,
        form: &SignupForm,
    ) -> Result<&User, PortalError> {
        form.validate()?;
        let request = SignupRequest {
            first_name: form.first_name.trim(),
            last_name: form.last_name.trim(),
            email: form.email.trim(),
            password: &form.password,
        };
        match client.signup(&request).await {
            Ok(response) => {
                log_session_event("signup", &response.user.email, true, None);
                self.start_session(client, response.user).await
            }
            Err(e) => {
                log_session_event("signup", &form.email, false, Some(&e.to_string()));
                Err(PortalError::from_api(e, "Signup failed. Please try again."))
            }
        }
    }

    async fn start_session(&mut self, client: &ApiClient, user: User) -> Result<&User, PortalError> {
        *self = Self {
            current_user: Some(user),
            ..Self::default()
        };
        // The login itself succeeded; missing profile data is not fatal
        if let Err(e) = self.load_user_data(client).await {
            warn!("Error loading user data: {}", e);
        }
        self.user()
    }

    /// Drop everything about the current user
    pub fn logout(&mut self) {
        if let Some(user) = &self.current_user {
            log_session_event("logout", &user.email, true, None);
        }
        *self = Self::default();
    }

    /// Refresh profile and applications from the server
    pub async fn load_user_data(&mut self, client: &ApiClient) -> Result<(), PortalError> {
        let user_id = self.user()?.id;
        self.profile = client
            .fetch_profile(user_id)
            .await
            .map_err(|e| PortalError::from_api(e, "Failed to load profile."))?;
        self.applications = client
            .fetch_applications(user_id)
            .await
            .map_err(|e| PortalError::from_api(e, "Failed to load applications."))?;
        Ok(())
    }

    /// Create or update the profile; `user_id` is taken from the session
    pub async fn save_profile(
        &mut self,
        client: &ApiClient,
        mut profile: Profile,
    ) -> Result<&Profile, PortalError> {
        let user = self.user()?;
        profile.user_id = user.id;
        let email = user.email.clone();

        match client.save_profile(&profile).await {
            Ok(saved) => {
                log_data_operation("save_profile", &email, "profile", true, None);
                Ok(self.profile.insert(saved))
            }
            Err(e) => {
                log_data_operation("save_profile", &email, "profile", false, Some(&e.to_string()));
                Err(PortalError::from_api(
                    e,
                    "Failed to save profile. Please try again.",
                ))
            }
        }
    }

    /// Submit an application, refusing locally when it cannot succeed
    pub async fn apply(
        &mut self,
        client: &ApiClient,
        position: &str,
        company: &str,
    ) -> Result<&Application, PortalError> {
        let user = self
            .current_user
            .as_ref()
            .ok_or_else(|| PortalError::Validation(MSG_LOGIN_TO_APPLY.to_string()))?;
        if !self.has_complete_profile() {
            return Err(PortalError::Validation(MSG_PROFILE_INCOMPLETE.to_string()));
        }
        if self.has_applied(position, company) {
            return Err(PortalError::Validation(MSG_ALREADY_APPLIED.to_string()));
        }
        let (user_id, email) = (user.id, user.email.clone());

        match client.apply(user_id, position, company).await {
            Ok(application) => {
                log_data_operation("apply", &email, "applications", true, Some(company));
                self.applications.push(application);
                let index = self.applications.len() - 1;
                Ok(&self.applications[index])
            }
            Err(e) => {
                log_data_operation("apply", &email, "applications", false, Some(&e.to_string()));
                Err(PortalError::from_api(
                    e,
                    "Failed to submit application. Please try again.",
                ))
            }
        }
    }
}
