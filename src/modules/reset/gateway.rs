use async_trait::async_trait;

use crate::modules::api::error::ApiError;
use crate::modules::api::types::{MessageBody, ResetCodeResponse};

/// Backend operations the password reset flow depends on
#[async_trait]
pub trait ResetGateway: Send + Sync {
    /// Ask the backend to issue a reset code for `email`
    async fn request_reset_code(&self, email: &str) -> Result<ResetCodeResponse, ApiError>;

    /// Ask the backend whether `code` is the code it issued for `email`
    async fn verify_reset_code(&self, email: &str, code: &str) -> Result<MessageBody, ApiError>;

    /// Set the new password, presenting the verified code as proof
    async fn commit_new_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<MessageBody, ApiError>;
}
