use async_trait::async_trait;

use super::client::ApiClient;
use super::error::ApiError;
use super::types::{
    ForgotPasswordRequest, MessageBody, ResetCodeResponse, ResetPasswordRequest, VerifyCodeRequest,
};
use crate::modules::reset::gateway::ResetGateway;

#[async_trait]
impl ResetGateway for ApiClient {
    async fn request_reset_code(&self, email: &str) -> Result<ResetCodeResponse, ApiError> {
        self.post_json("/api/forgot-password", &ForgotPasswordRequest { email })
            .await
    }

    async fn verify_reset_code(&self, email: &str, code: &str) -> Result<MessageBody, ApiError> {
        self.post_json("/api/verify-reset-code", &VerifyCodeRequest { email, code })
            .await
    }

    async fn commit_new_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<MessageBody, ApiError> {
        self.post_json(
            "/api/reset-password",
            &ResetPasswordRequest {
                email,
                code,
                new_password,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::reset::{Phase, ResetFlowController, ResetInput};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_full_reset_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/forgot-password"))
            .and(body_json(json!({"email": "user@example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "If an account exists with this email, you will receive password reset instructions."
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/verify-reset-code"))
            .and(body_json(json!({"email": "user@example.com", "code": "999999"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid reset code"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/verify-reset-code"))
            .and(body_json(json!({"email": "user@example.com", "code": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Code verified"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/reset-password"))
            .and(body_json(json!({
                "email": "user@example.com",
                "code": "123456",
                "new_password": "validpass1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Password updated"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let controller = ResetFlowController::new(client, Duration::from_secs(5));

        let outcome = controller
            .submit(ResetInput::Email("user@example.com".to_string()))
            .await;
        assert!(outcome.ok);
        assert_eq!(outcome.phase, Phase::AwaitingCode);
        assert!(outcome.message.starts_with("If an account exists"));

        let outcome = controller.submit(ResetInput::Code("999999".to_string())).await;
        assert!(!outcome.ok);
        assert_eq!(outcome.message, "Invalid reset code");
        assert_eq!(outcome.phase, Phase::AwaitingCode);

        let outcome = controller.submit(ResetInput::Code("123456".to_string())).await;
        assert!(outcome.ok);
        assert_eq!(outcome.phase, Phase::AwaitingNewPassword);

        let outcome = controller
            .submit(ResetInput::new_password("validpass1", "validpass1"))
            .await;
        assert!(outcome.ok);
        assert_eq!(outcome.phase, Phase::Completed);
    }

    #[tokio::test]
    async fn test_unreachable_server_keeps_phase() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = ApiClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let controller = ResetFlowController::new(client, Duration::from_secs(2));

        let outcome = controller
            .submit(ResetInput::Email("user@example.com".to_string()))
            .await;
        assert!(!outcome.ok);
        assert_eq!(outcome.phase, Phase::AwaitingEmail);
        assert_eq!(
            outcome.message,
            "Unable to connect to server. Please try again later."
        );
    }
}
