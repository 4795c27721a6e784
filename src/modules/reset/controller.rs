use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::gateway::ResetGateway;
use super::password::validate_new_password;
use super::session::{IssuedCode, Phase, ResetSession};
use crate::modules::api::error::ApiError;
use crate::modules::api::types::ResetCodeResponse;
use crate::modules::utils::logging::log_reset_event;
use crate::modules::utils::time::format_duration;

pub const MSG_CODE_SENT: &str = "Reset code sent! Check your email.";
pub const MSG_CODE_SEND_FAILED: &str = "Failed to send reset code. Please try again.";
pub const MSG_CODE_VERIFIED: &str = "Code verified! Enter your new password.";
pub const MSG_CODE_INVALID: &str = "Invalid code. Please try again.";
pub const MSG_PASSWORD_RESET: &str = "Password reset successful! Redirecting to login...";
pub const MSG_PASSWORD_RESET_FAILED: &str = "Failed to reset password. Please try again.";
pub const MSG_CONNECTION_FAILED: &str = "Unable to connect to server. Please try again later.";
pub const MSG_EMAIL_REQUIRED: &str = "Please enter your email address.";
pub const MSG_CODE_REQUIRED: &str = "Please enter the reset code.";
pub const MSG_UNEXPECTED_INPUT: &str = "Unexpected input for the current step.";
pub const MSG_ALREADY_COMPLETED: &str =
    "Password reset already completed. Start over to reset again.";
pub const MSG_BUSY: &str = "A request is already in progress. Please wait.";
pub const MSG_RESTARTED: &str = "Password reset was restarted.";

/// What the user typed for the current step
#[derive(Clone, PartialEq, Eq)]
pub enum ResetInput {
    Email(String),
    Code(String),
    NewPassword {
        new_password: String,
        confirm_password: String,
    },
}

impl ResetInput {
    pub fn new_password(new_password: impl Into<String>, confirm_password: impl Into<String>) -> Self {
        ResetInput::NewPassword {
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}

impl fmt::Debug for ResetInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetInput::Email(email) => f.debug_tuple("Email").field(email).finish(),
            ResetInput::Code(_) => f.write_str("Code(***)"),
            ResetInput::NewPassword { .. } => f.write_str("NewPassword(***)"),
        }
    }
}

/// Why a submission did not advance the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// Local precondition failed; nothing was sent
    Validation,
    /// The backend answered with a failure status
    Rejected,
    /// No answer from the backend (connection failure or timeout)
    Transport,
    /// Another submission is still waiting on the backend
    Busy,
    /// The flow already completed
    Finished,
    /// The flow was restarted while this submission was in flight
    Stale,
}

/// Result of one `submit`, for the presentation layer to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub ok: bool,
    pub message: String,
    pub phase: Phase,
    pub failure: Option<FailureKind>,
}

impl ResetOutcome {
    fn success(message: impl Into<String>, phase: Phase) -> Self {
        Self {
            ok: true,
            message: message.into(),
            phase,
            failure: None,
        }
    }

    fn failure(kind: FailureKind, message: impl Into<String>, phase: Phase) -> Self {
        Self {
            ok: false,
            message: message.into(),
            phase,
            failure: Some(kind),
        }
    }
}

// One backend exchange, with everything it needs copied out of the session
enum Request {
    IssueCode {
        email: String,
    },
    VerifyCode {
        email: String,
        code: String,
    },
    Commit {
        email: String,
        code: String,
        new_password: String,
    },
}

impl Request {
    fn phase(&self) -> Phase {
        match self {
            Request::IssueCode { .. } => Phase::AwaitingEmail,
            Request::VerifyCode { .. } => Phase::AwaitingCode,
            Request::Commit { .. } => Phase::AwaitingNewPassword,
        }
    }

    fn email(&self) -> &str {
        match self {
            Request::IssueCode { email }
            | Request::VerifyCode { email, .. }
            | Request::Commit { email, .. } => email,
        }
    }

    fn rejection_default(&self) -> &'static str {
        match self {
            Request::IssueCode { .. } => MSG_CODE_SEND_FAILED,
            Request::VerifyCode { .. } => MSG_CODE_INVALID,
            Request::Commit { .. } => MSG_PASSWORD_RESET_FAILED,
        }
    }
}

enum Reply {
    CodeIssued(ResetCodeResponse),
    Accepted,
}

/// Clears the in-flight flag when the submission ends, however it ends.
/// A restart in the meantime owns the flag, so only the same generation is touched.
struct InFlight<'a> {
    session: &'a Mutex<ResetSession>,
    generation: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut session = lock(self.session);
        if session.generation() == self.generation {
            session.set_in_flight(false);
        }
    }
}

fn lock(session: &Mutex<ResetSession>) -> MutexGuard<'_, ResetSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives a `ResetSession` through its three backend exchanges
pub struct ResetFlowController<G> {
    gateway: G,
    session: Mutex<ResetSession>,
    timeout: Duration,
}

impl<G: ResetGateway> ResetFlowController<G> {
    /// `timeout` bounds each backend exchange
    pub fn new(gateway: G, timeout: Duration) -> Self {
        Self {
            gateway,
            session: Mutex::new(ResetSession::new()),
            timeout,
        }
    }

    /// Discard any attempt in progress and go back to asking for the email
    pub fn start(&self) {
        lock(&self.session).reset();
    }

    /// Copy of the current session state
    pub fn snapshot(&self) -> ResetSession {
        lock(&self.session).clone()
    }

    pub fn phase(&self) -> Phase {
        lock(&self.session).phase()
    }

    /// Handle the input for the current phase. Never fails: every problem is
    /// reported through the returned outcome and leaves the phase unchanged.
    pub async fn submit(&self, input: ResetInput) -> ResetOutcome {
        let (request, generation) = {
            let mut session = lock(&self.session);
            match prepare(&session, input) {
                Ok(request) => {
                    session.set_in_flight(true);
                    (request, session.generation())
                }
                Err(outcome) => return outcome,
            }
        };
        let _in_flight = InFlight {
            session: &self.session,
            generation,
        };

        let result = self.exchange(&request).await;

        let mut session = lock(&self.session);
        if session.generation() != generation {
            log_reset_event(
                request.phase().step_name(),
                request.email(),
                false,
                Some("response discarded after restart"),
            );
            return ResetOutcome::failure(FailureKind::Stale, MSG_RESTARTED, session.phase());
        }
        let outcome = apply(&mut session, request, result);
        drop(session);
        outcome
    }

    async fn exchange(&self, request: &Request) -> Result<Reply, ApiError> {
        let call = async {
            match request {
                Request::IssueCode { email } => self
                    .gateway
                    .request_reset_code(email)
                    .await
                    .map(Reply::CodeIssued),
                Request::VerifyCode { email, code } => self
                    .gateway
                    .verify_reset_code(email, code)
                    .await
                    .map(|_| Reply::Accepted),
                Request::Commit {
                    email,
                    code,
                    new_password,
                } => self
                    .gateway
                    .commit_new_password(email, code, new_password)
                    .await
                    .map(|_| Reply::Accepted),
            }
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                log_reset_event(
                    request.phase().step_name(),
                    request.email(),
                    false,
                    Some(&format!(
                        "no response within {}",
                        format_duration(self.timeout.as_secs())
                    )),
                );
                Err(ApiError::Timeout)
            }
        }
    }
}

/// Check the input against the current phase and turn it into a backend request
fn prepare(session: &ResetSession, input: ResetInput) -> Result<Request, ResetOutcome> {
    let phase = session.phase();
    let invalid = |message: &str| ResetOutcome::failure(FailureKind::Validation, message, phase);

    if phase == Phase::Completed {
        return Err(ResetOutcome::failure(
            FailureKind::Finished,
            MSG_ALREADY_COMPLETED,
            phase,
        ));
    }
    if session.is_in_flight() {
        return Err(ResetOutcome::failure(FailureKind::Busy, MSG_BUSY, phase));
    }

    match (phase, input) {
        (Phase::AwaitingEmail, ResetInput::Email(email)) => {
            let email = email.trim();
            if email.is_empty() {
                return Err(invalid(MSG_EMAIL_REQUIRED));
            }
            Ok(Request::IssueCode {
                email: email.to_string(),
            })
        }
        (Phase::AwaitingCode, ResetInput::Code(code)) => {
            let code = code.trim();
            if code.is_empty() {
                return Err(invalid(MSG_CODE_REQUIRED));
            }
            Ok(Request::VerifyCode {
                email: session.email().to_string(),
                code: code.to_string(),
            })
        }
        (
            Phase::AwaitingNewPassword,
            ResetInput::NewPassword {
                new_password,
                confirm_password,
            },
        ) => {
            if let Err(e) = validate_new_password(&new_password, &confirm_password) {
                return Err(invalid(&e.to_string()));
            }
            Ok(Request::Commit {
                email: session.email().to_string(),
                code: session.verified_code().unwrap_or_default().to_string(),
                new_password,
            })
        }
        _ => Err(invalid(MSG_UNEXPECTED_INPUT)),
    }
}

/// Fold the backend's answer into the session
fn apply(session: &mut ResetSession, request: Request, result: Result<Reply, ApiError>) -> ResetOutcome {
    let step = request.phase().step_name();

    let reply = match result {
        Ok(reply) => reply,
        Err(e) if e.is_connectivity() => {
            log_reset_event(step, request.email(), false, Some(&e.to_string()));
            return ResetOutcome::failure(FailureKind::Transport, MSG_CONNECTION_FAILED, session.phase());
        }
        Err(e) => {
            let message = e
                .server_message()
                .unwrap_or(request.rejection_default())
                .to_string();
            log_reset_event(step, request.email(), false, Some(&message));
            return ResetOutcome::failure(FailureKind::Rejected, message, session.phase());
        }
    };

    log_reset_event(step, request.email(), true, None);
    match (request, reply) {
        (Request::IssueCode { email }, Reply::CodeIssued(response)) => {
            session.code_issued(email, IssuedCode::from_response(response.reset_code));
            let message = non_empty(response.message).unwrap_or_else(|| MSG_CODE_SENT.to_string());
            ResetOutcome::success(message, session.phase())
        }
        (Request::VerifyCode { code, .. }, Reply::Accepted) => {
            session.code_verified(code);
            ResetOutcome::success(MSG_CODE_VERIFIED, session.phase())
        }
        (Request::Commit { .. }, Reply::Accepted) => {
            session.password_committed();
            ResetOutcome::success(MSG_PASSWORD_RESET, session.phase())
        }
        // exchange() pairs each request with its own reply kind
        _ => ResetOutcome::failure(FailureKind::Transport, MSG_CONNECTION_FAILED, session.phase()),
    }
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}
