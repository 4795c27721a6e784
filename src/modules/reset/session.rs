use serde::Serialize;
use std::fmt;

/// Step of the password reset wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Phase {
    AwaitingEmail,
    AwaitingCode,
    AwaitingNewPassword,
    Completed,
}

impl Phase {
    /// The phase a successful submission moves to; `None` once completed
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::AwaitingEmail => Some(Phase::AwaitingCode),
            Phase::AwaitingCode => Some(Phase::AwaitingNewPassword),
            Phase::AwaitingNewPassword => Some(Phase::Completed),
            Phase::Completed => None,
        }
    }

    /// Name of the backend exchange made from this phase, for logs
    pub fn step_name(self) -> &'static str {
        match self {
            Phase::AwaitingEmail => "request_code",
            Phase::AwaitingCode => "verify_code",
            Phase::AwaitingNewPassword => "commit_password",
            Phase::Completed => "completed",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::AwaitingEmail
    }
}

/// Marker that the backend issued a reset code.
///
/// Older portal servers echo the code back in the response; newer ones keep
/// it server-side. Either way the client never compares against it.
#[derive(Clone, PartialEq, Eq)]
pub enum IssuedCode {
    Disclosed(String),
    Withheld,
}

impl IssuedCode {
    pub fn from_response(reset_code: Option<String>) -> Self {
        match reset_code {
            Some(code) if !code.is_empty() => IssuedCode::Disclosed(code),
            _ => IssuedCode::Withheld,
        }
    }
}

// Keep codes out of Debug output (and therefore out of logs)
impl fmt::Debug for IssuedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssuedCode::Disclosed(_) => f.write_str("Disclosed(***)"),
            IssuedCode::Withheld => f.write_str("Withheld"),
        }
    }
}

/// State of one password reset attempt
#[derive(Clone, Default, PartialEq)]
pub struct ResetSession {
    phase: Phase,
    email: String,
    issued_code: Option<IssuedCode>,
    verified_code: Option<String>,
    generation: u64,
    in_flight: bool,
}

impl ResetSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to `AwaitingEmail` with every field cleared.
    /// The generation moves on so late responses for the old attempt are ignored.
    pub fn reset(&mut self) {
        *self = Self {
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn issued_code(&self) -> Option<&IssuedCode> {
        self.issued_code.as_ref()
    }

    pub fn verified_code(&self) -> Option<&str> {
        self.verified_code.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub(crate) fn set_in_flight(&mut self, in_flight: bool) {
        self.in_flight = in_flight;
    }

    /// AwaitingEmail -> AwaitingCode
    pub(crate) fn code_issued(&mut self, email: String, code: IssuedCode) {
        debug_assert_eq!(self.phase, Phase::AwaitingEmail);
        debug_assert!(!email.is_empty());
        self.email = email;
        self.issued_code = Some(code);
        self.phase = Phase::AwaitingCode;
    }

    /// AwaitingCode -> AwaitingNewPassword
    pub(crate) fn code_verified(&mut self, code: String) {
        debug_assert_eq!(self.phase, Phase::AwaitingCode);
        self.verified_code = Some(code);
        self.phase = Phase::AwaitingNewPassword;
    }

    /// AwaitingNewPassword -> Completed
    pub(crate) fn password_committed(&mut self) {
        debug_assert_eq!(self.phase, Phase::AwaitingNewPassword);
        self.phase = Phase::Completed;
    }
}

impl fmt::Debug for ResetSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetSession")
            .field("phase", &self.phase)
            .field("email", &self.email)
            .field("issued_code", &self.issued_code)
            .field("verified_code", &self.verified_code.as_ref().map(|_| "***"))
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert_eq!(Phase::AwaitingEmail.next(), Some(Phase::AwaitingCode));
        assert_eq!(Phase::AwaitingCode.next(), Some(Phase::AwaitingNewPassword));
        assert_eq!(Phase::AwaitingNewPassword.next(), Some(Phase::Completed));
        assert_eq!(Phase::Completed.next(), None);
        assert!(Phase::AwaitingEmail < Phase::Completed);
    }

    #[test]
    fn test_transitions_keep_invariants() {
        let mut session = ResetSession::new();
        assert_eq!(session.phase(), Phase::AwaitingEmail);
        assert_eq!(session.email(), "");
        assert!(session.issued_code().is_none());

        session.code_issued("user@example.com".to_string(), IssuedCode::Withheld);
        assert_eq!(session.phase(), Phase::AwaitingCode);
        assert_eq!(session.email(), "user@example.com");
        assert_eq!(session.issued_code(), Some(&IssuedCode::Withheld));

        session.code_verified("123456".to_string());
        assert_eq!(session.phase(), Phase::AwaitingNewPassword);
        assert_eq!(session.verified_code(), Some("123456"));
        assert!(session.issued_code().is_some());

        session.password_committed();
        assert_eq!(session.phase(), Phase::Completed);
        assert!(session.issued_code().is_some());
        assert_eq!(session.email(), "user@example.com");
    }

    #[test]
    fn test_reset_clears_everything_but_generation() {
        let mut session = ResetSession::new();
        session.code_issued(
            "user@example.com".to_string(),
            IssuedCode::Disclosed("123456".to_string()),
        );
        session.set_in_flight(true);
        let before = session.generation();

        session.reset();
        assert_eq!(session.phase(), Phase::AwaitingEmail);
        assert_eq!(session.email(), "");
        assert_eq!(session.issued_code(), None);
        assert_eq!(session.verified_code(), None);
        assert!(!session.is_in_flight());
        assert_eq!(session.generation(), before + 1);
    }

    #[test]
    fn test_debug_hides_codes() {
        let mut session = ResetSession::new();
        session.code_issued(
            "user@example.com".to_string(),
            IssuedCode::from_response(Some("482913".to_string())),
        );
        session.code_verified("482913".to_string());
        let printed = format!("{:?}", session);
        assert!(!printed.contains("482913"));
        assert!(printed.contains("Disclosed(***)"));
    }

    #[test]
    fn test_issued_code_from_response() {
        assert_eq!(IssuedCode::from_response(None), IssuedCode::Withheld);
        assert_eq!(
            IssuedCode::from_response(Some(String::new())),
            IssuedCode::Withheld
        );
        assert_eq!(
            IssuedCode::from_response(Some("1".to_string())),
            IssuedCode::Disclosed("1".to_string())
        );
    }
}
