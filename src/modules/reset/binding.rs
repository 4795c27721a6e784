use super::session::Phase;

/// Which parts of the reset form are shown, and which are read-only, for a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLayout {
    pub show_code: bool,
    pub show_new_password: bool,
    pub email_locked: bool,
    pub code_locked: bool,
    /// Label of the submit action; `None` once there is nothing left to submit
    pub submit_label: Option<&'static str>,
    pub return_to_login: bool,
}

impl FormLayout {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::AwaitingEmail => Self {
                show_code: false,
                show_new_password: false,
                email_locked: false,
                code_locked: false,
                submit_label: Some("Send Reset Code"),
                return_to_login: false,
            },
            Phase::AwaitingCode => Self {
                show_code: true,
                show_new_password: false,
                email_locked: true,
                code_locked: false,
                submit_label: Some("Verify Code"),
                return_to_login: false,
            },
            Phase::AwaitingNewPassword => Self {
                show_code: true,
                show_new_password: true,
                email_locked: true,
                code_locked: true,
                submit_label: Some("Reset Password"),
                return_to_login: false,
            },
            Phase::Completed => Self {
                show_code: true,
                show_new_password: true,
                email_locked: true,
                code_locked: true,
                submit_label: None,
                return_to_login: true,
            },
        }
    }
}
