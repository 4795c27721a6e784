use std::fmt;

use crate::MIN_PASSWORD_LENGTH;

/// Local checks on a new password, applied before anything is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    Mismatch,
    TooShort,
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordError::Mismatch => f.write_str("Passwords do not match!"),
            PasswordError::TooShort => write!(
                f,
                "Password must be at least {} characters!",
                MIN_PASSWORD_LENGTH
            ),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Check a new password and its confirmation.
/// Mismatch is reported before length.
pub fn validate_new_password(new_password: &str, confirm_password: &str) -> Result<(), PasswordError> {
    if new_password != confirm_password {
        return Err(PasswordError::Mismatch);
    }
    if new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}
