pub mod binding;
pub mod controller;
pub mod gateway;
pub mod password;
pub mod session;

// Re-export the main types and functions
pub use binding::FormLayout;
pub use controller::{FailureKind, ResetFlowController, ResetInput, ResetOutcome};
pub use gateway::ResetGateway;
pub use password::{validate_new_password, PasswordError};
pub use session::{IssuedCode, Phase, ResetSession};
