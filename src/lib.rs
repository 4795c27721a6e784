// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{api, config, portal, reset, utils};

// Re-export commonly used types
pub use modules::api::ApiClient;
pub use modules::config::Config;
pub use modules::portal::SessionContext;
pub use modules::reset::{Phase, ResetFlowController, ResetInput, ResetOutcome};

// Constants
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = "session.json";
pub const DEFAULT_LOG_FILE: &str = "internlink.log";
pub const MIN_PASSWORD_LENGTH: usize = 8;
