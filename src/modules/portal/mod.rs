pub mod display;
pub mod session;
pub mod user_interface;

pub use session::{PortalError, SessionContext, SignupForm};
pub use user_interface::{run_reset_wizard, WizardResult};
