pub mod client;
pub mod error;
mod reset;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{Application, Profile, User};
