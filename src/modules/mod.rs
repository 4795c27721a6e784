// Declare all modules
pub mod api;
pub mod config;
pub mod portal;
pub mod reset;
pub mod utils;

// No re-exports here as they're handled in lib.rs
