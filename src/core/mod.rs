pub mod components;
pub mod config;
pub mod error;
pub mod system;
pub mod viewport;
