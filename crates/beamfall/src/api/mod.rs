pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod types;
