pub mod config;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod prompts;
pub mod resume;
pub mod session;
pub mod store;
pub mod ui;
