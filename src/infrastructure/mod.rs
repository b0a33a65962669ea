// Infrastructure module - External dependencies and adapters
pub mod config;
pub mod http;
pub mod logging;
