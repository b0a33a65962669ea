// Domain module - Records, configuration model and errors
pub mod config;
pub mod error;
pub mod project;
pub mod record;
