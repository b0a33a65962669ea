// Core module - Resource client contract and command invocation
pub mod client;
pub mod invocation;

pub use client::{ClientResult, ResourceClient};
pub use invocation::{CommandFlags, CommandInvocation, Credential};
