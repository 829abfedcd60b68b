//! Core configuration and error types for HookGate.
//!
//! This crate holds the pieces shared by the HTTP gate and the server binary:
//! the [`GateConfig`] loaded from the environment and the [`HookGateError`]
//! used when that configuration cannot be honored.

mod config;
mod error;

pub use config::GateConfig;
pub use error::{HookGateError, HookGateResult};
