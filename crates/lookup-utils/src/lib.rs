//! Shared utilities for the lookup bot workspace
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-backed configuration access.

pub mod config;
pub mod logging;

pub use config::{EnvSource, ProcessEnv};
pub use logging::init_tracing;
