//! Common utilities for the reflow workspace.
//!
//! This crate provides shared infrastructure used by all components:
//! - **Warning System** - deduplicated reports of unsupported features
//! - **Logging** - `env_logger` setup for binaries and tests

pub mod logging;
pub mod warning;
