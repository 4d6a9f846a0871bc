//! # trackgate common library
//!
//! Shared code for the trackgate service crates:
//! - Error type used across crates
//! - TOML bootstrap configuration
//! - Logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
