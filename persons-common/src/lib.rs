//! # Persons Common Library
//!
//! Shared code for the persons service:
//! - Domain error type
//! - Configuration resolution (flags, environment, TOML, defaults)
//! - Tracing initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
