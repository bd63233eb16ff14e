//! # hookline-core
//!
//! Core crate for hookline. Contains the error taxonomy shared by the
//! registry and dispatcher, the result alias, and the configuration schemas.
//!
//! This crate has **no** internal dependencies on other hookline crates.

pub mod config;
pub mod error;
pub mod result;

pub use config::HooklineConfig;
pub use error::HookError;
pub use result::HookResult;
