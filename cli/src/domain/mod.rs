//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod container;
pub mod error;
pub mod layout;

pub use config::{AppConfig, ConfigLayer};
pub use container::{LaunchSpec, Mount};
pub use error::{BootstrapError, LifecycleError};
