//! Infrastructure layer: concrete implementations of application port traits.
//!
//! All I/O lives here: process execution, docker, apt, filesystem, the
//! configuration sources and the HTTP probe.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod apt;
pub mod command_runner;
pub mod config;
pub mod docker;
pub mod fs;
pub mod network;
