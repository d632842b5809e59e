//! Unit tests for the jobagent CLI
//!
//! These tests use fake ports and temporary directories; they never touch
//! docker, apt or the network.

mod config_loading;
mod helpers;
mod lifecycle;
