//! Integration tests for the jobagent binaries
//!
//! These spawn the real executables. None of them needs docker, apt or a
//! running LLM server: each exercises a path that ends before any of those
//! are required, or that treats their absence as a normal outcome.

mod lifecycle_commands;
