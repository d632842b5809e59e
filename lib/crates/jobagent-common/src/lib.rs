//! Shared configuration vocabulary for the jobagent bootstrapper and
//! lifecycle manager: recognized `.env` keys, their defaults, the `.env`
//! document model, and the serializable status types.

pub mod env_file;
pub mod keys;
pub mod types;

pub use env_file::{Edit, EnvDocument, EnvFileError};
pub use types::{ContainerState, StatusOutput};
