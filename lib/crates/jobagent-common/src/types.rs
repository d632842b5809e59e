use serde::{Deserialize, Serialize};

/// State of the managed container as reported by the container runtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    /// No container with the configured name exists.
    Absent,
    /// The container exists but is not running.
    Stopped,
    Running,
}

impl ContainerState {
    /// Returns `true` if a container with the configured name exists.
    #[must_use]
    pub fn exists(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Absent => "absent",
            Self::Stopped => "stopped",
            Self::Running => "running",
        })
    }
}

/// `status-llm --json` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusOutput {
    pub container: String,
    pub state: ContainerState,
}
