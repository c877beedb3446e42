use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Project flavour inferred from manifest files in the context directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    PythonLike,
    NodeLike,
    ContainerLike,
}

/// Category of the most recent shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandCategory {
    VersionControl,
    Container,
    PythonLike,
    NodeLike,
}

impl CommandCategory {
    /// Classify a shell command by its leading text, case-insensitively.
    pub fn classify(command: &str) -> Option<Self> {
        let lowered = command.trim().to_lowercase();
        if lowered.starts_with("git") {
            Some(Self::VersionControl)
        } else if lowered.starts_with("docker") {
            // also covers `docker-compose`
            Some(Self::Container)
        } else if ["python", "pip", "conda"]
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
        {
            Some(Self::PythonLike)
        } else if ["npm", "yarn", "node"]
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
        {
            Some(Self::NodeLike)
        } else {
            None
        }
    }
}

/// Snapshot of environmental signals used to bias tip selection.
/// Built fresh every refresh cycle and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFacts {
    pub in_repo_directory: bool,
    pub project_kinds: BTreeSet<ProjectKind>,
    pub recent_command: Option<CommandCategory>,
}

impl ContextFacts {
    pub fn has_project_kind(&self, kind: ProjectKind) -> bool {
        self.project_kinds.contains(&kind)
    }
}
