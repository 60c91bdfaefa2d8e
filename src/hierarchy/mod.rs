use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

pub mod stats;
pub mod validate;

pub type AgentId = String;

/// Separator between segments of a materialized path.
pub const PATH_SEPARATOR: char = '.';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Active,
    Inactive,
}

impl AgentStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, AgentStatus::Active)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Active => write!(f, "active"),
            AgentStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// One agent record as handed over by the data source.
///
/// `path` is the materialized ancestor chain ending in the agent's own id,
/// e.g. `"root.A.B"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    #[serde(default)]
    pub parent_id: Option<AgentId>,
    pub path: String,
    pub depth: usize,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Agent {
    /// Path segments from the root down to this agent.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(PATH_SEPARATOR)
    }

    /// Every strict prefix of `path`, root first.
    pub fn proper_ancestor_paths(&self) -> impl Iterator<Item = &str> {
        self.path
            .match_indices(PATH_SEPARATOR)
            .map(move |(i, _)| &self.path[..i])
    }

    /// Whether this agent sits anywhere below `other` in the hierarchy.
    pub fn is_descendant_of(&self, other: &Agent) -> bool {
        is_path_below(&self.path, &other.path)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// `path` lies strictly below `ancestor`.
pub fn is_path_below(path: &str, ancestor: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path[ancestor.len()..].starts_with(PATH_SEPARATOR)
}

/// Number of separators in a path, i.e. the depth it implies.
pub fn path_depth(path: &str) -> usize {
    path.matches(PATH_SEPARATOR).count()
}

/// Read an agent snapshot (a JSON array of agents) from disk.
pub fn load_agents(path: &Path) -> Result<Vec<Agent>, LoadError> {
    let data = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let agents: Vec<Agent> = serde_json::from_str(&data).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(count = agents.len(), path = %path.display(), "loaded agent snapshot");
    Ok(agents)
}
