use std::collections::{HashMap, HashSet};

use super::{path_depth, Agent, PATH_SEPARATOR};
use crate::error::LayoutError;

/// Check that every agent's materialized path is well formed and agrees
/// with its declared parent. Any violation rejects the whole snapshot.
///
/// A `parent_id` that names no agent in the snapshot is accepted; such an
/// agent is laid out as a root.
pub fn validate_agents(agents: &[Agent]) -> Result<(), LayoutError> {
    let mut by_id: HashMap<&str, &Agent> = HashMap::with_capacity(agents.len());

    for agent in agents {
        check_own_path(agent)?;
        // Paths end in the id, so unique ids also mean unique paths.
        if by_id.insert(agent.id.as_str(), agent).is_some() {
            return Err(LayoutError::DuplicateId(agent.id.clone()));
        }
    }

    for agent in agents {
        let Some(parent_id) = agent.parent_id.as_deref() else {
            continue;
        };
        if parent_id == agent.id {
            return Err(LayoutError::CyclicPath {
                id: agent.id.clone(),
                path: agent.path.clone(),
            });
        }
        if let Some(parent) = by_id.get(parent_id) {
            let nested = agent.path.len() == parent.path.len() + 1 + agent.id.len()
                && agent.path.starts_with(parent.path.as_str())
                && agent.path[parent.path.len()..].starts_with(PATH_SEPARATOR);
            if !nested {
                return Err(LayoutError::ParentPathMismatch {
                    id: agent.id.clone(),
                    path: agent.path.clone(),
                    parent: parent.id.clone(),
                    parent_path: parent.path.clone(),
                });
            }
        }
    }

    Ok(())
}

fn check_own_path(agent: &Agent) -> Result<(), LayoutError> {
    if agent.id.is_empty() || agent.id.contains(PATH_SEPARATOR) {
        return Err(LayoutError::InvalidId(agent.id.clone()));
    }
    if agent.path.is_empty() || agent.segments().any(str::is_empty) {
        return Err(LayoutError::MalformedPath {
            id: agent.id.clone(),
            path: agent.path.clone(),
        });
    }
    if agent.segments().last() != Some(agent.id.as_str()) {
        return Err(LayoutError::PathIdMismatch {
            id: agent.id.clone(),
            path: agent.path.clone(),
        });
    }

    let actual = path_depth(&agent.path);
    if agent.depth != actual {
        return Err(LayoutError::DepthMismatch {
            id: agent.id.clone(),
            declared: agent.depth,
            actual,
        });
    }

    let mut seen = HashSet::new();
    if !agent.segments().all(|s| seen.insert(s)) {
        return Err(LayoutError::CyclicPath {
            id: agent.id.clone(),
            path: agent.path.clone(),
        });
    }
    Ok(())
}
