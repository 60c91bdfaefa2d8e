//! Collapse state for the hierarchy view.
//!
//! The set only changes through explicit calls; layout passes read it but
//! never modify it.

use std::collections::{HashMap, HashSet};

use crate::hierarchy::{Agent, AgentId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<AgentId>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`. Returns whether `id` is now collapsed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.to_string());
            true
        }
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn collapse(&mut self, id: &str) -> bool {
        self.collapsed.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentId> {
        self.collapsed.iter()
    }

    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Collapse every agent that has at least one descendant.
    pub fn collapse_all(&mut self, agents: &[Agent]) {
        let parents = paths_with_downline(agents);
        for agent in agents {
            if parents.contains(agent.path.as_str()) {
                self.collapsed.insert(agent.id.clone());
            }
        }
    }

    /// Collapse every agent at `depth` that has a descendant, so the view
    /// shows levels `0..=depth` and nothing deeper below them.
    pub fn collapse_below_depth(&mut self, agents: &[Agent], depth: usize) {
        let parents = paths_with_downline(agents);
        for agent in agents {
            if agent.depth == depth && parents.contains(agent.path.as_str()) {
                self.collapsed.insert(agent.id.clone());
            }
        }
    }

    /// Expand every ancestor of `id` so that it becomes visible.
    /// Returns false if no agent has that id.
    pub fn reveal(&mut self, agents: &[Agent], id: &str) -> bool {
        let Some(target) = agents.iter().find(|a| a.id == id) else {
            return false;
        };
        let by_path: HashMap<&str, &str> = agents
            .iter()
            .map(|a| (a.path.as_str(), a.id.as_str()))
            .collect();
        for prefix in target.proper_ancestor_paths() {
            if let Some(ancestor) = by_path.get(prefix) {
                self.collapsed.remove(*ancestor);
            }
        }
        true
    }
}

impl FromIterator<AgentId> for CollapseState {
    fn from_iter<I: IntoIterator<Item = AgentId>>(iter: I) -> Self {
        Self {
            collapsed: iter.into_iter().collect(),
        }
    }
}

/// Paths that are a strict prefix of some other agent's path.
fn paths_with_downline(agents: &[Agent]) -> HashSet<&str> {
    agents
        .iter()
        .flat_map(|a| a.proper_ancestor_paths())
        .collect()
}
