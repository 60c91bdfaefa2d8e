use std::collections::{BTreeMap, HashSet};

use super::Agent;

/// Summary counts for an agent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    pub total: usize,
    pub active: usize,
    pub roots: usize,
    pub max_depth: usize,
    pub per_depth: BTreeMap<usize, usize>,
}

impl HierarchyStats {
    pub fn from_agents(agents: &[Agent]) -> Self {
        let ids: HashSet<&str> = agents.iter().map(|a| a.id.as_str()).collect();
        let mut stats = Self {
            total: agents.len(),
            ..Default::default()
        };

        for agent in agents {
            if agent.status.is_active() {
                stats.active += 1;
            }
            // Unresolvable parents count as roots, same as in layout.
            let has_parent = agent
                .parent_id
                .as_deref()
                .is_some_and(|p| ids.contains(p));
            if !has_parent {
                stats.roots += 1;
            }
            stats.max_depth = stats.max_depth.max(agent.depth);
            *stats.per_depth.entry(agent.depth).or_insert(0) += 1;
        }

        stats
    }

    pub fn inactive(&self) -> usize {
        self.total - self.active
    }
}
