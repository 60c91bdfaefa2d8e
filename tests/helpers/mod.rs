use crate::hierarchy::{path_depth, Agent, AgentStatus};

/// Create an active agent whose depth is derived from its path.
pub fn agent(id: &str, parent: Option<&str>, path: &str) -> Agent {
    Agent {
        id: id.to_string(),
        parent_id: parent.map(String::from),
        path: path.to_string(),
        depth: path_depth(path),
        status: AgentStatus::Active,
        name: None,
    }
}

/// Create an agent with a display name.
pub fn named(id: &str, parent: Option<&str>, path: &str, name: &str) -> Agent {
    let mut a = agent(id, parent, path);
    a.name = Some(name.to_string());
    a
}

/// Create an agent with the given status.
pub fn with_status(mut a: Agent, status: AgentStatus) -> Agent {
    a.status = status;
    a
}

/// Build agents from paths alone; the parent is the previous path segment.
pub fn from_paths(paths: &[&str]) -> Vec<Agent> {
    paths
        .iter()
        .map(|path| {
            let mut segments: Vec<&str> = path.split('.').collect();
            let id = segments.pop().unwrap_or_default();
            agent(id, segments.last().copied(), path)
        })
        .collect()
}

/// R → A → {A1, A2}, R → B.
pub fn org_tree() -> Vec<Agent> {
    vec![
        named("R", None, "R", "Root"),
        named("A", Some("R"), "R.A", "Agent A"),
        agent("A1", Some("A"), "R.A.A1"),
        agent("A2", Some("A"), "R.A.A2"),
        named("B", Some("R"), "R.B", "Agent B"),
    ]
}

/// Serialize agents the way the data source hands them over.
pub fn agents_json(agents: &[Agent]) -> String {
    serde_json::to_string(agents).unwrap_or_default()
}
