//! Error types for loading, validating and laying out agent hierarchies.

use std::path::PathBuf;

use thiserror::Error;

use crate::hierarchy::AgentId;

/// Reasons a layout pass rejects its input. A rejected pass produces no
/// layout at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("agent id '{0}' is empty or contains '.'")]
    InvalidId(AgentId),

    #[error("agent '{id}' has a malformed path '{path}'")]
    MalformedPath { id: AgentId, path: String },

    #[error("agent '{id}' path '{path}' does not end with its own id")]
    PathIdMismatch { id: AgentId, path: String },

    #[error("agent '{id}' declares depth {declared} but its path has depth {actual}")]
    DepthMismatch {
        id: AgentId,
        declared: usize,
        actual: usize,
    },

    #[error("duplicate agent id '{0}'")]
    DuplicateId(AgentId),

    #[error("agent '{id}' has a cyclic path '{path}'")]
    CyclicPath { id: AgentId, path: String },

    #[error("agent '{id}' path '{path}' does not nest under parent '{parent}' ('{parent_path}')")]
    ParentPathMismatch {
        id: AgentId,
        path: String,
        parent: AgentId,
        parent_path: String,
    },

    #[error("spacing must be finite and positive (got {horizontal} x {vertical})")]
    InvalidSpacing { horizontal: f64, vertical: f64 },
}

/// Failure to read an agent snapshot from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse agents in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to read a viewer config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_error_messages_name_the_agent() {
        let err = LayoutError::DepthMismatch {
            id: "B".into(),
            declared: 3,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "agent 'B' declares depth 3 but its path has depth 1"
        );

        let err = LayoutError::ParentPathMismatch {
            id: "X".into(),
            path: "Q.X".into(),
            parent: "R".into(),
            parent_path: "R".into(),
        };
        assert!(err.to_string().contains("does not nest under parent 'R'"));
    }
}
