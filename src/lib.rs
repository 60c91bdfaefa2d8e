//! Layout engine and terminal viewer for agency agent hierarchies.

pub mod app;
pub mod collapse;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod report;

pub use collapse::CollapseState;
pub use error::LayoutError;
pub use hierarchy::{Agent, AgentId, AgentStatus};
pub use layout::{compute_layout, Density, Spacing, TreeLayout};
