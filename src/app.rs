use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::collapse::CollapseState;
use crate::config::ViewConfig;
use crate::hierarchy::stats::HierarchyStats;
use crate::hierarchy::{Agent, AgentId, AgentStatus};
use crate::layout::{compute_layout, TreeLayout};

/// A flattened row in the tree view, ready for rendering.
#[derive(Debug, Clone)]
pub struct TreeRow {
    pub agent_id: AgentId,
    pub display_name: String,
    pub depth: usize,
    pub is_collapsed: bool,
    pub downline_count: usize,
    pub status: AgentStatus,
}

impl TreeRow {
    pub fn has_downline(&self) -> bool {
        self.downline_count > 0
    }
}

/// Which panel is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Tree,
    Chart,
}

pub struct App {
    pub agents: Vec<Agent>,
    pub collapse: CollapseState,
    pub config: ViewConfig,
    pub layout: TreeLayout,
    pub stats: HierarchyStats,
    /// Why the last snapshot was rejected, if it was.
    pub error: Option<String>,
    pub should_quit: bool,

    // Tree view state.
    pub tree_rows: Vec<TreeRow>,
    pub selected_index: usize,

    pub focus: FocusPanel,

    // Search.
    pub search_mode: bool,
    pub search_query: String,

    agent_index: HashMap<AgentId, usize>,
}

impl App {
    pub fn new(agents: Vec<Agent>, config: ViewConfig) -> Self {
        let mut collapse = CollapseState::new();
        if let Some(depth) = config.initial_depth {
            collapse.collapse_below_depth(&agents, depth);
        }

        let mut app = Self {
            agents: Vec::new(),
            collapse,
            config,
            layout: TreeLayout::default(),
            stats: HierarchyStats::default(),
            error: None,
            should_quit: false,
            tree_rows: Vec::new(),
            selected_index: 0,
            focus: FocusPanel::Tree,
            search_mode: false,
            search_query: String::new(),
            agent_index: HashMap::new(),
        };
        app.replace_agents(agents);
        app
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agent_index.get(id).map(|&i| &self.agents[i])
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.tree_rows
            .get(self.selected_index)
            .map(|r| r.agent_id.as_str())
    }

    /// Swap in a fresh snapshot. Collapse state carries over.
    pub fn replace_agents(&mut self, agents: Vec<Agent>) {
        let selected = self.selected_id().map(String::from);
        self.agent_index = agents
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.clone(), i))
            .collect();
        self.agents = agents;
        self.stats = HierarchyStats::from_agents(&self.agents);
        self.relayout();
        if let Some(id) = selected {
            self.select_id_or_ancestor(&id);
        }
    }

    /// Recompute the layout and the flattened rows from scratch.
    pub fn relayout(&mut self) {
        match compute_layout(&self.agents, &self.collapse, self.config.spacing()) {
            Ok(layout) => {
                self.layout = layout;
                self.error = None;
            }
            Err(err) => {
                self.layout = TreeLayout::default();
                self.error = Some(err.to_string());
            }
        }
        self.rebuild_tree_rows();
    }

    fn rebuild_tree_rows(&mut self) {
        self.tree_rows = self
            .layout
            .nodes
            .iter()
            .map(|node| TreeRow {
                agent_id: node.id.clone(),
                display_name: self
                    .agent(&node.id)
                    .map(|a| a.display_name().to_string())
                    .unwrap_or_else(|| node.id.clone()),
                depth: node.depth,
                is_collapsed: node.is_collapsed,
                downline_count: node.downline_count,
                status: node.status,
            })
            .collect();

        if self.selected_index >= self.tree_rows.len() {
            self.selected_index = self.tree_rows.len().saturating_sub(1);
        }
    }

    /// Select `id`, or its nearest visible ancestor when it is hidden.
    fn select_id_or_ancestor(&mut self, id: &str) {
        if let Some(idx) = self.row_index(id) {
            self.selected_index = idx;
            return;
        }
        let Some(agent) = self.agent(id) else {
            return;
        };
        // Deepest visible row above the hidden agent.
        let found = self
            .tree_rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                self.agent(&row.agent_id)
                    .is_some_and(|ancestor| agent.is_descendant_of(ancestor))
            })
            .max_by_key(|(_, row)| row.depth)
            .map(|(idx, _)| idx);
        if let Some(idx) = found {
            self.selected_index = idx;
        }
    }

    fn row_index(&self, id: &str) -> Option<usize> {
        self.tree_rows.iter().position(|r| r.agent_id == id)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.search_mode {
            self.handle_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('h') | KeyCode::Left => self.collapse_selected(),
            KeyCode::Char('G') => self.select_last(),
            KeyCode::Char('g') => self.select_first(),
            KeyCode::Char('e') => self.expand_all(),
            KeyCode::Char('c') => self.collapse_all(),
            KeyCode::Char('d') => self.cycle_density(),
            KeyCode::Char('/') => {
                self.search_mode = true;
                self.search_query.clear();
            }
            KeyCode::Tab => self.cycle_focus(),
            KeyCode::PageDown => self.move_selection(20),
            KeyCode::PageUp => self.move_selection(-20),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.move_selection(-3),
            MouseEventKind::ScrollDown => self.move_selection(3),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search_mode = false;
                self.search_query.clear();
            }
            KeyCode::Enter => {
                self.search_mode = false;
                self.jump_to_search_match();
            }
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.tree_rows.is_empty() {
            return;
        }
        let new_idx = self.selected_index as i32 + delta;
        self.selected_index = new_idx.clamp(0, self.tree_rows.len() as i32 - 1) as usize;
    }

    fn select_first(&mut self) {
        self.selected_index = 0;
    }

    fn select_last(&mut self) {
        if !self.tree_rows.is_empty() {
            self.selected_index = self.tree_rows.len() - 1;
        }
    }

    /// Flip the selected agent's collapsed flag. Leaves are left alone.
    pub fn toggle_selected(&mut self) {
        if let Some(row) = self.tree_rows.get(self.selected_index) {
            if row.has_downline() {
                let id = row.agent_id.clone();
                let now_collapsed = self.collapse.toggle(&id);
                tracing::debug!(%id, now_collapsed, "toggled agent");
                self.relayout();
                self.select_id_or_ancestor(&id);
            }
        }
    }

    pub fn collapse_selected(&mut self) {
        if let Some(row) = self.tree_rows.get(self.selected_index) {
            if row.has_downline() && !row.is_collapsed {
                let id = row.agent_id.clone();
                self.collapse.collapse(&id);
                self.relayout();
                self.select_id_or_ancestor(&id);
            }
        }
    }

    pub fn expand_all(&mut self) {
        let selected = self.selected_id().map(String::from);
        self.collapse.expand_all();
        self.relayout();
        if let Some(id) = selected {
            self.select_id_or_ancestor(&id);
        }
    }

    pub fn collapse_all(&mut self) {
        let selected = self.selected_id().map(String::from);
        self.collapse.collapse_all(&self.agents);
        self.relayout();
        if let Some(id) = selected {
            self.select_id_or_ancestor(&id);
        }
    }

    /// Switch density. Explicit spacing overrides are dropped so the switch
    /// is visible.
    pub fn cycle_density(&mut self) {
        self.config.density = self.config.density.next();
        self.config.horizontal_spacing = None;
        self.config.vertical_spacing = None;
        self.relayout();
    }

    fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPanel::Tree => FocusPanel::Chart,
            FocusPanel::Chart => FocusPanel::Tree,
        };
    }

    /// Select the next agent after the current one (in path order) whose id
    /// or name contains the query, expanding its ancestors if needed.
    pub fn jump_to_search_match(&mut self) {
        let query = self.search_query.to_lowercase();
        if query.is_empty() || self.agents.is_empty() {
            return;
        }

        let mut ordered: Vec<&Agent> = self.agents.iter().collect();
        ordered.sort_by(|a, b| a.path.cmp(&b.path));

        let start = self
            .selected_id()
            .and_then(|id| ordered.iter().position(|a| a.id == id))
            .map(|i| i + 1)
            .unwrap_or(0);

        let found = (0..ordered.len())
            .map(|i| ordered[(start + i) % ordered.len()])
            .find(|a| {
                a.id.to_lowercase().contains(&query)
                    || a.display_name().to_lowercase().contains(&query)
            })
            .map(|a| a.id.clone());

        if let Some(id) = found {
            self.collapse.reveal(&self.agents, &id);
            self.relayout();
            self.select_id_or_ancestor(&id);
        }
    }
}

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;
