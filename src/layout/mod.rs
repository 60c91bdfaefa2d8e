//! Tree layout for agent hierarchies.
//!
//! A layout pass takes an agent snapshot, the collapse state and the spacing
//! and produces the visible nodes with positions plus the parent-child edges
//! between them. Every pass recomputes everything from scratch.
//!
//! Visibility is decided by materialized paths: an agent is hidden when an
//! agent whose `path` is a strict prefix of its own is collapsed. Horizontal
//! placement allocates each visible subtree a block of `width` slots, where a
//! collapsed node or a leaf counts as one slot and any other node counts the
//! sum of its children. Blocks of siblings are laid side by side in `path`
//! order, so no two sibling subtrees overlap.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::collapse::CollapseState;
use crate::error::LayoutError;
use crate::hierarchy::validate::validate_agents;
use crate::hierarchy::{is_path_below, Agent, AgentId, AgentStatus, PATH_SEPARATOR};

pub mod spacing;

pub use spacing::{Density, Spacing};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A visible agent placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeLayout {
    pub id: AgentId,
    pub position: Position,
    pub depth: usize,
    /// Horizontal slots taken by this node's visible subtree.
    pub width: usize,
    pub is_collapsed: bool,
    /// Descendants in the full snapshot, hidden or not.
    pub downline_count: usize,
    pub status: AgentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: AgentId,
    pub target: AgentId,
    /// Cosmetic: set when the target agent is active.
    pub animated: bool,
}

/// Axis-aligned box around the centres of all visible nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Result of one layout pass. Nodes are in pre-order: roots left to right,
/// each followed by its visible subtree in sibling order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TreeLayout {
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<Edge>,
    pub spacing: Spacing,
    #[serde(skip)]
    index: HashMap<AgentId, usize>,
    #[serde(skip)]
    children: HashMap<AgentId, Vec<AgentId>>,
}

impl PartialEq for TreeLayout {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges && self.spacing == other.spacing
    }
}

impl TreeLayout {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.node(id).map(|n| n.position)
    }

    pub fn subtree_width(&self, id: &str) -> Option<usize> {
        self.node(id).map(|n| n.width)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn visible_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Visible children of `id` in sibling order.
    pub fn children_of(&self, id: &str) -> &[AgentId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Horizontal block `[start, end)` allocated to the subtree of `id`.
    pub fn span(&self, id: &str) -> Option<(f64, f64)> {
        let node = self.node(id)?;
        let h = self.spacing.horizontal;
        let start = node.position.x - (node.width as f64 * h) / 2.0 + h / 2.0;
        Some((start, start + node.width as f64 * h))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.nodes.first()?.position;
        let init = Bounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(self.nodes.iter().fold(init, |b, n| Bounds {
            min_x: b.min_x.min(n.position.x),
            max_x: b.max_x.max(n.position.x),
            min_y: b.min_y.min(n.position.y),
            max_y: b.max_y.max(n.position.y),
        }))
    }
}

/// Run one full layout pass.
///
/// Rejects the whole snapshot when spacing is not positive or any agent's
/// path is malformed; no partial layout is ever returned. Agents whose
/// `parent_id` is missing or names no agent are laid out as roots.
pub fn compute_layout(
    agents: &[Agent],
    collapsed: &CollapseState,
    spacing: Spacing,
) -> Result<TreeLayout, LayoutError> {
    if let Err(err) = spacing.validate().and_then(|_| validate_agents(agents)) {
        tracing::warn!(%err, agents = agents.len(), "rejecting layout input");
        return Err(err);
    }

    let by_path: HashMap<&str, &Agent> = agents.iter().map(|a| (a.path.as_str(), a)).collect();

    let visible: HashSet<&str> = agents
        .iter()
        .filter(|a| is_visible(a, &by_path, collapsed))
        .map(|a| a.id.as_str())
        .collect();

    let downline = downline_counts(agents);

    let mut children: HashMap<&str, Vec<&Agent>> = HashMap::new();
    let mut roots: Vec<&Agent> = Vec::new();
    for agent in agents.iter().filter(|a| visible.contains(a.id.as_str())) {
        match agent.parent_id.as_deref().filter(|p| visible.contains(p)) {
            Some(parent) => children.entry(parent).or_default().push(agent),
            None => roots.push(agent),
        }
    }
    for kids in children.values_mut() {
        kids.sort_by(|a, b| a.path.cmp(&b.path));
    }
    roots.sort_by(|a, b| a.path.cmp(&b.path));

    let mut widths: HashMap<&str, usize> = HashMap::with_capacity(visible.len());
    for root in &roots {
        subtree_width(root.id.as_str(), &children, collapsed, &mut widths);
    }

    let placer = Placer {
        children: &children,
        widths: &widths,
        collapsed,
        downline: &downline,
        spacing,
    };
    let mut nodes = Vec::with_capacity(visible.len());
    let mut cursor = 0.0;
    for root in &roots {
        placer.place(root, cursor, &mut nodes);
        cursor += placer.block_width(root.id.as_str()) + spacing.horizontal;
    }

    let by_id: HashMap<&str, &Agent> = agents.iter().map(|a| (a.id.as_str(), a)).collect();
    let edges: Vec<Edge> = nodes
        .iter()
        .filter_map(|n| {
            let agent = by_id.get(n.id.as_str())?;
            let parent = agent.parent_id.as_deref()?;
            (by_id.contains_key(parent) && visible.contains(parent)).then(|| Edge {
                source: parent.to_string(),
                target: agent.id.clone(),
                animated: agent.status.is_active(),
            })
        })
        .collect();

    let index = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();
    let children = children
        .into_iter()
        .map(|(parent, kids)| {
            (
                parent.to_string(),
                kids.into_iter().map(|k| k.id.clone()).collect(),
            )
        })
        .collect();

    tracing::debug!(
        agents = agents.len(),
        visible = nodes.len(),
        edges = edges.len(),
        collapsed = collapsed.len(),
        roots = roots.len(),
        "layout pass complete"
    );

    Ok(TreeLayout {
        nodes,
        edges,
        spacing,
        index,
        children,
    })
}

/// Hidden iff some agent whose path is a strict prefix of this one is collapsed.
fn is_visible(agent: &Agent, by_path: &HashMap<&str, &Agent>, collapsed: &CollapseState) -> bool {
    !agent.proper_ancestor_paths().any(|prefix| {
        by_path
            .get(prefix)
            .is_some_and(|ancestor| collapsed.is_collapsed(&ancestor.id))
    })
}

/// Descendant count per agent over the full snapshot.
fn downline_counts(agents: &[Agent]) -> HashMap<&str, usize> {
    let mut paths: Vec<&str> = agents.iter().map(|a| a.path.as_str()).collect();
    paths.sort_unstable();

    agents
        .iter()
        .map(|a| {
            let prefix = format!("{}{}", a.path, PATH_SEPARATOR);
            // Everything under the prefix is one contiguous run of the sorted paths.
            let start = paths.partition_point(|p| *p < prefix.as_str());
            let count = paths[start..]
                .iter()
                .take_while(|p| is_path_below(p, &a.path))
                .count();
            (a.id.as_str(), count)
        })
        .collect()
}

fn subtree_width<'a>(
    id: &'a str,
    children: &HashMap<&'a str, Vec<&'a Agent>>,
    collapsed: &CollapseState,
    widths: &mut HashMap<&'a str, usize>,
) -> usize {
    if let Some(&w) = widths.get(id) {
        return w;
    }
    let w = if collapsed.is_collapsed(id) {
        1
    } else {
        match children.get(id) {
            Some(kids) if !kids.is_empty() => kids
                .iter()
                .map(|&kid| subtree_width(kid.id.as_str(), children, collapsed, widths))
                .sum(),
            _ => 1,
        }
    };
    widths.insert(id, w);
    w
}

struct Placer<'a, 'b> {
    children: &'b HashMap<&'a str, Vec<&'a Agent>>,
    widths: &'b HashMap<&'a str, usize>,
    collapsed: &'b CollapseState,
    downline: &'b HashMap<&'a str, usize>,
    spacing: Spacing,
}

impl Placer<'_, '_> {
    fn width(&self, id: &str) -> usize {
        self.widths.get(id).copied().unwrap_or(1)
    }

    fn block_width(&self, id: &str) -> f64 {
        self.width(id) as f64 * self.spacing.horizontal
    }

    fn place(&self, agent: &Agent, start_x: f64, nodes: &mut Vec<NodeLayout>) {
        let id = agent.id.as_str();
        let h = self.spacing.horizontal;
        let is_collapsed = self.collapsed.is_collapsed(id);

        nodes.push(NodeLayout {
            id: agent.id.clone(),
            position: Position {
                x: start_x + self.block_width(id) / 2.0 - h / 2.0,
                y: agent.depth as f64 * self.spacing.vertical,
            },
            depth: agent.depth,
            width: self.width(id),
            is_collapsed,
            downline_count: self.downline.get(id).copied().unwrap_or(0),
            status: agent.status,
        });

        if is_collapsed {
            return;
        }
        let mut child_x = start_x;
        for kid in self.children.get(id).into_iter().flatten() {
            self.place(kid, child_x, nodes);
            child_x += self.block_width(kid.id.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::path_depth;

    const SPACING: Spacing = Spacing {
        horizontal: 100.0,
        vertical: 50.0,
    };

    fn agent(id: &str, parent: Option<&str>, path: &str) -> Agent {
        Agent {
            id: id.into(),
            parent_id: parent.map(String::from),
            path: path.into(),
            depth: path_depth(path),
            status: AgentStatus::Active,
            name: None,
        }
    }

    fn small_tree() -> Vec<Agent> {
        vec![
            agent("R", None, "R"),
            agent("A", Some("R"), "R.A"),
            agent("B", Some("R"), "R.B"),
        ]
    }

    fn deep_tree() -> Vec<Agent> {
        vec![
            agent("R", None, "R"),
            agent("A", Some("R"), "R.A"),
            agent("A1", Some("A"), "R.A.A1"),
            agent("A2", Some("A"), "R.A.A2"),
            agent("B", Some("R"), "R.B"),
        ]
    }

    fn layout(agents: &[Agent], collapsed: &CollapseState) -> TreeLayout {
        compute_layout(agents, collapsed, SPACING).unwrap()
    }

    fn x(l: &TreeLayout, id: &str) -> f64 {
        l.position(id).unwrap().x
    }

    #[test]
    fn two_children_center_parent() {
        let l = layout(&small_tree(), &CollapseState::new());
        assert_eq!(l.subtree_width("R"), Some(2));
        assert_eq!(l.subtree_width("A"), Some(1));
        assert_eq!(l.subtree_width("B"), Some(1));
        assert_eq!(x(&l, "A"), 0.0);
        assert_eq!(x(&l, "B"), 100.0);
        assert_eq!(x(&l, "R"), (x(&l, "A") + x(&l, "B")) / 2.0);
        assert_eq!(l.position("A").unwrap().y, 50.0);
        assert_eq!(l.position("R").unwrap().y, 0.0);
        assert_eq!(l.edges.len(), 2);
    }

    #[test]
    fn collapsed_root_hides_everything_below() {
        let agents = small_tree();
        let mut collapsed = CollapseState::new();
        collapsed.toggle("R");
        let l = layout(&agents, &collapsed);

        assert_eq!(l.visible_ids().collect::<Vec<_>>(), vec!["R"]);
        let root = l.node("R").unwrap();
        assert_eq!(root.downline_count, 2);
        assert!(root.is_collapsed);
        assert!(l.edges.is_empty());
    }

    #[test]
    fn deep_tree_widths_and_collapse() {
        let agents = deep_tree();
        let l = layout(&agents, &CollapseState::new());
        assert_eq!(l.subtree_width("A"), Some(2));
        assert_eq!(l.subtree_width("R"), Some(3));
        assert_eq!(x(&l, "A1"), 0.0);
        assert_eq!(x(&l, "A2"), 100.0);
        assert_eq!(x(&l, "A"), 50.0);
        assert_eq!(x(&l, "B"), 200.0);
        assert_eq!(x(&l, "R"), 100.0);

        let mut collapsed = CollapseState::new();
        collapsed.toggle("A");
        let l = layout(&agents, &collapsed);
        assert_eq!(l.subtree_width("A"), Some(1));
        assert_eq!(l.subtree_width("R"), Some(2));
        assert!(!l.is_visible("A1"));
        assert!(!l.is_visible("A2"));
        assert_eq!(l.node("A").unwrap().downline_count, 2);
    }

    #[test]
    fn unresolvable_parent_becomes_root() {
        let agents = vec![agent("X", Some("ghost"), "R.X")];
        let l = layout(&agents, &CollapseState::new());
        assert_eq!(l.len(), 1);
        assert!(l.edges.is_empty());
        assert_eq!(l.position("X"), Some(Position { x: 0.0, y: 50.0 }));
    }

    #[test]
    fn sibling_blocks_are_disjoint() {
        let agents = vec![
            agent("R", None, "R"),
            agent("A", Some("R"), "R.A"),
            agent("A1", Some("A"), "R.A.A1"),
            agent("A2", Some("A"), "R.A.A2"),
            agent("A3", Some("A"), "R.A.A3"),
            agent("B", Some("R"), "R.B"),
            agent("C", Some("R"), "R.C"),
            agent("C1", Some("C"), "R.C.C1"),
            agent("C2", Some("C"), "R.C.C2"),
        ];
        let l = layout(&agents, &CollapseState::new());

        for parent in ["R", "A", "C"] {
            let spans: Vec<(f64, f64)> = l
                .children_of(parent)
                .iter()
                .map(|c| l.span(c).unwrap())
                .collect();
            for pair in spans.windows(2) {
                assert!(pair[0].1 <= pair[1].0, "{parent}: {:?}", pair);
            }
        }
    }

    #[test]
    fn parent_centred_over_children_block() {
        let agents = deep_tree();
        let l = layout(&agents, &CollapseState::new());

        for node in &l.nodes {
            let kids = l.children_of(&node.id);
            let (Some(first), Some(last)) = (kids.first(), kids.last()) else {
                continue;
            };
            let start = l.span(first).unwrap().0;
            let end = l.span(last).unwrap().1;
            let mid = (start + end) / 2.0 - SPACING.horizontal / 2.0;
            assert_eq!(node.position.x, mid, "{}", node.id);
            assert_eq!(l.span(&node.id), Some((start, end)));
        }
    }

    #[test]
    fn collapsed_width_is_one_regardless_of_downline() {
        let mut agents = vec![agent("R", None, "R")];
        for i in 0..12 {
            let id = format!("K{i:02}");
            agents.push(agent(&id, Some("R"), &format!("R.{id}")));
        }
        let mut collapsed = CollapseState::new();
        collapsed.toggle("R");
        let l = layout(&agents, &collapsed);
        assert_eq!(l.subtree_width("R"), Some(1));
        assert_eq!(l.node("R").unwrap().downline_count, 12);
    }

    #[test]
    fn collapse_hides_exactly_the_downline_and_expand_restores_it() {
        let agents = deep_tree();
        let before: Vec<String> = layout(&agents, &CollapseState::new())
            .visible_ids()
            .map(String::from)
            .collect();

        let mut collapsed = CollapseState::new();
        collapsed.toggle("A");
        let during = layout(&agents, &collapsed);
        let hidden: Vec<&str> = before
            .iter()
            .map(String::as_str)
            .filter(|id| !during.is_visible(id))
            .collect();
        assert_eq!(hidden, vec!["A1", "A2"]);
        assert_eq!(during.node("A").unwrap().downline_count, hidden.len());

        collapsed.toggle("A");
        let after: Vec<String> = layout(&agents, &collapsed)
            .visible_ids()
            .map(String::from)
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn input_order_does_not_matter() {
        let agents = deep_tree();
        let mut collapsed = CollapseState::new();
        collapsed.toggle("B");
        let expected = layout(&agents, &collapsed);

        let mut reversed = agents.clone();
        reversed.reverse();
        assert_eq!(layout(&reversed, &collapsed), expected);

        let mut rotated = agents.clone();
        rotated.rotate_left(2);
        assert_eq!(layout(&rotated, &collapsed), expected);
    }

    #[test]
    fn siblings_sorted_by_path() {
        let agents = vec![
            agent("R", None, "R"),
            agent("b", Some("R"), "R.b"),
            agent("a", Some("R"), "R.a"),
        ];
        let l = layout(&agents, &CollapseState::new());
        assert_eq!(l.children_of("R"), ["a".to_string(), "b".to_string()]);
        assert!(x(&l, "a") < x(&l, "b"));
    }

    #[test]
    fn roots_separated_by_one_gap() {
        let agents = vec![
            agent("P", None, "P"),
            agent("P1", Some("P"), "P.P1"),
            agent("P2", Some("P"), "P.P2"),
            agent("Q", None, "Q"),
        ];
        let l = layout(&agents, &CollapseState::new());
        assert_eq!(l.span("P"), Some((0.0, 200.0)));
        assert_eq!(l.span("Q"), Some((300.0, 400.0)));
        assert_eq!(x(&l, "Q"), 300.0);
    }

    #[test]
    fn collapsed_set_with_unknown_ids_is_harmless() {
        let agents = small_tree();
        let collapsed: CollapseState = ["ghost".to_string()].into_iter().collect();
        assert_eq!(layout(&agents, &collapsed).len(), 3);
    }

    #[test]
    fn edges_follow_parent_status() {
        let mut agents = small_tree();
        agents[2].status = AgentStatus::Inactive;
        let l = layout(&agents, &CollapseState::new());
        let to_b = l.edges.iter().find(|e| e.target == "B").unwrap();
        assert_eq!(to_b.source, "R");
        assert!(!to_b.animated);
        assert!(l.edges.iter().find(|e| e.target == "A").unwrap().animated);
    }

    #[test]
    fn malformed_snapshot_is_rejected() {
        let agents = vec![agent("R", None, "R"), agent("A", Some("R"), "Q.A")];
        let err = compute_layout(&agents, &CollapseState::new(), SPACING).unwrap_err();
        assert!(matches!(err, LayoutError::ParentPathMismatch { .. }));
    }

    #[test]
    fn bad_spacing_is_rejected() {
        let err = compute_layout(&small_tree(), &CollapseState::new(), Spacing::new(0.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidSpacing { .. }));
    }

    #[test]
    fn bounds_cover_visible_nodes() {
        let l = layout(&deep_tree(), &CollapseState::new());
        let b = l.bounds().unwrap();
        assert_eq!((b.min_x, b.max_x), (0.0, 200.0));
        assert_eq!((b.min_y, b.max_y), (0.0, 100.0));
        assert!(TreeLayout::default().bounds().is_none());
    }

    #[test]
    fn downline_stops_at_segment_boundary() {
        // "R.AB" shares a string prefix with "R.A" but is its sibling.
        let agents = vec![
            agent("R", None, "R"),
            agent("A", Some("R"), "R.A"),
            agent("X", Some("A"), "R.A.X"),
            agent("AB", Some("R"), "R.AB"),
        ];
        let l = layout(&agents, &CollapseState::new());
        assert_eq!(l.node("A").unwrap().downline_count, 1);
        assert_eq!(l.node("R").unwrap().downline_count, 3);
    }

    #[test]
    fn empty_snapshot_gives_empty_layout() {
        let l = layout(&[], &CollapseState::new());
        assert!(l.is_empty());
        assert!(l.edges.is_empty());
    }
}
