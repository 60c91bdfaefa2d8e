//! End-to-end tests for the snapshot pipeline.
//!
//! Each test exercises the full path: JSON on disk → load → layout → output.

use std::io::Write;

use downline::app::App;
use downline::config::ViewConfig;
use downline::hierarchy::load_agents;
use downline::report::{JsonFormatter, LayoutFormatter, TextFormatter};
use downline::{compute_layout, Agent, CollapseState, Density, LayoutError, Spacing};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn agent_json(id: &str, parent: Option<&str>, path: &str) -> String {
    let depth = path.matches('.').count();
    match parent {
        Some(p) => format!(
            r#"{{"id":"{id}","parentId":"{p}","path":"{path}","depth":{depth},"status":"active"}}"#
        ),
        None => format!(r#"{{"id":"{id}","parentId":null,"path":"{path}","depth":{depth}}}"#),
    }
}

fn write_snapshot(records: &[String]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "[{}]", records.join(",")).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn agency() -> Vec<String> {
    vec![
        agent_json("ceo", None, "ceo"),
        agent_json("east", Some("ceo"), "ceo.east"),
        agent_json("e1", Some("east"), "ceo.east.e1"),
        agent_json("e2", Some("east"), "ceo.east.e2"),
        agent_json("e3", Some("east"), "ceo.east.e3"),
        agent_json("west", Some("ceo"), "ceo.west"),
        agent_json("w1", Some("west"), "ceo.west.w1"),
        agent_json("w1a", Some("w1"), "ceo.west.w1.w1a"),
    ]
}

fn load(records: &[String]) -> Vec<Agent> {
    let tmp = write_snapshot(records);
    load_agents(tmp.path()).unwrap()
}

const SPACING: Spacing = Spacing {
    horizontal: 10.0,
    vertical: 10.0,
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Snapshot on disk → layout with widths and positions from the file.
#[test]
fn snapshot_to_layout() {
    let agents = load(&agency());
    assert_eq!(agents.len(), 8);

    let layout = compute_layout(&agents, &CollapseState::new(), SPACING).unwrap();
    assert_eq!(layout.len(), 8);
    assert_eq!(layout.subtree_width("east"), Some(3));
    assert_eq!(layout.subtree_width("west"), Some(1));
    assert_eq!(layout.subtree_width("ceo"), Some(4));
    assert_eq!(layout.edges.len(), 7);

    // east spans [0, 30), west [30, 40).
    assert_eq!(layout.position("east").unwrap().x, 10.0);
    assert_eq!(layout.position("west").unwrap().x, 30.0);
    assert_eq!(layout.position("w1a").unwrap().y, 30.0);
}

/// Collapsing a branch hides its downline but keeps the count.
#[test]
fn collapse_branch_keeps_downline_count() {
    let agents = load(&agency());
    let mut collapsed = CollapseState::new();
    collapsed.toggle("west");

    let layout = compute_layout(&agents, &collapsed, SPACING).unwrap();
    assert!(!layout.is_visible("w1"));
    assert!(!layout.is_visible("w1a"));
    assert_eq!(layout.node("west").unwrap().downline_count, 2);
    assert_eq!(layout.subtree_width("west"), Some(1));
    assert!(layout.edges.iter().all(|e| e.source != "west"));
}

/// Orphan whose manager is not in the snapshot → laid out as a second root.
#[test]
fn orphan_is_laid_out_as_root() {
    let mut records = agency();
    records.push(agent_json("x", Some("gone"), "gone.x"));
    let agents = load(&records);

    let layout = compute_layout(&agents, &CollapseState::new(), SPACING).unwrap();
    assert!(layout.edges.iter().all(|e| e.target != "x"));
    // ceo block is 4 wide, then one gap.
    assert_eq!(layout.span("x"), Some((50.0, 60.0)));
    assert_eq!(layout.position("x").unwrap().y, 10.0);
}

/// A path that contradicts the declared manager rejects the whole snapshot.
#[test]
fn contradictory_path_rejects_snapshot() {
    let mut records = agency();
    records.push(agent_json("bad", Some("east"), "ceo.west.bad"));
    let agents = load(&records);

    let err = compute_layout(&agents, &CollapseState::new(), SPACING).unwrap_err();
    assert!(matches!(err, LayoutError::ParentPathMismatch { .. }));
}

/// Shuffled input produces the same text dump.
#[test]
fn dump_is_stable_across_input_order() {
    let mut records = agency();
    let forward = load(&records);
    records.reverse();
    let backward = load(&records);

    let formatter = TextFormatter::default();
    let state = CollapseState::new();
    let a = formatter.format(&compute_layout(&forward, &state, SPACING).unwrap());
    let b = formatter.format(&compute_layout(&backward, &state, SPACING).unwrap());
    assert_eq!(a, b);
    assert!(a.contains("ceo -> east"));
}

/// JSON dump round-trips through serde_json with every visible node.
#[test]
fn json_dump_lists_visible_nodes() {
    let agents = load(&agency());
    let mut collapsed = CollapseState::new();
    collapsed.toggle("east");
    let layout = compute_layout(&agents, &collapsed, Density::Compact.spacing()).unwrap();

    let out = JsonFormatter.format(&layout);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let ids: Vec<&str> = value["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["ceo", "east", "west", "w1", "w1a"]);
}

/// Viewer loaded from disk reacts to a new snapshot the way the watcher drives it.
#[test]
fn app_reload_from_disk() {
    let mut app = App::new(load(&agency()), ViewConfig::default());
    assert_eq!(app.tree_rows.len(), 8);

    let mut records = agency();
    records.push(agent_json("e4", Some("east"), "ceo.east.e4"));
    app.replace_agents(load(&records));

    assert_eq!(app.tree_rows.len(), 9);
    assert_eq!(app.layout.node("east").unwrap().downline_count, 4);
    assert_eq!(app.stats.total, 9);
}

/// Malformed JSON surfaces as a load error, not a layout.
#[test]
fn malformed_json_is_a_load_error() {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "[{{\"id\": \"ceo\"").unwrap();
    tmp.flush().unwrap();
    assert!(load_agents(tmp.path()).is_err());
}
