//! Shared color palette for the TUI.

use ratatui::style::Color;

// ── Agent status ────────────────────────────────────────────────────
pub const AGENT_ACTIVE: Color = Color::Rgb(80, 220, 120);
pub const AGENT_INACTIVE: Color = Color::Rgb(130, 130, 130);

// ── Edges ───────────────────────────────────────────────────────────
pub const EDGE_ACTIVE: Color = Color::Rgb(120, 160, 220);
pub const EDGE_IDLE: Color = Color::Rgb(80, 80, 80);

// ── Collapse badge / downline counts ────────────────────────────────
pub const DOWNLINE_BADGE: Color = Color::Rgb(255, 180, 50);

// ── Accent / chrome ─────────────────────────────────────────────────
pub const ACCENT_MUTED: Color = Color::Rgb(120, 120, 180);
pub const HIGHLIGHT_BG: Color = Color::Rgb(60, 55, 50);
pub const HIGHLIGHT_FG: Color = Color::Rgb(255, 220, 150);
pub const ERROR: Color = Color::Rgb(230, 90, 80);
