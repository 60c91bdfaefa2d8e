//! Printable renditions of a computed layout.
//!
//! Used by `--dump`, and handy for diffing layouts of two snapshots.

use crate::layout::TreeLayout;

/// Trait for formatting a layout.
/// Implement this trait to add new output formats.
pub trait LayoutFormatter {
    fn format(&self, layout: &TreeLayout) -> String;
}

/// Aligned text table, one row per visible node in layout order.
#[derive(Debug, Clone)]
pub struct TextFormatter {
    /// Minimum width for the agent column.
    pub min_id_width: usize,
    /// Indentation per depth level in the agent column.
    pub indent: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            min_id_width: 24,
            indent: 2,
        }
    }
}

impl LayoutFormatter for TextFormatter {
    fn format(&self, layout: &TreeLayout) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Layout ({} nodes, {} edges, spacing {}x{})\n",
            layout.len(),
            layout.edges.len(),
            layout.spacing.horizontal,
            layout.spacing.vertical,
        ));

        let id_width = layout
            .nodes
            .iter()
            .map(|n| n.depth * self.indent + n.id.len())
            .max()
            .unwrap_or(0)
            .max(self.min_id_width);

        let separator = "─".repeat(id_width + 56);
        output.push_str(&separator);
        output.push('\n');
        output.push_str(&format!(
            "{:<width$} {:>5} {:>9} {:>9} {:>6} {:>9} {:>9}\n",
            "Agent",
            "Depth",
            "X",
            "Y",
            "Width",
            "Downline",
            "Collapsed",
            width = id_width
        ));
        output.push_str(&separator);
        output.push('\n');

        for node in &layout.nodes {
            let label = format!("{}{}", " ".repeat(node.depth * self.indent), node.id);
            output.push_str(&format!(
                "{:<width$} {:>5} {:>9.1} {:>9.1} {:>6} {:>9} {:>9}\n",
                label,
                node.depth,
                node.position.x,
                node.position.y,
                node.width,
                node.downline_count,
                if node.is_collapsed { "yes" } else { "-" },
                width = id_width
            ));
        }

        output.push_str(&separator);
        output.push('\n');

        for edge in &layout.edges {
            output.push_str(&format!("{} -> {}\n", edge.source, edge.target));
        }

        // A visible collapsed node never sits under another, so their
        // downlines are disjoint.
        let collapsed: Vec<_> = layout.nodes.iter().filter(|n| n.is_collapsed).collect();
        let hidden: usize = collapsed.iter().map(|n| n.downline_count).sum();
        output.push_str(&format!(
            "Total: {} visible, {} collapsed, {} hidden\n",
            layout.len(),
            collapsed.len(),
            hidden,
        ));

        output
    }
}

/// Pretty-printed JSON of the whole layout.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl LayoutFormatter for JsonFormatter {
    fn format(&self, layout: &TreeLayout) -> String {
        serde_json::to_string_pretty(layout).unwrap_or_else(|err| {
            tracing::error!(%err, "failed to serialize layout");
            String::new()
        })
    }
}
