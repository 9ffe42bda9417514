//! Logging and debugging facilities for Horizon Trellis.
//!
//! This module provides:
//! - Stable `tracing` target names for filtering engine diagnostics
//! - Debug visualization for arena trees
//!
//! # Tracing Integration
//!
//! Horizon Trellis instruments its hot paths with `tracing`. Install a
//! subscriber in the host application to see them:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! tracing_subscriber::fmt()
//!     .with_env_filter(EnvFilter::new("horizon_trellis::focus=debug"))
//!     .init();
//! ```

use slotmap::Key;

use crate::tree::Tree;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "horizon_trellis_core";
    /// Tree structure target.
    pub const TREE: &str = "horizon_trellis_core::tree";
    /// Timer queue target.
    pub const TIMER: &str = "horizon_trellis_core::timer";
    /// Message send/broadcast target.
    pub const MESSAGE: &str = "horizon_trellis::message";
    /// Widget lifecycle target.
    pub const WIDGET: &str = "horizon_trellis::widget";
    /// Layout passes target.
    pub const LAYOUT: &str = "horizon_trellis::layout";
    /// Paint traversal target.
    pub const PAINT: &str = "horizon_trellis::paint";
    /// Focus protocol target.
    pub const FOCUS: &str = "horizon_trellis::focus";
    /// Pointer capture target.
    pub const CAPTURE: &str = "horizon_trellis::capture";
    /// Drag-and-drop target.
    pub const DRAG_DROP: &str = "horizon_trellis::drag_drop";
    /// Event dispatch target.
    pub const DISPATCH: &str = "horizon_trellis::dispatch";
    /// Engine configuration target.
    pub const CONFIG: &str = "horizon_trellis::config";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Plain indentation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show node handles.
    pub show_ids: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            style: TreeStyle::Compact,
            ..Default::default()
        }
    }
}

/// Renders a subtree of a [`Tree`] as indented text, one node per line.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`, labelling each node with `label`.
    pub fn format_subtree<K, T, F>(&self, tree: &Tree<K, T>, root: K, label: F) -> String
    where
        K: Key,
        F: Fn(K, &T) -> String,
    {
        let mut output = String::new();
        self.format_into(tree, root, 0, true, &label, &mut output);
        output
    }

    fn format_into<K, T, F>(
        &self,
        tree: &Tree<K, T>,
        id: K,
        depth: usize,
        is_last: bool,
        label: &F,
        output: &mut String,
    ) where
        K: Key,
        F: Fn(K, &T) -> String,
    {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }
        let Some(data) = tree.get(id) else {
            return;
        };

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(&label(id, data));
        if self.options.show_ids {
            output.push_str(&format!(" [{id:?}]"));
        }
        output.push('\n');

        let count = tree.child_count(id);
        for (i, child) in tree.children(id).enumerate() {
            self.format_into(tree, child, depth + 1, i + 1 == count, label, output);
        }
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, corner, last) = match self.options.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "", ""),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        if self.options.style == TreeStyle::Compact {
            prefix.push_str(&" ".repeat(self.options.indent_size));
        } else {
            prefix.push_str(if is_last { last } else { corner });
        }
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::DefaultKey;

    #[test]
    fn test_format_subtree() {
        let mut tree: Tree<DefaultKey, &str> = Tree::new();
        let root = tree.create("root");
        let a = tree.create("a");
        let b = tree.create("b");
        tree.insert(root, a, None).unwrap();
        tree.insert(root, b, None).unwrap();

        let debug = TreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            show_ids: false,
            ..Default::default()
        });
        let text = debug.format_subtree(&tree, root, |_, name| name.to_string());
        assert_eq!(text, "root\n+-- a\n`-- b\n");
    }

    #[test]
    fn test_max_depth() {
        let mut tree: Tree<DefaultKey, &str> = Tree::new();
        let root = tree.create("root");
        let a = tree.create("a");
        tree.insert(root, a, None).unwrap();

        let debug = TreeDebug::with_options(TreeFormatOptions {
            max_depth: Some(0),
            ..TreeFormatOptions::minimal()
        });
        assert_eq!(debug.format_subtree(&tree, root, |_, n| n.to_string()), "root\n");
    }
}
