//! Event capture.
//!
//! Each widget carries a capture depth, 0 meaning not capturing. Capturing
//! gives the widget one more than the deepest capture in its tree, so nested
//! captures stack without an explicit stack. The effective capture target is
//! the widget with the highest depth, or the root when nobody captures.

use horizon_trellis_core::logging::targets;

use super::base::WidgetId;
use super::engine::WidgetTree;

impl WidgetTree {
    /// Route all input of the widget's tree to its subtree until released.
    ///
    /// Fails when the depth counter would exceed
    /// [`EngineConfig::max_capture_depth`](crate::config::EngineConfig::max_capture_depth).
    pub fn capture(&mut self, id: WidgetId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let root = self.root_of(id);
        let limit = self.config().max_capture_depth;
        let Some(depth) = self.max_capture_depth_in(root).checked_add(1).filter(|&d| d <= limit) else {
            tracing::debug!(target: targets::CAPTURE, ?id, limit, "capture depth exhausted");
            return false;
        };

        if let Some(state) = self.state_mut(id) {
            state.capture = depth;
        }
        tracing::trace!(target: targets::CAPTURE, ?id, depth, "captured");
        true
    }

    /// Stop capturing. Fails if the widget was not capturing.
    pub fn release(&mut self, id: WidgetId) -> bool {
        let Some(state) = self.state_mut(id) else {
            return false;
        };
        if state.capture == 0 {
            return false;
        }
        state.capture = 0;
        tracing::trace!(target: targets::CAPTURE, ?id, "released");
        true
    }

    /// The effective capture target of the tree rooted at `root`.
    ///
    /// Ties between equal depths go to the first widget in pre-order.
    pub fn capture_widget(&self, root: WidgetId) -> WidgetId {
        let mut best = root;
        let mut best_depth = 0;
        for id in self.nodes.preorder(root) {
            let depth = self.capture_depth(id);
            if depth > best_depth {
                best = id;
                best_depth = depth;
            }
        }
        best
    }

    fn max_capture_depth_in(&self, root: WidgetId) -> u32 {
        self.nodes
            .preorder(root)
            .into_iter()
            .map(|id| self.capture_depth(id))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::widget::DefaultProc;

    #[test]
    fn test_nested_capture() {
        let mut tree = WidgetTree::new();
        let root = tree.create(DefaultProc);
        let a = tree.create(DefaultProc);
        let b = tree.create(DefaultProc);
        tree.add_widget(root, a);
        tree.add_widget(a, b);

        assert_eq!(tree.capture_widget(root), root);
        assert!(tree.capture(b));
        assert!(tree.capture(a));
        assert_eq!(tree.capture_depth(b), 1);
        assert_eq!(tree.capture_depth(a), 2);
        assert_eq!(tree.capture_widget(root), a);

        assert!(tree.release(a));
        assert_eq!(tree.capture_widget(root), b);
        assert!(!tree.release(a));
    }

    #[test]
    fn test_capture_limit() {
        let mut tree = WidgetTree::with_config(EngineConfig::new().with_max_capture_depth(1));
        let root = tree.create(DefaultProc);
        let a = tree.create(DefaultProc);
        tree.add_widget(root, a);

        assert!(tree.capture(a));
        assert!(!tree.capture(root));
        assert_eq!(tree.capture_depth(root), 0);
        assert_eq!(tree.capture_widget(root), a);
    }
}
