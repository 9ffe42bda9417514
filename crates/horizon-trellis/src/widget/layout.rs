//! Two-phase layout and screen-rect maintenance.
//!
//! Layout runs only on widgets that have been drawn. It has three steps:
//!
//! 1. **Measure** (bottom-up): children first, then the widget receives
//!    [`Message::SetPreferredRect`] and sizes itself from its children.
//! 2. **Arrange** (top-down): the widget receives [`Message::DoLayout`] and
//!    assigns its children's local rects, then each child arranges its own.
//! 3. **Screen rects**: every widget's absolute rect is its local rect offset
//!    by its parent's absolute rect.
//!
//! While a widget measures or arranges, a [`LayoutScope`] marks it as in
//! layout. A `set-rect` landing on that widget or any of its descendants
//! then only stores the rect; the running pass takes care of the rest.
//!
//! Screen rects are kept current eagerly: every path that changes a local
//! rect or the parent chain recomputes the affected subtree before
//! returning.

use horizon_trellis_core::logging::targets;

use super::base::WidgetId;
use super::engine::WidgetTree;
use super::message::Message;

/// Marks a widget as running a layout pass.
///
/// Created with [`enter`](Self::enter) at the start of a measure or arrange
/// and consumed by [`exit`](Self::exit) at the end, restoring the flag the
/// widget had before.
#[must_use = "a layout scope must be closed with `exit`"]
pub(crate) struct LayoutScope {
    id: WidgetId,
    previous: bool,
}

impl LayoutScope {
    pub(crate) fn enter(tree: &mut WidgetTree, id: WidgetId) -> Self {
        let previous = tree.state_mut(id).is_some_and(|state| {
            let previous = state.in_layout;
            state.in_layout = true;
            previous
        });
        Self { id, previous }
    }

    pub(crate) fn exit(self, tree: &mut WidgetTree) {
        if let Some(state) = tree.state_mut(self.id) {
            state.in_layout = self.previous;
        }
    }
}

impl WidgetTree {
    /// Run a full measure, arrange and screen-rect pass on the subtree.
    ///
    /// Running it twice with no change in between yields the same rects.
    pub fn layout(&mut self, id: WidgetId) {
        self.init_layout(id);
    }

    /// Re-run layout for a displayed widget after its content changed.
    ///
    /// Does nothing for widgets that have not been drawn yet; their first
    /// paint lays them out.
    pub fn pack_widget(&mut self, id: WidgetId) {
        if self.is_drawn(id) {
            self.update_layout(id);
        }
    }

    /// Whether the widget or one of its ancestors is running a layout pass.
    pub fn is_layout_managed(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.is_in_layout(node) {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub(crate) fn init_layout(&mut self, id: WidgetId) {
        tracing::trace!(target: targets::LAYOUT, ?id, "full layout");
        self.measure(id);
        self.arrange(id);
        self.calc_screen_rects(id);
    }

    /// Re-measure from `id` upwards until a widget's size is stable, then
    /// arrange and recompute screen rects from that widget down.
    #[tracing::instrument(skip(self), target = "horizon_trellis::layout", level = "trace")]
    pub(crate) fn update_layout(&mut self, id: WidgetId) {
        let mut current = id;
        let stable = loop {
            let Some(before) = self.rect(current) else {
                return;
            };

            let scope = LayoutScope::enter(self, current);
            self.send(current, &mut Message::SetPreferredRect);
            scope.exit(self);

            let Some(after) = self.rect(current) else {
                return;
            };
            if after.width() == before.width() && after.height() == before.height() {
                break current;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => break current,
            }
        };

        self.arrange(stable);
        self.calc_screen_rects(stable);
    }

    /// Bottom-up preferred-size pass over the visible subtree.
    pub(crate) fn measure(&mut self, id: WidgetId) {
        if !self.is_visible_in_tree(id) {
            return;
        }
        let scope = LayoutScope::enter(self, id);

        let mut child = self.first_child(id);
        while let Some(current) = child {
            self.measure(current);
            child = self.next_sibling(current);
        }
        self.send(id, &mut Message::SetPreferredRect);

        scope.exit(self);
    }

    /// Top-down placement pass over the visible subtree.
    pub(crate) fn arrange(&mut self, id: WidgetId) {
        if !self.is_visible_in_tree(id) {
            return;
        }
        let scope = LayoutScope::enter(self, id);

        self.send(id, &mut Message::DoLayout);
        let mut child = self.first_child(id);
        while let Some(current) = child {
            self.arrange(current);
            child = self.next_sibling(current);
        }

        scope.exit(self);
    }

    /// Recompute absolute rects of the subtree from the parent's.
    pub(crate) fn calc_screen_rects(&mut self, id: WidgetId) {
        let origin = self
            .parent(id)
            .and_then(|parent| self.screen_rect(parent))
            .map(|r| (r.left, r.top));

        let Some(state) = self.state_mut(id) else {
            return;
        };
        state.screen_rect = match origin {
            Some((x, y)) => state.rect.offset(x, y),
            None => state.rect,
        };

        let mut child = self.first_child(id);
        while let Some(current) = child {
            self.calc_screen_rects(current);
            child = self.next_sibling(current);
        }
    }
}
