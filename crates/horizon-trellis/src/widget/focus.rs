//! Keyboard focus: the negotiation protocol and tab-order traversal.
//!
//! At most one widget per tree holds focus. Moving it is a two-sided
//! negotiation: the new holder is asked with [`Message::GetFocus`], the old
//! holder with [`Message::LoseFocus`], and either can refuse. Only when both
//! agree does the old holder get [`Message::LostFocus`] and the new one
//! [`Message::GotFocus`].
//!
//! Traversal walks siblings by `(tab_order, z_order)`, descending into a
//! candidate's subtree before trying the candidate itself. Widgets that are
//! disabled, hidden or refuse focus are skipped.

use horizon_trellis_core::logging::targets;

use super::base::WidgetId;
use super::engine::WidgetTree;
use super::message::{Acceptance, Message};

impl WidgetTree {
    /// The focus holder within the subtree of `id`, if any.
    pub fn focus_widget(&self, id: WidgetId) -> Option<WidgetId> {
        self.find_from_top(id, &|s| s.focus)
    }

    /// Give focus to a widget.
    ///
    /// Fails without changing anything if the widget is disabled or hidden,
    /// refuses focus, or the current holder refuses to let go.
    pub fn set_focus(&mut self, id: WidgetId) -> bool {
        if !self.is_enabled_in_tree(id) || !self.is_visible_in_tree(id) {
            tracing::debug!(target: targets::FOCUS, ?id, "cannot focus a disabled or hidden widget");
            return false;
        }
        if self.has_focus(id) {
            return true;
        }

        let mut msg = Message::GetFocus(Acceptance::new());
        self.send(id, &mut msg);
        if !msg.accepted() {
            tracing::debug!(target: targets::FOCUS, ?id, "widget refused focus");
            return false;
        }

        let root = self.root_of(id);
        if let Some(holder) = self.focus_widget(root) {
            if !self.take_focus(holder) {
                return false;
            }
        }

        if let Some(state) = self.state_mut(id) {
            state.focus = true;
        }
        tracing::trace!(target: targets::FOCUS, ?id, "focus moved");
        self.send(id, &mut Message::GotFocus);
        true
    }

    /// Take focus away from the holder in the tree without giving it to
    /// anyone. Returns whether the tree is left without a focus holder.
    pub fn remove_focus(&mut self, root: WidgetId) -> bool {
        match self.focus_widget(root) {
            Some(holder) => self.take_focus(holder),
            None => true,
        }
    }

    /// Move focus to the next widget in tab order, wrapping to `root`.
    pub fn move_focus_forward(&mut self, root: WidgetId) -> bool {
        self.move_focus(root, Direction::Forward)
    }

    /// Move focus to the previous widget in tab order, wrapping to `root`.
    pub fn move_focus_backward(&mut self, root: WidgetId) -> bool {
        self.move_focus(root, Direction::Backward)
    }

    /// Run the lose-focus negotiation on the current holder.
    fn take_focus(&mut self, holder: WidgetId) -> bool {
        let mut msg = Message::LoseFocus(Acceptance::new());
        self.send(holder, &mut msg);
        if !msg.accepted() {
            tracing::debug!(target: targets::FOCUS, ?holder, "focus holder refused to lose focus");
            return false;
        }
        if let Some(state) = self.state_mut(holder) {
            state.focus = false;
        }
        self.send(holder, &mut Message::LostFocus);
        true
    }

    fn move_focus(&mut self, root: WidgetId, direction: Direction) -> bool {
        let end = self.parent(root);
        let mut node = self.focus_widget(root).unwrap_or(root);
        let mut previous = None;

        loop {
            if self.move_focus_in_children(node, previous, direction) {
                return true;
            }
            previous = Some(node);
            match self.parent(node) {
                Some(parent) if Some(parent) != end => node = parent,
                _ => break,
            }
        }

        self.set_focus(root)
    }

    /// Try the children of `id` after (or before) `previous` in tab order.
    fn move_focus_in_children(&mut self, id: WidgetId, previous: Option<WidgetId>, direction: Direction) -> bool {
        let mut candidates: Vec<(i32, usize, WidgetId)> = self
            .children(id)
            .enumerate()
            .map(|(z, child)| (self.tab_order(child), z, child))
            .collect();
        candidates.sort_unstable();

        let start = previous.map(|p| (self.tab_order(p), self.z_order(p)));
        let ordered: Vec<WidgetId> = match direction {
            Direction::Forward => candidates
                .into_iter()
                .filter(|&(tab, z, _)| start.is_none_or(|s| (tab, z) > s))
                .map(|(_, _, child)| child)
                .collect(),
            Direction::Backward => candidates
                .into_iter()
                .rev()
                .filter(|&(tab, z, _)| start.is_none_or(|s| (tab, z) < s))
                .map(|(_, _, child)| child)
                .collect(),
        };

        for child in ordered {
            if self.move_focus_in_children(child, None, direction) {
                return true;
            }
            if self.set_focus(child) {
                return true;
            }
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}
