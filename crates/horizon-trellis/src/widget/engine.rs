//! The widget arena and its messaging primitives.
//!
//! A [`WidgetTree`] owns every widget: its handler, its engine state and its
//! place in the tree. It may hold several independent trees; each root is a
//! separate display surface as far as focus, capture and drag state go.
//!
//! Every state change goes through a message. [`send`](WidgetTree::send)
//! invokes a widget's handler, [`broadcast`](WidgetTree::broadcast) invokes
//! a whole subtree's. The convenience operations here (`insert_widget`,
//! `set_rect`, `hide`, ...) only build a message, send it and read back the
//! reply.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::prelude::*;
//!
//! let mut tree = WidgetTree::new();
//! let root = tree.create(DefaultProc);
//! let child = tree.create(DefaultProc);
//!
//! tree.set_rect(root, Rect::from_xywh(0, 0, 640, 480));
//! tree.set_rect(child, Rect::from_xywh(100, 50, 250, 200));
//! assert!(tree.add_widget(root, child));
//!
//! assert_eq!(tree.screen_rect(child), Some(Rect::from_xywh(100, 50, 250, 200)));
//! assert_eq!(tree.widget_from_point(root, 120, 60), Some(child));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use horizon_trellis_core::logging::{TreeDebug, targets};
use horizon_trellis_core::{Rect, TimerQueue, Tree};

use super::base::{WidgetId, WidgetState};
use super::message::{
    HitTestMessage, InsertWidgetMessage, Message, RemoveWidgetMessage, SetEnabledMessage,
    SetRectMessage, SetVisibleMessage,
};
use super::traits::WidgetProc;
use crate::config::EngineConfig;

/// One arena slot: the handler and the engine state.
pub(crate) struct WidgetNode {
    pub(crate) handler: Rc<dyn WidgetProc>,
    pub(crate) state: WidgetState,
}

/// The arena of widgets and the engine operating on it.
///
/// Single-threaded by construction: handlers are `Rc`s and may re-enter the
/// tree while they run.
pub struct WidgetTree {
    pub(crate) nodes: Tree<WidgetId, WidgetNode>,
    pub(crate) timers: TimerQueue,
    config: EngineConfig,
}

static_assertions::assert_not_impl_any!(WidgetTree: Send, Sync);

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetTree")
            .field("widgets", &self.nodes.len())
            .field("timers", &self.timers.active_count())
            .field("config", &self.config)
            .finish()
    }
}

impl WidgetTree {
    /// Create an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty tree with a custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            nodes: Tree::new(),
            timers: TimerQueue::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create a detached widget driven by `handler`.
    pub fn create(&mut self, handler: impl WidgetProc + 'static) -> WidgetId {
        self.create_with_class(handler, "widget")
    }

    /// Create a detached widget with the identifier string skins look it up by.
    pub fn create_with_class(
        &mut self,
        handler: impl WidgetProc + 'static,
        class: impl Into<Cow<'static, str>>,
    ) -> WidgetId {
        self.create_shared(Rc::new(handler), class)
    }

    /// Create a detached widget from a handler the host keeps a reference to.
    pub fn create_shared(
        &mut self,
        handler: Rc<dyn WidgetProc>,
        class: impl Into<Cow<'static, str>>,
    ) -> WidgetId {
        let class = class.into();
        let id = self.nodes.create(WidgetNode {
            handler,
            state: WidgetState::new(class),
        });
        tracing::trace!(target: targets::WIDGET, ?id, "created widget");
        id
    }

    /// Replace the handler of a widget.
    pub fn set_handler(&mut self, id: WidgetId, handler: Rc<dyn WidgetProc>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.handler = handler;
        }
    }

    /// The handler of a widget.
    pub fn handler(&self, id: WidgetId) -> Option<Rc<dyn WidgetProc>> {
        self.nodes.get(id).map(|node| Rc::clone(&node.handler))
    }

    /// Broadcast the cleanup message to the widget and its subtree.
    ///
    /// The widgets stay in the tree; handlers release what they own.
    pub fn cleanup(&mut self, id: WidgetId) {
        self.broadcast(id, &mut Message::Cleanup);
    }

    /// Clean up the widget, detach it and free its whole subtree.
    #[tracing::instrument(skip(self), target = "horizon_trellis::widget", level = "debug")]
    pub fn destroy(&mut self, id: WidgetId) {
        if !self.contains(id) {
            return;
        }
        self.cleanup(id);

        if let Some(parent) = self.parent(id) {
            if !self.remove_widget(parent, id) {
                tracing::debug!(target: targets::WIDGET, ?parent, ?id, "parent refused removal, detaching anyway");
                if self.nodes.detach(id).is_ok() {
                    self.update_flags(id, false);
                }
            }
        }

        match self.nodes.remove_subtree(id) {
            Ok(freed) => {
                for (_, node) in &freed {
                    for &timer in &node.state.timers {
                        self.timers.stop(timer);
                    }
                }
                tracing::debug!(target: targets::WIDGET, ?id, count = freed.len(), "destroyed widget subtree");
            }
            Err(err) => {
                tracing::debug!(target: targets::WIDGET, ?id, %err, "destroy failed");
            }
        }
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    /// Invoke the widget's handler. Returns whether the message was consumed.
    pub fn send(&mut self, id: WidgetId, msg: &mut Message<'_>) -> bool {
        let Some(handler) = self.handler(id) else {
            debug_assert!(false, "{msg:?} sent to invalid widget {id:?}");
            return false;
        };
        tracing::trace!(target: targets::MESSAGE, ?id, ?msg, "send");
        handler.handle(self, id, msg)
    }

    /// Send only if the widget is enabled in the tree.
    pub fn send_to_enabled(&mut self, id: WidgetId, msg: &mut Message<'_>) -> bool {
        self.is_enabled_in_tree(id) && self.send(id, msg)
    }

    /// Send to the widget, then to every descendant (parents first, children
    /// low to high). Returns whether any of them consumed the message.
    pub fn broadcast(&mut self, id: WidgetId, msg: &mut Message<'_>) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut consumed = self.send(id, msg);

        let mut child = self.first_child(id);
        while let Some(current) = child {
            let next = self.next_sibling(current);
            consumed |= self.broadcast(current, msg);
            // A handler may have moved the child elsewhere.
            child = if self.parent(current) == Some(id) {
                self.next_sibling(current)
            } else {
                next.filter(|&n| self.parent(n) == Some(id))
            };
        }
        consumed
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Insert `child` under `parent`, in front of `before` (on top if `None`).
    pub fn insert_widget(&mut self, parent: WidgetId, child: WidgetId, before: Option<WidgetId>) -> bool {
        let mut msg = Message::InsertWidget(InsertWidgetMessage {
            child,
            before,
            ok: false,
        });
        self.send(parent, &mut msg);
        msg.accepted()
    }

    /// Insert `child` on top of `parent`'s children.
    pub fn add_widget(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        self.insert_widget(parent, child, None)
    }

    /// Remove `child` from `parent`.
    pub fn remove_widget(&mut self, parent: WidgetId, child: WidgetId) -> bool {
        let mut msg = Message::RemoveWidget(RemoveWidgetMessage { child, ok: false });
        self.send(parent, &mut msg);
        msg.accepted()
    }

    /// Remove `child` from its parent, if it has one.
    pub fn detach_widget(&mut self, child: WidgetId) -> bool {
        match self.parent(child) {
            Some(parent) => self.remove_widget(parent, child),
            None => false,
        }
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains(id)
    }

    /// Number of live widgets across all trees.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.parent(id)
    }

    pub fn first_child(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.first_child(id)
    }

    pub fn last_child(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.last_child(id)
    }

    pub fn next_sibling(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.next_sibling(id)
    }

    pub fn prev_sibling(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.prev_sibling(id)
    }

    /// Children from lowest to highest z-order.
    pub fn children(&self, id: WidgetId) -> impl DoubleEndedIterator<Item = WidgetId> + '_ {
        self.nodes.children(id)
    }

    pub fn child_count(&self, id: WidgetId) -> usize {
        self.nodes.child_count(id)
    }

    pub fn root_of(&self, id: WidgetId) -> WidgetId {
        self.nodes.root_of(id)
    }

    /// Whether `ancestor` is on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        self.nodes.is_ancestor(ancestor, id)
    }

    /// Position among siblings, 0 being painted first.
    pub fn z_order(&self, id: WidgetId) -> usize {
        self.nodes.z_order(id)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The engine state of a widget.
    pub fn state(&self, id: WidgetId) -> Option<&WidgetState> {
        self.nodes.get(id).map(|node| &node.state)
    }

    pub(crate) fn state_mut(&mut self, id: WidgetId) -> Option<&mut WidgetState> {
        self.nodes.get_mut(id).map(|node| &mut node.state)
    }

    fn flag(&self, id: WidgetId, f: impl Fn(&WidgetState) -> bool) -> bool {
        self.state(id).is_some_and(f)
    }

    pub fn class(&self, id: WidgetId) -> Option<&str> {
        self.state(id).map(WidgetState::class)
    }

    pub fn set_class(&mut self, id: WidgetId, class: impl Into<Cow<'static, str>>) {
        if let Some(state) = self.state_mut(id) {
            state.class = class.into();
        }
    }

    /// Local rect, relative to the parent.
    pub fn rect(&self, id: WidgetId) -> Option<Rect> {
        self.state(id).map(|s| s.rect)
    }

    /// Rect relative to the root.
    pub fn screen_rect(&self, id: WidgetId) -> Option<Rect> {
        self.state(id).map(|s| s.screen_rect)
    }

    pub fn x(&self, id: WidgetId) -> i32 {
        self.rect(id).map_or(0, |r| r.left)
    }

    pub fn y(&self, id: WidgetId) -> i32 {
        self.rect(id).map_or(0, |r| r.top)
    }

    pub fn width(&self, id: WidgetId) -> i32 {
        self.rect(id).map_or(0, |r| r.width())
    }

    pub fn height(&self, id: WidgetId) -> i32 {
        self.rect(id).map_or(0, |r| r.height())
    }

    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.visible)
    }

    pub fn is_visible_in_tree(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.visible_tree)
    }

    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.enabled)
    }

    pub fn is_enabled_in_tree(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.enabled_tree)
    }

    pub fn has_focus(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.focus)
    }

    pub fn has_mouse(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.mouse)
    }

    pub fn is_drag_source(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.drag_source)
    }

    pub fn is_drawn(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.drawn)
    }

    pub fn is_in_layout(&self, id: WidgetId) -> bool {
        self.flag(id, |s| s.in_layout)
    }

    pub fn capture_depth(&self, id: WidgetId) -> u32 {
        self.state(id).map_or(0, |s| s.capture)
    }

    pub fn tab_order(&self, id: WidgetId) -> i32 {
        self.state(id).map_or(0, |s| s.tab_order)
    }

    /// Set the focus traversal position among siblings.
    pub fn set_tab_order(&mut self, id: WidgetId, tab_order: i32) {
        if let Some(state) = self.state_mut(id) {
            state.tab_order = tab_order;
        }
    }

    /// Recompute the drawn and in-tree flags of a subtree.
    ///
    /// A subtree that is no longer drawn loses its focus, mouse and
    /// drag-source flags.
    pub(crate) fn update_flags(&mut self, id: WidgetId, drawn: bool) {
        let (parent_visible, parent_enabled) = self
            .parent(id)
            .and_then(|p| self.state(p))
            .map_or((true, true), |s| (s.visible_tree, s.enabled_tree));

        let Some(state) = self.state_mut(id) else {
            return;
        };
        state.drawn = drawn;
        state.visible_tree = state.visible && parent_visible;
        state.enabled_tree = state.enabled && parent_enabled;
        if !drawn {
            state.focus = false;
            state.mouse = false;
            state.drag_source = false;
        }

        let mut child = self.first_child(id);
        while let Some(current) = child {
            self.update_flags(current, drawn);
            child = self.next_sibling(current);
        }
    }

    /// Number of widgets in the subtree whose state satisfies `f`.
    pub(crate) fn count_in_subtree(&self, id: WidgetId, f: impl Fn(&WidgetState) -> bool) -> usize {
        self.nodes
            .preorder(id)
            .into_iter()
            .filter(|&w| self.flag(w, &f))
            .count()
    }

    /// First widget of the subtree (pre-order, highest child first) whose
    /// state satisfies `f`.
    pub(crate) fn find_from_top(&self, id: WidgetId, f: &impl Fn(&WidgetState) -> bool) -> Option<WidgetId> {
        if self.flag(id, f) {
            return Some(id);
        }
        self.children(id).rev().find_map(|child| self.find_from_top(child, f))
    }

    /// First widget of the subtree (pre-order, lowest child first) whose
    /// state satisfies `f`.
    pub(crate) fn find_from_bottom(&self, id: WidgetId, f: &impl Fn(&WidgetState) -> bool) -> Option<WidgetId> {
        if self.flag(id, f) {
            return Some(id);
        }
        self.children(id).find_map(|child| self.find_from_bottom(child, f))
    }

    // =========================================================================
    // Geometry and visibility
    // =========================================================================

    /// Set the widget's local rect.
    pub fn set_rect(&mut self, id: WidgetId, rect: Rect) {
        self.send(id, &mut Message::SetRect(SetRectMessage { rect }));
    }

    pub fn move_widget(&mut self, id: WidgetId, x: i32, y: i32) {
        if let Some(rect) = self.rect(id) {
            self.set_rect(id, rect.moved_to(x, y));
        }
    }

    pub fn resize_widget(&mut self, id: WidgetId, width: i32, height: i32) {
        if let Some(rect) = self.rect(id) {
            self.set_rect(id, rect.resized(width, height));
        }
    }

    pub fn move_and_resize(&mut self, id: WidgetId, x: i32, y: i32, width: i32, height: i32) {
        self.set_rect(id, Rect::from_xywh(x, y, width, height));
    }

    /// Show or hide the widget. Fails if hiding would hide the focus holder.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> bool {
        let mut msg = Message::SetVisible(SetVisibleMessage { visible, ok: false });
        self.send(id, &mut msg);
        msg.accepted()
    }

    pub fn show(&mut self, id: WidgetId) -> bool {
        self.set_visible(id, true)
    }

    pub fn hide(&mut self, id: WidgetId) -> bool {
        self.set_visible(id, false)
    }

    /// Enable or disable the widget. Fails if disabling would disable the
    /// focus holder.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> bool {
        let mut msg = Message::SetEnabled(SetEnabledMessage { enabled, ok: false });
        self.send(id, &mut msg);
        msg.accepted()
    }

    pub fn enable(&mut self, id: WidgetId) -> bool {
        self.set_enabled(id, true)
    }

    pub fn disable(&mut self, id: WidgetId) -> bool {
        self.set_enabled(id, false)
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Convert a point from `from`'s local space to `to`'s local space.
    pub fn translate_point(&self, from: WidgetId, x: i32, y: i32, to: WidgetId) -> Option<(i32, i32)> {
        let src = self.screen_rect(from)?;
        let dst = self.screen_rect(to)?;
        Some((x + src.left - dst.left, y + src.top - dst.top))
    }

    /// Convert a rect from `from`'s local space to `to`'s local space.
    pub fn translate_rect(&self, from: WidgetId, rect: Rect, to: WidgetId) -> Option<Rect> {
        let (x, y) = self.translate_point(from, rect.left, rect.top, to)?;
        Some(rect.offset(x - rect.left, y - rect.top))
    }

    /// The deepest visible widget at a point given in `id`'s local space.
    ///
    /// Children are tested from the top of the z-order down; the widget
    /// itself answers last, through the hit-test message.
    pub fn widget_from_point(&mut self, id: WidgetId, x: i32, y: i32) -> Option<WidgetId> {
        let state = self.state(id)?;
        if !state.visible_tree {
            return None;
        }
        let rect = state.rect;
        if x < 0 || y < 0 || x >= rect.width() || y >= rect.height() {
            return None;
        }

        let mut child = self.last_child(id);
        while let Some(current) = child {
            if let Some(local) = self.rect(current) {
                if let Some(hit) = self.widget_from_point(current, x - local.left, y - local.top) {
                    return Some(hit);
                }
            }
            child = self.prev_sibling(current);
        }

        let mut msg = Message::HitTest(HitTestMessage { x, y, ok: false });
        self.send(id, &mut msg);
        msg.accepted().then_some(id)
    }

    /// [`widget_from_point`](Self::widget_from_point) with a screen-space point.
    pub fn widget_from_screen_point(&mut self, id: WidgetId, x: i32, y: i32) -> Option<WidgetId> {
        let screen = self.screen_rect(id)?;
        self.widget_from_point(id, x - screen.left, y - screen.top)
    }

    // =========================================================================
    // Debugging
    // =========================================================================

    /// Render the subtree as indented text with rects and flags.
    pub fn dump_tree(&self, id: WidgetId) -> String {
        TreeDebug::new().format_subtree(&self.nodes, id, |_, node| {
            let s = &node.state;
            let r = s.rect;
            let mut flags = String::new();
            for (set, c) in [
                (s.visible, 'v'),
                (s.enabled, 'e'),
                (s.focus, 'f'),
                (s.mouse, 'm'),
                (s.drag_source, 'd'),
                (s.drawn, 'w'),
            ] {
                flags.push(if set { c } else { '-' });
            }
            format!(
                "{} ({}, {}, {}x{}) {} capture={} tab={}",
                s.class,
                r.left,
                r.top,
                r.width(),
                r.height(),
                flags,
                s.capture,
                s.tab_order
            )
        })
    }
}
