//! Baseline message handling shared by every widget kind.
//!
//! Handlers call [`default_proc`] for every message they do not handle
//! themselves. It implements the structural and state protocols: tree
//! insertion and removal, geometry, visibility, enablement, focus acceptance,
//! hit testing and timer release on cleanup.

use horizon_trellis_core::Rect;
use horizon_trellis_core::logging::targets;

use super::base::{WidgetId, WidgetState};
use super::engine::WidgetTree;
use super::message::Message;

/// The default widget procedure.
///
/// Returns whether the message was consumed. Messages it has no baseline
/// behavior for (input, paint without a configured fallback, custom
/// messages) are left unconsumed.
pub fn default_proc(tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool {
    match msg {
        Message::Cleanup => {
            tree.stop_all_widget_timers(id);
            true
        }
        Message::Paint(paint) => match tree.config().paint_fallback {
            Some(color) => {
                paint.surface.fill_rect(paint.paint_rect, color);
                true
            }
            None => false,
        },
        Message::InsertWidget(m) => {
            m.ok = insert_child(tree, id, m.child, m.before);
            true
        }
        Message::RemoveWidget(m) => {
            m.ok = remove_child(tree, id, m.child);
            true
        }
        Message::SetRect(m) => {
            set_rect(tree, id, m.rect);
            true
        }
        Message::SetVisible(m) => {
            m.ok = set_visible(tree, id, m.visible);
            true
        }
        Message::SetEnabled(m) => {
            m.ok = set_enabled(tree, id, m.enabled);
            true
        }
        Message::GetFocus(reply) | Message::LoseFocus(reply) => {
            reply.accept();
            true
        }
        Message::HitTest(m) => {
            let (width, height) = (tree.width(id), tree.height(id));
            m.ok = m.x >= 0 && m.y >= 0 && m.x < width && m.y < height;
            true
        }
        _ => false,
    }
}

fn insert_child(tree: &mut WidgetTree, parent: WidgetId, child: WidgetId, before: Option<WidgetId>) -> bool {
    let tab_order = i32::try_from(tree.child_count(parent)).unwrap_or(i32::MAX);
    if let Err(err) = tree.nodes.insert(parent, child, before) {
        tracing::debug!(target: targets::WIDGET, ?parent, ?child, %err, "insert rejected");
        return false;
    }
    tree.set_tab_order(child, tab_order);

    // The destination tree keeps its own focus holder and drag source.
    let root = tree.root_of(parent);
    let duplicated = |tree: &WidgetTree, f: fn(&WidgetState) -> bool| tree.count_in_subtree(root, f) > 1;
    let clear_focus = duplicated(tree, |s| s.focus);
    let clear_drag = duplicated(tree, |s| s.drag_source);
    let clear_mouse = duplicated(tree, |s| s.mouse);
    if clear_focus || clear_drag || clear_mouse {
        tracing::debug!(target: targets::WIDGET, ?child, clear_focus, clear_drag, "clearing flags of inserted subtree");
        for id in tree.nodes.preorder(child) {
            if let Some(state) = tree.state_mut(id) {
                state.focus &= !clear_focus;
                state.drag_source &= !clear_drag;
                state.mouse &= !clear_mouse;
            }
        }
    }

    let drawn = tree.is_drawn(parent);
    tree.update_flags(child, drawn);
    if drawn {
        tree.init_layout(child);
        tree.update_layout(parent);
    } else {
        tree.calc_screen_rects(child);
    }
    true
}

fn remove_child(tree: &mut WidgetTree, parent: WidgetId, child: WidgetId) -> bool {
    if let Err(err) = tree.nodes.remove(parent, child) {
        tracing::debug!(target: targets::WIDGET, ?parent, ?child, %err, "remove rejected");
        return false;
    }
    tree.update_flags(child, false);
    tree.calc_screen_rects(child);
    if tree.is_drawn(parent) {
        tree.update_layout(parent);
    }
    true
}

fn set_rect(tree: &mut WidgetTree, id: WidgetId, rect: Rect) {
    let Some(state) = tree.state_mut(id) else {
        return;
    };
    if state.rect == rect {
        return;
    }
    state.rect = rect;

    if tree.is_layout_managed(id) {
        return;
    }
    if tree.is_drawn(id) {
        tree.update_layout(id);
    } else {
        tree.calc_screen_rects(id);
    }
}

fn set_visible(tree: &mut WidgetTree, id: WidgetId, visible: bool) -> bool {
    let Some(state) = tree.state(id) else {
        return false;
    };
    if state.visible == visible {
        return true;
    }
    if !visible && tree.focus_widget(id).is_some() {
        tracing::debug!(target: targets::FOCUS, ?id, "refusing to hide the focus holder");
        return false;
    }

    let drawn = state.drawn;
    if let Some(state) = tree.state_mut(id) {
        state.visible = visible;
    }
    tree.update_flags(id, drawn);
    if drawn {
        if let Some(parent) = tree.parent(id) {
            tree.update_layout(parent);
        }
    }
    true
}

fn set_enabled(tree: &mut WidgetTree, id: WidgetId, enabled: bool) -> bool {
    let Some(state) = tree.state(id) else {
        return false;
    };
    if state.enabled == enabled {
        return true;
    }
    if !enabled && tree.focus_widget(id).is_some() {
        tracing::debug!(target: targets::FOCUS, ?id, "refusing to disable the focus holder");
        return false;
    }

    let drawn = state.drawn;
    if let Some(state) = tree.state_mut(id) {
        state.enabled = enabled;
    }
    tree.update_flags(id, drawn);
    true
}
