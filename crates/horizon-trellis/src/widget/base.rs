//! Per-widget engine state.
//!
//! [`WidgetState`] holds everything the engine tracks for a widget besides
//! its handler: geometry, the in-tree flags, capture depth, tab order and
//! owned timers. Only the engine's message protocols mutate it; widgets and
//! hosts read it through the accessors on
//! [`WidgetTree`](crate::widget::WidgetTree).

use std::borrow::Cow;

use horizon_trellis_core::{Rect, TimerId};
use slotmap::{Key, KeyData, new_key_type};

new_key_type! {
    /// A generation-checked handle to a widget in a
    /// [`WidgetTree`](crate::widget::WidgetTree).
    pub struct WidgetId;
}

impl WidgetId {
    /// Get the raw u64 representation of this ID.
    ///
    /// Useful for logging and for host-side maps keyed by integers.
    pub fn as_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Rebuild an ID from [`as_raw`](Self::as_raw) output.
    ///
    /// The result may refer to a widget that no longer exists; the tree
    /// rejects such handles.
    pub fn from_raw(raw: u64) -> Self {
        KeyData::from_ffi(raw).into()
    }
}

/// Engine-owned state of one widget.
#[derive(Debug, Clone)]
pub struct WidgetState {
    /// Identifier string used for skin lookups.
    pub(crate) class: Cow<'static, str>,

    /// Geometry relative to the parent.
    pub(crate) rect: Rect,

    /// Geometry relative to the root.
    pub(crate) screen_rect: Rect,

    pub(crate) visible: bool,

    /// `visible` and every ancestor visible.
    pub(crate) visible_tree: bool,

    pub(crate) enabled: bool,

    /// `enabled` and every ancestor enabled.
    pub(crate) enabled_tree: bool,

    pub(crate) focus: bool,

    /// The pointer is over this widget.
    pub(crate) mouse: bool,

    /// This widget supplies the data of the active drag.
    pub(crate) drag_source: bool,

    /// The widget has been shown at least once since it was last detached.
    pub(crate) drawn: bool,

    /// A measure or arrange pass is running on this widget.
    pub(crate) in_layout: bool,

    /// 0 when not capturing; otherwise the nesting level of the capture.
    pub(crate) capture: u32,

    pub(crate) tab_order: i32,

    pub(crate) timers: Vec<TimerId>,
}

impl WidgetState {
    pub(crate) fn new(class: Cow<'static, str>) -> Self {
        Self {
            class,
            rect: Rect::EMPTY,
            screen_rect: Rect::EMPTY,
            visible: true,
            visible_tree: true,
            enabled: true,
            enabled_tree: true,
            focus: false,
            mouse: false,
            drag_source: false,
            drawn: false,
            in_layout: false,
            capture: 0,
            tab_order: 0,
            timers: Vec::new(),
        }
    }

    /// The identifier string used for skin lookups.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Geometry relative to the parent.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Geometry relative to the root.
    pub fn screen_rect(&self) -> Rect {
        self.screen_rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_visible_in_tree(&self) -> bool {
        self.visible_tree
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_enabled_in_tree(&self) -> bool {
        self.enabled_tree
    }

    pub fn has_focus(&self) -> bool {
        self.focus
    }

    pub fn has_mouse(&self) -> bool {
        self.mouse
    }

    pub fn is_drag_source(&self) -> bool {
        self.drag_source
    }

    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    pub fn is_in_layout(&self) -> bool {
        self.in_layout
    }

    pub fn capture_depth(&self) -> u32 {
        self.capture
    }

    pub fn tab_order(&self) -> i32 {
        self.tab_order
    }

    /// Timers owned by the widget.
    pub fn timers(&self) -> &[TimerId] {
        &self.timers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = WidgetState::new(Cow::Borrowed("button"));
        assert_eq!(state.class(), "button");
        assert!(state.is_visible() && state.is_visible_in_tree());
        assert!(state.is_enabled() && state.is_enabled_in_tree());
        assert!(!state.has_focus() && !state.is_drawn());
        assert_eq!(state.capture_depth(), 0);
        assert!(state.timers().is_empty());
    }

    #[test]
    fn test_widget_id_raw_roundtrip() {
        let mut map = slotmap::SlotMap::<WidgetId, ()>::with_key();
        let id = map.insert(());
        assert_eq!(WidgetId::from_raw(id.as_raw()), id);
    }
}
