//! Paint traversal and the rendering-surface seam.
//!
//! The engine does not produce pixels. It walks the visible tree, narrows the
//! clip at every level, and sends each widget a [`PaintMessage`] carrying the
//! host's [`Surface`]. Concrete widgets draw through that surface.
//!
//! # Example
//!
//! ```ignore
//! let mut surface = RecordingSurface::new(Rect::from_xywh(0, 0, 640, 480));
//! tree.draw(root, &mut surface);
//! ```

use horizon_trellis_core::Rect;
use horizon_trellis_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::base::WidgetId;
use super::engine::WidgetTree;
use super::message::{Message, PaintMessage};

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// The host's drawing target.
///
/// Coordinates are screen space. The engine only ever touches the clip and,
/// when a paint fallback color is configured, [`fill_rect`](Self::fill_rect).
pub trait Surface {
    /// The current clip rectangle.
    fn clip(&self) -> Rect;

    /// Restrict subsequent drawing to `rect`.
    fn set_clip(&mut self, rect: Rect);

    /// Fill `rect` (already clipped by the surface) with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// A surface that draws nothing and records what it was asked to do.
///
/// Useful for headless hosts and for tests.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    clip: Rect,
    /// Every clip the engine installed, in order.
    pub clips: Vec<Rect>,
    /// Every fill request, in order.
    pub fills: Vec<(Rect, Color)>,
}

impl RecordingSurface {
    /// Create a surface whose initial clip is `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            clip: bounds,
            clips: Vec::new(),
            fills: Vec::new(),
        }
    }
}

impl Surface for RecordingSurface {
    fn clip(&self) -> Rect {
        self.clip
    }

    fn set_clip(&mut self, rect: Rect) {
        self.clip = rect;
        self.clips.push(rect);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clipped = rect.intersection(&self.clip);
        if clipped.is_normalized() {
            self.fills.push((clipped, color));
        }
    }
}

impl WidgetTree {
    /// Paint the whole widget.
    pub fn draw(&mut self, id: WidgetId, surface: &mut dyn Surface) {
        if !self.contains(id) {
            debug_assert!(false, "draw on invalid widget {id:?}");
            return;
        }
        // The first layout may resize the widget itself.
        self.ensure_drawn(id);
        let Some(rect) = self.rect(id) else {
            return;
        };
        self.draw_rect(id, Rect::from_xywh(0, 0, rect.width(), rect.height()), surface);
    }

    /// Paint the part of the widget covered by `rect`, given in the widget's
    /// local coordinates.
    ///
    /// A widget that has never been drawn gets its first full layout pass
    /// here. The surface clip is restored on return.
    pub fn draw_rect(&mut self, id: WidgetId, rect: Rect, surface: &mut dyn Surface) {
        if !self.contains(id) {
            debug_assert!(false, "draw on invalid widget {id:?}");
            return;
        }
        self.ensure_drawn(id);

        let Some(screen) = self.screen_rect(id) else {
            return;
        };
        let clip = rect.offset(screen.left, screen.top);

        let saved = surface.clip();
        self.paint_recursive(id, clip, surface);
        surface.set_clip(saved);
    }

    /// Paint the subtree in screen space, with `clip` as the outer clip.
    pub(crate) fn paint_recursive(&mut self, id: WidgetId, clip: Rect, surface: &mut dyn Surface) {
        self.ensure_drawn(id);

        let Some(state) = self.state(id) else {
            return;
        };
        if !state.visible_tree {
            return;
        }
        let widget_rect = state.screen_rect;
        let paint_rect = widget_rect.intersection(&clip);
        if !paint_rect.is_normalized() {
            return;
        }

        surface.set_clip(paint_rect);
        tracing::trace!(target: targets::PAINT, ?id, ?paint_rect, "paint");
        self.send(
            id,
            &mut Message::Paint(PaintMessage {
                widget_rect,
                paint_rect,
                surface: &mut *surface,
            }),
        );

        let mut child = self.first_child(id);
        while let Some(current) = child {
            self.paint_recursive(current, paint_rect, surface);
            child = self.next_sibling(current);
        }
    }

    fn ensure_drawn(&mut self, id: WidgetId) {
        if self.is_drawn(id) {
            return;
        }
        self.update_flags(id, true);
        self.init_layout(id);
    }
}
