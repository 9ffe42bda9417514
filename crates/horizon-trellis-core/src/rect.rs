//! Integer rectangles with inclusive bounds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle whose `right` and `bottom` edges are inclusive.
///
/// A rectangle of width `w` starting at `x` spans `x..=x + w - 1`. A rect with
/// `left > right` or `top > bottom` is not normalized; intersections that do
/// not overlap produce such a rect.
///
/// # Example
///
/// ```
/// use horizon_trellis_core::Rect;
///
/// let a = Rect::from_xywh(0, 0, 10, 10);
/// let b = Rect::from_xywh(5, 5, 10, 10);
///
/// assert_eq!(a.intersection(&b), Rect::new(5, 5, 9, 9));
/// assert!(!a.intersection(&Rect::from_xywh(20, 0, 5, 5)).is_normalized());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (inclusive).
    pub right: i32,
    /// Bottom edge (inclusive).
    pub bottom: i32,
}

impl Rect {
    /// The 1x1 rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// The 0x0 rectangle at the origin; not normalized.
    pub const EMPTY: Self = Self::new(0, 0, -1, -1);

    /// Create a rect from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rect from a position and a size.
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    /// Horizontal extent.
    pub const fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    /// Vertical extent.
    pub const fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    /// Horizontal center.
    pub const fn center_x(&self) -> i32 {
        self.left + self.width() / 2
    }

    /// Vertical center.
    pub const fn center_y(&self) -> i32 {
        self.top + self.height() / 2
    }

    /// Whether `left <= right` and `top <= bottom`.
    pub const fn is_normalized(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    /// Whether the point lies inside the rect, edges included.
    pub const fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Whether the two rects share at least one point.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_normalized()
    }

    /// The overlapping area, not normalized when the rects do not overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        )
    }

    /// The smallest rect covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    /// The rect shifted by `(dx, dy)`.
    pub const fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.left + dx,
            self.top + dy,
            self.right + dx,
            self.bottom + dy,
        )
    }

    /// The rect moved so its top-left corner is at `(x, y)`, size unchanged.
    pub const fn moved_to(&self, x: i32, y: i32) -> Rect {
        Rect::from_xywh(x, y, self.width(), self.height())
    }

    /// The rect with the same top-left corner and a new size.
    pub const fn resized(&self, width: i32, height: i32) -> Rect {
        Rect::from_xywh(self.left, self.top, width, height)
    }
}

static_assertions::assert_impl_all!(Rect: Copy, Send, Sync);
