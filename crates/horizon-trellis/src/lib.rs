//! Horizon Trellis - a retained-mode, message-driven widget engine.
//!
//! The engine keeps a tree of widgets and talks to them exclusively through
//! typed messages. It runs two-phase layout, clipped paint traversal, the
//! focus, capture and drag-and-drop protocols, and translates raw host
//! events into widget messages. It draws nothing itself and owns no window:
//! the host supplies a [`Surface`](widget::Surface) and feeds
//! [`RawEvent`](widget::RawEvent)s.
//!
//! # Example
//!
//! ```
//! use horizon_trellis::prelude::*;
//!
//! let mut tree = WidgetTree::new();
//! let root = tree.create(DefaultProc);
//! tree.set_rect(root, Rect::from_xywh(0, 0, 320, 200));
//!
//! let field = tree.create(DefaultProc);
//! tree.set_rect(field, Rect::from_xywh(10, 10, 100, 20));
//! tree.add_widget(root, field);
//!
//! let mut surface = RecordingSurface::new(Rect::from_xywh(0, 0, 320, 200));
//! tree.draw(root, &mut surface);
//!
//! let tab = RawEvent::KeyChar {
//!     key: Key::Tab,
//!     character: None,
//!     modifiers: KeyboardModifiers::NONE,
//!     repeat: false,
//! };
//! assert!(tree.dispatch_event(root, &mut surface, &tab));
//! assert_eq!(tree.focus_widget(root), Some(field));
//! ```

pub use horizon_trellis_core::{Rect, TimerId};

pub mod config;
pub mod prelude;
pub mod widget;
