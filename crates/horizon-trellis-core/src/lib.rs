//! Core primitives for Horizon Trellis.
//!
//! This crate provides the building blocks the widget engine is made of:
//!
//! - **Lists**: O(1) doubly-linked sibling lists whose links live in arena nodes
//! - **Trees**: N-ary trees over generation-checked `slotmap` handles, with
//!   cycle-safe insertion and post-order teardown
//! - **Rectangles**: integer rectangles with inclusive bounds
//! - **Timers**: a host-driven deadline queue
//! - **Logging**: `tracing` targets and a tree dump formatter
//!
//! # Example
//!
//! ```
//! use horizon_trellis_core::{Rect, Tree};
//! use slotmap::DefaultKey;
//!
//! let mut tree: Tree<DefaultKey, Rect> = Tree::new();
//! let window = tree.create(Rect::from_xywh(0, 0, 640, 480));
//! let panel = tree.create(Rect::from_xywh(100, 50, 250, 200));
//! tree.insert(window, panel, None).unwrap();
//!
//! assert_eq!(tree.root_of(panel), window);
//! ```

pub mod error;
pub mod list;
pub mod logging;
pub mod rect;
pub mod timer;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use list::{Linked, List, ListLinks};
pub use rect::Rect;
pub use timer::{TimerId, TimerKind, TimerQueue};
pub use tree::Tree;
