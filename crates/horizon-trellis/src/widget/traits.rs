//! The widget handler abstraction.
//!
//! A widget kind is a type implementing [`WidgetProc`]. The engine calls
//! [`handle`](WidgetProc::handle) for every message sent to a widget of that
//! kind; the handler reacts to what it cares about and hands everything else
//! to [`default_proc`](crate::widget::default_proc), which provides the
//! baseline behavior. Kinds extend each other the same way, by calling the
//! handler they build on for the messages they do not special-case.
//!
//! # Implementing a widget kind
//!
//! ```ignore
//! use std::cell::Cell;
//! use horizon_trellis::prelude::*;
//!
//! struct Button {
//!     pressed: Cell<bool>,
//! }
//!
//! impl WidgetProc for Button {
//!     fn handle(&self, tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool {
//!         match msg {
//!             Message::ButtonDown(_) => {
//!                 self.pressed.set(true);
//!                 tree.capture(id);
//!                 true
//!             }
//!             Message::ButtonUp(_) => {
//!                 self.pressed.set(false);
//!                 tree.release(id);
//!                 true
//!             }
//!             _ => default_proc(tree, id, msg),
//!         }
//!     }
//! }
//! ```
//!
//! Handlers take `&self` because the engine may re-enter the same handler
//! while it is running (a `set-rect` sent from inside a layout pass, for
//! example). Keep mutable widget state in `Cell`/`RefCell`.

use super::base::WidgetId;
use super::default_proc::default_proc;
use super::engine::WidgetTree;
use super::message::Message;

/// A widget kind's message handler.
pub trait WidgetProc {
    /// Handle `msg` sent to widget `id`.
    ///
    /// Returns whether the message was consumed. Protocol messages report
    /// their outcome through their `ok` field instead.
    fn handle(&self, tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool;
}

/// A widget with only the baseline behavior.
///
/// Useful as a plain container or as a placeholder during development.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProc;

impl WidgetProc for DefaultProc {
    fn handle(&self, tree: &mut WidgetTree, id: WidgetId, msg: &mut Message<'_>) -> bool {
        default_proc(tree, id, msg)
    }
}
