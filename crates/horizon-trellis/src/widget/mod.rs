//! The widget engine.
//!
//! This module provides:
//!
//! - [`WidgetTree`]: the arena that owns every widget and runs the protocols
//! - [`WidgetProc`]: the handler trait a widget kind implements
//! - [`Message`]: the typed messages handlers receive
//! - [`default_proc`]: the baseline behavior every handler falls back to
//! - [`RawEvent`]: the host events [`WidgetTree::dispatch_event`] translates
//!
//! # Overview
//!
//! A widget is a node in a tree with a local rect, a few flags (visible,
//! enabled, focus, mouse, drag source, drawn, in layout), a capture depth,
//! a tab order and a handler. The engine never changes a widget behind its
//! handler's back: moving, hiding, focusing or inserting a widget sends it
//! a message, and the handler may refuse or react.
//!
//! # Coordinate Systems
//!
//! - **Local coordinates**: a widget's rect is relative to its parent's
//!   top-left corner; hit tests and mouse messages use the widget's own
//!   top-left corner as origin.
//! - **Screen coordinates**: relative to the root's parent space. Raw
//!   pointer events, paint rects and [`WidgetTree::screen_rect`] use them.
//!
//! [`WidgetTree::translate_point`] converts between two widgets' local
//! spaces.
//!
//! # Host Loop
//!
//! ```ignore
//! let mut tree = WidgetTree::new();
//! let root = tree.create(DefaultProc);
//! tree.set_rect(root, Rect::from_xywh(0, 0, 640, 480));
//! // ... build the tree ...
//! tree.draw(root, &mut surface);
//!
//! loop {
//!     let event = next_host_event();
//!     tree.dispatch_event(root, &mut surface, &event);
//!     tree.process_timers(root);
//! }
//!
//! tree.destroy(root);
//! ```

mod base;
mod capture;
mod default_proc;
mod dispatcher;
mod drag_drop;
mod engine;
mod events;
mod focus;
mod layout;
mod message;
mod painting;
mod skin;
mod traits;
mod widget_timer;

#[cfg(test)]
mod tests;

pub use base::{WidgetId, WidgetState};
pub use default_proc::default_proc;
pub use engine::WidgetTree;
pub use events::{Key, KeyboardModifiers, MouseButton, RawEvent};
pub use message::{
    Acceptance, CustomMessage, DisplayResizedMessage, DragKeyMessage, DragMouseMessage, DropAction,
    GetDataMessage, HitTestMessage, InsertWidgetMessage, KeyMessage, Message, MessageId, MouseMessage,
    PaintMessage, QueryDataMessage, RemoveWidgetMessage, SetEnabledMessage, SetRectMessage,
    SetVisibleMessage, TimerMessage,
};
pub use painting::{Color, RecordingSurface, Surface};
pub use skin::{MemorySkin, Skin, SkinValue, Translation};
pub use traits::{DefaultProc, WidgetProc};
