//! Prelude module for Horizon Trellis.
//!
//! ```ignore
//! use horizon_trellis::prelude::*;
//! ```
//!
//! This provides access to:
//! - The engine (`WidgetTree`, `WidgetId`, `EngineConfig`)
//! - Handlers (`WidgetProc`, `DefaultProc`, `default_proc`)
//! - Messages (`Message` and its payload types)
//! - Host events and painting (`RawEvent`, `Surface`, `Color`, `Rect`)

// ============================================================================
// Engine
// ============================================================================

pub use crate::config::EngineConfig;
pub use crate::widget::{WidgetId, WidgetState, WidgetTree};

// ============================================================================
// Handlers and Messages
// ============================================================================

pub use crate::widget::{
    Acceptance, CustomMessage, DefaultProc, DragKeyMessage, DragMouseMessage, DropAction, KeyMessage,
    Message, MessageId, MouseMessage, WidgetProc, default_proc,
};

// ============================================================================
// Host Interface
// ============================================================================

pub use crate::widget::{
    Color, Key, KeyboardModifiers, MemorySkin, MouseButton, RawEvent, RecordingSurface, Skin,
    SkinValue, Surface, Translation,
};
pub use horizon_trellis_core::{Rect, TimerId};
