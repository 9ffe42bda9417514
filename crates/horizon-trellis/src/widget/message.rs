//! The typed message set exchanged between the engine and widget handlers.
//!
//! Every state change in the engine is a message: the engine builds it, sends
//! it to the target's [`WidgetProc`](crate::widget::WidgetProc), and reads
//! back the `ok` field of protocol messages. This is what lets a handler
//! veto, augment or react to any change.
//!
//! Payloads borrowed from the sender (the paint surface, a skin, a drag
//! format, a custom payload) carry the message lifetime `'a`.
//!
//! # Custom Messages
//!
//! Hosts define their own messages with ids at or above [`MessageId::USER`]:
//!
//! ```ignore
//! const MSG_REFRESH: MessageId = MessageId(MessageId::USER.0 + 1);
//!
//! let mut count = 0u32;
//! tree.send(id, &mut Message::Custom(CustomMessage::new(MSG_REFRESH, &mut count)));
//!
//! // In the receiving handler:
//! if let Message::Custom(custom) = msg {
//!     if let Some(count) = custom.downcast_mut::<u32>() {
//!         *count += 1;
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;

use horizon_trellis_core::{Rect, TimerId};

use super::base::WidgetId;
use super::events::{Key, KeyboardModifiers, MouseButton};
use super::painting::Surface;
use super::skin::{Skin, Translation};

/// Numeric message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(pub u32);

impl MessageId {
    pub const CLEANUP: Self = Self(1);
    pub const PAINT: Self = Self(2);
    pub const INSERT_WIDGET: Self = Self(3);
    pub const REMOVE_WIDGET: Self = Self(4);
    pub const SET_RECT: Self = Self(5);
    pub const SET_VISIBLE: Self = Self(6);
    pub const SET_ENABLED: Self = Self(7);
    pub const GET_FOCUS: Self = Self(8);
    pub const LOSE_FOCUS: Self = Self(9);
    pub const GOT_FOCUS: Self = Self(10);
    pub const LOST_FOCUS: Self = Self(11);
    pub const HIT_TEST: Self = Self(12);
    pub const SET_PREFERRED_RECT: Self = Self(13);
    pub const DO_LAYOUT: Self = Self(14);
    pub const KEY_DOWN: Self = Self(15);
    pub const KEY_UP: Self = Self(16);
    pub const KEY_CHAR: Self = Self(17);
    pub const UNUSED_KEY_DOWN: Self = Self(18);
    pub const UNUSED_KEY_UP: Self = Self(19);
    pub const UNUSED_KEY_CHAR: Self = Self(20);
    pub const MOUSE_ENTER: Self = Self(21);
    pub const MOUSE_MOVE: Self = Self(22);
    pub const MOUSE_LEAVE: Self = Self(23);
    pub const MOUSE_WHEEL: Self = Self(24);
    pub const BUTTON_DOWN: Self = Self(25);
    pub const BUTTON_UP: Self = Self(26);
    pub const BEGIN_DRAG: Self = Self(27);
    pub const DRAG_ENDED: Self = Self(28);
    pub const DRAG_ENTER: Self = Self(29);
    pub const DRAG_MOVE: Self = Self(30);
    pub const DRAG_LEAVE: Self = Self(31);
    pub const DRAG_WHEEL: Self = Self(32);
    pub const DRAG_KEY_DOWN: Self = Self(33);
    pub const DRAG_KEY_UP: Self = Self(34);
    pub const DRAG_KEY_CHAR: Self = Self(35);
    pub const DROP: Self = Self(36);
    pub const QUERY_DRAGGED_DATA: Self = Self(37);
    pub const GET_DRAGGED_DATA: Self = Self(38);
    pub const TIMER: Self = Self(39);
    pub const DISPLAY_RESIZED: Self = Self(40);
    pub const SET_SKIN: Self = Self(41);
    pub const SET_TRANSLATION: Self = Self(42);

    /// First id available to host-defined messages.
    pub const USER: Self = Self(0x10000);

    /// Whether the id is in the host-defined range.
    pub fn is_user(self) -> bool {
        self >= Self::USER
    }
}

/// The reply of a protocol message a handler may refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Acceptance {
    pub ok: bool,
}

impl Acceptance {
    /// A reply that starts out refused.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self) {
        self.ok = true;
    }

    pub fn reject(&mut self) {
        self.ok = false;
    }
}

/// Paint request; coordinates are screen space.
pub struct PaintMessage<'a> {
    /// The widget's full screen rect.
    pub widget_rect: Rect,
    /// The part that needs painting; also the surface's current clip.
    pub paint_rect: Rect,
    /// Where to draw.
    pub surface: &'a mut dyn Surface,
}

/// Request to insert `child` under the receiver, in front of `before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertWidgetMessage {
    pub child: WidgetId,
    /// Sibling to insert in front of; `None` inserts on top.
    pub before: Option<WidgetId>,
    pub ok: bool,
}

/// Request to remove `child` from the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveWidgetMessage {
    pub child: WidgetId,
    pub ok: bool,
}

/// Request to change the receiver's local rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetRectMessage {
    pub rect: Rect,
}

/// Request to show or hide the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetVisibleMessage {
    pub visible: bool,
    pub ok: bool,
}

/// Request to enable or disable the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetEnabledMessage {
    pub enabled: bool,
    pub ok: bool,
}

/// Asks whether a point, in the receiver's local coordinates, hits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestMessage {
    pub x: i32,
    pub y: i32,
    pub ok: bool,
}

/// A keyboard event routed to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMessage {
    pub key: Key,
    /// The typed character, for key-char messages.
    pub character: Option<char>,
    pub modifiers: KeyboardModifiers,
    /// The character comes from auto-repeat.
    pub repeat: bool,
}

/// A pointer event routed to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseMessage {
    /// Position relative to the receiver.
    pub x: i32,
    pub y: i32,
    /// Absolute position.
    pub screen_x: i32,
    pub screen_y: i32,
    /// Wheel positions.
    pub z: i32,
    pub w: i32,
    /// Wheel deltas, for wheel messages.
    pub dz: i32,
    pub dw: i32,
    /// The button, for button and drop messages.
    pub button: Option<MouseButton>,
}

/// A pointer event during a drag, with the drag source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragMouseMessage {
    pub source: WidgetId,
    pub mouse: MouseMessage,
}

/// A keyboard event during a drag, with the drag source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragKeyMessage {
    pub source: WidgetId,
    pub key: KeyMessage,
}

/// What happens to dragged data once dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropAction {
    Copy,
    Move,
}

/// Asks the drag source whether it can supply data in `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDataMessage<'a> {
    pub format: &'a str,
    pub action: DropAction,
    pub ok: bool,
}

/// Asks the drag source for its data in `format`.
pub struct GetDataMessage<'a> {
    pub format: &'a str,
    pub action: DropAction,
    /// Filled in by the source.
    pub data: Option<Box<dyn Any>>,
}

/// A timer owned by the receiver expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerMessage {
    pub timer: TimerId,
}

/// The display changed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayResizedMessage {
    pub rect: Rect,
}

/// A host-defined message.
pub struct CustomMessage<'a> {
    id: MessageId,
    payload: &'a mut dyn Any,
}

impl<'a> CustomMessage<'a> {
    /// Create a custom message. `id` must be at least [`MessageId::USER`].
    pub fn new(id: MessageId, payload: &'a mut dyn Any) -> Self {
        debug_assert!(id.is_user(), "custom message id {id:?} is below MessageId::USER");
        Self { id, payload }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Try to downcast the payload to a specific type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Try to downcast the payload to a specific type, mutably.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.payload.downcast_mut::<T>()
    }
}

/// A message sent to a widget handler.
pub enum Message<'a> {
    /// Release resources; the widget is going away.
    Cleanup,
    Paint(PaintMessage<'a>),
    InsertWidget(InsertWidgetMessage),
    RemoveWidget(RemoveWidgetMessage),
    SetRect(SetRectMessage),
    SetVisible(SetVisibleMessage),
    SetEnabled(SetEnabledMessage),
    /// The widget is about to receive focus; refuse to stay unfocused.
    GetFocus(Acceptance),
    /// The widget is about to lose focus; refuse to keep it.
    LoseFocus(Acceptance),
    GotFocus,
    LostFocus,
    HitTest(HitTestMessage),
    /// Measure: size the widget from its children's current sizes.
    SetPreferredRect,
    /// Arrange: assign the children's local rects.
    DoLayout,
    KeyDown(KeyMessage),
    KeyUp(KeyMessage),
    KeyChar(KeyMessage),
    /// A key-down nobody in the focus path consumed.
    UnusedKeyDown(KeyMessage),
    UnusedKeyUp(KeyMessage),
    UnusedKeyChar(KeyMessage),
    MouseEnter(MouseMessage),
    MouseMove(MouseMessage),
    MouseLeave(MouseMessage),
    MouseWheel(MouseMessage),
    ButtonDown(MouseMessage),
    ButtonUp(MouseMessage),
    /// The widget is asked to become a drag source.
    BeginDrag(Acceptance),
    DragEnded,
    DragEnter(DragMouseMessage),
    DragMove(DragMouseMessage),
    DragLeave(DragMouseMessage),
    DragWheel(DragMouseMessage),
    DragKeyDown(DragKeyMessage),
    DragKeyUp(DragKeyMessage),
    DragKeyChar(DragKeyMessage),
    Drop(DragMouseMessage),
    QueryDraggedData(QueryDataMessage<'a>),
    GetDraggedData(GetDataMessage<'a>),
    Timer(TimerMessage),
    DisplayResized(DisplayResizedMessage),
    SetSkin(&'a dyn Skin),
    SetTranslation(&'a dyn Translation),
    Custom(CustomMessage<'a>),
}

impl Message<'_> {
    /// The numeric id of the message.
    pub fn id(&self) -> MessageId {
        match self {
            Self::Cleanup => MessageId::CLEANUP,
            Self::Paint(_) => MessageId::PAINT,
            Self::InsertWidget(_) => MessageId::INSERT_WIDGET,
            Self::RemoveWidget(_) => MessageId::REMOVE_WIDGET,
            Self::SetRect(_) => MessageId::SET_RECT,
            Self::SetVisible(_) => MessageId::SET_VISIBLE,
            Self::SetEnabled(_) => MessageId::SET_ENABLED,
            Self::GetFocus(_) => MessageId::GET_FOCUS,
            Self::LoseFocus(_) => MessageId::LOSE_FOCUS,
            Self::GotFocus => MessageId::GOT_FOCUS,
            Self::LostFocus => MessageId::LOST_FOCUS,
            Self::HitTest(_) => MessageId::HIT_TEST,
            Self::SetPreferredRect => MessageId::SET_PREFERRED_RECT,
            Self::DoLayout => MessageId::DO_LAYOUT,
            Self::KeyDown(_) => MessageId::KEY_DOWN,
            Self::KeyUp(_) => MessageId::KEY_UP,
            Self::KeyChar(_) => MessageId::KEY_CHAR,
            Self::UnusedKeyDown(_) => MessageId::UNUSED_KEY_DOWN,
            Self::UnusedKeyUp(_) => MessageId::UNUSED_KEY_UP,
            Self::UnusedKeyChar(_) => MessageId::UNUSED_KEY_CHAR,
            Self::MouseEnter(_) => MessageId::MOUSE_ENTER,
            Self::MouseMove(_) => MessageId::MOUSE_MOVE,
            Self::MouseLeave(_) => MessageId::MOUSE_LEAVE,
            Self::MouseWheel(_) => MessageId::MOUSE_WHEEL,
            Self::ButtonDown(_) => MessageId::BUTTON_DOWN,
            Self::ButtonUp(_) => MessageId::BUTTON_UP,
            Self::BeginDrag(_) => MessageId::BEGIN_DRAG,
            Self::DragEnded => MessageId::DRAG_ENDED,
            Self::DragEnter(_) => MessageId::DRAG_ENTER,
            Self::DragMove(_) => MessageId::DRAG_MOVE,
            Self::DragLeave(_) => MessageId::DRAG_LEAVE,
            Self::DragWheel(_) => MessageId::DRAG_WHEEL,
            Self::DragKeyDown(_) => MessageId::DRAG_KEY_DOWN,
            Self::DragKeyUp(_) => MessageId::DRAG_KEY_UP,
            Self::DragKeyChar(_) => MessageId::DRAG_KEY_CHAR,
            Self::Drop(_) => MessageId::DROP,
            Self::QueryDraggedData(_) => MessageId::QUERY_DRAGGED_DATA,
            Self::GetDraggedData(_) => MessageId::GET_DRAGGED_DATA,
            Self::Timer(_) => MessageId::TIMER,
            Self::DisplayResized(_) => MessageId::DISPLAY_RESIZED,
            Self::SetSkin(_) => MessageId::SET_SKIN,
            Self::SetTranslation(_) => MessageId::SET_TRANSLATION,
            Self::Custom(custom) => custom.id(),
        }
    }

    /// The `ok` reply of a protocol message; `false` for other messages.
    pub fn accepted(&self) -> bool {
        match self {
            Self::InsertWidget(m) => m.ok,
            Self::RemoveWidget(m) => m.ok,
            Self::SetVisible(m) => m.ok,
            Self::SetEnabled(m) => m.ok,
            Self::GetFocus(reply) | Self::LoseFocus(reply) | Self::BeginDrag(reply) => reply.ok,
            Self::HitTest(m) => m.ok,
            Self::QueryDraggedData(m) => m.ok,
            _ => false,
        }
    }

    /// A short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cleanup => "cleanup",
            Self::Paint(_) => "paint",
            Self::InsertWidget(_) => "insert-widget",
            Self::RemoveWidget(_) => "remove-widget",
            Self::SetRect(_) => "set-rect",
            Self::SetVisible(_) => "set-visible",
            Self::SetEnabled(_) => "set-enabled",
            Self::GetFocus(_) => "get-focus",
            Self::LoseFocus(_) => "lose-focus",
            Self::GotFocus => "got-focus",
            Self::LostFocus => "lost-focus",
            Self::HitTest(_) => "hit-test",
            Self::SetPreferredRect => "set-preferred-rect",
            Self::DoLayout => "do-layout",
            Self::KeyDown(_) => "key-down",
            Self::KeyUp(_) => "key-up",
            Self::KeyChar(_) => "key-char",
            Self::UnusedKeyDown(_) => "unused-key-down",
            Self::UnusedKeyUp(_) => "unused-key-up",
            Self::UnusedKeyChar(_) => "unused-key-char",
            Self::MouseEnter(_) => "mouse-enter",
            Self::MouseMove(_) => "mouse-move",
            Self::MouseLeave(_) => "mouse-leave",
            Self::MouseWheel(_) => "mouse-wheel",
            Self::ButtonDown(_) => "button-down",
            Self::ButtonUp(_) => "button-up",
            Self::BeginDrag(_) => "begin-drag",
            Self::DragEnded => "drag-ended",
            Self::DragEnter(_) => "drag-enter",
            Self::DragMove(_) => "drag-move",
            Self::DragLeave(_) => "drag-leave",
            Self::DragWheel(_) => "drag-wheel",
            Self::DragKeyDown(_) => "drag-key-down",
            Self::DragKeyUp(_) => "drag-key-up",
            Self::DragKeyChar(_) => "drag-key-char",
            Self::Drop(_) => "drop",
            Self::QueryDraggedData(_) => "query-dragged-data",
            Self::GetDraggedData(_) => "get-dragged-data",
            Self::Timer(_) => "timer",
            Self::DisplayResized(_) => "display-resized",
            Self::SetSkin(_) => "set-skin",
            Self::SetTranslation(_) => "set-translation",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.id().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_below_user() {
        let messages = [
            Message::Cleanup,
            Message::GotFocus,
            Message::DoLayout,
            Message::SetRect(SetRectMessage { rect: Rect::ZERO }),
            Message::GetFocus(Acceptance::new()),
        ];
        for msg in &messages {
            assert!(!msg.id().is_user(), "{msg:?}");
        }
    }

    #[test]
    fn test_custom_message_payload() {
        let mut value = 41u32;
        let id = MessageId(MessageId::USER.0 + 7);
        let mut msg = Message::Custom(CustomMessage::new(id, &mut value));
        assert_eq!(msg.id(), id);

        if let Message::Custom(custom) = &mut msg {
            assert!(custom.downcast_ref::<String>().is_none());
            *custom.downcast_mut::<u32>().unwrap() += 1;
        }
        drop(msg);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_acceptance() {
        let mut reply = Acceptance::new();
        assert!(!reply.ok);
        reply.accept();
        assert!(reply.ok);
        reply.reject();
        assert!(!reply.ok);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Message::DoLayout), "do-layout(14)");
    }
}
