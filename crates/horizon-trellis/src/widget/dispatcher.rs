//! Translation of raw host events into widget messages.
//!
//! Every event starts at the tree's effective capture target (see
//! [`capture_widget`](WidgetTree::capture_widget)) and is routed from there:
//!
//! | Event            | Normal routing                                   | During a drag                        |
//! |------------------|--------------------------------------------------|--------------------------------------|
//! | key down/up/char | focus widget, then unused broadcast, then navigation | widget under the mouse         |
//! | pointer move     | enter/leave/move on the widget under the pointer | drag enter/leave/move                |
//! | wheel            | focus widget                                     | widget under the mouse               |
//! | button down      | widget under the pointer                         | ignored                              |
//! | button up        | widget under the pointer                         | drop, then the drag ends             |
//!
//! Display and timer events follow fixed rules in both modes. Messages only
//! reach enabled widgets; the capture target stands in whenever there is no
//! better receiver.

use horizon_trellis_core::Rect;
use horizon_trellis_core::logging::targets;

use super::base::WidgetId;
use super::engine::WidgetTree;
use super::events::{Key, KeyboardModifiers, MouseButton, RawEvent};
use super::message::{DisplayResizedMessage, DragKeyMessage, DragMouseMessage, KeyMessage, Message, MouseMessage};
use super::painting::Surface;

/// Which of the three key messages an event maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPhase {
    Down,
    Up,
    Char,
}

/// Pointer state carried by a raw pointer event.
#[derive(Debug, Clone, Copy)]
struct Pointer {
    x: i32,
    y: i32,
    z: i32,
    w: i32,
    dz: i32,
    dw: i32,
}

impl WidgetTree {
    /// Dispatch a host event to the tree rooted at `root`.
    ///
    /// `surface` is only painted on for expose events. Returns whether any
    /// widget consumed the event.
    #[tracing::instrument(skip(self, surface), target = "horizon_trellis::dispatch", level = "trace")]
    pub fn dispatch_event(&mut self, root: WidgetId, surface: &mut dyn Surface, event: &RawEvent) -> bool {
        if !self.contains(root) {
            debug_assert!(false, "event dispatched to invalid widget {root:?}");
            return false;
        }
        match self.drag_source(root) {
            Some(source) => self.dispatch_drag(root, source, surface, event),
            None => self.dispatch_normal(root, surface, event),
        }
    }

    fn dispatch_normal(&mut self, root: WidgetId, surface: &mut dyn Surface, event: &RawEvent) -> bool {
        match *event {
            RawEvent::KeyDown { key, modifiers } => self.key_event(root, KeyPhase::Down, key_message(key, None, modifiers, false)),
            RawEvent::KeyUp { key, modifiers } => self.key_event(root, KeyPhase::Up, key_message(key, None, modifiers, false)),
            RawEvent::KeyChar {
                key,
                character,
                modifiers,
                repeat,
            } => self.key_event(root, KeyPhase::Char, key_message(key, character, modifiers, repeat)),
            RawEvent::MouseAxes {
                x,
                y,
                z,
                w,
                dx,
                dy,
                dz,
                dw,
            } => {
                let pointer = Pointer { x, y, z, w, dz, dw };
                let mut consumed = false;
                if dx != 0 || dy != 0 {
                    consumed |= self.mouse_move(root, pointer);
                }
                if dz != 0 || dw != 0 {
                    consumed |= self.mouse_wheel(root, pointer);
                }
                consumed
            }
            RawEvent::MouseButtonDown { x, y, z, w, button } => self.mouse_button(root, pointer_at(x, y, z, w), button, true),
            RawEvent::MouseButtonUp { x, y, z, w, button } => self.mouse_button(root, pointer_at(x, y, z, w), button, false),
            _ => self.dispatch_common(root, surface, event),
        }
    }

    fn dispatch_drag(&mut self, root: WidgetId, source: WidgetId, surface: &mut dyn Surface, event: &RawEvent) -> bool {
        match *event {
            RawEvent::KeyDown { key, modifiers } => {
                self.drag_key_event(root, source, KeyPhase::Down, key_message(key, None, modifiers, false))
            }
            RawEvent::KeyUp { key, modifiers } => {
                self.drag_key_event(root, source, KeyPhase::Up, key_message(key, None, modifiers, false))
            }
            RawEvent::KeyChar {
                key,
                character,
                modifiers,
                repeat,
            } => self.drag_key_event(root, source, KeyPhase::Char, key_message(key, character, modifiers, repeat)),
            RawEvent::MouseAxes {
                x,
                y,
                z,
                w,
                dx,
                dy,
                dz,
                dw,
            } => {
                let pointer = Pointer { x, y, z, w, dz, dw };
                let mut consumed = false;
                if dx != 0 || dy != 0 {
                    consumed |= self.drag_move(root, source, pointer);
                }
                if dz != 0 || dw != 0 {
                    consumed |= self.drag_wheel(root, source, pointer);
                }
                consumed
            }
            RawEvent::MouseButtonDown { .. } => false,
            RawEvent::MouseButtonUp { x, y, z, w, button } => self.drop_event(root, source, pointer_at(x, y, z, w), button),
            _ => self.dispatch_common(root, surface, event),
        }
    }

    /// Display and timer events, routed the same way in both modes.
    fn dispatch_common(&mut self, root: WidgetId, surface: &mut dyn Surface, event: &RawEvent) -> bool {
        match *event {
            RawEvent::Timer { timer } => self.dispatch_timer(root, timer),
            RawEvent::DisplayExpose { rect } => {
                let Some(screen) = self.screen_rect(root) else {
                    return false;
                };
                let local = rect.offset(-screen.left, -screen.top);
                self.draw_rect(root, local, surface);
                true
            }
            RawEvent::DisplayResize { rect } => {
                self.send(root, &mut Message::DisplayResized(DisplayResizedMessage { rect }))
            }
            RawEvent::DisplaySwitchOut => {
                if self.focus_widget(root).is_none() {
                    return false;
                }
                // A holder that refuses to lose focus keeps it.
                self.remove_focus(root)
            }
            // Activation and close requests are left to the host.
            _ => false,
        }
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    fn key_event(&mut self, root: WidgetId, phase: KeyPhase, key: KeyMessage) -> bool {
        let capture = self.capture_widget(root);

        if let Some(focus) = self.focus_widget(capture) {
            let mut msg = match phase {
                KeyPhase::Down => Message::KeyDown(key),
                KeyPhase::Up => Message::KeyUp(key),
                KeyPhase::Char => Message::KeyChar(key),
            };
            if self.send_to_enabled(focus, &mut msg) {
                return true;
            }
        }

        let mut unused = match phase {
            KeyPhase::Down => Message::UnusedKeyDown(key),
            KeyPhase::Up => Message::UnusedKeyUp(key),
            KeyPhase::Char => Message::UnusedKeyChar(key),
        };
        if self.broadcast_to_enabled(capture, &mut unused) {
            return true;
        }

        phase == KeyPhase::Char && self.navigate(capture, key)
    }

    fn drag_key_event(&mut self, root: WidgetId, source: WidgetId, phase: KeyPhase, key: KeyMessage) -> bool {
        let capture = self.capture_widget(root);
        let target = self.mouse_widget(capture).unwrap_or(capture);
        let drag = DragKeyMessage { source, key };
        let mut msg = match phase {
            KeyPhase::Down => Message::DragKeyDown(drag),
            KeyPhase::Up => Message::DragKeyUp(drag),
            KeyPhase::Char => Message::DragKeyChar(drag),
        };
        self.send_to_enabled(target, &mut msg)
    }

    /// Focus navigation for a key nobody consumed.
    fn navigate(&mut self, capture: WidgetId, key: KeyMessage) -> bool {
        let config = self.config();
        let forward = match key.key {
            Key::Tab if config.tab_navigation => !key.modifiers.shift,
            Key::Left | Key::Up if config.arrow_navigation => false,
            Key::Right | Key::Down if config.arrow_navigation => true,
            _ => return false,
        };
        tracing::trace!(target: targets::DISPATCH, ?capture, forward, "keyboard focus navigation");
        if forward {
            self.move_focus_forward(capture)
        } else {
            self.move_focus_backward(capture)
        }
    }

    /// Send to every enabled widget of the subtree, parents first.
    fn broadcast_to_enabled(&mut self, id: WidgetId, msg: &mut Message<'_>) -> bool {
        if !self.is_enabled_in_tree(id) {
            return false;
        }
        let mut consumed = self.send(id, msg);
        let mut child = self.first_child(id);
        while let Some(current) = child {
            let next = self.next_sibling(current);
            consumed |= self.broadcast_to_enabled(current, msg);
            child = next.filter(|&n| self.parent(n) == Some(id));
        }
        consumed
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// The widget the pointer was last seen over, within the subtree.
    pub fn mouse_widget(&self, id: WidgetId) -> Option<WidgetId> {
        self.find_from_top(id, &|s| s.mouse)
    }

    fn mouse_message(&self, target: WidgetId, p: Pointer, button: Option<MouseButton>) -> MouseMessage {
        let origin = self.screen_rect(target).unwrap_or(Rect::ZERO);
        MouseMessage {
            x: p.x - origin.left,
            y: p.y - origin.top,
            screen_x: p.x,
            screen_y: p.y,
            z: p.z,
            w: p.w,
            dz: p.dz,
            dw: p.dw,
            button,
        }
    }

    /// Move the mouse flag from `old` to `new`. Returns whether they differ.
    fn track_mouse(&mut self, old: Option<WidgetId>, new: Option<WidgetId>) -> bool {
        if old == new {
            return false;
        }
        if let Some(state) = old.and_then(|id| self.state_mut(id)) {
            state.mouse = false;
        }
        if let Some(state) = new.and_then(|id| self.state_mut(id)) {
            state.mouse = true;
        }
        true
    }

    fn mouse_move(&mut self, root: WidgetId, p: Pointer) -> bool {
        let capture = self.capture_widget(root);
        // The old mouse widget may lie outside the capture subtree.
        let old = self.mouse_widget(root);
        let new = self.widget_from_screen_point(capture, p.x, p.y);

        let mut consumed = false;
        if self.track_mouse(old, new) {
            if let Some(old) = old {
                let mut msg = Message::MouseLeave(self.mouse_message(old, p, None));
                consumed |= self.send_to_enabled(old, &mut msg);
            }
            if let Some(new) = new {
                let mut msg = Message::MouseEnter(self.mouse_message(new, p, None));
                consumed |= self.send_to_enabled(new, &mut msg);
            }
        } else {
            let target = new.unwrap_or(capture);
            let mut msg = Message::MouseMove(self.mouse_message(target, p, None));
            consumed |= self.send_to_enabled(target, &mut msg);
        }
        consumed
    }

    fn mouse_wheel(&mut self, root: WidgetId, p: Pointer) -> bool {
        let capture = self.capture_widget(root);
        let target = self.focus_widget(capture).unwrap_or(capture);
        let mut msg = Message::MouseWheel(self.mouse_message(target, p, None));
        self.send_to_enabled(target, &mut msg)
    }

    fn mouse_button(&mut self, root: WidgetId, p: Pointer, raw_button: u32, down: bool) -> bool {
        let Some(button) = MouseButton::from_raw(raw_button) else {
            tracing::trace!(target: targets::DISPATCH, raw_button, "ignoring unsupported button");
            return false;
        };
        let capture = self.capture_widget(root);
        let target = self.widget_from_screen_point(capture, p.x, p.y).unwrap_or(capture);
        let mouse = self.mouse_message(target, p, Some(button));
        let mut msg = if down {
            Message::ButtonDown(mouse)
        } else {
            Message::ButtonUp(mouse)
        };
        self.send_to_enabled(target, &mut msg)
    }

    fn drag_move(&mut self, root: WidgetId, source: WidgetId, p: Pointer) -> bool {
        let capture = self.capture_widget(root);
        let old = self.mouse_widget(capture);
        let new = self.widget_from_screen_point(capture, p.x, p.y);

        let drag = |tree: &Self, target: WidgetId| DragMouseMessage {
            source,
            mouse: tree.mouse_message(target, p, None),
        };

        let mut consumed = false;
        if self.track_mouse(old, new) {
            if let Some(old) = old {
                let mut msg = Message::DragLeave(drag(self, old));
                consumed |= self.send_to_enabled(old, &mut msg);
            }
            if let Some(new) = new {
                let mut msg = Message::DragEnter(drag(self, new));
                consumed |= self.send_to_enabled(new, &mut msg);
            }
        } else {
            let target = new.unwrap_or(capture);
            let mut msg = Message::DragMove(drag(self, target));
            consumed |= self.send_to_enabled(target, &mut msg);
        }
        consumed
    }

    fn drag_wheel(&mut self, root: WidgetId, source: WidgetId, p: Pointer) -> bool {
        let capture = self.capture_widget(root);
        let target = self.mouse_widget(capture).unwrap_or(capture);
        let mut msg = Message::DragWheel(DragMouseMessage {
            source,
            mouse: self.mouse_message(target, p, None),
        });
        self.send_to_enabled(target, &mut msg)
    }

    fn drop_event(&mut self, root: WidgetId, source: WidgetId, p: Pointer, raw_button: u32) -> bool {
        let capture = self.capture_widget(root);
        let target = self.widget_from_screen_point(capture, p.x, p.y).unwrap_or(capture);

        let consumed = match MouseButton::from_raw(raw_button) {
            Some(button) => {
                let mut msg = Message::Drop(DragMouseMessage {
                    source,
                    mouse: self.mouse_message(target, p, Some(button)),
                });
                self.send_to_enabled(target, &mut msg)
            }
            None => false,
        };

        self.end_drag_and_drop(source);
        consumed
    }
}

fn key_message(key: Key, character: Option<char>, modifiers: KeyboardModifiers, repeat: bool) -> KeyMessage {
    KeyMessage {
        key,
        character,
        modifiers,
        repeat,
    }
}

fn pointer_at(x: i32, y: i32, z: i32, w: i32) -> Pointer {
    Pointer {
        x,
        y,
        z,
        w,
        dz: 0,
        dw: 0,
    }
}
