//! Skin and translation collaborators.
//!
//! The engine only transports these: [`WidgetTree::apply_skin`] broadcasts a
//! [`Message::SetSkin`] down a subtree and each concrete widget pulls its own
//! resources, keyed by its class string. Loading skins from disk is the
//! host's business.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use super::base::WidgetId;
use super::engine::WidgetTree;
use super::message::Message;
use super::painting::Color;

/// Resource lookups keyed by widget class and resource name.
///
/// Every lookup takes the value to use when the skin has no entry.
pub trait Skin {
    fn int(&self, class: &str, name: &str, default: i32) -> i32;

    fn string(&self, class: &str, name: &str, default: &str) -> String;

    fn color(&self, class: &str, name: &str, default: Color) -> Color;

    /// An opaque asset handle (bitmap, font); the host knows the concrete type.
    fn asset(&self, class: &str, name: &str) -> Option<Rc<dyn Any>>;
}

/// Text lookups for user-visible strings.
pub trait Translation {
    /// The translation of `text`, or `None` to display it as is.
    fn translate(&self, text: &str) -> Option<String>;
}

/// A value stored in a [`MemorySkin`].
#[derive(Clone)]
pub enum SkinValue {
    Int(i32),
    String(String),
    Color(Color),
    Asset(Rc<dyn Any>),
}

/// A skin held entirely in memory.
#[derive(Clone, Default)]
pub struct MemorySkin {
    /// Class, then resource name.
    values: HashMap<String, HashMap<String, SkinValue>>,
}

impl MemorySkin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value for `class`/`name`, replacing any previous one.
    pub fn set(&mut self, class: &str, name: &str, value: SkinValue) {
        self.values
            .entry(class.to_owned())
            .or_default()
            .insert(name.to_owned(), value);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, class: &str, name: &str, value: SkinValue) -> Self {
        self.set(class, name, value);
        self
    }

    fn get(&self, class: &str, name: &str) -> Option<&SkinValue> {
        self.values.get(class)?.get(name)
    }
}

impl Skin for MemorySkin {
    fn int(&self, class: &str, name: &str, default: i32) -> i32 {
        match self.get(class, name) {
            Some(SkinValue::Int(value)) => *value,
            _ => default,
        }
    }

    fn string(&self, class: &str, name: &str, default: &str) -> String {
        match self.get(class, name) {
            Some(SkinValue::String(value)) => value.clone(),
            _ => default.to_owned(),
        }
    }

    fn color(&self, class: &str, name: &str, default: Color) -> Color {
        match self.get(class, name) {
            Some(SkinValue::Color(value)) => *value,
            _ => default,
        }
    }

    fn asset(&self, class: &str, name: &str) -> Option<Rc<dyn Any>> {
        match self.get(class, name) {
            Some(SkinValue::Asset(value)) => Some(Rc::clone(value)),
            _ => None,
        }
    }
}

impl Translation for HashMap<String, String> {
    fn translate(&self, text: &str) -> Option<String> {
        self.get(text).cloned()
    }
}

impl WidgetTree {
    /// Broadcast `skin` to the widget and its whole subtree.
    pub fn apply_skin(&mut self, id: WidgetId, skin: &dyn Skin) -> bool {
        self.broadcast(id, &mut Message::SetSkin(skin))
    }

    /// Broadcast `translation` to the widget and its whole subtree.
    pub fn apply_translation(&mut self, id: WidgetId, translation: &dyn Translation) -> bool {
        self.broadcast(id, &mut Message::SetTranslation(translation))
    }
}
