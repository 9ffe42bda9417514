//! Drag-and-drop sessions.
//!
//! A tree is either idle or dragging with exactly one source widget. While
//! dragging, [`dispatch_event`](WidgetTree::dispatch_event) switches to the
//! drag routing table. Targets ask the source for its payload through
//! [`query_dragged_data`](WidgetTree::query_dragged_data) and
//! [`get_dragged_data`](WidgetTree::get_dragged_data); the engine never
//! looks at the payload.

use std::any::Any;

use horizon_trellis_core::logging::targets;

use super::base::WidgetId;
use super::engine::WidgetTree;
use super::message::{Acceptance, DropAction, GetDataMessage, Message, QueryDataMessage};

impl WidgetTree {
    /// Start a drag with `source` as the data source.
    ///
    /// Fails if the tree already has a drag in progress or the source
    /// refuses.
    pub fn begin_drag_and_drop(&mut self, source: WidgetId) -> bool {
        if !self.contains(source) {
            return false;
        }
        if let Some(active) = self.drag_source(self.root_of(source)) {
            tracing::debug!(target: targets::DRAG_DROP, ?source, ?active, "drag already in progress");
            return false;
        }

        let mut msg = Message::BeginDrag(Acceptance::new());
        self.send(source, &mut msg);
        if !msg.accepted() {
            tracing::debug!(target: targets::DRAG_DROP, ?source, "source refused to begin drag");
            return false;
        }

        if let Some(state) = self.state_mut(source) {
            state.drag_source = true;
        }
        tracing::trace!(target: targets::DRAG_DROP, ?source, "drag started");
        true
    }

    /// End the drag of `source` and notify it. Fails if it is not the source.
    pub fn end_drag_and_drop(&mut self, source: WidgetId) -> bool {
        if !self.is_drag_source(source) {
            return false;
        }
        if let Some(state) = self.state_mut(source) {
            state.drag_source = false;
        }
        tracing::trace!(target: targets::DRAG_DROP, ?source, "drag ended");
        self.send(source, &mut Message::DragEnded);
        true
    }

    /// The drag source of the tree containing `id`, if a drag is active.
    pub fn drag_source(&self, id: WidgetId) -> Option<WidgetId> {
        self.find_from_bottom(self.root_of(id), &|s| s.drag_source)
    }

    /// Ask the source whether it can supply data in `format`.
    pub fn query_dragged_data(&mut self, source: WidgetId, format: &str, action: DropAction) -> bool {
        let mut msg = Message::QueryDraggedData(QueryDataMessage {
            format,
            action,
            ok: false,
        });
        self.send(source, &mut msg);
        msg.accepted()
    }

    /// Ask the source for its data in `format`.
    pub fn get_dragged_data(&mut self, source: WidgetId, format: &str, action: DropAction) -> Option<Box<dyn Any>> {
        let mut msg = Message::GetDraggedData(GetDataMessage {
            format,
            action,
            data: None,
        });
        self.send(source, &mut msg);
        match msg {
            Message::GetDraggedData(reply) => reply.data,
            _ => None,
        }
    }
}
