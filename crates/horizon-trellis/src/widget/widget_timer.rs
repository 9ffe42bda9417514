//! Widget-owned timers.
//!
//! Timers live in the tree's [`TimerQueue`](horizon_trellis_core::TimerQueue)
//! and are recorded in the owning widget's timer list. The cleanup message
//! stops them all. The host drives expiry by calling
//! [`process_timers`](WidgetTree::process_timers) from its loop, or by
//! feeding [`RawEvent::Timer`](super::events::RawEvent::Timer) events
//! itself.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use horizon_trellis_core::TimerId;
use horizon_trellis_core::logging::targets;

use super::base::WidgetId;
use super::engine::WidgetTree;
use super::message::{Message, TimerMessage};

impl WidgetTree {
    /// Start a one-shot timer owned by `id`.
    pub fn start_widget_timer(&mut self, id: WidgetId, duration: Duration) -> Option<TimerId> {
        if !self.contains(id) {
            return None;
        }
        let timer = self.timers.start_one_shot(Instant::now(), duration);
        self.attach_timer(id, timer);
        Some(timer)
    }

    /// Start a repeating timer owned by `id`.
    pub fn start_widget_repeating_timer(&mut self, id: WidgetId, interval: Duration) -> Option<TimerId> {
        if !self.contains(id) {
            return None;
        }
        let timer = self.timers.start_repeating(Instant::now(), interval);
        self.attach_timer(id, timer);
        Some(timer)
    }

    /// Stop a timer owned by `id`. Fails if the widget does not own it.
    pub fn stop_widget_timer(&mut self, id: WidgetId, timer: TimerId) -> bool {
        let Some(state) = self.state_mut(id) else {
            return false;
        };
        let Some(pos) = state.timers.iter().position(|&t| t == timer) else {
            return false;
        };
        state.timers.swap_remove(pos);
        self.timers.stop(timer);
        true
    }

    /// Timers currently owned by `id`.
    pub fn widget_timers(&self, id: WidgetId) -> &[TimerId] {
        self.state(id).map(|s| s.timers.as_slice()).unwrap_or(&[])
    }

    /// Time until the earliest live timer fires.
    pub fn time_until_next_timer(&mut self) -> Option<Duration> {
        self.timers.time_until_next(Instant::now())
    }

    /// Dispatch every timer of the tree that expired by now.
    pub fn process_timers(&mut self, root: WidgetId) -> Vec<TimerId> {
        self.process_timers_at(root, Instant::now())
    }

    /// Deliver every timer that expired at or before `now` to its owner in
    /// the tree rooted at `root`, as a
    /// [`RawEvent::Timer`](super::events::RawEvent::Timer) would be.
    /// Returns the fired timers.
    ///
    /// Timers owned by other trees of the arena are left pending for their
    /// own root.
    pub fn process_timers_at(&mut self, root: WidgetId, now: Instant) -> Vec<TimerId> {
        let owned: HashSet<TimerId> = self
            .nodes
            .preorder(root)
            .into_iter()
            .flat_map(|id| self.widget_timers(id).iter().copied())
            .collect();
        let fired = self.timers.process_expired_where(now, |timer| owned.contains(&timer));
        for &timer in &fired {
            if !self.dispatch_timer(root, timer) {
                tracing::trace!(target: targets::TIMER, ?timer, "expired timer has no owner in this tree");
            }
        }
        fired
    }

    pub(crate) fn stop_all_widget_timers(&mut self, id: WidgetId) {
        let Some(state) = self.state_mut(id) else {
            return;
        };
        let owned = std::mem::take(&mut state.timers);
        for timer in owned {
            self.timers.stop(timer);
        }
    }

    /// Deliver a timer event to its owner, searching the subtree from the
    /// top of the z-order down.
    pub(crate) fn dispatch_timer(&mut self, id: WidgetId, timer: TimerId) -> bool {
        if self.widget_timers(id).contains(&timer) {
            tracing::trace!(target: targets::TIMER, ?id, ?timer, "timer fired");
            self.send_to_enabled(id, &mut Message::Timer(TimerMessage { timer }));
            // One-shot timers are gone from the queue once fired.
            if !self.timers.is_active(timer) {
                if let Some(state) = self.state_mut(id) {
                    state.timers.retain(|&t| t != timer);
                }
            }
            return true;
        }

        let mut child = self.last_child(id);
        while let Some(current) = child {
            if self.dispatch_timer(current, timer) {
                return true;
            }
            child = self.prev_sibling(current);
        }
        false
    }

    fn attach_timer(&mut self, id: WidgetId, timer: TimerId) {
        if let Some(state) = self.state_mut(id) {
            state.timers.push(timer);
        }
    }
}
