//! Host-driven timer queue.
//!
//! The engine never sleeps or spawns threads. A [`TimerQueue`] only records
//! deadlines; the host asks it which timers have expired at a given instant
//! and feeds those into the widget engine as timer events.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

#[derive(Debug)]
struct TimerData {
    next_fire: Instant,
    interval: Duration,
    kind: TimerKind,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Deadlines of all live timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: SlotMap<TimerId, TimerData>,
    queue: BinaryHeap<QueueEntry>,
}

impl TimerQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer that fires once, `duration` after `now`.
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        self.start(now, duration, TimerKind::OneShot)
    }

    /// Start a timer that fires every `interval`, first at `now + interval`.
    pub fn start_repeating(&mut self, now: Instant, interval: Duration) -> TimerId {
        self.start(now, interval, TimerKind::Repeating)
    }

    fn start(&mut self, now: Instant, interval: Duration, kind: TimerKind) -> TimerId {
        let next_fire = now + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
        });
        self.queue.push(QueueEntry {
            id,
            fire_time: next_fire,
        });
        tracing::trace!(target: targets::TIMER, ?id, ?kind, ?interval, "timer started");
        id
    }

    /// Stop and forget a timer. Returns `false` if it was not live.
    pub fn stop(&mut self, id: TimerId) -> bool {
        let removed = self.timers.remove(id).is_some();
        if removed {
            tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
        }
        removed
    }

    /// Whether the timer is live.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// The kind of a live timer.
    pub fn kind(&self, id: TimerId) -> Option<TimerKind> {
        self.timers.get(id).map(|t| t.kind)
    }

    /// Number of live timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Time from `now` until the earliest live deadline, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.discard_stale();
        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    fn discard_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            let live = self
                .timers
                .get(entry.id)
                .is_some_and(|t| t.next_fire == entry.fire_time);
            if live {
                break;
            }
            self.queue.pop();
        }
    }

    /// Collect every timer whose deadline is at or before `now`.
    ///
    /// One-shot timers are forgotten once reported. Repeating timers are
    /// rescheduled one interval after `now`.
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        self.process_expired_where(now, |_| true)
    }

    /// [`process_expired`](Self::process_expired) restricted to the timers
    /// `select` accepts. Expired timers it rejects stay pending, untouched.
    #[tracing::instrument(skip(self, select), target = "horizon_trellis_core::timer", level = "trace")]
    pub fn process_expired_where(&mut self, now: Instant, mut select: impl FnMut(TimerId) -> bool) -> Vec<TimerId> {
        let mut fired = Vec::new();
        let mut deferred = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get_mut(entry.id) else {
                continue;
            };
            if timer.next_fire != entry.fire_time {
                continue;
            }
            if !select(entry.id) {
                deferred.push(entry);
                continue;
            }

            tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
            fired.push(entry.id);

            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(entry.id);
                }
                TimerKind::Repeating => {
                    timer.next_fire = now + timer.interval;
                    self.queue.push(QueueEntry {
                        id: entry.id,
                        fire_time: timer.next_fire,
                    });
                }
            }
        }

        self.queue.extend(deferred);
        fired
    }
}
