//! Frame-counted timer queue
//!
//! Delayed effects (level banners, staggered boss attacks, end screens) are
//! queued here instead of being fired from detached callbacks. The owner
//! advances the queue once per simulated frame. `cancel_all` drops every
//! pending entry and bumps the epoch so ids handed out earlier go stale.

use serde::{Deserialize, Serialize};

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId {
    epoch: u32,
    seq: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<E> {
    id: TimerId,
    remaining: u32,
    event: E,
}

/// Pending timers for events of type `E`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerQueue<E> {
    entries: Vec<Entry<E>>,
    epoch: u32,
    next_seq: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            epoch: 0,
            next_seq: 0,
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` after `frames` calls to `advance`.
    /// A delay of 0 fires on the next advance.
    pub fn schedule(&mut self, frames: u32, event: E) -> TimerId {
        let id = TimerId {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.entries.push(Entry {
            id,
            remaining: frames,
            event,
        });
        id
    }

    /// Cancel one timer. Returns false if it already fired or went stale.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if id.epoch != self.epoch {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every pending timer and start a new epoch
    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Cancelling {} pending timers", self.entries.len());
        }
        self.entries.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance one frame and return the events that came due, in the order
    /// they were scheduled.
    pub fn advance(&mut self) -> Vec<E> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());

        for mut entry in self.entries.drain(..) {
            if entry.remaining == 0 {
                due.push(entry.event);
            } else {
                entry.remaining -= 1;
                if entry.remaining == 0 {
                    due.push(entry.event);
                } else {
                    pending.push(entry);
                }
            }
        }

        self.entries = pending;
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = TimerQueue::new();
        timers.schedule(3, "banner");
        assert!(timers.advance().is_empty());
        assert!(timers.advance().is_empty());
        assert_eq!(timers.advance(), vec!["banner"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_zero_delay_fires_next_advance() {
        let mut timers = TimerQueue::new();
        timers.schedule(0, 1);
        timers.schedule(1, 2);
        assert_eq!(timers.advance(), vec![1, 2]);
    }

    #[test]
    fn test_same_frame_keeps_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(2, 'b');
        timers.schedule(1, 'a');
        timers.schedule(2, 'c');
        assert_eq!(timers.advance(), vec!['a']);
        assert_eq!(timers.advance(), vec!['b', 'c']);
    }

    #[test]
    fn test_cancelled_timers_never_fire() {
        let mut timers = TimerQueue::new();
        let keep = timers.schedule(2, "keep");
        let drop = timers.schedule(2, "drop");
        assert!(timers.cancel(drop));
        assert!(!timers.cancel(drop));
        assert_eq!(timers.advance(), Vec::<&str>::new());
        assert_eq!(timers.advance(), vec!["keep"]);
        assert!(!timers.cancel(keep));
    }

    #[test]
    fn test_cancel_all_bumps_epoch() {
        let mut timers = TimerQueue::new();
        let stale = timers.schedule(5, 1);
        timers.schedule(1, 2);
        let epoch = timers.epoch();

        timers.cancel_all();
        assert_eq!(timers.epoch(), epoch + 1);
        assert!(timers.is_empty());
        for _ in 0..10 {
            assert!(timers.advance().is_empty());
        }

        // Stale handle from the old epoch cannot cancel new timers
        timers.schedule(5, 3);
        assert!(!timers.cancel(stale));
        assert_eq!(timers.len(), 1);
    }
}
