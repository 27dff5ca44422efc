//! Restartable delay used for search-as-you-type. Every keystroke reschedules
//! the pending run; only the most recently scheduled ticket may publish its
//! result.

use std::time::{Duration, Instant};

/// Identifies one scheduled run. Compare with [`Debouncer::is_current`] before
/// applying a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    generation: u64,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: 0,
            deadline: None,
        }
    }

    /// Cancel whatever is pending and schedule a new run at `now + window`.
    pub fn schedule(&mut self, now: Instant) -> Ticket {
        self.generation += 1;
        self.deadline = Some(now + self.window);
        Ticket(self.generation)
    }

    /// Drop the pending run, if any. Outstanding tickets become stale.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire the pending run once its deadline has passed. Each scheduled run
    /// fires at most once.
    pub fn poll(&mut self, now: Instant) -> Option<Ticket> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(Ticket(self.generation))
            }
            _ => None,
        }
    }

    /// Time left until the pending run is due. `None` when nothing is pending.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// True only for the ticket returned by the latest `schedule`, and only
    /// until the next `schedule` or `cancel`.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn fires_once_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let ticket = debouncer.schedule(start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(299)), None);
        assert_eq!(debouncer.poll(start + WINDOW), Some(ticket));
        assert_eq!(debouncer.poll(start + WINDOW * 2), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn each_keystroke_restarts_the_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.schedule(start);
        let later = start + Duration::from_millis(200);
        let second = debouncer.schedule(later);

        assert_eq!(debouncer.poll(start + WINDOW), None);
        assert_eq!(
            debouncer.time_until_due(start + WINDOW),
            Some(Duration::from_millis(200))
        );
        assert_eq!(debouncer.poll(later + WINDOW), Some(second));
    }

    #[test]
    fn superseded_tickets_are_stale() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let first = debouncer.schedule(start);
        let fired = debouncer.poll(start + WINDOW).unwrap();
        assert_eq!(fired, first);

        let second = debouncer.schedule(start + WINDOW);
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
    }

    #[test]
    fn cancel_drops_pending_run() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        let ticket = debouncer.schedule(start);
        debouncer.cancel();

        assert_eq!(debouncer.poll(start + WINDOW), None);
        assert_eq!(debouncer.time_until_due(start), None);
        assert!(!debouncer.is_current(ticket));
    }
}
