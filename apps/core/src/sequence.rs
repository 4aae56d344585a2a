use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct SearchSequence {
    latest: AtomicU64,
}

impl SearchSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_ticket(self: &Arc<Self>) -> SearchTicket {
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            tracker: Arc::clone(self),
            sequence,
        }
    }

    pub fn cancel_all(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct SearchTicket {
    tracker: Arc<SearchSequence>,
    sequence: u64,
}

impl SearchTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_current(&self) -> bool {
        self.tracker.latest() == self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let sequence = Arc::new(SearchSequence::new());
        let first = sequence.next_ticket();
        assert!(first.is_current());

        let second = sequence.next_ticket();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.sequence() > first.sequence());
    }

    #[test]
    fn cancel_all_invalidates_outstanding_tickets() {
        let sequence = Arc::new(SearchSequence::new());
        let ticket = sequence.next_ticket();
        sequence.cancel_all();
        assert!(!ticket.is_current());
    }
}
