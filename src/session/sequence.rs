use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one issued correction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

/// Hands out monotonically increasing tickets. Only the newest ticket's
/// response may be applied; anything older is discarded on arrival.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let sequencer = RequestSequencer::new();
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[test]
    fn test_clones_share_counter() {
        let sequencer = RequestSequencer::new();
        let shared = sequencer.clone();
        let ticket = sequencer.issue();
        let newer = shared.issue();

        assert!(!sequencer.is_current(ticket));
        assert!(sequencer.is_current(newer));
    }

    #[tokio::test]
    async fn test_out_of_order_responses_keep_latest() {
        let sequencer = RequestSequencer::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let slow = sequencer.issue();
        let fast = sequencer.issue();
        // The newer request answers first, the stale one arrives afterwards.
        tx.send((fast, "new")).unwrap();
        tx.send((slow, "old")).unwrap();
        drop(tx);

        let mut applied = Vec::new();
        while let Some((ticket, body)) = rx.recv().await {
            if sequencer.is_current(ticket) {
                applied.push(body);
            }
        }
        assert_eq!(applied, vec!["new"]);
    }
}
