//! Progress/cancellation signal shared by one export workflow
//!
//! A single observable completion state. It starts pending, settles exactly
//! once (resolved or rejected), and doubles as the cooperative stop signal
//! handed to both pollers.

use crate::adapters::traits::StopPredicate;
use std::sync::Arc;
use tokio::sync::watch;

/// Completion state of a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    Pending,
    Resolved,
    Rejected,
}

impl SignalState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SignalState::Pending)
    }
}

/// Settle-once completion signal
///
/// Backed by a `watch` channel so any number of observers can read the
/// current state or wait for settlement. Writes after the first settlement
/// are no-ops.
#[derive(Debug, Clone)]
pub struct ExportSignal {
    tx: Arc<watch::Sender<SignalState>>,
}

impl ExportSignal {
    /// Creates a pending signal
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SignalState::Pending);
        Self { tx: Arc::new(tx) }
    }

    /// Current state
    pub fn state(&self) -> SignalState {
        *self.tx.borrow()
    }

    /// Whether the workflow is still undecided
    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    /// Settles as resolved; returns `false` if already settled
    pub fn resolve(&self) -> bool {
        self.settle(SignalState::Resolved)
    }

    /// Settles as rejected; returns `false` if already settled
    pub fn reject(&self) -> bool {
        self.settle(SignalState::Rejected)
    }

    /// Predicate that turns true the instant the signal leaves pending
    pub fn stop_predicate(&self) -> StopPredicate {
        let rx = self.tx.subscribe();
        Arc::new(move || !rx.borrow().is_pending())
    }

    /// Read-only view for observers outside the workflow
    pub fn subscribe(&self) -> watch::Receiver<SignalState> {
        self.tx.subscribe()
    }

    /// Waits until the signal is settled and returns the final state
    pub async fn settled(&self) -> SignalState {
        let mut rx = self.tx.subscribe();
        let settled = match rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => *state,
            // The sender lives in `self`, so the channel cannot close here
            Err(_) => self.state(),
        };
        settled
    }

    fn settle(&self, outcome: SignalState) -> bool {
        self.tx.send_if_modified(|state| {
            if state.is_pending() {
                *state = outcome;
                true
            } else {
                false
            }
        })
    }
}

impl Default for ExportSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_signal_starts_pending() {
        let signal = ExportSignal::new();
        assert!(signal.is_pending());
        assert!(!(signal.stop_predicate())());
    }

    #[test]
    fn test_signal_settles_once() {
        let signal = ExportSignal::new();

        assert!(signal.reject());
        assert!(!signal.resolve());
        assert!(!signal.reject());
        assert_eq!(signal.state(), SignalState::Rejected);
    }

    #[test]
    fn test_stop_predicate_follows_settlement() {
        let signal = ExportSignal::new();
        let stopped = signal.stop_predicate();

        assert!(!stopped());
        signal.resolve();
        assert!(stopped());
    }

    #[test]
    fn test_clones_share_state() {
        let signal = ExportSignal::new();
        let observer = signal.clone();

        signal.resolve();
        assert_eq!(observer.state(), SignalState::Resolved);
    }

    #[tokio::test]
    async fn test_settled_wakes_waiter() {
        let signal = ExportSignal::new();
        let settler = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            settler.reject();
        });

        assert_eq!(signal.settled().await, SignalState::Rejected);
    }

    #[tokio::test]
    async fn test_settled_returns_immediately_when_already_settled() {
        let signal = ExportSignal::new();
        signal.resolve();
        assert_eq!(signal.settled().await, SignalState::Resolved);
    }
}
