//! Bulk "resolve" for the selected events.
//!
//! One independent request per event, fired without waiting. Each outcome
//! comes back over a channel that the UI loop drains; a success unselects the
//! event, a failure leaves it selected and is kept per event for display.

use crate::selection::SelectionState;
use crate::sensu::SensuClient;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Something that can resolve a single event by id
pub trait EventResolver: Send + Sync + 'static {
    fn resolve(&self, id: &str) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl EventResolver for SensuClient {
    async fn resolve(&self, id: &str) -> anyhow::Result<()> {
        self.resolve_event(id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(String),
    Failed { id: String, error: String },
}

/// Spawn one resolve task per id. Returns immediately.
pub fn dispatch<R: EventResolver>(
    resolver: Arc<R>,
    ids: Vec<String>,
    tx: mpsc::Sender<ResolveOutcome>,
) {
    for id in ids {
        let resolver = Arc::clone(&resolver);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = match resolver.resolve(&id).await {
                Ok(()) => {
                    tracing::info!(event = %id, "event resolved");
                    ResolveOutcome::Resolved(id)
                }
                Err(e) => {
                    tracing::warn!(event = %id, error = %format!("{e:#}"), "resolve failed");
                    ResolveOutcome::Failed {
                        id,
                        error: format!("{e:#}"),
                    }
                }
            };
            let _ = tx.send(outcome).await;
        });
    }
}

/// Bookkeeping for the resolve requests in flight
#[derive(Debug, Default)]
pub struct ResolveProgress {
    pub pending: usize,
    /// Successes in the current batch
    pub resolved: usize,
    /// Failures in the current batch
    pub batch_failed: usize,
    /// Last error per event id, across batches
    pub failed: BTreeMap<String, String>,
}

impl ResolveProgress {
    pub fn start(&mut self, ids: &[String]) {
        if !self.is_running() {
            self.resolved = 0;
            self.batch_failed = 0;
        }
        self.pending += ids.len();
        for id in ids {
            self.failed.remove(id);
        }
    }

    /// Apply an outcome to the progress counters and the selection
    pub fn record(&mut self, outcome: ResolveOutcome, selection: &mut SelectionState) {
        self.pending = self.pending.saturating_sub(1);
        match outcome {
            ResolveOutcome::Resolved(id) => {
                selection.clear(&id);
                self.failed.remove(&id);
                self.resolved += 1;
            }
            ResolveOutcome::Failed { id, error } => {
                self.failed.insert(id, error);
                self.batch_failed += 1;
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending > 0
    }

    pub fn has_failed(&self, id: &str) -> bool {
        self.failed.contains_key(id)
    }

    /// Take the counters of a finished batch, keeping the failure map
    pub fn finish(&mut self) -> (usize, usize) {
        (
            std::mem::take(&mut self.resolved),
            std::mem::take(&mut self.batch_failed),
        )
    }

    pub fn forget(&mut self) {
        *self = Self::default();
    }
}

pub fn summary(resolved: usize, failed: usize) -> String {
    let plural = |n: usize| if n == 1 { "event" } else { "events" };
    if failed == 0 {
        format!("Resolved {resolved} {}", plural(resolved))
    } else {
        format!("Resolved {resolved} {}, {failed} failed (still selected)", plural(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct FakeResolver {
        broken: HashSet<String>,
    }

    impl EventResolver for FakeResolver {
        async fn resolve(&self, id: &str) -> anyhow::Result<()> {
            if self.broken.contains(id) {
                anyhow::bail!("backend refused {id}");
            }
            Ok(())
        }
    }

    async fn run_batch(ids: &[&str], broken: &[&str]) -> (SelectionState, ResolveProgress) {
        let resolver = Arc::new(FakeResolver {
            broken: broken.iter().map(|s| s.to_string()).collect(),
        });
        let mut selection = SelectionState::new();
        selection.toggle_all(ids.iter().copied());

        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        let mut progress = ResolveProgress::default();
        progress.start(&ids);

        let (tx, mut rx) = mpsc::channel(16);
        dispatch(resolver, ids, tx);

        while let Some(outcome) = rx.recv().await {
            progress.record(outcome, &mut selection);
        }
        (selection, progress)
    }

    #[tokio::test]
    async fn test_all_succeed_clears_selection() {
        let (selection, mut progress) = run_batch(&["a", "b", "c"], &[]).await;

        assert!(!selection.is_any_selected());
        assert!(!progress.is_running());
        assert_eq!(progress.finish(), (3, 0));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_failed_selected() {
        let (selection, mut progress) = run_batch(&["a", "b", "c"], &["b"]).await;

        assert_eq!(selection.selected(), vec!["b"]);
        assert!(progress.has_failed("b"));
        assert!(progress.failed["b"].contains("backend refused b"));
        assert_eq!(progress.finish(), (2, 1));
    }

    #[test]
    fn test_retry_clears_previous_failure() {
        let mut selection = SelectionState::new();
        selection.toggle_one("a");
        let mut progress = ResolveProgress::default();
        progress.start(&["a".to_string()]);
        progress.record(
            ResolveOutcome::Failed { id: "a".into(), error: "timeout".into() },
            &mut selection,
        );
        assert!(progress.has_failed("a"));

        progress.start(&["a".to_string()]);
        assert!(!progress.has_failed("a"));
        progress.record(ResolveOutcome::Resolved("a".into()), &mut selection);
        assert!(!selection.is_selected("a"));
    }

    #[test]
    fn test_earlier_failure_not_counted_in_next_batch() {
        let mut selection = SelectionState::new();
        let mut progress = ResolveProgress::default();

        selection.toggle_one("e1");
        progress.start(&["e1".to_string()]);
        progress.record(
            ResolveOutcome::Failed { id: "e1".into(), error: "timeout".into() },
            &mut selection,
        );
        assert_eq!(progress.finish(), (0, 1));

        selection.reset();
        selection.toggle_one("e2");
        progress.start(&["e2".to_string()]);
        progress.record(ResolveOutcome::Resolved("e2".into()), &mut selection);

        assert_eq!(progress.finish(), (1, 0));
        assert!(progress.has_failed("e1"), "Row marker survives");
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary(1, 0), "Resolved 1 event");
        assert_eq!(summary(2, 1), "Resolved 2 events, 1 failed (still selected)");
    }
}
