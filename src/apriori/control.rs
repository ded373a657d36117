use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative cancellation signal for a mining run.
///
/// Cheap to clone and share across threads; the miner checks it at level
/// barriers, so a cancelled run stops before starting the next level rather
/// than mid-count.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that trips automatically once `timeout` has elapsed.
    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            inner: Arc::new(CancelInner {
                cancelled: AtomicBool::new(false),
                deadline: Some(Instant::now() + timeout),
            }),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        match self.inner.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

/// Structured observability hook invoked from the mining loop. All methods
/// default to no-ops; implement the ones you care about.
pub trait MiningObserver {
    /// Called after each level is filtered: level index, candidates
    /// counted, candidates retained as frequent.
    fn on_level(&self, _k: usize, _candidates: usize, _frequent: usize) {}

    /// Called once after rule derivation with the number of rules emitted.
    fn on_rules(&self, _count: usize) {}
}

/// Per-call options for [`Apriori::mine_with`](super::Apriori::mine_with).
#[derive(Default)]
pub struct MineOptions<'a> {
    pub(crate) cancel: Option<&'a CancelToken>,
    pub(crate) observer: Option<&'a dyn MiningObserver>,
}

impl<'a> MineOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, token: &'a CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn MiningObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }

    pub(crate) fn notify_level(&self, k: usize, candidates: usize, frequent: usize) {
        if let Some(observer) = self.observer {
            observer.on_level(k, candidates, frequent);
        }
    }

    pub(crate) fn notify_rules(&self, count: usize) {
        if let Some(observer) = self.observer {
            observer.on_rules(count);
        }
    }
}
