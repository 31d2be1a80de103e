use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Host-side cancellation flag, checked once per subject.
///
/// Clones share the flag and any check budget.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    checks_left: Option<Arc<AtomicUsize>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that cancels itself once `checks` checks have passed.
    pub fn with_check_limit(checks: usize) -> Self {
        Self {
            cancelled: Arc::default(),
            checks_left: Some(Arc::new(AtomicUsize::new(checks))),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.load(Ordering::Acquire) {
            return true;
        }
        if let Some(left) = &self.checks_left {
            let spent = left
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
                .is_err();
            if spent {
                self.cancel();
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancellationToken::new();
        let host = token.clone();
        assert!(!token.is_cancelled());
        host.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_check_limit_trips() {
        let token = CancellationToken::with_check_limit(2);
        let host = token.clone();
        assert!(!token.is_cancelled());
        assert!(!host.is_cancelled());
        assert!(token.is_cancelled());
        assert!(host.is_cancelled());
    }
}
