use std::collections::BTreeSet;

/// Identifies one running repeating task.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickHandle(pub u64);

/// Cancellable repeating task supplied by the host.
///
/// After `start`, the host calls back into its owner every `period_ms` with the
/// returned handle until `stop` is called for it.
pub trait Ticker {
    fn start(&mut self, period_ms: u32) -> TickHandle;
    fn stop(&mut self, handle: TickHandle);
}

/// Deterministic ticker for tests and hosts that drive ticks from their own loop.
///
/// It only tracks which handles are running; the caller decides when a tick
/// happens.
#[derive(Debug, Default)]
pub struct ManualTicker {
    next: u64,
    running: BTreeSet<TickHandle>,
    last_period_ms: Option<u32>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }

    pub fn is_running(&self, handle: TickHandle) -> bool {
        self.running.contains(&handle)
    }

    pub fn last_period_ms(&self) -> Option<u32> {
        self.last_period_ms
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, period_ms: u32) -> TickHandle {
        self.next += 1;
        let handle = TickHandle(self.next);
        self.running.insert(handle);
        self.last_period_ms = Some(period_ms);
        handle
    }

    fn stop(&mut self, handle: TickHandle) {
        self.running.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::{ManualTicker, Ticker};

    #[test]
    fn handles_are_unique_and_stoppable() {
        let mut t = ManualTicker::new();
        let a = t.start(33);
        let b = t.start(33);
        assert_ne!(a, b);
        assert_eq!(t.running_count(), 2);
        t.stop(a);
        assert!(!t.is_running(a));
        assert!(t.is_running(b));
        assert_eq!(t.last_period_ms(), Some(33));
    }

    #[test]
    fn stopping_twice_is_harmless() {
        let mut t = ManualTicker::new();
        let a = t.start(10);
        t.stop(a);
        t.stop(a);
        assert_eq!(t.running_count(), 0);
    }
}
