//! Shared plumbing for long-lived watchers.

use tokio::sync::watch;

/// Latest value of something observed remotely.
///
/// Push handlers and poll timers both go through [`LiveValue::update`], so
/// readers cannot tell which source produced a value.
#[derive(Debug)]
pub struct LiveValue<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> LiveValue<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Last write wins.
    pub fn update(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// `f` returns whether it changed anything; readers are woken only if so.
    pub fn modify_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for LiveValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Owner side of a teardown signal. Dropping it also tears down.
#[derive(Debug)]
pub struct Teardown {
    tx: watch::Sender<bool>,
}

/// Watcher side of a teardown signal.
#[derive(Debug, Clone)]
pub struct TeardownSignal {
    rx: watch::Receiver<bool>,
}

impl Teardown {
    pub fn new() -> (Self, TeardownSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, TeardownSignal { rx })
    }

    pub fn signal(&self) {
        self.tx.send_replace(true);
    }
}

impl TeardownSignal {
    pub fn is_signalled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolves once the owner signals or goes away.
    pub async fn signalled(&mut self) {
        let _ = self.rx.wait_for(|down| *down).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let live = LiveValue::new(0u64);
        let rx = live.subscribe();
        live.update(3);
        live.update(5);
        assert_eq!(live.get(), 5);
        assert_eq!(*rx.borrow(), 5);
    }

    #[tokio::test]
    async fn dropping_the_owner_counts_as_teardown() {
        let (teardown, mut signal) = Teardown::new();
        assert!(!signal.is_signalled());
        drop(teardown);
        assert!(signal.is_signalled());
        signal.signalled().await;
    }

    #[tokio::test]
    async fn explicit_signal() {
        let (teardown, mut signal) = Teardown::new();
        let waiter = tokio::spawn(async move { signal.signalled().await });
        teardown.signal();
        waiter.await.unwrap();
    }
}
