//! Trailing-edge debounce over a tokio timer task.
//!
//! Each `call` aborts the pending timer and schedules a fresh one, so the
//! callback only ever sees the argument of the latest call, `delay` after it.
//! Dropping the debouncer aborts whatever is still pending.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::AbortHandle;

pub struct Debouncer<T> {
    delay: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<AbortHandle>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    /// Reschedule the callback for `arg`. Must run inside a tokio runtime.
    pub fn call(&mut self, arg: T) {
        self.cancel();
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(arg);
        });
        self.pending = Some(task.abort_handle());
    }

    /// Drop the pending invocation, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn recording(delay_ms: u64) -> (Debouncer<String>, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move |q: String| {
            let _ = tx.send(q);
        });
        (debouncer, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_call_fires() {
        let (mut debouncer, mut rx) = recording(500);

        debouncer.call("x".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.call("xy".to_string());
        tokio::time::sleep(Duration::from_millis(400)).await;
        // 500ms after the first call, but only 400ms after the second.
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(rx.try_recv().unwrap(), "xy");
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_fire() {
        let (mut debouncer, mut rx) = recording(50);

        debouncer.call("a".to_string());
        tokio::time::sleep(Duration::from_millis(60)).await;
        debouncer.call("b".to_string());
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(rx.try_recv().unwrap(), "a");
        assert_eq!(rx.try_recv().unwrap(), "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_abort_pending() {
        let (mut debouncer, mut rx) = recording(50);
        debouncer.call("cancelled".to_string());
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        debouncer.call("dropped".to_string());
        drop(debouncer);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }
}
