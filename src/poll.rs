//! Polling/refresh controller.
//!
//! One [`Poller`] per mounted view, with an explicit lifecycle:
//! create -> start -> stop -> dispose (drop). The controller is the only
//! writer of its [`PollState`]; renderers read snapshots.
//!
//! Contracts:
//! - At most one request in flight per controller. A timer tick that fires
//!   while a request is outstanding is skipped, not queued.
//! - Every issued fetch carries a monotonically increasing sequence number;
//!   a completion whose sequence is no longer the latest issued is dropped.
//!   `stop()` bumps the sequence, so a late-arriving response after teardown
//!   cannot write into the state.
//! - `set_interval` re-arms the timer through a watch channel; the old sleep
//!   future is dropped in the same select, so two armed timers never coexist.
//! - A failed fetch records the error message and leaves prior data intact.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::logging::{json_log, obj, v_num, v_str};

/// Latest completed fetch, as seen by renderers. At most one of `data` and
/// `error` describes the most recent completion; an error never blanks data
/// from an earlier success.
#[derive(Clone, Debug, Default)]
pub struct PollState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
}

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// Shared fetch function: called once per tick or manual trigger.
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<T> + Send + Sync>;

/// Wrap an async closure into a [`Fetcher`].
pub fn fetcher<T, F, Fut>(f: F) -> Fetcher<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    Arc::new(move || Box::pin(f()))
}

struct Shared<T> {
    state: Mutex<PollState<T>>,
    /// Sequence of the most recently issued fetch. Bumped on issue and on
    /// stop; completions compare against it to detect staleness.
    issued: AtomicU64,
    in_flight: AtomicBool,
}

impl<T> Shared<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(PollState { data: None, error: None, is_loading: false }),
            issued: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Claim the in-flight slot and issue a sequence number, or None if a
    /// request is already outstanding.
    fn begin(&self) -> Option<u64> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().expect("poll state lock").is_loading = true;
        Some(seq)
    }

    fn complete(&self, seq: u64, out: anyhow::Result<T>) {
        self.in_flight.store(false, Ordering::SeqCst);
        if self.issued.load(Ordering::SeqCst) != seq {
            json_log("poller", obj(&[("event", v_str("stale_dropped")), ("seq", v_num(seq as f64))]));
            return;
        }
        let mut state = self.state.lock().expect("poll state lock");
        state.is_loading = false;
        match out {
            Ok(value) => {
                state.data = Some(value);
                state.error = None;
            }
            Err(err) => {
                state.error = Some(format!("{:#}", err));
            }
        }
    }

    /// Release the in-flight slot without touching the state (teardown path).
    fn abandon(&self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Resolves once the stop signal is raised or the controller is disposed.
async fn stopped(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

pub struct Poller<T> {
    shared: Arc<Shared<T>>,
    fetch: Fetcher<T>,
    interval_tx: Option<watch::Sender<Duration>>,
    stop_tx: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + 'static> Poller<T> {
    pub fn new(fetch: Fetcher<T>) -> Self {
        Self {
            shared: Arc::new(Shared::new()),
            fetch,
            interval_tx: None,
            stop_tx: None,
            task: None,
        }
    }

    /// Snapshot of the latest state for rendering.
    pub fn state(&self) -> PollState<T> {
        self.shared.state.lock().expect("poll state lock").clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Arm the timer. A running controller is re-armed from scratch, matching
    /// the "stop before start" discipline of the refresh toggle.
    pub fn start(&mut self, every: Duration) {
        self.stop();
        let (interval_tx, mut interval_rx) = watch::channel(every);
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let shared = self.shared.clone();
        let fetch = self.fetch.clone();
        let task = tokio::spawn(async move {
            loop {
                let every = *interval_rx.borrow();
                tokio::select! {
                    _ = sleep(every) => {}
                    _ = stopped(&mut stop_rx) => break,
                    changed = interval_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        // Re-arm with the new interval; the old sleep future
                        // was dropped by this select.
                        continue;
                    }
                }
                let Some(seq) = shared.begin() else {
                    json_log("poller", obj(&[("event", v_str("tick_skipped"))]));
                    continue;
                };
                tokio::select! {
                    out = fetch() => shared.complete(seq, out),
                    _ = stopped(&mut stop_rx) => {
                        shared.abandon();
                        break;
                    }
                }
            }
        });
        self.interval_tx = Some(interval_tx);
        self.stop_tx = Some(stop_tx);
        self.task = Some(task);
        json_log(
            "poller",
            obj(&[("event", v_str("started")), ("interval_ms", v_num(every.as_millis() as f64))]),
        );
    }

    /// Change the refresh rate of a running controller; a no-op timer-wise
    /// when idle (the new rate applies at the next `start`).
    pub fn set_interval(&mut self, every: Duration) {
        if let Some(tx) = &self.interval_tx {
            let _ = tx.send(every);
            json_log(
                "poller",
                obj(&[
                    ("event", v_str("interval_changed")),
                    ("interval_ms", v_num(every.as_millis() as f64)),
                ]),
            );
        }
    }

    /// Cancel the timer and stale-out any outstanding request. Idempotent;
    /// the controller may be started again afterwards.
    pub fn stop(&mut self) {
        if self.task.is_none() {
            return;
        }
        // Anything issued before this point now fails the staleness check.
        self.shared.issued.fetch_add(1, Ordering::SeqCst);
        self.shared.state.lock().expect("poll state lock").is_loading = false;
        self.shared.abandon();
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(true);
        }
        self.interval_tx = None;
        self.task = None;
        json_log("poller", obj(&[("event", v_str("stopped"))]));
    }

    /// One-shot manual trigger (the "Run" button path). Bypasses the timer but
    /// honors the at-most-one-in-flight invariant: returns false without
    /// fetching if a request is already outstanding.
    pub async fn run_once(&self) -> bool {
        let Some(seq) = self.shared.begin() else {
            json_log("poller", obj(&[("event", v_str("manual_skipped"))]));
            return false;
        };
        let out = (self.fetch)().await;
        self.shared.complete(seq, out);
        true
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        // Dispose: raise the stop signal and stale-out in-flight work even if
        // the owner never called stop().
        self.shared.issued.fetch_add(1, Ordering::SeqCst);
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn counting_fetcher(calls: Arc<AtomicU32>) -> Fetcher<u32> {
        fetcher(move || {
            let calls = calls.clone();
            async move { Ok(calls.fetch_add(1, Ordering::SeqCst) + 1) }
        })
    }

    #[tokio::test]
    async fn run_once_updates_state() {
        let calls = Arc::new(AtomicU32::new(0));
        let p = Poller::new(counting_fetcher(calls.clone()));
        assert!(p.run_once().await);
        let st = p.state();
        assert_eq!(st.data, Some(1));
        assert_eq!(st.error, None);
        assert!(!st.is_loading);
    }

    #[tokio::test]
    async fn error_keeps_prior_data() {
        let fail = Arc::new(AtomicBool::new(false));
        let fail2 = fail.clone();
        let p = Poller::new(fetcher(move || {
            let fail = fail2.clone();
            async move {
                if fail.load(Ordering::SeqCst) {
                    anyhow::bail!("HTTP 500: Internal Server Error");
                }
                Ok(7u32)
            }
        }));
        assert!(p.run_once().await);
        fail.store(true, Ordering::SeqCst);
        assert!(p.run_once().await);
        let st = p.state();
        assert_eq!(st.data, Some(7), "error must not blank prior data");
        let msg = st.error.expect("error recorded");
        assert!(!msg.is_empty());
        assert!(msg.contains("500"));
    }

    #[tokio::test]
    async fn begin_rejects_second_claim() {
        let shared: Shared<u32> = Shared::new();
        let first = shared.begin().unwrap();
        assert!(shared.begin().is_none(), "in-flight slot must be exclusive");
        shared.complete(first, Ok(1));
        assert!(shared.begin().is_some(), "slot frees after completion");
    }

    #[tokio::test]
    async fn stale_completion_is_dropped() {
        let shared: Shared<u32> = Shared::new();
        let seq = shared.begin().unwrap();
        // Teardown bumps the issued counter before the response lands.
        shared.issued.fetch_add(1, Ordering::SeqCst);
        shared.complete(seq, Ok(99));
        assert_eq!(shared.state.lock().unwrap().data, None);
    }
}
