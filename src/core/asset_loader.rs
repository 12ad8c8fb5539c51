use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::future::{AbortHandle, Abortable, BoxFuture, FutureExt};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::error::LoadError;
use crate::loaders::AssetSource;
use crate::types::GeometryDescription;

enum LoadMessage {
    Progress(f32),
    Finished(Result<GeometryDescription, LoadError>),
}

/// Message from a load task, tagged with the attempt it belongs to
struct Envelope {
    seq: u64,
    message: LoadMessage,
}

/// Outcome of the current load attempt, as seen on the frame thread
#[derive(Debug)]
pub enum LoadEvent {
    Progress(f32),
    Loaded(GeometryDescription),
    Failed(LoadError),
}

/// Progress sink handed to an [`AssetSource`]
///
/// Values are clamped to `[0, 1]` and only forwarded when they increase, so
/// the owner sees a non-decreasing sequence within one load.
pub struct ProgressReporter {
    seq: u64,
    last: f32,
    tx: UnboundedSender<Envelope>,
}

impl ProgressReporter {
    fn new(seq: u64, tx: UnboundedSender<Envelope>) -> Self {
        Self { seq, last: 0.0, tx }
    }

    /// A reporter whose reports go nowhere, for driving sources directly
    pub fn detached() -> Self {
        let (tx, _rx) = unbounded();
        Self::new(0, tx)
    }

    pub fn report(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        if !(fraction > self.last) {
            return;
        }
        self.last = fraction;
        // The receiver is gone once the viewer is torn down
        let _ = self.tx.unbounded_send(Envelope {
            seq: self.seq,
            message: LoadMessage::Progress(fraction),
        });
    }

    pub fn report_bytes(&mut self, loaded: u64, total: u64) {
        if total == 0 {
            return;
        }
        self.report(loaded as f32 / total as f32);
    }

    pub fn last(&self) -> f32 {
        self.last
    }

    /// True once the owning loader is gone; long-running sources may stop early
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Future the host spawns to run one load attempt
///
/// Resolves to `()`; the result travels back over the loader's channel and is
/// picked up by [`AssetLoader::poll_events`] on the frame thread.
pub struct LoadTask {
    seq: u64,
    future: BoxFuture<'static, ()>,
}

impl LoadTask {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl Future for LoadTask {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.future.poll_unpin(cx)
    }
}

struct ActiveLoad {
    seq: u64,
    url: String,
    abort: AbortHandle,
    finished: bool,
}

/// Runs at most one asset load at a time for its owner
///
/// Each attempt gets a fresh sequence number. Starting a new load aborts the
/// previous one, and any message still queued from an older attempt is
/// dropped when the events are drained.
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    next_seq: u64,
    active: Option<ActiveLoad>,
    tx: UnboundedSender<Envelope>,
    rx: UnboundedReceiver<Envelope>,
}

impl AssetLoader {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            source,
            next_seq: 0,
            active: None,
            tx,
            rx,
        }
    }

    /// Starts loading `url`, cancelling whatever was in flight
    pub fn begin_load(&mut self, url: &str) -> LoadTask {
        self.cancel();

        self.next_seq += 1;
        let seq = self.next_seq;
        log::info!("Loading model #{}: {}", seq, url);

        let fetch = self.source.fetch(url, ProgressReporter::new(seq, self.tx.clone()));
        let tx = self.tx.clone();
        let work = async move {
            let result = fetch.await;
            let _ = tx.unbounded_send(Envelope {
                seq,
                message: LoadMessage::Finished(result),
            });
        };

        let (abort, registration) = AbortHandle::new_pair();
        let future = Abortable::new(work, registration)
            .map(move |outcome| {
                if outcome.is_err() {
                    log::debug!("Load #{} aborted", seq);
                }
            })
            .boxed();

        self.active = Some(ActiveLoad {
            seq,
            url: url.to_string(),
            abort,
            finished: false,
        });

        LoadTask { seq, future }
    }

    /// Aborts the in-flight load, if any. Returns true if one was aborted.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(active) if !active.finished => {
                active.abort.abort();
                log::debug!("Cancelled load #{} ({})", active.seq, active.url);
                true
            }
            _ => false,
        }
    }

    /// Sequence number of the most recent attempt that was not cancelled
    pub fn current_seq(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.seq)
    }

    pub fn current_url(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.url.as_str())
    }

    pub fn is_in_flight(&self) -> bool {
        self.active.as_ref().is_some_and(|a| !a.finished)
    }

    /// Drains queued messages, keeping only those of the current attempt
    pub fn poll_events(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();

        while let Ok(Some(envelope)) = self.rx.try_next() {
            let active = match self.active.as_mut() {
                Some(active) if active.seq == envelope.seq && !active.finished => active,
                _ => {
                    log::debug!("Discarding stale message from load #{}", envelope.seq);
                    continue;
                }
            };

            match envelope.message {
                LoadMessage::Progress(fraction) => events.push(LoadEvent::Progress(fraction)),
                LoadMessage::Finished(result) => {
                    active.finished = true;
                    events.push(match result {
                        Ok(geometry) => LoadEvent::Loaded(geometry),
                        Err(err) => LoadEvent::Failed(err),
                    });
                }
            }
        }

        events
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::LocalPool;
    use futures::task::SpawnExt;
    use std::sync::Mutex;

    /// Source whose loads complete when the test says so
    #[derive(Default)]
    struct Gate {
        pending: Mutex<Vec<(String, oneshot::Sender<Result<GeometryDescription, LoadError>>)>>,
    }

    impl Gate {
        fn resolve(&self, url: &str, result: Result<GeometryDescription, LoadError>) {
            let mut pending = self.pending.lock().unwrap();
            let index = pending.iter().position(|(u, _)| u == url).unwrap();
            let (_, tx) = pending.remove(index);
            let _ = tx.send(result);
        }
    }

    impl AssetSource for Gate {
        fn fetch(
            &self,
            url: &str,
            _progress: ProgressReporter,
        ) -> BoxFuture<'static, Result<GeometryDescription, LoadError>> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push((url.to_string(), tx));
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(LoadError::UnsupportedLocation("dropped".into())))
            }
            .boxed()
        }
    }

    #[test]
    fn sequence_numbers_increase() {
        let mut loader = AssetLoader::new(Arc::new(Gate::default()));
        let a = loader.begin_load("a");
        let b = loader.begin_load("b");

        assert!(b.seq() > a.seq());
        assert_eq!(loader.current_seq(), Some(b.seq()));
        assert_eq!(loader.current_url(), Some("b"));
    }

    #[test]
    fn finished_load_is_reported_once() {
        let gate = Arc::new(Gate::default());
        let mut loader = AssetLoader::new(gate.clone());
        let mut pool = LocalPool::new();

        pool.spawner().spawn(loader.begin_load("a")).unwrap();
        pool.run_until_stalled();
        assert!(loader.is_in_flight());

        gate.resolve("a", Ok(GeometryDescription::default()));
        pool.run_until_stalled();

        let events = loader.poll_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LoadEvent::Loaded(_)));
        assert!(!loader.is_in_flight());
        assert!(loader.poll_events().is_empty());
    }

    #[test]
    fn cancel_aborts_task() {
        let gate = Arc::new(Gate::default());
        let mut loader = AssetLoader::new(gate.clone());
        let mut pool = LocalPool::new();

        pool.spawner().spawn(loader.begin_load("a")).unwrap();
        pool.run_until_stalled();

        assert!(loader.cancel());
        assert!(!loader.cancel());
        // Aborted task completes without ever producing a message
        pool.run();
        assert!(loader.poll_events().is_empty());
        assert_eq!(loader.current_seq(), None);
    }

    #[test]
    fn reporter_is_monotonic_and_clamped() {
        let (tx, mut rx) = unbounded();
        let mut reporter = ProgressReporter::new(1, tx);

        reporter.report(0.25);
        reporter.report(0.1);
        reporter.report(f32::NAN);
        reporter.report(3.0);
        reporter.report_bytes(5, 0);

        let mut seen = Vec::new();
        while let Ok(Some(envelope)) = rx.try_next() {
            if let LoadMessage::Progress(f) = envelope.message {
                seen.push(f);
            }
        }
        assert_eq!(seen, vec![0.25, 1.0]);
        assert_eq!(reporter.last(), 1.0);
    }

    #[test]
    fn reporter_sees_loader_teardown() {
        let mut loader = AssetLoader::new(Arc::new(Gate::default()));
        let task = loader.begin_load("a");
        let reporter = ProgressReporter::new(task.seq(), loader.tx.clone());

        assert!(!reporter.is_closed());
        drop(loader);
        assert!(reporter.is_closed());
        assert!(ProgressReporter::detached().is_closed());
    }
}
