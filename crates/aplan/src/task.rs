//! Background runs: one worker thread per detection, progress streamed over a channel.
//!
//! A handle receives `Event::Progress` records as they happen and exactly one
//! `Event::Done(outcome)` at the end. Cancellation is cooperative through the handle's
//! `CancelToken`; the worker stops at its next poll point and reports `Outcome::Aborted`.

use std::sync::mpsc::{channel, Receiver, TryIter};
use std::thread::{self, JoinHandle};

use crate::config::ConnectionConfig;
use crate::connection::detect_connections;
use crate::error::Error;
use crate::geom::GeometryQuery;
use crate::graph::ConnectionGraph;
use crate::obstruction::{ObstructionReport, ObstructionRequest};
use crate::progress::{CancelToken, Outcome, Progress, Reporter};

#[derive(Debug)]
pub enum Event<T> {
    Progress(Progress),
    Done(Outcome<T>),
}

#[derive(Debug)]
pub struct TaskHandle<T> {
    cancel: CancelToken,
    events: Receiver<Event<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T> TaskHandle<T> {
    /// Ask the worker to stop at its next poll point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Events received so far, without blocking.
    pub fn try_events(&self) -> TryIter<'_, Event<T>> {
        self.events.try_iter()
    }

    /// Block until the worker is done; progress records are passed to `on_progress`.
    pub fn wait_with(mut self, mut on_progress: impl FnMut(Progress)) -> Outcome<T> {
        let mut done = None;
        for ev in self.events.iter() {
            match ev {
                Event::Progress(p) => on_progress(p),
                Event::Done(o) => {
                    done = Some(o);
                    break;
                }
            }
        }
        let joined = self.worker.take().map(JoinHandle::join);
        match (done, joined) {
            (Some(o), _) => o,
            (None, Some(Err(_))) => Outcome::Errored(Error::Worker("worker panicked".into())),
            (None, _) => Outcome::Errored(Error::Worker("worker exited without a result".into())),
        }
    }

    pub fn wait(self) -> Outcome<T> {
        self.wait_with(|_| {})
    }
}

/// Run `job` on a worker thread.
pub fn spawn<T, F>(job: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&CancelToken, &Reporter) -> Outcome<T> + Send + 'static,
{
    let cancel = CancelToken::new();
    let (tx, rx) = channel();
    let progress_tx = tx.clone();
    let reporter = Reporter::with_sink(move |p| {
        let _ = progress_tx.send(Event::Progress(p));
    });
    let token = cancel.clone();
    let spawned = thread::Builder::new()
        .name("aplan-worker".into())
        .spawn(move || {
            let out = job(&token, &reporter);
            let _ = tx.send(Event::Done(out));
        });
    let worker = match spawned {
        Ok(h) => Some(h),
        Err(e) => {
            tracing::error!(error = %e, "could not start worker thread");
            None
        }
    };
    TaskHandle {
        cancel,
        events: rx,
        worker,
    }
}

/// Connection detection on a worker thread that owns `scene`.
pub fn spawn_connections<S>(
    mut scene: S,
    components: Vec<String>,
    cfg: ConnectionConfig,
) -> TaskHandle<ConnectionGraph>
where
    S: GeometryQuery + Send + 'static,
{
    spawn(move |cancel, reporter| detect_connections(&mut scene, &components, &cfg, cancel, reporter))
}

/// Obstruction detection on a worker thread that owns `scene`.
pub fn spawn_obstructions<S>(mut scene: S, req: ObstructionRequest) -> TaskHandle<ObstructionReport>
where
    S: GeometryQuery + Clone + Send + 'static,
{
    spawn(move |cancel, reporter| req.run(&mut scene, cancel, reporter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Criterion, ObstructionConfig, ObstructionRefinement, StepCfg};
    use crate::geom::MotionDirection;
    use crate::progress::Severity;
    use crate::testutil::{labels, line_scene};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn connections_stream_progress_then_finish() {
        let handle = spawn_connections(
            line_scene(),
            labels(&["A", "B", "C"]),
            ConnectionConfig::default(),
        );
        let mut seen = Vec::new();
        let out = handle.wait_with(|p| seen.push(p));
        let g = out.finished().unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(seen.first().unwrap().message, ">>> STARTED");
        assert_eq!(seen.last().unwrap().message, ">>> FINISHED");
        assert!(seen.iter().any(|p| p.severity == Severity::Focus && p.message.contains("Solving")));
    }

    #[test]
    fn obstructions_run_in_the_background() {
        let cfg = ObstructionConfig {
            refinement: ObstructionRefinement::BoundBox,
            criterion: Criterion::Common {
                overlap_tolerance: 1e-5,
                volume_tolerance: 1e-5,
            },
            step: StepCfg::Fixed { step: 0.25 },
            ..ObstructionConfig::default()
        };
        let req = ObstructionRequest::new(
            labels(&["A", "B", "C"]),
            vec![MotionDirection::PosX, MotionDirection::NegX],
            cfg,
        );
        let report = spawn_obstructions(line_scene(), req).wait().finished().unwrap();
        assert!(report.graph(MotionDirection::NegX).unwrap().contains_edge("C", "B"));
    }

    #[test]
    fn cancelled_job_reports_aborted() {
        let (go_tx, go_rx) = mpsc::channel::<()>();
        let handle = spawn(move |cancel, reporter| {
            reporter.focus(">>> STARTED");
            // wait until the test has cancelled
            let _ = go_rx.recv_timeout(Duration::from_secs(5));
            if cancel.is_cancelled() {
                return reporter.conclude(Outcome::<()>::Aborted);
            }
            reporter.conclude(Outcome::Finished(()))
        });
        handle.cancel();
        go_tx.send(()).unwrap();
        assert_eq!(handle.wait(), Outcome::Aborted);
    }

    #[test]
    fn panicking_job_is_a_worker_error() {
        let handle = spawn(|_, _| -> Outcome<()> { panic!("boom") });
        assert!(matches!(handle.wait(), Outcome::Errored(Error::Worker(_))));
    }
}
