//! Job Progress Tracker
//!
//! Observes the shared [`JobBoard`] and keeps exactly one polling task per
//! downloading job. Every change to the board triggers a re-diff:
//!
//! - `to_start`: active jobs without a running timer
//! - `to_stop`: timers whose job is terminal or gone from the board
//!
//! Stopping a timer for a `completed` job issues one catalog refresh, which
//! also re-seeds the board with downloads the server still reports as in
//! flight.

use crate::config::TrackerParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::job_api::{JobApiError, JobCatalog, JobStatusSource};
use crate::ports::job_progress::{JobProgressNotifier, NoJobProgress};
use assist_domain::{CatalogEntry, JobBoard, JobHandle, JobId, JobStatus};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The job collection shared between the tracker, job commands and the UI.
///
/// All writes go through `send_modify`/`send_if_modified`, which also wakes
/// every subscriber.
pub type SharedJobBoard = Arc<watch::Sender<JobBoard>>;

/// Create an empty shared board.
pub fn new_job_board() -> SharedJobBoard {
    let (tx, _rx) = watch::channel(JobBoard::new());
    Arc::new(tx)
}

/// Errors that can occur while tracking jobs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Catalog refresh failed: {0}")]
    Catalog(#[from] JobApiError),
}

/// Fetch the catalog and resume tracking of entries the server reports as
/// downloading.
///
/// Entries already terminal on the board are left alone.
pub async fn refresh_catalog<C>(
    catalog: &C,
    board: &watch::Sender<JobBoard>,
) -> Result<Vec<CatalogEntry>, JobApiError>
where
    C: JobCatalog + ?Sized,
{
    let entries = catalog.fetch_catalog().await?;
    board.send_if_modified(|board| {
        let mut modified = false;
        for entry in &entries {
            let Some(snapshot) = entry.active_download() else {
                continue;
            };
            let locally_terminal = board
                .get(entry.id())
                .is_some_and(|h| h.status.is_terminal());
            if locally_terminal {
                continue;
            }
            let before = board.get(entry.id()).cloned();
            board.resume(entry.id().clone(), snapshot.clone());
            modified |= board.get(entry.id()) != before.as_ref();
        }
        modified
    });
    debug!(entries = entries.len(), "Catalog refreshed");
    Ok(entries)
}

/// What one re-diff did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub started: Vec<JobId>,
    pub stopped: Vec<JobId>,
    pub refreshes: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.started.is_empty() && self.stopped.is_empty() && self.refreshes == 0
    }
}

struct PollTimer {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollTimer {
    fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Everything a polling task needs, cloned per job.
struct PollContext<S: JobStatusSource + 'static> {
    board: SharedJobBoard,
    source: Arc<S>,
    notifier: Arc<dyn JobProgressNotifier>,
    params: TrackerParams,
}

/// Tracks the progress of every downloading job on a [`SharedJobBoard`].
pub struct JobProgressTracker<S, C>
where
    S: JobStatusSource + 'static,
    C: JobCatalog + 'static,
{
    board: SharedJobBoard,
    source: Arc<S>,
    catalog: Arc<C>,
    params: TrackerParams,
    notifier: Arc<dyn JobProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    timers: HashMap<JobId, PollTimer>,
}

impl<S, C> JobProgressTracker<S, C>
where
    S: JobStatusSource + 'static,
    C: JobCatalog + 'static,
{
    pub fn new(board: SharedJobBoard, source: Arc<S>, catalog: Arc<C>, params: TrackerParams) -> Self {
        Self {
            board,
            source,
            catalog,
            params,
            notifier: Arc::new(NoJobProgress),
            conversation_logger: Arc::new(NoConversationLogger),
            timers: HashMap::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn JobProgressNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn board(&self) -> &SharedJobBoard {
        &self.board
    }

    /// Number of polling timers currently held.
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_tracking(&self, job_id: &JobId) -> bool {
        self.timers.contains_key(job_id)
    }

    /// Re-diff until `shutdown` is cancelled or every board writer is gone,
    /// then dispose.
    ///
    /// On shutdown the board is re-diffed once more, so a job that turned
    /// terminal just before still gets its finish handling and refresh.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        let mut rx = self.board.subscribe();
        loop {
            let board = rx.borrow_and_update().clone();
            self.reconcile(&board).await;

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    let board = rx.borrow_and_update().clone();
                    self.reconcile(&board).await;
                    break;
                }
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        self.dispose();
    }

    /// Start and stop timers so they match `board`.
    ///
    /// Idempotent: a second call with the same board does nothing.
    pub async fn reconcile(&mut self, board: &JobBoard) -> ReconcileReport {
        let to_stop: Vec<(JobId, Option<JobHandle>)> = self
            .timers
            .keys()
            .filter_map(|id| match board.get(id) {
                None => Some((id.clone(), None)),
                Some(handle) if handle.status.is_terminal() => {
                    Some((id.clone(), Some(handle.clone())))
                }
                Some(_) => None,
            })
            .collect();

        let to_start: Vec<JobHandle> = board
            .iter()
            .filter(|h| h.status.is_active())
            .filter(|h| !self.timers.get(&h.job_id).is_some_and(PollTimer::is_running))
            .cloned()
            .collect();

        let mut report = ReconcileReport::default();
        let mut completed = 0;

        for (job_id, handle) in to_stop {
            self.stop_timer(&job_id);
            match &handle {
                Some(h) => {
                    info!(job_id = %job_id, status = %h.status, "Job finished");
                    self.conversation_logger.log(ConversationEvent::new(
                        "job_finished",
                        json!({
                            "job_id": job_id.as_str(),
                            "status": h.status.as_str(),
                            "error": h.error,
                        }),
                    ));
                    if h.status == JobStatus::Completed {
                        completed += 1;
                    }
                }
                None => debug!(job_id = %job_id, "Job left the board, polling stopped"),
            }
            self.notifier.on_job_finished(&job_id, handle.as_ref());
            report.stopped.push(job_id);
        }

        for handle in to_start {
            self.start_timer(&handle);
            report.started.push(handle.job_id);
        }

        for _ in 0..completed {
            report.refreshes += 1;
            if let Err(e) = self.refresh_catalog().await {
                warn!(error = %e, "Catalog refresh after completion failed");
            }
        }

        if !report.is_noop() {
            debug!(
                started = report.started.len(),
                stopped = report.stopped.len(),
                timers = self.timers.len(),
                "Reconciled job timers"
            );
        }
        report
    }

    /// Fetch the catalog, resume in-flight downloads and notify.
    pub async fn refresh_catalog(&self) -> Result<Vec<CatalogEntry>, TrackerError> {
        let entries = refresh_catalog(self.catalog.as_ref(), &self.board).await?;
        self.notifier.on_catalog_refreshed(&entries);
        Ok(entries)
    }

    /// Cancel every timer. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if !self.timers.is_empty() {
            debug!(timers = self.timers.len(), "Disposing job tracker");
        }
        for (_, timer) in self.timers.drain() {
            timer.stop();
        }
    }

    fn start_timer(&mut self, handle: &JobHandle) {
        if let Some(stale) = self.timers.remove(&handle.job_id) {
            stale.stop();
        }

        let cancel = CancellationToken::new();
        let context = PollContext {
            board: Arc::clone(&self.board),
            source: Arc::clone(&self.source),
            notifier: Arc::clone(&self.notifier),
            params: self.params,
        };
        let task = tokio::spawn(poll_job(context, handle.job_id.clone(), cancel.clone()));

        debug!(job_id = %handle.job_id, "Polling started");
        self.notifier.on_job_tracked(handle);
        self.timers
            .insert(handle.job_id.clone(), PollTimer { cancel, task });
    }

    fn stop_timer(&mut self, job_id: &JobId) -> bool {
        match self.timers.remove(job_id) {
            Some(timer) => {
                timer.stop();
                true
            }
            None => false,
        }
    }
}

impl<S, C> Drop for JobProgressTracker<S, C>
where
    S: JobStatusSource + 'static,
    C: JobCatalog + 'static,
{
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Poll one job at a fixed interval until it turns terminal, leaves the
/// board or the timer is cancelled.
///
/// Each poll is awaited before the next tick, so at most one request per job
/// is in flight.
async fn poll_job<S: JobStatusSource + 'static>(
    ctx: PollContext<S>,
    job_id: JobId,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(
        Instant::now() + ctx.params.poll_interval,
        ctx.params.poll_interval,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failures: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = ctx.source.fetch_status(&job_id) => result,
        };

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                failures += 1;
                warn!(job_id = %job_id, failures, error = %e, "Status poll failed");
                if failures == ctx.params.stall_threshold {
                    ctx.notifier.on_poll_stalled(&job_id, failures, &e);
                }
                continue;
            }
        };
        failures = 0;

        if cancel.is_cancelled() {
            return;
        }
        let mut updated = None;
        ctx.board.send_if_modified(|board| {
            let before = board.get(&job_id).cloned();
            if !board.apply_snapshot(&job_id, snapshot) {
                return false;
            }
            updated = board.get(&job_id).cloned();
            updated != before
        });

        let Some(handle) = updated else {
            debug!(job_id = %job_id, "Polled job no longer on the board");
            return;
        };
        ctx.notifier.on_job_progress(&handle);
        if handle.status.is_terminal() {
            return;
        }
    }
}
