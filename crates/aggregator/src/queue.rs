//! Process-wide admission control for aggregation jobs.
//!
//! [`AggregationQueue`] bounds how many jobs run at once. Jobs are handed to a
//! single dispatcher task over an unbounded channel, so admission order is
//! exactly the order of [`AggregationQueue::submit`] calls. The dispatcher
//! admits a job only after taking a slot from a semaphore sized to the limit;
//! the slot is returned when the job finishes, fails, or panics.
//!
//! The queue has an explicit lifecycle: [`AggregationQueue::start`] spawns the
//! dispatcher on the current tokio runtime and [`AggregationQueue::shutdown`]
//! stops accepting jobs and drains the ones already queued.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use domain::{AggregationError, JobId};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;

/// The job's result can no longer be delivered: the queue shut down before
/// admitting it, or the job panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("aggregation queue is closed")]
pub struct QueueClosed;

impl From<QueueClosed> for AggregationError {
    fn from(_: QueueClosed) -> Self {
        AggregationError::QueueClosed
    }
}

type BoxedJob = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

struct QueuedJob {
    id: JobId,
    work: BoxedJob,
}

/// Handle to the eventual output of a submitted job.
#[must_use = "a job's output is only observable through its ticket"]
pub struct JobTicket<T> {
    id: JobId,
    output: oneshot::Receiver<T>,
}

impl<T> JobTicket<T> {
    /// Identifier assigned to the job at submission.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Waits for the job to run and returns its output unchanged.
    pub async fn wait(self) -> Result<T, QueueClosed> {
        self.output.await.map_err(|_| QueueClosed)
    }
}

/// Bounded-concurrency FIFO job queue.
pub struct AggregationQueue {
    limit: usize,
    running: Arc<AtomicUsize>,
    jobs: Mutex<Option<mpsc::UnboundedSender<QueuedJob>>>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl AggregationQueue {
    /// Starts a queue that runs at most `limit` jobs at once.
    ///
    /// Must be called from within a tokio runtime. Returns
    /// [`AggregationError::Configuration`] if `limit` is zero.
    pub fn start(limit: usize) -> Result<Self, AggregationError> {
        if limit == 0 {
            return Err(AggregationError::Configuration {
                message: "aggregation queue limit must be at least 1".to_string(),
            });
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let running = Arc::new(AtomicUsize::new(0));
        let slots = Arc::new(Semaphore::new(limit));
        let dispatcher = tokio::spawn(dispatch(receiver, slots, Arc::clone(&running)));

        info!(limit, "Aggregation queue started");
        Ok(Self {
            limit,
            running,
            jobs: Mutex::new(Some(sender)),
            dispatcher: Mutex::new(Some(dispatcher)),
        })
    }

    /// Maximum number of concurrently running jobs.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of jobs currently running.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    /// Enqueues a job.
    ///
    /// `job` receives the [`JobId`] assigned to it and is not called until the
    /// job is admitted. Its output is delivered unchanged through the
    /// returned ticket. If the queue has shut down the ticket resolves to
    /// [`QueueClosed`].
    pub fn submit<J, F, T>(&self, job: J) -> JobTicket<T>
    where
        J: FnOnce(JobId) -> F + Send + 'static,
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let id = JobId::new_random();
        let (output_tx, output_rx) = oneshot::channel();
        let work: BoxedJob = Box::pin(async move {
            // The submitter may have stopped waiting; that is not an error.
            let _ = output_tx.send(job(id).await);
        });

        let enqueued = match self.jobs.lock() {
            Ok(jobs) => jobs
                .as_ref()
                .is_some_and(|sender| sender.send(QueuedJob { id, work }).is_ok()),
            Err(_) => false,
        };
        if enqueued {
            debug!(job_id = %id, "Aggregation job queued");
        } else {
            warn!(job_id = %id, "Aggregation queue is closed; job rejected");
        }

        JobTicket {
            id,
            output: output_rx,
        }
    }

    /// Stops accepting jobs, then waits until every queued job has run.
    pub async fn shutdown(&self) {
        let sender = self.jobs.lock().ok().and_then(|mut jobs| jobs.take());
        drop(sender);

        let dispatcher = self
            .dispatcher
            .lock()
            .ok()
            .and_then(|mut dispatcher| dispatcher.take());
        if let Some(dispatcher) = dispatcher {
            if let Err(err) = dispatcher.await {
                error!(error = %err, "Aggregation dispatcher terminated abnormally");
            }
        }
        info!("Aggregation queue stopped");
    }
}

/// Holds a concurrency slot for the lifetime of one running job.
struct RunningSlot {
    running: Arc<AtomicUsize>,
    _permit: OwnedSemaphorePermit,
}

impl RunningSlot {
    fn occupy(running: Arc<AtomicUsize>, permit: OwnedSemaphorePermit) -> Self {
        running.fetch_add(1, Ordering::SeqCst);
        Self {
            running,
            _permit: permit,
        }
    }
}

impl Drop for RunningSlot {
    fn drop(&mut self) {
        self.running.fetch_sub(1, Ordering::SeqCst);
    }
}

async fn dispatch(
    mut jobs: mpsc::UnboundedReceiver<QueuedJob>,
    slots: Arc<Semaphore>,
    running: Arc<AtomicUsize>,
) {
    let mut in_flight = JoinSet::new();

    while let Some(QueuedJob { id, work }) = jobs.recv().await {
        // The semaphore is never closed, so this only fails if it is dropped.
        let Ok(permit) = Arc::clone(&slots).acquire_owned().await else {
            break;
        };
        let slot = RunningSlot::occupy(Arc::clone(&running), permit);
        debug!(job_id = %id, running = running.load(Ordering::SeqCst), "Aggregation job admitted");

        in_flight.spawn(async move {
            let _slot = slot;
            work.await;
            debug!(job_id = %id, "Aggregation job finished");
        });

        while let Some(finished) = in_flight.try_join_next() {
            log_join_failure(finished);
        }
    }

    while let Some(finished) = in_flight.join_next().await {
        log_join_failure(finished);
    }
}

fn log_join_failure(finished: Result<(), tokio::task::JoinError>) {
    if let Err(err) = finished {
        error!(error = %err, "Aggregation job panicked");
    }
}
