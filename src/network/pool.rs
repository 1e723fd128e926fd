//! Worker Pool
//!
//! Fixed set of worker threads fed from an unbounded job queue.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{CalcError, Result};

/// A unit of work run on a pool thread
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size thread pool
///
/// ## Saturation
/// When every worker is busy, jobs wait in the queue. The queue is
/// unbounded, so [`WorkerPool::execute`] never blocks and never rejects.
///
/// ## Shutdown
/// Dropping the pool closes the queue; workers finish the jobs already
/// queued, then exit and are joined.
pub struct WorkerPool {
    /// Job queue sender (None once shutting down)
    sender: Option<Sender<Job>>,

    /// Spawned workers
    workers: Vec<Worker>,
}

struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(CalcError::Config(
                "worker pool needs at least one thread".to_string(),
            ));
        }

        let (sender, receiver) = channel::unbounded::<Job>();

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("calcd-worker-{}", id))
                .spawn(move || worker_loop(id, receiver))?;
            workers.push(Worker {
                id,
                handle: Some(handle),
            });
        }

        tracing::debug!("Worker pool started with {} threads", size);

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Queue a job for the next free worker
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| CalcError::Network("worker pool is shut down".to_string()))?;

        sender
            .send(Box::new(job))
            .map_err(|_| CalcError::Network("worker pool is shut down".to_string()))
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Jobs waiting for a worker
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map_or(0, |s| s.len())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel ends every worker's receive loop
        drop(self.sender.take());

        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    tracing::warn!("Worker {} exited abnormally", worker.id);
                }
            }
        }

        tracing::debug!("Worker pool stopped");
    }
}

/// Run jobs until the queue is closed and drained
fn worker_loop(id: usize, receiver: Receiver<Job>) {
    for job in receiver.iter() {
        // A panicking job must not take the worker down with it
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::warn!("Job panicked on worker {}", id);
        }
    }
}
