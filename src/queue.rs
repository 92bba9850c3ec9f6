//! Job variants and the FIFO work queue the worker pool drains.
use crate::app::GlobalState;
use crate::{processor, walker};
use std::collections::VecDeque;
use std::fs::FileType;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};

/// A unit of work. Jobs are plain data; shared state is handed in by the
/// worker that runs them, and running a job may push further jobs.
#[derive(Debug)]
pub enum Job {
    /// Expand one path: stat it, enqueue a search for a file, enqueue one
    /// `AddPaths` per entry for a directory.
    AddPaths {
        path: PathBuf,
        /// Named on the command line, so the dotfile rule does not apply.
        requested: bool,
        /// File type captured from the directory entry, saving a stat.
        file_type: Option<FileType>,
    },
    /// Search one regular file and report its matches.
    Search { path: PathBuf },
    /// Force regex compilation once, early, so a bad pattern is diagnosed
    /// promptly instead of by whichever worker happens to search first.
    WarmRegex,
}

impl Job {
    pub fn run(self, state: &GlobalState) {
        match self {
            Job::AddPaths {
                path,
                requested,
                file_type,
            } => walker::add_paths(state, path, requested, file_type),
            Job::Search { path } => processor::run_search(state, &path),
            Job::WarmRegex => {
                state.regex.get();
            }
        }
    }
}

#[derive(Debug, Default)]
struct QueueInner {
    jobs: VecDeque<Job>,
    /// Enqueued plus currently running jobs. The pool terminates exactly
    /// when this reaches zero: no queued job and no running job that could
    /// still push one.
    pending: usize,
}

/// FIFO job queue shared by all workers.
///
/// `pending` is raised before a job becomes visible and lowered only after
/// its body finished, so a blocked worker can never miss work produced by a
/// job that is still in flight.
#[derive(Debug, Default)]
pub struct WorkQueue {
    inner: Mutex<QueueInner>,
    ready: Condvar,
}

/// Decrements `pending` when a job finishes, even if the job body panicked;
/// otherwise the remaining workers would block forever.
struct FinishGuard<'a> {
    queue: &'a WorkQueue,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.queue.finish_one();
    }
}

impl WorkQueue {
    pub fn push(&self, job: Job) {
        let mut inner = self.inner.lock().unwrap();
        inner.pending += 1;
        inner.jobs.push_back(job);
        drop(inner);
        // every push wakes a worker, so a burst of new jobs spins the
        // whole pool up instead of leaving all but one worker parked
        self.ready.notify_one();
    }

    /// Worker loop: run jobs until the queue quiesces.
    ///
    /// Returns once `pending` hits zero, meaning no job is queued anywhere
    /// and no running job can produce more.
    pub fn run_until_drained(&self, state: &GlobalState) {
        while let Some(job) = self.take() {
            let _finished = FinishGuard { queue: self };
            job.run(state);
        }
    }

    fn take(&self) -> Option<Job> {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(job) = inner.jobs.pop_front() {
                return Some(job);
            }
            if inner.pending == 0 {
                return None;
            }
            inner = self.ready.wait(inner).unwrap();
        }
    }

    fn finish_one(&self) {
        let mut inner = self.inner.lock().unwrap();
        debug_assert!(inner.pending > 0);
        inner.pending -= 1;
        if inner.pending == 0 {
            debug_assert!(inner.jobs.is_empty());
            drop(inner);
            self.ready.notify_all();
        }
    }
}
