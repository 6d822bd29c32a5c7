// src/crawl/frontier.rs
// =============================================================================
// The frontier: the shared FIFO queue of pages waiting for a worker.
//
// Besides being a queue, the frontier knows when the crawl has run dry.
// Every worker that finds the queue empty is counted as idle while it waits.
// An idle worker holds no task, so it can never push new work. When the last
// busy worker also comes back to an empty queue, nobody can ever add to it
// again: the frontier closes itself and wakes everyone up with `None`.
//
// The coordinator also closes it explicitly once the visit budget is spent.
//
// Rust concepts:
// - parking_lot::Mutex: short critical sections, never held across .await
// - tokio::sync::Notify: lets waiting workers sleep without spinning
// =============================================================================

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;
use tracing::debug;

// One page to visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    /// Link hops from the seed (the seed itself is depth 0)
    pub depth: usize,
}

#[derive(Debug, Default)]
struct State {
    queue: VecDeque<CrawlTask>,
    idle: usize,
    closed: bool,
}

#[derive(Debug)]
pub struct Frontier {
    state: Mutex<State>,
    notify: Notify,
    workers: usize,
}

impl Frontier {
    // `workers` is the number of consumers that will call `pop`
    pub fn new(workers: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            notify: Notify::new(),
            workers: workers.max(1),
        }
    }

    /// Adds a task at the back of the queue.
    ///
    /// Returns `false` (and drops the task) once the frontier is closed.
    pub fn push(&self, task: CrawlTask) -> bool {
        {
            let mut state = self.state.lock();
            if state.closed {
                return false;
            }
            state.queue.push_back(task);
        }
        self.notify.notify_one();
        true
    }

    /// Takes the next task, waiting while the queue is empty.
    ///
    /// Returns `None` when the frontier is closed, either explicitly or
    /// because every worker is waiting on an empty queue.
    pub async fn pop(&self) -> Option<CrawlTask> {
        let mut waiting = false;

        loop {
            // Register interest before looking at the queue so a push that
            // lands between the check and the await still wakes us.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock();
                if waiting {
                    state.idle -= 1;
                }
                if state.closed {
                    return None;
                }
                if let Some(task) = state.queue.pop_front() {
                    return Some(task);
                }

                state.idle += 1;
                if state.idle >= self.workers {
                    debug!("Frontier exhausted with all {} workers idle", self.workers);
                    state.closed = true;
                    drop(state);
                    self.notify.notify_waiters();
                    return None;
                }
            }

            waiting = true;
            notified.await;
        }
    }

    // Stops handing out tasks; waiters return None and later pushes are dropped
    pub fn close(&self) {
        {
            let mut state = self.state.lock();
            if state.closed {
                return;
            }
            state.closed = true;
        }
        self.notify.notify_waiters();
    }

    // Returns a guard that closes the frontier when dropped
    //
    // A worker holds one for its whole run, so a worker that unwinds can't
    // leave the others waiting for it to come back to `pop`.
    pub fn close_on_drop(&self) -> CloseGuard<'_> {
        CloseGuard { frontier: self }
    }

    // Tasks still queued (after a budget stop, these are never visited)
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }
}

pub struct CloseGuard<'a> {
    frontier: &'a Frontier,
}

impl Drop for CloseGuard<'_> {
    fn drop(&mut self) {
        self.frontier.close();
    }
}
