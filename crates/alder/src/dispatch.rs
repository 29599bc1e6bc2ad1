//! Deferred execution on the UI event loop.
//!
//! The toolkit is single-threaded: all control and handler state is mutated
//! on the UI thread, and several operations must not run synchronously from
//! inside an input callback (hiding a popup, restoring focus). Those are
//! queued here and run on a later turn of the loop.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use tracing::{trace, warn};

/// Upper bound on tasks run per [`Dispatcher::process_pending`] call, to
/// terminate tasks that endlessly re-enqueue themselves.
const MAX_TASKS_PER_DRAIN: usize = 10_000;

/// A FIFO queue of deferred closures, drained by the event loop between
/// platform callbacks.
///
/// Queued tasks are not cancellable. A task that touches a control must
/// check `is_disposed()` before acting, because the control may have been
/// torn down between enqueue and execution.
#[derive(Default)]
pub struct Dispatcher {
    /// Pending tasks in execution order.
    queue: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

impl Dispatcher {
    /// Construct a shared dispatcher.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Queue a closure to run on a later turn of the event loop.
    pub fn begin_invoke(&self, f: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(f));
        trace!(pending = self.queue.borrow().len(), "task queued");
    }

    /// True if no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Run queued tasks until the queue is empty, including tasks enqueued
    /// while draining. Returns the number of tasks run.
    ///
    /// Safe to call re-entrantly from within a task; the borrow on the queue
    /// is released while each task runs.
    pub fn process_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.queue.borrow_mut().pop_front();
            let Some(task) = task else {
                break;
            };
            task();
            ran += 1;
            if ran >= MAX_TASKS_PER_DRAIN {
                warn!(ran, "dispatcher drain limit reached, deferring remainder");
                break;
            }
        }
        if ran > 0 {
            trace!(ran, "drained deferred tasks");
        }
        ran
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.queue.borrow().len())
            .finish()
    }
}
