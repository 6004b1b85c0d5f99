use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

pub type Task = Box<dyn FnOnce() + 'static>;

/// Runs a task once after a delay. A handle may be cancelled at most once and
/// only before its task has run.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay: Duration, task: Task) -> Self::Handle;
    fn cancel(&self, handle: Self::Handle);
}

/// Timers on the thread-default glib main context.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    type Handle = glib::SourceId;

    fn schedule(&self, delay: Duration, task: Task) -> glib::SourceId {
        glib::timeout_add_local_once(delay, task)
    }

    fn cancel(&self, handle: glib::SourceId) {
        handle.remove();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

struct ManualTask {
    id: u64,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_id: u64,
    tasks: Vec<ManualTask>,
}

/// Virtual-time scheduler. Nothing runs until [`ManualScheduler::advance`]
/// moves time forward; clones share one queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    /// Runs every task due within `by`, in due order, including tasks
    /// scheduled by the tasks themselves.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due_idx = queue
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.due <= target)
                    .min_by_key(|(_, entry)| (entry.due, entry.id))
                    .map(|(idx, _)| idx);
                due_idx.map(|idx| {
                    let entry = queue.tasks.remove(idx);
                    queue.now = entry.due;
                    entry
                })
            };
            match next {
                Some(entry) => (entry.task)(),
                None => break,
            }
        }
        self.queue.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    type Handle = TaskId;

    fn schedule(&self, delay: Duration, task: Task) -> TaskId {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let due = queue.now + delay;
        queue.tasks.push(ManualTask { id, due, task });
        TaskId(id)
    }

    fn cancel(&self, handle: TaskId) {
        self.queue
            .borrow_mut()
            .tasks
            .retain(|entry| entry.id != handle.0);
    }
}
