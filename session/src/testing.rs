//! Hand-driven runtime and scripted responses for the session tests.

use crate::error::ClientError;
use crate::runtime::{Runtime, TimerHandle};
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

struct ManualTimer {
    period: Duration,
    tick: Box<dyn FnMut()>,
    live: Rc<Cell<bool>>,
}

struct ManualHandle(Rc<Cell<bool>>);

impl TimerHandle for ManualHandle {
    fn cancel(self: Box<Self>) {
        self.0.set(false);
    }
}

/// Timers only fire when a test calls [`ManualRuntime::tick`].
pub struct ManualRuntime {
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    timers: RefCell<Vec<ManualTimer>>,
}

impl ManualRuntime {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            pool: RefCell::new(pool),
            spawner,
            timers: RefCell::new(Vec::new()),
        }
    }

    /// Runs spawned work until everything is waiting on something.
    pub fn run(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Fires every live timer with this period once, then runs what they spawned.
    pub fn tick(&self, period: Duration) {
        for timer in self.timers.borrow_mut().iter_mut() {
            if timer.period == period && timer.live.get() {
                (timer.tick)();
            }
        }
        self.run();
    }

    pub fn live_timers(&self, period: Duration) -> usize {
        self.timers
            .borrow()
            .iter()
            .filter(|timer| timer.period == period && timer.live.get())
            .count()
    }
}

impl Runtime for ManualRuntime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner
            .spawn_local(task)
            .expect("test pool accepts tasks");
    }

    fn interval(&self, period: Duration, tick: Box<dyn FnMut()>) -> Box<dyn TimerHandle> {
        let live = Rc::new(Cell::new(true));
        self.timers.borrow_mut().push(ManualTimer {
            period,
            tick,
            live: Rc::clone(&live),
        });
        Box::new(ManualHandle(live))
    }
}

/// A canned backend answer, either available at once or held back until the test releases it.
pub enum Script<T> {
    Ready(Result<T, ClientError>),
    Gated(oneshot::Receiver<Result<T, ClientError>>),
}

pub type Gate<T> = oneshot::Sender<Result<T, ClientError>>;

/// FIFO of scripted answers. An empty queue answers with `fallback`.
pub struct Scripted<T> {
    queue: RefCell<VecDeque<Script<T>>>,
    calls: Cell<usize>,
}

impl<T> Default for Scripted<T> {
    fn default() -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            calls: Cell::new(0),
        }
    }
}

impl<T> Scripted<T> {
    pub fn push(&self, result: Result<T, ClientError>) {
        self.queue.borrow_mut().push_back(Script::Ready(result));
    }

    pub fn push_gated(&self) -> Gate<T> {
        let (sender, receiver) = oneshot::channel();
        self.queue.borrow_mut().push_back(Script::Gated(receiver));
        sender
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub async fn next(&self, fallback: impl FnOnce() -> Result<T, ClientError>) -> Result<T, ClientError> {
        self.calls.set(self.calls.get() + 1);
        let script = self.queue.borrow_mut().pop_front();
        match script {
            Some(Script::Ready(result)) => result,
            Some(Script::Gated(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(ClientError::Transport("gate dropped".into()))),
            None => fallback(),
        }
    }
}
