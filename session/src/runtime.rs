use futures::future::LocalBoxFuture;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// The event loop the sessions run on: one thread, spawned futures and repeating timers.
pub trait Runtime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// Calls `tick` every `period` until the returned handle is cancelled.
    fn interval(&self, period: Duration, tick: Box<dyn FnMut()>) -> Box<dyn TimerHandle>;
}

pub trait TimerHandle {
    fn cancel(self: Box<Self>);
}

/// A named repeating timer that can be stopped from anywhere.
///
/// Cancelling only prevents future ticks; work a tick already spawned keeps
/// running and has to check for itself whether its result is still wanted.
pub struct PeriodicTask {
    name: &'static str,
    live: Rc<Cell<bool>>,
    timer: Option<Box<dyn TimerHandle>>,
}

impl PeriodicTask {
    pub fn start<F>(runtime: &dyn Runtime, name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let live = Rc::new(Cell::new(true));
        let flag = Rc::clone(&live);
        let timer = runtime.interval(
            period,
            Box::new(move || {
                if flag.get() {
                    tick();
                }
            }),
        );
        log::debug!("Started {} task every {:?}", name, period);

        Self {
            name,
            live,
            timer: Some(timer),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_active(&self) -> bool {
        self.live.get()
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.live.set(false);
            timer.cancel();
            log::debug!("Cancelled {} task", self.name);
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
