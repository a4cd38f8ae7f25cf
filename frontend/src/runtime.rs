use futures::future::LocalBoxFuture;
use gloo_timers::callback::Interval;
use session::{Runtime, TimerHandle};
use std::time::Duration;

/// The browser event loop: `spawn_local` for futures, `setInterval` for timers.
pub struct BrowserRuntime;

impl Runtime for BrowserRuntime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn interval(&self, period: Duration, mut tick: Box<dyn FnMut()>) -> Box<dyn TimerHandle> {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        Box::new(BrowserTimer(Interval::new(millis, move || tick())))
    }
}

struct BrowserTimer(Interval);

impl TimerHandle for BrowserTimer {
    fn cancel(self: Box<Self>) {
        drop(self.0.cancel());
    }
}
