//! Cancellable timers and a trailing-edge debouncer built on them.
//!
//! [`Timer::schedule`] runs a callback after a delay on a tokio runtime and
//! returns a [`TimerHandle`].  Cancelling *or dropping* the handle aborts the
//! sleeping task, so a callback never fires once its handle is gone.
//!
//! [`Debouncer`] holds at most one handle.  Every [`Debouncer::push`] replaces
//! it, which cancels the previous emission and schedules a new one a full
//! window later.  Only the last value of a burst reaches the callback:
//!
//! ```text
//! push(a) t=0    ──┐ cancelled
//! push(b) t=50   ──┤ cancelled
//! push(c) t=100  ──┴──────────────── emit(c) at t=100+window
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// TimerHandle
// ---------------------------------------------------------------------------

/// Cancellation handle for one scheduled callback.
///
/// Dropping the handle cancels the callback.
#[derive(Debug)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Cancel the callback if it has not run yet.
    pub fn cancel(mut self) {
        self.abort();
    }

    /// `true` once the callback has run or the timer was aborted.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// Schedules delayed callbacks on a tokio runtime.
///
/// Holding a [`Handle`] rather than calling `tokio::spawn` lets the timer be
/// driven from threads that are not inside the runtime (the egui thread).
#[derive(Debug, Clone)]
pub struct Timer {
    runtime: Handle,
}

impl Timer {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Timer on the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Run `callback` once, `delay` from now.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        TimerHandle { task: Some(task) }
    }
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Emits the latest pushed value once input has been quiet for `window`.
pub struct Debouncer<T> {
    timer: Timer,
    window: Duration,
    emit: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<TimerHandle>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(timer: Timer, window: Duration, emit: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            timer,
            window,
            emit: Arc::new(emit),
            pending: None,
        }
    }

    /// Record a new value, restarting the quiet window.
    pub fn push(&mut self, value: T) {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        let emit = Arc::clone(&self.emit);
        self.pending = Some(self.timer.schedule(self.window, move || emit(value)));
    }

    /// Drop the pending emission, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }

    /// `true` while an emission is scheduled but has not fired.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
