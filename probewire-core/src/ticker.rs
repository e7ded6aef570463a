use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Abstraction over a handle that can be queried for completion and aborted.
pub trait Abortable {
    /// Abort the underlying task if it is still running.
    fn abort(&mut self);
    /// Return `true` if the underlying task has completed.
    fn is_finished(&self) -> bool;
}

impl Abortable for JoinHandle<()> {
    fn abort(&mut self) {
        // JoinHandle::abort takes &self
        Self::abort(self);
    }

    fn is_finished(&self) -> bool {
        Self::is_finished(self)
    }
}

/// Abstraction over a one-shot stop signal.
pub trait Stoppable {
    /// Send a best-effort stop signal to request graceful shutdown.
    fn send(self);
}

impl Stoppable for oneshot::Sender<()> {
    fn send(self) {
        let _ = Self::send(self, ());
    }
}

/// Abstraction over a gate that, once closed, keeps tick bodies from running.
pub trait Closable {
    /// Close the gate. Returns only after any tick body in progress has finished.
    fn close(&self);
}

/// Shutdown logic shared by [`TickerHandle::cancel`] and its `Drop`:
/// - close the gate so no further tick body runs
/// - send a best-effort stop signal if present
/// - abort the task if it hasn't finished yet
pub fn drop_impl<G, H, S>(gate: &G, inner: &mut Option<H>, stop_tx: &mut Option<S>)
where
    G: Closable + ?Sized,
    H: Abortable,
    S: Stoppable,
{
    gate.close();
    if let Some(tx) = stop_tx.take() {
        tx.send();
    }
    if let Some(mut h) = inner.take()
        && !h.is_finished()
    {
        h.abort();
    }
}

/// Serializes tick bodies against cancellation.
///
/// A tick body runs through [`run`](Self::run) while holding the gate's lock,
/// and [`close`](Closable::close) takes the same lock. Once `close` returns no
/// tick body is running and none will start. A tick body must therefore never
/// close its own gate.
#[derive(Debug, Default)]
pub struct TickGate {
    closed: Mutex<bool>,
}

impl TickGate {
    /// Create an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` unless the gate is closed.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let closed = self.closed.lock().unwrap_or_else(PoisonError::into_inner);
        if *closed { None } else { Some(f()) }
    }

    /// True once the gate has been closed.
    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Closable for TickGate {
    fn close(&self) {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }
}

/// Handle to a spawned repeating ticker.
///
/// Dropping the handle cancels the ticker the same way [`cancel`](Self::cancel) does.
#[derive(Debug)]
pub struct TickerHandle {
    inner: Option<JoinHandle<()>>,
    stop_tx: Option<oneshot::Sender<()>>,
    gate: Arc<TickGate>,
}

impl TickerHandle {
    /// Wrap a ticker task, its stop signal, and the gate its tick bodies run through.
    #[must_use]
    pub const fn new(
        inner: JoinHandle<()>,
        stop_tx: oneshot::Sender<()>,
        gate: Arc<TickGate>,
    ) -> Self {
        Self {
            inner: Some(inner),
            stop_tx: Some(stop_tx),
            gate,
        }
    }

    /// Cancel synchronously: no tick body runs after this returns.
    pub fn cancel(mut self) {
        drop_impl(self.gate.as_ref(), &mut self.inner, &mut self.stop_tx);
    }

    /// Close the gate, signal the task, and wait for it to exit.
    pub async fn stop(mut self) {
        self.gate.close();
        if let Some(tx) = self.stop_tx.take() {
            Stoppable::send(tx);
        }
        if let Some(join) = self.inner.take() {
            let _ = join.await;
        }
    }

    /// True once the ticker task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        drop_impl(self.gate.as_ref(), &mut self.inner, &mut self.stop_tx);
    }
}
