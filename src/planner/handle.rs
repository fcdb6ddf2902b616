use crate::*;
use futures::channel::oneshot::Receiver;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::task::Context;
use std::task::Poll;

/// A planning call running in the background.
///
/// Await it, block on it with [`PlanHandle::wait`], or check on it with
/// [`PlanHandle::poll`]. [`PlanHandle::cancel`] stops the search from
/// starting new expansions; simulations already in flight finish first.
pub struct PlanHandle {
    receiver: Receiver<Report>,
    cancel: Arc<AtomicBool>,
    report: Option<Report>,
}

impl From<(Receiver<Report>, Arc<AtomicBool>)> for PlanHandle {
    fn from((receiver, cancel): (Receiver<Report>, Arc<AtomicBool>)) -> Self {
        Self {
            receiver,
            cancel,
            report: None,
        }
    }
}

impl PlanHandle {
    pub fn cancel(&self) {
        log::info!("cancelling plan");
        self.cancel.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
    /// The report if the search has finished, without blocking.
    pub fn poll(&mut self) -> Option<&Report> {
        if self.report.is_none() {
            self.report = match self.receiver.try_recv() {
                Ok(report) => report,
                Err(_) => Some(lost()),
            };
        }
        self.report.as_ref()
    }
    pub fn is_finished(&mut self) -> bool {
        self.poll().is_some()
    }
    /// Blocks the current thread until the report is available.
    pub fn wait(self) -> Report {
        futures::executor::block_on(self)
    }
}

impl std::future::Future for PlanHandle {
    type Output = Report;
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(report) = this.report.take() {
            return Poll::Ready(report);
        }
        Pin::new(&mut this.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| lost()))
    }
}

/// The planning thread went away without reporting.
fn lost() -> Report {
    Report::Aborted {
        result: ActionResult::fail(Failure::Fatal, "", "Planning stopped unexpectedly", "", ""),
    }
}
