use crate::*;

/// Receives the raw records of a failed planning call.
///
/// The batch holds one record per deepest failure leaf, duplicates
/// included, in discovery order.
pub trait Notify: Send + Sync {
    fn notify(&self, results: &[ActionResult]);
}

impl<F> Notify for F
where
    F: Fn(&[ActionResult]) + Send + Sync,
{
    fn notify(&self, results: &[ActionResult]) {
        self(results)
    }
}

/// Writes every record of the batch to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl Notify for LogSink {
    fn notify(&self, results: &[ActionResult]) {
        log::warn!("{} failures at the deepest level", results.len());
        for result in results {
            log::warn!("{}", result);
        }
    }
}
