use crate::*;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Settings of one planning call.
///
/// - `dt` and `scaling` are handed to the oracle as [`Timing`]
/// - `threads` bounds the worker pool; [`AUTO_THREADS`] uses every core
/// - `early_exit` stops exploring right of the first full solution
/// - `sentinel` names a command whose failure halts the whole search
/// - `cancel` is polled before every expansion
#[derive(Debug, Clone)]
pub struct Search {
    dt: Seconds,
    scaling: f64,
    threads: usize,
    early_exit: bool,
    sentinel: Option<String>,
    cancel: Arc<AtomicBool>,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            scaling: DEFAULT_DURATION_SCALING,
            threads: AUTO_THREADS,
            early_exit: false,
            sentinel: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Search {
    pub fn with_dt(mut self, dt: Seconds) -> Self {
        self.dt = dt;
        self
    }
    pub fn with_scaling(mut self, scaling: f64) -> Self {
        self.scaling = scaling;
        self
    }
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
    pub fn with_early_exit(mut self, early_exit: bool) -> Self {
        self.early_exit = early_exit;
        self
    }
    pub fn with_sentinel(mut self, sentinel: Option<&str>) -> Self {
        self.sentinel = sentinel.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        self
    }
    /// Shares an external cancellation flag with the search.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn timing(&self) -> Timing {
        Timing::new(self.dt, self.scaling)
    }
    /// Worker count with [`AUTO_THREADS`] resolved to the core count.
    pub fn threads(&self) -> usize {
        match self.threads {
            AUTO_THREADS => num_cpus::get(),
            n => n,
        }
    }
    pub fn early_exit(&self) -> bool {
        self.early_exit
    }
    pub fn sentinel(&self) -> Option<&str> {
        self.sentinel.as_deref()
    }
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
    pub(crate) fn flag(&self) -> &AtomicBool {
        &self.cancel
    }

    /// Builds the prediction tree for `sequence` starting from `scene`.
    ///
    /// Fails without a tree when the sequence is empty, when its first
    /// token does not parse, when the worker pool cannot be built, or when
    /// the search is cancelled. A search that finds no plan still returns
    /// the tree; its failure leaves carry the diagnosis.
    pub fn plan_tree<O, S>(&self, oracle: &O, scene: &Scene, sequence: &[S]) -> Result<PredictionTree, PlanError>
    where
        O: Oracle,
        S: AsRef<str>,
    {
        let sequence = sequence
            .iter()
            .map(|token| token.as_ref().trim().to_string())
            .collect::<Vec<_>>();
        super::engine::Engine::new(oracle, &sequence, self).run(scene)
    }
}
