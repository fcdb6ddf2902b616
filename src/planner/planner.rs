use crate::*;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Splits `"get cup; put cup table;"` into trimmed, non-empty tokens.
pub fn split_sequence(sequence: &str) -> Vec<String> {
    sequence
        .split(SEQUENCE_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Owns an oracle and the default search settings, and answers planning
/// requests in the three shapes callers need: the first solution, a full
/// report, or a handle to a search running in the background.
///
/// The duration scaling can only change through `&mut self`, so it never
/// moves while a search is running on this planner.
pub struct Planner<O: Oracle> {
    oracle: O,
    config: PlanConfig,
    sink: Option<Box<dyn Notify>>,
}

impl<O: Oracle> Planner<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            config: PlanConfig::default(),
            sink: None,
        }
    }
    pub fn with_config(mut self, config: PlanConfig) -> Self {
        self.config = config;
        self
    }
    /// Receives the raw failure batch of every unsuccessful plan.
    pub fn with_sink(mut self, sink: impl Notify + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }
    pub fn duration_scaling(&self) -> f64 {
        self.config.duration_scaling
    }
    pub fn set_duration_scaling(&mut self, scaling: f64) {
        log::info!("duration scaling set to {}", scaling);
        self.config.duration_scaling = scaling;
    }
    pub fn reset_duration_scaling(&mut self) {
        self.set_duration_scaling(DEFAULT_DURATION_SCALING);
    }
    /// Settings for the next call.
    pub fn search(&self) -> Search {
        self.config.search()
    }

    pub fn plan_tree<S: AsRef<str>>(&self, scene: &Scene, sequence: &[S]) -> Result<PredictionTree, PlanError> {
        self.search().plan_tree(&self.oracle, scene, sequence)
    }
    /// Commands of the first solution, or nothing if there is none.
    pub fn predict(&self, scene: &Scene, sequence: &str) -> Vec<String> {
        match self.plan_tree(scene, &split_sequence(sequence)) {
            Ok(tree) => tree.solution_path_strings(0),
            Err(e) => {
                log::warn!("prediction aborted: {}", e);
                Vec::new()
            }
        }
    }
    /// The first solution or the diagnosis of why there is none.
    pub fn plan(&self, scene: &Scene, sequence: &str) -> Report {
        self.report(scene, &split_sequence(sequence), self.search())
    }

    fn report(&self, scene: &Scene, sequence: &[String], search: Search) -> Report {
        match search.plan_tree(&self.oracle, scene, sequence) {
            Ok(tree) => {
                let report = Report::new(&tree, self.sink.as_deref());
                log::info!("{}", report);
                report
            }
            Err(e) => {
                log::warn!("planning aborted: {}", e);
                Report::from(e)
            }
        }
    }
}

impl<O: Oracle + 'static> Planner<O> {
    /// Plans on a background thread. The scene is copied, so the caller
    /// may keep changing its own.
    pub fn spawn(self: &Arc<Self>, scene: &Scene, sequence: &str) -> PlanHandle {
        let (sender, receiver) = futures::channel::oneshot::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let search = self.search().with_cancel(cancel.clone());
        let sequence = split_sequence(sequence);
        let scene = scene.fork();
        let planner = self.clone();
        std::thread::spawn(move || {
            let report = planner.report(&scene, &sequence, search);
            if sender.send(report).is_err() {
                log::debug!("plan handle dropped before the report arrived");
            }
        });
        PlanHandle::from((receiver, cancel))
    }
}
