use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Default search settings of a [`Planner`].
///
/// Resolved in layers: built-in constants, then the `planner` section of a
/// scene file, then `PLAN_THREADS`, `PLAN_DT` and `PLAN_DURATION_SCALING`
/// from the environment. Command line flags are applied last by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub threads: usize,
    pub dt: Seconds,
    pub duration_scaling: f64,
    pub early_exit: bool,
    pub sentinel: Option<String>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            threads: AUTO_THREADS,
            dt: DEFAULT_DT,
            duration_scaling: DEFAULT_DURATION_SCALING,
            early_exit: false,
            sentinel: None,
        }
    }
}

#[derive(Deserialize)]
struct Section {
    #[serde(default)]
    planner: PlanConfig,
}

impl PlanConfig {
    /// Reads the `planner` section of a scene description, if present.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str::<Section>(json)?.planner)
    }
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Applies overrides from the process environment.
    pub fn from_env(self) -> Self {
        self.overridden(|key| std::env::var(key).ok())
    }
    /// Applies overrides from any key lookup. Unparsable values are ignored.
    pub fn overridden(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(threads) = lookup("PLAN_THREADS").and_then(|v| v.trim().parse().ok()) {
            log::info!("threads overridden to {}", threads);
            self.threads = threads;
        }
        if let Some(dt) = lookup("PLAN_DT").and_then(|v| v.trim().parse().ok()) {
            log::info!("dt overridden to {}", dt);
            self.dt = dt;
        }
        if let Some(scaling) = lookup("PLAN_DURATION_SCALING").and_then(|v| v.trim().parse().ok()) {
            log::info!("duration scaling overridden to {}", scaling);
            self.duration_scaling = scaling;
        }
        self
    }

    /// Search settings for one call.
    pub fn search(&self) -> Search {
        Search::default()
            .with_threads(self.threads)
            .with_dt(self.dt)
            .with_scaling(self.duration_scaling)
            .with_early_exit(self.early_exit)
            .with_sentinel(self.sentinel.as_deref())
    }
}
