use crate::*;

/// Time parameters handed to the oracle with every simulated action.
///
/// Read-only for the duration of a planning call: the engine copies it
/// into each job, so changing the planner's scaling never affects a
/// search that is already running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    dt: Seconds,
    scaling: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self::new(DEFAULT_DT, DEFAULT_DURATION_SCALING)
    }
}

impl Timing {
    pub fn new(dt: Seconds, scaling: f64) -> Self {
        Self { dt, scaling }
    }
    pub fn dt(&self) -> Seconds {
        self.dt
    }
    pub fn scaling(&self) -> f64 {
        self.scaling
    }
    /// Scales a nominal duration and rounds it up to a whole number of steps.
    pub fn duration(&self, nominal: Seconds) -> Seconds {
        let scaled = nominal * self.scaling;
        match self.dt > 0.0 {
            // tolerate representation error so exact multiples stay put
            true => ((scaled / self.dt) - 1e-9).ceil().max(0.0) * self.dt,
            false => scaled,
        }
    }
}
