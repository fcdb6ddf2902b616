use crate::*;

/// Predicts the outcome of one grounded action.
///
/// Implementations must be deterministic: the same scene, grounding and
/// timing always produce the same successor scene and record. The scene
/// is an independent fork owned by the call; the engine never shares it
/// with another branch.
///
/// A record classified as [`Failure::Fatal`] prunes everything below the
/// node it is attached to.
pub trait Oracle: Send + Sync {
    fn simulate(&self, scene: Scene, grounding: &Grounding, timing: Timing) -> (Scene, ActionResult);
}

/// Plain functions and closures are oracles, which keeps scripted
/// outcomes in tests and benchmarks short.
impl<F> Oracle for F
where
    F: Fn(Scene, &Grounding, Timing) -> (Scene, ActionResult) + Send + Sync,
{
    fn simulate(&self, scene: Scene, grounding: &Grounding, timing: Timing) -> (Scene, ActionResult) {
        self(scene, grounding, timing)
    }
}
