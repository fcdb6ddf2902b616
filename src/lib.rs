//! Grounding-tree prediction of robot manipulation action sequences.
//!
//! An ordered list of abstract actions (`"get cup"`, `"put cup table"`) is
//! grounded against a [`Scene`], simulated by an [`Oracle`] branch by branch,
//! and collected into a [`PredictionTree`]. The tree is then queried for the
//! leftmost full solution or, when none exists, diagnosed by the deepest
//! failing branches.
//!
//! # Module Structure
//!
//! - `scene`: World snapshot and agent predicates (reach, occlusion, holding)
//! - `action`: Action grammar, grounded commands and [`ActionResult`] records
//! - `resolve`: Grounding of one action token into ordered candidates
//! - `oracle`: Simulation contract and the reference [`KinematicOracle`]
//! - `predict`: Multi-threaded depth-first construction of the tree
//! - `diagnose`: Solution extraction and failure aggregation
//! - `planner`: Caller-facing facade, configuration and async handle
mod action;
mod diagnose;
mod error;
mod oracle;
mod planner;
mod predict;
mod resolve;
mod scene;

pub use action::*;
pub use diagnose::*;
pub use error::*;
pub use oracle::*;
pub use planner::*;
pub use predict::*;
pub use resolve::*;
pub use scene::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Cartesian position in world coordinates (meters).
pub type Vec3 = [f64; 3];
/// Lengths, radii and reach limits.
pub type Meters = f64;
/// Time steps and predicted action durations.
pub type Seconds = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// SEARCH PARAMETERS
// ============================================================================
/// Default integration step handed to the oracle.
pub const DEFAULT_DT: Seconds = 0.01;
/// Default multiplier on predicted action durations.
pub const DEFAULT_DURATION_SCALING: f64 = 1.0;
/// Worker count that selects the available hardware parallelism.
pub const AUTO_THREADS: usize = 0;
/// Separator between actions in a sequence string.
pub const SEQUENCE_SEPARATOR: char = ';';

// ============================================================================
// REFERENCE KINEMATICS
// Duration model of the reference oracle: path length over effector speed.
// ============================================================================
/// Cartesian speed of a manipulator while transporting or approaching.
pub const MANIPULATOR_SPEED: f64 = 0.5;
/// Fixed duration of a gaze shift.
pub const GAZE_DURATION: Seconds = 0.4;
/// Predictions longer than this are reported infeasible.
pub const MAX_ACTION_DURATION: Seconds = 20.0;

// ============================================================================
// SCENE DEFAULTS
// ============================================================================
/// Reach radius of a manipulator when the scene file omits it.
pub const DEFAULT_REACH: Meters = 0.9;
/// Bounding-sphere radius of an entity when the scene file omits it.
pub const DEFAULT_RADIUS: Meters = 0.05;
/// Anything closer than this to a free hand keeps the hand busy.
pub const BUSY_DISTANCE: Meters = 0.15;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
