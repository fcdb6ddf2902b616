//! Simulation contract consumed by the search, plus a reference implementation.
mod kinematic;
mod oracle;
mod timing;

pub use kinematic::*;
pub use oracle::*;
pub use timing::*;
