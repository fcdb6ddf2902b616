//! Solution extraction and failure aggregation over a finished tree.
mod diagnosis;
mod notify;
mod report;

pub use diagnosis::*;
pub use notify::*;
pub use report::*;
