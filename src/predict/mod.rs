//! Multi-threaded depth-first construction of the prediction tree.
//!
//! - [`Search`]: settings of one planning call and its entry point
//! - [`PredictionTree`]: immutable result, indexed in discovery order
//! - [`Node`]: lightweight handle for navigating the tree
//! - [`Prediction`]: per-node weight: command, forked scene, outcome
mod engine;
mod node;
mod prediction;
mod search;
mod tree;

pub use node::*;
pub use prediction::*;
pub use search::*;
pub use tree::*;
