//! World snapshot and the predicates the resolver grounds against.
//!
//! - [`Scene`]: entities and agents, forked once per search branch
//! - [`Agent`]: closed variant over [`Robot`] and [`Human`]
//! - [`Manipulator`]: effector with reach and holding relation
//! - [`Entity`]: named object with types, bounding sphere and affordances
mod agent;
mod entity;
#[cfg(test)]
pub mod fixture;
mod geometry;
mod manipulator;
mod scene;

pub use agent::*;
pub use entity::*;
pub use geometry::*;
pub use manipulator::*;
pub use scene::*;
