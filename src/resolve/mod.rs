//! Grounding of one abstract action token against a scene.
mod resolution;
mod resolver;

pub use resolution::*;
pub use resolver::*;
