//! Action grammar, grounded candidates and result records.
mod action;
mod failure;
mod grounding;
mod result;

pub use action::*;
pub use failure::*;
pub use grounding::*;
pub use result::*;
