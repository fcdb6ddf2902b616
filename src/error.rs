use crate::*;
use thiserror::Error;

/// Reasons a planning call produces no tree at all.
///
/// A search that completes without a plan is not an error: it returns a
/// tree whose failure leaves carry the diagnosis.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("empty action sequence")]
    EmptySequence,

    /// The first action token could not be parsed.
    #[error("{}", .0.reason())]
    Parse(ActionResult),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("planning was cancelled before it finished")]
    Cancelled,
}

impl PlanError {
    /// The record describing the failure, shaped like any other result.
    pub fn result(&self) -> ActionResult {
        match self {
            Self::Parse(result) => result.clone(),
            other => ActionResult::fail(Failure::Fatal, "", &other.to_string(), "", ""),
        }
    }
}

/// Failures loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read scene file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),
}
