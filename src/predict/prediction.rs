use crate::*;
use std::sync::Arc;

/// Outcome of the action that produced a node.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Status {
    /// The root: nothing has been simulated yet.
    Pending,
    Success,
    Failure,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Weight of one node in the prediction tree.
///
/// The `key` is the path of candidate ranks from the root. Comparing keys
/// lexicographically gives depth-first, left-to-right discovery order
/// regardless of which worker created the node.
#[derive(Debug, Clone)]
pub struct Prediction {
    depth: usize,
    key: Vec<usize>,
    command: String,
    scene: Arc<Scene>,
    status: Status,
    fatal: bool,
    feedback: ActionResult,
}

impl Prediction {
    pub(crate) fn root(scene: Arc<Scene>) -> Self {
        Self {
            depth: 0,
            key: Vec::new(),
            command: String::new(),
            scene,
            status: Status::Pending,
            fatal: false,
            feedback: ActionResult::default(),
        }
    }
    /// A simulated child. Failed records classified as fatal prune it.
    pub(crate) fn simulated(depth: usize, key: Vec<usize>, scene: Arc<Scene>, feedback: ActionResult) -> Self {
        Self {
            depth,
            key,
            command: feedback.command().to_string(),
            scene,
            status: match feedback.success() {
                true => Status::Success,
                false => Status::Failure,
            },
            fatal: feedback.is_fatal(),
            feedback,
        }
    }
    /// Overrides the outcome with a fatal record; nothing grows below.
    pub(crate) fn abort(&mut self, feedback: ActionResult) {
        self.fatal = true;
        self.feedback = feedback;
    }
    pub(crate) fn halt(&mut self) {
        self.fatal = true;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
    pub fn key(&self) -> &[usize] {
        &self.key
    }
    /// Grounded command of the action that produced this node; empty at the root.
    pub fn command(&self) -> &str {
        &self.command
    }
    /// World state after the action.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }
    pub fn feedback(&self) -> &ActionResult {
        &self.feedback
    }
    /// Whether this node ends a branch with a diagnosable failure.
    pub fn failed(&self) -> bool {
        self.fatal || self.status == Status::Failure
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.depth, self.fatal) {
            (0, _) => write!(f, "ROOT"),
            (_, true) => write!(f, "{} [fatal] {}", self.command, self.feedback.reason()),
            (_, false) if self.feedback.success() => write!(f, "{} [{}]", self.command, self.status),
            (_, false) => write!(f, "{} [{}] {}", self.command, self.status, self.feedback.reason()),
        }
    }
}
