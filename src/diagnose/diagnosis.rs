use crate::*;

/// One reported failure: the commands leading to it, what went wrong and
/// what to try instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnosis {
    path: Vec<String>,
    reason: String,
    suggestion: String,
}

impl Diagnosis {
    pub fn new(path: Vec<String>, reason: &str, suggestion: &str) -> Self {
        Self {
            path,
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }
    /// Grounded commands from the first action down to the failing one.
    pub fn path(&self) -> &[String] {
        &self.path
    }
    pub fn reason(&self) -> &str {
        &self.reason
    }
    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }
    fn echoes(&self, other: &Self) -> bool {
        self.reason == other.reason && self.suggestion == other.suggestion
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} Suggestion: {}", self.path.join("; "), self.reason, self.suggestion)
    }
}

/// Failure leaves at the deepest level any failure reached.
///
/// Branches that got furthest before failing say the most about what is
/// missing, so shallower failures are dropped entirely.
pub fn deepest<'tree>(tree: &'tree PredictionTree) -> Vec<Node<'tree>> {
    let leaves = tree.failure_leaves();
    let level = leaves.iter().map(|n| n.depth()).max().unwrap_or(0);
    leaves.into_iter().filter(|n| n.depth() == level).collect()
}

/// Diagnoses of the deepest failures in discovery order, skipping each one
/// that repeats the reason and suggestion of the leaf just before it.
pub fn diagnose(tree: &PredictionTree) -> Vec<Diagnosis> {
    let mut diagnoses = Vec::new();
    let mut previous: Option<Diagnosis> = None;
    for leaf in deepest(tree) {
        let path = tree
            .path(leaf, false)
            .iter()
            .map(|n| n.command().to_string())
            .collect::<Vec<_>>();
        let feedback = leaf.feedback();
        let diagnosis = Diagnosis::new(path, feedback.reason(), feedback.suggestion());
        if previous.as_ref().is_none_or(|p| !p.echoes(&diagnosis)) {
            diagnoses.push(diagnosis.clone());
        }
        previous = Some(diagnosis);
    }
    diagnoses
}
