use crate::*;

/// Caller-facing outcome of one planning call.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// Grounded commands of the first solution in discovery order.
    Solved { commands: Vec<String> },
    /// No branch executed the whole sequence.
    Failed {
        diagnoses: Vec<Diagnosis>,
        results: Vec<ActionResult>,
    },
    /// The call produced no tree at all.
    Aborted { result: ActionResult },
}

impl Report {
    /// Summarizes a finished tree, handing the raw failure batch to `sink`.
    pub fn new(tree: &PredictionTree, sink: Option<&dyn Notify>) -> Self {
        let commands = tree.solution_path_strings(0);
        if !commands.is_empty() {
            return Self::Solved { commands };
        }
        let results = deepest(tree)
            .iter()
            .map(|n| n.feedback().clone())
            .collect::<Vec<_>>();
        if let Some(sink) = sink {
            sink.notify(&results);
        }
        Self::Failed {
            diagnoses: diagnose(tree),
            results,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }
    /// Solution commands; empty unless solved.
    pub fn commands(&self) -> &[String] {
        match self {
            Self::Solved { commands } => commands,
            _ => &[],
        }
    }
    /// Deduplicated failures. An aborted call reports its one record with
    /// an empty path.
    pub fn diagnoses(&self) -> Vec<Diagnosis> {
        match self {
            Self::Solved { .. } => Vec::new(),
            Self::Failed { diagnoses, .. } => diagnoses.clone(),
            Self::Aborted { result } => vec![Diagnosis::new(Vec::new(), result.reason(), result.suggestion())],
        }
    }
    /// Raw records behind the diagnosis.
    pub fn results(&self) -> &[ActionResult] {
        match self {
            Self::Solved { .. } => &[],
            Self::Failed { results, .. } => results,
            Self::Aborted { result } => std::slice::from_ref(result),
        }
    }

    /// `SUCCESS`, or one `Issue` line per raw record with consecutive
    /// repeats left out. Issue numbers count the raw records.
    pub fn message(&self) -> String {
        if self.success() {
            return SUCCESS.to_string();
        }
        let mut message = String::from("No solution found:\n");
        let mut previous = None;
        for (i, result) in self.results().iter().enumerate() {
            let line = format!("{} Suggestion: {}\n", result.reason(), result.suggestion());
            if previous.as_ref() != Some(&line) {
                message.push_str(&format!("  Issue {}: {}", i, line));
            }
            previous = Some(line);
        }
        message
    }
}

impl From<PlanError> for Report {
    fn from(error: PlanError) -> Self {
        Self::Aborted {
            result: error.result(),
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solved { commands } => write!(f, "{}", commands.join("; ")),
            _ => write!(f, "{}", self.message().trim_end()),
        }
    }
}
