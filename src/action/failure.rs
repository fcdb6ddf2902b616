/// Classification of an unsuccessful [`ActionResult`](crate::ActionResult).
///
/// Parse and Fatal failures stop expansion below the node that produced
/// them. Exhausted and Infeasible failures are soft: the node becomes a
/// failure leaf and the rest of the search carries on.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Failure {
    /// The action token matches no known grammar.
    Parse,
    /// The token parsed, but no binding satisfies the preconditions.
    Exhausted,
    /// The oracle could not execute the chosen binding.
    Infeasible,
    /// Unrecoverable condition; prunes the subtree.
    Fatal,
}

impl Failure {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Parse => "PARSE_ERROR",
            Self::Exhausted => "NO_CANDIDATE",
            Self::Infeasible => "NOT_FEASIBLE",
            Self::Fatal => "FATAL_ERROR",
        }
    }
    /// Failures that prune everything below the node.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Parse | Self::Fatal)
    }
}

/// Unknown error codes are treated as infeasible simulations.
impl From<&str> for Failure {
    fn from(code: &str) -> Self {
        match code {
            c if c == Self::Parse.code() => Self::Parse,
            c if c == Self::Exhausted.code() => Self::Exhausted,
            c if c == Self::Fatal.code() => Self::Fatal,
            _ => Self::Infeasible,
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
