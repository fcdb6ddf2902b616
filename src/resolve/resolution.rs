use crate::*;

/// Outcome of grounding one action token against a scene.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// The token is not an action. Fatal at the node that attempted it.
    Unparsed(ActionResult),
    /// The token parsed. Valid candidates in exploration order, plus the
    /// diagnosis of every binding that was considered and rejected.
    ///
    /// Whenever `candidates` is empty, `rejected` is not.
    Grounded {
        candidates: Vec<Grounding>,
        rejected: Vec<ActionResult>,
    },
}

impl Resolution {
    pub fn candidates(&self) -> &[Grounding] {
        match self {
            Self::Unparsed(_) => &[],
            Self::Grounded { candidates, .. } => candidates,
        }
    }
    pub fn rejected(&self) -> &[ActionResult] {
        match self {
            Self::Unparsed(_) => &[],
            Self::Grounded { rejected, .. } => rejected,
        }
    }
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Grounded { .. })
    }
}
