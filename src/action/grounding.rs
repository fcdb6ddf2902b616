use crate::*;

/// Concrete entities an action has been bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    Get {
        manipulator: String,
        object: String,
    },
    Put {
        manipulator: String,
        object: String,
        surface: String,
    },
    Gaze {
        agent: String,
        target: String,
    },
}

impl Binding {
    /// The manipulator, or the agent for gaze shifts.
    pub fn effector(&self) -> &str {
        match self {
            Self::Get { manipulator, .. } => manipulator,
            Self::Put { manipulator, .. } => manipulator,
            Self::Gaze { agent, .. } => agent,
        }
    }
    /// The entity the action is directed at.
    pub fn target(&self) -> &str {
        match self {
            Self::Get { object, .. } => object,
            Self::Put { surface, .. } => surface,
            Self::Gaze { target, .. } => target,
        }
    }
}

/// One candidate produced by the resolver: a binding, its command text and
/// the effector-to-target distance that ranks it among its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct Grounding {
    binding: Binding,
    command: String,
    distance: Meters,
}

impl Grounding {
    pub fn new(binding: Binding, command: String, distance: Meters) -> Self {
        Self {
            binding,
            command,
            distance,
        }
    }
    pub fn binding(&self) -> &Binding {
        &self.binding
    }
    pub fn command(&self) -> &str {
        &self.command
    }
    pub fn distance(&self) -> Meters {
        self.distance
    }
    /// Resolver order: nearest first, then target name, then effector name.
    pub fn rank(&self, other: &Self) -> std::cmp::Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.binding.target().cmp(other.binding.target()))
            .then_with(|| self.binding.effector().cmp(other.binding.effector()))
    }
}

impl std::fmt::Display for Grounding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(object: &str, manipulator: &str, distance: Meters) -> Grounding {
        Grounding::new(
            Binding::Get {
                manipulator: manipulator.to_string(),
                object: object.to_string(),
            },
            format!("get {} {}", object, manipulator),
            distance,
        )
    }

    #[test]
    fn rank_by_distance_then_names() {
        let mut candidates = vec![
            get("cup_2", "hand_left", 0.4),
            get("cup_1", "hand_right", 0.4),
            get("cup_3", "hand_left", 0.2),
            get("cup_1", "hand_left", 0.4),
        ];
        candidates.sort_by(Grounding::rank);
        let order = candidates.iter().map(|g| g.command()).collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                "get cup_3 hand_left",
                "get cup_1 hand_left",
                "get cup_1 hand_right",
                "get cup_2 hand_left",
            ]
        );
    }
}
