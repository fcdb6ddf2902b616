/// An action argument as written by the caller.
///
/// `cup` refers to any entity named or typed `cup`; `cup@cup_2` pins the
/// binding to the instance `cup_2`. Grounded commands use the pinned form,
/// so they parse back to exactly the binding they were produced from.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Argument {
    token: String,
    pinned: Option<String>,
}

impl Argument {
    pub fn token(&self) -> &str {
        &self.token
    }
    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }
    /// Whether an entity with this name and these types can be bound.
    pub fn admits(&self, entity: &crate::Entity) -> bool {
        entity.is_a(&self.token) && self.pinned.as_deref().is_none_or(|p| p == entity.name())
    }
    /// Text of this argument once bound to `instance`.
    pub fn bind(&self, instance: &str) -> String {
        match self.token == instance {
            true => instance.to_string(),
            false => format!("{}@{}", self.token, instance),
        }
    }
}

impl TryFrom<&str> for Argument {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.split_once('@') {
            None if !s.is_empty() => Ok(Self {
                token: s.to_string(),
                pinned: None,
            }),
            Some((token, instance)) if !token.is_empty() && !instance.is_empty() => Ok(Self {
                token: token.to_string(),
                pinned: Some(instance.to_string()),
            }),
            _ => Err(format!("'{}' is not a valid argument", s)),
        }
    }
}

impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pinned {
            Some(instance) => write!(f, "{}@{}", self.token, instance),
            None => write!(f, "{}", self.token),
        }
    }
}

/// An abstract action: verb plus unbound arguments.
///
/// Grammar, whitespace separated:
/// - `get <object> [<manipulator>]`
/// - `put <object> <surface>`
/// - `gaze <entity> [<robot>]`
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Action {
    Get {
        object: Argument,
        manipulator: Option<String>,
    },
    Put {
        object: Argument,
        surface: Argument,
    },
    Gaze {
        target: Argument,
        agent: Option<String>,
    },
}

impl Action {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Get { .. } => "get",
            Self::Put { .. } => "put",
            Self::Gaze { .. } => "gaze",
        }
    }
}

impl TryFrom<&str> for Action {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let parts = s.split_whitespace().collect::<Vec<&str>>();
        match parts.as_slice() {
            [] => Err("empty action".to_string()),
            ["get", object] => Ok(Self::Get {
                object: Argument::try_from(*object)?,
                manipulator: None,
            }),
            ["get", object, manipulator] => Ok(Self::Get {
                object: Argument::try_from(*object)?,
                manipulator: Some(manipulator.to_string()),
            }),
            ["put", object, surface] => Ok(Self::Put {
                object: Argument::try_from(*object)?,
                surface: Argument::try_from(*surface)?,
            }),
            ["gaze", target] => Ok(Self::Gaze {
                target: Argument::try_from(*target)?,
                agent: None,
            }),
            ["gaze", target, agent] => Ok(Self::Gaze {
                target: Argument::try_from(*target)?,
                agent: Some(agent.to_string()),
            }),
            ["get", ..] => Err("'get' expects an object and an optional manipulator".to_string()),
            ["put", ..] => Err("'put' expects an object and a surface".to_string()),
            ["gaze", ..] => Err("'gaze' expects a target and an optional robot".to_string()),
            [verb, ..] => Err(format!("'{}' is not a known action", verb)),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get {
                object,
                manipulator: Some(manipulator),
            } => write!(f, "get {} {}", object, manipulator),
            Self::Get { object, .. } => write!(f, "get {}", object),
            Self::Put { object, surface } => write!(f, "put {} {}", object, surface),
            Self::Gaze {
                target,
                agent: Some(agent),
            } => write!(f, "gaze {} {}", target, agent),
            Self::Gaze { target, .. } => write!(f, "gaze {}", target),
        }
    }
}
