use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// An actor in the scene. Robots execute the predicted actions; humans are
/// part of the world model (they hold things, they block reach).
///
/// Predicates that differ between the two are selected by matching on the
/// variant rather than through a trait object hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Agent {
    Robot(Robot),
    Human(Human),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    name: String,
    eye: Vec3,
    #[serde(default)]
    manipulators: Vec<Manipulator>,
    #[serde(default)]
    gaze: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Human {
    name: String,
    head: Vec3,
    #[serde(default)]
    hands: Vec<Manipulator>,
    #[serde(default = "visible")]
    visible: bool,
}

fn visible() -> bool {
    true
}

impl Robot {
    pub fn new(name: &str, eye: Vec3) -> Self {
        Self {
            name: name.to_string(),
            eye,
            manipulators: Vec::new(),
            gaze: None,
        }
    }
    pub fn with_manipulator(mut self, manipulator: Manipulator) -> Self {
        self.manipulators.push(manipulator);
        self
    }
    pub fn gaze(&self) -> Option<&str> {
        self.gaze.as_deref()
    }
    pub fn look_at(&mut self, target: &str) {
        self.gaze = Some(target.to_string());
    }
}

impl Human {
    pub fn new(name: &str, head: Vec3) -> Self {
        Self {
            name: name.to_string(),
            head,
            hands: Vec::new(),
            visible: true,
        }
    }
    pub fn with_hand(mut self, hand: Manipulator) -> Self {
        self.hands.push(hand);
        self
    }
    /// A human that is no longer tracked by perception.
    pub fn unseen(mut self) -> Self {
        self.visible = false;
        self
    }
}

impl From<Robot> for Agent {
    fn from(robot: Robot) -> Self {
        Self::Robot(robot)
    }
}
impl From<Human> for Agent {
    fn from(human: Human) -> Self {
        Self::Human(human)
    }
}

impl Agent {
    pub fn name(&self) -> &str {
        match self {
            Self::Robot(robot) => &robot.name,
            Self::Human(human) => &human.name,
        }
    }
    /// Viewpoint used for occlusion queries.
    pub fn eye(&self) -> &Vec3 {
        match self {
            Self::Robot(robot) => &robot.eye,
            Self::Human(human) => &human.head,
        }
    }
    pub fn manipulators(&self) -> &[Manipulator] {
        match self {
            Self::Robot(robot) => &robot.manipulators,
            Self::Human(human) => &human.hands,
        }
    }
    pub fn manipulators_mut(&mut self) -> &mut [Manipulator] {
        match self {
            Self::Robot(robot) => &mut robot.manipulators,
            Self::Human(human) => &mut human.hands,
        }
    }
    pub fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }
    /// Robots are always known to the world model; humans only while tracked.
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Robot(_) => true,
            Self::Human(human) => human.visible,
        }
    }
    /// True if any manipulator can reach the point. Untracked humans reach nothing.
    pub fn can_reach(&self, point: &Vec3) -> bool {
        self.is_visible() && self.manipulators().iter().any(|m| m.can_reach(point))
    }
    pub fn owns(&self, manipulator: &str) -> bool {
        self.manipulators().iter().any(|m| m.name() == manipulator)
    }
    /// Entity the agent is currently looking at, if known.
    pub fn looking_at(&self) -> Option<&str> {
        match self {
            Self::Robot(robot) => robot.gaze(),
            Self::Human(_) => None,
        }
    }
}
