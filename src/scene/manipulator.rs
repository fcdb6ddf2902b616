use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// An end effector (hand, gripper) that can hold at most one entity.
///
/// `base` is the mounting point the reach radius is measured from;
/// `position` is where the effector currently is and defaults to the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manipulator {
    name: String,
    base: Vec3,
    #[serde(default)]
    position: Option<Vec3>,
    #[serde(default = "default_reach")]
    reach: Meters,
    #[serde(default)]
    holding: Option<String>,
}

fn default_reach() -> Meters {
    DEFAULT_REACH
}

impl Manipulator {
    pub fn new(name: &str, base: Vec3) -> Self {
        Self {
            name: name.to_string(),
            base,
            position: None,
            reach: DEFAULT_REACH,
            holding: None,
        }
    }
    pub fn with_reach(mut self, reach: Meters) -> Self {
        self.reach = reach;
        self
    }
    pub fn holding(mut self, entity: &str) -> Self {
        self.holding = Some(entity.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn base(&self) -> &Vec3 {
        &self.base
    }
    pub fn position(&self) -> &Vec3 {
        self.position.as_ref().unwrap_or(&self.base)
    }
    pub fn reach(&self) -> Meters {
        self.reach
    }
    pub fn held(&self) -> Option<&str> {
        self.holding.as_deref()
    }
    pub fn can_reach(&self, point: &Vec3) -> bool {
        distance(&self.base, point) <= self.reach
    }

    pub fn move_to(&mut self, position: Vec3) {
        self.position = Some(position);
    }
    /// Back to the resting pose at the base.
    pub fn retract(&mut self) {
        self.position = None;
    }
    pub fn grasp(&mut self, entity: &str) {
        self.holding = Some(entity.to_string());
    }
    pub fn release(&mut self) -> Option<String> {
        self.holding.take()
    }
}
