use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// What an entity can be used for by a manipulator.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affordance {
    /// Can be grasped and carried.
    Graspable,
    /// Can carry other entities placed on top of it.
    Supporting,
}

/// A physical object in the scene, approximated by a bounding sphere.
///
/// Entities are addressed by a unique `name` (`cup_1`) and additionally
/// match any of their `types` (`cup`, `container`). Action tokens may use
/// either, which is what makes grounding ambiguous in the first place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    name: String,
    #[serde(default)]
    types: Vec<String>,
    position: Vec3,
    #[serde(default = "default_radius")]
    radius: Meters,
    #[serde(default)]
    affordances: Vec<Affordance>,
}

fn default_radius() -> Meters {
    DEFAULT_RADIUS
}

impl Entity {
    pub fn new(name: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            types: Vec::new(),
            position,
            radius: DEFAULT_RADIUS,
            affordances: Vec::new(),
        }
    }
    pub fn with_type(mut self, kind: &str) -> Self {
        self.types.push(kind.to_string());
        self
    }
    pub fn with_radius(mut self, radius: Meters) -> Self {
        self.radius = radius;
        self
    }
    pub fn graspable(mut self) -> Self {
        self.affordances.push(Affordance::Graspable);
        self
    }
    pub fn supporting(mut self) -> Self {
        self.affordances.push(Affordance::Supporting);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn types(&self) -> &[String] {
        &self.types
    }
    pub fn position(&self) -> &Vec3 {
        &self.position
    }
    pub fn radius(&self) -> Meters {
        self.radius
    }
    pub fn affords(&self, affordance: Affordance) -> bool {
        self.affordances.contains(&affordance)
    }
    /// True if the token names this entity or one of its types.
    pub fn is_a(&self, token: &str) -> bool {
        self.name == token || self.types.iter().any(|t| t == token)
    }
    /// True if `point` lies inside the bounding sphere.
    pub fn contains(&self, point: &Vec3) -> bool {
        distance(&self.position, point) <= self.radius
    }
    pub fn move_to(&mut self, position: Vec3) {
        self.position = position;
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
