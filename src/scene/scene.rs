use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// A snapshot of the world: every entity and every agent with its
/// manipulators. Each branch of the prediction tree owns its own copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    entities: Vec<Entity>,
    #[serde(default)]
    agents: Vec<Agent>,
}

impl Scene {
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }
    pub fn with_agent(mut self, agent: impl Into<Agent>) -> Self {
        self.agents.push(agent.into());
        self
    }
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Independent deep copy for a new branch of the search.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }
    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name() == name)
    }
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name() == name)
    }
    pub fn agent_mut(&mut self, name: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.name() == name)
    }
    /// Agents that execute actions.
    pub fn robots(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.is_robot())
    }
    /// All entities the token can refer to, by name or by type.
    pub fn instances<'a>(&'a self, token: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.is_a(token))
    }
    pub fn manipulator(&self, name: &str) -> Option<&Manipulator> {
        self.agents
            .iter()
            .flat_map(|a| a.manipulators())
            .find(|m| m.name() == name)
    }
    pub fn manipulator_mut(&mut self, name: &str) -> Option<&mut Manipulator> {
        self.agents
            .iter_mut()
            .flat_map(|a| a.manipulators_mut())
            .find(|m| m.name() == name)
    }
    /// The agent a manipulator belongs to.
    pub fn owner(&self, manipulator: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.owns(manipulator))
    }
    /// The manipulator currently holding the entity.
    pub fn holder(&self, entity: &str) -> Option<&Manipulator> {
        self.agents
            .iter()
            .flat_map(|a| a.manipulators())
            .find(|m| m.held() == Some(entity))
    }
    pub fn is_held(&self, entity: &str) -> bool {
        self.holder(entity).is_some()
    }

    /// Whether the named manipulator can reach the entity, taking the
    /// owning agent's own constraints into account.
    pub fn reachable(&self, manipulator: &Manipulator, entity: &Entity) -> bool {
        self.owner(manipulator.name())
            .map(|agent| agent.is_visible())
            .unwrap_or(false)
            && manipulator.can_reach(entity.position())
    }

    /// Entities blocking the line of sight from `eye` to `target`, closest
    /// to the eye first.
    ///
    /// Held entities travel with their manipulator and never occlude.
    /// Entities whose bounding sphere contains the target (the table a cup
    /// stands on) or the eye itself are ignored.
    pub fn occluders(&self, eye: &Vec3, target: &Entity) -> Vec<&Entity> {
        let mut occluders = self
            .entities
            .iter()
            .filter(|e| e.name() != target.name())
            .filter(|e| !self.is_held(e.name()))
            .filter(|e| !e.contains(target.position()))
            .filter(|e| !e.contains(eye))
            .filter(|e| intersects(eye, target.position(), e.position(), e.radius()))
            .collect::<Vec<_>>();
        occluders.sort_by(|a, b| {
            distance(eye, a.position())
                .total_cmp(&distance(eye, b.position()))
                .then_with(|| a.name().cmp(b.name()))
        });
        occluders
    }
    /// The occluder closest to the eye, if any.
    pub fn occluder(&self, eye: &Vec3, target: &Entity) -> Option<&Entity> {
        self.occluders(eye, target).into_iter().next()
    }
    /// Entities the agent cannot see, sorted by name. Whatever the agent
    /// holds itself is left out.
    pub fn occluded(&self, agent: &Agent) -> Vec<&Entity> {
        let held = self.held_by(agent);
        let mut occluded = self
            .entities
            .iter()
            .filter(|e| held.iter().all(|h| h.name() != e.name()))
            .filter(|e| self.occluder(agent.eye(), e).is_some())
            .collect::<Vec<_>>();
        occluded.sort_by(|a, b| a.name().cmp(b.name()));
        occluded
    }
    /// Entities held by the agent's manipulators, in manipulator order.
    pub fn held_by(&self, agent: &Agent) -> Vec<&Entity> {
        agent
            .manipulators()
            .iter()
            .filter_map(|m| m.held())
            .filter_map(|name| self.entity(name))
            .collect()
    }

    /// Free entities within [`BUSY_DISTANCE`] of the manipulator, nearest
    /// first.
    pub fn nearby(&self, manipulator: &Manipulator) -> Vec<&Entity> {
        let hand = manipulator.position();
        let mut nearby = self
            .entities
            .iter()
            .filter(|e| !self.is_held(e.name()))
            .filter(|e| distance(hand, e.position()) < BUSY_DISTANCE)
            .collect::<Vec<_>>();
        nearby.sort_by(|a, b| {
            distance(hand, a.position())
                .total_cmp(&distance(hand, b.position()))
                .then_with(|| a.name().cmp(b.name()))
        });
        nearby
    }
    /// A hand is busy while it holds something or something sits right
    /// next to it.
    pub fn busy(&self, manipulator: &Manipulator) -> bool {
        manipulator.held().is_some() || !self.nearby(manipulator).is_empty()
    }
    /// Whether any hand of the agent is busy.
    pub fn is_busy(&self, agent: &Agent) -> bool {
        agent.manipulators().iter().any(|m| self.busy(m))
    }

    /// Entities any manipulator of the agent can reach, sorted by name.
    pub fn objects_in_reach(&self, agent: &Agent) -> Vec<&Entity> {
        let mut objects = self
            .entities
            .iter()
            .filter(|e| agent.can_reach(e.position()))
            .collect::<Vec<_>>();
        objects.sort_by(|a, b| a.name().cmp(b.name()));
        objects
    }
}

impl Arbitrary for Scene {
    /// A table top with one two-handed robot and a handful of cups and
    /// bottles scattered in front of it, some possibly out of reach.
    fn random() -> Self {
        use rand::Rng;
        let ref mut rng = rand::rng();
        let robot = Robot::new("robot", [0.0, 0.0, 1.4])
            .with_manipulator(Manipulator::new("hand_left", [0.0, 0.25, 1.0]))
            .with_manipulator(Manipulator::new("hand_right", [0.0, -0.25, 1.0]));
        let table = Entity::new("table", [0.6, 0.0, 0.75])
            .with_radius(0.3)
            .supporting();
        let mut scene = Scene::default().with_agent(robot).with_entity(table);
        for i in 0..rng.random_range(2..6) {
            let kind = if rng.random_bool(0.5) { "cup" } else { "bottle" };
            let position = [
                rng.random_range(0.3..1.2),
                rng.random_range(-0.6..0.6),
                0.8,
            ];
            scene = scene.with_entity(
                Entity::new(&format!("{}_{}", kind, i), position)
                    .with_type(kind)
                    .graspable(),
            );
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::default()
            .with_agent(
                Robot::new("robot", [0., 0., 1.5])
                    .with_manipulator(Manipulator::new("hand", [0., 0., 1.0]).holding("pen")),
            )
            .with_entity(Entity::new("pen", [0., 0., 1.0]).graspable())
            .with_entity(Entity::new("cup", [0.8, 0., 1.0]).with_type("mug").graspable())
            .with_entity(Entity::new("box", [0.5, 0., 1.25]).with_radius(0.1))
            .with_entity(Entity::new("far", [3.0, 0., 1.0]))
    }

    #[test]
    fn fork_is_independent() {
        let scene = scene();
        let mut fork = scene.fork();
        fork.manipulator_mut("hand").map(|m| m.release());
        assert!(scene.is_held("pen"));
        assert!(!fork.is_held("pen"));
    }

    #[test]
    fn holding_relation() {
        let scene = scene();
        assert_eq!(scene.holder("pen").map(|m| m.name()), Some("hand"));
        assert!(scene.holder("cup").is_none());
        assert_eq!(scene.owner("hand").map(|a| a.name()), Some("robot"));
    }

    #[test]
    fn instances_by_name_and_type() {
        let scene = scene();
        assert_eq!(scene.instances("mug").count(), 1);
        assert_eq!(scene.instances("cup").count(), 1);
        assert_eq!(scene.instances("plate").count(), 0);
    }

    #[test]
    fn occlusion_by_box() {
        let scene = scene();
        let eye = [0., 0., 1.5];
        let cup = scene.entity("cup").expect("cup");
        let far = scene.entity("far").expect("far");
        assert_eq!(scene.occluder(&eye, cup).map(|e| e.name()), Some("box"));
        assert!(scene.occluder(&eye, far).is_none());
    }

    #[test]
    fn occluders_sorted_from_the_eye() {
        let scene = scene().with_entity(Entity::new("crate", [0.25, 0., 1.34375]));
        let cup = scene.entity("cup").expect("cup");
        let names = scene
            .occluders(&[0., 0., 1.5], cup)
            .into_iter()
            .map(|e| e.name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["crate", "box"]);
        assert_eq!(scene.occluder(&[0., 0., 1.5], cup).map(|e| e.name()), Some("crate"));
    }

    #[test]
    fn occluded_and_held_by_agent() {
        let scene = scene();
        let robot = scene.agent("robot").expect("robot");
        let occluded = scene.occluded(robot).into_iter().map(|e| e.name()).collect::<Vec<_>>();
        assert_eq!(occluded, vec!["cup"]);
        let held = scene.held_by(robot).into_iter().map(|e| e.name()).collect::<Vec<_>>();
        assert_eq!(held, vec!["pen"]);
    }

    #[test]
    fn busy_within_distance_of_hand() {
        let free = |entity: Entity| {
            Scene::default()
                .with_agent(Robot::new("robot", [0., 0., 1.5]).with_manipulator(Manipulator::new("hand", [0., 0., 1.0])))
                .with_entity(entity)
        };
        let close = free(Entity::new("sponge", [0.1, 0., 1.0]));
        let hand = close.manipulator("hand").expect("hand");
        assert!(close.busy(hand));
        assert_eq!(close.nearby(hand).iter().map(|e| e.name()).collect::<Vec<_>>(), vec!["sponge"]);
        assert!(close.is_busy(close.agent("robot").expect("robot")));
        let apart = free(Entity::new("sponge", [0.2, 0., 1.0]));
        let hand = apart.manipulator("hand").expect("hand");
        assert!(!apart.busy(hand));
        assert!(!apart.is_busy(apart.agent("robot").expect("robot")));
        let holding = scene();
        let hand = holding.manipulator("hand").expect("hand");
        assert!(holding.nearby(hand).is_empty());
        assert!(holding.busy(hand));
    }

    #[test]
    fn held_entities_do_not_occlude() {
        let scene = Scene::default()
            .with_agent(
                Robot::new("robot", [0., 0., 1.5])
                    .with_manipulator(Manipulator::new("hand", [0.5, 0., 1.25]).holding("box")),
            )
            .with_entity(Entity::new("box", [0.5, 0., 1.25]).with_radius(0.1))
            .with_entity(Entity::new("cup", [1.0, 0., 1.0]));
        let cup = scene.entity("cup").expect("cup");
        assert!(scene.occluder(&[0., 0., 1.5], cup).is_none());
    }

    #[test]
    fn reach_and_objects_in_reach() {
        let scene = scene();
        let hand = scene.manipulator("hand").expect("hand");
        let robot = scene.agent("robot").expect("robot");
        assert!(scene.reachable(hand, scene.entity("cup").expect("cup")));
        assert!(!scene.reachable(hand, scene.entity("far").expect("far")));
        let names = scene
            .objects_in_reach(robot)
            .into_iter()
            .map(|e| e.name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["box", "cup", "pen"]);
    }

    #[test]
    fn scene_from_json() {
        let json = r#"{
            "entities": [
                { "name": "cup_1", "types": ["cup"], "position": [0.5, 0, 0.8], "affordances": ["graspable"] },
                { "name": "table", "position": [0.6, 0, 0.75], "radius": 0.3, "affordances": ["supporting"] }
            ],
            "agents": [
                { "kind": "robot", "name": "robot", "eye": [0, 0, 1.4],
                  "manipulators": [{ "name": "hand", "base": [0, 0, 1.0] }] },
                { "kind": "human", "name": "alice", "head": [1.5, 0, 1.6], "visible": false }
            ]
        }"#;
        let scene = Scene::from_json(json).expect("valid scene");
        assert_eq!(scene.entities().len(), 2);
        assert_eq!(scene.robots().count(), 1);
        assert!(scene.entity("cup_1").expect("cup").affords(Affordance::Graspable));
        assert!(!scene.agent("alice").expect("alice").is_visible());
    }

    #[test]
    fn random_scene_is_well_formed() {
        let scene = Scene::random();
        assert_eq!(scene.robots().count(), 1);
        assert!(scene.entity("table").is_some());
        assert!(scene.entities().len() >= 3);
    }
}
