//! Small hand-built scenes shared by the unit tests.
use crate::*;

/// One robot with a single hand in front of a table with one cup on it.
pub fn table_top() -> Scene {
    Scene::default()
        .with_agent(
            Robot::new("robot", [0.0, 0.0, 1.4])
                .with_manipulator(Manipulator::new("hand", [0.0, 0.0, 1.0])),
        )
        .with_entity(Entity::new("table", [0.6, 0.0, 0.7]).with_radius(0.3).supporting())
        .with_entity(Entity::new("cup_1", [0.5, 0.25, 0.8]).with_type("cup").graspable())
}

/// [`table_top`] with a second cup closer to the hand.
pub fn two_cups() -> Scene {
    table_top().with_entity(Entity::new("cup_2", [0.3, -0.15, 0.8]).with_type("cup").graspable())
}

/// [`table_top`] with a box between the robot's eye and the table.
pub fn occluded() -> Scene {
    table_top().with_entity(Entity::new("box", [0.3, 0.0, 1.05]).with_radius(0.1))
}

/// Two-handed robot, table and two cups: every `get cup` has four bindings.
pub fn two_hands() -> Scene {
    Scene::default()
        .with_agent(
            Robot::new("robot", [0.0, 0.0, 1.4])
                .with_manipulator(Manipulator::new("hand_left", [0.0, 0.25, 1.0]))
                .with_manipulator(Manipulator::new("hand_right", [0.0, -0.25, 1.0])),
        )
        .with_entity(Entity::new("table", [0.6, 0.0, 0.7]).with_radius(0.3).supporting())
        .with_entity(Entity::new("cup_1", [0.5, 0.25, 0.8]).with_type("cup").graspable())
        .with_entity(Entity::new("cup_2", [0.3, -0.15, 0.8]).with_type("cup").graspable())
}
