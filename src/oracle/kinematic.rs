use crate::*;

/// Reference oracle: symbolic effects with a straight-line duration model.
///
/// It re-validates the grounding against the scene it is handed, because
/// a candidate that was valid at resolution time is simulated on a fork
/// that may differ (the scene file changed, another effect moved things).
/// References to entities or effectors that do not exist are fatal;
/// violated preconditions and overlong predictions are infeasible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicOracle {
    speed: f64,
    max_duration: Seconds,
}

impl Default for KinematicOracle {
    fn default() -> Self {
        Self {
            speed: MANIPULATOR_SPEED,
            max_duration: MAX_ACTION_DURATION,
        }
    }
}

impl KinematicOracle {
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
    pub fn with_max_duration(mut self, max_duration: Seconds) -> Self {
        self.max_duration = max_duration;
        self
    }
    pub fn speed(&self) -> f64 {
        self.speed
    }
    pub fn max_duration(&self) -> Seconds {
        self.max_duration
    }

    fn get(&self, scene: &mut Scene, cmd: &str, hand: &str, object: &str, timing: Timing) -> Result<Seconds, ActionResult> {
        let m = scene.manipulator(hand).ok_or_else(|| unknown(cmd, "manipulator", hand))?;
        let e = scene.entity(object).ok_or_else(|| unknown(cmd, "entity", object))?;
        if let Some(holder) = scene.holder(object) {
            return Err(infeasible(cmd, &format!("The {} is held by the {}", object, holder.name()), "", ""));
        }
        if let Some(held) = m.held() {
            return Err(infeasible(cmd, &format!("The {} is holding the {}", hand, held), "", ""));
        }
        if !scene.reachable(m, e) {
            return Err(infeasible(cmd, &format!("The {} cannot reach the {}", hand, object), "", ""));
        }
        let target = *e.position();
        let duration = self.check(cmd, timing.duration(distance(m.position(), &target) / self.speed))?;
        if let Some(m) = scene.manipulator_mut(hand) {
            m.grasp(object);
            m.move_to(target);
        }
        Ok(duration)
    }

    fn put(
        &self,
        scene: &mut Scene,
        cmd: &str,
        hand: &str,
        object: &str,
        surface: &str,
        timing: Timing,
    ) -> Result<Seconds, ActionResult> {
        let m = scene.manipulator(hand).ok_or_else(|| unknown(cmd, "manipulator", hand))?;
        let o = scene.entity(object).ok_or_else(|| unknown(cmd, "entity", object))?;
        let s = scene.entity(surface).ok_or_else(|| unknown(cmd, "entity", surface))?;
        if m.held() != Some(object) {
            return Err(infeasible(cmd, &format!("The {} is not holding the {}", hand, object), "", ""));
        }
        if !scene.reachable(m, s) {
            return Err(infeasible(cmd, &format!("The {} cannot reach the {}", hand, surface), "", ""));
        }
        let [x, y, z] = *s.position();
        let target = [x, y, z + s.radius() + o.radius()];
        let duration = self.check(cmd, timing.duration(distance(m.position(), &target) / self.speed))?;
        if let Some(m) = scene.manipulator_mut(hand) {
            m.release();
            m.retract();
        }
        if let Some(o) = scene.entity_mut(object) {
            o.move_to(target);
        }
        Ok(duration)
    }

    fn gaze(&self, scene: &mut Scene, cmd: &str, agent: &str, target: &str, timing: Timing) -> Result<Seconds, ActionResult> {
        scene.entity(target).ok_or_else(|| unknown(cmd, "entity", target))?;
        let duration = self.check(cmd, timing.duration(GAZE_DURATION))?;
        match scene.agent_mut(agent) {
            Some(Agent::Robot(robot)) => robot.look_at(target),
            Some(Agent::Human(_)) => return Err(fatal(cmd, &format!("The {} is not a robot", agent))),
            None => return Err(unknown(cmd, "agent", agent)),
        }
        Ok(duration)
    }

    fn check(&self, cmd: &str, duration: Seconds) -> Result<Seconds, ActionResult> {
        match duration > self.max_duration {
            false => Ok(duration),
            true => Err(infeasible(
                cmd,
                "The motion takes too long",
                "Reduce the duration scaling",
                &format!("predicted {:.2}s > limit {:.2}s", duration, self.max_duration),
            )),
        }
    }
}

impl Oracle for KinematicOracle {
    fn simulate(&self, mut scene: Scene, grounding: &Grounding, timing: Timing) -> (Scene, ActionResult) {
        let cmd = grounding.command();
        let outcome = match grounding.binding() {
            Binding::Get {
                manipulator,
                object,
            } => self.get(&mut scene, cmd, manipulator, object, timing),
            Binding::Put {
                manipulator,
                object,
                surface,
            } => self.put(&mut scene, cmd, manipulator, object, surface, timing),
            Binding::Gaze { agent, target } => self.gaze(&mut scene, cmd, agent, target, timing),
        };
        let result = match outcome {
            Ok(duration) => ActionResult::new(SUCCESS, cmd, "", "", &format!("duration {:.2}s", duration)),
            Err(result) => result,
        };
        (scene, result)
    }
}

fn unknown(cmd: &str, what: &str, name: &str) -> ActionResult {
    fatal(cmd, &format!("Unknown {} '{}'", what, name))
}

fn fatal(cmd: &str, reason: &str) -> ActionResult {
    ActionResult::fail(Failure::Fatal, cmd, reason, "Check the scene description", "")
}

fn infeasible(cmd: &str, reason: &str, suggestion: &str, developer: &str) -> ActionResult {
    ActionResult::fail(Failure::Infeasible, cmd, reason, suggestion, developer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::fixture;

    fn grounding(scene: &Scene, token: &str) -> Grounding {
        Resolver
            .resolve(scene, token)
            .candidates()
            .first()
            .cloned()
            .expect("at least one candidate")
    }

    #[test]
    fn get_attaches_and_moves_hand() {
        let scene = fixture::table_top();
        let get = grounding(&scene, "get cup");
        let (next, result) = KinematicOracle::default().simulate(scene.fork(), &get, Timing::default());
        assert!(result.success());
        assert_eq!(result.command(), "get cup@cup_1");
        assert_eq!(next.holder("cup_1").map(|m| m.name()), Some("hand"));
        let hand = next.manipulator("hand").expect("hand");
        assert_eq!(hand.position(), scene.entity("cup_1").expect("cup").position());
        assert!(!scene.is_held("cup_1"));
    }

    #[test]
    fn put_places_on_top() {
        let oracle = KinematicOracle::default();
        let scene = fixture::table_top();
        let (scene, _) = oracle.simulate(scene.fork(), &grounding(&scene, "get cup"), Timing::default());
        let put = grounding(&scene, "put cup table");
        let (next, result) = oracle.simulate(scene.fork(), &put, Timing::default());
        assert!(result.success());
        assert!(!next.is_held("cup_1"));
        let cup = next.entity("cup_1").expect("cup");
        assert!((cup.position()[2] - (0.7 + 0.3 + DEFAULT_RADIUS)).abs() < 1e-9);
        let hand = next.manipulator("hand").expect("hand");
        assert_eq!(hand.position(), hand.base());
        assert!(!next.busy(hand));
    }

    #[test]
    fn unknown_reference_is_fatal() {
        let scene = fixture::table_top();
        let bogus = Grounding::new(
            Binding::Get {
                manipulator: "tentacle".to_string(),
                object: "cup_1".to_string(),
            },
            "get cup@cup_1 tentacle".to_string(),
            0.0,
        );
        let (_, result) = KinematicOracle::default().simulate(scene, &bogus, Timing::default());
        assert_eq!(result.failure(), Some(Failure::Fatal));
        assert!(result.is_fatal());
    }

    #[test]
    fn violated_precondition_is_infeasible() {
        let mut scene = fixture::table_top();
        let get = grounding(&scene, "get cup");
        scene.manipulator_mut("hand").map(|m| m.grasp("table"));
        let (_, result) = KinematicOracle::default().simulate(scene, &get, Timing::default());
        assert_eq!(result.failure(), Some(Failure::Infeasible));
        assert!(!result.is_fatal());
    }

    #[test]
    fn scaling_past_the_limit_is_infeasible() {
        let scene = fixture::table_top();
        let get = grounding(&scene, "get cup");
        let oracle = KinematicOracle::default().with_max_duration(2.0);
        let (_, fast) = oracle.simulate(scene.fork(), &get, Timing::new(0.01, 1.0));
        let (_, slow) = oracle.simulate(scene.fork(), &get, Timing::new(0.01, 100.0));
        assert!(fast.success());
        assert_eq!(slow.failure(), Some(Failure::Infeasible));
        assert!(slow.developer().contains("limit"));
    }

    #[test]
    fn gaze_turns_the_robot() {
        let scene = fixture::table_top();
        let gaze = grounding(&scene, "gaze table");
        let (next, result) = KinematicOracle::default().simulate(scene, &gaze, Timing::default());
        assert!(result.success());
        assert_eq!(next.agent("robot").and_then(|a| a.looking_at()), Some("table"));
    }

    #[test]
    fn simulation_is_deterministic() {
        let scene = fixture::two_cups();
        let get = grounding(&scene, "get cup");
        let oracle = KinematicOracle::default();
        let a = oracle.simulate(scene.fork(), &get, Timing::default());
        let b = oracle.simulate(scene.fork(), &get, Timing::default());
        assert_eq!(a, b);
    }
}
