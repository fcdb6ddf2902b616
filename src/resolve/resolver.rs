use crate::*;

/// Grounds abstract action tokens against a scene.
///
/// Every binding of the token's arguments to scene entities (and of the
/// action to a robot effector) is checked against the predicate model.
/// Bindings that pass become candidates, ranked by [`Grounding::rank`];
/// bindings that fail are kept as diagnostic records in the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver;

/// A considered binding, either accepted or rejected with a record.
type Verdict = (Grounding, Option<ActionResult>);

impl Resolver {
    pub fn resolve(&self, scene: &Scene, token: &str) -> Resolution {
        let action = match Action::try_from(token) {
            Ok(action) => action,
            Err(reason) => {
                log::debug!("'{}' does not parse: {}", token, reason);
                return Resolution::Unparsed(ActionResult::fail(
                    Failure::Parse,
                    token.trim(),
                    &reason,
                    "Use one of: get <object> [<hand>], put <object> <surface>, gaze <entity>",
                    "",
                ));
            }
        };
        let verdicts = match &action {
            Action::Get {
                object,
                manipulator,
            } => self.get(scene, &action, object, manipulator.as_deref()),
            Action::Put { object, surface } => self.put(scene, &action, object, surface),
            Action::Gaze { target, agent } => self.gaze(scene, &action, target, agent.as_deref()),
        };
        let resolution = match verdicts {
            Ok(verdicts) => Self::split(&action, verdicts),
            Err(record) => Resolution::Grounded {
                candidates: Vec::new(),
                rejected: vec![record],
            },
        };
        log::debug!(
            "resolved '{}' into {} candidates ({} rejected)",
            token.trim(),
            resolution.candidates().len(),
            resolution.rejected().len()
        );
        resolution
    }

    /// Orders every verdict by rank and separates the accepted from the rejected.
    fn split(action: &Action, mut verdicts: Vec<Verdict>) -> Resolution {
        verdicts.sort_by(|(a, _), (b, _)| a.rank(b));
        let mut candidates = Vec::new();
        let mut rejected = Vec::new();
        for (grounding, verdict) in verdicts {
            match verdict {
                None => candidates.push(grounding),
                Some(record) => rejected.push(record),
            }
        }
        if candidates.is_empty() && rejected.is_empty() {
            rejected.push(ActionResult::fail(
                Failure::Exhausted,
                &action.to_string(),
                &format!("Nothing in the scene can {}", action.verb()),
                "Check that the scene contains a robot",
                "",
            ));
        }
        Resolution::Grounded {
            candidates,
            rejected,
        }
    }

    fn get(
        &self,
        scene: &Scene,
        action: &Action,
        object: &Argument,
        hand: Option<&str>,
    ) -> Result<Vec<Verdict>, ActionResult> {
        let manipulators = scene
            .robots()
            .flat_map(|agent| agent.manipulators().iter().map(move |m| (agent, m)))
            .collect::<Vec<_>>();
        let explicit = hand.is_some() || manipulators.len() > 1;
        let names = manipulators.iter().map(|(_, m)| m.name()).collect::<Vec<_>>();
        let manipulators = manipulators
            .iter()
            .copied()
            .filter(|(_, m)| hand.is_none_or(|h| h == m.name()))
            .collect::<Vec<_>>();
        Self::known(action, "manipulator", hand, &names, manipulators.is_empty())?;
        let objects = scene
            .instances(object.token())
            .filter(|e| object.admits(e))
            .collect::<Vec<_>>();
        Self::present(action, object, &objects)?;
        let mut verdicts = Vec::new();
        for (agent, m) in manipulators.iter() {
            for e in objects.iter() {
                let command = match explicit {
                    true => format!("get {} {}", object.bind(e.name()), m.name()),
                    false => format!("get {}", object.bind(e.name())),
                };
                let reject = |reason: String, suggestion: String, developer: String| {
                    Some(ActionResult::fail(
                        Failure::Exhausted,
                        &command,
                        &reason,
                        &suggestion,
                        &developer,
                    ))
                };
                let verdict = if !e.affords(Affordance::Graspable) {
                    reject(
                        format!("The {} cannot be grasped", e),
                        "Choose an object that can be picked up".to_string(),
                        String::new(),
                    )
                } else if let Some(holder) = scene.holder(e.name()) {
                    reject(
                        format!("The {} is already held by {}", e, holder.name()),
                        format!("Free the {} first", holder.name()),
                        String::new(),
                    )
                } else if let Some(held) = m.held() {
                    reject(
                        format!("The {} is already holding the {}", m.name(), held),
                        format!("Put the {} down first", held),
                        String::new(),
                    )
                } else if let Some(near) = scene.nearby(m).into_iter().find(|n| n.name() != e.name()) {
                    reject(
                        format!("The {} is busy next to the {}", m.name(), near),
                        format!("Move the {} away from the {}", near, m.name()),
                        format!(
                            "distance {:.2} < {:.2}",
                            distance(m.position(), near.position()),
                            BUSY_DISTANCE
                        ),
                    )
                } else if !scene.reachable(m, e) {
                    reject(
                        format!("The {} is out of reach of the {}", e, m.name()),
                        Self::in_reach(scene, agent),
                        format!(
                            "distance {:.2} > reach {:.2}",
                            distance(m.base(), e.position()),
                            m.reach()
                        ),
                    )
                } else if let Some(occluder) = scene.occluder(agent.eye(), e) {
                    reject(
                        format!("The {} is occluded by the {}", e, occluder),
                        format!("Move the {} out of the way", occluder),
                        String::new(),
                    )
                } else {
                    None
                };
                let binding = Binding::Get {
                    manipulator: m.name().to_string(),
                    object: e.name().to_string(),
                };
                let d = distance(m.position(), e.position());
                verdicts.push((Grounding::new(binding, command, d), verdict));
            }
        }
        Ok(verdicts)
    }

    fn put(
        &self,
        scene: &Scene,
        action: &Action,
        object: &Argument,
        surface: &Argument,
    ) -> Result<Vec<Verdict>, ActionResult> {
        let holders = scene
            .robots()
            .flat_map(|agent| agent.manipulators().iter().map(move |m| (agent, m)))
            .filter_map(|(agent, m)| {
                m.held()
                    .and_then(|held| scene.entity(held))
                    .filter(|held| object.admits(held))
                    .map(|held| (agent, m, held))
            })
            .collect::<Vec<_>>();
        if holders.is_empty() {
            let objects = scene
                .instances(object.token())
                .filter(|e| object.admits(e))
                .collect::<Vec<_>>();
            Self::present(action, object, &objects)?;
            let held = scene
                .robots()
                .flat_map(|agent| scene.held_by(agent))
                .map(|e| e.name())
                .collect::<Vec<_>>();
            return Err(ActionResult::fail(
                Failure::Exhausted,
                &action.to_string(),
                &format!("The robot is not holding the {}", object.token()),
                &format!("Get the {} first", object.token()),
                &match held.is_empty() {
                    true => "holding nothing".to_string(),
                    false => format!("holding {}", held.join(", ")),
                },
            ));
        }
        let surfaces = scene
            .instances(surface.token())
            .filter(|e| surface.admits(e))
            .filter(|e| holders.iter().all(|(_, _, held)| held.name() != e.name()))
            .collect::<Vec<_>>();
        Self::present(action, surface, &surfaces)?;
        let mut verdicts = Vec::new();
        for (agent, m, held) in holders.iter() {
            for s in surfaces.iter() {
                let command = format!("put {} {}", object.bind(held.name()), surface.bind(s.name()));
                let reject = |reason: String, suggestion: String, developer: String| {
                    Some(ActionResult::fail(
                        Failure::Exhausted,
                        &command,
                        &reason,
                        &suggestion,
                        &developer,
                    ))
                };
                let verdict = if !s.affords(Affordance::Supporting) {
                    reject(
                        format!("Nothing can be put on the {}", s),
                        "Choose a table, shelf or tray".to_string(),
                        String::new(),
                    )
                } else if let Some(holder) = scene.holder(s.name()) {
                    reject(
                        format!("The {} is held by {}", s, holder.name()),
                        format!("Wait until the {} is put down", s),
                        String::new(),
                    )
                } else if !scene.reachable(m, s) {
                    reject(
                        format!("The {} is out of reach of the {}", s, m.name()),
                        Self::in_reach(scene, agent),
                        format!(
                            "distance {:.2} > reach {:.2}",
                            distance(m.base(), s.position()),
                            m.reach()
                        ),
                    )
                } else if let Some(occluder) = scene.occluder(agent.eye(), s) {
                    reject(
                        format!("The {} is occluded by the {}", s, occluder),
                        format!("Move the {} out of the way", occluder),
                        String::new(),
                    )
                } else {
                    None
                };
                let binding = Binding::Put {
                    manipulator: m.name().to_string(),
                    object: held.name().to_string(),
                    surface: s.name().to_string(),
                };
                let d = distance(m.position(), s.position());
                verdicts.push((Grounding::new(binding, command, d), verdict));
            }
        }
        Ok(verdicts)
    }

    fn gaze(
        &self,
        scene: &Scene,
        action: &Action,
        target: &Argument,
        robot: Option<&str>,
    ) -> Result<Vec<Verdict>, ActionResult> {
        let robots = scene.robots().collect::<Vec<_>>();
        let explicit = robot.is_some() || robots.len() > 1;
        let names = robots.iter().map(|agent| agent.name()).collect::<Vec<_>>();
        let robots = robots
            .iter()
            .copied()
            .filter(|agent| robot.is_none_or(|r| r == agent.name()))
            .collect::<Vec<_>>();
        Self::known(action, "robot", robot, &names, robots.is_empty())?;
        let targets = scene
            .instances(target.token())
            .filter(|e| target.admits(e))
            .collect::<Vec<_>>();
        Self::present(action, target, &targets)?;
        let mut verdicts = Vec::new();
        for agent in robots.iter() {
            for t in targets.iter() {
                let command = match explicit {
                    true => format!("gaze {} {}", target.bind(t.name()), agent.name()),
                    false => format!("gaze {}", target.bind(t.name())),
                };
                let verdict = scene.occluder(agent.eye(), t).map(|occluder| {
                    ActionResult::fail(
                        Failure::Exhausted,
                        &command,
                        &format!("The {} is occluded by the {}", t, occluder),
                        &format!("Move the {} out of the way", occluder),
                        "",
                    )
                });
                let binding = Binding::Gaze {
                    agent: agent.name().to_string(),
                    target: t.name().to_string(),
                };
                let d = distance(agent.eye(), t.position());
                verdicts.push((Grounding::new(binding, command, d), verdict));
            }
        }
        Ok(verdicts)
    }

    /// Single rejection for the whole action when no entity matches the argument.
    fn present(action: &Action, argument: &Argument, matches: &[&Entity]) -> Result<(), ActionResult> {
        match matches.is_empty() {
            false => Ok(()),
            true => Err(ActionResult::fail(
                Failure::Exhausted,
                &action.to_string(),
                &format!("There is no {} in the scene", argument),
                &format!("Check that the {} is visible to the robot", argument.token()),
                "",
            )),
        }
    }

    /// Single rejection when an explicitly named effector does not exist.
    fn known(action: &Action, kind: &str, name: Option<&str>, names: &[&str], missing: bool) -> Result<(), ActionResult> {
        match (name, missing) {
            (Some(name), true) => Err(ActionResult::fail(
                Failure::Exhausted,
                &action.to_string(),
                &format!("There is no {} named {}", kind, name),
                &match names.is_empty() {
                    true => "Check that the scene contains a robot".to_string(),
                    false => format!("Available are: {}", names.join(", ")),
                },
                "",
            )),
            _ => Ok(()),
        }
    }

    fn in_reach(scene: &Scene, agent: &Agent) -> String {
        let names = scene
            .objects_in_reach(agent)
            .iter()
            .map(|e| e.name())
            .collect::<Vec<_>>();
        match names.is_empty() {
            true => "Move the object closer to the robot".to_string(),
            false => format!("Objects in reach are: {}", names.join(", ")),
        }
    }
}
