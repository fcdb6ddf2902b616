use crate::*;
use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Shared state of one planning call.
///
/// One job is one (parent, candidate) pair. Jobs run on a scoped rayon
/// pool and own their scene fork; only the arena and the early-exit
/// bound are shared, each behind its own lock.
pub(crate) struct Engine<'a, O: Oracle> {
    oracle: &'a O,
    sequence: &'a [String],
    search: &'a Search,
    timing: Timing,
    arena: Mutex<DiGraph<Prediction, usize>>,
    bound: Mutex<Option<Vec<usize>>>,
    halted: AtomicBool,
}

impl<'a, O: Oracle> Engine<'a, O> {
    pub fn new(oracle: &'a O, sequence: &'a [String], search: &'a Search) -> Self {
        Self {
            oracle,
            sequence,
            search,
            timing: search.timing(),
            arena: Mutex::new(DiGraph::default()),
            bound: Mutex::new(None),
            halted: AtomicBool::new(false),
        }
    }

    pub fn run(self, scene: &Scene) -> Result<PredictionTree, PlanError> {
        let first = self.sequence.first().ok_or(PlanError::EmptySequence)?;
        let resolution = Resolver.resolve(scene, first);
        if let Resolution::Unparsed(record) = resolution {
            log::warn!("cannot parse first action '{}': {}", first, record.reason());
            return Err(PlanError::Parse(record));
        }
        let threads = self.search.threads();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        log::info!(
            "planning {} actions on {} threads: {}",
            self.sequence.len(),
            threads,
            self.sequence.join("; ")
        );
        let start = std::time::Instant::now();
        let scene = Arc::new(scene.fork());
        let root = self.add(Prediction::root(scene.clone()), None);
        pool.scope(|scope| self.expand(scope, root, Vec::new(), scene, resolution));
        if self.search.is_cancelled() {
            log::warn!("planning cancelled after {:?}", start.elapsed());
            return Err(PlanError::Cancelled);
        }
        let graph = self.arena.into_inner().expect("arena lock");
        let tree = PredictionTree::from((reindex(graph), self.sequence.len()));
        log::info!(
            "planned {} nodes, {} solutions in {:?}",
            tree.len(),
            tree.solutions().len(),
            start.elapsed()
        );
        Ok(tree)
    }

    /// Spawns one job per candidate, or records the rejections as failed
    /// children when nothing can be grounded.
    fn expand<'s>(
        &'s self,
        scope: &rayon::Scope<'s>,
        parent: NodeIndex,
        key: Vec<usize>,
        scene: Arc<Scene>,
        resolution: Resolution,
    ) {
        let depth = key.len();
        match resolution {
            Resolution::Unparsed(record) => {
                log::warn!("'{}' does not parse below '{}'", self.sequence[depth], key_str(&key));
                let mut arena = self.arena.lock().expect("arena lock");
                arena[parent].abort(record);
            }
            Resolution::Grounded {
                candidates,
                rejected,
            } if candidates.is_empty() => {
                for (rank, record) in rejected.into_iter().enumerate() {
                    let key = child(&key, rank);
                    self.add(
                        Prediction::simulated(depth + 1, key, scene.clone(), record),
                        Some((parent, rank)),
                    );
                }
            }
            Resolution::Grounded { candidates, .. } => {
                // pushed right to left so that a lone worker pops them in discovery order
                for (rank, grounding) in candidates.into_iter().enumerate().rev() {
                    let key = child(&key, rank);
                    let scene = scene.clone();
                    scope.spawn(move |scope| self.attempt(scope, parent, rank, key, scene, grounding));
                }
            }
        }
    }

    /// Simulates one candidate on a fresh fork and keeps expanding below it.
    fn attempt<'s>(
        &'s self,
        scope: &rayon::Scope<'s>,
        parent: NodeIndex,
        rank: usize,
        key: Vec<usize>,
        scene: Arc<Scene>,
        grounding: Grounding,
    ) {
        if self.stopped() || self.beyond(&key) {
            return;
        }
        let depth = key.len();
        let (next, result) = self.oracle.simulate(scene.fork(), &grounding, self.timing);
        let next = Arc::new(next);
        let sentinel = !result.success() && self.sentinel(&grounding, depth);
        let success = result.success();
        let mut prediction = Prediction::simulated(depth, key.clone(), next.clone(), result);
        if sentinel {
            log::warn!("sentinel '{}' failed, halting search", grounding.command());
            prediction.halt();
            self.halted.store(true, Ordering::Relaxed);
        }
        if prediction.is_fatal() {
            log::warn!("fatal at {}: {}", grounding.command(), prediction.feedback().reason());
        }
        log::debug!("{:<12} {}", key_str(&key), prediction);
        let fatal = prediction.is_fatal();
        let index = self.add(prediction, Some((parent, rank)));
        match (success && !fatal, depth == self.sequence.len()) {
            (false, _) => {}
            (true, true) => self.solved(key),
            (true, false) => {
                let resolution = Resolver.resolve(&next, &self.sequence[depth]);
                self.expand(scope, index, key, next, resolution);
            }
        }
    }

    fn add(&self, prediction: Prediction, parent: Option<(NodeIndex, usize)>) -> NodeIndex {
        let mut arena = self.arena.lock().expect("arena lock");
        let index = arena.add_node(prediction);
        if let Some((parent, rank)) = parent {
            arena.add_edge(parent, index, rank);
        }
        index
    }

    /// Tightens the early-exit bound to the leftmost solution seen so far.
    fn solved(&self, key: Vec<usize>) {
        log::debug!("solution at {}", key_str(&key));
        let mut bound = self.bound.lock().expect("bound lock");
        if bound.as_ref().is_none_or(|b| key < *b) {
            *bound = Some(key);
        }
    }

    /// Whether a job lies right of the leftmost known solution.
    fn beyond(&self, key: &[usize]) -> bool {
        self.search.early_exit()
            && self
                .bound
                .lock()
                .expect("bound lock")
                .as_deref()
                .is_some_and(|b| key > b)
    }

    fn stopped(&self) -> bool {
        self.search.flag().load(Ordering::Relaxed) || self.halted.load(Ordering::Relaxed)
    }

    /// The sentinel matches either the grounded command or the raw token.
    fn sentinel(&self, grounding: &Grounding, depth: usize) -> bool {
        self.search
            .sentinel()
            .is_some_and(|s| s == grounding.command() || s == self.sequence[depth - 1])
    }
}

fn child(key: &[usize], rank: usize) -> Vec<usize> {
    let mut key = key.to_vec();
    key.push(rank);
    key
}

fn key_str(key: &[usize]) -> String {
    match key.is_empty() {
        true => "root".to_string(),
        false => key.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("."),
    }
}

/// Rebuilds the arena with node indices in discovery order, so that the
/// resulting tree is identical whichever worker created which node.
fn reindex(graph: DiGraph<Prediction, usize>) -> DiGraph<Prediction, usize> {
    let (nodes, edges) = graph.into_nodes_edges();
    let mut order = (0..nodes.len()).collect::<Vec<_>>();
    order.sort_by(|a, b| nodes[*a].weight.key().cmp(nodes[*b].weight.key()));
    let mut position = vec![0; nodes.len()];
    for (new, old) in order.iter().enumerate() {
        position[*old] = new;
    }
    let mut weights = nodes.into_iter().map(|n| Some(n.weight)).collect::<Vec<_>>();
    let mut tree = DiGraph::with_capacity(weights.len(), edges.len());
    for old in order {
        if let Some(weight) = weights[old].take() {
            tree.add_node(weight);
        }
    }
    let mut links = edges
        .into_iter()
        .map(|e| (position[e.source().index()], position[e.target().index()], e.weight))
        .collect::<Vec<_>>();
    links.sort_by_key(|(_, target, _)| *target);
    for (source, target, rank) in links {
        tree.add_edge(NodeIndex::new(source), NodeIndex::new(target), rank);
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::fixture;

    const STACK: [&str; 4] = ["get cup", "put cup table", "get cup", "put cup table"];

    /// Kinematic outcomes, except the listed commands which fail as scripted.
    fn failing(commands: &'static [&'static str], failure: Failure) -> impl Oracle {
        move |scene: Scene, grounding: &Grounding, timing: Timing| {
            match commands.iter().any(|c| *c == grounding.command()) {
                true => {
                    let result = ActionResult::fail(failure, grounding.command(), "scripted", "", "");
                    (scene, result)
                }
                false => KinematicOracle::default().simulate(scene, grounding, timing),
            }
        }
    }

    /// Fatal for the first gaze at cup_2; infeasible for every second gaze if `strict`.
    fn gazing(strict: bool) -> impl Oracle {
        move |scene: Scene, grounding: &Grounding, timing: Timing| {
            let looking = scene.agent("robot").and_then(|a| a.looking_at()).is_some();
            let command = grounding.command();
            match (looking, command) {
                (false, "gaze cup@cup_2") => {
                    let result = ActionResult::fail(Failure::Fatal, command, "camera fault", "", "");
                    (scene, result)
                }
                (true, _) if strict => {
                    let result = ActionResult::fail(Failure::Infeasible, command, "too slow", "", "");
                    (scene, result)
                }
                _ => KinematicOracle::default().simulate(scene, grounding, timing),
            }
        }
    }

    fn plan<O: Oracle>(oracle: &O, search: Search, scene: &Scene, sequence: &[&str]) -> PredictionTree {
        search.plan_tree(oracle, scene, sequence).expect("tree")
    }

    #[test]
    fn identical_across_thread_counts() {
        let scene = fixture::two_hands();
        let oracle = KinematicOracle::default();
        let one = plan(&oracle, Search::default().with_threads(1), &scene, &STACK);
        let many = plan(&oracle, Search::default().with_threads(8), &scene, &STACK);
        assert_eq!(one.solutions().len(), 16);
        assert_eq!(one.len(), many.len());
        assert_eq!(one.to_string(), many.to_string());
        assert_eq!(one.solution_path_strings(0), many.solution_path_strings(0));
        assert_eq!(one.solution_path_strings(15), many.solution_path_strings(15));
    }

    #[test]
    fn indices_follow_discovery_order() {
        let scene = fixture::two_hands();
        let tree = plan(&KinematicOracle::default(), Search::default().with_threads(8), &scene, &STACK);
        let keys = tree.all().map(|n| n.prediction().key().to_vec()).collect::<Vec<_>>();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        for node in tree.all().skip(1) {
            let parent = node.parent().expect("parent");
            assert!(parent.index() < node.index());
            assert_eq!(node.depth(), parent.depth() + 1);
            assert_eq!(node.rank(), node.prediction().key().last().copied());
        }
    }

    #[test]
    fn early_exit_keeps_first_solution() {
        let scene = fixture::two_hands();
        let oracle = KinematicOracle::default();
        let full = plan(&oracle, Search::default().with_threads(4), &scene, &STACK);
        for threads in [1, 8] {
            let early = plan(
                &oracle,
                Search::default().with_threads(threads).with_early_exit(true),
                &scene,
                &STACK,
            );
            assert_eq!(early.solution_path_strings(0), full.solution_path_strings(0));
            assert!(early.len() <= full.len());
        }
        let single = plan(
            &oracle,
            Search::default().with_threads(1).with_early_exit(true),
            &scene,
            &STACK,
        );
        assert_eq!(single.len(), STACK.len() + 1);
        let solutions = single.solutions();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].depth(), STACK.len());
        assert_eq!(single.solution_path_strings(0).len(), STACK.len());
        assert_eq!(single.solution_path_strings(0), full.solution_path_strings(0));
    }

    #[test]
    fn fatal_prunes_only_its_subtree() {
        let scene = fixture::two_cups();
        for threads in [1, 8] {
            let tree = plan(
                &gazing(false),
                Search::default().with_threads(threads),
                &scene,
                &["gaze cup", "gaze cup"],
            );
            let first = tree.root().children();
            assert_eq!(first.len(), 2);
            assert_eq!(first[0].command(), "gaze cup@cup_2");
            assert!(first[0].is_fatal());
            assert!(first[0].is_leaf());
            assert_eq!(first[1].children().len(), 2);
            assert_eq!(tree.solutions().len(), 2);
        }
    }

    #[test]
    fn fatal_sibling_stays_a_failure_leaf() {
        let tree = plan(
            &gazing(true),
            Search::default().with_threads(4),
            &fixture::two_cups(),
            &["gaze cup", "gaze cup"],
        );
        assert!(tree.solutions().is_empty());
        let depths = tree.failure_leaves().iter().map(|n| n.depth()).collect::<Vec<_>>();
        assert_eq!(depths, vec![1, 2, 2]);
    }

    #[test]
    fn soft_failures_do_not_stop_siblings() {
        let oracle = failing(&["gaze cup@cup_2"], Failure::Infeasible);
        let tree = plan(
            &oracle,
            Search::default().with_threads(1),
            &fixture::two_cups(),
            &["gaze cup", "gaze cup", "gaze cup"],
        );
        assert_eq!(tree.len(), 7);
        assert_eq!(
            tree.solution_path_strings(0),
            vec!["gaze cup@cup_1", "gaze cup@cup_1", "gaze cup@cup_1"]
        );
    }

    #[test]
    fn failing_sentinel_halts_search() {
        let oracle = failing(&["gaze cup@cup_2"], Failure::Infeasible);
        for sentinel in ["gaze cup@cup_2", "gaze cup"] {
            let tree = plan(
                &oracle,
                Search::default().with_threads(1).with_sentinel(Some(sentinel)),
                &fixture::two_cups(),
                &["gaze cup", "gaze cup", "gaze cup"],
            );
            assert_eq!(tree.len(), 2);
            let halted = tree.at(1).expect("sentinel node");
            assert!(halted.is_fatal());
            assert_eq!(halted.command(), "gaze cup@cup_2");
        }
    }

    #[test]
    fn succeeding_sentinel_changes_nothing() {
        let oracle = KinematicOracle::default();
        let scene = fixture::two_cups();
        let plain = plan(&oracle, Search::default(), &scene, &["get cup", "put cup table"]);
        let watched = plan(
            &oracle,
            Search::default().with_sentinel(Some("get cup")),
            &scene,
            &["get cup", "put cup table"],
        );
        assert_eq!(plain.to_string(), watched.to_string());
    }

    #[test]
    fn root_parse_error_aborts() {
        let result = Search::default().plan_tree(&KinematicOracle::default(), &fixture::table_top(), &["dance"]);
        match result {
            Err(PlanError::Parse(record)) => assert_eq!(record.failure(), Some(Failure::Parse)),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn nested_parse_error_is_fatal_at_its_node() {
        let tree = plan(
            &KinematicOracle::default(),
            Search::default(),
            &fixture::table_top(),
            &["get cup", "dance"],
        );
        let node = tree.at(1).expect("depth one");
        assert!(node.is_fatal());
        assert!(node.is_leaf());
        assert_eq!(node.feedback().failure(), Some(Failure::Parse));
        assert_eq!(tree.failure_leaves(), vec![node]);
    }

    #[test]
    fn empty_sequence_is_an_error() {
        let empty: [&str; 0] = [];
        let result = Search::default().plan_tree(&KinematicOracle::default(), &fixture::table_top(), &empty);
        assert!(matches!(result, Err(PlanError::EmptySequence)));
    }

    #[test]
    fn cancelled_before_start() {
        let search = Search::default();
        search.cancel();
        let result = search.plan_tree(&KinematicOracle::default(), &fixture::table_top(), &["get cup"]);
        assert!(matches!(result, Err(PlanError::Cancelled)));
    }

    #[test]
    fn ungroundable_step_becomes_failed_child() {
        let tree = plan(&KinematicOracle::default(), Search::default(), &fixture::table_top(), &["get plate"]);
        assert_eq!(tree.len(), 2);
        let node = tree.at(1).expect("child");
        assert_eq!(node.command(), "get plate");
        assert_eq!(node.feedback().failure(), Some(Failure::Exhausted));
        assert!(!node.is_fatal());
    }

    #[test]
    fn pinned_tokens_bind_their_instance() {
        let tree = plan(
            &KinematicOracle::default(),
            Search::default(),
            &fixture::two_cups(),
            &["get cup@cup_1", "put cup table"],
        );
        assert_eq!(tree.solutions().len(), 1);
        assert_eq!(
            tree.solution_path_strings(0),
            vec!["get cup@cup_1", "put cup@cup_1 table"]
        );
    }

    #[test]
    fn scaling_reaches_the_oracle() {
        let tree = plan(
            &KinematicOracle::default(),
            Search::default().with_scaling(1000.0),
            &fixture::table_top(),
            &["get cup"],
        );
        assert!(tree.solutions().is_empty());
        assert_eq!(tree.failure_leaves()[0].feedback().failure(), Some(Failure::Infeasible));
    }

    #[test]
    fn forks_keep_branches_apart() {
        let scene = fixture::two_cups();
        let tree = plan(&KinematicOracle::default(), Search::default(), &scene, &["get cup"]);
        let held = tree
            .root()
            .children()
            .iter()
            .map(|n| n.scene().manipulator("hand").and_then(|m| m.held()).map(String::from))
            .collect::<Vec<_>>();
        assert_eq!(held, vec![Some("cup_2".to_string()), Some("cup_1".to_string())]);
        assert!(!tree.root().scene().is_held("cup_1"));
        assert_eq!(tree.root().scene(), &scene);
    }
}
