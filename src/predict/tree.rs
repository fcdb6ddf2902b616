use crate::*;
use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;

/// The result of one planning call: every grounding that was tried.
///
/// Node indices follow depth-first, left-to-right discovery order, so the
/// root is always index 0 and the tree compares equal across thread
/// counts. Leaves at the full sequence length whose action succeeded are
/// solutions; every other leaf that failed is a diagnosis candidate.
///
/// # Queries
///
/// - `solution_path_strings(i)`: Commands of the i-th solution
/// - `solution_path(i, include_root)`: The same as [`Node`] handles
/// - `leaf_nodes(only_successful)`: Leaves in discovery order
/// - `failure_leaves()`: Leaves that ended in a failure
#[derive(Debug)]
pub struct PredictionTree {
    graph: DiGraph<Prediction, usize>,
    length: usize,
}

impl From<(DiGraph<Prediction, usize>, usize)> for PredictionTree {
    fn from((graph, length): (DiGraph<Prediction, usize>, usize)) -> Self {
        Self { graph, length }
    }
}

impl PredictionTree {
    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
    /// Length of the planned sequence.
    pub fn length(&self) -> usize {
        self.length
    }
    /// Deepest level any branch reached.
    pub fn depth(&self) -> usize {
        self.all().map(|n| n.depth()).max().unwrap_or(0)
    }
    pub fn root(&self) -> Node<'_> {
        Node::from((NodeIndex::new(0), &self.graph))
    }
    pub fn at(&self, index: usize) -> Option<Node<'_>> {
        (index < self.len()).then(|| Node::from((NodeIndex::new(index), &self.graph)))
    }
    /// Every node in discovery order.
    pub fn all(&self) -> impl Iterator<Item = Node<'_>> {
        self.graph.node_indices().map(|n| Node::from((n, &self.graph)))
    }

    /// Whether the node ends a branch that executes the whole sequence.
    pub fn is_solution(&self, node: &Node) -> bool {
        node.is_leaf()
            && node.depth() == self.length
            && node.prediction().status() == Status::Success
            && !node.is_fatal()
    }
    pub fn leaf_nodes(&self, only_successful: bool) -> Vec<Node<'_>> {
        self.all()
            .filter(|n| n.is_leaf())
            .filter(|n| !only_successful || self.is_solution(n))
            .collect()
    }
    pub fn solutions(&self) -> Vec<Node<'_>> {
        self.leaf_nodes(true)
    }
    /// Leaves whose last action failed or was pruned as fatal.
    ///
    /// Branches abandoned by early exit or a halted search end in a
    /// successful node without children; those are neither solutions nor
    /// failures.
    pub fn failure_leaves(&self) -> Vec<Node<'_>> {
        self.all()
            .filter(|n| n.is_leaf())
            .filter(|n| n.prediction().failed())
            .collect()
    }

    /// Nodes from the root (optionally skipped) down to `node`.
    pub fn path<'tree>(&'tree self, node: Node<'tree>, include_root: bool) -> Vec<Node<'tree>> {
        let mut path = std::iter::once(node)
            .chain(node.ancestors())
            .filter(|n| include_root || n.depth() > 0)
            .collect::<Vec<_>>();
        path.reverse();
        path
    }
    /// Nodes along the `index`-th solution; empty if there is no such solution.
    pub fn solution_path(&self, index: usize, include_root: bool) -> Vec<Node<'_>> {
        self.solutions()
            .get(index)
            .map(|leaf| self.path(*leaf, include_root))
            .unwrap_or_default()
    }
    /// Grounded commands along the `index`-th solution.
    pub fn solution_path_strings(&self, index: usize) -> Vec<String> {
        self.solution_path(index, false)
            .iter()
            .map(|n| n.command().to_string())
            .collect()
    }

    /// display the Tree in a human-readable format
    fn show(&self, f: &mut std::fmt::Formatter, node: Node, prefix: &str) -> std::fmt::Result {
        if node.depth() == 0 {
            writeln!(f, "{}", node.prediction())?;
        }
        let children = node.children();
        let n = children.len();
        for (i, child) in children.into_iter().enumerate() {
            let last = i == n - 1;
            let gaps = if last { "    " } else { "│   " };
            let stem = if last { "└" } else { "├" };
            writeln!(f, "{}{}──{}", prefix, stem, child.prediction())?;
            self.show(f, child, &format!("{}{}", prefix, gaps))?;
        }
        Ok(())
    }
}

impl std::fmt::Display for PredictionTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.show(f, self.root(), "")
    }
}
