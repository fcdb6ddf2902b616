use crate::*;
use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;

/// A lightweight handle to a node in the prediction tree.
///
/// Stores only an index and a reference to the underlying graph, so
/// handles are cheap to copy and never outlive the tree they point into.
///
/// # Navigation
///
/// - `parent()`: The node one action earlier
/// - `children()`: Direct children in discovery order
/// - `ancestors()`: Parents up to and including the root
/// - `leaves()`: All leaves below this node in discovery order
#[derive(Copy, Clone)]
pub struct Node<'tree> {
    index: NodeIndex,
    graph: &'tree DiGraph<Prediction, usize>,
}

impl<'tree> From<(NodeIndex, &'tree DiGraph<Prediction, usize>)> for Node<'tree> {
    fn from((index, graph): (NodeIndex, &'tree DiGraph<Prediction, usize>)) -> Self {
        Self { index, graph }
    }
}

impl<'tree> Node<'tree> {
    /// Position in discovery order; the root is 0.
    pub fn index(&self) -> usize {
        self.index.index()
    }
    pub fn prediction(&self) -> &'tree Prediction {
        &self.graph[self.index]
    }
    pub fn depth(&self) -> usize {
        self.prediction().depth()
    }
    pub fn command(&self) -> &'tree str {
        self.prediction().command()
    }
    pub fn scene(&self) -> &'tree Scene {
        self.prediction().scene()
    }
    pub fn feedback(&self) -> &'tree ActionResult {
        self.prediction().feedback()
    }
    pub fn is_fatal(&self) -> bool {
        self.prediction().is_fatal()
    }
    pub fn is_leaf(&self) -> bool {
        self.width() == 0
    }
    /// Count of direct children (no allocation).
    pub fn width(&self) -> usize {
        self.graph
            .neighbors_directed(self.index, petgraph::Direction::Outgoing)
            .count()
    }
    /// Parent node (None if this is the root).
    pub fn parent(&self) -> Option<Node<'tree>> {
        self.graph
            .neighbors_directed(self.index, petgraph::Direction::Incoming)
            .next()
            .map(|index| Self::from((index, self.graph)))
    }
    /// Candidate rank of the edge leading here (None at the root).
    pub fn rank(&self) -> Option<usize> {
        self.graph
            .edges_directed(self.index, petgraph::Direction::Incoming)
            .next()
            .map(|edge| *edge.weight())
    }
    /// Direct children, ordered as the resolver ranked them.
    pub fn children(&self) -> Vec<Node<'tree>> {
        let mut children = self
            .graph
            .neighbors_directed(self.index, petgraph::Direction::Outgoing)
            .map(|index| Self::from((index, self.graph)))
            .collect::<Vec<_>>();
        children.sort_by_key(|child| child.index());
        children
    }
    /// Parents from the nearest up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'tree>> {
        std::iter::successors(self.parent(), |node| node.parent())
    }
    /// All leaf nodes reachable from this node (recursive).
    pub fn leaves(&self) -> Vec<Node<'tree>> {
        match self.width() {
            0 => vec![*self],
            _ => self.children().iter().flat_map(Self::leaves).collect(),
        }
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}/{})",
            self.prediction(),
            self.index(),
            self.graph.node_count()
        )
    }
}

/// Two handles are equal when they point at the same node of the same tree.
impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && std::ptr::eq(self.graph, other.graph)
    }
}
impl Eq for Node<'_> {}
