use crate::error::BuildError;
use crate::{EdgeId, NodeId};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// A list of adjacent edge IDs.
pub type EdgeList = SmallVec<[EdgeId; 4]>;

/// A directed link or turning movement in the source network.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// The edge ID.
    pub id: EdgeId,
    /// The network node the edge starts at.
    pub from_node: NodeId,
    /// The network node the edge ends at.
    pub to_node: NodeId,
    /// The edges permitted to immediately precede this one.
    /// Empty means any unrestricted edge arriving at `from_node`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub predecessors: EdgeList,
    /// The edges permitted to immediately follow this one.
    /// Empty means any unrestricted edge leaving `to_node`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub successors: EdgeList,
    /// The length in m.
    pub length: f64,
    /// Whether the edge is a turning movement within an intersection.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_turn: bool,
    /// The edge category.
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: EdgeKind,
    /// Whether the edge is closed to traffic.
    #[cfg_attr(feature = "serde", serde(default))]
    pub closed: bool,
}

/// The category of an [Edge].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EdgeKind {
    /// An edge that takes part in dynamic assignment.
    #[default]
    DynamicAssignment,
    /// A plain network link.
    Link,
    /// Anything else reported by the network source.
    Other,
}

impl Edge {
    /// Creates an open, unrestricted dynamic assignment edge.
    pub fn new(
        id: impl Into<EdgeId>,
        from_node: impl Into<NodeId>,
        to_node: impl Into<NodeId>,
        length: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from_node: from_node.into(),
            to_node: to_node.into(),
            predecessors: EdgeList::new(),
            successors: EdgeList::new(),
            length,
            is_turn: false,
            kind: EdgeKind::DynamicAssignment,
            closed: false,
        }
    }

    /// Restricts the edges that may precede this one.
    pub fn with_predecessors(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.predecessors = ids.into_iter().map(EdgeId).collect();
        self
    }

    /// Restricts the edges that may follow this one.
    pub fn with_successors(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.successors = ids.into_iter().map(EdgeId).collect();
        self
    }

    /// Marks the edge as a turning movement.
    pub fn turn(mut self) -> Self {
        self.is_turn = true;
        self
    }

    /// Sets the edge category.
    pub fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the closure state.
    pub fn with_closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }
}

/// The directed network edges, indexed by ID and iterated in ascending ID order.
#[derive(Clone, Debug, Default)]
pub struct EdgeTable {
    edges: BTreeMap<EdgeId, Edge>,
}

impl EdgeTable {
    /// Creates an edge table, failing if two rows claim the same ID.
    pub fn new(edges: impl IntoIterator<Item = Edge>) -> Result<Self, BuildError> {
        let mut table = BTreeMap::new();
        for edge in edges {
            let id = edge.id;
            if table.insert(id, edge).is_some() {
                return Err(BuildError::IndexCollision(id));
            }
        }
        Ok(Self { edges: table })
    }

    /// Keeps only the edges of the given kind.
    pub fn retain_kind(&mut self, kind: EdgeKind) {
        let before = self.edges.len();
        self.edges.retain(|_, edge| edge.kind == kind);
        log::debug!(
            "kept {} of {} edges of kind {:?}",
            self.edges.len(),
            before,
            kind
        );
    }

    /// Gets the edge with the given ID.
    pub fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Whether the table contains an edge with the given ID.
    pub fn contains(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    /// Returns an iterator over the edges in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Returns an iterator over the edge IDs in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys().copied()
    }

    /// The number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the table has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<'a> IntoIterator for &'a EdgeTable {
    type Item = &'a Edge;
    type IntoIter = std::collections::btree_map::Values<'a, EdgeId, Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.values()
    }
}
