pub use builder::{GraphBuilder, DEFAULT_FREE_FLOW_SPEED};
use crate::edge::EdgeList;
use crate::{ArcId, EdgeId, NodeId, VertexId};
use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};

mod builder;
mod disjoint_set;

/// A directed multigraph whose vertices are node approaches and whose arcs
/// correspond one-to-one with network edges.
///
/// The topology is fixed once built. Only the weight and closure of each arc change
/// over the lifetime of a simulation run.
#[derive(Clone, Debug, Default)]
pub struct RoutingGraph {
    /// The approach vertices.
    vertices: SlotMap<VertexId, Vertex>,
    /// The arcs, one per network edge.
    arcs: SlotMap<ArcId, GraphArc>,
    /// The arcs leaving each vertex, in ascending edge ID order.
    arcs_out: SecondaryMap<VertexId, SmallVec<[ArcId; 4]>>,
    /// Maps each network edge to its arc.
    by_edge: BTreeMap<EdgeId, ArcId>,
    /// Maps vertex labels to vertices.
    by_label: HashMap<VertexLabel, VertexId>,
}

/// A vertex of the [RoutingGraph]: one network node seen through one approach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vertex {
    id: VertexId,
    label: VertexLabel,
}

/// The deterministic identity of a [Vertex]: its network node and the
/// edge end that first created the approach.
///
/// Every edge end belongs to exactly one vertex, so no two vertices share a label,
/// even when an edge starts and ends at the same node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexLabel {
    /// The network node.
    pub node: NodeId,
    /// The lowest edge ID with an end at this approach.
    pub anchor: EdgeId,
    /// Which end of the anchor edge lies at this approach.
    pub end: EdgeEnd,
}

/// One end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeEnd {
    /// The end at the edge's `from_node`.
    Origin,
    /// The end at the edge's `to_node`.
    Destination,
}

/// A directed arc between two approach vertices.
#[derive(Clone, Debug)]
pub(crate) struct GraphArc {
    pub edge: EdgeId,
    pub tail: VertexId,
    pub head: VertexId,
    /// The current travel time estimate in s.
    pub weight: f64,
    pub closed: bool,
    /// The edges this one may be entered from; empty if unrestricted.
    pub predecessors: EdgeList,
    /// The edges this one may be left for; empty if unrestricted.
    pub successors: EdgeList,
}

impl GraphArc {
    /// Whether a vehicle on `self` may turn directly onto `next`.
    pub fn permits(&self, next: &GraphArc) -> bool {
        (self.successors.is_empty() || self.successors.contains(&next.edge))
            && (next.predecessors.is_empty() || next.predecessors.contains(&self.edge))
    }
}

impl Vertex {
    /// Gets the vertex ID.
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Gets the vertex label.
    pub fn label(&self) -> VertexLabel {
        self.label
    }

    /// Gets the network node this vertex represents.
    pub fn node(&self) -> NodeId {
        self.label.node
    }
}

impl std::fmt::Display for VertexLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let end = match self.end {
            EdgeEnd::Origin => 'o',
            EdgeEnd::Destination => 'd',
        };
        write!(f, "n{}.{}{}", self.node, end, self.anchor)
    }
}

impl RoutingGraph {
    /// Adds an approach vertex.
    pub(crate) fn add_vertex(&mut self, label: VertexLabel) -> VertexId {
        let id = self.vertices.insert_with_key(|id| Vertex { id, label });
        self.arcs_out.insert(id, SmallVec::new());
        self.by_label.insert(label, id);
        id
    }

    /// Adds the arc for a network edge.
    pub(crate) fn add_arc(&mut self, arc: GraphArc) -> ArcId {
        let (edge, tail) = (arc.edge, arc.tail);
        let id = self.arcs.insert(arc);
        if let Some(out) = self.arcs_out.get_mut(tail) {
            out.push(id);
        }
        self.by_edge.insert(edge, id);
        id
    }

    /// Gets an arc.
    pub(crate) fn arc(&self, id: ArcId) -> &GraphArc {
        &self.arcs[id]
    }

    /// Gets the arcs leaving a vertex.
    pub(crate) fn arcs_out(&self, id: VertexId) -> &[ArcId] {
        self.arcs_out.get(id).map(|arcs| arcs.as_slice()).unwrap_or(&[])
    }

    fn arc_for(&self, edge: EdgeId) -> Option<&GraphArc> {
        self.by_edge.get(&edge).map(|id| &self.arcs[*id])
    }

    fn arc_for_mut(&mut self, edge: EdgeId) -> Option<&mut GraphArc> {
        let id = *self.by_edge.get(&edge)?;
        self.arcs.get_mut(id)
    }

    /// The number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// The number of edges.
    pub fn edge_count(&self) -> usize {
        self.arcs.len()
    }

    /// Gets a vertex.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Returns an iterator over all the vertices.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Finds the vertex with the given label.
    pub fn vertex_by_label(&self, label: VertexLabel) -> Option<VertexId> {
        self.by_label.get(&label).copied()
    }

    /// Returns the vertices that represent the given network node, ordered by label.
    pub fn vertices_at(&self, node: NodeId) -> Vec<VertexId> {
        let mut found = self
            .vertices
            .values()
            .filter(|v| v.node() == node)
            .map(|v| (v.label, v.id))
            .collect::<Vec<_>>();
        found.sort();
        found.into_iter().map(|(_, id)| id).collect()
    }

    /// Returns an iterator over the edge IDs in ascending order.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.by_edge.keys().copied()
    }

    /// Whether the graph contains the given edge.
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.by_edge.contains_key(&edge)
    }

    /// The vertex at which the given edge starts.
    pub fn origin_vertex(&self, edge: EdgeId) -> Option<VertexId> {
        self.arc_for(edge).map(|arc| arc.tail)
    }

    /// The vertex at which the given edge ends.
    pub fn destination_vertex(&self, edge: EdgeId) -> Option<VertexId> {
        self.arc_for(edge).map(|arc| arc.head)
    }

    /// The edges leaving a vertex, in ascending ID order.
    pub fn edges_from(&self, id: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.arcs_out(id).iter().map(|arc| self.arcs[*arc].edge)
    }

    /// The current weight of an edge in s.
    pub fn weight(&self, edge: EdgeId) -> Option<f64> {
        self.arc_for(edge).map(|arc| arc.weight)
    }

    /// Whether an edge is currently closed.
    pub fn is_closed(&self, edge: EdgeId) -> Option<bool> {
        self.arc_for(edge).map(|arc| arc.closed)
    }

    /// Sets the weight of an edge. Returns false if the edge is not in the graph.
    pub fn set_weight(&mut self, edge: EdgeId, weight: f64) -> bool {
        match self.arc_for_mut(edge) {
            Some(arc) => {
                arc.weight = weight;
                true
            }
            None => false,
        }
    }

    /// Sets the closure state of an edge. Returns false if the edge is not in the graph.
    pub fn set_closed(&mut self, edge: EdgeId, closed: bool) -> bool {
        match self.arc_for_mut(edge) {
            Some(arc) => {
                arc.closed = closed;
                true
            }
            None => false,
        }
    }
}
