use super::disjoint_set::DisjointSet;
use super::{EdgeEnd, GraphArc, RoutingGraph, VertexLabel};
use crate::edge::{Edge, EdgeTable};
use crate::error::{AdjacencySide, BuildError};
use crate::{EdgeId, NodeId, VertexId};
use std::collections::HashMap;

/// The default free flow speed used for initial weights, in m/s.
pub const DEFAULT_FREE_FLOW_SPEED: f64 = 13.89;

/// Builds a [RoutingGraph] from an [EdgeTable].
///
/// Each edge contributes two *ends*: its origin end at `from_node` and its destination
/// end at `to_node`. Ends that must share an approach vertex are merged in a disjoint-set:
/// * an edge's origin end merges with the destination ends of its predecessors,
///   and with the origin ends of every successor of those predecessors;
/// * an edge's destination end merges with the origin ends of its successors,
///   and with the destination ends of every predecessor of those successors;
/// * at each node, all ends without a restriction list merge into one shared approach.
///
/// Each resulting set becomes one vertex, labelled by the node and the first edge end in
/// the set (ascending edge ID, origin before destination). The result depends only on the
/// table's contents.
///
/// Merged approaches can admit movements that some edge forbids, for example when two
/// incoming edges share one permitted successor but not another. Each arc therefore keeps
/// its own movement lists, which the search checks on every turn.
pub struct GraphBuilder<'a> {
    table: &'a EdgeTable,
    free_flow_speed: f64,
}

/// Identifies one end of an edge by its position in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum End {
    Origin(usize),
    Destination(usize),
}

impl End {
    fn index(self) -> usize {
        match self {
            End::Origin(idx) => 2 * idx,
            End::Destination(idx) => 2 * idx + 1,
        }
    }

    fn side(self) -> EdgeEnd {
        match self {
            End::Origin(_) => EdgeEnd::Origin,
            End::Destination(_) => EdgeEnd::Destination,
        }
    }
}

impl<'a> GraphBuilder<'a> {
    /// Creates a builder for the given table.
    pub fn new(table: &'a EdgeTable) -> Self {
        Self {
            table,
            free_flow_speed: DEFAULT_FREE_FLOW_SPEED,
        }
    }

    /// Sets the free flow speed in m/s used to derive initial weights from lengths.
    pub fn free_flow_speed(mut self, speed: f64) -> Self {
        self.free_flow_speed = speed;
        self
    }

    /// Builds the graph.
    pub fn build(self) -> Result<RoutingGraph, BuildError> {
        let edges = self.table.iter().collect::<Vec<_>>();
        let index = edges
            .iter()
            .enumerate()
            .map(|(idx, edge)| (edge.id, idx))
            .collect::<HashMap<_, _>>();

        self.validate_references(&edges, &index)?;

        let mut ends = DisjointSet::new(2 * edges.len());
        merge_node_approaches(&edges, &mut ends);
        for (idx, edge) in edges.iter().enumerate() {
            // Origin side
            for pred in &edge.predecessors {
                let pred_idx = index[pred];
                ends.union(End::Origin(idx).index(), End::Destination(pred_idx).index());
                ends.union_all(
                    std::iter::once(End::Origin(idx).index()).chain(
                        edges[pred_idx]
                            .successors
                            .iter()
                            .map(|succ| End::Origin(index[succ]).index()),
                    ),
                );
            }
            // Destination side
            for succ in &edge.successors {
                let succ_idx = index[succ];
                ends.union(End::Destination(idx).index(), End::Origin(succ_idx).index());
                ends.union_all(
                    std::iter::once(End::Destination(idx).index()).chain(
                        edges[succ_idx]
                            .predecessors
                            .iter()
                            .map(|pred| End::Destination(index[pred]).index()),
                    ),
                );
            }
        }

        let mut graph = RoutingGraph::default();
        let mut vertices: HashMap<usize, (VertexId, EdgeId)> = HashMap::new();
        let mut resolve = |graph: &mut RoutingGraph, end: End, edge: &Edge| {
            let node = match end {
                End::Origin(_) => edge.from_node,
                End::Destination(_) => edge.to_node,
            };
            let root = ends.find(end.index());
            match vertices.get(&root) {
                Some((vertex, first)) => {
                    let first_node = graph.vertices[*vertex].node();
                    if first_node != node {
                        return Err(BuildError::ApproachNodeMismatch {
                            first: *first,
                            first_node,
                            second: edge.id,
                            second_node: node,
                        });
                    }
                    Ok(*vertex)
                }
                None => {
                    let vertex = graph.add_vertex(VertexLabel {
                        node,
                        anchor: edge.id,
                        end: end.side(),
                    });
                    vertices.insert(root, (vertex, edge.id));
                    Ok(vertex)
                }
            }
        };

        for (idx, edge) in edges.iter().enumerate() {
            let tail = resolve(&mut graph, End::Origin(idx), edge)?;
            let head = resolve(&mut graph, End::Destination(idx), edge)?;
            graph.add_arc(GraphArc {
                edge: edge.id,
                tail,
                head,
                weight: edge.length / self.free_flow_speed,
                closed: edge.closed,
                predecessors: edge.predecessors.clone(),
                successors: edge.successors.clone(),
            });
        }

        let restricted = count_restricted_turns(&graph);
        if restricted > 0 {
            log::debug!(
                "{} turns through shared approaches are forbidden by movement lists",
                restricted
            );
        }

        log::debug!(
            "built routing graph with {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Checks that every adjacency reference names an edge in the table.
    fn validate_references(
        &self,
        edges: &[&Edge],
        index: &HashMap<EdgeId, usize>,
    ) -> Result<(), BuildError> {
        let mut one_sided = 0usize;
        for edge in edges {
            let lists = [
                (AdjacencySide::Predecessor, &edge.predecessors),
                (AdjacencySide::Successor, &edge.successors),
            ];
            for (side, list) in lists {
                for referenced in list {
                    let other = match index.get(referenced) {
                        Some(idx) => edges[*idx],
                        None => {
                            return Err(BuildError::MalformedEdgeReference {
                                edge: edge.id,
                                referenced: *referenced,
                                side,
                            })
                        }
                    };
                    let reciprocal = match side {
                        AdjacencySide::Predecessor => &other.successors,
                        AdjacencySide::Successor => &other.predecessors,
                    };
                    if !reciprocal.contains(&edge.id) {
                        one_sided += 1;
                    }
                }
            }
        }
        if one_sided > 0 {
            log::warn!(
                "{} movement references are not listed by the referenced edge; \
                 those movements are only permitted where both edges allow them",
                one_sided
            );
        }
        Ok(())
    }
}

/// Merges the unrestricted ends at each node into one approach.
fn merge_node_approaches(edges: &[&Edge], ends: &mut DisjointSet) {
    let mut by_node: HashMap<NodeId, Vec<usize>> = HashMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        if edge.predecessors.is_empty() {
            by_node
                .entry(edge.from_node)
                .or_default()
                .push(End::Origin(idx).index());
        }
        if edge.successors.is_empty() {
            by_node
                .entry(edge.to_node)
                .or_default()
                .push(End::Destination(idx).index());
        }
    }
    for group in by_node.into_values() {
        ends.union_all(group);
    }
}

/// Counts the pairs of arcs meeting at a vertex that may not be driven in sequence.
fn count_restricted_turns(graph: &RoutingGraph) -> usize {
    let mut arcs_in: HashMap<VertexId, Vec<&GraphArc>> = HashMap::new();
    for arc in graph.arcs.values() {
        arcs_in.entry(arc.head).or_default().push(arc);
    }
    arcs_in
        .iter()
        .map(|(vertex, incoming)| {
            let outgoing = graph.arcs_out(*vertex);
            incoming
                .iter()
                .flat_map(|arc| outgoing.iter().map(move |id| (*arc, graph.arc(*id))))
                .filter(|(arc, next)| !arc.permits(next))
                .count()
        })
        .sum()
}
