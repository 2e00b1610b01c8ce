use crate::error::RouteError;
use crate::graph::RoutingGraph;
use crate::lot::ParkingLots;
use crate::{ArcId, EdgeId, LotId, NodeId, VertexId};
use itertools::Itertools;
use pathfinding::directed::dijkstra::{build_path, dijkstra_all};
use std::collections::HashMap;

/// Search costs are integral; weights are converted at this many units per second.
const COST_RESOLUTION: f64 = 1000.0;

/// One end of a routing query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waypoint {
    /// A parking lot, routed from its origin vertex or to its destination vertex.
    Lot(LotId),
    /// A graph vertex.
    Vertex(VertexId),
}

impl From<LotId> for Waypoint {
    fn from(id: LotId) -> Self {
        Waypoint::Lot(id)
    }
}

impl From<VertexId> for Waypoint {
    fn from(id: VertexId) -> Self {
        Waypoint::Vertex(id)
    }
}

/// A shortest path through the network.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// The network nodes visited, with consecutive repeats collapsed.
    pub nodes: Vec<NodeId>,
    /// Every edge traversed, in order.
    pub edges: Vec<EdgeId>,
    /// The sum of the traversed edges' weights in s.
    pub travel_time: f64,
}

/// The result for one origin/destination pair of a batched query.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteOutcome {
    pub origin: Waypoint,
    pub destination: Waypoint,
    pub result: Result<Route, RouteError>,
}

/// Answers shortest path queries over the current weights of a [RoutingGraph].
pub struct RoutingEngine<'a> {
    graph: &'a RoutingGraph,
    lots: Option<&'a ParkingLots>,
}

/// A search state: the vertex reached and the arc used to reach it.
/// Keeping the arc apart lets parallel edges between two vertices stay distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct State {
    vertex: VertexId,
    via: Option<ArcId>,
}

/// All shortest paths from one origin vertex.
///
/// Where several states reach a vertex at the same cost, the least state wins, so a
/// route depends only on the graph and its weights.
struct SearchTree {
    origin: VertexId,
    parents: HashMap<State, (State, u64)>,
    /// The cheapest state reaching each vertex.
    best: HashMap<VertexId, (u64, State)>,
}

impl<'a> RoutingEngine<'a> {
    /// Creates an engine over the given graph.
    pub fn new(graph: &'a RoutingGraph) -> Self {
        Self { graph, lots: None }
    }

    /// Allows parking lots to be used as waypoints.
    pub fn with_lots(mut self, lots: &'a ParkingLots) -> Self {
        self.lots = Some(lots);
        self
    }

    /// Finds the shortest route between a single origin and destination.
    ///
    /// Gives the same route as [route](Self::route) does for the same pair, ties included.
    pub fn route_one(
        &self,
        origin: impl Into<Waypoint>,
        destination: impl Into<Waypoint>,
    ) -> Result<Route, RouteError> {
        let src = self.origin_vertex(origin.into())?;
        let dst = self.destination_vertex(destination.into())?;
        SearchTree::grow(self, src)
            .path_to(dst)
            .map(|states| self.make_route(&states))
            .ok_or(RouteError::NoPathFound)
    }

    /// Finds the shortest route for every pair of origin and destination.
    ///
    /// Outcomes are ordered by origin, then destination. A failed pair does not
    /// affect the others.
    pub fn route(&self, origins: &[Waypoint], destinations: &[Waypoint]) -> Vec<RouteOutcome> {
        let dsts = destinations
            .iter()
            .map(|dst| self.destination_vertex(*dst))
            .collect::<Vec<_>>();
        let mut trees: HashMap<VertexId, SearchTree> = HashMap::new();
        let mut outcomes = Vec::with_capacity(origins.len() * destinations.len());

        for origin in origins {
            let src = self.origin_vertex(*origin);
            if let Ok(src) = src {
                trees
                    .entry(src)
                    .or_insert_with(|| SearchTree::grow(self, src));
            }
            for (destination, dst) in destinations.iter().zip(&dsts) {
                let result = match (&src, dst) {
                    (Err(err), _) | (_, Err(err)) => Err(err.clone()),
                    (Ok(src), Ok(dst)) => trees[src]
                        .path_to(*dst)
                        .map(|states| self.make_route(&states))
                        .ok_or(RouteError::NoPathFound),
                };
                outcomes.push(RouteOutcome {
                    origin: *origin,
                    destination: *destination,
                    result,
                });
            }
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            log::debug!("{} of {} route queries failed", failed, outcomes.len());
        }
        outcomes
    }

    fn origin_vertex(&self, waypoint: Waypoint) -> Result<VertexId, RouteError> {
        match waypoint {
            Waypoint::Vertex(id) => self.check_vertex(id),
            Waypoint::Lot(id) => self
                .lots
                .and_then(|lots| lots.get(id))
                .ok_or(RouteError::UnknownLot(id))?
                .origin()
                .map(|endpoint| endpoint.vertex)
                .ok_or(RouteError::UnresolvedLot {
                    lot: id,
                    role: "origin",
                }),
        }
    }

    fn destination_vertex(&self, waypoint: Waypoint) -> Result<VertexId, RouteError> {
        match waypoint {
            Waypoint::Vertex(id) => self.check_vertex(id),
            Waypoint::Lot(id) => self
                .lots
                .and_then(|lots| lots.get(id))
                .ok_or(RouteError::UnknownLot(id))?
                .destination()
                .map(|endpoint| endpoint.vertex)
                .ok_or(RouteError::UnresolvedLot {
                    lot: id,
                    role: "destination",
                }),
        }
    }

    fn check_vertex(&self, id: VertexId) -> Result<VertexId, RouteError> {
        self.graph
            .vertex(id)
            .map(|_| id)
            .ok_or(RouteError::UnknownVertex)
    }

    /// The states reachable from `state` by one permitted movement.
    fn successors(&self, state: State) -> impl Iterator<Item = (State, u64)> + '_ {
        let from = state.via.map(|id| self.graph.arc(id));
        self.graph
            .arcs_out(state.vertex)
            .iter()
            .map(move |id| (*id, self.graph.arc(*id)))
            .filter(move |(_, arc)| from.map_or(true, |from| from.permits(arc)))
            .map(|(id, arc)| {
                let next = State {
                    vertex: arc.head,
                    via: Some(id),
                };
                (next, arc_cost(arc.weight))
            })
    }

    fn make_route(&self, states: &[State]) -> Route {
        let nodes = states
            .iter()
            .filter_map(|state| self.graph.vertex(state.vertex))
            .map(|vertex| vertex.node())
            .dedup()
            .collect();
        let arcs = states.iter().filter_map(|state| state.via);
        let (edges, travel_time) = arcs.fold((vec![], 0.0), |(mut edges, time), id| {
            let arc = self.graph.arc(id);
            edges.push(arc.edge);
            (edges, time + arc.weight)
        });
        Route {
            nodes,
            edges,
            travel_time,
        }
    }
}

impl State {
    fn start(vertex: VertexId) -> Self {
        Self { vertex, via: None }
    }
}

impl SearchTree {
    fn grow(engine: &RoutingEngine, origin: VertexId) -> Self {
        let parents = dijkstra_all(&State::start(origin), |state| engine.successors(*state));
        let mut best: HashMap<VertexId, (u64, State)> = HashMap::new();
        for (state, (_, cost)) in &parents {
            let candidate = (*cost, *state);
            best.entry(state.vertex)
                .and_modify(|current| *current = std::cmp::min(*current, candidate))
                .or_insert(candidate);
        }
        Self {
            origin,
            parents,
            best,
        }
    }

    fn path_to(&self, dst: VertexId) -> Option<Vec<State>> {
        if dst == self.origin {
            return Some(vec![State::start(dst)]);
        }
        let (_, target) = self.best.get(&dst)?;
        Some(build_path(target, &self.parents))
    }
}

fn arc_cost(weight: f64) -> u64 {
    (weight.max(0.0) * COST_RESOLUTION).round() as u64
}
