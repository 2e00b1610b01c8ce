use crate::config::AssignmentConfig;
use crate::edge::EdgeTable;
use crate::error::{Error, ResolveError, RouteError, VolumeError};
use crate::graph::{GraphBuilder, RoutingGraph};
use crate::lot::{LotRecord, ParkingLots, SamplePath};
use crate::routing::{Route, RouteOutcome, RoutingEngine, Waypoint};
use crate::volume::VolumeTracker;
use crate::weight::{Period, RefreshSummary, WeightUpdater};
use crate::{EdgeId, VehicleId};

/// The state of one simulation run: the routing graph, the resolved parking lots,
/// and the volumes and weights fed back from the simulation.
///
/// Runs share nothing. To run several simulations on the same network, build the graph
/// once and hand each run its own copy with [AssignmentRun::from_graph].
#[derive(Clone, Debug)]
pub struct AssignmentRun {
    /// The run parameters.
    config: AssignmentConfig,
    /// The routing graph, whose weights change as the run progresses.
    graph: RoutingGraph,
    /// The resolved parking lots.
    lots: ParkingLots,
    /// The vehicle count on each edge.
    volumes: VolumeTracker,
    /// The travel time estimate of each edge.
    weights: WeightUpdater,
}

/// The state of one edge, for reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeState {
    /// The edge ID.
    pub edge: EdgeId,
    /// The number of vehicles assigned to the edge.
    pub volume: u32,
    /// The current weight in s.
    pub weight: f64,
    /// Whether the edge is closed.
    pub closed: bool,
}

impl AssignmentRun {
    /// Builds the routing graph for a network and starts a run on it.
    pub fn build_graph(mut edges: EdgeTable, config: AssignmentConfig) -> Result<Self, Error> {
        config.validate()?;
        if let Some(kind) = config.edge_kind {
            edges.retain_kind(kind);
        }
        let graph = GraphBuilder::new(&edges)
            .free_flow_speed(config.free_flow_speed)
            .build()?;
        Ok(Self::from_graph(graph, config))
    }

    /// Starts a run on an already built graph.
    pub fn from_graph(mut graph: RoutingGraph, config: AssignmentConfig) -> Self {
        let volumes = VolumeTracker::new(graph.edge_ids());
        let weights = WeightUpdater::new(&mut graph, config.closed_edge_weight);
        Self {
            config,
            graph,
            lots: ParkingLots::default(),
            volumes,
            weights,
        }
    }

    /// Resolves parking lots to vertices using sample paths.
    pub fn resolve_lots<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a LotRecord>,
        paths: impl IntoIterator<Item = &'a SamplePath>,
    ) -> Result<&ParkingLots, ResolveError> {
        self.lots = ParkingLots::resolve(records, paths, &self.graph)?;
        Ok(&self.lots)
    }

    /// Gets the run parameters.
    pub fn config(&self) -> &AssignmentConfig {
        &self.config
    }

    /// Gets the routing graph.
    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    /// Gets the resolved parking lots.
    pub fn lots(&self) -> &ParkingLots {
        &self.lots
    }

    /// Gets the edge volumes.
    pub fn volumes(&self) -> &VolumeTracker {
        &self.volumes
    }

    /// Gets the edge weights.
    pub fn weights(&self) -> &WeightUpdater {
        &self.weights
    }

    /// Gets a routing engine over the current weights.
    pub fn engine(&self) -> RoutingEngine<'_> {
        RoutingEngine::new(&self.graph).with_lots(&self.lots)
    }

    /// Finds the shortest route for every pair of origin and destination.
    pub fn route(&self, origins: &[Waypoint], destinations: &[Waypoint]) -> Vec<RouteOutcome> {
        self.engine().route(origins, destinations)
    }

    /// Finds the shortest route between a single origin and destination.
    pub fn route_one(
        &self,
        origin: impl Into<Waypoint>,
        destination: impl Into<Waypoint>,
    ) -> Result<Route, RouteError> {
        self.engine().route_one(origin, destination)
    }

    /// Routes a vehicle and records its departure on the route found.
    pub fn depart(
        &mut self,
        vehicle: VehicleId,
        origin: impl Into<Waypoint>,
        destination: impl Into<Waypoint>,
    ) -> Result<Route, Error> {
        let route = self.route_one(origin, destination)?;
        self.volumes
            .on_departure(vehicle, route.edges.iter().copied())?;
        Ok(route)
    }

    /// Records a vehicle leaving on the given route.
    pub fn on_departure(
        &mut self,
        vehicle: VehicleId,
        route: impl IntoIterator<Item = EdgeId>,
    ) -> Result<(), VolumeError> {
        self.volumes.on_departure(vehicle, route)
    }

    /// Records a vehicle reaching its destination.
    pub fn on_arrival(&mut self, vehicle: VehicleId) -> Result<Vec<EdgeId>, VolumeError> {
        self.volumes.on_arrival(vehicle)
    }

    /// Applies travel time measurements and closures for a period.
    pub fn refresh_weights(
        &mut self,
        period: Period,
        measurements: impl IntoIterator<Item = (EdgeId, Option<f64>)>,
        closed: impl IntoIterator<Item = EdgeId>,
    ) -> RefreshSummary {
        self.weights
            .refresh(&mut self.graph, period, measurements, closed)
    }

    /// Applies measurements for the period containing `elapsed` seconds of simulation.
    pub fn refresh_at_elapsed(
        &mut self,
        elapsed: f64,
        measurements: impl IntoIterator<Item = (EdgeId, Option<f64>)>,
        closed: impl IntoIterator<Item = EdgeId>,
    ) -> RefreshSummary {
        let period = Period::from_elapsed(elapsed, self.config.evaluation_interval);
        self.refresh_weights(period, measurements, closed)
    }

    /// Gets the volume, weight and closure of every edge in ascending ID order.
    pub fn snapshot(&self) -> Vec<EdgeState> {
        self.volumes
            .volumes()
            .map(|(edge, volume)| EdgeState {
                edge,
                volume,
                weight: self.weights.weight(edge).unwrap_or(f64::NAN),
                closed: self.weights.is_closed(edge),
            })
            .collect()
    }

    /// Clears volumes and restores initial weights so a new run can start on the same graph.
    pub fn reset(&mut self) {
        self.volumes.reset();
        self.weights.reset(&mut self.graph);
        log::info!("reset assignment run state");
    }
}
