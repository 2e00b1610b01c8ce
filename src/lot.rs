//! Resolution of parking lots (zone connectors) to graph vertices.

use crate::error::ResolveError;
use crate::graph::RoutingGraph;
use crate::{EdgeId, LotId, NodeId, VertexId, ZoneId};
use std::collections::{BTreeMap, BTreeSet};

/// A parking lot as reported by the network source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LotRecord {
    /// The lot ID.
    pub id: LotId,
    /// The zone the lot connects to.
    pub zone: ZoneId,
    /// Whether the lot can act as an origin or destination (a zone connector).
    #[cfg_attr(feature = "serde", serde(default = "eligible_default"))]
    pub eligible: bool,
}

#[cfg(feature = "serde")]
fn eligible_default() -> bool {
    true
}

/// A representative path between two parking lots, used only to locate their vertices.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplePath {
    /// The lot the path starts at.
    pub from_lot: LotId,
    /// The lot the path ends at.
    pub to_lot: LotId,
    /// The edges traversed, in order.
    pub edges: Vec<EdgeId>,
}

/// How a parking lot was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LotRole {
    /// No sample path references the lot.
    Unresolved,
    /// Vehicles can leave from the lot.
    Origin,
    /// Vehicles can arrive at the lot.
    Destination,
    /// Vehicles can both leave from and arrive at the lot.
    Both,
}

/// A resolved lot endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LotEndpoint {
    /// The graph vertex.
    pub vertex: VertexId,
    /// The network node.
    pub node: NodeId,
}

/// A parking lot together with the vertices it was resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParkingLot {
    id: LotId,
    zone: ZoneId,
    origin: Option<LotEndpoint>,
    destination: Option<LotEndpoint>,
}

impl ParkingLot {
    fn new(record: &LotRecord) -> Self {
        Self {
            id: record.id,
            zone: record.zone,
            origin: None,
            destination: None,
        }
    }

    /// Gets the lot ID.
    pub fn id(&self) -> LotId {
        self.id
    }

    /// Gets the zone the lot connects to.
    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    /// The role the lot was resolved to.
    pub fn role(&self) -> LotRole {
        match (self.origin.is_some(), self.destination.is_some()) {
            (false, false) => LotRole::Unresolved,
            (true, false) => LotRole::Origin,
            (false, true) => LotRole::Destination,
            (true, true) => LotRole::Both,
        }
    }

    /// The endpoint used when leaving the lot.
    pub fn origin(&self) -> Option<LotEndpoint> {
        self.origin
    }

    /// The endpoint used when arriving at the lot.
    pub fn destination(&self) -> Option<LotEndpoint> {
        self.destination
    }
}

/// The parking lots of a network, keyed by ID.
#[derive(Clone, Debug, Default)]
pub struct ParkingLots {
    lots: BTreeMap<LotId, ParkingLot>,
}

impl ParkingLots {
    /// Resolves lots to vertices by tracing sample paths through the graph.
    ///
    /// A lot's origin vertex is the origin vertex of the first edge of the first path
    /// leaving it; its destination vertex is the destination vertex of the last edge of the
    /// first path arriving at it. Ineligible lots are left out; lots that no path
    /// references stay unresolved.
    pub fn resolve<'a>(
        records: impl IntoIterator<Item = &'a LotRecord>,
        paths: impl IntoIterator<Item = &'a SamplePath>,
        graph: &RoutingGraph,
    ) -> Result<Self, ResolveError> {
        let mut lots = records
            .into_iter()
            .filter(|record| record.eligible)
            .map(|record| (record.id, ParkingLot::new(record)))
            .collect::<BTreeMap<_, _>>();

        let mut traced_from = BTreeSet::new();
        let mut traced_to = BTreeSet::new();

        for path in paths {
            let (first, last) = match (path.edges.first(), path.edges.last()) {
                (Some(first), Some(last)) => (*first, *last),
                _ => {
                    log::warn!(
                        "skipping empty sample path from lot {} to lot {}",
                        path.from_lot,
                        path.to_lot
                    );
                    continue;
                }
            };
            if traced_from.insert(path.from_lot) {
                let endpoint = trace(graph, path, first, TraceEnd::Start)?;
                match lots.get_mut(&path.from_lot) {
                    Some(lot) => lot.origin = Some(endpoint),
                    None => log::debug!("sample path leaves untracked lot {}", path.from_lot),
                }
            }
            if traced_to.insert(path.to_lot) {
                let endpoint = trace(graph, path, last, TraceEnd::End)?;
                match lots.get_mut(&path.to_lot) {
                    Some(lot) => lot.destination = Some(endpoint),
                    None => log::debug!("sample path enters untracked lot {}", path.to_lot),
                }
            }
        }

        let resolved = lots
            .values()
            .filter(|lot| lot.role() != LotRole::Unresolved)
            .count();
        log::debug!("resolved {} of {} parking lots", resolved, lots.len());
        Ok(Self { lots })
    }

    /// Gets a lot by ID.
    pub fn get(&self, id: LotId) -> Option<&ParkingLot> {
        self.lots.get(&id)
    }

    /// Returns an iterator over the lots in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = &ParkingLot> {
        self.lots.values()
    }

    /// Returns the IDs of the lots vehicles can leave from.
    pub fn origins(&self) -> impl Iterator<Item = LotId> + '_ {
        self.iter().filter(|lot| lot.origin.is_some()).map(|lot| lot.id)
    }

    /// Returns the IDs of the lots vehicles can arrive at.
    pub fn destinations(&self) -> impl Iterator<Item = LotId> + '_ {
        self.iter()
            .filter(|lot| lot.destination.is_some())
            .map(|lot| lot.id)
    }

    /// The number of lots.
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    /// Whether there are no lots.
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}

#[derive(Clone, Copy)]
enum TraceEnd {
    Start,
    End,
}

fn trace(
    graph: &RoutingGraph,
    path: &SamplePath,
    edge: EdgeId,
    end: TraceEnd,
) -> Result<LotEndpoint, ResolveError> {
    let vertex = match end {
        TraceEnd::Start => graph.origin_vertex(edge),
        TraceEnd::End => graph.destination_vertex(edge),
    };
    let vertex = vertex.ok_or(ResolveError::UnknownPathEdge {
        from_lot: path.from_lot,
        to_lot: path.to_lot,
        edge,
    })?;
    let node = graph
        .vertex(vertex)
        .map(|v| v.node())
        .ok_or(ResolveError::UnknownPathEdge {
            from_lot: path.from_lot,
            to_lot: path.to_lot,
            edge,
        })?;
    Ok(LotEndpoint { vertex, node })
}
