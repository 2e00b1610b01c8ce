//! Networks shared by the integration tests.
#![allow(dead_code)]

use dta_router::{Edge, EdgeTable, LotId, LotRecord, SamplePath, ZoneId};

pub const WEST: u32 = 1;
pub const SOUTH: u32 = 2;
pub const EAST: u32 = 3;
pub const NORTH: u32 = 4;
pub const JUNCTION: u32 = 10;

/// Links 1 (A->B), 2 (B->C, only after 1) and 3 (B->C, unrestricted).
pub fn fork() -> EdgeTable {
    EdgeTable::new([
        Edge::new(1, 1, 2, 100.0),
        Edge::new(2, 2, 3, 100.0).with_predecessors([1]),
        Edge::new(3, 2, 3, 100.0),
    ])
    .unwrap()
}

/// A junction with turning movements modelled as edges inside the junction node.
///
/// Approach links: 1 (west in), 2 (south in), 3 (east out), 4 (north out).
/// Turns: 11 (1 -> 3), 21 (2 -> 3), 22 (2 -> 4). There is no turn from 1 to 4.
pub fn junction() -> Vec<Edge> {
    vec![
        Edge::new(1, WEST, JUNCTION, 200.0).with_successors([11]),
        Edge::new(2, SOUTH, JUNCTION, 150.0).with_successors([21, 22]),
        Edge::new(3, JUNCTION, EAST, 180.0).with_predecessors([11, 21]),
        Edge::new(4, JUNCTION, NORTH, 120.0).with_predecessors([22]),
        Edge::new(11, JUNCTION, JUNCTION, 15.0)
            .with_predecessors([1])
            .with_successors([3])
            .turn(),
        Edge::new(21, JUNCTION, JUNCTION, 12.0)
            .with_predecessors([2])
            .with_successors([3])
            .turn(),
        Edge::new(22, JUNCTION, JUNCTION, 20.0)
            .with_predecessors([2])
            .with_successors([4])
            .turn(),
    ]
}

/// Two approaches into node 10 that share one permitted exit.
///
/// Edge 1 may continue to 2 or 6, edge 4 to 5 or 6. Edge 6 accepts both, so both
/// approaches share a vertex, but 1 -> 5 and 4 -> 2 stay forbidden.
pub fn overlap() -> EdgeTable {
    EdgeTable::new([
        Edge::new(1, 1, JUNCTION, 100.0).with_successors([2, 6]),
        Edge::new(2, JUNCTION, 2, 100.0).with_predecessors([1]),
        Edge::new(4, 4, JUNCTION, 100.0).with_successors([5, 6]),
        Edge::new(5, JUNCTION, 5, 100.0).with_predecessors([4]),
        Edge::new(6, JUNCTION, 6, 100.0).with_predecessors([1, 4]),
    ])
    .unwrap()
}

pub fn junction_table() -> EdgeTable {
    EdgeTable::new(junction()).unwrap()
}

/// Lots 1 (west) and 2 (south) are origins, 3 (east) and 4 (north) destinations,
/// 5 is never referenced and 6 is not a zone connector.
pub fn junction_lots() -> Vec<LotRecord> {
    [
        (1, 100, true),
        (2, 200, true),
        (3, 300, true),
        (4, 400, true),
        (5, 500, true),
        (6, 600, false),
    ]
    .into_iter()
    .map(|(id, zone, eligible)| LotRecord {
        id: LotId(id),
        zone: ZoneId(zone),
        eligible,
    })
    .collect()
}

pub fn junction_paths() -> Vec<SamplePath> {
    vec![
        path(1, 3, &[1, 11, 3]),
        path(2, 4, &[2, 22, 4]),
        path(2, 3, &[2, 21, 3]),
        path(6, 3, &[2, 21, 3]),
    ]
}

pub fn path(from: u32, to: u32, edges: &[u32]) -> SamplePath {
    SamplePath {
        from_lot: LotId(from),
        to_lot: LotId(to),
        edges: edges.iter().map(|id| (*id).into()).collect(),
    }
}
