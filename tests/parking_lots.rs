//! Tests that resolve parking lots from sample paths.

mod common;

use common::*;
use dta_router::{
    EdgeId, GraphBuilder, LotId, LotRole, NodeId, ParkingLots, ResolveError, RoutingGraph,
};

fn junction_graph() -> RoutingGraph {
    GraphBuilder::new(&junction_table()).build().unwrap()
}

#[test]
fn lots_resolve_from_path_ends() {
    let graph = junction_graph();
    let lots = ParkingLots::resolve(&junction_lots(), &junction_paths(), &graph).unwrap();

    let west = lots.get(LotId(1)).unwrap();
    assert_eq!(west.role(), LotRole::Origin);
    let origin = west.origin().unwrap();
    assert_eq!(Some(origin.vertex), graph.origin_vertex(EdgeId(1)));
    assert_eq!(origin.node, NodeId(WEST));

    let north = lots.get(LotId(4)).unwrap();
    assert_eq!(north.role(), LotRole::Destination);
    let destination = north.destination().unwrap();
    assert_eq!(Some(destination.vertex), graph.destination_vertex(EdgeId(4)));
    assert_eq!(destination.node, NodeId(NORTH));
}

#[test]
fn unreferenced_and_ineligible_lots() {
    let graph = junction_graph();
    let lots = ParkingLots::resolve(&junction_lots(), &junction_paths(), &graph).unwrap();

    assert_eq!(lots.get(LotId(5)).unwrap().role(), LotRole::Unresolved);
    assert!(lots.get(LotId(6)).is_none());
    assert_eq!(lots.len(), 5);
    assert_eq!(lots.origins().collect::<Vec<_>>(), [LotId(1), LotId(2)]);
    assert_eq!(lots.destinations().collect::<Vec<_>>(), [LotId(3), LotId(4)]);
}

/// Only the first path from or to each lot is traced.
#[test]
fn first_sample_path_wins() {
    let graph = junction_graph();
    let paths = [path(3, 2, &[4]), path(3, 2, &[1, 11, 3])];
    let lots = ParkingLots::resolve(&junction_lots(), &paths, &graph).unwrap();
    let origin = lots.get(LotId(3)).unwrap().origin().unwrap();
    assert_eq!(Some(origin.vertex), graph.origin_vertex(EdgeId(4)));
}

#[test]
fn lots_can_be_origin_and_destination() {
    let graph = junction_graph();
    let paths = [path(1, 3, &[1, 11, 3]), path(2, 1, &[2, 21, 3])];
    let lots = ParkingLots::resolve(&junction_lots(), &paths, &graph).unwrap();
    let lot = lots.get(LotId(1)).unwrap();
    assert_eq!(lot.role(), LotRole::Both);
    assert_ne!(lot.origin(), lot.destination());
}

#[test]
fn empty_paths_are_skipped() {
    let graph = junction_graph();
    let paths = [path(1, 3, &[]), path(1, 3, &[1, 11, 3])];
    let lots = ParkingLots::resolve(&junction_lots(), &paths, &graph).unwrap();
    assert_eq!(lots.get(LotId(1)).unwrap().role(), LotRole::Origin);
    assert_eq!(lots.get(LotId(3)).unwrap().role(), LotRole::Destination);
}

#[test]
fn unknown_path_edges_fail() {
    let graph = junction_graph();
    let paths = [path(1, 3, &[1, 99])];
    let err = ParkingLots::resolve(&junction_lots(), &paths, &graph).unwrap_err();
    assert_eq!(
        err,
        ResolveError::UnknownPathEdge {
            from_lot: LotId(1),
            to_lot: LotId(3),
            edge: EdgeId(99),
        }
    );
}
