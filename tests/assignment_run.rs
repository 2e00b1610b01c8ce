//! Tests of a full assignment run, from loading a network to feeding back volumes and weights.

mod common;

use assert_approx_eq::assert_approx_eq;
use common::*;
use dta_router::{
    AssignmentConfig, AssignmentRun, ConfigError, Edge, EdgeId, EdgeKind, Error, GraphBuilder,
    LotId, NetworkDescription, Period, RouteError, VehicleId, Waypoint,
};

const NO_CLOSURES: [EdgeId; 0] = [];

fn junction_run() -> AssignmentRun {
    let mut run =
        AssignmentRun::build_graph(junction_table(), AssignmentConfig::default()).unwrap();
    run.resolve_lots(&junction_lots(), &junction_paths()).unwrap();
    run
}

fn ids(ids: &[u32]) -> Vec<EdgeId> {
    ids.iter().map(|id| EdgeId(*id)).collect()
}

#[test]
fn departures_and_arrivals_track_volumes() {
    let mut run = junction_run();

    let route = run.depart(VehicleId(1), LotId(2), LotId(4)).unwrap();
    assert_eq!(route.edges, ids(&[2, 22, 4]));
    run.depart(VehicleId(2), LotId(2), LotId(3)).unwrap();
    assert_eq!(run.volumes().volume(EdgeId(2)), Some(2));
    assert_eq!(run.volumes().volume(EdgeId(21)), Some(1));
    assert_eq!(run.volumes().live_vehicles(), 2);

    assert_eq!(run.on_arrival(VehicleId(1)).unwrap(), ids(&[2, 22, 4]));
    assert_eq!(run.volumes().volume(EdgeId(2)), Some(1));
    assert_eq!(run.volumes().volume(EdgeId(22)), Some(0));
}

/// A failed routing query records nothing.
#[test]
fn failed_departures_record_nothing() {
    let mut run = junction_run();
    let err = run.depart(VehicleId(1), LotId(5), LotId(3)).unwrap_err();
    assert!(matches!(
        err,
        Error::Route(RouteError::UnresolvedLot {
            lot: LotId(5),
            role: "origin"
        })
    ));
    assert_eq!(run.volumes().total_volume(), 0);
    assert_eq!(run.volumes().live_vehicles(), 0);
}

#[test]
fn every_lot_pair_is_routed() {
    let run = junction_run();
    let origins = run.lots().origins().map(Waypoint::Lot).collect::<Vec<_>>();
    let destinations = run
        .lots()
        .destinations()
        .map(Waypoint::Lot)
        .collect::<Vec<_>>();
    let outcomes = run.route(&origins, &destinations);

    assert_eq!(outcomes.len(), 4);
    let failed = outcomes
        .iter()
        .filter(|outcome| outcome.result.is_err())
        .map(|outcome| (outcome.origin, outcome.destination))
        .collect::<Vec<_>>();
    // There is no turn from the west approach to the north exit
    assert_eq!(failed, vec![(Waypoint::Lot(LotId(1)), Waypoint::Lot(LotId(4)))]);
}

/// Measurements fed back into a run change the routes it hands out.
#[test]
fn measurements_change_route_choice() {
    let mut run = AssignmentRun::build_graph(fork(), AssignmentConfig::default()).unwrap();
    let a = run.graph().origin_vertex(EdgeId(1)).unwrap();
    let c = run.graph().destination_vertex(EdgeId(3)).unwrap();

    run.refresh_at_elapsed(300.0, [(EdgeId(3), Some(60.0))], [EdgeId(2)]);
    assert_eq!(run.weights().last_period(), Some(Period(1)));
    assert_eq!(run.route_one(a, c).unwrap().edges, ids(&[1, 3]));

    // Still the first period, so nothing changes
    let summary = run.refresh_at_elapsed(600.0, [(EdgeId(2), Some(1.0))], NO_CLOSURES);
    assert!(!summary.applied);
    assert_eq!(run.route_one(a, c).unwrap().edges, ids(&[1, 3]));

    let summary = run.refresh_at_elapsed(601.0, [(EdgeId(2), Some(1.0))], [EdgeId(99)]);
    assert!(summary.applied);
    assert_eq!(run.weights().last_period(), Some(Period(2)));
    let route = run.route_one(a, c).unwrap();
    assert_eq!(route.edges, ids(&[1, 2]));
    assert_approx_eq!(route.travel_time, 100.0 / dta_router::DEFAULT_FREE_FLOW_SPEED + 1.0);
}

#[test]
fn snapshot_reports_every_edge() {
    let mut run = junction_run();
    run.depart(VehicleId(9), LotId(1), LotId(3)).unwrap();
    run.refresh_weights(Period(1), [(EdgeId(11), Some(30.0))], [EdgeId(4)]);

    let snapshot = run.snapshot();
    assert_eq!(
        snapshot.iter().map(|state| state.edge).collect::<Vec<_>>(),
        ids(&[1, 2, 3, 4, 11, 21, 22])
    );
    let turn = snapshot.iter().find(|state| state.edge == EdgeId(11)).unwrap();
    assert_eq!(turn.volume, 1);
    assert_eq!(turn.weight, 30.0);
    assert!(!turn.closed);
    let north = snapshot.iter().find(|state| state.edge == EdgeId(4)).unwrap();
    assert!(north.closed);
    assert_eq!(north.weight, run.config().closed_edge_weight);
}

#[test]
fn reset_starts_a_fresh_run() {
    let mut run = junction_run();
    let before = run.snapshot();
    run.depart(VehicleId(1), LotId(1), LotId(3)).unwrap();
    run.refresh_weights(Period(3), [(EdgeId(1), Some(5.0))], [EdgeId(2)]);

    run.reset();
    assert_eq!(run.snapshot(), before);
    assert_eq!(run.volumes().live_vehicles(), 0);
    assert_eq!(run.weights().last_period(), None);
    // Lots survive a reset
    assert!(run.route_one(LotId(1), LotId(3)).is_ok());
}

/// Runs started from the same graph do not see each other's updates.
#[test]
fn runs_are_independent() {
    let graph = GraphBuilder::new(&junction_table()).build().unwrap();
    let mut first = AssignmentRun::from_graph(graph.clone(), AssignmentConfig::default());
    let second = AssignmentRun::from_graph(graph, AssignmentConfig::default());

    first.on_departure(VehicleId(1), ids(&[1, 11, 3])).unwrap();
    first.refresh_weights(Period(1), [(EdgeId(3), Some(1.0))], NO_CLOSURES);

    assert_eq!(second.volumes().total_volume(), 0);
    assert_eq!(second.weights().last_period(), None);
    assert_ne!(second.graph().weight(EdgeId(3)), Some(1.0));
}

#[test]
fn invalid_configs_are_rejected() {
    let config = AssignmentConfig {
        free_flow_speed: 0.0,
        ..Default::default()
    };
    let err = AssignmentRun::build_graph(junction_table(), config).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::Invalid {
            field: "free_flow_speed",
            ..
        })
    ));

    let config = AssignmentConfig {
        evaluation_interval: f64::INFINITY,
        ..Default::default()
    };
    assert!(config.validate().is_err());
    assert!(AssignmentConfig::default().validate().is_ok());
}

#[test]
fn configs_load_from_json() {
    let config = AssignmentConfig::from_json_str(
        r#"{ "free_flow_speed": 20.0, "edge_kind": "DYNAMIC_ASSIGNMENT" }"#,
    )
    .unwrap();
    assert_eq!(config.free_flow_speed, 20.0);
    assert_eq!(config.edge_kind, Some(EdgeKind::DynamicAssignment));
    assert_eq!(config.evaluation_interval, 600.0);

    assert!(matches!(
        AssignmentConfig::from_json_str(r#"{ "free_flow_sped": 20.0 }"#),
        Err(ConfigError::Load(_))
    ));
    assert!(matches!(
        AssignmentConfig::from_json_str(r#"{ "closed_edge_weight": -1.0 }"#),
        Err(ConfigError::Invalid { .. })
    ));
}

/// Only edges of the configured kind reach the graph.
#[test]
fn edge_kind_filters_the_network() {
    let mut edges = junction();
    edges.push(Edge::new(50, EAST, NORTH, 500.0).with_kind(EdgeKind::Link));
    let table = dta_router::EdgeTable::new(edges).unwrap();
    let config = AssignmentConfig {
        edge_kind: Some(EdgeKind::DynamicAssignment),
        ..Default::default()
    };
    let run = AssignmentRun::build_graph(table, config).unwrap();
    assert_eq!(run.graph().edge_count(), 7);
    assert!(!run.graph().contains_edge(EdgeId(50)));
}

#[test]
fn networks_load_from_json() {
    let json = r#"{
        "edges": [
            { "id": 1, "from_node": 1, "to_node": 2, "length": 100.0, "successors": [2] },
            { "id": 2, "from_node": 2, "to_node": 3, "length": 50.0, "predecessors": [1] }
        ],
        "lots": [
            { "id": 7, "zone": 70 },
            { "id": 8, "zone": 80, "eligible": true }
        ],
        "paths": [
            { "from_lot": 7, "to_lot": 8, "edges": [1, 2] }
        ]
    }"#;
    let network = NetworkDescription::from_json_str(json).unwrap();
    assert_eq!(network.edges.len(), 2);
    assert_eq!(network.edges[0].kind, EdgeKind::DynamicAssignment);

    let run = network.start_run(AssignmentConfig::default()).unwrap();
    assert_eq!(run.graph().vertex_count(), 3);
    let route = run.route_one(LotId(7), LotId(8)).unwrap();
    assert_eq!(route.edges, ids(&[1, 2]));
    assert_eq!(
        route.nodes.iter().map(|node| node.0).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn malformed_networks_fail_to_start() {
    let json = r#"{
        "edges": [
            { "id": 1, "from_node": 1, "to_node": 2, "length": 100.0, "successors": [9] }
        ]
    }"#;
    let network = NetworkDescription::from_json_str(json).unwrap();
    assert!(matches!(
        network.start_run(AssignmentConfig::default()),
        Err(Error::Build(_))
    ));
    assert!(NetworkDescription::from_json_str("{ \"lots\": [] }").is_err());
}
