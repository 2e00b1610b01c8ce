//! Error types.

use crate::{EdgeId, LotId, NodeId, VehicleId};
use thiserror::Error;

/// Errors raised while turning an edge table into a [RoutingGraph](crate::RoutingGraph).
/// No usable graph exists after any of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("edge id {0} appears more than once in the edge table")]
    IndexCollision(EdgeId),
    #[error("edge {edge} references {referenced} as a {side}, which is not in the edge table")]
    MalformedEdgeReference {
        edge: EdgeId,
        referenced: EdgeId,
        side: AdjacencySide,
    },
    #[error("edges {first} and {second} share an approach vertex but meet at nodes {first_node} and {second_node}")]
    ApproachNodeMismatch {
        first: EdgeId,
        first_node: NodeId,
        second: EdgeId,
        second_node: NodeId,
    },
}

/// Which adjacency list a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencySide {
    Predecessor,
    Successor,
}

impl std::fmt::Display for AdjacencySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjacencySide::Predecessor => write!(f, "predecessor"),
            AdjacencySide::Successor => write!(f, "successor"),
        }
    }
}

/// Errors raised while resolving parking lots from sample paths.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolveError {
    #[error("sample path from lot {from_lot} to lot {to_lot} uses edge {edge}, which is not in the graph")]
    UnknownPathEdge {
        from_lot: LotId,
        to_lot: LotId,
        edge: EdgeId,
    },
}

/// Per-query routing failures. These never invalidate the rest of a batch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouteError {
    #[error("parking lot {lot} has no resolved {role} vertex")]
    UnresolvedLot { lot: LotId, role: &'static str },
    #[error("parking lot {0} is not known")]
    UnknownLot(LotId),
    #[error("vertex is not part of this graph")]
    UnknownVertex,
    #[error("no path exists between the requested origin and destination")]
    NoPathFound,
}

/// Volume bookkeeping failures; each points at a lost or duplicated update upstream.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VolumeError {
    #[error("vehicle {0} arrived without a recorded departure")]
    UnknownVehicle(VehicleId),
    #[error("vehicle {0} departed again before arriving")]
    AlreadyDeparted(VehicleId),
    #[error("vehicle {vehicle} departed on edge {edge}, which is not tracked")]
    UnknownEdge { vehicle: VehicleId, edge: EdgeId },
}

/// Failures reading a JSON input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failure reading file: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("failure decoding JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures loading or validating an [AssignmentConfig](crate::AssignmentConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("failure reading configuration: {0}")]
    Load(#[from] LoadError),
}

/// Any error raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Volume(#[from] VolumeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
}
