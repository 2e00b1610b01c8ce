pub use assignment::{AssignmentRun, EdgeState};
pub use config::{AssignmentConfig, DEFAULT_EVALUATION_INTERVAL};
pub use edge::{Edge, EdgeKind, EdgeList, EdgeTable};
pub use error::{
    AdjacencySide, BuildError, ConfigError, Error, LoadError, ResolveError, RouteError,
    VolumeError,
};
pub use graph::{
    EdgeEnd, GraphBuilder, RoutingGraph, Vertex, VertexLabel, DEFAULT_FREE_FLOW_SPEED,
};
pub use lot::{LotEndpoint, LotRecord, LotRole, ParkingLot, ParkingLots, SamplePath};
#[cfg(feature = "serde")]
pub use network::NetworkDescription;
pub use routing::{Route, RouteOutcome, RoutingEngine, Waypoint};
use slotmap::new_key_type;
pub use slotmap::{Key, KeyData};
pub use volume::VolumeTracker;
pub use weight::{Period, RefreshSummary, WeightUpdater, DEFAULT_CLOSED_EDGE_WEIGHT};

mod assignment;
mod config;
mod edge;
mod error;
mod graph;
mod lot;
#[cfg(feature = "serde")]
mod network;
mod routing;
mod volume;
mod weight;

new_key_type! {
    /// Unique ID of a [Vertex] in a [RoutingGraph].
    pub struct VertexId;
    /// Unique ID of a directed arc in a [RoutingGraph].
    pub struct ArcId;
}

macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub $inner);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

external_id!(
    /// The stable external ID of a network [Edge].
    EdgeId(u32)
);
external_id!(
    /// The ID of a node in the source network (not a graph vertex).
    NodeId(u32)
);
external_id!(
    /// The ID of a parking lot.
    LotId(u32)
);
external_id!(
    /// The ID of a zone that parking lots connect to.
    ZoneId(u32)
);
external_id!(
    /// The ID of a vehicle in the simulation.
    VehicleId(u64)
);
