//! A serializable description of a network as reported by the simulation.

use crate::assignment::AssignmentRun;
use crate::config::AssignmentConfig;
use crate::edge::{Edge, EdgeTable};
use crate::error::{BuildError, Error, LoadError};
use crate::lot::{LotRecord, SamplePath};
use serde::{Deserialize, Serialize};

/// The edges, parking lots and sample paths of a network.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub lots: Vec<LotRecord>,
    #[serde(default)]
    pub paths: Vec<SamplePath>,
}

impl NetworkDescription {
    /// Reads a network description from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a network description from a JSON file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Collects the edges into an [EdgeTable].
    pub fn edge_table(&self) -> Result<EdgeTable, BuildError> {
        EdgeTable::new(self.edges.iter().cloned())
    }

    /// Builds the routing graph, resolves the parking lots and starts a run.
    pub fn start_run(&self, config: AssignmentConfig) -> Result<AssignmentRun, Error> {
        let mut run = AssignmentRun::build_graph(self.edge_table()?, config)?;
        run.resolve_lots(&self.lots, &self.paths)?;
        Ok(run)
    }
}
