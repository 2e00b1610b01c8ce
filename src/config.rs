use crate::edge::EdgeKind;
use crate::error::ConfigError;
#[cfg(feature = "serde")]
use crate::error::LoadError;
use crate::graph::DEFAULT_FREE_FLOW_SPEED;
use crate::weight::DEFAULT_CLOSED_EDGE_WEIGHT;

/// The default length of an evaluation interval, in s.
pub const DEFAULT_EVALUATION_INTERVAL: f64 = 600.0;

/// The parameters of an assignment run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct AssignmentConfig {
    /// The speed used to derive initial weights from edge lengths, in m/s.
    pub free_flow_speed: f64,
    /// The weight given to closed edges, in s.
    pub closed_edge_weight: f64,
    /// The length of one measurement period, in s.
    pub evaluation_interval: f64,
    /// If set, only edges of this kind are loaded.
    pub edge_kind: Option<EdgeKind>,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            free_flow_speed: DEFAULT_FREE_FLOW_SPEED,
            closed_edge_weight: DEFAULT_CLOSED_EDGE_WEIGHT,
            evaluation_interval: DEFAULT_EVALUATION_INTERVAL,
            edge_kind: None,
        }
    }
}

impl AssignmentConfig {
    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("free_flow_speed", self.free_flow_speed),
            ("closed_edge_weight", self.closed_edge_weight),
            ("evaluation_interval", self.evaluation_interval),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive number, found {}", value),
                });
            }
        }
        Ok(())
    }

    /// Reads and validates a configuration from a JSON string.
    /// Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(LoadError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a configuration from a JSON file.
    #[cfg(feature = "serde")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(LoadError::from)?;
        Self::from_json_str(&json)
    }
}
