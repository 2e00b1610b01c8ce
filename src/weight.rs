use crate::graph::RoutingGraph;
use crate::EdgeId;
use std::collections::{BTreeMap, BTreeSet};

/// The weight given to closed edges, in s.
pub const DEFAULT_CLOSED_EDGE_WEIGHT: f64 = 1.0e8;

/// A discretized bucket of simulation time over which measurements are aggregated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(pub u32);

impl Period {
    /// The period containing `elapsed` seconds of simulation, for evaluation
    /// intervals of `interval` seconds. Rounds up, so the first interval is period 1.
    pub fn from_elapsed(elapsed: f64, interval: f64) -> Self {
        Period((elapsed / interval).ceil().max(0.0) as u32)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a call to [WeightUpdater::refresh] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Whether the period was new and the measurements were applied.
    pub applied: bool,
    /// The number of edges given a new estimate.
    pub measured: usize,
    /// The number of measurements ignored as missing, invalid or unknown.
    pub skipped: usize,
    /// The number of edges closed after the refresh.
    pub closed: usize,
}

/// Maintains the travel time estimate of every edge and writes the
/// resulting weights into a [RoutingGraph].
#[derive(Clone, Debug)]
pub struct WeightUpdater {
    /// The length-based estimate of each edge, restored on reset.
    defaults: BTreeMap<EdgeId, f64>,
    /// The edges closed when the network was loaded.
    initially_closed: BTreeSet<EdgeId>,
    /// The current travel time estimate of each edge in s.
    estimates: BTreeMap<EdgeId, f64>,
    /// The currently closed edges.
    closed: BTreeSet<EdgeId>,
    /// The weight given to closed edges.
    closed_weight: f64,
    /// The last period for which measurements were applied.
    last_period: Option<Period>,
}

impl WeightUpdater {
    /// Creates an updater seeded from the graph's current weights and closures,
    /// and pushes the resulting weights back into the graph.
    pub fn new(graph: &mut RoutingGraph, closed_weight: f64) -> Self {
        let defaults = graph
            .edge_ids()
            .filter_map(|id| graph.weight(id).map(|w| (id, w)))
            .collect::<BTreeMap<_, _>>();
        let initially_closed = graph
            .edge_ids()
            .filter(|id| graph.is_closed(*id) == Some(true))
            .collect::<BTreeSet<_>>();
        let updater = Self {
            estimates: defaults.clone(),
            closed: initially_closed.clone(),
            defaults,
            initially_closed,
            closed_weight,
            last_period: None,
        };
        updater.push(graph);
        updater
    }

    /// Applies the measurements of a new period.
    ///
    /// Does nothing unless `period` is later than the last applied one. Otherwise each
    /// present, finite, non-negative measurement replaces its edge's estimate; edges
    /// without one keep their previous estimate. `closed` then becomes the set of closed
    /// edges, which are given the closure weight regardless of any measurement.
    pub fn refresh(
        &mut self,
        graph: &mut RoutingGraph,
        period: Period,
        measurements: impl IntoIterator<Item = (EdgeId, Option<f64>)>,
        closed: impl IntoIterator<Item = EdgeId>,
    ) -> RefreshSummary {
        if self.last_period.map_or(false, |last| period <= last) {
            return RefreshSummary::default();
        }

        let mut summary = RefreshSummary {
            applied: true,
            ..Default::default()
        };
        let mut unknown = 0;
        for (edge, time) in measurements {
            match (self.estimates.get_mut(&edge), time) {
                (Some(estimate), Some(time)) if time.is_finite() && time >= 0.0 => {
                    *estimate = time;
                    summary.measured += 1;
                }
                (None, _) => {
                    unknown += 1;
                    summary.skipped += 1;
                }
                _ => summary.skipped += 1,
            }
        }

        self.closed.clear();
        for edge in closed {
            if self.estimates.contains_key(&edge) {
                self.closed.insert(edge);
            } else {
                unknown += 1;
            }
        }
        summary.closed = self.closed.len();

        if unknown > 0 {
            log::warn!(
                "ignored {} measurements or closures for unknown edges in period {}",
                unknown,
                period
            );
        }

        self.last_period = Some(period);
        self.push(graph);
        log::info!(
            "applied period {}: {} edges measured, {} skipped, {} closed",
            period,
            summary.measured,
            summary.skipped,
            summary.closed
        );
        summary
    }

    /// Writes every edge's weight and closure into the graph.
    pub fn push(&self, graph: &mut RoutingGraph) {
        for (edge, weight) in self.weights() {
            graph.set_weight(edge, weight);
            graph.set_closed(edge, self.closed.contains(&edge));
        }
    }

    /// The current weight of an edge in s.
    pub fn weight(&self, edge: EdgeId) -> Option<f64> {
        let estimate = self.estimates.get(&edge)?;
        Some(self.effective(edge, *estimate))
    }

    /// The current travel time estimate of an edge in s, ignoring closure.
    pub fn estimate(&self, edge: EdgeId) -> Option<f64> {
        self.estimates.get(&edge).copied()
    }

    /// Whether an edge is currently closed.
    pub fn is_closed(&self, edge: EdgeId) -> bool {
        self.closed.contains(&edge)
    }

    /// Returns an iterator over the weight of every edge in ascending ID order.
    pub fn weights(&self) -> impl Iterator<Item = (EdgeId, f64)> + '_ {
        self.estimates
            .iter()
            .map(|(edge, estimate)| (*edge, self.effective(*edge, *estimate)))
    }

    /// The last period for which measurements were applied.
    pub fn last_period(&self) -> Option<Period> {
        self.last_period
    }

    /// The weight given to closed edges.
    pub fn closed_weight(&self) -> f64 {
        self.closed_weight
    }

    /// Restores the length-based estimates and initial closures for a new run.
    pub fn reset(&mut self, graph: &mut RoutingGraph) {
        self.estimates = self.defaults.clone();
        self.closed = self.initially_closed.clone();
        self.last_period = None;
        self.push(graph);
    }

    fn effective(&self, edge: EdgeId, estimate: f64) -> f64 {
        if self.closed.contains(&edge) {
            self.closed_weight
        } else {
            estimate
        }
    }
}
