use crate::error::VolumeError;
use crate::{EdgeId, VehicleId};
use std::collections::{BTreeMap, HashMap};

/// Counts the vehicles currently assigned to each edge.
///
/// A departure adds one to every edge of the vehicle's route (repeated edges count
/// once per occurrence) and an arrival removes them again. Counts never go below zero;
/// a decrement that would is clamped and counted in [clamp_events](Self::clamp_events).
#[derive(Clone, Debug, Default)]
pub struct VolumeTracker {
    /// The current volume of each edge.
    volumes: BTreeMap<EdgeId, u32>,
    /// The routes of vehicles that have departed but not yet arrived.
    live: HashMap<VehicleId, Vec<EdgeId>>,
    /// The number of decrements clamped at zero.
    clamped: u64,
}

impl VolumeTracker {
    /// Creates a tracker for the given edges, all starting at zero.
    pub fn new(edges: impl IntoIterator<Item = EdgeId>) -> Self {
        Self {
            volumes: edges.into_iter().map(|id| (id, 0)).collect(),
            live: HashMap::new(),
            clamped: 0,
        }
    }

    /// Records a vehicle leaving on the given route.
    /// Nothing is recorded if the vehicle is already on the network or an edge is unknown.
    pub fn on_departure(
        &mut self,
        vehicle: VehicleId,
        route: impl IntoIterator<Item = EdgeId>,
    ) -> Result<(), VolumeError> {
        if self.live.contains_key(&vehicle) {
            return Err(VolumeError::AlreadyDeparted(vehicle));
        }
        let route = route.into_iter().collect::<Vec<_>>();
        if let Some(edge) = route.iter().find(|id| !self.volumes.contains_key(id)) {
            return Err(VolumeError::UnknownEdge {
                vehicle,
                edge: *edge,
            });
        }
        for edge in &route {
            if let Some(count) = self.volumes.get_mut(edge) {
                *count += 1;
            }
        }
        self.live.insert(vehicle, route);
        Ok(())
    }

    /// Records a vehicle reaching its destination, returning the route it was assigned.
    pub fn on_arrival(&mut self, vehicle: VehicleId) -> Result<Vec<EdgeId>, VolumeError> {
        let route = self
            .live
            .remove(&vehicle)
            .ok_or(VolumeError::UnknownVehicle(vehicle))?;
        for edge in &route {
            if let Some(count) = self.volumes.get_mut(edge) {
                if *count == 0 {
                    self.clamped += 1;
                    log::warn!(
                        "volume of edge {} already zero on arrival of vehicle {}",
                        edge,
                        vehicle
                    );
                } else {
                    *count -= 1;
                }
            }
        }
        Ok(route)
    }

    /// Overwrites the volume of an edge with a count reported by the simulation.
    /// Returns false if the edge is not tracked.
    pub fn set_volume(&mut self, edge: EdgeId, count: u32) -> bool {
        match self.volumes.get_mut(&edge) {
            Some(current) => {
                *current = count;
                true
            }
            None => false,
        }
    }

    /// The current volume of an edge.
    pub fn volume(&self, edge: EdgeId) -> Option<u32> {
        self.volumes.get(&edge).copied()
    }

    /// Returns an iterator over the volume of every edge in ascending ID order.
    pub fn volumes(&self) -> impl Iterator<Item = (EdgeId, u32)> + '_ {
        self.volumes.iter().map(|(id, count)| (*id, *count))
    }

    /// The sum of all edge volumes.
    pub fn total_volume(&self) -> u64 {
        self.volumes.values().map(|count| u64::from(*count)).sum()
    }

    /// The number of vehicles that have departed but not arrived.
    pub fn live_vehicles(&self) -> usize {
        self.live.len()
    }

    /// The route recorded for a vehicle still on the network.
    pub fn route_of(&self, vehicle: VehicleId) -> Option<&[EdgeId]> {
        self.live.get(&vehicle).map(|route| route.as_slice())
    }

    /// The number of decrements that were clamped at zero.
    pub fn clamp_events(&self) -> u64 {
        self.clamped
    }

    /// Clears all volumes and vehicles for a new run.
    pub fn reset(&mut self) {
        self.volumes.values_mut().for_each(|count| *count = 0);
        self.live.clear();
        self.clamped = 0;
    }
}
