use nalgebra::Vector3;

use super::{Body, BodyID};
use crate::astro::TimedOrbit;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShipID(pub usize);

/// What a ship has selected as its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    Ship(ShipID),
    Body(BodyID),
}

/// A planned burn. The delta-v is expressed in the ship's orbital frame at the
/// moment of the burn: x is prograde, y is orbit normal, z is radial-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maneuver {
    pub time: f64,
    pub delta_v: Vector3<f64>,
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub id: ShipID,
    pub name: String,
    pub orbit: TimedOrbit<Body, ()>,
    /// Whether this ship runs a patched conic solver. Only solver-carrying
    /// ships have predicted trajectories and maneuver nodes.
    pub has_solver: bool,
    pub maneuvers: Vec<Maneuver>,
    pub target: Option<TargetRef>,
}

impl Ship {
    pub fn parent_id(&self) -> BodyID {
        self.orbit.primary().id
    }

    /// Maneuver nodes that haven't been reached yet, in time order.
    pub fn pending_maneuvers(&self, time: f64) -> Vec<Maneuver> {
        let mut pending: Vec<_> = self
            .maneuvers
            .iter()
            .filter(|m| m.time >= time)
            .copied()
            .collect();
        pending.sort_by(|a, b| a.time.total_cmp(&b.time));
        pending
    }
}
