use log::trace;

use super::orrery::{Body, Maneuver, Orrery, Ship};
use crate::astro::{CartesianState, TimedOrbit};

/// How many conic sections to follow before giving up on a prediction.
pub const MAX_PATCHES: usize = 4;

// Open orbits around the root body never end, so they are cut off once they
// are this many times further out than their periapsis.
const OPEN_ORBIT_CUTOFF: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchEnd {
    /// The ship leaves its parent's sphere of influence at the end time.
    Escape,
    /// Nothing happens; the end time only bounds what gets drawn.
    Coast,
    /// A maneuver node changes the orbit at the end time.
    Maneuver,
}

/// One conic section of a predicted trajectory.
#[derive(Debug, Clone)]
pub struct Patch {
    pub orbit: TimedOrbit<Body, ()>,
    pub start_time: f64,
    pub end_time: f64,
    pub end: PatchEnd,
}

impl Patch {
    fn runs_forever(&self) -> bool {
        self.end == PatchEnd::Coast && self.orbit.orbit().is_closed()
    }
}

/// A chain of patches, each starting where the previous one ends.
#[derive(Debug, Clone)]
pub struct Trajectory {
    patches: Vec<Patch>,
}

impl Trajectory {
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Follows an orbit forward from `start_time`, switching to the parent
    /// body's frame whenever it escapes a sphere of influence.
    pub fn predict(
        orrery: &Orrery,
        orbit: TimedOrbit<Body, ()>,
        start_time: f64,
        max_patches: usize,
    ) -> Self {
        let mut patches = vec![];
        let mut orbit = orbit;
        let mut start_time = start_time;

        for _ in 0..max_patches {
            match find_escape(orrery, &orbit, start_time) {
                Some(escape_time) => {
                    let next = reroot_to_parent(orrery, &orbit, escape_time);
                    patches.push(Patch {
                        orbit,
                        start_time,
                        end_time: escape_time,
                        end: PatchEnd::Escape,
                    });
                    match next {
                        Some(next) => {
                            orbit = next;
                            start_time = escape_time;
                        }
                        None => break,
                    }
                }
                None => {
                    let end_time = coast_end_time(&orbit, start_time);
                    patches.push(Patch {
                        orbit,
                        start_time,
                        end_time,
                        end: PatchEnd::Coast,
                    });
                    break;
                }
            }
        }

        Self { patches }
    }

    /// The trajectory the ship follows with no further input.
    pub fn coast(orrery: &Orrery, ship: &Ship, time: f64) -> Self {
        Self::predict(orrery, ship.orbit.clone(), time, MAX_PATCHES)
    }

    /// The trajectory the ship follows if it executes all of its pending
    /// maneuver nodes. Returns `None` when there are no nodes to execute.
    pub fn flight_plan(orrery: &Orrery, ship: &Ship, time: f64) -> Option<Self> {
        let maneuvers = ship.pending_maneuvers(time);
        if maneuvers.is_empty() {
            return None;
        }

        let mut patches = vec![];
        let mut orbit = ship.orbit.clone();
        let mut start_time = time;

        for maneuver in maneuvers {
            let coast = Self::predict(orrery, orbit, start_time, MAX_PATCHES);

            let mut reached = None;
            for patch in coast.patches {
                if maneuver.time < patch.end_time || patch.runs_forever() {
                    reached = Some(patch);
                    break;
                }
                patches.push(patch);
            }

            let mut patch = match reached {
                Some(patch) => patch,
                None => {
                    // Node is past the prediction horizon
                    trace!("Dropping maneuver at t={} beyond horizon", maneuver.time);
                    return Some(Self { patches });
                }
            };

            orbit = apply_maneuver(&patch.orbit, &maneuver);
            patch.end_time = maneuver.time;
            patch.end = PatchEnd::Maneuver;
            patches.push(patch);
            start_time = maneuver.time;
        }

        patches.extend(Self::predict(orrery, orbit, start_time, MAX_PATCHES).patches);
        Some(Self { patches })
    }
}

/// Returns the time at which the orbit leaves its primary's SOI, if it does so
/// after `start_time`.
fn find_escape(orrery: &Orrery, orbit: &TimedOrbit<Body, ()>, start_time: f64) -> Option<f64> {
    // We can never escape the Sun
    let soi_radius = orrery.get_soi_radius(orbit.primary().id)?;
    let escape_s = orbit.orbit().get_s_at_radius(soi_radius)?;
    let escape_time = orbit.time_at_s(escape_s);
    (escape_time > start_time).then_some(escape_time)
}

fn coast_end_time(orbit: &TimedOrbit<Body, ()>, start_time: f64) -> f64 {
    if let Some(period) = orbit.orbit().period() {
        return start_time + period;
    }

    let current_radius = orbit.state_at_time(start_time).position().norm();
    let cutoff = (OPEN_ORBIT_CUTOFF * orbit.orbit().periapsis()).max(2.0 * current_radius);
    orbit
        .orbit()
        .get_s_at_radius(cutoff)
        .map(|s| orbit.time_at_s(s))
        .filter(|t| *t > start_time)
        .unwrap_or(start_time)
}

/// Re-expresses the orbit's state at `time` relative to the grandparent body.
fn reroot_to_parent(
    orrery: &Orrery,
    orbit: &TimedOrbit<Body, ()>,
    time: f64,
) -> Option<TimedOrbit<Body, ()>> {
    let parent_orbit = orrery.orbit_of_body(orbit.primary().id)?;

    let ship_state = orbit.state_at_time(time);
    let parent_state = parent_orbit.state_at_time(time);
    let new_state = CartesianState::new(
        parent_orbit.primary().clone(),
        ship_state.position() + parent_state.position(),
        ship_state.velocity() + parent_state.velocity(),
    );

    trace!(
        "Escaping {} into {} at t={}",
        orbit.primary().info.name,
        parent_orbit.primary().info.name,
        time
    );
    Some(TimedOrbit::from_state(new_state, time))
}

fn apply_maneuver(orbit: &TimedOrbit<Body, ()>, maneuver: &Maneuver) -> TimedOrbit<Body, ()> {
    let state = orbit.state_at_time(maneuver.time);
    let position = state.position();
    let velocity = state.velocity();

    let prograde = velocity.normalize();
    let normal = position.cross(&velocity).normalize();
    let radial = prograde.cross(&normal);

    let dv = maneuver.delta_v;
    let new_velocity = velocity + prograde * dv.x + normal * dv.y + radial * dv.z;

    TimedOrbit::from_state(
        CartesianState::new(orbit.primary().clone(), position, new_velocity),
        maneuver.time,
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};

    use super::*;
    use crate::astro::{Orbit, PointMass};
    use crate::consts::*;
    use crate::model::orrery::{BodyID, BodyInfo, ShipID};

    fn info(name: &str, mu: f64, radius: f64) -> BodyInfo {
        BodyInfo {
            name: name.to_owned(),
            mu,
            radius,
            color: Point3::new(1.0, 1.0, 1.0),
        }
    }

    fn kerbol_kerbin() -> (Orrery, BodyID, BodyID) {
        let mut orrery = Orrery::new();
        let kerbol = orrery.add_fixed_body(info("Kerbol", KERBOL_MU, KERBOL_RADIUS));
        let kerbin = orrery.add_body(
            info("Kerbin", KERBIN_MU, KERBIN_RADIUS),
            Orbit::from_kepler(
                PointMass::with_mu(KERBOL_MU),
                (),
                KERBIN_ORBIT_RADIUS,
                0.0,
                0.0,
                0.0,
                0.0,
            ),
            0.0,
            kerbol,
        );
        (orrery, kerbol, kerbin)
    }

    fn add_ship(orrery: &mut Orrery, kerbin: BodyID, speed_factor: f64) -> ShipID {
        let radius = KERBIN_RADIUS + 100_000.0;
        let speed = get_circular_velocity(radius, KERBIN_MU) * speed_factor;
        orrery.add_ship(
            "Probe",
            Vector3::new(radius, 0.0, 0.0),
            Vector3::new(0.0, speed, 0.0),
            0.0,
            kerbin,
            true,
        )
    }

    #[test]
    fn test_closed_orbit_is_one_patch() {
        let (mut orrery, _, kerbin) = kerbol_kerbin();
        let id = add_ship(&mut orrery, kerbin, 1.0);
        let ship = orrery.get_ship(id).unwrap();

        let trajectory = Trajectory::coast(&orrery, ship, 0.0);
        let patches = trajectory.patches();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].end, PatchEnd::Coast);
        let period = ship.orbit.orbit().period().unwrap();
        assert_relative_eq!(patches[0].end_time, period);
    }

    #[test]
    fn test_escape_switches_to_parent() {
        let (mut orrery, kerbol, kerbin) = kerbol_kerbin();
        let id = add_ship(&mut orrery, kerbin, 1.6);
        let ship = orrery.get_ship(id).unwrap();

        let trajectory = Trajectory::coast(&orrery, ship, 0.0);
        let patches = trajectory.patches();
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[0].end, PatchEnd::Escape);
        assert_eq!(patches[0].orbit.primary().id, kerbin);
        assert_eq!(patches[1].orbit.primary().id, kerbol);
        assert_eq!(patches[0].end_time, patches[1].start_time);

        // The ship is in the same place on either side of the boundary
        let t = patches[0].end_time;
        let before = orrery.body_position(kerbin, t) + patches[0].orbit.state_at_time(t).position();
        let after = Point3::from(patches[1].orbit.state_at_time(t).position());
        assert_relative_eq!(before, after, max_relative = 1e-8);

        let soi = orrery.get_soi_radius(kerbin).unwrap();
        let escape_radius = patches[0].orbit.state_at_time(t).position().norm();
        assert_relative_eq!(escape_radius, soi, max_relative = 1e-6);
    }

    #[test]
    fn test_flight_plan_applies_burn() {
        let (mut orrery, _, kerbin) = kerbol_kerbin();
        let id = add_ship(&mut orrery, kerbin, 1.0);
        let ship = orrery.get_ship(id).unwrap();
        assert!(Trajectory::flight_plan(&orrery, ship, 0.0).is_none());

        let burn_time = 300.0;
        orrery.add_maneuver(
            id,
            Maneuver {
                time: burn_time,
                delta_v: Vector3::new(200.0, 0.0, 0.0),
            },
        );
        let ship = orrery.get_ship(id).unwrap();
        let plan = Trajectory::flight_plan(&orrery, ship, 0.0).unwrap();
        let patches = plan.patches();

        assert_eq!(patches[0].end, PatchEnd::Maneuver);
        assert_eq!(patches[0].end_time, burn_time);
        assert_eq!(patches[1].start_time, burn_time);

        let before = patches[0].orbit.state_at_time(burn_time);
        let after = patches[1].orbit.state_at_time(burn_time);
        assert_relative_eq!(
            before.position(),
            after.position(),
            epsilon = 1e-3,
            max_relative = 1e-8
        );
        assert_relative_eq!(
            after.velocity().norm() - before.velocity().norm(),
            200.0,
            epsilon = 1e-3
        );

        // Prograde burns raise the apoapsis
        let old_apo = patches[0].orbit.orbit().apoapsis().unwrap();
        let new_apo = patches[1].orbit.orbit().apoapsis().unwrap();
        assert!(new_apo > old_apo);
    }

    #[test]
    fn test_burn_directions() {
        let (mut orrery, _, kerbin) = kerbol_kerbin();
        let id = add_ship(&mut orrery, kerbin, 1.0);
        let orbit = orrery.get_ship(id).unwrap().orbit.clone();

        // At t=0 the ship is on +x moving along +y, so radial-out is +x and
        // normal is +z.
        let burn = |delta_v| {
            apply_maneuver(&orbit, &Maneuver { time: 0.0, delta_v })
                .state_at_time(0.0)
                .velocity()
                - orbit.state_at_time(0.0).velocity()
        };
        let normal_burn = burn(Vector3::new(0.0, 10.0, 0.0));
        assert_relative_eq!(normal_burn, Vector3::z() * 10.0, epsilon = 1e-3);
        let radial_burn = burn(Vector3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(radial_burn, Vector3::x() * 10.0, epsilon = 1e-3);
    }
}
