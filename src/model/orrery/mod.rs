use std::collections::BTreeMap;

use nalgebra::{Point3, Vector3};

use crate::astro::{CartesianState, Orbit, PointMass, TimedOrbit};

mod body;
mod ship;

pub use body::{Body, BodyID, BodyInfo};
pub use ship::{Maneuver, Ship, ShipID, TargetRef};

#[derive(Debug, Clone)]
struct BodyState {
    body: Body,
    orbit: Option<TimedOrbit<Body, ()>>,
}

/// Every body and ship in the system. Bodies follow fixed Keplerian orbits
/// around their parents; the root body sits at the origin.
#[derive(Debug, Clone, Default)]
pub struct Orrery {
    bodies: BTreeMap<BodyID, BodyState>,
    next_body_id: usize,
    ships: BTreeMap<ShipID, Ship>,
    next_ship_id: usize,
}

impl Orrery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_parent(&self, id: BodyID) -> Option<BodyID> {
        self.bodies[&id]
            .orbit
            .as_ref()
            .map(|orbit| orbit.primary().id)
    }

    pub fn orbit_of_body(&self, id: BodyID) -> Option<&TimedOrbit<Body, ()>> {
        self.bodies[&id].orbit.as_ref()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.values().map(|x| &x.body)
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[&id].body
    }

    pub fn find_body(&self, name: &str) -> Option<BodyID> {
        self.bodies()
            .find(|b| b.info.name.eq_ignore_ascii_case(name))
            .map(|b| b.id)
    }

    pub fn add_body(
        &mut self,
        body_info: BodyInfo,
        orbit: Orbit<PointMass, ()>,
        time_at_periapsis: f64,
        parent_id: BodyID,
    ) -> BodyID {
        let parent = self.bodies[&parent_id].body.clone();
        let orbit = TimedOrbit::from_orbit(orbit.map_primary(|_| parent), time_at_periapsis);
        self.insert_new_body(body_info, Some(orbit))
    }

    pub fn add_fixed_body(&mut self, body_info: BodyInfo) -> BodyID {
        self.insert_new_body(body_info, None)
    }

    fn insert_new_body(&mut self, info: BodyInfo, orbit: Option<TimedOrbit<Body, ()>>) -> BodyID {
        let id = BodyID(self.next_body_id);
        self.next_body_id += 1;

        let body = BodyState {
            body: Body { id, info },
            orbit,
        };

        self.bodies.insert(id, body);
        id
    }

    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values()
    }

    pub fn get_ship(&self, id: ShipID) -> Option<&Ship> {
        self.ships.get(&id)
    }

    pub fn find_ship(&self, name: &str) -> Option<ShipID> {
        self.ships()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.id)
    }

    pub fn add_ship(
        &mut self,
        name: &str,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        current_time: f64,
        parent_id: BodyID,
        has_solver: bool,
    ) -> ShipID {
        let new_id = ShipID(self.next_ship_id);
        self.next_ship_id += 1;

        let primary = self.bodies[&parent_id].body.clone();

        let ship = Ship {
            id: new_id,
            name: name.to_owned(),
            orbit: TimedOrbit::from_state(
                CartesianState::new(primary, position, velocity),
                current_time,
            ),
            has_solver,
            maneuvers: vec![],
            target: None,
        };

        self.ships.insert(new_id, ship);
        new_id
    }

    pub fn set_target(&mut self, id: ShipID, target: Option<TargetRef>) {
        if let Some(ship) = self.ships.get_mut(&id) {
            ship.target = target;
        }
    }

    pub fn add_maneuver(&mut self, id: ShipID, maneuver: Maneuver) {
        if let Some(ship) = self.ships.get_mut(&id) {
            ship.maneuvers.push(maneuver);
        }
    }

    pub fn clear_maneuvers(&mut self, id: ShipID) {
        if let Some(ship) = self.ships.get_mut(&id) {
            ship.maneuvers.clear();
        }
    }

    /// Position of the body relative to the root body.
    pub fn body_position(&self, id: BodyID, time: f64) -> Point3<f64> {
        match &self.bodies[&id].orbit {
            None => Point3::origin(),
            Some(orbit) => {
                let parent_position = self.body_position(orbit.primary().id, time);
                parent_position + orbit.state_at_time(time).position()
            }
        }
    }

    pub fn ship_position(&self, id: ShipID, time: f64) -> Option<Point3<f64>> {
        let ship = self.ships.get(&id)?;
        let relative = ship.orbit.state_at_time(time).position();
        Some(self.body_position(ship.parent_id(), time) + relative)
    }

    pub fn get_soi_radius(&self, id: BodyID) -> Option<f64> {
        let state = &self.bodies[&id];
        let orbit = state.orbit.as_ref()?;
        Some(orbit.orbit().clone().with_secondary(&state.body).soi_radius())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::consts::*;

    fn info(name: &str, mu: f64, radius: f64) -> BodyInfo {
        BodyInfo {
            name: name.to_owned(),
            mu,
            radius,
            color: Point3::new(1.0, 1.0, 1.0),
        }
    }

    fn kerbol_kerbin_mun() -> (Orrery, BodyID, BodyID, BodyID) {
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
        let mun = orrery.add_body(
            info("Mun", MUN_MU, MUN_RADIUS),
            Orbit::from_kepler(
                PointMass::with_mu(KERBIN_MU),
                (),
                MUN_ORBIT_RADIUS,
                0.0,
                0.0,
                0.0,
                0.0,
            ),
            0.0,
            kerbin,
        );
        (orrery, kerbol, kerbin, mun)
    }

    #[test]
    fn test_nested_positions() {
        let (orrery, kerbol, kerbin, mun) = kerbol_kerbin_mun();

        assert_eq!(orrery.body_position(kerbol, 100.0), Point3::origin());
        assert_relative_eq!(
            orrery.body_position(kerbin, 0.0),
            Point3::new(KERBIN_ORBIT_RADIUS, 0.0, 0.0)
        );
        assert_relative_eq!(
            orrery.body_position(mun, 0.0),
            Point3::new(KERBIN_ORBIT_RADIUS + MUN_ORBIT_RADIUS, 0.0, 0.0)
        );

        // Velocities stay relative to the parent
        let mun_speed = get_circular_velocity(MUN_ORBIT_RADIUS, KERBIN_MU);
        assert_relative_eq!(
            orrery.orbit_of_body(mun).unwrap().state_at_time(0.0).velocity(),
            Vector3::new(0.0, mun_speed, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_parents_and_lookup() {
        let (orrery, kerbol, kerbin, mun) = kerbol_kerbin_mun();

        assert_eq!(orrery.get_parent(kerbol), None);
        assert_eq!(orrery.get_parent(mun), Some(kerbin));
        assert_eq!(orrery.find_body("mun"), Some(mun));
        assert_eq!(orrery.find_body("Duna"), None);
        assert!(orrery.orbit_of_body(kerbol).is_none());
    }

    #[test]
    fn test_soi_radius() {
        let (orrery, kerbol, kerbin, _) = kerbol_kerbin_mun();

        assert_eq!(orrery.get_soi_radius(kerbol), None);
        // The KSP wiki lists 84,159,286 m
        let soi = orrery.get_soi_radius(kerbin).unwrap();
        assert_relative_eq!(soi, 84_159_286.0, max_relative = 1e-3);
    }

    #[test]
    fn test_ship_position() {
        let (mut orrery, _, kerbin, _) = kerbol_kerbin_mun();
        let radius = KERBIN_RADIUS + 100_000.0;
        let speed = get_circular_velocity(radius, KERBIN_MU);
        let id = orrery.add_ship(
            "Probe",
            Vector3::new(radius, 0.0, 0.0),
            Vector3::new(0.0, speed, 0.0),
            0.0,
            kerbin,
            true,
        );

        assert_relative_eq!(
            orrery.ship_position(id, 0.0).unwrap(),
            Point3::new(KERBIN_ORBIT_RADIUS + radius, 0.0, 0.0),
            epsilon = 1e-3
        );
        assert_eq!(orrery.find_ship("probe"), Some(id));

        orrery.add_maneuver(
            id,
            Maneuver {
                time: 50.0,
                delta_v: Vector3::x(),
            },
        );
        orrery.add_maneuver(
            id,
            Maneuver {
                time: 10.0,
                delta_v: Vector3::y(),
            },
        );
        let ship = orrery.get_ship(id).unwrap();
        let pending = ship.pending_maneuvers(20.0);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].time, 50.0);
        assert_eq!(ship.pending_maneuvers(0.0)[0].time, 10.0);

        orrery.clear_maneuvers(id);
        assert!(orrery.get_ship(id).unwrap().maneuvers.is_empty());
    }
}
