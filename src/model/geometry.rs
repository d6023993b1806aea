//! Lets the overlay query orbits and bodies that live in an orrery.

use nalgebra::{Point3, Unit, Vector3};

use super::orrery::{Body, BodyID, Orrery};
use crate::astro::TimedOrbit;
use crate::overlay::{BodyGeometry, OrbitGeometry};

/// One conic section, either a body's orbit or a piece of a ship's trajectory.
#[derive(Debug, Clone)]
pub struct OrreryOrbit<'a> {
    orrery: &'a Orrery,
    orbit: TimedOrbit<Body, ()>,
}

#[derive(Debug, Clone, Copy)]
pub struct OrreryBody<'a> {
    orrery: &'a Orrery,
    id: BodyID,
}

impl<'a> OrreryOrbit<'a> {
    pub fn new(orrery: &'a Orrery, orbit: TimedOrbit<Body, ()>) -> Self {
        Self { orrery, orbit }
    }

    pub fn orbit(&self) -> &TimedOrbit<Body, ()> {
        &self.orbit
    }
}

impl<'a> OrreryBody<'a> {
    pub fn new(orrery: &'a Orrery, id: BodyID) -> Self {
        Self { orrery, id }
    }

    pub fn id(&self) -> BodyID {
        self.id
    }
}

impl<'a> OrbitGeometry for OrreryOrbit<'a> {
    type Body = OrreryBody<'a>;

    fn reference_body(&self) -> OrreryBody<'a> {
        OrreryBody::new(self.orrery, self.orbit.primary().id)
    }

    fn position_at(&self, time: f64) -> Point3<f64> {
        let parent = self.orrery.body_position(self.orbit.primary().id, time);
        parent + self.relative_position_at(time)
    }

    fn relative_position_at(&self, time: f64) -> Vector3<f64> {
        self.orbit.state_at_time(time).position()
    }

    fn orbital_velocity_at(&self, time: f64) -> Vector3<f64> {
        self.orbit.state_at_time(time).velocity()
    }

    fn normal_vector(&self) -> Unit<Vector3<f64>> {
        self.orbit.orbit().normal_vector()
    }
}

impl<'a> BodyGeometry for OrreryBody<'a> {
    type Orbit = OrreryOrbit<'a>;

    fn radius(&self) -> f64 {
        self.orrery.get_body(self.id).info.radius
    }

    fn position_at(&self, time: f64) -> Point3<f64> {
        self.orrery.body_position(self.id, time)
    }

    fn orbit(&self) -> Option<OrreryOrbit<'a>> {
        let orbit = self.orrery.orbit_of_body(self.id)?;
        Some(OrreryOrbit::new(self.orrery, orbit.clone()))
    }
}
