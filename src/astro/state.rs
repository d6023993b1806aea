use nalgebra::Vector3;

use super::orbit::Orbit;
use super::HasMass;

/// A position and velocity, relative to some primary body.
#[derive(Debug, Clone)]
pub struct CartesianState<P> {
    primary: P,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
}

impl<P> CartesianState<P> {
    pub fn new(primary: P, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        CartesianState {
            primary,
            position,
            velocity,
        }
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }
}

impl<P: HasMass> CartesianState<P> {
    pub fn into_orbit(self) -> Orbit<P, ()> {
        Orbit::from_cartesian(self.primary, (), &self.position, &self.velocity)
    }
}
