use std::f64::consts::PI;

use nalgebra::{Rotation3, Unit, Vector3};

use super::HasMass;
use crate::math::geometry::always_find_rotation;

mod state_methods;
mod timed_orbit;

pub use timed_orbit::TimedOrbit;

/// A conic section around `primary`, followed by `secondary`.
#[derive(Debug, Clone, Copy)]
pub struct Orbit<P, S> {
    primary: P,
    secondary: S,
    /// Takes the xy plane to the orbital plane, with x going to periapsis.
    rotation: Rotation3<f64>,
    /// 1/a, which stays finite for parabolas.
    alpha: f64,
    /// Semi-latus rectum, a(1 - e^2).
    slr: f64,
}

impl<P, S> Orbit<P, S> {
    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn with_secondary<S2>(self, secondary: S2) -> Orbit<P, S2> {
        Orbit {
            primary: self.primary,
            secondary,
            rotation: self.rotation,
            alpha: self.alpha,
            slr: self.slr,
        }
    }

    pub fn map_primary<P2, F: FnOnce(P) -> P2>(self, f: F) -> Orbit<P2, S> {
        Orbit {
            primary: f(self.primary),
            secondary: self.secondary,
            rotation: self.rotation,
            alpha: self.alpha,
            slr: self.slr,
        }
    }

    /// Builds an orbit from its elements. Angles are in radians.
    pub fn from_kepler(
        primary: P,
        secondary: S,
        a: f64,
        ecc: f64,
        incl: f64,
        lan: f64,
        argp: f64,
    ) -> Self {
        // Periapsis starts along x; spin it to the ascending node, tilt the
        // plane, then swing the node into place.
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), lan)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), incl)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), argp);

        Orbit {
            primary,
            secondary,
            rotation,
            alpha: a.recip(),
            slr: a * (1.0 - ecc * ecc),
        }
    }

    pub fn rotation(&self) -> Rotation3<f64> {
        self.rotation
    }

    pub fn normal_vector(&self) -> Unit<Vector3<f64>> {
        self.rotation * Vector3::z_axis()
    }

    pub fn semimajor_axis(&self) -> f64 {
        self.alpha.recip()
    }

    pub fn eccentricity(&self) -> f64 {
        let e_squared = 1.0 - self.slr * self.alpha;
        // Circular orbits built from a state can land a hair below zero
        assert!(
            e_squared > -1e-9,
            "Bad orbit shape: alpha = {}, slr = {}",
            self.alpha,
            self.slr
        );
        e_squared.max(0.0).sqrt()
    }

    pub fn inclination(&self) -> f64 {
        self.normal_vector().angle(&Vector3::z())
    }

    pub fn is_closed(&self) -> bool {
        self.alpha > 0.0
    }

    pub fn periapsis(&self) -> f64 {
        // l / (1 + e) instead of a(1 - e), so parabolas work too
        self.slr / (1.0 + self.eccentricity())
    }

    pub fn apoapsis(&self) -> Option<f64> {
        self.is_closed()
            .then(|| 2.0 * self.semimajor_axis() - self.periapsis())
    }
}

impl<P: HasMass, S> Orbit<P, S> {
    pub fn from_cartesian(
        primary: P,
        secondary: S,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> Self {
        let mu = primary.mu();
        let r = position.norm();
        let h = position.cross(velocity);
        // Points at periapsis, with length e
        let ecc_vector = velocity.cross(&h) / mu - position / r;

        // Vis-viva: v^2 = mu (2/r - 1/a)
        let alpha = 2.0 / r - velocity.norm_squared() / mu;

        Self {
            primary,
            secondary,
            rotation: always_find_rotation(&h, &ecc_vector, 1e-20),
            alpha,
            slr: h.norm_squared() / mu,
        }
    }

    /// mu / a, the coefficient in the universal Kepler equation.
    pub fn beta(&self) -> f64 {
        self.primary.mu() * self.alpha
    }

    pub fn angular_momentum(&self) -> f64 {
        (self.slr * self.primary.mu()).sqrt()
    }

    pub fn period(&self) -> Option<f64> {
        self.is_closed()
            .then(|| 2.0 * PI * (self.semimajor_axis().powi(3) / self.primary.mu()).sqrt())
    }
}

impl<P: HasMass, S: HasMass> Orbit<P, S> {
    /// Laplace's approximation, a (m/M)^(2/5). Only meaningful when closed.
    pub fn soi_radius(&self) -> f64 {
        let sma = self.semimajor_axis();
        assert!(sma > 0.0, "Open orbits have no sphere of influence");
        sma * (self.secondary.mu() / self.primary.mu()).powf(0.4)
    }
}
