//! A module for computing simple Keplerian orbits.
//!
//! The important structs in this module are:
//! - [Orbit], which represents an orbit of a primary body around a
//!   secondary. It is possible to customize the primary and secondary bodies
//!   via the type parameters.
//! - [TimedOrbit], an [Orbit] pinned to a particular moment, so that positions
//!   can be asked for at absolute times.
//! - [CartesianState], which represents a position and velocity

mod orbit;
mod state;

pub use orbit::{Orbit, TimedOrbit};
pub use state::CartesianState;

// Newton's gravitational constant, in N m^2 / kg^2
pub const NEWTON_G: f64 = 6.6743015e-11;

/// A point mass with no other physical properties.
///
/// Useful for satisfying a [HasMass] trait bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass(f64);

/// A trait indicating this object can be used in physical computations that
/// require a massive body.
pub trait HasMass {
    /// The standard gravitational parameter of this object
    fn mu(&self) -> f64;

    /// The mass of this object
    fn mass(&self) -> f64 {
        self.mu() / NEWTON_G
    }
}

impl PointMass {
    pub fn with_mu(mu: f64) -> Self {
        Self(mu)
    }
}

impl HasMass for PointMass {
    fn mu(&self) -> f64 {
        self.0
    }
}

impl<T> HasMass for &T
where
    T: HasMass,
{
    fn mu(&self) -> f64 {
        (*self).mu()
    }
}
