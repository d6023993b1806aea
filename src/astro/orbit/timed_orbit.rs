use super::Orbit;
use crate::astro::state::CartesianState;
use crate::astro::HasMass;

/// An orbit together with the moment its secondary passes periapsis, so that
/// positions can be looked up by absolute time.
#[derive(Debug, Clone)]
pub struct TimedOrbit<P, S> {
    orbit: Orbit<P, S>,
    time_at_periapsis: f64,
}

impl<P, S> TimedOrbit<P, S> {
    pub fn from_orbit(orbit: Orbit<P, S>, time_at_periapsis: f64) -> Self {
        Self {
            orbit,
            time_at_periapsis,
        }
    }

    pub fn orbit(&self) -> &Orbit<P, S> {
        &self.orbit
    }

    pub fn primary(&self) -> &P {
        self.orbit.primary()
    }
}

impl<P: HasMass, S> TimedOrbit<P, S> {
    pub fn state_at_time(&self, time: f64) -> CartesianState<&P> {
        self.orbit.get_state_at_tsp(time - self.time_at_periapsis)
    }

    pub fn s_at_time(&self, time: f64) -> f64 {
        self.orbit.tsp_to_s(time - self.time_at_periapsis)
    }

    pub fn time_at_s(&self, s: f64) -> f64 {
        self.time_at_periapsis + self.orbit.s_to_tsp(s)
    }
}

impl<P: HasMass> TimedOrbit<P, ()> {
    pub fn from_state(state: CartesianState<P>, current_time: f64) -> Self {
        let position = state.position();
        let orbit = state.into_orbit();

        // For circular orbits the anomaly depends on which periapsis
        // direction the rotation picked, but it is consistent with it.
        let pos_in_plane = orbit.rotation().inverse_transform_vector(&position);

        let theta = pos_in_plane.y.atan2(pos_in_plane.x);
        let tan_half_theta = (theta / 2.0).tan();
        let h = orbit.angular_momentum();
        let r_p = orbit.periapsis();
        let g2_over_g1 = r_p / h * tan_half_theta;

        let beta: f64 = orbit.beta();
        let beta_sqrt = beta.abs().sqrt();
        let s = if beta > 0.0 {
            // Elliptic: g2/g1 = tan(s sqrt(beta) / 2) / sqrt(beta)
            (g2_over_g1 * beta_sqrt).atan() * 2.0 / beta_sqrt
        } else if beta < 0.0 {
            // Hyperbolic: g2/g1 = tanh(s sqrt(-beta) / 2) / sqrt(-beta)
            (g2_over_g1 * beta_sqrt).atanh() * 2.0 / beta_sqrt
        } else {
            // Parabolic: g2/g1 = r_p/h mu/h s = s/2
            2.0 * g2_over_g1
        };

        let time_since_periapsis = orbit.s_to_tsp(s);
        Self::from_orbit(orbit, current_time - time_since_periapsis)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use super::*;
    use crate::astro::PointMass;
    use crate::consts::{get_circular_velocity, KERBIN_MU, KERBIN_RADIUS};

    #[test]
    fn test_from_state_reproduces_state() {
        let position = Vector3::new(6.0e6, 1.0e6, 2.0e5);
        let velocity = Vector3::new(-200.0, 1000.0, 50.0);
        let orbit = TimedOrbit::from_state(
            CartesianState::new(PointMass::with_mu(KERBIN_MU), position, velocity),
            1234.0,
        );

        let state = orbit.state_at_time(1234.0);
        assert_relative_eq!(state.position(), position, epsilon = 1e-3, max_relative = 1e-8);
        assert_relative_eq!(state.velocity(), velocity, epsilon = 1e-6, max_relative = 1e-8);
    }

    #[test]
    fn test_hyperbolic_from_state() {
        let radius = KERBIN_RADIUS + 100_000.0;
        let escape = get_circular_velocity(radius, KERBIN_MU) * std::f64::consts::SQRT_2;

        let position = Vector3::new(radius, 0.0, 0.0);
        let velocity = Vector3::new(100.0, escape * 1.2, 0.0);
        let orbit = TimedOrbit::from_state(
            CartesianState::new(PointMass::with_mu(KERBIN_MU), position, velocity),
            0.0,
        );
        assert!(!orbit.orbit().is_closed());

        let state = orbit.state_at_time(0.0);
        assert_relative_eq!(state.position(), position, epsilon = 1e-3, max_relative = 1e-8);

        // Heading outwards, so later points are further away
        let later = orbit.state_at_time(600.0).position().norm();
        assert!(later > radius);
    }

    #[test]
    fn test_s_and_time_agree() {
        let orbit = TimedOrbit::from_orbit(
            Orbit::from_kepler(PointMass::with_mu(KERBIN_MU), (), 7.0e5, 0.1, 0.0, 0.0, 0.0),
            500.0,
        );
        for time in [0.0, 500.0, 2000.0] {
            assert_relative_eq!(orbit.time_at_s(orbit.s_at_time(time)), time, epsilon = 1e-6);
        }
    }
}
