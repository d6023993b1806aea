use std::cmp::Ordering;

use nalgebra::Vector3;

use super::Orbit;
use crate::astro::state::CartesianState;
use crate::astro::HasMass;
use crate::math::root_finding::{find_root_bracket, newton_plus_bisection};
use crate::math::stumpff::stumpff_G;

const NUM_ITERATIONS_DELTA_T: usize = 2000;

impl<P: HasMass, S> Orbit<P, S> {
    /// Returns the state at universal anomaly `s`, in the orbit's own frame
    /// (z normal, x towards periapsis).
    #[allow(non_snake_case)]
    fn get_state_native_frame(&self, s: f64) -> CartesianState<&P> {
        let mu = self.primary.mu();
        let beta = self.beta();
        let h = self.angular_momentum();
        let G: [f64; 4] = stumpff_G(beta, s);

        let x = self.periapsis() - mu * G[2];
        let y = h * G[1];
        let r = (x * x + y * y).sqrt();
        let vx = -mu / r * G[1];
        let vy = h / r * G[0];

        let position = Vector3::new(x, y, 0.0);
        let velocity = Vector3::new(vx, vy, 0.0);

        CartesianState::new(&self.primary, position, velocity)
    }

    pub fn get_state_at_universal_anomaly(&self, s: f64) -> CartesianState<&P> {
        let native_state = self.get_state_native_frame(s);

        let position = self.rotation * native_state.position();
        let velocity = self.rotation * native_state.velocity();

        CartesianState::new(&self.primary, position, velocity)
    }

    pub fn get_state_at_tsp(&self, time_since_periapsis: f64) -> CartesianState<&P> {
        let s = self.tsp_to_s(time_since_periapsis);
        self.get_state_at_universal_anomaly(s)
    }

    /// Returns t(s) and t'(s), evaluted at the given point, where
    /// t(s) = r_p * G_1(β, s) + mu * G_3(β, s)
    #[allow(non_snake_case)]
    fn ts_and_derivative(&self, s: f64) -> (f64, f64) {
        let beta = self.beta();
        let mu = self.primary.mu();
        let r_p = self.periapsis();

        let G = stumpff_G(beta, s);
        let t = r_p * G[1] + mu * G[3];
        let t_prime = r_p * G[0] + mu * G[2];

        (t, t_prime)
    }

    #[allow(clippy::float_cmp)]
    pub fn tsp_to_s(&self, time_since_periapsis: f64) -> f64 {
        if time_since_periapsis == 0.0 {
            return 0.0;
        }

        // t(s) is monotonically increasing, so there's exactly one root
        let f_and_f_prime = |s: f64| {
            let (t, t_prime) = self.ts_and_derivative(s);
            (t - time_since_periapsis, t_prime)
        };

        let center = time_since_periapsis / self.periapsis();
        let bracket = find_root_bracket(
            |x| f_and_f_prime(x).0,
            center,
            center,
            NUM_ITERATIONS_DELTA_T,
        );
        newton_plus_bisection(f_and_f_prime, bracket, NUM_ITERATIONS_DELTA_T)
    }

    pub fn s_to_tsp(&self, s: f64) -> f64 {
        self.ts_and_derivative(s).0
    }

    /// Returns the (outbound, non-negative) universal anomaly at which the
    /// orbit reaches the given radius, if it ever does.
    #[allow(non_snake_case)]
    pub fn get_s_at_radius(&self, radius: f64) -> Option<f64> {
        let mu = self.primary.mu();
        let ecc = self.eccentricity();
        let beta = self.beta();
        let r_p = self.periapsis();

        // r = r_p + mu e G_2, so...
        let desired_G2 = (radius - r_p) / mu / ecc;
        if !desired_G2.is_finite() || desired_G2 < 0.0 {
            return None;
        }

        let s = match beta.partial_cmp(&0.0)? {
            Ordering::Less => {
                // Hyperbola: G2 = (1 - cosh(s sqrt -beta)) / beta
                let tmp = 1.0 - desired_G2 * beta;
                if tmp < 1.0 {
                    return None;
                }
                tmp.acosh() / (-beta).sqrt()
            }
            Ordering::Equal => {
                // Parabola: G2 = s^2 / 2
                (desired_G2 * 2.0).sqrt()
            }
            Ordering::Greater => {
                // Ellipse: G2 = (1 - cos(s sqrt beta)) / beta
                let tmp = 1.0 - desired_G2 * beta;
                if tmp.abs() > 1.0 {
                    return None;
                }
                tmp.acos() / beta.sqrt()
            }
        };

        Some(s)
    }
}
