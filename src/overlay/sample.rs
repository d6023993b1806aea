use std::f64::consts::FRAC_PI_2;

use nalgebra::{Unit, Vector3};

use super::hit_test::HitResult;
use super::host::{BodyGeometry, OrbitGeometry};
use super::settings::OverlaySettings;
use crate::math::geometry::rotate_about;

/// The quantities shown for a hovered point. Each is `None` when switched off,
/// or when it can't be computed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayFields {
    /// Seconds from the hovered point until now; negative for future points.
    pub time_remaining: Option<f64>,
    /// Meters above the reference body's surface.
    pub altitude: Option<f64>,
    /// Meters per second, relative to the reference body.
    pub speed: Option<f64>,
    /// Degrees in [0, 360).
    pub angle_to_prograde: Option<f64>,
}

pub fn summarize<O: OrbitGeometry>(
    hit: &HitResult<O>,
    now: f64,
    settings: &OverlaySettings,
) -> DisplayFields {
    let orbit = &hit.orbit;
    let t = hit.time;

    DisplayFields {
        time_remaining: settings.show_time.then(|| now - t),
        altitude: settings.show_altitude.then(|| altitude_at(orbit, t)),
        speed: settings.show_speed.then(|| orbit.orbital_speed_at(t)),
        angle_to_prograde: if settings.show_angle_to_prograde {
            angle_to_prograde_at(orbit, t)
        } else {
            None
        },
    }
}

pub fn altitude_at<O: OrbitGeometry>(orbit: &O, time: f64) -> f64 {
    let body = orbit.reference_body();
    (orbit.position_at(time) - body.position_at(time)).norm() - body.radius()
}

/// Angle between the orbiting object and the direction its reference body is
/// travelling in. `None` if the reference body doesn't move, i.e. is the root.
pub fn angle_to_prograde_at<O: OrbitGeometry>(orbit: &O, time: f64) -> Option<f64> {
    let body_orbit = orbit.reference_body().orbit()?;

    let body_velocity = body_orbit.orbital_velocity_at(time);
    let ship_position = orbit.relative_position_at(time);
    Some(signed_angle(
        &ship_position,
        &body_velocity,
        &body_orbit.normal_vector(),
    ))
}

/// Unsigned angle from `prograde` to `position`, in degrees, extended to
/// [0, 360) by checking which side of `prograde` the position is on.
pub fn signed_angle(
    position: &Vector3<f64>,
    prograde: &Vector3<f64>,
    normal: &Unit<Vector3<f64>>,
) -> f64 {
    let raw = position.angle(prograde).to_degrees();

    let rotated = rotate_about(prograde, normal, FRAC_PI_2);
    let angle = if rotated.dot(position) > 0.0 {
        360.0 - raw
    } else {
        raw
    };

    if angle >= 360.0 {
        angle - 360.0
    } else {
        angle
    }
}
