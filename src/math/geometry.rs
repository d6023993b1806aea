use nalgebra::{Rotation3, Unit, Vector3};

use std::f64::consts::PI;

/// Computes the vector rejection of u from v. v must be non-zero.
pub fn reject(u: &Vector3<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    let u_proj_v = u.dot(v) * v / v.norm_squared();
    u - u_proj_v
}

/// Rotates `v` by `angle` radians around `axis`, right-handed.
pub fn rotate_about(v: &Vector3<f64>, axis: &Unit<Vector3<f64>>, angle: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(axis, angle) * v
}

/// Returns a rotation R that sends the z- and x- axes to point in the specified directions.
/// The orthogonality of new_z and new_x is not checked.
/// If new_z or new_x is sufficiently close to zero, then some semi-canonical choices will
/// be made. Unfortunately, the hairy ball theorem prevents us from doing so in a completely
/// canonical way.
///
/// The specific choices we make are:
/// - if new_z is small:
///   - R(z) will point as much along the z-axis as possible, while remaining perpendicular
///     to R(x) = new_x
///   - if this is ill-defined (new_x ~= z), then R(z) = y
/// - similarly, if new_x is small:
///   - R(x) will point as much along the x-axis as possible, while remaining perpendicular
///     to R(z) = new_z
///   - if this is ill-defined (new_z ~= x), then R(x) = -y
/// - if both new_z and new_x are small, then this returns the identity
pub fn always_find_rotation(
    new_z: &Vector3<f64>,
    new_x: &Vector3<f64>,
    tolerance: f64,
) -> Rotation3<f64> {
    let z_large_enough = new_z.norm() >= tolerance;
    let x_large_enough = new_x.norm() >= tolerance;

    let (new_z, new_x) = match (z_large_enough, x_large_enough) {
        // Both are good; the easy case
        (true, true) => (*new_z, *new_x),
        // z is too small
        (false, true) => {
            // Rejecting the z axis from new_x gives us the most-z-like vector
            // that's perpendicular to new_x. If it's too small, we just pick
            // our fallback choice.
            let mut best_new_z = reject(&Vector3::z(), new_x);
            if best_new_z.norm() < tolerance {
                best_new_z = Vector3::y();
            };
            (best_new_z, *new_x)
        }
        // x is too small
        (true, false) => {
            // Same thing as above, with z and x switched.
            let mut best_new_x = reject(&Vector3::x(), new_z);
            if best_new_x.norm() < tolerance {
                best_new_x = -Vector3::y();
            };
            (*new_z, best_new_x)
        }
        // Easy case, early return here.
        (false, false) => return Rotation3::identity(),
    };

    // Unfortunately, the Rotation::face_towards call takes new-z and new-y as arguments,
    // so we prepend a 90-degree rotation around z (e.g., one taking x to y).
    let mut rotation = Rotation3::face_towards(&new_z, &new_x);
    rotation *= Rotation3::from_axis_angle(&Vector3::z_axis(), PI / 2.0);
    rotation.renormalize();
    rotation
}
