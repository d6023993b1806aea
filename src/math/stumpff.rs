use std::cmp::Ordering;

pub fn stumpff_c(x: f64) -> [f64; 4] {
    [c0(x), c1(x), c2(x), c3(x)]
}

/// Returns G_k(beta, s) = s^k c_k(beta s^2), for k = 0..3.
#[allow(non_snake_case)]
pub fn stumpff_G(beta: f64, s: f64) -> [f64; 4] {
    let mut output = stumpff_c(beta * s * s);
    for (k, value) in output.iter_mut().enumerate() {
        *value *= s.powi(k as i32);
    }

    output
}

fn compare_to_zero(x: f64) -> Ordering {
    match x.partial_cmp(&0.0) {
        Some(x) => x,
        None => panic!("Got a weird float: {:?}", x),
    }
}

pub fn c0(x: f64) -> f64 {
    match compare_to_zero(x) {
        Ordering::Greater => x.sqrt().cos(),
        Ordering::Less => (-x).sqrt().cosh(),
        Ordering::Equal => 1.0,
    }
}

pub fn c1(x: f64) -> f64 {
    match compare_to_zero(x) {
        Ordering::Greater => x.sqrt().sin() / x.sqrt(),
        Ordering::Less => (-x).sqrt().sinh() / (-x).sqrt(),
        Ordering::Equal => 1.0,
    }
}

pub fn c2(x: f64) -> f64 {
    match compare_to_zero(x) {
        // 1 - cos u = 2 sin^2(u/2)
        Ordering::Greater => 2.0 * (x.sqrt() / 2.0).sin().powi(2) / x,
        // 1 - cosh u = -2 sinh^2(u/2)
        Ordering::Less => -2.0 * ((-x).sqrt() / 2.0).sinh().powi(2) / x,
        Ordering::Equal => 0.5,
    }
}

// Chebyshev fit of c3 on [-1, 1]
const C3_CHEBYSHEV: [f64; 9] = [
    1.6676588241065263e-1,
    -8.335400232645692e-3,
    9.921887561900632e-5,
    -6.889831660341532e-7,
    3.1316569342984595e-9,
    -1.0037209903903158e-11,
    2.3897900455039615e-14,
    -4.392970771382075e-17,
    6.422446836919863e-20,
];

pub fn c3(x: f64) -> f64 {
    // Near the origin the naive formula cancels catastrophically.
    if x.abs() < 1.0 {
        evaluate_chebyshev(x, &C3_CHEBYSHEV)
    } else {
        (1.0 - c1(x)) / x
    }
}

/// Clenshaw's algorithm for a sum of Chebyshev polynomials.
pub fn evaluate_chebyshev(x: f64, coeffs: &[f64]) -> f64 {
    let n = coeffs.len() - 1;

    let mut b_k_plus_2 = 0.0;
    let mut b_k_plus_1 = 0.0;

    // b_k = a_k + 2x b_(k+1) - b_(k+2)
    for k in (1..=n).rev() {
        let b_k = coeffs[k] + 2.0 * x * b_k_plus_1 - b_k_plus_2;
        b_k_plus_2 = b_k_plus_1;
        b_k_plus_1 = b_k;
    }

    coeffs[0] + x * b_k_plus_1 - b_k_plus_2
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_values_at_zero() {
        assert_eq!(stumpff_c(0.0)[0], 1.0);
        assert_eq!(stumpff_c(0.0)[1], 1.0);
        assert_eq!(stumpff_c(0.0)[2], 0.5);
        assert_relative_eq!(c3(0.0), 1.0 / 6.0, max_relative = 1e-6);
    }

    #[test]
    fn test_recurrence() {
        // x c_{k+2}(x) = 1/k! - c_k(x)
        for x in [-20.0, -0.5, 0.3, 0.9, 4.0, 30.0] {
            assert_relative_eq!(x * c2(x), 1.0 - c0(x), epsilon = 1e-10);
            assert_relative_eq!(x * c3(x), 1.0 - c1(x), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_chebyshev_matches_naive_formula_near_cutoff() {
        let x = 0.999_999;
        let naive = (1.0 - c1(x)) / x;
        assert_relative_eq!(c3(x), naive, max_relative = 1e-9);
    }
}
