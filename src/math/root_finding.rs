use super::intervals::Interval;

/// Very primitive way to construct a bracket for future root-finding.
/// Simply doubles the radius until a bracket with opposite signs at the
/// endpoints is found.
pub fn find_root_bracket(
    f: impl Fn(f64) -> f64,
    center: f64,
    mut radius: f64,
    num_iterations: usize,
) -> Interval {
    let initial_radius = radius;
    for _ in 0..num_iterations {
        let a = center - radius;
        let b = center + radius;

        if f(a) * f(b) < 0.0 {
            return Interval::new(a, b);
        }

        radius *= 2.0;
    }

    panic!(
        "Unable to find two points of opposite sign, starting at {} with radius {}",
        center, initial_radius
    );
}

// Adapted from `rtsafe` in http://www.grad.hr/nastava/gs/prg/NumericalRecipesinC.pdf
pub fn newton_plus_bisection(
    f_and_f_prime: impl Fn(f64) -> (f64, f64),
    mut interval: Interval,
    num_iterations: usize,
) -> f64 {
    // Start in the middle, and remember which way f is oriented on the bracket.
    let mut guess = interval.midpoint();
    let lo_is_neg = f_and_f_prime(interval.lo()).0 < 0.0;

    for _ in 0..num_iterations {
        let (f, f_prime) = f_and_f_prime(guess);

        interval = match (lo_is_neg, f < 0.0) {
            (true, true) => interval.split_right(guess),   // - - +
            (true, false) => interval.split_left(guess),   // - + +
            (false, true) => interval.split_left(guess),   // + - -
            (false, false) => interval.split_right(guess), // + + -
        };

        if interval.is_exhausted() {
            return guess;
        }

        // Newton steps that land on or outside the bracket don't shrink it,
        // so fall back to bisecting.
        let newton_guess = guess - f / f_prime;
        guess = if interval.contains_interior(newton_guess) {
            newton_guess
        } else {
            interval.midpoint()
        };
    }

    panic!(
        "Hit max iterations ({}) when trying to find a root in {}",
        num_iterations, interval
    );
}
