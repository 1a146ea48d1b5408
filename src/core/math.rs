/**
 * Determines whether a number is zero, within a small epsilon.
 */
pub fn is_nearly_zero(x: f64) -> bool {
    f64::abs(x) < std::f64::EPSILON
}

/**
 * Determines whether a number is positive, within a small epsilon.
 */
pub fn is_positive(x: f64) -> bool {
    x > std::f64::EPSILON
}

/**
 * Bound on the relative rounding error accumulated by `n` floating-point operations, as in PBRT.
 */
pub fn gamma(n: u32) -> f64 {
    let e = n as f64 * std::f64::EPSILON * 0.5;
    e / (1.0 - e)
}
