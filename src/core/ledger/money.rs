/// Absolute tolerance, in currency units, below which an amount counts as zero.
pub const ZERO_TOLERANCE: f64 = 0.01;

/// Rounds to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn is_effectively_zero(value: f64) -> bool {
    value.abs() <= ZERO_TOLERANCE
}

/// True when `value` is large enough to be shown as a debt.
pub fn exceeds_tolerance(value: f64) -> bool {
    value > ZERO_TOLERANCE
}
