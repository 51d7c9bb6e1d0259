//! Numeric helpers shared by the investment and loan engines.
//!
//! Two monthly-rate conventions coexist here and must stay separate:
//! investments compound geometrically (`(1 + annual)^(1/12) - 1`) while loans
//! use the nominal `annual / 12` convention.

/// Clamps `value` into `[min, max]`. NaN collapses to `min`.
pub fn clamp_to(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Replaces non-finite results of degenerate numeric paths with 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Rounds to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Monthly compounding rate equivalent to an effective annual percentage.
///
/// Returns 0 when the annual fraction is `<= -1` or not finite.
pub fn effective_monthly_rate(annual_percent: f64) -> f64 {
    let annual = annual_percent / 100.0;
    if !annual.is_finite() || annual <= -1.0 {
        return 0.0;
    }
    finite_or_zero((1.0 + annual).powf(1.0 / 12.0) - 1.0)
}

/// Monthly loan rate from a nominal annual percentage (`annual / 12`).
///
/// Returns 0 for negative or non-finite input.
pub fn loan_monthly_rate(annual_percent: f64) -> f64 {
    let annual = annual_percent / 100.0;
    if !annual.is_finite() || annual < 0.0 {
        return 0.0;
    }
    annual / 12.0
}

/// Compounds `base` by `percent` once per elapsed year.
pub fn stepped_amount(base: f64, percent: f64, years_elapsed: u32) -> f64 {
    let step = percent / 100.0;
    finite_or_zero(base * (1.0 + step).powi(years_elapsed as i32))
}
