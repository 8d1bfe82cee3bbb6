//! Numeric conversion helpers centralizing the casts between gold (`f64`)
//! and whole-unit quantities (`u32` / `i64`).

use num_traits::cast::cast;

/// Largest whole number of units affordable with `gold` at `unit_cost` each.
///
/// Returns 0 for a non-positive cost, non-finite inputs, or negative gold.
#[must_use]
pub fn affordable_units(gold: f64, unit_cost: f64) -> i64 {
    if !gold.is_finite() || !unit_cost.is_finite() || unit_cost <= 0.0 || gold <= 0.0 {
        return 0;
    }
    floor_f64_to_i64((gold / unit_cost).max(0.0))
}

/// Floor a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    cast::<f64, i64>(value.clamp(min, max).floor()).unwrap_or(0)
}

/// Clamp an i64 quantity into the `u32` range used for stored quantities.
#[must_use]
pub fn clamp_i64_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Convert a unit count to f64 for price arithmetic.
#[must_use]
pub fn units_to_f64(value: u32) -> f64 {
    f64::from(value)
}

/// Convert a sold-volume total to f64. Precision loss above 2^53 is accepted here only.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(f64::MAX)
}

/// Convert a count (stacked effect copies, seats, matches) to f64.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affordable_units_floors_and_guards() {
        assert_eq!(affordable_units(80.0, 0.5), 160);
        assert_eq!(affordable_units(4.9, 1.0), 4);
        assert_eq!(affordable_units(10.0, 0.0), 0);
        assert_eq!(affordable_units(-3.0, 1.0), 0);
        assert_eq!(affordable_units(f64::NAN, 1.0), 0);
    }

    #[test]
    fn clamp_handles_negative_and_overflow() {
        assert_eq!(clamp_i64_to_u32(-5), 0);
        assert_eq!(clamp_i64_to_u32(i64::MAX), u32::MAX);
        assert_eq!(clamp_i64_to_u32(42), 42);
    }

    #[test]
    fn counts_convert_exactly_in_range() {
        assert!((u64_to_f64(1_500) - 1_500.0).abs() < f64::EPSILON);
        assert!((usize_to_f64(3) - 3.0).abs() < f64::EPSILON);
        assert!(u64_to_f64(u64::MAX) > 1.8e19);
    }

    #[test]
    fn floor_handles_non_finite() {
        assert_eq!(floor_f64_to_i64(f64::INFINITY), 0);
        assert_eq!(floor_f64_to_i64(2.9), 2);
        assert_eq!(floor_f64_to_i64(-2.1), -3);
    }
}
