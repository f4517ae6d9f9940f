// Scalar transforms shared by the parameter mapper
//
// All curves take a normalized source value, clamp it into [0, 1] first,
// and return a value already inside the native range.

/// Decimal digits kept in snapshot values
pub const SNAPSHOT_DECIMALS: i32 = 6;

/// Clamp into `[lo, hi]`; NaN maps to `lo`
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        return lo;
    }
    value.max(lo).min(hi)
}

/// Clamp into the normalized range
pub fn unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// `clamp(value * gain, lo, hi)`
pub fn scaled(value: f64, gain: f64, lo: f64, hi: f64) -> f64 {
    clamp(value * gain, lo, hi)
}

/// Exponential time curve `lo * (hi / lo)^n`
///
/// The endpoints return the anchors exactly instead of going through `powf`.
pub fn exp_time(value: f64, lo: f64, hi: f64) -> f64 {
    let n = unit(value);
    if n <= 0.0 {
        return lo;
    }
    if n >= 1.0 {
        return hi;
    }
    lo * (hi / lo).powf(n)
}

/// Power time curve `lo + n^exponent * (hi - lo)`
pub fn power_time(value: f64, lo: f64, hi: f64, exponent: f64) -> f64 {
    let n = unit(value);
    lo + n.powf(exponent) * (hi - lo)
}

/// Linear map of a normalized value onto `[lo, hi]`
pub fn linear(value: f64, lo: f64, hi: f64) -> f64 {
    lo + unit(value) * (hi - lo)
}

/// Switch-style attribute: on when the normalized value reaches one half
pub fn flag(value: f64) -> u8 {
    u8::from(unit(value) >= 0.5)
}

/// Round to [`SNAPSHOT_DECIMALS`] digits, ties to even
pub fn round6(value: f64) -> f64 {
    let scale = 10f64.powi(SNAPSHOT_DECIMALS);
    let rounded = (value * scale).round_ties_even() / scale;
    // normalizes -0.0
    rounded + 0.0
}

/// Split a bipolar envelope amount into magnitude and polarity bit
///
/// With `full_range` set, the center of the source range is zero depth and
/// the lower half inverts the envelope. Otherwise the raw value is the depth.
pub fn bipolar(value: f64, full_range: bool) -> (f64, u8) {
    let raw = unit(value);
    if !full_range {
        return (raw, 0);
    }
    let centered = (raw - 0.5) * 2.0;
    (centered.abs(), u8::from(centered < 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_scale_stays_in_bounds() {
        for input in [-3.0, -0.01, 0.0, 0.3, 1.0, 1.7, 42.0] {
            let v = scaled(input, 1.2, 0.0, 1.2);
            assert!((0.0..=1.2).contains(&v), "{input} -> {v}");
            let u = unit(input);
            assert!((0.0..=1.0).contains(&u));
        }
        assert_eq!(clamp(f64::NAN, 0.05, 0.95), 0.05);
        assert_eq!(clamp(f64::INFINITY, 0.0, 1.0), 1.0);
    }

    #[test]
    fn exp_time_hits_anchors_and_is_monotonic() {
        assert_eq!(exp_time(0.0, 0.001, 4.0), 0.001);
        assert_eq!(exp_time(1.0, 0.001, 4.0), 4.0);
        assert_eq!(exp_time(-1.0, 0.001, 4.0), 0.001);
        assert_eq!(exp_time(2.0, 0.001, 4.0), 4.0);

        let mut prev = 0.0;
        for step in 0..=100 {
            let v = exp_time(step as f64 / 100.0, 0.001, 4.0);
            assert!(v > prev, "not increasing at step {step}");
            prev = v;
        }
    }

    #[test]
    fn power_time_hits_anchors_and_is_monotonic() {
        assert_eq!(power_time(0.0, 0.001, 6.0, 2.2), 0.001);
        assert_eq!(power_time(1.0, 0.001, 6.0, 2.2), 6.0);

        let mut prev = 0.0;
        for step in 0..=100 {
            let v = power_time(step as f64 / 100.0, 0.001, 8.0, 2.2);
            assert!(v > prev, "not increasing at step {step}");
            prev = v;
        }
        // short times for small settings
        assert!(power_time(0.1, 0.001, 6.0, 2.2) < 0.05);
    }

    #[test]
    fn bipolar_center_is_zero_depth() {
        assert_eq!(bipolar(0.5, true), (0.0, 0));
        assert_eq!(bipolar(0.5, false), (0.5, 0));
        let (depth, polarity) = bipolar(0.9, true);
        assert!((depth - 0.8).abs() < 1e-12);
        assert_eq!(polarity, 0);
        assert_eq!(bipolar(0.0, true), (1.0, 1));
        assert_eq!(bipolar(0.2, false), (0.2, 0));
    }

    #[test]
    fn round6_keeps_six_digits() {
        assert_eq!(round6(0.447_213_595_5), 0.447_214);
        assert_eq!(round6(0.4 * 1.2), 0.48);
        assert_eq!(round6(-0.000_000_1), 0.0);
        assert!(round6(-0.000_000_1).is_sign_positive());
    }

    #[test]
    fn round6_ties_go_to_even() {
        // 2^-7 and 3 * 2^-7 sit exactly on a sixth-digit tie
        assert_eq!(round6(0.007_812_5), 0.007_812);
        assert_eq!(round6(0.023_437_5), 0.023_438);
        assert_eq!(round6(-0.007_812_5), -0.007_812);
    }

    #[test]
    fn flag_threshold() {
        assert_eq!(flag(0.49), 0);
        assert_eq!(flag(0.5), 1);
        assert_eq!(flag(7.0), 1);
        assert_eq!(flag(-1.0), 0);
    }
}
