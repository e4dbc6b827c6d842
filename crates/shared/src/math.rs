//! Division helpers guarded against empty denominators.
//!
//! Every percentage the aggregators emit goes through these so that a zero
//! denominator yields exactly 0.0 rather than NaN or infinity.

/// `count / total * 100`, or exactly 0.0 when `total` is zero or negative.
pub fn percentage(count: i64, total: i64) -> f64 {
    if total <= 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// `numerator / denominator`, or exactly 0.0 when the denominator is zero
/// or negative.
pub fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_basic() {
        assert_eq!(percentage(3, 5), 60.0);
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(0, 10), 0.0);
        assert_eq!(percentage(10, 10), 100.0);
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(7, 0), 0.0);
    }

    #[test]
    fn test_percentage_always_finite() {
        for count in [0i64, 1, 3, 100, i64::MAX / 2] {
            for total in [0i64, 1, 3, 100, i64::MAX / 2] {
                let p = percentage(count, total);
                assert!(p.is_finite(), "percentage({count}, {total}) not finite");
                if count <= total {
                    assert!((0.0..=100.0).contains(&p));
                }
            }
        }
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(10, 4), 2.5);
        assert_eq!(ratio(0, 4), 0.0);
        assert_eq!(ratio(10, 0), 0.0);
        assert!(ratio(i64::MAX, 1).is_finite());
    }
}
