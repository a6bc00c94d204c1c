/// Hard cap on the line scan; anything past this is a degenerate scenario,
/// not a staffing question.
const MAX_LINES: u32 = 10_000;

/// Erlang-B blocking probability for `lines` trunks offered `traffic` Erlangs.
///
/// Uses the inverse recursion `invB(k) = 1 + (k/A) * invB(k-1)` so large line
/// counts never touch a factorial.
pub fn blocking_probability(traffic: f64, lines: u32) -> f64 {
    if traffic <= 0.0 {
        return 0.0;
    }
    if lines == 0 {
        return 1.0;
    }
    let mut inv = 1.0_f64;
    for k in 1..=lines {
        inv = 1.0 + (k as f64 / traffic) * inv;
    }
    (1.0 / inv).clamp(0.0, 1.0)
}

/// Fewest lines holding blocking at or below `target_blocking`.
///
/// Scans upward from `floor(traffic)`; returns `None` past the line cap.
pub fn required_lines(traffic: f64, target_blocking: f64) -> Option<u32> {
    if traffic <= 0.0 {
        return Some(0);
    }
    let mut lines = traffic.floor().max(1.0) as u32;
    while lines <= MAX_LINES {
        if blocking_probability(traffic, lines) <= target_blocking {
            return Some(lines);
        }
        lines += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_matches_closed_form() {
        // B(A, 1) = A / (1 + A)
        let b = blocking_probability(1.0, 1);
        assert!((b - 0.5).abs() < 1e-9);
        let b = blocking_probability(3.0, 1);
        assert!((b - 0.75).abs() < 1e-9);
    }

    #[test]
    fn blocking_is_decreasing_in_lines() {
        let mut prev = 1.0;
        for lines in 1..40 {
            let b = blocking_probability(20.0, lines);
            assert!(b <= prev);
            prev = b;
        }
    }

    #[test]
    fn blocking_stays_in_unit_interval_for_large_systems() {
        let b = blocking_probability(900.0, 1000);
        assert!((0.0..=1.0).contains(&b));
        let b = blocking_probability(5000.0, 4000);
        assert!((0.0..=1.0).contains(&b));
    }

    #[test]
    fn non_positive_traffic_never_blocks() {
        assert_eq!(blocking_probability(0.0, 5), 0.0);
        assert_eq!(blocking_probability(-2.0, 5), 0.0);
    }

    #[test]
    fn zero_lines_always_block() {
        assert_eq!(blocking_probability(1.0, 0), 1.0);
    }

    #[test]
    fn required_lines_meets_target() {
        let lines = required_lines(10.0, 0.01).unwrap();
        assert!(blocking_probability(10.0, lines) <= 0.01);
        assert!(blocking_probability(10.0, lines - 1) > 0.01);
    }

    #[test]
    fn required_lines_zero_traffic_needs_none() {
        assert_eq!(required_lines(0.0, 0.01), Some(0));
        assert_eq!(required_lines(-1.0, 0.01), Some(0));
    }

    #[test]
    fn required_lines_caps_degenerate_scenarios() {
        assert_eq!(required_lines(50_000.0, 1e-12), None);
    }
}
