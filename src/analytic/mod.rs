mod abandonment;
mod blocking;
mod delay;
mod retrial;

pub use abandonment::{
    abandonment_probability, asa_with_abandonment, service_level_with_abandonment,
    solve_agents_with_abandonment,
};
pub use blocking::{blocking_probability, required_lines};
pub use delay::{average_speed_of_answer, occupancy, service_level, solve_agents, wait_probability};
pub use retrial::{
    abandonment_rate, retrial_probability, service_level_with_retrial, solve_agents_with_retrial,
    solve_equilibrium, virtual_traffic, Equilibrium,
};

/// Offered traffic in Erlangs: the average number of simultaneous
/// conversations the workload represents.
pub fn traffic_intensity(volume: f64, aht_secs: f64, interval_secs: f64) -> f64 {
    if volume <= 0.0 || aht_secs <= 0.0 || interval_secs <= 0.0 {
        return 0.0;
    }
    volume * aht_secs / interval_secs
}

/// Headcount after shrinkage: `agents / (1 - shrinkage)`.
///
/// Negative shrinkage normalizes to zero; shrinkage of 1 yields +inf
/// (no amount of headcount covers 100% shrinkage).
pub fn total_fte(agents: u32, shrinkage: f64) -> f64 {
    let shrinkage = shrinkage.max(0.0);
    if shrinkage >= 1.0 {
        return f64::INFINITY;
    }
    agents as f64 / (1.0 - shrinkage)
}

/// Lowest agent count worth trying: the occupancy cap floor, at minimum one
/// agent for any non-zero traffic.
pub(crate) fn min_agents(traffic: f64, max_occupancy: f64) -> u32 {
    if traffic <= 0.0 {
        return 0;
    }
    let cap = max_occupancy.clamp(f64::MIN_POSITIVE, 1.0);
    (traffic / cap).ceil().max(1.0) as u32
}

/// Upper search bound for the agent solvers, scaled to traffic so pathological
/// targets (e.g. 100% within 1s) terminate with `None` instead of spinning.
pub(crate) fn max_agents(traffic: f64, min_agents: u32) -> u32 {
    ((traffic * 5.0).ceil() as u32).max(min_agents + 50)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_intensity_matches_erlang_definition() {
        let a = traffic_intensity(1000.0, 240.0, 1800.0);
        assert!((a - 133.333).abs() < 0.01);
    }

    #[test]
    fn traffic_intensity_scales_linearly() {
        let base = traffic_intensity(100.0, 120.0, 1800.0);
        assert!((traffic_intensity(200.0, 120.0, 1800.0) - 2.0 * base).abs() < 1e-9);
        assert!((traffic_intensity(100.0, 240.0, 1800.0) - 2.0 * base).abs() < 1e-9);
        assert!((traffic_intensity(100.0, 120.0, 3600.0) - base / 2.0).abs() < 1e-9);
    }

    #[test]
    fn traffic_intensity_rejects_bad_inputs() {
        assert_eq!(traffic_intensity(-1.0, 240.0, 1800.0), 0.0);
        assert_eq!(traffic_intensity(100.0, 0.0, 1800.0), 0.0);
        assert_eq!(traffic_intensity(100.0, 240.0, 0.0), 0.0);
    }

    #[test]
    fn fte_law_holds() {
        assert!((total_fte(10, 0.25) - 13.333).abs() < 0.01);
        assert_eq!(total_fte(10, 0.0), 10.0);
    }

    #[test]
    fn fte_full_shrinkage_is_infinite() {
        assert!(total_fte(10, 1.0).is_infinite());
        assert!(total_fte(10, 1.5).is_infinite());
    }

    #[test]
    fn fte_negative_shrinkage_normalizes_to_zero() {
        assert_eq!(total_fte(10, -0.1), 10.0);
    }

    #[test]
    fn min_agents_respects_occupancy_cap() {
        assert_eq!(min_agents(10.0, 0.85), 12);
        assert_eq!(min_agents(10.0, 1.0), 10);
        assert_eq!(min_agents(0.0, 0.85), 0);
        assert_eq!(min_agents(0.3, 1.0), 1);
    }

    #[test]
    fn max_agents_is_traffic_scaled_with_floor() {
        assert_eq!(max_agents(100.0, 110), 500);
        assert_eq!(max_agents(2.0, 3), 53);
    }
}
