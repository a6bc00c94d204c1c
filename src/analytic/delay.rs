use super::{max_agents, min_agents};

/// Erlang-C probability that an arrival has to wait.
///
/// Returns 1.0 for an unstable system (`agents <= traffic`). Derived from the
/// Erlang-B value via `C = B / (1 - rho * (1 - B))`, which keeps the whole
/// computation on the stable inverse recursion.
pub fn wait_probability(agents: u32, traffic: f64) -> f64 {
    if traffic <= 0.0 {
        return 0.0;
    }
    if (agents as f64) <= traffic {
        return 1.0;
    }
    let b = super::blocking_probability(traffic, agents);
    let rho = traffic / agents as f64;
    let c = b / (1.0 - rho * (1.0 - b));
    c.clamp(0.0, 1.0)
}

/// Fraction of contacts answered within `threshold_secs`.
pub fn service_level(agents: u32, traffic: f64, aht_secs: f64, threshold_secs: f64) -> f64 {
    if traffic <= 0.0 {
        return 1.0;
    }
    if (agents as f64) <= traffic {
        return 0.0;
    }
    let pw = wait_probability(agents, traffic);
    let surplus = agents as f64 - traffic;
    let sl = (1.0 - pw) + pw * (1.0 - (-surplus / aht_secs * threshold_secs).exp());
    sl.clamp(0.0, 1.0)
}

/// Mean wait over all contacts, in seconds. +inf when unstable.
pub fn average_speed_of_answer(agents: u32, traffic: f64, aht_secs: f64) -> f64 {
    if traffic <= 0.0 {
        return 0.0;
    }
    if (agents as f64) <= traffic {
        return f64::INFINITY;
    }
    wait_probability(agents, traffic) * aht_secs / (agents as f64 - traffic)
}

pub fn occupancy(agents: u32, traffic: f64) -> f64 {
    if agents == 0 {
        return 0.0;
    }
    (traffic.max(0.0) / agents as f64).clamp(0.0, 1.0)
}

/// Fewest agents meeting `target_sl` within the occupancy cap.
///
/// Service level is non-decreasing in agents, so the first count that passes
/// is the answer. The scan is bounded; a target no count in bounds can meet
/// returns `None`.
pub fn solve_agents(
    traffic: f64,
    aht_secs: f64,
    target_sl: f64,
    threshold_secs: f64,
    max_occupancy: f64,
) -> Option<u32> {
    if traffic <= 0.0 {
        return Some(0);
    }
    let start = min_agents(traffic, max_occupancy);
    let limit = max_agents(traffic, start);
    (start..=limit).find(|&agents| {
        service_level(agents, traffic, aht_secs, threshold_secs) >= target_sl
            && occupancy(agents, traffic) <= max_occupancy
    })
}
