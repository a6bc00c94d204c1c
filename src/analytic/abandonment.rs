use super::{max_agents, min_agents, occupancy, wait_probability};

/// Probability a waiting caller hangs up before reaching an agent (M/M/c+M).
///
/// `1 / (1 + tau * (c - A))` of the waiters abandon, where `tau` is patience
/// expressed in handle-time units. Infinite patience never abandons; an
/// unstable or patience-free system loses every waiter.
pub fn abandonment_probability(agents: u32, traffic: f64, aht_secs: f64, patience_secs: f64) -> f64 {
    if traffic <= 0.0 {
        return 0.0;
    }
    if patience_secs.is_infinite() {
        return 0.0;
    }
    if (agents as f64) <= traffic || patience_secs <= 0.0 {
        return 1.0;
    }
    let tau = patience_secs / aht_secs;
    let pw = wait_probability(agents, traffic);
    (pw / (1.0 + tau * (agents as f64 - traffic))).clamp(0.0, 1.0)
}

/// Service level when waiters race an exponential patience clock.
///
/// A waiting caller exits at combined rate `gamma` (service start or
/// abandonment, whichever fires first); only the service fraction of those
/// exits counts toward the level.
pub fn service_level_with_abandonment(
    agents: u32,
    traffic: f64,
    aht_secs: f64,
    patience_secs: f64,
    threshold_secs: f64,
) -> f64 {
    if traffic <= 0.0 {
        return 1.0;
    }
    if (agents as f64) <= traffic || patience_secs <= 0.0 {
        return 0.0;
    }
    let surplus = agents as f64 - traffic;
    let exit = surplus + aht_secs / patience_secs;
    let gamma = exit / aht_secs;
    let service_fraction = surplus / exit;
    let pw = wait_probability(agents, traffic);
    let sl = (1.0 - pw) + pw * service_fraction * (1.0 - (-gamma * threshold_secs).exp());
    sl.clamp(0.0, 1.0)
}

/// Mean wait in seconds; abandonment shortens the queue, so this sits below
/// the pure-delay ASA for the same inputs.
pub fn asa_with_abandonment(agents: u32, traffic: f64, aht_secs: f64, patience_secs: f64) -> f64 {
    if traffic <= 0.0 {
        return 0.0;
    }
    if (agents as f64) <= traffic {
        return f64::INFINITY;
    }
    let surplus = agents as f64 - traffic;
    wait_probability(agents, traffic) * aht_secs / (surplus + aht_secs / patience_secs)
}

/// Fewest agents meeting `target_sl` under abandonment, or `None` when no
/// count within the traffic-scaled bounds does.
pub fn solve_agents_with_abandonment(
    traffic: f64,
    aht_secs: f64,
    patience_secs: f64,
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
        service_level_with_abandonment(agents, traffic, aht_secs, patience_secs, threshold_secs)
            >= target_sl
            && occupancy(agents, traffic) <= max_occupancy
    })
}
