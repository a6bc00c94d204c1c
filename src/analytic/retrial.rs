use super::{max_agents, min_agents, occupancy, wait_probability};

/// Empirical retry-propensity constants. Calibrated against observed callback
/// behavior, not derived from the queueing equations.
const BASE_RETRIAL_RATE: f64 = 0.40;
const FRUSTRATION_WEIGHT: f64 = 0.15;
const FRUSTRATION_CAP: f64 = 2.0;
const MAX_RETRIAL_RATE: f64 = 0.70;

/// Weibull shape for the abandonment hazard; > 1 models patience that erodes
/// the longer a caller has already waited.
const HAZARD_SHAPE: f64 = 1.2;

const EQUILIBRIUM_TOLERANCE: f64 = 0.001;
const MAX_EQUILIBRIUM_ITERATIONS: u32 = 50;

/// Chance an abandoning caller tries again, rising with frustration
/// (wait measured in units of patience) from 0.40 up to a 0.70 ceiling.
pub fn retrial_probability(wait_secs: f64, patience_secs: f64) -> f64 {
    let frustration = if patience_secs > 0.0 {
        (wait_secs.max(0.0) / patience_secs).min(FRUSTRATION_CAP)
    } else {
        FRUSTRATION_CAP
    };
    (BASE_RETRIAL_RATE + FRUSTRATION_WEIGHT * frustration).min(MAX_RETRIAL_RATE)
}

/// Offered traffic inflated by the abandon-and-call-back feedback loop.
///
/// Diverges (+inf) once the feedback term approaches 1; past 0.99 the system
/// is treated as unstable under retrial rather than reporting an absurd
/// finite load.
pub fn virtual_traffic(base_traffic: f64, abandonment: f64, retrial: f64) -> f64 {
    let feedback = abandonment * retrial;
    if feedback >= 0.99 {
        return f64::INFINITY;
    }
    base_traffic / (1.0 - feedback)
}

/// Fraction of offered contacts that abandon, using a Weibull-shaped hazard
/// over the average wait instead of the pure exponential race.
pub fn abandonment_rate(agents: u32, traffic: f64, aht_secs: f64, patience_secs: f64) -> f64 {
    if traffic <= 0.0 {
        return 0.0;
    }
    if (agents as f64) <= traffic || patience_secs <= 0.0 {
        return 1.0;
    }
    let pw = wait_probability(agents, traffic);
    if pw <= 0.0 {
        return 0.0;
    }
    let avg_wait = pw * aht_secs / (agents as f64 - traffic);
    if avg_wait <= 0.0 {
        return 0.0;
    }
    let hazard = (avg_wait / patience_secs).powf(HAZARD_SHAPE);
    (pw * (1.0 - (-hazard).exp())).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug)]
pub struct Equilibrium {
    pub abandonment_rate: f64,
    pub retrial_probability: f64,
    pub virtual_traffic: f64,
    pub converged: bool,
}

/// Fixed-point iteration between abandonment rate and virtual traffic.
///
/// Each pass re-derives the abandonment rate at the current virtual load,
/// then re-inflates the load from that rate and the wait-driven retrial
/// probability. Stops once both move by less than the tolerance; hitting the
/// iteration cap returns the last estimate rather than failing.
pub fn solve_equilibrium(
    base_traffic: f64,
    agents: u32,
    aht_secs: f64,
    patience_secs: f64,
) -> Equilibrium {
    let mut ab = abandonment_rate(agents, base_traffic, aht_secs, patience_secs);
    let mut virt = base_traffic;
    let mut retrial = BASE_RETRIAL_RATE;

    for _ in 0..MAX_EQUILIBRIUM_ITERATIONS {
        let wait = avg_wait(agents, virt, aht_secs);
        retrial = retrial_probability(wait, patience_secs);
        let next_virt = virtual_traffic(base_traffic, ab, retrial);
        let next_ab = if next_virt.is_finite() {
            abandonment_rate(agents, next_virt, aht_secs, patience_secs)
        } else {
            1.0
        };

        let settled = (next_ab - ab).abs() < EQUILIBRIUM_TOLERANCE
            && (virt.is_finite()
                && next_virt.is_finite()
                && (next_virt - virt).abs() < EQUILIBRIUM_TOLERANCE);
        ab = next_ab;
        virt = next_virt;
        if settled {
            return Equilibrium {
                abandonment_rate: ab,
                retrial_probability: retrial,
                virtual_traffic: virt,
                converged: true,
            };
        }
    }

    Equilibrium {
        abandonment_rate: ab,
        retrial_probability: retrial,
        virtual_traffic: virt,
        converged: false,
    }
}

/// Service level at the retrial-equilibrium virtual load.
pub fn service_level_with_retrial(
    base_traffic: f64,
    agents: u32,
    aht_secs: f64,
    patience_secs: f64,
    threshold_secs: f64,
) -> f64 {
    if base_traffic <= 0.0 {
        return 1.0;
    }
    let eq = solve_equilibrium(base_traffic, agents, aht_secs, patience_secs);
    if !eq.virtual_traffic.is_finite() {
        return 0.0;
    }
    super::service_level_with_abandonment(
        agents,
        eq.virtual_traffic,
        aht_secs,
        patience_secs,
        threshold_secs,
    )
}

/// Fewest agents meeting `target_sl` under retrial feedback.
///
/// Service level stays monotone in agents, so the scan the other solvers use
/// collapses to a binary search; each probe costs a full equilibrium solve,
/// which matters at the call volumes this model exists for.
pub fn solve_agents_with_retrial(
    base_traffic: f64,
    aht_secs: f64,
    patience_secs: f64,
    target_sl: f64,
    threshold_secs: f64,
    max_occupancy: f64,
) -> Option<u32> {
    if base_traffic <= 0.0 {
        return Some(0);
    }
    let meets = |agents: u32| {
        service_level_with_retrial(base_traffic, agents, aht_secs, patience_secs, threshold_secs)
            >= target_sl
            && occupancy(agents, base_traffic) <= max_occupancy
    };

    let mut lo = min_agents(base_traffic, max_occupancy);
    let mut hi = max_agents(base_traffic, lo);
    if !meets(hi) {
        return None;
    }
    if meets(lo) {
        return Some(lo);
    }
    // Invariant: lo fails, hi passes.
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if meets(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(hi)
}

fn avg_wait(agents: u32, traffic: f64, aht_secs: f64) -> f64 {
    if traffic <= 0.0 {
        return 0.0;
    }
    if !traffic.is_finite() || (agents as f64) <= traffic {
        return f64::INFINITY;
    }
    wait_probability(agents, traffic) * aht_secs / (agents as f64 - traffic)
}
