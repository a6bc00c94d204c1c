use crate::analytic;
use crate::error::{Error, Result};
use crate::models::{AchievableMetrics, ModelKind, StaffingRequest, StaffingResult};

/// Validated, unit-normalized view of a request: fractions instead of
/// percentages, seconds instead of minutes.
struct Normalized {
    model: ModelKind,
    volume: f64,
    aht_secs: f64,
    target_sl: f64,
    threshold_secs: f64,
    max_occupancy: f64,
    shrinkage: f64,
    patience_secs: f64,
    traffic: f64,
}

/// Compute a staffing plan for the request.
///
/// Fails closed: an invalid request (non-positive handle time or interval,
/// out-of-range percentages, full shrinkage, missing patience for the
/// abandonment models) and an unreachable target both yield `None`. A zero
/// workload is *not* a failure; it produces a plan with zero agents.
pub fn plan(request: &StaffingRequest) -> Option<StaffingResult> {
    let n = normalize(request)?;

    let (agents, abandonment, retrial) = match n.model {
        ModelKind::Blocking => {
            let lines = analytic::required_lines(n.traffic, 1.0 - n.target_sl)?;
            (lines, None, None)
        }
        ModelKind::Delay => {
            let agents = analytic::solve_agents(
                n.traffic,
                n.aht_secs,
                n.target_sl,
                n.threshold_secs,
                n.max_occupancy,
            )?;
            (agents, None, None)
        }
        ModelKind::DelayAbandon => {
            let agents = analytic::solve_agents_with_abandonment(
                n.traffic,
                n.aht_secs,
                n.patience_secs,
                n.target_sl,
                n.threshold_secs,
                n.max_occupancy,
            )?;
            let rate =
                analytic::abandonment_probability(agents, n.traffic, n.aht_secs, n.patience_secs);
            (agents, Some(rate), None)
        }
        ModelKind::DelayAbandonRetrial => {
            let agents = analytic::solve_agents_with_retrial(
                n.traffic,
                n.aht_secs,
                n.patience_secs,
                n.target_sl,
                n.threshold_secs,
                n.max_occupancy,
            )?;
            let eq = analytic::solve_equilibrium(n.traffic, agents, n.aht_secs, n.patience_secs);
            (agents, Some(eq.abandonment_rate), Some(eq))
        }
    };

    Some(build_result(&n, agents, abandonment, retrial))
}

/// Reverse mode: metrics achievable with a fixed agent count — no solving.
///
/// When the count falls below what the occupancy cap alone demands, a
/// degradation penalty scales service level down and ASA up by the shortfall
/// ratio. The penalty is a heuristic approximation of overload collapse, not
/// a result of the M/M/c+M equations.
pub fn achievable(request: &StaffingRequest, agents: u32) -> Option<AchievableMetrics> {
    let n = normalize(request)?;

    let (mut sl, mut asa) = metrics_at(&n, agents, n.traffic);

    let required_for_cap = if n.traffic <= 0.0 {
        0
    } else {
        (n.traffic / n.max_occupancy).ceil().max(1.0) as u32
    };
    let degraded = required_for_cap > 0 && agents < required_for_cap;
    if degraded {
        let penalty = (agents as f64 / required_for_cap as f64).clamp(0.0, 1.0);
        sl *= penalty;
        if penalty > 0.0 {
            asa /= penalty;
        } else {
            asa = f64::INFINITY;
        }
    }

    Some(AchievableMetrics {
        model: n.model,
        traffic_intensity: n.traffic,
        agents,
        required_for_occupancy_cap: required_for_cap,
        service_level_pct: sl * 100.0,
        average_speed_of_answer_secs: asa,
        occupancy_pct: analytic::occupancy(agents, n.traffic) * 100.0,
        degraded,
    })
}

/// Check the request invariants, naming the first violation.
///
/// `plan` and `achievable` fail closed on the same checks; callers that want
/// a reportable reason run this first.
pub fn validate(request: &StaffingRequest) -> Result<()> {
    let w = &request.workload;
    let c = &request.constraints;
    let b = &request.behavior;

    if !w.volume.is_finite() || w.volume < 0.0 {
        return Err(Error::InvalidVolume(w.volume));
    }
    if !w.average_handle_time_secs.is_finite() || w.average_handle_time_secs <= 0.0 {
        return Err(Error::InvalidHandleTime(w.average_handle_time_secs));
    }
    if !w.interval_minutes.is_finite() || w.interval_minutes <= 0.0 {
        return Err(Error::InvalidInterval(w.interval_minutes));
    }
    if !(c.service_level_pct > 0.0 && c.service_level_pct <= 100.0) {
        return Err(Error::InvalidPercentage {
            name: "service level target",
            value: c.service_level_pct,
        });
    }
    if !c.response_threshold_secs.is_finite() || c.response_threshold_secs <= 0.0 {
        return Err(Error::InvalidThreshold(c.response_threshold_secs));
    }
    if !(c.max_occupancy_pct > 0.0 && c.max_occupancy_pct <= 100.0) {
        return Err(Error::InvalidPercentage {
            name: "max occupancy",
            value: c.max_occupancy_pct,
        });
    }
    // Negative shrinkage normalizes to zero later; 100% can never be staffed.
    if b.shrinkage_pct >= 100.0 {
        return Err(Error::InvalidShrinkage(b.shrinkage_pct));
    }
    match b.average_patience_secs {
        Some(p) if !p.is_finite() || p <= 0.0 => return Err(Error::InvalidPatience(p)),
        None if request.model.needs_patience() => return Err(Error::MissingPatience),
        _ => {}
    }
    Ok(())
}

fn normalize(request: &StaffingRequest) -> Option<Normalized> {
    validate(request).ok()?;

    let w = &request.workload;
    let c = &request.constraints;
    let b = &request.behavior;

    let shrinkage = (b.shrinkage_pct / 100.0).max(0.0);
    let patience_secs = b.average_patience_secs.unwrap_or(0.0);
    let interval_secs = w.interval_minutes * 60.0;
    let traffic = analytic::traffic_intensity(w.volume, w.average_handle_time_secs, interval_secs);
    if !traffic.is_finite() {
        return None;
    }

    Some(Normalized {
        model: request.model,
        volume: w.volume,
        aht_secs: w.average_handle_time_secs,
        target_sl: c.service_level_pct / 100.0,
        threshold_secs: c.response_threshold_secs,
        max_occupancy: c.max_occupancy_pct / 100.0,
        shrinkage,
        patience_secs,
        traffic,
    })
}

/// Direct (service level, ASA) evaluation for the request's model at a given
/// agent count and traffic.
fn metrics_at(n: &Normalized, agents: u32, traffic: f64) -> (f64, f64) {
    match n.model {
        ModelKind::Blocking => {
            let blocking = analytic::blocking_probability(traffic, agents);
            (1.0 - blocking, 0.0)
        }
        ModelKind::Delay => (
            analytic::service_level(agents, traffic, n.aht_secs, n.threshold_secs),
            analytic::average_speed_of_answer(agents, traffic, n.aht_secs),
        ),
        ModelKind::DelayAbandon => (
            analytic::service_level_with_abandonment(
                agents,
                traffic,
                n.aht_secs,
                n.patience_secs,
                n.threshold_secs,
            ),
            analytic::asa_with_abandonment(agents, traffic, n.aht_secs, n.patience_secs),
        ),
        ModelKind::DelayAbandonRetrial => {
            let eq = analytic::solve_equilibrium(traffic, agents, n.aht_secs, n.patience_secs);
            if !eq.virtual_traffic.is_finite() {
                return (0.0, f64::INFINITY);
            }
            (
                analytic::service_level_with_abandonment(
                    agents,
                    eq.virtual_traffic,
                    n.aht_secs,
                    n.patience_secs,
                    n.threshold_secs,
                ),
                analytic::asa_with_abandonment(
                    agents,
                    eq.virtual_traffic,
                    n.aht_secs,
                    n.patience_secs,
                ),
            )
        }
    }
}

fn build_result(
    n: &Normalized,
    agents: u32,
    abandonment: Option<f64>,
    equilibrium: Option<analytic::Equilibrium>,
) -> StaffingResult {
    let effective_traffic = equilibrium
        .map(|eq| eq.virtual_traffic)
        .filter(|v| v.is_finite())
        .unwrap_or(n.traffic);
    let (sl, asa) = metrics_at(n, agents, n.traffic);
    let blocking = match n.model {
        ModelKind::Blocking => Some(analytic::blocking_probability(n.traffic, agents) * 100.0),
        _ => None,
    };

    StaffingResult {
        model: n.model,
        traffic_intensity: n.traffic,
        required_agents: agents,
        total_fte: analytic::total_fte(agents, n.shrinkage),
        service_level_pct: sl * 100.0,
        average_speed_of_answer_secs: asa,
        occupancy_pct: analytic::occupancy(agents, effective_traffic) * 100.0,
        abandonment_rate_pct: abandonment.map(|rate| rate * 100.0),
        expected_abandonments: abandonment.map(|rate| rate * n.volume),
        retrial_probability: equilibrium.map(|eq| eq.retrial_probability),
        virtual_traffic: equilibrium.map(|eq| eq.virtual_traffic),
        blocking_probability_pct: blocking,
    }
}
