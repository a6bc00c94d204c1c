use serde_json::json;

use crate::models::{AchievableMetrics, SimulationConfig, StaffingResult};
use crate::state::Snapshot;

pub trait Formatter {
    fn staffing(&self, result: &StaffingResult) -> String;
    fn achievable(&self, metrics: &AchievableMetrics) -> String;
    fn simulation(&self, config: &SimulationConfig, snapshot: &Snapshot) -> String;
}

pub struct HumanFormatter;
pub struct SummaryFormatter;
pub struct JsonFormatter;

fn seconds(value: f64) -> String {
    if value.is_infinite() {
        "unbounded".to_string()
    } else {
        format!("{:.1}s", value)
    }
}

impl Formatter for HumanFormatter {
    fn staffing(&self, result: &StaffingResult) -> String {
        let mut out = String::new();
        out.push_str(&format!("Model: {}\n", result.model));
        out.push_str(&format!(
            "Traffic intensity: {:.2} Erlangs\n",
            result.traffic_intensity
        ));
        out.push_str(&format!("Required agents: {}\n", result.required_agents));
        out.push_str(&format!("Total FTE: {:.2}\n", result.total_fte));
        out.push_str(&format!(
            "Service level: {:.1}%\n",
            result.service_level_pct
        ));
        out.push_str(&format!(
            "Average speed of answer: {}\n",
            seconds(result.average_speed_of_answer_secs)
        ));
        out.push_str(&format!("Occupancy: {:.1}%\n", result.occupancy_pct));
        if let Some(rate) = result.abandonment_rate_pct {
            out.push_str(&format!("Abandonment rate: {:.1}%\n", rate));
        }
        if let Some(count) = result.expected_abandonments {
            out.push_str(&format!("Expected abandonments: {:.1}\n", count));
        }
        if let Some(rp) = result.retrial_probability {
            out.push_str(&format!("Retrial probability: {:.2}\n", rp));
        }
        if let Some(virt) = result.virtual_traffic {
            if virt.is_finite() {
                out.push_str(&format!("Virtual traffic: {:.2} Erlangs\n", virt));
            } else {
                out.push_str("Virtual traffic: unstable under retrial feedback\n");
            }
        }
        if let Some(blocking) = result.blocking_probability_pct {
            out.push_str(&format!("Blocking probability: {:.2}%\n", blocking));
        }
        out
    }

    fn achievable(&self, metrics: &AchievableMetrics) -> String {
        let mut out = String::new();
        out.push_str(&format!("Model: {}\n", metrics.model));
        out.push_str(&format!(
            "Traffic intensity: {:.2} Erlangs\n",
            metrics.traffic_intensity
        ));
        out.push_str(&format!("Agents: {}\n", metrics.agents));
        out.push_str(&format!(
            "Required for occupancy cap: {}\n",
            metrics.required_for_occupancy_cap
        ));
        out.push_str(&format!(
            "Service level: {:.1}%\n",
            metrics.service_level_pct
        ));
        out.push_str(&format!(
            "Average speed of answer: {}\n",
            seconds(metrics.average_speed_of_answer_secs)
        ));
        out.push_str(&format!("Occupancy: {:.1}%\n", metrics.occupancy_pct));
        if metrics.degraded {
            out.push_str("Warning: staffing below the occupancy floor; degradation penalty applied\n");
        }
        out
    }

    fn simulation(&self, config: &SimulationConfig, snapshot: &Snapshot) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Simulation: lambda={} mu={} servers={} horizon={}\n",
            config.arrival_rate, config.service_rate, config.servers, config.horizon
        ));
        out.push_str(&format!("Now: {:.2}\n", snapshot.now));
        out.push_str(&format!("Serviced: {}\n", snapshot.serviced_count));
        out.push_str(&format!(
            "Queue length: {} (max {})\n",
            snapshot.queue_length, snapshot.max_queue_length
        ));
        out.push_str(&format!("In service: {}\n", snapshot.in_service));
        out.push_str(&format!(
            "Average wait: {:.4}\n",
            snapshot.average_wait_time
        ));
        out.push_str(&format!("Samples: {}\n", snapshot.time_series.len()));
        out
    }
}

impl Formatter for SummaryFormatter {
    fn staffing(&self, result: &StaffingResult) -> String {
        format!(
            "agents={} fte={:.2} sl={:.1}% asa={} occ={:.1}%\n",
            result.required_agents,
            result.total_fte,
            result.service_level_pct,
            seconds(result.average_speed_of_answer_secs),
            result.occupancy_pct,
        )
    }

    fn achievable(&self, metrics: &AchievableMetrics) -> String {
        format!(
            "agents={} required_for_cap={} sl={:.1}% asa={} occ={:.1}%\n",
            metrics.agents,
            metrics.required_for_occupancy_cap,
            metrics.service_level_pct,
            seconds(metrics.average_speed_of_answer_secs),
            metrics.occupancy_pct,
        )
    }

    fn simulation(&self, _config: &SimulationConfig, snapshot: &Snapshot) -> String {
        format!(
            "serviced={} avg_wait={:.4} queue={} max_queue={}\n",
            snapshot.serviced_count,
            snapshot.average_wait_time,
            snapshot.queue_length,
            snapshot.max_queue_length,
        )
    }
}

impl Formatter for JsonFormatter {
    fn staffing(&self, result: &StaffingResult) -> String {
        let mut out = serde_json::to_string_pretty(result).expect("result serializes");
        out.push('\n');
        out
    }

    fn achievable(&self, metrics: &AchievableMetrics) -> String {
        let mut out = serde_json::to_string_pretty(metrics).expect("metrics serialize");
        out.push('\n');
        out
    }

    fn simulation(&self, config: &SimulationConfig, snapshot: &Snapshot) -> String {
        let combined = json!({ "config": config, "snapshot": snapshot });
        let mut out = serde_json::to_string_pretty(&combined).expect("snapshot serializes");
        out.push('\n');
        out
    }
}
