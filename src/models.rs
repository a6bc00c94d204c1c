use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical model identifiers. Legacy names from earlier planner versions
/// are accepted as serde aliases and normalized on deserialization.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    #[serde(alias = "erlang-b", alias = "loss")]
    Blocking,
    #[serde(alias = "erlang-c")]
    Delay,
    #[serde(alias = "erlang-a", alias = "abandonment")]
    DelayAbandon,
    #[serde(alias = "abandon-retrial", alias = "retrial")]
    DelayAbandonRetrial,
}

impl ModelKind {
    pub fn needs_patience(self) -> bool {
        matches!(self, ModelKind::DelayAbandon | ModelKind::DelayAbandonRetrial)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Blocking => "blocking",
            ModelKind::Delay => "delay",
            ModelKind::DelayAbandon => "delay-abandon",
            ModelKind::DelayAbandonRetrial => "delay-abandon-retrial",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StaffingRequest {
    pub model: ModelKind,
    pub workload: Workload,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub behavior: Behavior,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Workload {
    /// Offered contacts per interval.
    pub volume: f64,
    /// Average handle time in seconds.
    pub average_handle_time_secs: f64,
    pub interval_minutes: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Constraints {
    /// Target service level as a percentage, e.g. 80 for 80/20.
    #[serde(default = "default_service_level")]
    pub service_level_pct: f64,
    #[serde(default = "default_threshold")]
    pub response_threshold_secs: f64,
    #[serde(default = "default_occupancy")]
    pub max_occupancy_pct: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Behavior {
    /// Percentage of paid time agents are unavailable for handling.
    #[serde(default)]
    pub shrinkage_pct: f64,
    /// Mean caller patience in seconds; required by the abandonment models.
    #[serde(default)]
    pub average_patience_secs: Option<f64>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            service_level_pct: default_service_level(),
            response_threshold_secs: default_threshold(),
            max_occupancy_pct: default_occupancy(),
        }
    }
}

fn default_service_level() -> f64 {
    80.0
}

fn default_threshold() -> f64 {
    20.0
}

fn default_occupancy() -> f64 {
    100.0
}

#[derive(Clone, Debug, Serialize)]
pub struct StaffingResult {
    pub model: ModelKind,
    pub traffic_intensity: f64,
    pub required_agents: u32,
    pub total_fte: f64,
    pub service_level_pct: f64,
    /// Seconds; +inf for a structurally unstable configuration
    /// (serialized as null in JSON output).
    pub average_speed_of_answer_secs: f64,
    pub occupancy_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandonment_rate_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_abandonments: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrial_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_traffic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_probability_pct: Option<f64>,
}

/// Reverse-mode output: metrics achievable with a fixed agent count.
#[derive(Clone, Debug, Serialize)]
pub struct AchievableMetrics {
    pub model: ModelKind,
    pub traffic_intensity: f64,
    pub agents: u32,
    pub required_for_occupancy_cap: u32,
    pub service_level_pct: f64,
    pub average_speed_of_answer_secs: f64,
    pub occupancy_pct: f64,
    /// True when the fixed agent count fell below the occupancy-cap
    /// requirement and the degradation penalty was applied.
    pub degraded: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Arrivals per simulated time unit (Poisson).
    pub arrival_rate: f64,
    /// Completions per busy server per time unit (exponential).
    pub service_rate: f64,
    pub servers: u32,
    pub horizon: f64,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default)]
    pub campaign: Option<String>,
    #[serde(default)]
    pub skill: Option<String>,
    /// Seeds the run for reproducible sampling; omit for entropy seeding.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_channel() -> String {
    "voice".to_string()
}
