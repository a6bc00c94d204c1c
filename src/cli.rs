use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config;
use crate::error::{Error, Result};
use crate::models::{
    Behavior, Constraints, ModelKind, SimulationConfig, StaffingRequest, Workload,
};

#[derive(Parser, Debug)]
#[command(name = "staff-sim", about = "Contact-center staffing models and M/M/c simulation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute staffing requirements (or achievable metrics) for a workload.
    Staff(StaffArgs),
    /// Run the discrete-event M/M/c queue simulation.
    Simulate(SimulateArgs),
}

#[derive(clap::Args, Debug)]
pub struct StaffArgs {
    /// Load the request from a .toml or .json file instead of flags.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub model: Option<ModelArg>,
    /// Offered contacts per interval.
    #[arg(long)]
    pub volume: Option<f64>,
    /// Average handle time in seconds.
    #[arg(long)]
    pub aht: Option<f64>,
    /// Interval length in minutes.
    #[arg(long)]
    pub interval: Option<f64>,
    /// Target service level percentage.
    #[arg(long)]
    pub service_level: Option<f64>,
    /// Response threshold in seconds.
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Maximum occupancy percentage.
    #[arg(long)]
    pub occupancy: Option<f64>,
    /// Shrinkage percentage.
    #[arg(long)]
    pub shrinkage: Option<f64>,
    /// Average caller patience in seconds (abandonment models).
    #[arg(long)]
    pub patience: Option<f64>,
    /// Fixed agent count: report achievable metrics instead of solving.
    #[arg(long)]
    pub agents: Option<u32>,
    #[arg(long, value_enum, default_value = "human")]
    pub format: FormatArg,
}

#[derive(clap::Args, Debug)]
pub struct SimulateArgs {
    /// Load the simulation config from a .toml or .json file instead of flags.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Arrivals per time unit.
    #[arg(long)]
    pub arrival_rate: Option<f64>,
    /// Completions per busy server per time unit.
    #[arg(long)]
    pub service_rate: Option<f64>,
    #[arg(long)]
    pub servers: Option<u32>,
    #[arg(long)]
    pub horizon: Option<f64>,
    /// Seed for reproducible runs; omit for entropy seeding.
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub channel: Option<String>,
    /// Advance in fixed steps of this size instead of one shot.
    #[arg(long)]
    pub step: Option<f64>,
    /// Also print an export of the finalized contact records.
    #[arg(long, value_enum)]
    pub export: Option<ExportArg>,
    #[arg(long, value_enum, default_value = "human")]
    pub format: FormatArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModelArg {
    #[value(alias = "erlang-b", alias = "loss")]
    Blocking,
    #[value(alias = "erlang-c")]
    Delay,
    #[value(alias = "erlang-a", alias = "abandonment")]
    DelayAbandon,
    #[value(alias = "abandon-retrial", alias = "retrial")]
    DelayAbandonRetrial,
}

impl From<ModelArg> for ModelKind {
    fn from(value: ModelArg) -> Self {
        match value {
            ModelArg::Blocking => ModelKind::Blocking,
            ModelArg::Delay => ModelKind::Delay,
            ModelArg::DelayAbandon => ModelKind::DelayAbandon,
            ModelArg::DelayAbandonRetrial => ModelKind::DelayAbandonRetrial,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FormatArg {
    Human,
    Summary,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ExportArg {
    Csv,
    Sql,
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|e| Error::Cli(e.to_string()))
}

pub fn build_staffing_request(args: &StaffArgs) -> Result<StaffingRequest> {
    if let Some(path) = &args.config {
        return config::load_staffing_request(path);
    }

    let (model, volume, aht, interval) =
        match (args.model, args.volume, args.aht, args.interval) {
            (Some(model), Some(volume), Some(aht), Some(interval)) => {
                (model, volume, aht, interval)
            }
            _ => {
                return Err(Error::Cli(
                    "--model, --volume, --aht and --interval are required without --config"
                        .to_string(),
                ))
            }
        };

    let defaults = Constraints::default();
    Ok(StaffingRequest {
        model: model.into(),
        workload: Workload {
            volume,
            average_handle_time_secs: aht,
            interval_minutes: interval,
        },
        constraints: Constraints {
            service_level_pct: args.service_level.unwrap_or(defaults.service_level_pct),
            response_threshold_secs: args.threshold.unwrap_or(defaults.response_threshold_secs),
            max_occupancy_pct: args.occupancy.unwrap_or(defaults.max_occupancy_pct),
        },
        behavior: Behavior {
            shrinkage_pct: args.shrinkage.unwrap_or(0.0),
            average_patience_secs: args.patience,
        },
    })
}

pub fn build_simulation_config(args: &SimulateArgs) -> Result<SimulationConfig> {
    if let Some(path) = &args.config {
        let mut config = config::load_simulation_config(path)?;
        // A seed given on the command line wins over the file.
        if args.seed.is_some() {
            config.seed = args.seed;
        }
        return Ok(config);
    }

    let (arrival_rate, service_rate, servers, horizon) = match (
        args.arrival_rate,
        args.service_rate,
        args.servers,
        args.horizon,
    ) {
        (Some(a), Some(s), Some(c), Some(h)) => (a, s, c, h),
        _ => {
            return Err(Error::Cli(
                "--arrival-rate, --service-rate, --servers and --horizon are required \
without --config"
                    .to_string(),
            ))
        }
    };

    Ok(SimulationConfig {
        arrival_rate,
        service_rate,
        servers,
        horizon,
        channel: args.channel.clone().unwrap_or_else(|| "voice".to_string()),
        campaign: None,
        skill: None,
        seed: args.seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_args() -> StaffArgs {
        StaffArgs {
            config: None,
            model: Some(ModelArg::Delay),
            volume: Some(100.0),
            aht: Some(180.0),
            interval: Some(30.0),
            service_level: None,
            threshold: None,
            occupancy: None,
            shrinkage: None,
            patience: None,
            agents: None,
            format: FormatArg::Human,
        }
    }

    #[test]
    fn inline_staffing_flags_build_a_request() {
        let request = build_staffing_request(&staff_args()).unwrap();
        assert_eq!(request.model, ModelKind::Delay);
        assert_eq!(request.workload.volume, 100.0);
        assert_eq!(request.constraints.service_level_pct, 80.0);
    }

    #[test]
    fn missing_required_staffing_flags_error() {
        let mut args = staff_args();
        args.volume = None;
        let err = build_staffing_request(&args).unwrap_err();
        assert!(err.to_string().contains("required without --config"));
    }

    #[test]
    fn constraint_flags_override_defaults() {
        let mut args = staff_args();
        args.service_level = Some(90.0);
        args.occupancy = Some(85.0);
        args.shrinkage = Some(30.0);
        let request = build_staffing_request(&args).unwrap();
        assert_eq!(request.constraints.service_level_pct, 90.0);
        assert_eq!(request.constraints.max_occupancy_pct, 85.0);
        assert_eq!(request.behavior.shrinkage_pct, 30.0);
    }

    #[test]
    fn inline_simulation_flags_build_a_config() {
        let args = SimulateArgs {
            config: None,
            arrival_rate: Some(1.0),
            service_rate: Some(2.0),
            servers: Some(3),
            horizon: Some(100.0),
            seed: Some(42),
            channel: None,
            step: None,
            export: None,
            format: FormatArg::Human,
        };
        let config = build_simulation_config(&args).unwrap();
        assert_eq!(config.servers, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.channel, "voice");
    }

    #[test]
    fn missing_required_simulation_flags_error() {
        let args = SimulateArgs {
            config: None,
            arrival_rate: Some(1.0),
            service_rate: None,
            servers: None,
            horizon: None,
            seed: None,
            channel: None,
            step: None,
            export: None,
            format: FormatArg::Human,
        };
        assert!(build_simulation_config(&args).is_err());
    }
}
