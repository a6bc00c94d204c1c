use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("average handle time must be > 0 (got {0}s)")]
    InvalidHandleTime(f64),
    #[error("interval must be > 0 (got {0} minutes)")]
    InvalidInterval(f64),
    #[error("volume must be >= 0 (got {0})")]
    InvalidVolume(f64),
    #[error("{name} must be in (0, 100] (got {value})")]
    InvalidPercentage { name: &'static str, value: f64 },
    #[error("response threshold must be > 0 (got {0}s)")]
    InvalidThreshold(f64),
    #[error("shrinkage must be in [0, 100) (got {0})")]
    InvalidShrinkage(f64),
    #[error("average patience must be > 0 (got {0}s)")]
    InvalidPatience(f64),
    #[error("average patience is required for abandonment models")]
    MissingPatience,
    #[error("no feasible staffing plan within search bounds")]
    Infeasible,
    #[error("arrival rate must be > 0 (got {0})")]
    InvalidArrivalRate(f64),
    #[error("service rate must be > 0 (got {0})")]
    InvalidServiceRate(f64),
    #[error("server count must be >= 1")]
    InvalidServerCount,
    #[error("time horizon must be > 0 (got {0})")]
    InvalidHorizon(f64),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
