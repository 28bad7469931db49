use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Config that cannot be used for planning, e.g. targets not summing to 100%.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("no price available for {0}")]
    PriceUnavailable(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
