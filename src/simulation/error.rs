use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected while validating `ScenarioParams`.
    #[error("invalid scenario configuration: {0}")]
    InvalidConfig(String),

    #[error("no moving boundary with index {index} (scenario has {count})")]
    UnknownBoundary { index: usize, count: usize },

    /// Reported by the optional cross-class overlap check after particle generation.
    #[error("{count} particle pairs of different classes share a position")]
    OverlappingParticles { count: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
