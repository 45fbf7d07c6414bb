use thiserror::Error;

/// Failure modes surfaced by configuration, training, and model (de)serialisation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },

    #[error("training corpus is empty")]
    EmptyTrainingCorpus,

    #[error("objects disagree on part count: expected {expected}, found {found}")]
    InconsistentPartCount { expected: usize, found: usize },

    #[error("model container version mismatch: found {found}, expected 1")]
    UnsupportedVersion { found: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
