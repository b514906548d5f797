use thiserror::Error;

/// Failure to produce a cleaned dataset from the input file. Fatal at load;
/// individual malformed field values never raise this (they degrade to
/// absent values instead).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open dataset '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("unreadable CSV: {0}")]
    Csv(#[from] csv::Error),
}
