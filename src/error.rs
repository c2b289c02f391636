use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RowDiffError {
    #[error("could not read source `{source_name}`: {error}")]
    SourceUnavailable {
        source_name: String,
        #[source]
        error: io::Error,
    },
    #[error("the ingestion pipeline failed: {reason}")]
    PipelineFailure { reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("`{path}` is a spreadsheet; convert it to delimited text first")]
    UnsupportedSource { path: PathBuf },
    #[error("could not write rows to `{path}`")]
    Output {
        path: PathBuf,
        #[source]
        error: csv::Error,
    },
    #[cfg(feature = "rayon-threads")]
    #[error("An error occured when trying to build the rayon thread pool.")]
    ThreadPoolBuildError(#[from] rayon::ThreadPoolBuildError),
}
