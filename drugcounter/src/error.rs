use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that end a run.
///
/// Malformed ledger lines are not errors; they surface as
/// [`Rejection`](crate::record::Rejection) values and the run continues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Input file '{}' does not exist.", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read ledger: {0}")]
    Read(#[source] io::Error),

    #[error("failed to write report: {0}")]
    Report(#[from] csv::Error),

    #[error("failed to flush report: {0}")]
    Flush(#[source] io::Error),

    #[error("failed to write audit log: {0}")]
    AuditLog(#[source] io::Error),

    #[error("invalid numeric pattern: {0}")]
    Pattern(#[from] regex::Error),
}
