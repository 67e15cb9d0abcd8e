use crate::source::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid window size {0}: the window must be at least 1")]
    InvalidWindow(i64),

    #[error(transparent)]
    Source(#[from] SourceError),
}
