//! Error taxonomy for the report pipeline.
//!
//! Each stage returns its own typed error so a boundary layer can map the
//! outcome to a distinct outward status: transport and layout faults are
//! server-side failures, while "there was nothing to report" outcomes
//! ([`FetchError::Empty`], [`ProcessError`], [`RenderError::NoData`]) are a
//! not-found class. [`ReportError`] is the union returned by the top-level
//! pipeline entry points.

use thiserror::Error;

/// Failures while fetching or decoding the upstream export.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connect error, timeout, non-2xx status, or an undecodable body.
    #[error("failed to fetch data: {0}")]
    Transport(String),

    /// The API answered, but the workbook contained no rows at all.
    #[error("received empty data from API")]
    Empty,
}

/// Failures while normalizing a raw table.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The raw table was empty before any stage ran.
    #[error("no data to process")]
    NoInput,

    /// Cleaning and filtering left zero depot records.
    #[error("no matching depot records found")]
    NoMatches,
}

/// Failures while rendering a normalized table.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The table had no records; no document is produced.
    #[error("no data available for rendering")]
    NoData,

    /// The PDF object tree or content stream could not be built.
    #[error("document layout failed: {0}")]
    LayoutFailure(String),
}

/// Union of all pipeline stage errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ReportError {
    /// True for outcomes a boundary should treat as "nothing to report"
    /// (not-found class) rather than as a server-side failure.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            ReportError::Fetch(FetchError::Empty)
                | ReportError::Process(_)
                | ReportError::Render(RenderError::NoData)
        )
    }
}
