use thiserror::Error;

use crate::api::types::BeamId;

/// Errors raised inside the engine.
///
/// None of these are fatal to the host: geometry errors skip a single poll,
/// and configuration errors only occur for documents that are not JSON at all.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The visual surface has not been laid out (or has collapsed to zero size).
    #[error("surface geometry unavailable")]
    SurfaceUnavailable,

    /// A beam's bounds could not be computed.
    #[error("geometry unavailable for {0}")]
    BeamGeometryUnavailable(BeamId),

    /// A configuration or registry document failed to parse.
    #[error("invalid configuration document: {0}")]
    Config(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
