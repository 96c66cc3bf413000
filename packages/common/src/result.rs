use crate::error::ReprintError;

/// Common Result type alias
pub type ReprintResult<T> = Result<T, ReprintError>;
