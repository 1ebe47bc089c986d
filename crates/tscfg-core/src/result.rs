//! Result type alias for config loading operations

use crate::error::TsConfigError;

/// Standard Result type for config loading operations
pub type Result<T> = std::result::Result<T, TsConfigError>;
