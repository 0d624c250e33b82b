//! Crate-wide result alias

use crate::error::NoriError;

/// Result type used throughout nori-core
pub type Result<T> = std::result::Result<T, NoriError>;
