//! Result type alias for blend operations

use crate::error::BlendError;

/// Standard Result type for blend operations
pub type Result<T> = std::result::Result<T, BlendError>;
