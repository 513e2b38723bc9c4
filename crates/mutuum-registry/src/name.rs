//! Display-name validation.
//!
//! Names are stored as provided and bounded by byte length, not character
//! count: the limit is on the UTF-8 encoding.

use crate::{RegistryError, Result};

/// Minimum display-name length in bytes.
pub const MIN_NAME_BYTES: usize = 1;

/// Maximum display-name length in bytes.
pub const MAX_NAME_BYTES: usize = 50;

/// Validate a display name.
///
/// # Errors
///
/// Returns [`RegistryError::NameInvalid`] if the name is empty or its
/// UTF-8 encoding exceeds [`MAX_NAME_BYTES`] bytes.
pub fn validate_display_name(name: &str) -> Result<()> {
    let len = name.len();
    if len < MIN_NAME_BYTES {
        return Err(RegistryError::NameInvalid {
            reason: "name must not be empty".to_string(),
        });
    }
    if len > MAX_NAME_BYTES {
        return Err(RegistryError::NameInvalid {
            reason: format!("name too long: maximum {MAX_NAME_BYTES} bytes, got {len}"),
        });
    }
    Ok(())
}
