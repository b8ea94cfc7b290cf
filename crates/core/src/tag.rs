//! Tag field constraints and validators.

use crate::error::CoreError;

/// Maximum tag name length in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 50;

/// Color assigned when a tag is created without one.
pub const DEFAULT_COLOR: &str = "blue";

/// Validate a tag name: non-empty, at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Tag name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Tag name exceeds maximum length of {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a slug: non-empty, at most [`MAX_SLUG_LEN`] characters, and
/// consisting only of lowercase letters, digits, and hyphens.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".to_string()));
    }
    if slug.chars().count() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug exceeds maximum length of {MAX_SLUG_LEN} characters"
        )));
    }
    let pattern = regex::Regex::new("^[a-z0-9-]+$").expect("slug pattern is valid");
    if !pattern.is_match(slug) {
        return Err(CoreError::Validation(
            "Slug may only contain lowercase letters, digits, and hyphens".to_string(),
        ));
    }
    Ok(())
}
