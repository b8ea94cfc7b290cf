//! Prompt field constraints and validators.

use crate::error::CoreError;

/// Maximum title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Minimum content length in characters.
pub const MIN_CONTENT_LEN: usize = 10;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Validate a prompt title: non-empty, at most [`MAX_TITLE_LEN`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate prompt content: at least [`MIN_CONTENT_LEN`] characters.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.chars().count() < MIN_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "Content must be at least {MIN_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a prompt description: at most [`MAX_DESCRIPTION_LEN`] characters.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that a cover image URL parses as an absolute URL.
pub fn validate_cover_image_url(raw: &str) -> Result<(), CoreError> {
    url::Url::parse(raw)
        .map_err(|e| CoreError::Validation(format!("Invalid cover image URL: {e}")))?;
    Ok(())
}
