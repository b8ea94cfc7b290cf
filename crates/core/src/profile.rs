//! Profile field constraints and validators.

use crate::error::CoreError;

/// Maximum username length in characters.
pub const MAX_USERNAME_LEN: usize = 50;

/// Minimum password length accepted on create / reset / change.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate a username: non-empty, at most [`MAX_USERNAME_LEN`] characters.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation(
            "Username must not be empty".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(CoreError::Validation(format!(
            "Username exceeds maximum length of {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that an avatar URL parses as an absolute URL.
pub fn validate_avatar_url(raw: &str) -> Result<(), CoreError> {
    url::Url::parse(raw).map_err(|e| CoreError::Validation(format!("Invalid avatar URL: {e}")))?;
    Ok(())
}

/// Validate that a password meets the minimum length requirement.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}
