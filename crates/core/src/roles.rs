//! Role and account-status constants shared across the workspace.
//!
//! Roles and statuses are stored as plain text columns; these constants and
//! validators are the single source of truth for the allowed values.

use crate::error::CoreError;

/// Regular user role.
pub const ROLE_USER: &str = "user";

/// Administrator role. Grants access to the admin route tree.
pub const ROLE_ADMIN: &str = "admin";

/// Account in good standing.
pub const STATUS_ACTIVE: &str = "active";

/// Banned account. Cannot log in; existing sessions are revoked on ban.
pub const STATUS_BANNED: &str = "banned";

/// All valid roles.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

/// All valid account statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_BANNED];

/// Validate a role value against the allowed set.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if !VALID_ROLES.contains(&role) {
        return Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )));
    }
    Ok(())
}

/// Validate an account status value against the allowed set.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if !VALID_STATUSES.contains(&status) {
        return Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )));
    }
    Ok(())
}
