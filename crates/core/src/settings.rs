//! Site-wide settings: defaults, partial updates, and validation.
//!
//! Settings are persisted as a single JSONB row. Reads merge the stored blob
//! over [`SiteSettings::default`] so that rows written by older versions (or
//! an absent row) still produce a complete settings object.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum site name length in characters.
pub const MAX_SITE_NAME_LEN: usize = 100;

/// Maximum site description length in characters.
pub const MAX_SITE_DESCRIPTION_LEN: usize = 500;

/// Maximum copy-success message length in characters.
pub const MAX_COPY_MESSAGE_LEN: usize = 200;

/// Site-wide configuration, stored as one JSON blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_site_description")]
    pub site_description: String,
    #[serde(default = "default_copy_success_message")]
    pub copy_success_message: String,
    #[serde(default)]
    pub allow_public_submissions: bool,
    #[serde(default)]
    pub require_approval: bool,
}

fn default_site_name() -> String {
    "PromptLib".to_string()
}

fn default_site_description() -> String {
    "Discover high-quality AI prompts".to_string()
}

fn default_copy_success_message() -> String {
    "Copied to clipboard!".to_string()
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            site_name: default_site_name(),
            site_description: default_site_description(),
            copy_success_message: default_copy_success_message(),
            allow_public_submissions: false,
            require_approval: false,
        }
    }
}

impl SiteSettings {
    /// Deserialize a stored JSON blob, falling back to defaults for missing
    /// fields. A blob that does not deserialize at all yields the defaults.
    pub fn from_stored(value: serde_json::Value) -> SiteSettings {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Apply a partial update in place. `None` fields are left untouched.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(site_name) = patch.site_name {
            self.site_name = site_name;
        }
        if let Some(site_description) = patch.site_description {
            self.site_description = site_description;
        }
        if let Some(copy_success_message) = patch.copy_success_message {
            self.copy_success_message = copy_success_message;
        }
        if let Some(allow_public_submissions) = patch.allow_public_submissions {
            self.allow_public_submissions = allow_public_submissions;
        }
        if let Some(require_approval) = patch.require_approval {
            self.require_approval = require_approval;
        }
    }
}

/// Partial settings update. Only supplied fields are validated and applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPatch {
    pub site_name: Option<String>,
    pub site_description: Option<String>,
    pub copy_success_message: Option<String>,
    pub allow_public_submissions: Option<bool>,
    pub require_approval: Option<bool>,
}

/// Validate the supplied fields of a settings patch.
pub fn validate_patch(patch: &SettingsPatch) -> Result<(), CoreError> {
    if let Some(ref site_name) = patch.site_name {
        validate_bounded("Site name", site_name, MAX_SITE_NAME_LEN)?;
    }
    if let Some(ref site_description) = patch.site_description {
        validate_bounded("Site description", site_description, MAX_SITE_DESCRIPTION_LEN)?;
    }
    if let Some(ref copy_success_message) = patch.copy_success_message {
        validate_bounded("Copy success message", copy_success_message, MAX_COPY_MESSAGE_LEN)?;
    }
    Ok(())
}

fn validate_bounded(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_blob_merges_over_defaults() {
        let settings = SiteSettings::from_stored(json!({ "site_name": "My Library" }));
        assert_eq!(settings.site_name, "My Library");
        assert_eq!(settings.site_description, "Discover high-quality AI prompts");
        assert!(!settings.allow_public_submissions);
    }

    #[test]
    fn unparseable_blob_yields_defaults() {
        let settings = SiteSettings::from_stored(json!("not an object"));
        assert_eq!(settings, SiteSettings::default());
    }

    #[test]
    fn apply_overwrites_only_supplied_fields() {
        let mut settings = SiteSettings::default();
        settings.apply(SettingsPatch {
            copy_success_message: Some("Done!".to_string()),
            allow_public_submissions: Some(true),
            ..SettingsPatch::default()
        });
        assert_eq!(settings.copy_success_message, "Done!");
        assert!(settings.allow_public_submissions);
        assert_eq!(settings.site_name, "PromptLib");
    }

    #[test]
    fn patch_validation_enforces_bounds() {
        let ok = SettingsPatch {
            site_name: Some("PromptLib".to_string()),
            ..SettingsPatch::default()
        };
        assert!(validate_patch(&ok).is_ok());

        let empty = SettingsPatch {
            site_name: Some(String::new()),
            ..SettingsPatch::default()
        };
        assert!(validate_patch(&empty).is_err());

        let too_long = SettingsPatch {
            copy_success_message: Some("m".repeat(MAX_COPY_MESSAGE_LEN + 1)),
            ..SettingsPatch::default()
        };
        assert!(validate_patch(&too_long).is_err());
    }
}
