//! Template model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::util::truncate_chars;

/// Maximum template name length, in characters
pub const NAME_MAX_CHARS: usize = 64;

/// Maximum template content length, in characters
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// Opaque template identifier.
///
/// Locally created templates get a UUID v7 string; ids arriving through an
/// import are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Create a new unique template ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wrap an existing identifier, rejecting only the empty string
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TemplateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Template category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Receipt,
    Event,
    Rp,
    #[default]
    Custom,
}

impl TemplateCategory {
    pub const ALL: [Self; 4] = [Self::Receipt, Self::Event, Self::Rp, Self::Custom];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Event => "event",
            Self::Rp => "rp",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown template category '{0}' (expected receipt, event, rp or custom)")]
pub struct ParseCategoryError(pub String);

impl FromStr for TemplateCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// A stored message template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique identifier
    pub id: TemplateId,
    /// Display name (1-64 characters)
    pub name: String,
    pub category: TemplateCategory,
    /// Body with `{token}` placeholders (1-10000 characters)
    pub content: String,
    #[serde(default)]
    pub favorite: bool,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Template {
    /// Build a template from a draft, stamping a fresh id and timestamps
    #[must_use]
    pub fn from_draft(draft: NewTemplate, now: i64) -> Self {
        Self {
            id: TemplateId::new(),
            name: draft.name,
            category: draft.category,
            content: draft.content,
            favorite: draft.favorite,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check the name and content length invariants
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_content(&self.content)
    }

    /// Apply the fields present in `patch` and bump `updated_at`
    pub fn apply_patch(&mut self, patch: &TemplatePatch, now: i64) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
        self.updated_at = now;
    }

    /// Copy of this template under a new id, named `"<name> (copy)"`
    #[must_use]
    pub fn duplicate(&self, now: i64) -> Self {
        Self {
            id: TemplateId::new(),
            name: truncate_chars(&format!("{} (copy)", self.name), NAME_MAX_CHARS),
            category: self.category,
            content: self.content.clone(),
            favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Distinct `{token}` names used by this template
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        crate::engine::extract_tokens(&self.content)
    }
}

/// Fields for a user-created template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTemplate {
    pub name: String,
    pub category: TemplateCategory,
    pub content: String,
    pub favorite: bool,
}

impl Default for NewTemplate {
    fn default() -> Self {
        Self {
            name: "New Template".to_string(),
            category: TemplateCategory::Custom,
            content: "Hello {guest}".to_string(),
            favorite: false,
        }
    }
}

/// Partial update for an existing template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub category: Option<TemplateCategory>,
    pub content: Option<String>,
    pub favorite: Option<bool>,
}

impl TemplatePatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.content.is_none()
            && self.favorite.is_none()
    }
}

fn validate_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > NAME_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "template name must be 1-{NAME_MAX_CHARS} characters (got {len})"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    let len = content.chars().count();
    if len == 0 || len > CONTENT_MAX_CHARS {
        return Err(Error::InvalidInput(format!(
            "template content must be 1-{CONTENT_MAX_CHARS} characters (got {len})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Template {
        Template::from_draft(
            NewTemplate {
                name: "Receipt".to_string(),
                category: TemplateCategory::Receipt,
                content: "Thanks {guest}, total {total}".to_string(),
                favorite: true,
            },
            1_000,
        )
    }

    #[test]
    fn test_template_id_unique() {
        assert_ne!(TemplateId::new(), TemplateId::new());
    }

    #[test]
    fn test_template_id_rejects_empty_only() {
        assert!(TemplateId::parse("").is_none());
        assert_eq!(TemplateId::parse("   ").unwrap().as_str(), "   ");
        assert_eq!(TemplateId::parse("a").unwrap().as_str(), "a");
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in TemplateCategory::ALL {
            assert_eq!(category.as_str().parse::<TemplateCategory>(), Ok(category));
        }
        assert!("Receipt".parse::<TemplateCategory>().is_err());
    }

    #[test]
    fn test_template_serializes_camel_case() {
        let template = sample();
        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["createdAt"], 1_000);
        assert_eq!(value["updatedAt"], 1_000);
        assert_eq!(value["category"], "receipt");
        assert_eq!(value["id"], template.id.as_str());
    }

    #[test]
    fn test_validate_lengths() {
        let mut template = sample();
        assert!(template.validate().is_ok());

        template.name = "x".repeat(NAME_MAX_CHARS);
        assert!(template.validate().is_ok());
        template.name.push('x');
        assert!(template.validate().is_err());

        template.name = "ok".to_string();
        template.content = String::new();
        assert!(template.validate().is_err());
        template.content = "y".repeat(CONTENT_MAX_CHARS + 1);
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_apply_patch_only_touches_present_fields() {
        let mut template = sample();
        template.apply_patch(
            &TemplatePatch {
                content: Some("Hi {guest}".to_string()),
                ..TemplatePatch::default()
            },
            5_000,
        );
        assert_eq!(template.name, "Receipt");
        assert_eq!(template.content, "Hi {guest}");
        assert!(template.favorite);
        assert_eq!(template.created_at, 1_000);
        assert_eq!(template.updated_at, 5_000);
    }

    #[test]
    fn test_duplicate_resets_identity() {
        let original = sample();
        let copy = original.duplicate(9_000);
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.name, "Receipt (copy)");
        assert!(!copy.favorite);
        assert_eq!(copy.created_at, 9_000);
        assert_eq!(copy.content, original.content);
    }

    #[test]
    fn test_duplicate_keeps_name_within_limit() {
        let mut original = sample();
        original.name = "n".repeat(NAME_MAX_CHARS);
        let copy = original.duplicate(1);
        assert_eq!(copy.name.chars().count(), NAME_MAX_CHARS);
        assert!(copy.validate().is_ok());
    }

    #[test]
    fn test_tokens() {
        assert_eq!(sample().tokens(), vec!["guest", "total"]);
    }
}
