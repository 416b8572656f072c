//! Lenient reading of untyped import records.

#![allow(clippy::cast_possible_truncation)] // fractional JSON timestamps are truncated to ms

use serde_json::Value;

use super::ReconcilePolicy;
use crate::error::{Error, Result};
use crate::models::{Template, TemplateCategory, TemplateId};

/// Id of an incoming record, or `None` when it is missing, not a string, or empty
pub fn incoming_id(record: &Value) -> Option<TemplateId> {
    record
        .get("id")
        .and_then(Value::as_str)
        .and_then(TemplateId::parse)
}

/// Conflict timestamp: `updated_at`, else `created_at`, else 0 (zero counts as unset, negatives pass through)
pub fn effective_timestamp(updated_at: Option<i64>, created_at: Option<i64>) -> i64 {
    updated_at
        .filter(|ts| *ts != 0)
        .or_else(|| created_at.filter(|ts| *ts != 0))
        .unwrap_or(0)
}

/// An incoming record whose fields are all optional except the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingTemplate {
    pub id: TemplateId,
    name: Option<String>,
    category: Option<TemplateCategory>,
    content: Option<String>,
    favorite: Option<bool>,
    created_at: Option<i64>,
    updated_at: Option<i64>,
}

impl IncomingTemplate {
    /// Read the remaining fields of a record.
    ///
    /// Missing or `null` fields are absent. Timestamps that are not numbers
    /// are absent too; any other field with the wrong type is an error.
    pub fn parse(id: TemplateId, record: &Value) -> Result<Self> {
        let name = string_field(&id, record, "name")?;
        let content = string_field(&id, record, "content")?;
        let category = string_field(&id, record, "category")?
            .map(|raw| raw.parse::<TemplateCategory>())
            .transpose()
            .map_err(|err| record_error(&id, err.to_string()))?;
        let favorite = match present(record, "favorite") {
            None => None,
            Some(Value::Bool(favorite)) => Some(*favorite),
            Some(other) => {
                return Err(record_error(
                    &id,
                    format!("favorite must be a boolean (got {other})"),
                ))
            }
        };

        Ok(Self {
            created_at: timestamp_field(record, "createdAt"),
            updated_at: timestamp_field(record, "updatedAt"),
            id,
            name,
            category,
            content,
            favorite,
        })
    }

    pub fn effective_timestamp(&self) -> i64 {
        effective_timestamp(self.updated_at, self.created_at)
    }

    /// Build a brand-new local record from this one
    pub fn into_new(self, policy: ReconcilePolicy, now: i64) -> Result<Template> {
        let updated_at = self.stamped_updated_at(policy, now);
        let (Some(name), Some(category), Some(content)) = (self.name, self.category, self.content)
        else {
            return Err(record_error(
                &self.id,
                "new templates need a name, category and content",
            ));
        };

        let template = Template {
            id: self.id,
            name,
            category,
            content,
            favorite: self.favorite.unwrap_or(false),
            created_at: self.created_at.unwrap_or(now),
            updated_at,
        };
        checked(template)
    }

    /// Overlay the present fields onto `existing`, keeping its id and `created_at`
    pub fn merge_onto(self, existing: Template, policy: ReconcilePolicy, now: i64) -> Result<Template> {
        let updated_at = self.stamped_updated_at(policy, now);
        let mut merged = existing;

        if let Some(name) = self.name {
            merged.name = name;
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(content) = self.content {
            merged.content = content;
        }
        if let Some(favorite) = self.favorite {
            merged.favorite = favorite;
        }
        merged.updated_at = updated_at;

        checked(merged)
    }

    const fn stamped_updated_at(&self, policy: ReconcilePolicy, now: i64) -> i64 {
        match (policy, self.updated_at) {
            (ReconcilePolicy::TimestampWins, Some(updated_at)) => updated_at,
            (ReconcilePolicy::TimestampWins, None) | (ReconcilePolicy::MergeOverwrite, _) => now,
        }
    }
}

fn checked(template: Template) -> Result<Template> {
    match template.validate() {
        Ok(()) => Ok(template),
        Err(Error::InvalidInput(reason)) => Err(record_error(&template.id, reason)),
        Err(other) => Err(other),
    }
}

fn present<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| !value.is_null())
}

fn string_field(id: &TemplateId, record: &Value, field: &str) -> Result<Option<String>> {
    match present(record, field) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(record_error(
            id,
            format!("{field} must be a string (got {other})"),
        )),
    }
}

fn timestamp_field(record: &Value, field: &str) -> Option<i64> {
    let value = present(record, field)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|ts| ts.is_finite())
            .map(|ts| ts as i64)
    })
}

fn record_error(id: &TemplateId, reason: impl Into<String>) -> Error {
    Error::InvalidRecord {
        id: id.to_string(),
        reason: reason.into(),
    }
}
