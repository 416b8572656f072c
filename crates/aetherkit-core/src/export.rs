//! Template export envelope (v1) and import payload validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::Template;
use crate::util::iso_timestamp;

/// Schema tag carried by every export file
pub const EXPORT_SCHEMA: &str = "aetherkit.templates.export";

/// Export envelope version understood by this build
pub const EXPORT_VERSION: u32 = 1;

/// Typed export document written by `aetherkit export`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub schema: String,
    pub version: u32,
    /// ISO-8601 timestamp
    pub exported_at: String,
    pub templates: Vec<Template>,
}

/// Build a v1 export document from local templates.
#[must_use]
pub fn build_export(templates: Vec<Template>, exported_at_ms: i64) -> ExportDocument {
    ExportDocument {
        schema: EXPORT_SCHEMA.to_string(),
        version: EXPORT_VERSION,
        exported_at: iso_timestamp(exported_at_ms),
        templates,
    }
}

/// Render an export document as pretty-printed JSON.
pub fn render_json_export(document: &ExportDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(document)
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(timestamp_ms: i64) -> String {
    format!("aetherkit-templates-{timestamp_ms}.json")
}

/// A payload that passed envelope validation.
///
/// Template records stay untyped here; the reconciler checks them one by one.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub exported_at: String,
    pub templates: Vec<Value>,
    /// Present in the envelope but never applied
    pub settings: Option<Value>,
}

impl ExportPayload {
    /// Validate an untyped value against the v1 envelope.
    ///
    /// All-or-nothing: any deviation rejects the whole payload.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid("expected a JSON object"))?;

        match object.get("schema").and_then(Value::as_str) {
            Some(EXPORT_SCHEMA) => {}
            Some(other) => {
                return Err(invalid(format!(
                    "unexpected schema '{other}' (expected '{EXPORT_SCHEMA}')"
                )))
            }
            None => return Err(invalid(format!("missing schema '{EXPORT_SCHEMA}'"))),
        }

        if !is_supported_version(object) {
            return Err(invalid(format!(
                "unsupported version {} (expected {EXPORT_VERSION})",
                object.get("version").unwrap_or(&Value::Null)
            )));
        }

        let exported_at = object
            .get("exportedAt")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("exportedAt must be a string"))?
            .to_string();

        let templates = object
            .get("templates")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("templates must be an array"))?
            .clone();

        Ok(Self {
            exported_at,
            templates,
            settings: object.get("settings").cloned(),
        })
    }
}

/// Read import file text as untyped JSON; envelope checks happen on import.
pub fn parse_import_text(raw: &str) -> Result<Value> {
    serde_json::from_str::<Value>(raw).map_err(|err| invalid(format!("not valid JSON: {err}")))
}

#[allow(clippy::float_cmp)] // JSON numbers: 1 and 1.0 are the same version
fn is_supported_version(object: &Map<String, Value>) -> bool {
    object
        .get("version")
        .and_then(Value::as_f64)
        .is_some_and(|version| version == f64::from(EXPORT_VERSION))
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::InvalidPayload(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTemplate, TemplateId};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn envelope() -> Value {
        json!({
            "schema": EXPORT_SCHEMA,
            "version": 1,
            "exportedAt": "2024-05-01T12:00:00.000Z",
            "templates": [{ "id": "a" }, { "name": "no id" }]
        })
    }

    #[test]
    fn accepts_v1_envelope() {
        let payload = ExportPayload::from_value(&envelope()).unwrap();
        assert_eq!(payload.exported_at, "2024-05-01T12:00:00.000Z");
        assert_eq!(payload.templates.len(), 2);
        assert!(payload.settings.is_none());
    }

    #[test]
    fn keeps_settings_field() {
        let mut value = envelope();
        value["settings"] = json!({ "defaultVenue": "Lounge" });
        let payload = ExportPayload::from_value(&value).unwrap();
        assert_eq!(payload.settings, Some(json!({ "defaultVenue": "Lounge" })));
    }

    #[test]
    fn rejects_malformed_envelopes() {
        let cases = [
            ("schema", json!("someone-else.export")),
            ("schema", Value::Null),
            ("version", json!(2)),
            ("version", json!("1")),
            ("exportedAt", json!(1_714_564_800_000_i64)),
            ("templates", json!({ "id": "a" })),
        ];

        for (field, bad) in cases {
            let mut value = envelope();
            value[field] = bad;
            let err = ExportPayload::from_value(&value).unwrap_err();
            assert!(matches!(err, Error::InvalidPayload(_)), "{field}");
        }
    }

    #[test]
    fn rejects_missing_templates_and_non_objects() {
        let mut value = envelope();
        value.as_object_mut().unwrap().remove("templates");
        assert!(ExportPayload::from_value(&value).is_err());
        assert!(ExportPayload::from_value(&json!([])).is_err());
        let err = parse_import_text("not json").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn error_message_names_the_problem() {
        let mut value = envelope();
        value["version"] = json!(3);
        let err = ExportPayload::from_value(&value).unwrap_err();
        assert!(err.to_string().contains("unsupported version 3"));
    }

    #[test]
    fn built_export_validates_as_payload() {
        let mut template = crate::models::Template::from_draft(NewTemplate::default(), 42);
        template.id = TemplateId::parse("tpl-1").unwrap();

        let document = build_export(vec![template], 0);
        assert_eq!(document.exported_at, "1970-01-01T00:00:00.000Z");

        let json = render_json_export(&document).unwrap();
        assert!(json.contains("\"createdAt\": 42"));

        let payload = ExportPayload::from_value(&parse_import_text(&json).unwrap()).unwrap();
        assert_eq!(payload.templates.len(), 1);
        assert_eq!(payload.templates[0]["id"], "tpl-1");
    }

    #[test]
    fn suggested_export_file_name_uses_timestamp() {
        assert_eq!(
            suggested_export_file_name(123),
            "aetherkit-templates-123.json"
        );
    }
}
