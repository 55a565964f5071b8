use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::errors::HelperError;

/// One read of the backoffice: which site, which opportunity type, and the
/// bearer token to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityRequest {
    pub site_id: String,
    pub opportunity_type: String,
    pub token: String,
}

impl OpportunityRequest {
    /// Build a request from CLI input, deriving the type from the descriptor.
    pub fn new(
        site_id: &str,
        token: &str,
        descriptor: &OpportunityDescriptor,
    ) -> Result<Self, HelperError> {
        Ok(Self {
            site_id: validate_site_id(site_id)?,
            opportunity_type: descriptor.opportunity_type()?,
            token: validate_token(token)?,
        })
    }
}

/// Records returned for one opportunity type. The payload is whatever the
/// API sent back and is never reshaped.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityResult {
    pub opportunity_type: String,
    pub payload: Value,
}

/// The local JSON file naming which opportunity to work with.
///
/// Both the file name (`opp--alt-text--3_7_2025.json`) and the contents can
/// carry the type; the contents win when both are present.
#[derive(Debug, Clone)]
pub struct OpportunityDescriptor {
    pub file_name: String,
    pub contents: Value,
}

impl OpportunityDescriptor {
    pub fn from_parts(path: &Path, text: &str) -> Result<Self, HelperError> {
        let contents: Value = serde_json::from_str(text).map_err(|e| {
            HelperError::invalid_input(format!("Invalid JSON in {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            file_name,
            contents,
        })
    }

    pub fn opportunity_type(&self) -> Result<String, HelperError> {
        let usable = |v: Option<&Value>| {
            v.and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        };
        let from_contents = usable(self.contents.pointer("/opportunity/type"))
            .or_else(|| usable(self.contents.get("type")));

        if let Some(kind) = from_contents {
            return Ok(kind);
        }

        type_from_file_name(&self.file_name).ok_or_else(|| {
            HelperError::invalid_input(format!(
                "Could not determine the opportunity type from {}",
                self.file_name
            ))
        })
    }

    /// Parse the descriptor as a full opportunity export (used when cloning).
    pub fn to_opportunity_file(&self) -> Result<OpportunityFile, HelperError> {
        if self.contents.get("opportunity").is_none() {
            return Err(HelperError::invalid_input(format!(
                "No 'opportunity' key found in {}",
                self.file_name
            )));
        }
        serde_json::from_value(self.contents.clone()).map_err(|e| {
            HelperError::invalid_input(format!("Malformed opportunity in {}: {}", self.file_name, e))
        })
    }
}

/// `opp--<type>--<date>.json` → `<type>`.
pub fn type_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(".json").unwrap_or(file_name);
    let mut parts = stem.split("--");
    if parts.next()? != "opp" {
        return None;
    }
    parts
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub fn validate_site_id(site_id: &str) -> Result<String, HelperError> {
    let trimmed = site_id.trim();
    Uuid::parse_str(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|_| HelperError::invalid_input(format!("Site id '{}' is not a UUID", site_id)))
}

pub fn validate_token(token: &str) -> Result<String, HelperError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(HelperError::invalid_input("Token must not be empty"));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// OPPORTUNITY EXPORTS (clone-oppt)
// ============================================================================

/// Exported opportunity with its suggestions, as stored in the lab's
/// `oppt/` folder.
#[derive(Debug, Clone, Deserialize)]
pub struct OpportunityFile {
    pub opportunity: ExportedOpportunity,
    #[serde(default)]
    pub suggestions: Option<Vec<Value>>,
}

/// Fields are forwarded as found. `None` means the key was absent; an
/// explicit `null` is kept as `Some(Value::Null)`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedOpportunity {
    #[serde(default, deserialize_with = "present")]
    pub audit_id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub runbook: Option<Value>,
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub kind: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub origin: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub guidance: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Body for `POST /sites/{id}/opportunities`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOpportunity {
    pub audit_id: Value,
    pub runbook: Value,
    #[serde(rename = "type")]
    pub kind: Value,
    pub origin: Value,
    pub title: Value,
    pub description: Value,
    pub tags: Value,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<Value>,
}

impl From<&ExportedOpportunity> for NewOpportunity {
    fn from(exported: &ExportedOpportunity) -> Self {
        let or_default = |field: &Option<Value>, default: Value| field.clone().unwrap_or(default);
        let empty = || Value::String(String::new());

        Self {
            audit_id: or_default(&exported.audit_id, empty()),
            runbook: or_default(&exported.runbook, empty()),
            kind: or_default(&exported.kind, empty()),
            origin: or_default(&exported.origin, Value::String("AUTOMATION".to_string())),
            title: or_default(&exported.title, empty()),
            description: or_default(&exported.description, empty()),
            tags: or_default(&exported.tags, Value::Array(Vec::new())),
            data: or_default(&exported.data, Value::Object(Default::default())),
            guidance: exported.guidance.clone(),
        }
    }
}

/// A Google Doc referenced by a suggestion variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleDocReference {
    pub url: String,
    pub site_base_url: Option<String>,
}

/// Everything `clone-oppt` created or found.
#[derive(Debug, Clone, Serialize)]
pub struct ClonedOpportunity {
    pub opportunity: Value,
    pub suggestions: Option<Value>,
    pub google_docs: Vec<GoogleDocReference>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str, contents: Value) -> OpportunityDescriptor {
        OpportunityDescriptor {
            file_name: name.to_string(),
            contents,
        }
    }

    #[test]
    fn test_type_from_file_name() {
        assert_eq!(
            type_from_file_name("opp--alt-text--3_7_2025.json"),
            Some("alt-text".to_string())
        );
        assert_eq!(
            type_from_file_name("opp--broken-backlinks.json"),
            Some("broken-backlinks".to_string())
        );
        assert_eq!(type_from_file_name("alt-text.json"), None);
        assert_eq!(type_from_file_name("opp----x.json"), None);
    }

    #[test]
    fn test_contents_take_precedence_over_file_name() {
        let d = descriptor(
            "opp--alt-text--3_7_2025.json",
            json!({"opportunity": {"type": "cwv"}}),
        );
        assert_eq!(d.opportunity_type().unwrap(), "cwv");

        let d = descriptor("whatever.json", json!({"type": "meta-tags"}));
        assert_eq!(d.opportunity_type().unwrap(), "meta-tags");
    }

    #[test]
    fn test_blank_nested_type_falls_back_to_top_level() {
        let d = descriptor(
            "opp--alt-text--3_7_2025.json",
            json!({"opportunity": {"type": ""}, "type": "meta-tags"}),
        );
        assert_eq!(d.opportunity_type().unwrap(), "meta-tags");

        let d = descriptor(
            "opp--alt-text--3_7_2025.json",
            json!({"opportunity": {"type": 7}, "type": "cwv"}),
        );
        assert_eq!(d.opportunity_type().unwrap(), "cwv");
    }

    #[test]
    fn test_file_name_fallback_and_failure() {
        let d = descriptor("opp--alt-text--3_7_2025.json", json!({}));
        assert_eq!(d.opportunity_type().unwrap(), "alt-text");

        let d = descriptor("notes.json", json!({"opportunity": {}}));
        assert!(matches!(
            d.opportunity_type(),
            Err(HelperError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_request_validates_site_and_token() {
        let d = descriptor("opp--alt-text--3_7_2025.json", json!({}));
        let ok = OpportunityRequest::new("13b91559-bbed-41d3-af66-c60660223ed5", " VALID ", &d)
            .unwrap();
        assert_eq!(ok.token, "VALID");
        assert_eq!(ok.opportunity_type, "alt-text");

        assert!(OpportunityRequest::new("not-a-uuid", "VALID", &d).is_err());
        assert!(OpportunityRequest::new("13b91559-bbed-41d3-af66-c60660223ed5", "  ", &d).is_err());
    }

    #[test]
    fn test_new_opportunity_defaults() {
        let d = descriptor(
            "opp--alt-text--3_7_2025.json",
            json!({"opportunity": {"type": "alt-text", "title": "Missing alt text"}}),
        );
        let file = d.to_opportunity_file().unwrap();
        let payload = NewOpportunity::from(&file.opportunity);
        let body = serde_json::to_value(&payload).unwrap();

        assert_eq!(body["origin"], "AUTOMATION");
        assert_eq!(body["type"], "alt-text");
        assert_eq!(body["data"], json!({}));
        assert_eq!(body["auditId"], "");
        assert!(body.get("guidance").is_none());
    }

    #[test]
    fn test_opportunity_file_requires_opportunity_key() {
        let d = descriptor("opp--alt-text.json", json!({"suggestions": []}));
        assert!(matches!(
            d.to_opportunity_file(),
            Err(HelperError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_export_fields_are_forwarded_as_found() {
        let d = descriptor(
            "opp--alt-text--3_7_2025.json",
            json!({"opportunity": {
                "type": "alt-text",
                "auditId": null,
                "runbook": null,
                "tags": ["a", {"k": 1}],
                "guidance": null
            }}),
        );
        let file = d.to_opportunity_file().unwrap();
        let body = serde_json::to_value(NewOpportunity::from(&file.opportunity)).unwrap();

        assert_eq!(body["auditId"], Value::Null);
        assert_eq!(body["runbook"], Value::Null);
        assert_eq!(body["tags"], json!(["a", {"k": 1}]));
        assert_eq!(body["title"], "");
        assert_eq!(body["origin"], "AUTOMATION");
        assert_eq!(body.get("guidance"), Some(&Value::Null));
    }
}
