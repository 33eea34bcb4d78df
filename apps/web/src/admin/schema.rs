//! Declarative form schemas for the admin editing surface.
//!
//! Each editable form is a list of `FieldSpec`s. The same list is served to
//! the browser (which renders an input per `InputKind`) and interpreted here
//! to validate and normalise submissions before they reach the backend.
//!
//! # Validation rules
//! - Fields not in the schema are rejected.
//! - A required field that is absent, `null`, or blank after trimming fails.
//! - Optional fields that are absent or `null` are dropped from the output.
//! - Each present value is checked and normalised by its `InputKind`.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::collection::{BlockOrder, CollectionType};

// ────────────────────────────────────────────────────────────────────────────
// Schema types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InputKind {
    Text {
        #[serde(rename = "maxLength")]
        max_length: usize,
    },
    TextArea {
        #[serde(rename = "maxLength")]
        max_length: usize,
    },
    /// Lowercase letters and digits, separated by single hyphens.
    Slug,
    Number {
        min: i64,
        max: i64,
    },
    Toggle,
    /// ISO `YYYY-MM-DD`.
    Date,
    Select {
        options: Vec<&'static str>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutHint {
    Full,
    Half,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub field: &'static str,
    pub label: &'static str,
    pub input_kind: InputKind,
    pub required: bool,
    pub layout_hint: LayoutHint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Pseudo-field used for errors that concern the whole submission.
pub const FORM_FIELD: &str = "_form";

// ────────────────────────────────────────────────────────────────────────────
// Schemas
// ────────────────────────────────────────────────────────────────────────────

fn field(
    field: &'static str,
    label: &'static str,
    input_kind: InputKind,
    required: bool,
    layout_hint: LayoutHint,
) -> FieldSpec {
    FieldSpec {
        field,
        label,
        input_kind,
        required,
        layout_hint,
    }
}

/// Collection metadata form. Field names match `CollectionUpdate`.
pub fn collection_form() -> Vec<FieldSpec> {
    vec![
        field(
            "title",
            "Title",
            InputKind::Text { max_length: 120 },
            true,
            LayoutHint::Full,
        ),
        field("slug", "Slug", InputKind::Slug, true, LayoutHint::Half),
        field(
            "collectionType",
            "Type",
            InputKind::Select {
                options: CollectionType::ALL.iter().map(|t| t.as_str()).collect(),
            },
            true,
            LayoutHint::Half,
        ),
        field(
            "description",
            "Description",
            InputKind::TextArea { max_length: 2000 },
            false,
            LayoutHint::Full,
        ),
        field(
            "location",
            "Location",
            InputKind::Text { max_length: 120 },
            false,
            LayoutHint::Half,
        ),
        field(
            "collectionDate",
            "Date",
            InputKind::Date,
            false,
            LayoutHint::Half,
        ),
        field("visible", "Visible", InputKind::Toggle, false, LayoutHint::Inline),
    ]
}

/// Image block metadata form. Field names match `BlockUpdate`.
pub fn image_block_form() -> Vec<FieldSpec> {
    vec![
        field(
            "title",
            "Title",
            InputKind::Text { max_length: 120 },
            false,
            LayoutHint::Full,
        ),
        field(
            "caption",
            "Caption",
            InputKind::TextArea { max_length: 500 },
            false,
            LayoutHint::Full,
        ),
        field(
            "alt",
            "Alt text",
            InputKind::Text { max_length: 250 },
            false,
            LayoutHint::Full,
        ),
        field(
            "rating",
            "Rating",
            InputKind::Number { min: 1, max: 5 },
            false,
            LayoutHint::Inline,
        ),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

/// Validates a submitted JSON object against `schema`.
///
/// Returns the normalised fields on success, or every field error found.
pub fn validate_form(schema: &[FieldSpec], input: &Value) -> Result<Map<String, Value>, Vec<FieldError>> {
    let Some(object) = input.as_object() else {
        return Err(vec![FieldError::new(FORM_FIELD, "expected a JSON object")]);
    };

    let mut errors: Vec<FieldError> = object
        .keys()
        .filter(|key| !schema.iter().any(|spec| spec.field == key.as_str()))
        .map(|key| FieldError::new(key, "is not an editable field"))
        .collect();

    let mut normalized = Map::new();
    for spec in schema {
        let value = match object.get(spec.field) {
            None | Some(Value::Null) => {
                if spec.required {
                    errors.push(FieldError::new(spec.field, "is required"));
                }
                continue;
            }
            Some(value) => value,
        };

        match spec.input_kind.normalize(value) {
            Ok(Value::String(s)) if s.is_empty() && spec.required => {
                errors.push(FieldError::new(spec.field, "is required"));
            }
            Ok(value) => {
                normalized.insert(spec.field.to_string(), value);
            }
            Err(message) => errors.push(FieldError::new(spec.field, message)),
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

impl InputKind {
    /// Checks one value and returns its normalised form.
    pub fn normalize(&self, value: &Value) -> Result<Value, String> {
        match self {
            InputKind::Text { max_length } | InputKind::TextArea { max_length } => {
                let text = expect_str(value)?.trim();
                if text.chars().count() > *max_length {
                    return Err(format!("must be at most {max_length} characters"));
                }
                Ok(Value::String(text.to_string()))
            }
            InputKind::Slug => {
                let slug = expect_str(value)?.trim().to_lowercase();
                if slug.is_empty() {
                    return Ok(Value::String(slug));
                }
                let well_formed = slug.split('-').all(|part| {
                    !part.is_empty()
                        && part
                            .chars()
                            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                });
                if !well_formed {
                    return Err(
                        "must contain only letters, digits and single hyphens".to_string()
                    );
                }
                Ok(Value::String(slug))
            }
            InputKind::Number { min, max } => {
                let number = value
                    .as_i64()
                    .ok_or_else(|| "must be a whole number".to_string())?;
                if number < *min || number > *max {
                    return Err(format!("must be between {min} and {max}"));
                }
                Ok(Value::from(number))
            }
            InputKind::Toggle => value
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| "must be true or false".to_string()),
            InputKind::Date => {
                let raw = expect_str(value)?.trim();
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| "must be a date in YYYY-MM-DD format".to_string())?;
                Ok(Value::String(date.format("%Y-%m-%d").to_string()))
            }
            InputKind::Select { options } => {
                let choice = expect_str(value)?.trim();
                if !options.contains(&choice) {
                    return Err(format!("must be one of: {}", options.join(", ")));
                }
                Ok(Value::String(choice.to_string()))
            }
        }
    }
}

/// Checks a reorder submission: non-empty, no repeated ids or positions.
pub fn validate_order(order: &[BlockOrder]) -> Result<(), Vec<FieldError>> {
    if order.is_empty() {
        return Err(vec![FieldError::new(FORM_FIELD, "order must not be empty")]);
    }

    let mut errors = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut seen_positions = HashSet::new();
    for entry in order {
        if !seen_ids.insert(&entry.id) {
            errors.push(FieldError::new(
                &entry.id.to_string(),
                "appears more than once",
            ));
        }
        if entry.order_index < 0 {
            errors.push(FieldError::new(
                &entry.id.to_string(),
                "orderIndex must not be negative",
            ));
        } else if !seen_positions.insert(entry.order_index) {
            errors.push(FieldError::new(
                &entry.id.to_string(),
                format!("orderIndex {} is already taken", entry.order_index),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn expect_str(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| "must be text".to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::BlockId;
    use crate::models::collection::{BlockUpdate, CollectionUpdate};
    use serde_json::json;

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_valid_collection_form_normalizes() {
        let input = json!({
            "title": "  Iceland  ",
            "slug": "Iceland-2024",
            "collectionType": "ART_GALLERY",
            "collectionDate": "2024-06-01",
            "visible": false,
            "description": null
        });
        let normalized = validate_form(&collection_form(), &input).unwrap();

        assert_eq!(normalized["title"], "Iceland");
        assert_eq!(normalized["slug"], "iceland-2024");
        assert!(!normalized.contains_key("description"));

        let update: CollectionUpdate = serde_json::from_value(Value::Object(normalized)).unwrap();
        assert_eq!(update.collection_type, Some(CollectionType::ArtGallery));
        assert_eq!(update.visible, Some(false));
        assert_eq!(update.collection_date, NaiveDate::from_ymd_opt(2024, 6, 1));
    }

    #[test]
    fn test_missing_required_fields_are_reported() {
        let errors = validate_form(&collection_form(), &json!({ "title": "   " })).unwrap_err();
        assert_eq!(fields(&errors), vec!["title", "slug", "collectionType"]);
        assert!(errors.iter().all(|e| e.message == "is required"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let input = json!({ "title": "A", "slug": "a", "collectionType": "BLOG", "password": "x" });
        let errors = validate_form(&collection_form(), &input).unwrap_err();
        assert_eq!(fields(&errors), vec!["password"]);
    }

    #[test]
    fn test_non_object_submission() {
        let errors = validate_form(&collection_form(), &json!([1, 2])).unwrap_err();
        assert_eq!(fields(&errors), vec![FORM_FIELD]);
    }

    #[test]
    fn test_slug_rules() {
        let slug = InputKind::Slug;
        assert_eq!(slug.normalize(&json!("road-trip-2")).unwrap(), json!("road-trip-2"));
        assert!(slug.normalize(&json!("road--trip")).is_err());
        assert!(slug.normalize(&json!("-road")).is_err());
        assert!(slug.normalize(&json!("road trip")).is_err());
        assert!(slug.normalize(&json!("réunion")).is_err());
    }

    #[test]
    fn test_text_length_limit_counts_characters() {
        let kind = InputKind::Text { max_length: 3 };
        assert!(kind.normalize(&json!("Vík")).is_ok());
        assert!(kind.normalize(&json!("Víks")).is_err());
        assert!(kind.normalize(&json!(42)).is_err());
    }

    #[test]
    fn test_number_range_and_type() {
        let kind = InputKind::Number { min: 1, max: 5 };
        assert_eq!(kind.normalize(&json!(5)).unwrap(), json!(5));
        assert!(kind.normalize(&json!(0)).is_err());
        assert!(kind.normalize(&json!(6)).is_err());
        assert!(kind.normalize(&json!(2.5)).is_err());
        assert!(kind.normalize(&json!("3")).is_err());
    }

    #[test]
    fn test_date_and_select_and_toggle() {
        assert!(InputKind::Date.normalize(&json!("2024-02-30")).is_err());
        assert!(InputKind::Date.normalize(&json!("01/02/2024")).is_err());
        assert!(InputKind::Toggle.normalize(&json!("true")).is_err());

        let select = InputKind::Select {
            options: vec!["BLOG", "CATALOG"],
        };
        assert!(select.normalize(&json!("CATALOG")).is_ok());
        let err = select.normalize(&json!("VIDEO")).unwrap_err();
        assert_eq!(err, "must be one of: BLOG, CATALOG");
    }

    #[test]
    fn test_image_block_form_to_update() {
        let input = json!({ "caption": "Golden hour", "rating": 5 });
        let normalized = validate_form(&image_block_form(), &input).unwrap();
        let update: BlockUpdate = serde_json::from_value(Value::Object(normalized)).unwrap();
        assert_eq!(update.caption.as_deref(), Some("Golden hour"));
        assert_eq!(update.rating, Some(5));
        assert_eq!(update.title, None);
    }

    #[test]
    fn test_schema_serializes_for_the_browser() {
        let json = serde_json::to_value(collection_form()).unwrap();
        assert_eq!(json[0]["field"], "title");
        assert_eq!(json[0]["inputKind"]["kind"], "text");
        assert_eq!(json[0]["inputKind"]["maxLength"], 120);
        assert_eq!(json[0]["layoutHint"], "full");
        assert_eq!(json[2]["inputKind"]["options"][4], "CLIENT_GALLERY");
    }

    #[test]
    fn test_validate_order() {
        let order = vec![
            BlockOrder {
                id: BlockId::Int(1),
                order_index: 0,
            },
            BlockOrder {
                id: BlockId::Int(2),
                order_index: 1,
            },
        ];
        assert!(validate_order(&order).is_ok());
        assert!(validate_order(&[]).is_err());

        let duplicated = vec![
            order[0].clone(),
            BlockOrder {
                id: BlockId::Int(1),
                order_index: 0,
            },
        ];
        let errors = validate_order(&duplicated).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "appears more than once");
    }
}
