//! Typed view over raw profile rows
//!
//! Profile rows arrive as loose JSON. [`AttrValue`] pins every attribute
//! field to one of four shapes at the boundary, so the encoders consume an
//! exhaustive enum instead of re-inspecting JSON. Malformed values are data,
//! not errors: they encode to zero contributions downstream.

use serde_json::Value;
use std::collections::HashMap;

static ABSENT: AttrValue = AttrValue::Absent;

/// A single raw attribute value as observed on a profile row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Field missing from the row, or JSON null.
    Absent,
    /// Single string value.
    Scalar(String),
    /// List of string values.
    List(Vec<String>),
    /// Present but neither a string nor a list of strings.
    Malformed,
}

impl AttrValue {
    /// Classify a raw JSON field.
    #[must_use]
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => AttrValue::Absent,
            Some(Value::String(s)) => AttrValue::Scalar(s.clone()),
            Some(Value::Array(items)) => {
                let mut labels = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => labels.push(s.clone()),
                        _ => return AttrValue::Malformed,
                    }
                }
                AttrValue::List(labels)
            }
            Some(_) => AttrValue::Malformed,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, AttrValue::Absent)
    }
}

/// One profile row: a user id plus its raw attribute values.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub user_id: String,
    pub attributes: HashMap<String, AttrValue>,
}

impl UserRecord {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add one attribute value, builder style.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttrValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Build a record from one JSON row.
    ///
    /// Returns `None` when the row carries no string `id` field; every other
    /// field is kept as a classified [`AttrValue`].
    #[must_use]
    pub fn from_row(row: &Value) -> Option<Self> {
        let object = row.as_object()?;
        let user_id = object.get("id")?.as_str()?.to_string();

        let mut attributes = HashMap::with_capacity(object.len().saturating_sub(1));
        for (name, value) in object {
            if name == "id" {
                continue;
            }
            attributes.insert(name.clone(), AttrValue::from_json(Some(value)));
        }

        Some(Self {
            user_id,
            attributes,
        })
    }

    /// Value of one attribute; `Absent` when the row never had the field.
    #[inline]
    #[must_use]
    pub fn attribute(&self, name: &str) -> &AttrValue {
        self.attributes.get(name).unwrap_or(&ABSENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_classification() {
        assert_eq!(AttrValue::from_json(None), AttrValue::Absent);
        assert_eq!(AttrValue::from_json(Some(&json!(null))), AttrValue::Absent);
        assert_eq!(
            AttrValue::from_json(Some(&json!("direct"))),
            AttrValue::Scalar("direct".to_string())
        );
        assert_eq!(
            AttrValue::from_json(Some(&json!(["morning", "evening"]))),
            AttrValue::List(vec!["morning".to_string(), "evening".to_string()])
        );
    }

    #[test]
    fn test_from_json_malformed() {
        assert_eq!(AttrValue::from_json(Some(&json!(42))), AttrValue::Malformed);
        assert_eq!(
            AttrValue::from_json(Some(&json!(true))),
            AttrValue::Malformed
        );
        assert_eq!(
            AttrValue::from_json(Some(&json!({"nested": "object"}))),
            AttrValue::Malformed
        );
        // Mixed-type list is malformed as a whole, not partially usable.
        assert_eq!(
            AttrValue::from_json(Some(&json!(["morning", 3]))),
            AttrValue::Malformed
        );
    }

    #[test]
    fn test_from_row() {
        let row = json!({
            "id": "u1",
            "communication_style": "direct",
            "availability": ["morning"],
            "chronotype": null,
        });
        let record = UserRecord::from_row(&row).unwrap();
        assert_eq!(record.user_id, "u1");
        assert_eq!(
            record.attribute("communication_style"),
            &AttrValue::Scalar("direct".to_string())
        );
        assert_eq!(record.attribute("chronotype"), &AttrValue::Absent);
        assert_eq!(record.attribute("never_present"), &AttrValue::Absent);
    }

    #[test]
    fn test_from_row_without_id() {
        assert!(UserRecord::from_row(&json!({"name": "no id"})).is_none());
        assert!(UserRecord::from_row(&json!({"id": 7})).is_none());
        assert!(UserRecord::from_row(&json!("not an object")).is_none());
    }
}
