//! Per-attribute indicator encoders
//!
//! Each tracked attribute gets its own encoder with a vocabulary frozen at
//! fit time. Categorical attributes produce a one-hot block, multi-label
//! attributes a multi-hot block. Values outside the vocabulary encode to
//! zeros: unknown categories are degraded data, never an error.

use rapport_core::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How an attribute's raw values map onto its indicator block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Single-valued: at most one slot set per user.
    Categorical,
    /// Multi-valued: one slot per label the user carries.
    MultiLabel,
}

/// Indicator encoder for one attribute.
///
/// The vocabulary is the sorted set of distinct values observed at fit
/// time, so fitting the same rows twice yields bit-identical blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEncoder {
    attribute: String,
    kind: AttributeKind,
    vocabulary: Vec<String>,
}

impl AttributeEncoder {
    /// Fit an encoder over the raw values observed for one attribute.
    #[must_use]
    pub fn fit<'a, I>(attribute: &str, kind: AttributeKind, values: I) -> Self
    where
        I: IntoIterator<Item = &'a AttrValue>,
    {
        let mut vocabulary = BTreeSet::new();
        for value in values {
            match kind {
                AttributeKind::Categorical => {
                    if let AttrValue::Scalar(s) = value {
                        vocabulary.insert(s.clone());
                    }
                }
                AttributeKind::MultiLabel => {
                    vocabulary.extend(effective_labels(value));
                }
            }
        }

        Self {
            attribute: attribute.to_string(),
            kind,
            vocabulary: vocabulary.into_iter().collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Width of this attribute's block: one slot per vocabulary entry.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.vocabulary.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Append this user's indicator block to `out`.
    ///
    /// Values missing from the vocabulary leave their slots at zero.
    pub fn encode_into(&self, value: &AttrValue, out: &mut Vec<f32>) {
        let base = out.len();
        out.resize(base + self.vocabulary.len(), 0.0);

        match self.kind {
            AttributeKind::Categorical => {
                if let AttrValue::Scalar(s) = value {
                    if let Ok(position) = self.vocabulary.binary_search(s) {
                        out[base + position] = 1.0;
                    }
                }
            }
            AttributeKind::MultiLabel => {
                for label in effective_labels(value) {
                    if let Ok(position) = self.vocabulary.binary_search(&label) {
                        out[base + position] = 1.0;
                    }
                }
            }
        }
    }
}

/// Labels a raw value contributes to a multi-label block.
///
/// Materialized lists pass through. Scalar text is treated as a serialized
/// list and parsed leniently. Absent and malformed values contribute
/// nothing.
#[must_use]
pub fn effective_labels(value: &AttrValue) -> Vec<String> {
    match value {
        AttrValue::List(labels) => labels.clone(),
        AttrValue::Scalar(text) => parse_label_list(text),
        AttrValue::Absent | AttrValue::Malformed => Vec::new(),
    }
}

/// Parse serialized list text into labels.
///
/// Accepts the JSON spelling `["a","b"]` and the single-quoted spelling
/// `['a','b']` some upstream clients emit. Anything else yields an empty
/// list.
fn parse_label_list(text: &str) -> Vec<String> {
    if let Ok(labels) = serde_json::from_str::<Vec<String>>(text) {
        return labels;
    }

    let trimmed = text.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed.contains('"') {
        let requoted = trimmed.replace('\'', "\"");
        if let Ok(labels) = serde_json::from_str::<Vec<String>>(&requoted) {
            return labels;
        }
    }

    Vec::new()
}
