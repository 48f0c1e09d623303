//! Best-effort recovery of a JSON payload from free-form model output.
//!
//! Models are told to answer with bare JSON but still wrap it in prose or
//! code fences. Recovery order:
//! 1. a fenced block (optionally tagged `json`) whose body is the expected shape
//! 2. otherwise the span from the first opening delimiter to the last closing one
//! 3. strict parse of whatever is left
//!
//! Callers decide their own fallback on `Err`. This can mis-extract when the
//! output contains several JSON-like spans or nested fences.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

static FENCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fenced object pattern is valid")
});

static FENCED_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").expect("fenced array pattern is valid")
});

/// The top-level JSON shape a caller expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

impl JsonShape {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonShape::Object => ('{', '}'),
            JsonShape::Array => ('[', ']'),
        }
    }

    fn fenced(self) -> &'static Regex {
        match self {
            JsonShape::Object => &*FENCED_OBJECT,
            JsonShape::Array => &*FENCED_ARRAY,
        }
    }

    fn name(self) -> &'static str {
        match self {
            JsonShape::Object => "object",
            JsonShape::Array => "array",
        }
    }
}

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("no JSON {0} found in model output")]
    NotFound(&'static str),

    #[error("recovered span is not valid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// `deserialize_with` helper: models write `null` for fields they have nothing
/// for, which should read the same as a missing key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Narrows raw model output down to the candidate JSON span.
fn candidate_span(text: &str, shape: JsonShape) -> Option<&str> {
    let text = shape
        .fenced()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str());

    let (open, close) = shape.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (start < end).then(|| &text[start..=end])
}

/// Recovers a JSON value of the given shape from model output.
pub fn recover_json(text: &str, shape: JsonShape) -> Result<Value, RecoveryError> {
    let span = candidate_span(text, shape).ok_or(RecoveryError::NotFound(shape.name()))?;
    Ok(serde_json::from_str(span)?)
}

/// Like [`recover_json`], deserializing straight into `T`.
pub fn recover<T: DeserializeOwned>(text: &str, shape: JsonShape) -> Result<T, RecoveryError> {
    let value = recover_json(text, shape)?;
    Ok(serde_json::from_value(value)?)
}
