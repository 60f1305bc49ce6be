// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// The declared type of one side of the mapping.
///
/// Unknown declared type names fall back to [`ValueType::String`]; the editor
/// never rejects a configuration over an unrecognized type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
}

impl ValueType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            _ => Self::String,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl Default for ValueType {
    fn default() -> Self {
        Self::String
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive editable value.
///
/// Numbers are stored as `f64`, matching the host's loosely typed inputs;
/// equality between scalars is therefore `PartialEq` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Str(SmolStr),
}

impl Scalar {
    /// Convert a JSON scalar into a [`Scalar`]. Nulls, arrays and objects are
    /// not representable and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Str(SmolStr::new(s))),
            _ => None,
        }
    }

    /// Coerce raw user input into the declared type.
    ///
    /// Coercion never fails: booleans compare ASCII-case-insensitively
    /// against `"true"`, unparseable numbers collapse to `0`, strings pass
    /// through unchanged.
    pub fn coerce(raw: &str, value_type: ValueType) -> Self {
        match value_type {
            ValueType::Boolean => Self::Bool(raw.trim().eq_ignore_ascii_case("true")),
            ValueType::Number => {
                let parsed = raw.trim().parse::<f64>().unwrap_or(f64::NAN);
                Self::Number(if parsed.is_nan() { 0.0 } else { parsed })
            }
            ValueType::String => Self::Str(SmolStr::new(raw)),
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Boolean,
            Self::Number(_) => ValueType::Number,
            Self::Str(_) => ValueType::String,
        }
    }

    /// The canonical string form, used for display, parameter matching and
    /// content-keyed caching.
    pub fn string_form(&self) -> String {
        self.to_string()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Str(SmolStr::new(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Scalar, ValueType};

    #[test]
    fn value_type_falls_back_to_string() {
        assert_eq!(ValueType::from_name("number"), ValueType::Number);
        assert_eq!(ValueType::from_name("boolean"), ValueType::Boolean);
        assert_eq!(ValueType::from_name("string"), ValueType::String);
        assert_eq!(ValueType::from_name("uuid"), ValueType::String);
        assert_eq!(ValueType::from_name(""), ValueType::String);
    }

    #[test]
    fn coerce_boolean_is_case_insensitive() {
        assert_eq!(Scalar::coerce("true", ValueType::Boolean), Scalar::Bool(true));
        assert_eq!(Scalar::coerce("TRUE", ValueType::Boolean), Scalar::Bool(true));
        assert_eq!(Scalar::coerce(" True ", ValueType::Boolean), Scalar::Bool(true));
        assert_eq!(Scalar::coerce("false", ValueType::Boolean), Scalar::Bool(false));
        assert_eq!(Scalar::coerce("yes", ValueType::Boolean), Scalar::Bool(false));
    }

    #[test]
    fn coerce_number_defaults_nan_to_zero() {
        assert_eq!(Scalar::coerce("5.0", ValueType::Number), Scalar::Number(5.0));
        assert_eq!(Scalar::coerce("-3", ValueType::Number), Scalar::Number(-3.0));
        assert_eq!(Scalar::coerce("abc", ValueType::Number), Scalar::Number(0.0));
        assert_eq!(Scalar::coerce("", ValueType::Number), Scalar::Number(0.0));
    }

    #[test]
    fn number_string_form_drops_trailing_zero() {
        assert_eq!(Scalar::Number(5.0).string_form(), "5");
        assert_eq!(Scalar::Number(5.5).string_form(), "5.5");
        assert_eq!(Scalar::Bool(true).string_form(), "true");
        assert_eq!(Scalar::from("A").string_form(), "A");
    }

    #[test]
    fn from_json_covers_scalars_only() {
        assert_eq!(
            Scalar::from_json(&serde_json::json!("x")),
            Some(Scalar::from("x"))
        );
        assert_eq!(
            Scalar::from_json(&serde_json::json!(2.5)),
            Some(Scalar::Number(2.5))
        );
        assert_eq!(
            Scalar::from_json(&serde_json::json!(false)),
            Some(Scalar::Bool(false))
        );
        assert_eq!(Scalar::from_json(&serde_json::Value::Null), None);
        assert_eq!(Scalar::from_json(&serde_json::json!([1, 2])), None);
    }
}
