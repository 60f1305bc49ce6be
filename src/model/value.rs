// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Amphora-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Amphora and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::ids::ValueId;
use super::scalar::{Scalar, ValueType};

/// A single editable value record.
///
/// The three `Option` flags are tri-state: `Some(_)` is an explicit,
/// host- or store-stamped decision that takes precedence over anything the
/// resolver would derive; `None` means "derive it".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    id: ValueId,
    value: Scalar,
    value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_from_param: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    param_source: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_editable: Option<bool>,
}

impl Value {
    pub fn new(id: ValueId, value: Scalar, value_type: ValueType) -> Self {
        Self {
            id,
            value,
            value_type,
            is_from_param: None,
            param_source: None,
            is_editable: None,
        }
    }

    pub fn new_with(
        id: ValueId,
        value: Scalar,
        value_type: ValueType,
        is_from_param: Option<bool>,
        param_source: Option<SmolStr>,
        is_editable: Option<bool>,
    ) -> Self {
        Self {
            id,
            value,
            value_type,
            is_from_param,
            param_source,
            is_editable,
        }
    }

    pub fn id(&self) -> &ValueId {
        &self.id
    }

    pub fn value(&self) -> &Scalar {
        &self.value
    }

    pub fn set_value(&mut self, value: Scalar) {
        self.value = value;
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_from_param(&self) -> Option<bool> {
        self.is_from_param
    }

    pub fn set_is_from_param(&mut self, is_from_param: Option<bool>) {
        self.is_from_param = is_from_param;
    }

    pub fn param_source(&self) -> Option<&str> {
        self.param_source.as_deref()
    }

    pub fn set_param_source<T: Into<SmolStr>>(&mut self, param_source: Option<T>) {
        self.param_source = param_source.map(Into::into);
    }

    pub fn is_editable(&self) -> Option<bool> {
        self.is_editable
    }

    pub fn set_is_editable(&mut self, is_editable: Option<bool>) {
        self.is_editable = is_editable;
    }

    /// Canonical string form of the content (display and cache key).
    pub fn string_form(&self) -> String {
        self.value.string_form()
    }
}

#[cfg(test)]
mod tests {
    use super::{Scalar, Value, ValueType};
    use crate::model::ValueId;

    fn vid(value: &str) -> ValueId {
        ValueId::new(value).expect("value id")
    }

    #[test]
    fn value_can_be_constructed_and_updated() {
        let mut value = Value::new(vid("v1"), Scalar::from("A"), ValueType::String);
        assert_eq!(value.id().as_str(), "v1");
        assert_eq!(value.value(), &Scalar::from("A"));
        assert_eq!(value.value_type(), ValueType::String);
        assert_eq!(value.is_from_param(), None);
        assert_eq!(value.param_source(), None);
        assert_eq!(value.is_editable(), None);

        value.set_value(Scalar::from("B"));
        value.set_is_from_param(Some(true));
        value.set_param_source(Some("defaults"));
        value.set_is_editable(Some(false));

        assert_eq!(value.string_form(), "B");
        assert_eq!(value.is_from_param(), Some(true));
        assert_eq!(value.param_source(), Some("defaults"));
        assert_eq!(value.is_editable(), Some(false));

        value.set_param_source::<&str>(None);
        assert_eq!(value.param_source(), None);
    }

    #[test]
    fn value_serializes_without_absent_flags() {
        let value = Value::new(vid("v1"), Scalar::Number(5.0), ValueType::Number);
        let json = serde_json::to_value(&value).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "id": "v1", "value": 5.0, "value_type": "number" })
        );
    }
}
