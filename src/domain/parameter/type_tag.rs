//! Parameter type descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::TypedValue;

/// Type of a declared command or scheme parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    String,
    Integer,
    Float,
    Boolean,
    DateTime,
    Date,
    Guid,
    /// Composite value encoded as JSON
    Object,
}

impl TypeTag {
    /// Value a parameter of this type holds before the client supplies one
    pub fn default_value(&self) -> TypedValue {
        match self {
            Self::Integer => TypedValue::Integer(0),
            Self::Float => TypedValue::Float(0.0),
            Self::Boolean => TypedValue::Boolean(false),
            Self::String | Self::DateTime | Self::Date | Self::Guid | Self::Object => {
                TypedValue::Null
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::DateTime => "date_time",
            Self::Date => "date",
            Self::Guid => "guid",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared parameter of a command or scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
        }
    }
}
