//! Non-fatal resolution errors.
//!
//! Every variant here is recovered locally: the resolver logs it, records it
//! in the [`Resolution`](crate::Resolution) and keeps going. A broken schema
//! is not represented here; it panics in the walker.

use crate::schema::FieldKind;
use serde::{Serialize, Serializer};
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Where a string value handed to the coercer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Environment(String),
    Default,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Environment(var) => write!(f, "environment variable {}", var),
            Origin::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid JSON.
    #[error("malformed config file {}: {source}", .path.display())]
    MalformedSource {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file parsed but its top level is not an object.
    #[error("config file {} must contain a JSON object", .path.display())]
    NotAnObject { path: PathBuf },

    /// A JSON value could not be assigned to its field.
    #[error("field {field}: JSON key {key:?} {reason}")]
    MalformedField {
        field: String,
        key: String,
        reason: String,
    },

    /// A string from the environment or a default did not parse as the field's kind.
    #[error("invalid value for {field} ({kind}) from {origin}: {value:?}")]
    Coercion {
        field: String,
        kind: FieldKind,
        value: String,
        origin: Origin,
    },
}

impl ConfigError {
    /// Short machine-readable tag for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            ConfigError::MalformedSource { .. } | ConfigError::NotAnObject { .. } => {
                "MALFORMED_SOURCE"
            }
            ConfigError::MalformedField { .. } => "MALFORMED_FIELD",
            ConfigError::Coercion { .. } => "COERCION_FAILURE",
        }
    }

    /// Dotted path of the field involved, if the error is field-scoped.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MalformedField { field, .. } | ConfigError::Coercion { field, .. } => {
                Some(field.as_str())
            }
            _ => None,
        }
    }
}

impl Serialize for ConfigError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ConfigError", 3)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("field", &self.field())?;
        state.end()
    }
}
