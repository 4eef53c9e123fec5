//! Per-field resolution outcomes.

use crate::error::ConfigError;
use serde::Serialize;
use std::fmt;

/// Which source a leaf field's final value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Environment,
    File,
    Default,
    /// A meaningful value placed by the caller before loading.
    Preset,
    /// Left at its zero value.
    Unset,
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::Environment => write!(f, "environment"),
            FieldSource::File => write!(f, "file"),
            FieldSource::Default => write!(f, "default"),
            FieldSource::Preset => write!(f, "preset"),
            FieldSource::Unset => write!(f, "unset"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOutcome {
    pub path: String,
    pub source: FieldSource,
}

/// Audit trail of one resolution run.
#[derive(Debug, Default, Serialize)]
pub struct Resolution {
    /// One entry per leaf field, in declared order.
    pub fields: Vec<FieldOutcome>,
    /// Every non-fatal error observed, in the order it occurred.
    pub errors: Vec<ConfigError>,
}

impl Resolution {
    pub fn source_of(&self, path: &str) -> Option<FieldSource> {
        self.fields
            .iter()
            .find(|outcome| outcome.path == path)
            .map(|outcome| outcome.source)
    }

    /// Number of fields resolved from `source`.
    pub fn count(&self, source: FieldSource) -> usize {
        self.fields.iter().filter(|o| o.source == source).count()
    }

    pub fn errors_for<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ConfigError> + 'a {
        self.errors.iter().filter(move |e| e.field() == Some(path))
    }

    /// True when no source was missing or malformed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
