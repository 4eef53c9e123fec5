//! Tiered resolution: environment > JSON file > declared default.
//!
//! Loading never fails for bad external input. A missing or malformed file,
//! a JSON value of the wrong type and an unparseable environment variable or
//! default are all logged, recorded in the returned [`Resolution`] and
//! skipped. Only a broken schema aborts (see [`walker::walk`]).

use crate::coerce;
use crate::env::{Environment, ProcessEnv};
use crate::error::{ConfigError, Origin};
use crate::report::{FieldOutcome, FieldSource, Resolution};
use crate::schema::{Configurable, FieldDescriptor, ValueMut};
use crate::walker::{self, LeafField, Visitor};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Path reported for in-memory documents.
const INLINE_SOURCE: &str = "<inline>";

/// Resolves configuration structures against an environment and a JSON document.
#[derive(Debug, Clone, Default)]
pub struct Resolver<E = ProcessEnv> {
    env: E,
}

impl Resolver<ProcessEnv> {
    /// Resolver backed by the process environment.
    pub fn new() -> Self {
        Self { env: ProcessEnv }
    }
}

impl<E: Environment> Resolver<E> {
    /// Resolver backed by a custom environment, e.g. a `HashMap` in tests.
    pub fn with_env(env: E) -> Self {
        Self { env }
    }

    /// Resolve `dest` from the JSON file at `path`, the environment and defaults.
    ///
    /// A file that cannot be read or parsed is reported and treated as empty.
    pub fn load(&self, path: impl AsRef<Path>, dest: &mut dyn Configurable) -> Resolution {
        let path = path.as_ref();
        let mut errors = Vec::new();

        let document = match std::fs::read(path) {
            Ok(bytes) => decode_document(path, &bytes, &mut errors),
            Err(source) => {
                record(
                    &mut errors,
                    ConfigError::SourceUnavailable {
                        path: path.to_path_buf(),
                        source,
                    },
                );
                None
            }
        };

        self.apply(document.as_ref(), dest, errors)
    }

    /// Resolve `dest` from in-memory JSON bytes.
    pub fn load_bytes(&self, bytes: &[u8], dest: &mut dyn Configurable) -> Resolution {
        let mut errors = Vec::new();
        let document = decode_document(Path::new(INLINE_SOURCE), bytes, &mut errors);
        self.apply(document.as_ref(), dest, errors)
    }

    /// Resolve `dest` from an already decoded JSON value.
    pub fn load_value(&self, value: &Value, dest: &mut dyn Configurable) -> Resolution {
        let mut errors = Vec::new();
        let document = match value {
            Value::Object(map) => Some(map),
            _ => {
                record(
                    &mut errors,
                    ConfigError::NotAnObject {
                        path: PathBuf::from(INLINE_SOURCE),
                    },
                );
                None
            }
        };
        self.apply(document, dest, errors)
    }

    /// Resolve `dest` from the environment and defaults only.
    pub fn resolve(&self, dest: &mut dyn Configurable) -> Resolution {
        self.apply(None, dest, Vec::new())
    }

    fn apply(
        &self,
        document: Option<&Map<String, Value>>,
        dest: &mut dyn Configurable,
        errors: Vec<ConfigError>,
    ) -> Resolution {
        let mut pass = Pass {
            env: &self.env,
            resolution: Resolution {
                fields: Vec::new(),
                errors,
            },
        };
        walker::walk(dest, "", document, &mut pass);

        debug!(
            schema = dest.schema_name(),
            fields = pass.resolution.fields.len(),
            errors = pass.resolution.errors.len(),
            "configuration resolved"
        );
        pass.resolution
    }
}

fn decode_document(
    path: &Path,
    bytes: &[u8],
    errors: &mut Vec<ConfigError>,
) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            record(
                errors,
                ConfigError::NotAnObject {
                    path: path.to_path_buf(),
                },
            );
            None
        }
        Err(source) => {
            record(
                errors,
                ConfigError::MalformedSource {
                    path: path.to_path_buf(),
                    source,
                },
            );
            None
        }
    }
}

fn record(errors: &mut Vec<ConfigError>, err: ConfigError) {
    warn!(code = err.code(), "{}", err);
    errors.push(err);
}

/// One walk over a destination structure.
struct Pass<'e, E> {
    env: &'e E,
    resolution: Resolution,
}

impl<'d, E: Environment> Visitor<'d> for Pass<'_, E> {
    fn leaf(&mut self, field: LeafField<'_, 'd>) {
        let LeafField {
            path,
            descriptor,
            mut slot,
            document,
        } = field;

        let mut from_file = false;
        if let (Some(doc), Some(key)) = (document, descriptor.json_key()) {
            if let Some(value) = doc.get(key) {
                match coerce::assign_json(&mut slot, value) {
                    Ok(assigned) => from_file = assigned,
                    Err(reason) => record(
                        &mut self.resolution.errors,
                        ConfigError::MalformedField {
                            field: path.clone(),
                            key: key.to_string(),
                            reason,
                        },
                    ),
                }
            }
        }

        let source = self.precedence(&path, descriptor, &mut slot, from_file);
        debug!(field = %path, %source, "field resolved");
        self.resolution.fields.push(FieldOutcome { path, source });
    }

    fn malformed_scope(&mut self, path: &str, key: &str, value: &'d Value) {
        record(
            &mut self.resolution.errors,
            ConfigError::MalformedField {
                field: path.to_string(),
                key: key.to_string(),
                reason: format!("expects an object, got {}", value),
            },
        );
    }
}

impl<E: Environment> Pass<'_, E> {
    /// Environment wins, then a meaningful existing value, then the default.
    fn precedence(
        &mut self,
        path: &str,
        descriptor: &FieldDescriptor,
        slot: &mut ValueMut<'_>,
        from_file: bool,
    ) -> FieldSource {
        if let Some(var) = descriptor.env_key() {
            if let Some(raw) = self.env.var(var) {
                let origin = Origin::Environment(var.to_string());
                if self.coerce(path, slot, &raw, origin) {
                    return FieldSource::Environment;
                }
                return retained(slot, from_file);
            }
        }

        if coerce::is_meaningful(slot) {
            return retained(slot, from_file);
        }

        if let Some(literal) = descriptor.default_literal() {
            if self.coerce(path, slot, literal, Origin::Default) {
                return FieldSource::Default;
            }
        }

        FieldSource::Unset
    }

    fn coerce(&mut self, path: &str, slot: &mut ValueMut<'_>, raw: &str, origin: Origin) -> bool {
        match coerce::coerce(slot, raw) {
            Ok(()) => true,
            Err(invalid) => {
                record(
                    &mut self.resolution.errors,
                    ConfigError::Coercion {
                        field: path.to_string(),
                        kind: invalid.kind,
                        value: invalid.value,
                        origin,
                    },
                );
                false
            }
        }
    }
}

/// Source of a value the precedence rule left in place.
fn retained(slot: &ValueMut<'_>, from_file: bool) -> FieldSource {
    if !coerce::is_meaningful(slot) {
        FieldSource::Unset
    } else if from_file {
        FieldSource::File
    } else {
        FieldSource::Preset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configurable;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Listener {
        listen_port: i64,
        name: String,
        verbose: bool,
        backlog: u32,
    }

    configurable! {
        Listener {
            leaf listen_port: i64 { json: "ListenPort", env: "LISTEN_PORT", default: "0" },
            leaf name: String { json: "Name", env: "APP_NAME", default: "my_game" },
            leaf verbose: bool { json: "Verbose", default: "true" },
            leaf backlog: u32 { json: "Backlog" },
        }
    }

    #[derive(Debug, Default)]
    struct Spool {
        depth: u32,
        token: String,
    }

    configurable! {
        Spool {
            leaf depth: u32 { default: "8" },
            leaf token: String { json: "-", env: "SPOOL_TOKEN" },
        }
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_environment_beats_json() {
        let resolver = Resolver::with_env(env(&[("LISTEN_PORT", "9090")]));
        let mut listener = Listener::default();
        let resolution = resolver.load_value(&json!({"ListenPort": 8080}), &mut listener);

        assert_eq!(listener.listen_port, 9090);
        assert_eq!(
            resolution.source_of("listen_port"),
            Some(FieldSource::Environment)
        );
    }

    #[test]
    fn test_json_beats_default() {
        let resolver = Resolver::with_env(env(&[]));
        let mut listener = Listener::default();
        let resolution =
            resolver.load_value(&json!({"ListenPort": 8080, "Name": "lobby"}), &mut listener);

        assert_eq!(listener.listen_port, 8080);
        assert_eq!(listener.name, "lobby");
        assert_eq!(resolution.source_of("listen_port"), Some(FieldSource::File));
        assert!(resolution.is_clean());
    }

    #[test]
    fn test_defaults_fill_gaps() {
        let resolver = Resolver::with_env(env(&[]));
        let mut listener = Listener::default();
        let resolution = resolver.resolve(&mut listener);

        assert_eq!(listener.listen_port, 0);
        assert_eq!(listener.name, "my_game");
        assert!(listener.verbose);
        assert_eq!(listener.backlog, 0);
        assert_eq!(resolution.source_of("name"), Some(FieldSource::Default));
        assert_eq!(resolution.source_of("backlog"), Some(FieldSource::Unset));
    }

    #[test]
    fn test_json_false_is_overwritten_by_true_default() {
        let resolver = Resolver::with_env(env(&[]));
        let mut listener = Listener::default();
        let resolution = resolver.load_value(&json!({"Verbose": false}), &mut listener);

        assert!(listener.verbose);
        assert_eq!(resolution.source_of("verbose"), Some(FieldSource::Default));
    }

    #[test]
    fn test_empty_env_var_is_not_provided() {
        let resolver = Resolver::with_env(env(&[("APP_NAME", "")]));
        let mut listener = Listener::default();
        resolver.load_value(&json!({"Name": "lobby"}), &mut listener);

        assert_eq!(listener.name, "lobby");
    }

    #[test]
    fn test_bad_env_value_keeps_json_value() {
        let resolver = Resolver::with_env(env(&[("LISTEN_PORT", "ninety")]));
        let mut listener = Listener::default();
        let resolution = resolver.load_value(&json!({"ListenPort": 8080}), &mut listener);

        assert_eq!(listener.listen_port, 8080);
        assert_eq!(resolution.source_of("listen_port"), Some(FieldSource::File));
        let errors: Vec<_> = resolution.errors_for("listen_port").collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code(), "COERCION_FAILURE");
    }

    #[test]
    fn test_preset_value_is_kept() {
        let resolver = Resolver::with_env(env(&[]));
        let mut listener = Listener {
            name: "preset".to_string(),
            ..Listener::default()
        };
        let resolution = resolver.resolve(&mut listener);

        assert_eq!(listener.name, "preset");
        assert_eq!(resolution.source_of("name"), Some(FieldSource::Preset));
    }

    #[test]
    fn test_type_mismatch_keeps_other_fields() {
        let resolver = Resolver::with_env(env(&[]));
        let mut listener = Listener::default();
        let resolution = resolver.load_value(
            &json!({"ListenPort": "8080", "Name": "lobby", "Backlog": 128}),
            &mut listener,
        );

        assert_eq!(listener.listen_port, 0);
        assert_eq!(listener.name, "lobby");
        assert_eq!(listener.backlog, 128);
        assert_eq!(resolution.errors.len(), 1);
        assert_eq!(resolution.errors[0].code(), "MALFORMED_FIELD");
    }

    #[test]
    fn test_malformed_bytes_fall_back() {
        let resolver = Resolver::with_env(env(&[]));
        let mut listener = Listener::default();
        let resolution = resolver.load_bytes(b"{\"ListenPort\": 80", &mut listener);

        assert_eq!(listener.listen_port, 0);
        assert_eq!(listener.name, "my_game");
        assert_eq!(resolution.errors.len(), 1);
        assert!(matches!(
            resolution.errors[0],
            ConfigError::MalformedSource { .. }
        ));
    }

    #[test]
    fn test_top_level_array_is_not_an_object() {
        let resolver = Resolver::with_env(env(&[]));
        let mut listener = Listener::default();
        let resolution = resolver.load_bytes(b"[1, 2]", &mut listener);

        assert!(matches!(resolution.errors[0], ConfigError::NotAnObject { .. }));
        assert_eq!(listener.name, "my_game");
    }

    #[test]
    fn test_fields_without_json_key_ignore_the_document() {
        let resolver = Resolver::with_env(env(&[("SPOOL_TOKEN", "abc")]));
        let mut spool = Spool::default();
        let resolution = resolver.load_value(
            &json!({"depth": 1, "Depth": 2, "token": "x", "-": "y"}),
            &mut spool,
        );

        assert_eq!(spool.depth, 8);
        assert_eq!(spool.token, "abc");
        assert_eq!(resolution.source_of("depth"), Some(FieldSource::Default));
        assert_eq!(
            resolution.source_of("token"),
            Some(FieldSource::Environment)
        );
        assert!(resolution.is_clean());
    }
}
