// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing from `plugin.toml` files.
//!
//! A manifest is a flat TOML document with upper-case keys (`NAME`,
//! `VERSION`, `PLUGIN_ENTRY`, ...). Parsing happens in two steps: raw key
//! extraction with type checks, then normalization of the instance list and
//! per-instance launch arguments into one canonical mapping. TOML has no
//! null, so an absent key stands in for "None".

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use hangar_core::{HangarError, LogLevel};
use serde::Serialize;
use toml::{Table, Value};
use tracing::{debug, warn};

/// Default manifest file name inside a plugin directory.
pub const MANIFEST_FILE_NAME: &str = "plugin.toml";

/// Instance name used when a manifest declares none.
pub const DEFAULT_INSTANCE: &str = "default";

/// Launch arguments for one instance. `None` means "no arguments given".
pub type InstanceArgs = Option<Vec<String>>;

const KNOWN_KEYS: &[&str] = &[
    "NAME",
    "VERSION",
    "PLUGIN_ENTRY",
    "DESCRIPTION",
    "INSTANCES",
    "PLUGIN_ARGS",
    "REQUIRES",
    "METADATA",
    "ENVIRONMENT",
    "ICON_NAME",
    "DISPLAY_NAME",
    "LOG_LEVEL",
];

/// Normalized, fully defaulted plugin manifest.
///
/// Every name in `instances` has exactly one entry in `plugin_args`, and
/// `plugin_args` has no other keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginManifest {
    pub name: String,
    pub version: String,
    /// How to start the plugin process.
    pub entry_point: String,
    pub description: String,
    pub instances: Vec<String>,
    pub plugin_args: BTreeMap<String, InstanceArgs>,
    pub requires: BTreeSet<String>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub environment: BTreeMap<String, String>,
    pub icon_name: Option<String>,
    pub display_name: Option<String>,
    pub log_level: LogLevel,
}

impl PluginManifest {
    /// Launch arguments declared for `instance`, if any.
    pub fn args_for(&self, instance: &str) -> Option<&[String]> {
        self.plugin_args
            .get(instance)
            .and_then(|args| args.as_deref())
    }
}

/// The shapes `PLUGIN_ARGS` may take before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgsSpec {
    /// A table keyed by instance name.
    PerInstance(BTreeMap<String, InstanceArgs>),
    /// One flat list (or a scalar promoted to a one-element list).
    Shared(Vec<String>),
}

/// Resolve instance names and per-instance arguments into canonical form.
///
/// | instances | args          | result                                   |
/// |-----------|---------------|------------------------------------------|
/// | absent    | absent        | `["default"]`, `{default: None}`         |
/// | given     | absent        | every instance maps to `None`            |
/// | absent    | table         | instances are the table keys             |
/// | absent    | list / scalar | `["default"]` mapped to that list        |
/// | given     | table         | table used as-is, keyed by instance name |
/// | given     | list / scalar | the list is broadcast to every instance  |
///
/// An empty `INSTANCES` list or an empty args table counts as absent, since
/// neither can name an instance. An empty args list is a real value and is
/// passed on as `Some([])`. Duplicate instance names collapse
/// to their first occurrence. With both given, a declared instance missing
/// from the table maps to `None` and table keys for undeclared instances are
/// dropped.
pub fn resolve_instances(
    instances: Option<Vec<String>>,
    args: Option<ArgsSpec>,
) -> (Vec<String>, BTreeMap<String, InstanceArgs>) {
    let instances = instances.map(dedup).filter(|names| !names.is_empty());
    let args = args.filter(|spec| !matches!(spec, ArgsSpec::PerInstance(map) if map.is_empty()));

    match (instances, args) {
        (None, None) => single_default(None),
        (None, Some(ArgsSpec::Shared(list))) => single_default(Some(list)),
        (None, Some(ArgsSpec::PerInstance(map))) => (map.keys().cloned().collect(), map),
        (Some(names), None) => {
            let args = names.iter().map(|n| (n.clone(), None)).collect();
            (names, args)
        }
        (Some(names), Some(ArgsSpec::Shared(list))) => {
            let args = names
                .iter()
                .map(|n| (n.clone(), Some(list.clone())))
                .collect();
            (names, args)
        }
        (Some(names), Some(ArgsSpec::PerInstance(mut map))) => {
            let args = names
                .iter()
                .map(|n| (n.clone(), map.remove(n).flatten()))
                .collect();
            if !map.is_empty() {
                let extra: Vec<&String> = map.keys().collect();
                warn!(
                    instances = ?extra,
                    "PLUGIN_ARGS names instances that INSTANCES does not declare; ignoring them"
                );
            }
            (names, args)
        }
    }
}

fn single_default(args: InstanceArgs) -> (Vec<String>, BTreeMap<String, InstanceArgs>) {
    let name = DEFAULT_INSTANCE.to_string();
    (vec![name.clone()], BTreeMap::from([(name, args)]))
}

fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    names
        .into_iter()
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

/// Read and normalize the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<PluginManifest, HangarError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        HangarError::Configuration(format!("cannot read manifest {}: {e}", path.display()))
    })?;
    parse_manifest(&content).map_err(|e| annotate(e, path))
}

fn annotate(err: HangarError, path: &Path) -> HangarError {
    match err {
        HangarError::Configuration(msg) => {
            HangarError::Configuration(format!("{}: {msg}", path.display()))
        }
        HangarError::Validation(msg) => {
            HangarError::Validation(format!("{}: {msg}", path.display()))
        }
        other => other,
    }
}

/// Parse and normalize manifest content.
///
/// Missing required keys and unparsable content are configuration errors;
/// keys holding the wrong kind of value are validation errors.
pub fn parse_manifest(content: &str) -> Result<PluginManifest, HangarError> {
    let table: Table = content
        .parse()
        .map_err(|e| HangarError::Configuration(format!("invalid plugin manifest: {e}")))?;

    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            debug!(key = %key, "ignoring unrecognized manifest key");
        }
    }

    let name = required_string(&table, "NAME")?;
    let version = required_string(&table, "VERSION")?;
    let entry_point = required_string(&table, "PLUGIN_ENTRY")?;

    let (instances, plugin_args) =
        resolve_instances(string_list(&table, "INSTANCES")?, args_spec(&table)?);

    Ok(PluginManifest {
        name,
        version,
        entry_point,
        description: optional_string(&table, "DESCRIPTION")?.unwrap_or_default(),
        instances,
        plugin_args,
        requires: string_list(&table, "REQUIRES")?
            .unwrap_or_default()
            .into_iter()
            .collect(),
        metadata: metadata(&table)?,
        environment: environment(&table)?,
        icon_name: optional_string(&table, "ICON_NAME")?,
        display_name: optional_string(&table, "DISPLAY_NAME")?,
        log_level: match table.get("LOG_LEVEL") {
            Some(Value::String(level)) => LogLevel::from_name(level),
            _ => LogLevel::Info,
        },
    })
}

fn type_error(key: &str, expected: &str, found: &Value) -> HangarError {
    HangarError::Validation(format!(
        "{key} must be {expected}, found {}",
        found.type_str()
    ))
}

fn required_string(table: &Table, key: &str) -> Result<String, HangarError> {
    match optional_string(table, key)? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(HangarError::Configuration(format!(
            "required key {key} must not be empty"
        ))),
        None => Err(HangarError::Configuration(format!(
            "manifest is missing required key {key}"
        ))),
    }
}

fn optional_string(table: &Table, key: &str) -> Result<Option<String>, HangarError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(type_error(key, "a string", other)),
    }
}

fn string_list(table: &Table, key: &str) -> Result<Option<Vec<String>>, HangarError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(type_error(key, "a list of strings", other)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(type_error(key, "a list of strings", other)),
    }
}

/// String form of a scalar TOML value, or `None` for arrays and tables.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(d) => Some(d.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}

/// A flat argument list, or a scalar promoted to a one-element list.
fn flat_args(key: &str, value: &Value) -> Result<Vec<String>, HangarError> {
    if let Value::Array(items) = value {
        return items
            .iter()
            .map(|item| {
                scalar_to_string(item).ok_or_else(|| type_error(key, "a flat list of scalars", item))
            })
            .collect();
    }
    scalar_to_string(value)
        .map(|s| vec![s])
        .ok_or_else(|| type_error(key, "a list, a scalar, or a table of lists", value))
}

fn args_spec(table: &Table) -> Result<Option<ArgsSpec>, HangarError> {
    const KEY: &str = "PLUGIN_ARGS";
    match table.get(KEY) {
        None => Ok(None),
        Some(Value::Table(per_instance)) => per_instance
            .iter()
            .map(|(instance, value)| {
                let key = format!("{KEY}.{instance}");
                flat_args(&key, value).map(|args| (instance.clone(), Some(args)))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(|map| Some(ArgsSpec::PerInstance(map))),
        Some(value) => flat_args(KEY, value).map(|list| Some(ArgsSpec::Shared(list))),
    }
}

fn metadata(table: &Table) -> Result<serde_json::Map<String, serde_json::Value>, HangarError> {
    match table.get("METADATA") {
        None => Ok(serde_json::Map::new()),
        Some(value @ Value::Table(_)) => match serde_json::to_value(value) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(type_error("METADATA", "a table", value)),
            Err(e) => Err(HangarError::Validation(format!(
                "METADATA cannot be represented: {e}"
            ))),
        },
        Some(other) => Err(type_error("METADATA", "a table", other)),
    }
}

fn environment(table: &Table) -> Result<BTreeMap<String, String>, HangarError> {
    match table.get("ENVIRONMENT") {
        None => Ok(BTreeMap::new()),
        Some(Value::Table(vars)) => vars
            .iter()
            .map(|(name, value)| {
                scalar_to_string(value)
                    .map(|v| (name.clone(), v))
                    .ok_or_else(|| type_error(&format!("ENVIRONMENT.{name}"), "a scalar", value))
            })
            .collect(),
        Some(other) => Err(type_error("ENVIRONMENT", "a table of strings", other)),
    }
}
