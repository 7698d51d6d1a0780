// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder for on-disk plugin directories.

use std::io;
use std::path::{Path, PathBuf};

use hangar_plugin::MANIFEST_FILE_NAME;
use toml::{Table, Value};

/// Writes `<root>/<dir>/plugin.toml` from typed setters.
///
/// Starts with `NAME` set to the directory name, `VERSION = "1.0"`, and
/// `PLUGIN_ENTRY = "run.sh"`. Any key can be overridden or removed.
#[derive(Debug, Clone)]
pub struct PluginDirBuilder {
    dir: PathBuf,
    manifest_file: String,
    table: Table,
    raw: Option<String>,
}

fn strings(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| Value::String(s.to_string())).collect())
}

impl PluginDirBuilder {
    pub fn new(root: &Path, dir: &str) -> Self {
        let mut table = Table::new();
        table.insert("NAME".into(), Value::String(dir.to_string()));
        table.insert("VERSION".into(), Value::String("1.0".into()));
        table.insert("PLUGIN_ENTRY".into(), Value::String("run.sh".into()));
        Self {
            dir: root.join(dir),
            manifest_file: MANIFEST_FILE_NAME.to_string(),
            table,
            raw: None,
        }
    }

    pub fn name(self, name: &str) -> Self {
        self.set("NAME", Value::String(name.into()))
    }

    pub fn version(self, version: &str) -> Self {
        self.set("VERSION", Value::String(version.into()))
    }

    pub fn instances(self, instances: &[&str]) -> Self {
        self.set("INSTANCES", strings(instances))
    }

    /// Flat `PLUGIN_ARGS` list shared by every instance.
    pub fn args(self, args: &[&str]) -> Self {
        self.set("PLUGIN_ARGS", strings(args))
    }

    /// Per-instance `PLUGIN_ARGS` table.
    pub fn instance_args(self, per_instance: &[(&str, &[&str])]) -> Self {
        let table: Table = per_instance
            .iter()
            .map(|(instance, args)| (instance.to_string(), strings(args)))
            .collect();
        self.set("PLUGIN_ARGS", Value::Table(table))
    }

    pub fn requires(self, requires: &[&str]) -> Self {
        self.set("REQUIRES", strings(requires))
    }

    pub fn set(mut self, key: &str, value: Value) -> Self {
        self.table.insert(key.to_string(), value);
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.table.remove(key);
        self
    }

    /// Write this content verbatim instead of the built table.
    pub fn raw(mut self, content: &str) -> Self {
        self.raw = Some(content.to_string());
        self
    }

    pub fn manifest_file(mut self, name: &str) -> Self {
        self.manifest_file = name.to_string();
        self
    }

    /// Create the directory and write the manifest, replacing any previous one.
    pub fn write(self) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let content = match self.raw {
            Some(raw) => raw,
            None => toml::to_string(&self.table).map_err(io::Error::other)?,
        };
        std::fs::write(self.dir.join(&self.manifest_file), content)?;
        Ok(self.dir)
    }
}
