// SPDX-FileCopyrightText: 2026 Hangar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runner descriptors: everything needed to start one plugin instance.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use hangar_core::{InstanceId, LogLevel, PersistedInstance, PersistedSystem, SystemId};
use serde::Serialize;

use crate::manifest::PluginManifest;

pub const ENV_PLUGIN_NAME: &str = "HANGAR_PLUGIN_NAME";
pub const ENV_PLUGIN_VERSION: &str = "HANGAR_PLUGIN_VERSION";
pub const ENV_INSTANCE_NAME: &str = "HANGAR_INSTANCE_NAME";
pub const ENV_SYSTEM_ID: &str = "HANGAR_SYSTEM_ID";
pub const ENV_INSTANCE_ID: &str = "HANGAR_INSTANCE_ID";
pub const ENV_LOG_LEVEL: &str = "HANGAR_LOG_LEVEL";

/// A launch recipe for one instance of one plugin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerDescriptor {
    pub plugin_name: String,
    pub version: String,
    pub instance_name: String,
    pub entry_point: String,
    pub plugin_dir: PathBuf,
    pub args: Option<Vec<String>>,
    pub environment: BTreeMap<String, String>,
    pub requires: BTreeSet<String>,
    pub log_level: LogLevel,
    pub system_id: SystemId,
    pub instance_id: InstanceId,
}

/// Registry key for a runner: `{name}[{instance}]-{version}`.
pub fn unique_name(plugin: &str, instance: &str, version: &str) -> String {
    format!("{plugin}[{instance}]-{version}")
}

impl RunnerDescriptor {
    pub fn new(
        manifest: &PluginManifest,
        plugin_dir: PathBuf,
        system: &PersistedSystem,
        instance: &PersistedInstance,
    ) -> Self {
        Self {
            plugin_name: manifest.name.clone(),
            version: manifest.version.clone(),
            instance_name: instance.name.clone(),
            entry_point: manifest.entry_point.clone(),
            plugin_dir,
            args: manifest.args_for(&instance.name).map(<[String]>::to_vec),
            environment: manifest.environment.clone(),
            requires: manifest.requires.clone(),
            log_level: manifest.log_level,
            system_id: system.id.clone(),
            instance_id: instance.id.clone(),
        }
    }

    pub fn unique_name(&self) -> String {
        unique_name(&self.plugin_name, &self.instance_name, &self.version)
    }

    /// Entry point followed by this instance's arguments.
    pub fn command_line(&self) -> Vec<String> {
        std::iter::once(self.entry_point.clone())
            .chain(self.args.iter().flatten().cloned())
            .collect()
    }

    /// Manifest environment overlaid with the identity variables.
    ///
    /// Identity variables always win over manifest keys of the same name.
    pub fn process_environment(&self) -> BTreeMap<String, String> {
        let mut env = self.environment.clone();
        env.extend([
            (ENV_PLUGIN_NAME.to_string(), self.plugin_name.clone()),
            (ENV_PLUGIN_VERSION.to_string(), self.version.clone()),
            (ENV_INSTANCE_NAME.to_string(), self.instance_name.clone()),
            (ENV_SYSTEM_ID.to_string(), self.system_id.to_string()),
            (ENV_INSTANCE_ID.to_string(), self.instance_id.to_string()),
            (ENV_LOG_LEVEL.to_string(), self.log_level.to_string()),
        ]);
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse_manifest;

    fn descriptor(extra: &str) -> RunnerDescriptor {
        let manifest = parse_manifest(&format!(
            "NAME = \"foo\"\nVERSION = \"1.0\"\nPLUGIN_ENTRY = \"run.sh\"\n{extra}"
        ))
        .unwrap();
        let mut system = PersistedSystem::new("foo", "1.0");
        let instance = PersistedInstance::new(manifest.instances[0].clone());
        system.instances.push(instance.clone());
        RunnerDescriptor::new(&manifest, PathBuf::from("/plugins/foo"), &system, &instance)
    }

    #[test]
    fn unique_name_format() {
        assert_eq!(unique_name("foo", "default", "1.0"), "foo[default]-1.0");
        assert_eq!(descriptor("").unique_name(), "foo[default]-1.0");
    }

    #[test]
    fn command_line_appends_instance_args() {
        assert_eq!(descriptor("").command_line(), vec!["run.sh"]);
        assert_eq!(
            descriptor(r#"PLUGIN_ARGS = ["--port", 8080]"#).command_line(),
            vec!["run.sh", "--port", "8080"]
        );
    }

    #[test]
    fn identity_variables_override_manifest_environment() {
        let runner = descriptor(
            r#"ENVIRONMENT = { HANGAR_PLUGIN_NAME = "spoofed", EXTRA = "1" }
LOG_LEVEL = "WARN""#,
        );
        let env = runner.process_environment();
        assert_eq!(env[ENV_PLUGIN_NAME], "foo");
        assert_eq!(env[ENV_PLUGIN_VERSION], "1.0");
        assert_eq!(env[ENV_INSTANCE_NAME], "default");
        assert_eq!(env[ENV_SYSTEM_ID], runner.system_id.to_string());
        assert_eq!(env[ENV_INSTANCE_ID], runner.instance_id.to_string());
        assert_eq!(env[ENV_LOG_LEVEL], "WARNING");
        assert_eq!(env["EXTRA"], "1");
    }
}
