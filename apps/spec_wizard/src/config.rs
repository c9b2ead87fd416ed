use std::{path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use workflow_client::ClientOptions;

pub const DEFAULT_CONFIG_FILE: &str = "spec_wizard.toml";
const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub method_prefix: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub project_doctype: String,
    pub project_label_field: String,
    pub template_doctype: String,
    pub template_label_field: String,
    pub record_route: String,
}

impl Default for Settings {
    fn default() -> Self {
        let client = ClientOptions::default();
        Self {
            server_url: client.server_url,
            method_prefix: client.method_prefix,
            auth_token: None,
            request_timeout_secs: None,
            project_doctype: client.project_doctype,
            project_label_field: client.project_label_field,
            template_doctype: client.template_doctype,
            template_label_field: client.template_label_field,
            record_route: client.record_route,
        }
    }
}

impl Settings {
    pub fn into_client_options(self) -> ClientOptions {
        ClientOptions {
            server_url: self.server_url,
            method_prefix: self.method_prefix,
            auth_token: self.auth_token.filter(|token| !token.trim().is_empty()),
            request_timeout: self
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            project_doctype: self.project_doctype,
            project_label_field: self.project_label_field,
            template_doctype: self.template_doctype,
            template_label_field: self.template_label_field,
            record_route: self.record_route,
        }
    }
}

/// Defaults, then the TOML file, then `APP__*` environment variables.
///
/// An explicit `path` must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with_env(path, None)
}

pub(crate) fn load_settings_with_env(
    path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> anyhow::Result<Settings> {
    let file = match path {
        Some(path) => File::from(path).format(FileFormat::Toml).required(true),
        None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
    };

    let raw = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()
        .with_context(|| match path {
            Some(path) => format!("failed to read settings from '{}'", path.display()),
            None => "failed to read settings".to_string(),
        })?;

    raw.try_deserialize::<Settings>()
        .context("settings have an invalid shape")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
