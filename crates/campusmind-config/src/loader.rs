// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `/etc/campusmind/campusmind.toml`, then the XDG user config,
//! then `./campusmind.toml`, then `CAMPUSMIND_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CampusMindConfig;

/// Config file name searched in every location.
pub const CONFIG_FILE: &str = "campusmind.toml";

/// Sections recognized by the environment mapping.
const SECTIONS: &[&str] = &[
    "app", "server", "session", "gemini", "flows", "firebase", "mail", "booking",
];

/// Returns the config file locations in merge order (lowest precedence first).
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/campusmind").join(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("campusmind").join(CONFIG_FILE));
    }
    paths.push(PathBuf::from(CONFIG_FILE));
    paths
}

/// Builds the full layered figment (defaults, files, env).
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(CampusMindConfig::default()));
    for path in config_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<CampusMindConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CampusMindConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CampusMindConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CampusMindConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CampusMindConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Maps `CAMPUSMIND_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `CAMPUSMIND_SESSION_COOKIE_NAME` maps to `session.cookie_name`.
fn env_provider() -> Env {
    Env::prefixed("CAMPUSMIND_").map(|key| {
        let key = key.as_str();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key.to_string())
            .into()
    })
}
