//! Shared JSON fixtures for rig tests and benches.
//!
//! Files live under the workspace `fixtures/` directory and are looked up by
//! name through `fixtures/manifest.json`. Loaders are generic so this crate
//! does not depend on the rig crates it serves.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Result<Manifest, String>> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).map_err(|err| format!("fixtures manifest should parse: {err}"))
});

#[derive(Debug, Deserialize)]
struct Manifest {
    configs: BTreeMap<String, String>,
    scenarios: BTreeMap<String, ScenarioEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScenarioEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        config: Option<String>,
    },
}

impl ScenarioEntry {
    fn as_path(&self) -> &str {
        match self {
            ScenarioEntry::Path(path) => path,
            ScenarioEntry::Detailed { path, .. } => path,
        }
    }

    fn config(&self) -> Option<&str> {
        match self {
            ScenarioEntry::Path(_) => None,
            ScenarioEntry::Detailed { config, .. } => config.as_deref(),
        }
    }
}

fn manifest() -> Result<&'static Manifest> {
    match &*MANIFEST {
        Ok(manifest) => Ok(manifest),
        Err(err) => Err(anyhow!("{err}")),
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a BTreeMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Rig configuration presets.
pub mod configs {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(manifest()?.configs.keys().cloned().collect())
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&manifest()?.configs, "config", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&manifest()?.configs, "config", name)?;
        super::load_json(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&manifest()?.configs, "config", name)?;
        Ok(resolve_path(rel))
    }
}

/// Scripted tick sequences with expectations.
pub mod scenarios {
    use super::*;

    pub fn keys() -> Result<Vec<String>> {
        Ok(manifest()?.scenarios.keys().cloned().collect())
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&manifest()?.scenarios, "scenario", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&manifest()?.scenarios, "scenario", name)?;
        super::load_json(entry.as_path())
    }

    /// Name of the config preset a scenario runs against, if it names one.
    pub fn config_name(name: &str) -> Result<Option<String>> {
        let entry = lookup(&manifest()?.scenarios, "scenario", name)?;
        Ok(entry.config().map(str::to_owned))
    }

    /// Scenario document plus its config preset (defaults when none is named).
    pub fn load_with_config<S, C>(name: &str) -> Result<(S, C)>
    where
        S: DeserializeOwned,
        C: DeserializeOwned + Default,
    {
        let scenario = load(name)?;
        let config = match config_name(name)? {
            Some(cfg) => super::configs::load(&cfg)
                .with_context(|| format!("scenario '{name}' config '{cfg}'"))?,
            None => C::default(),
        };
        Ok((scenario, config))
    }
}
