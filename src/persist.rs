//! Loading and saving the config file.
//!
//! The file is plain indented JSON so operators can hand-edit it between
//! runs. Loading heals one class of legacy data: entities written before ids
//! existed get fresh ids backfilled before strict decoding. Everything else
//! non-conformant is rejected.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::model::{Config, new_id};
use crate::validation::validate_config;

/// Load the config tree, or the documented defaults when no file exists yet.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let mut value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("config file {} is not valid JSON", path.display()))?;

    backfill_ids(&mut value);

    let config: Config = serde_json::from_value(value)
        .with_context(|| format!("config file {} does not match the schema", path.display()))?;
    validate_config(&config)
        .with_context(|| format!("config file {} failed validation", path.display()))?;

    Ok(config)
}

/// Serialize the whole tree, pretty-printed, via a temp file renamed into
/// place so a crash mid-write never truncates the previous config.
pub fn save(path: &Path, config: &Config) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("failed to serialize config")?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .with_context(|| format!("failed to write temp config file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace config file {}", path.display()))?;

    Ok(())
}

/// Insert fresh ids for accounts, zones and subdomains written by versions
/// that predate entity ids.
fn backfill_ids(value: &mut Value) {
    let Some(accounts) = value.get_mut("cloudflare").and_then(Value::as_array_mut) else {
        return;
    };
    for account in accounts {
        ensure_id(account);
        let Some(zones) = account.get_mut("zones").and_then(Value::as_array_mut) else {
            continue;
        };
        for zone in zones {
            ensure_id(zone);
            let Some(subdomains) = zone.get_mut("subdomains").and_then(Value::as_array_mut) else {
                continue;
            };
            for subdomain in subdomains {
                ensure_id(subdomain);
            }
        }
    }
}

fn ensure_id(entity: &mut Value) {
    if let Some(obj) = entity.as_object_mut()
        && !obj.contains_key("id")
    {
        obj.insert("id".to_string(), Value::String(new_id()));
    }
}
