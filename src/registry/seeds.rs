use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;

use crate::models::*;

/// Seed dataset compiled into the binary, used when no seed file is configured
pub const EMBEDDED_SEED: &str = include_str!("../../data/devices.json");

/// Load seed devices from a file, or from the embedded dataset when `path` is empty
pub async fn load(path: &str) -> Result<BTreeMap<i64, Device>> {
    if path.is_empty() {
        tracing::info!("Loading embedded seed dataset");
        return parse(EMBEDDED_SEED).context("Failed to parse embedded seed dataset");
    }

    tracing::info!("Loading seed dataset from {}", path);
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path))?;
    parse(&raw).with_context(|| format!("Failed to parse seed file {}", path))
}

/// Parse a JSON array of seed devices into an id-keyed map
pub fn parse(raw: &str) -> Result<BTreeMap<i64, Device>> {
    let seeds: Vec<SeedDevice> = serde_json::from_str(raw)?;
    if seeds.is_empty() {
        bail!("seed dataset is empty");
    }

    let mut devices = BTreeMap::new();
    for seed in seeds {
        let id = seed.id;
        if !(MIN_DEVICE_ID..=MAX_DEVICE_ID).contains(&id) {
            bail!("seed device id {} outside {}..={}", id, MIN_DEVICE_ID, MAX_DEVICE_ID);
        }
        if devices.insert(id, Device::from(seed)).is_some() {
            bail!("duplicate seed device id {}", id);
        }
    }

    Ok(devices)
}
