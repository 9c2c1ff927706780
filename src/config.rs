//! Runtime configuration from environment variables.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::validate_tiers;
use crate::types::{default_tier_table, geometric_shapes, ShapeKind, TierTable};

/// Session settings for the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// External level the first session starts at.
    pub level: u32,
    /// Seed for the deterministic LCG; `None` draws from OS entropy.
    pub seed: Option<u32>,
    pub tiers: TierTable,
    pub catalog: Vec<ShapeKind>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            level: 1,
            seed: None,
            tiers: default_tier_table(),
            catalog: geometric_shapes(),
        }
    }
}

impl AppConfig {
    /// Create from environment variables
    ///
    /// - `SHAPE_MATCH_LEVEL`: start level (default 1)
    /// - `SHAPE_MATCH_SEED`: u32 seed
    /// - `SHAPE_MATCH_TIERS`: path to a JSON tier table
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(level) = lookup("SHAPE_MATCH_LEVEL") {
            config.level = level
                .trim()
                .parse()
                .with_context(|| format!("SHAPE_MATCH_LEVEL is not a level number: {level:?}"))?;
            anyhow::ensure!(config.level >= 1, "SHAPE_MATCH_LEVEL starts at 1");
        }

        if let Some(seed) = lookup("SHAPE_MATCH_SEED") {
            config.seed = Some(
                seed.trim()
                    .parse()
                    .with_context(|| format!("SHAPE_MATCH_SEED is not a u32: {seed:?}"))?,
            );
        }

        if let Some(path) = lookup("SHAPE_MATCH_TIERS") {
            config.tiers = load_tiers(Path::new(&path), config.catalog.len())?;
        }

        Ok(config)
    }
}

/// Read and validate a JSON tier table.
pub fn load_tiers(path: &Path, catalog_len: usize) -> Result<TierTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tier table {}", path.display()))?;
    let table: TierTable = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse tier table {}", path.display()))?;
    validate_tiers(&table, catalog_len)
        .with_context(|| format!("invalid tier table {}", path.display()))?;
    Ok(table)
}
