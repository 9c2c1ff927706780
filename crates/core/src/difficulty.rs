//! Difficulty module - validation of session configs and tier tables
//!
//! Tier lookup itself is plain data ([`TierTable::tier_for`]); this module
//! holds the rules a table or config must satisfy before a session will use
//! it. Pools smaller than [`MIN_POOL_SIZE`] are rejected: with one or two
//! kinds the refill can line up runs forever.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::types::{
    DifficultyConfig, ShapeKind, TierTable, MAX_GRID_SIZE, MIN_GRID_SIZE, MIN_POOL_SIZE,
};

/// Most kinds a [`KindId`](crate::types::KindId) can address.
pub const MAX_POOL_SIZE: usize = u8::MAX as usize + 1;

fn check_grid_size(size: u8) -> Result<(), ConfigError> {
    if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(ConfigError::GridSize(size))
    }
}

/// Check a concrete session configuration.
pub fn validate_config(config: &DifficultyConfig) -> Result<(), ConfigError> {
    check_grid_size(config.grid_size)?;

    let size = config.pool.len();
    if size < MIN_POOL_SIZE {
        return Err(ConfigError::PoolTooSmall { size });
    }
    if size > MAX_POOL_SIZE {
        return Err(ConfigError::PoolTooLarge { size });
    }

    let mut seen = HashSet::with_capacity(size);
    for shape in &config.pool {
        if !seen.insert(shape.id.as_str()) {
            return Err(ConfigError::DuplicateShape(shape.id.clone()));
        }
    }
    Ok(())
}

/// Check a tier table against the catalog it will slice.
///
/// Bounds must strictly ascend, an open-ended tier may only come last, and
/// every tier must end up with at least [`MIN_POOL_SIZE`] kinds.
pub fn validate_tiers(table: &TierTable, catalog_len: usize) -> Result<(), ConfigError> {
    if table.tiers.is_empty() {
        return Err(ConfigError::EmptyTable);
    }
    check_grid_size(table.grid_size)?;

    let last = table.tiers.len() - 1;
    let mut previous: Option<u32> = None;
    for (index, tier) in table.tiers.iter().enumerate() {
        match tier.up_to_level {
            Some(bound) => {
                if let Some(prev) = previous {
                    if bound <= prev {
                        return Err(ConfigError::NotAscending {
                            index,
                            bound,
                            previous: prev,
                        });
                    }
                }
                previous = Some(bound);
            }
            None if index != last => return Err(ConfigError::OpenTierNotLast { index }),
            None => {}
        }

        let size = tier.pool_size.unwrap_or(catalog_len).min(catalog_len);
        if size < MIN_POOL_SIZE {
            return Err(ConfigError::TierPoolTooSmall { index, size });
        }
    }
    Ok(())
}

/// Validated configuration for `level`.
pub fn resolve_level(
    table: &TierTable,
    catalog: &[ShapeKind],
    level: u32,
) -> Result<DifficultyConfig, ConfigError> {
    validate_tiers(table, catalog.len())?;
    let config = table
        .config_for(level, catalog)
        .ok_or(ConfigError::EmptyTable)?;
    validate_config(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{default_tier_table, geometric_shapes, Tier, DEFAULT_GRID_SIZE};

    fn tier(up_to_level: Option<u32>, pool_size: Option<usize>) -> Tier {
        Tier {
            up_to_level,
            moves_allowed: 10,
            target_score: 100,
            pool_size,
        }
    }

    fn table(tiers: Vec<Tier>) -> TierTable {
        TierTable {
            tiers,
            grid_size: DEFAULT_GRID_SIZE,
        }
    }

    #[test]
    fn test_default_table_is_valid() {
        let catalog = geometric_shapes();
        assert_eq!(validate_tiers(&default_tier_table(), catalog.len()), Ok(()));
    }

    #[test]
    fn test_default_tiers_resolve() {
        let catalog = geometric_shapes();
        let t = default_tier_table();

        let cfg = resolve_level(&t, &catalog, 1).unwrap();
        assert_eq!((cfg.moves_allowed, cfg.target_score, cfg.pool.len()), (25, 100, 4));

        let cfg = resolve_level(&t, &catalog, 3).unwrap();
        assert_eq!(cfg.pool.len(), 4);

        let cfg = resolve_level(&t, &catalog, 4).unwrap();
        assert_eq!((cfg.moves_allowed, cfg.target_score, cfg.pool.len()), (20, 200, 6));

        let cfg = resolve_level(&t, &catalog, 7).unwrap();
        assert_eq!((cfg.moves_allowed, cfg.target_score), (15, 300));
        assert_eq!(cfg.pool.len(), catalog.len());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(validate_tiers(&table(vec![]), 12), Err(ConfigError::EmptyTable));
    }

    #[test]
    fn test_bounds_must_ascend() {
        let t = table(vec![tier(Some(5), Some(3)), tier(Some(5), Some(4))]);
        assert_eq!(
            validate_tiers(&t, 12),
            Err(ConfigError::NotAscending {
                index: 1,
                bound: 5,
                previous: 5
            })
        );
    }

    #[test]
    fn test_open_tier_must_be_last() {
        let t = table(vec![tier(None, Some(3)), tier(Some(9), Some(4))]);
        assert_eq!(
            validate_tiers(&t, 12),
            Err(ConfigError::OpenTierNotLast { index: 0 })
        );
    }

    #[test]
    fn test_small_tier_pool_rejected() {
        let t = table(vec![tier(Some(2), Some(2)), tier(None, None)]);
        assert_eq!(
            validate_tiers(&t, 12),
            Err(ConfigError::TierPoolTooSmall { index: 0, size: 2 })
        );

        // A short catalog caps every tier.
        let t = table(vec![tier(None, None)]);
        assert_eq!(
            validate_tiers(&t, 2),
            Err(ConfigError::TierPoolTooSmall { index: 0, size: 2 })
        );
    }

    #[test]
    fn test_bad_grid_size_rejected() {
        let mut t = default_tier_table();
        t.grid_size = 2;
        assert_eq!(validate_tiers(&t, 12), Err(ConfigError::GridSize(2)));
    }

    #[test]
    fn test_config_validation() {
        let catalog = geometric_shapes();
        let mut cfg = DifficultyConfig {
            moves_allowed: 5,
            target_score: 50,
            pool: catalog[..3].to_vec(),
            grid_size: 8,
        };
        assert_eq!(validate_config(&cfg), Ok(()));

        cfg.pool.truncate(2);
        assert_eq!(validate_config(&cfg), Err(ConfigError::PoolTooSmall { size: 2 }));

        cfg.pool = vec![catalog[0].clone(), catalog[1].clone(), catalog[0].clone()];
        assert_eq!(
            validate_config(&cfg),
            Err(ConfigError::DuplicateShape(catalog[0].id.clone()))
        );

        cfg.pool = catalog[..3].to_vec();
        cfg.grid_size = 17;
        assert_eq!(validate_config(&cfg), Err(ConfigError::GridSize(17)));
    }
}
