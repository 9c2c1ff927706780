//! Built-in shape catalog and level tiers.
//!
//! Catalog order matters: tiers take a prefix of it, so the simplest shapes
//! come first.

use crate::{ShapeKind, Tier, TierTable, DEFAULT_GRID_SIZE};

const SHAPES: [(&str, &str, u8, &str, &str); 12] = [
    ("square", "Square", 4, "blue", "⬜"),
    ("rectangle", "Rectangle", 4, "green", "📱"),
    ("triangle", "Triangle", 3, "red", "🔺"),
    ("circle", "Circle", 0, "orange", "⭕"),
    ("pentagon", "Pentagon", 5, "purple", "⬟"),
    ("hexagon", "Hexagon", 6, "yellow", "⬢"),
    ("octagon", "Octagon", 8, "red", "🛑"),
    ("oval", "Oval", 0, "turquoise", "🥚"),
    ("diamond", "Diamond", 4, "pink", "◇"),
    ("star", "Star", 10, "yellow", "⭐"),
    ("trapezoid", "Trapezoid", 4, "green", "⏢"),
    ("parallelogram", "Parallelogram", 4, "blue", "▱"),
];

/// The twelve geometric shapes of the game.
pub fn geometric_shapes() -> Vec<ShapeKind> {
    SHAPES
        .iter()
        .map(|&(id, name, sides, color, emoji)| ShapeKind {
            id: id.to_string(),
            name: name.to_string(),
            sides,
            color: color.to_string(),
            emoji: emoji.to_string(),
        })
        .collect()
}

/// Levels 1-3: 25 moves, 100 points, 4 shapes.
/// Levels 4-6: 20 moves, 200 points, 6 shapes.
/// Level 7+: 15 moves, 300 points, whole catalog.
pub fn default_tier_table() -> TierTable {
    TierTable {
        tiers: vec![
            Tier {
                up_to_level: Some(3),
                moves_allowed: 25,
                target_score: 100,
                pool_size: Some(4),
            },
            Tier {
                up_to_level: Some(6),
                moves_allowed: 20,
                target_score: 200,
                pool_size: Some(6),
            },
            Tier {
                up_to_level: None,
                moves_allowed: 15,
                target_score: 300,
                pool_size: None,
            },
        ],
        grid_size: DEFAULT_GRID_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let shapes = geometric_shapes();
        let ids: HashSet<_> = shapes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), shapes.len());
    }

    #[test]
    fn test_default_tiers() {
        let table = default_tier_table();
        let catalog = geometric_shapes();

        let easy = table.config_for(1, &catalog).unwrap();
        assert_eq!((easy.moves_allowed, easy.target_score, easy.pool.len()), (25, 100, 4));

        let mid = table.config_for(4, &catalog).unwrap();
        assert_eq!((mid.moves_allowed, mid.target_score, mid.pool.len()), (20, 200, 6));

        let hard = table.config_for(7, &catalog).unwrap();
        assert_eq!((hard.moves_allowed, hard.target_score, hard.pool.len()), (15, 300, 12));
    }
}
