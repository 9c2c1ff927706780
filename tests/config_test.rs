use std::path::PathBuf;

use shape_match::config::{load_tiers, AppConfig};
use shape_match::core::Session;
use shape_match::core::SimpleRng;
use shape_match::types::geometric_shapes;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("shape-match-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn tier_table_loads_from_json() {
    let path = write_temp(
        "tiers.json",
        r#"{
            "grid_size": 6,
            "tiers": [
                { "up_to_level": 2, "moves_allowed": 12, "target_score": 60, "pool_size": 3 },
                { "up_to_level": null, "moves_allowed": 8, "target_score": 150, "pool_size": 5 }
            ]
        }"#,
    );

    let table = load_tiers(&path, geometric_shapes().len()).unwrap();
    assert_eq!(table.grid_size, 6);
    assert_eq!(table.tiers.len(), 2);

    let config = AppConfig::from_lookup(|key| match key {
        "SHAPE_MATCH_TIERS" => Some(path.display().to_string()),
        "SHAPE_MATCH_LEVEL" => Some("3".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.tiers, table);

    let session =
        Session::for_level(config.tiers, config.catalog, config.level, SimpleRng::new(1)).unwrap();
    assert_eq!(session.grid().size(), 6);
    assert_eq!(session.pool().len(), 5);
    assert_eq!(session.moves_remaining(), 8);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn invalid_tier_tables_are_rejected() {
    // Pool of two kinds.
    let small = write_temp(
        "small.json",
        r#"{"grid_size":8,"tiers":[{"up_to_level":null,"moves_allowed":5,"target_score":10,"pool_size":2}]}"#,
    );
    assert!(load_tiers(&small, 12).is_err());

    // Bounds out of order.
    let unordered = write_temp(
        "unordered.json",
        r#"{"grid_size":8,"tiers":[
            {"up_to_level":6,"moves_allowed":5,"target_score":10,"pool_size":4},
            {"up_to_level":3,"moves_allowed":5,"target_score":10,"pool_size":4},
            {"up_to_level":null,"moves_allowed":5,"target_score":10,"pool_size":4}
        ]}"#,
    );
    assert!(load_tiers(&unordered, 12).is_err());

    let garbage = write_temp("garbage.json", "not json");
    let err = load_tiers(&garbage, 12).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse tier table"));

    for path in [small, unordered, garbage] {
        std::fs::remove_file(path).unwrap();
    }
}
