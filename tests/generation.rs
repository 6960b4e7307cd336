use proptest::prelude::*;

use gloomtrail::config::MapConfig;
use gloomtrail::error::{ConfigError, MapGenError};
use gloomtrail::grid::Tile;
use gloomtrail::pathing::{is_reachable, REACH_EXPANSION_CAP};
use gloomtrail::{generate_map, place_entity};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn single_room_map_keeps_spawn_and_exit_in_room() {
    let config = MapConfig {
        room_min: 4,
        room_max: 4,
        max_rooms: 1,
        ..MapConfig::default()
    }
    .with_seed(1);
    let map = generate_map(10, 10, &config).unwrap();

    assert_eq!(map.rooms.len(), 1);
    let room = map.rooms[0];
    assert!(room.contains(map.spawn), "spawn {} outside {room:?}", map.spawn);
    assert!(room.contains(map.exit), "exit {} outside {room:?}", map.exit);
    assert_eq!(map.grid.get(map.exit), Some(Tile::Exit));
    assert!(is_reachable(&map.grid, map.spawn, map.exit, REACH_EXPANSION_CAP));
}

#[test]
fn default_map_has_one_exit() {
    let map = generate_map(80, 40, &MapConfig::default().with_seed(2024)).unwrap();
    assert_eq!(map.grid.count(Tile::Exit), 1);
    assert_eq!(map.grid.get(map.exit), Some(Tile::Exit));
    assert!(map.grid.is_floor(map.spawn));
    assert!(!map.rooms.is_empty());
}

#[test]
fn tiny_or_inverted_configs_are_rejected() {
    let err = generate_map(9, 30, &MapConfig::default().with_seed(1)).unwrap_err();
    assert!(matches!(
        err,
        MapGenError::Config(ConfigError::MapTooSmall { width: 9, .. })
    ));

    let inverted = MapConfig {
        room_min: 8,
        room_max: 3,
        ..MapConfig::default()
    };
    assert!(matches!(
        generate_map(40, 40, &inverted),
        Err(MapGenError::Config(ConfigError::RoomBounds { min: 8, max: 3 }))
    ));
}

#[test]
fn rooms_too_big_for_the_map_fall_back_to_corner_spawn() {
    let config = MapConfig {
        room_min: 20,
        room_max: 20,
        ..MapConfig::default()
    }
    .with_seed(5);
    let map = generate_map(12, 12, &config).unwrap();
    assert!(map.rooms.is_empty());
    assert_eq!(map.spawn, gloomtrail::mapgen::FALLBACK_SPAWN);
    assert!(is_reachable(&map.grid, map.spawn, map.exit, REACH_EXPANSION_CAP));
}

#[test]
fn entity_lands_on_free_floor() {
    let map = generate_map(50, 30, &MapConfig::default().with_seed(9)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..20 {
        let pos = place_entity(&map.grid, &[map.spawn], &mut rng).unwrap();
        assert_ne!(pos, map.spawn);
        assert!(map.grid.is_floor(pos));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exit_is_always_reachable(seed in any::<u64>(), width in 10_usize..70, height in 10_usize..45) {
        let map = generate_map(width, height, &MapConfig::default().with_seed(seed)).unwrap();
        prop_assert!(
            is_reachable(&map.grid, map.spawn, map.exit, REACH_EXPANSION_CAP),
            "seed={seed}, size={width}x{height}: exit {} unreachable from {}",
            map.exit,
            map.spawn
        );
        prop_assert_eq!(map.grid.get(map.exit), Some(Tile::Exit));
    }

    #[test]
    fn same_seed_same_map(seed in any::<u64>(), width in 10_usize..50, height in 10_usize..30) {
        let config = MapConfig::default().with_seed(seed);
        let a = generate_map(width, height, &config).unwrap();
        let b = generate_map(width, height, &config).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn rooms_keep_their_distance(seed in any::<u64>()) {
        let map = generate_map(80, 40, &MapConfig::default().with_seed(seed)).unwrap();
        for (i, a) in map.rooms.iter().enumerate() {
            prop_assert!(a.x >= 1 && a.y >= 1);
            prop_assert!(a.x + a.width < 80 && a.y + a.height < 40);
            for b in &map.rooms[i + 1..] {
                prop_assert!(!a.intersects(b, 1), "{a:?} and {b:?} overlap");
            }
        }
        prop_assert!(map.rooms.first().map_or(true, |r| r.contains(map.spawn)));
    }
}
