mod common;

use std::fs::{self, OpenOptions};
use std::time::{Duration, SystemTime};

use samguk_core::codec::{self, has_file_changed};
use samguk_core::edit::GeneralField;
use samguk_core::layout::{CITIES, GENERALS, ITEMS, LAYOUT_END, REALMS};
use samguk_core::{ErrorCode, SENTINEL, WorldState};

#[test]
fn load_populates_world_and_captures_mtime() {
    let path = common::write_temp_save("samguk_load", &common::sample_image());

    let mut world = WorldState::default();
    codec::load(&path, &mut world).expect("load");
    assert_eq!(world.generals.len(), 620);
    assert_eq!(world.items.len(), 72);
    assert_eq!(world.realms.len(), 54);
    assert_eq!(world.cities.len(), 54);
    assert_eq!(world.relations.len(), 620);
    assert_eq!(world.sentiments.len(), 54);
    assert_eq!(world.player().map(|g| g.name()), Some("劉備".to_string()));
    assert_eq!(world.player_gold, common::PLAYER_GOLD);
    assert_eq!(world.relations[1], 100);
    assert_eq!(world.cities[18].name, "Luoyang");
    assert_eq!(world.realm_name(0).as_deref(), Some("촉한"));
    assert!(world.mtime.is_some());
    assert!(!has_file_changed(&path, world.mtime));

    let _ = fs::remove_file(&path);
}

#[test]
fn gold_survives_save_and_reload() {
    let path = common::write_temp_save("samguk_gold", &common::sample_image());

    let mut world = WorldState::default();
    codec::load(&path, &mut world).expect("load");
    world.player_gold = 12_345;
    codec::save(&path, &world).expect("save");

    let mut reloaded = WorldState::default();
    codec::load(&path, &mut reloaded).expect("reload");
    assert_eq!(reloaded.player_gold, 12_345);

    let _ = fs::remove_file(&path);
}

#[test]
fn save_writes_record_edits_but_not_realms() {
    let path = common::write_temp_save("samguk_save", &common::sample_image());
    let before = fs::read(&path).expect("read");

    let mut world = WorldState::default();
    codec::load(&path, &mut world).expect("load");
    GeneralField::Loyalty
        .apply(&mut world.generals[1], 42)
        .expect("loyalty");
    world.cities[18].gold = 9_999;
    world.items[1].owner = 2;
    world.realms[0].ruler = SENTINEL;
    codec::save(&path, &world).expect("save");

    let after = fs::read(&path).expect("read");
    assert_eq!(after.len(), before.len());
    let realms = REALMS.base..REALMS.end();
    assert_eq!(after[realms.clone()], before[realms]);

    let mut reloaded = WorldState::default();
    codec::load(&path, &mut reloaded).expect("reload");
    assert_eq!(reloaded.generals[1].loyalty, 42);
    assert_eq!(reloaded.cities[18].gold, 9_999);
    assert_eq!(reloaded.item_owner(&reloaded.items[1]).map(|g| g.num), Some(2));
    assert_eq!(reloaded.realms[0].ruler, 0);

    let _ = fs::remove_file(&path);
}

#[test]
fn save_preserves_trailer_bytes() {
    let mut image = common::sample_image();
    image.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let path = common::write_temp_save("samguk_trailer", &image);

    let mut world = WorldState::default();
    codec::load(&path, &mut world).expect("load");
    world.player_gold = 7;
    codec::save(&path, &world).expect("save");

    let after = fs::read(&path).expect("read");
    assert_eq!(&after[LAYOUT_END..], &[0xDE, 0xAD, 0xBE, 0xEF]);

    let _ = fs::remove_file(&path);
}

#[test]
fn save_never_creates_a_file() {
    let path = common::temp_save_path("samguk_nocreate");
    let err = codec::save(&path, &common::sample_world()).expect_err("missing file");
    assert_eq!(err.code(), ErrorCode::FileNotFound);
    assert!(!path.exists());
}

#[test]
fn save_rejects_truncated_target() {
    let path = common::write_temp_save("samguk_short", &[0u8; 64]);
    let err = codec::save(&path, &common::sample_world()).expect_err("short file");
    assert_eq!(err.code(), ErrorCode::Parse);
    assert_eq!(fs::read(&path).expect("read"), vec![0u8; 64]);
    let _ = fs::remove_file(&path);
}

#[test]
fn has_file_changed_flips_after_rewrite() {
    let path = common::write_temp_save("samguk_mtime", &common::sample_image());
    let mut world = WorldState::default();
    codec::load(&path, &mut world).expect("load");
    assert!(!has_file_changed(&path, world.mtime));

    let file = OpenOptions::new().write(true).open(&path).expect("open");
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000))
        .expect("set mtime");
    drop(file);
    assert!(has_file_changed(&path, world.mtime));

    let _ = fs::remove_file(&path);
    assert!(has_file_changed(&path, world.mtime));
}

#[test]
fn selective_saves_touch_only_their_slot() {
    let path = common::write_temp_save("samguk_selective", &common::sample_image());
    let before = fs::read(&path).expect("read");

    let mut world = WorldState::default();
    codec::load(&path, &mut world).expect("load");
    world.generals[1].loyalty = 7;
    world.generals[2].loyalty = 55;
    world.items[1].owner = 2;
    world.cities[18].gold = 1;
    world.cities[35].gold = 2;

    codec::save_general(&path, &world, 1).expect("save general");
    codec::save_item(&path, &world, 1).expect("save item");
    codec::save_city(&path, &world, 18).expect("save city");

    let after = fs::read(&path).expect("read");
    assert_eq!(after.len(), before.len());
    let touched = [
        GENERALS.slot_range(1),
        ITEMS.slot_range(1),
        CITIES.slot_range(18),
    ];
    let changed: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
    assert!(!changed.is_empty());
    for i in changed {
        assert!(
            touched.iter().any(|r| r.contains(&i)),
            "byte {i:#x} changed outside the saved slots"
        );
    }

    let mut reloaded = WorldState::default();
    codec::load(&path, &mut reloaded).expect("reload");
    assert_eq!(reloaded.generals[1].loyalty, 7);
    assert_eq!(reloaded.generals[2].loyalty, 100);
    assert_eq!(reloaded.items[1].owner, 2);
    assert_eq!(reloaded.cities[18].gold, 1);
    assert_eq!(reloaded.cities[35].gold, 0);

    let err = codec::save_general(&path, &world, 620).expect_err("general slot");
    assert_eq!(err.code(), ErrorCode::SlotOutOfRange);
    let err = codec::save_item(&path, &world, 72).expect_err("item slot");
    assert_eq!(err.code(), ErrorCode::SlotOutOfRange);
    let err = codec::save_city(&path, &world, 54).expect_err("city slot");
    assert_eq!(err.code(), ErrorCode::SlotOutOfRange);
    assert_eq!(fs::read(&path).expect("read"), after);

    let _ = fs::remove_file(&path);
}
