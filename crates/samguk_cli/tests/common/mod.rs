#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use samguk_core::city::CITY_SIZE;
use samguk_core::general::GENERAL_SIZE;
use samguk_core::item::ITEM_SIZE;
use samguk_core::layout::LAYOUT_END;
use samguk_core::realm::REALM_SIZE;
use samguk_core::tables::{CITY_COUNT, GENERAL_COUNT, ITEM_COUNT, REALM_COUNT};
use samguk_core::{City, General, Item, Realm, Record, SENTINEL, WorldState};

pub fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_samguk-se"))
        .args(args)
        .output()
        .expect("failed to run samguk-se CLI")
}

pub fn temp_output_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.dat", std::process::id(), nanos))
}

fn blank_general(num: usize) -> General {
    let mut g = General::decode(num, &[0u8; GENERAL_SIZE]).expect("blank general");
    g.next = SENTINEL;
    g.realm = SENTINEL;
    g.city = SENTINEL;
    g.relation = SENTINEL;
    g.item = SENTINEL;
    g
}

/// Sun Jian's realm holding Changsha, with one sword in the market.
pub fn sample_world() -> WorldState {
    let mut generals: Vec<General> = (0..GENERAL_COUNT).map(blank_general).collect();
    generals[0].set_surname("孫").expect("surname");
    generals[0].set_given_name("堅").expect("given name");
    generals[0].realm = 0;
    generals[0].city = 39;
    generals[0].loyalty = 100;
    generals[0].strength = 88;
    generals[1].set_surname("黃").expect("surname");
    generals[1].set_given_name("蓋").expect("given name");
    generals[1].realm = 0;
    generals[1].city = 39;
    generals[1].loyalty = 90;

    let mut items: Vec<Item> = (0..ITEM_COUNT)
        .map(|i| {
            let mut item = Item::decode(i, &[0u8; ITEM_SIZE]).expect("blank item");
            item.owner = SENTINEL;
            item.next = SENTINEL;
            item
        })
        .collect();
    items[0].set_name("고정도").expect("item name");
    items[0].market = 1;
    items[0].price = 20;

    let mut realms: Vec<Realm> = (0..REALM_COUNT)
        .map(|i| {
            let mut realm = Realm::decode(i, &[0u8; REALM_SIZE]).expect("blank realm");
            realm.ruler = SENTINEL;
            realm.staff = SENTINEL;
            realm.capital = SENTINEL;
            realm
        })
        .collect();
    realms[0].ruler = 0;
    realms[0].capital = 39;
    realms[0].set_name_fragment(0, "오").expect("realm name");

    let mut cities: Vec<City> = (0..CITY_COUNT)
        .map(|i| {
            let mut city = City::decode(i, &[0u8; CITY_SIZE]).expect("blank city");
            city.governor = SENTINEL;
            city.realm = SENTINEL;
            city.first_general = SENTINEL;
            city
        })
        .collect();
    cities[39].realm = 0;
    cities[39].governor = 0;
    cities[39].gold = 3_000;

    let mut world = WorldState {
        year: 190,
        month: 1,
        scene: 1,
        player_index: 0,
        player_gold: 800,
        generals,
        items,
        realms,
        cities,
        relations: vec![0; GENERAL_COUNT],
        sentiments: vec![0; CITY_COUNT],
        ..WorldState::default()
    };
    world.set_player_name("孫堅").expect("player name");
    world
}

pub fn sample_image() -> Vec<u8> {
    let mut image = vec![0u8; LAYOUT_END];
    sample_world()
        .encode_into(&mut image)
        .expect("encode sample world");
    image
}

pub fn write_sample_save(prefix: &str) -> PathBuf {
    let path = temp_output_path(prefix);
    fs::write(&path, sample_image()).expect("temp save should be writable");
    path
}
