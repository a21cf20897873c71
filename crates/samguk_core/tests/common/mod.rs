#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use samguk_core::city::CITY_SIZE;
use samguk_core::general::GENERAL_SIZE;
use samguk_core::item::ITEM_SIZE;
use samguk_core::layout::LAYOUT_END;
use samguk_core::realm::REALM_SIZE;
use samguk_core::tables::{CITY_COUNT, GENERAL_COUNT, ITEM_COUNT, REALM_COUNT};
use samguk_core::{City, General, Item, Realm, Record, SENTINEL, WorldState};

pub const PLAYER_GOLD: u16 = 1_000;

fn general(num: usize) -> General {
    let mut g = General::decode(num, &[0u8; GENERAL_SIZE]).expect("blank general");
    g.next = SENTINEL;
    g.realm = SENTINEL;
    g.city = SENTINEL;
    g.relation = SENTINEL;
    g.item = SENTINEL;
    g
}

fn named_general(num: usize, surname: &str, given: &str, realm: u16, city: u16) -> General {
    let mut g = general(num);
    g.set_surname(surname).expect("surname");
    g.set_given_name(given).expect("given name");
    g.realm = realm;
    g.city = city;
    g.strength = 70 + num as u8;
    g.loyalty = 100;
    g.soldiers = 3_000;
    g
}

/// A small but complete world: three sworn brothers in realm 0 at Luoyang,
/// one item held by the player and one on the market.
pub fn sample_world() -> WorldState {
    let mut generals: Vec<General> = (0..GENERAL_COUNT).map(general).collect();
    generals[0] = named_general(0, "劉", "備", 0, 18);
    generals[1] = named_general(1, "關", "羽", 0, 18);
    generals[2] = named_general(2, "張", "飛", 0, 35);
    generals[0].item = 0;

    let mut items: Vec<Item> = (0..ITEM_COUNT)
        .map(|i| {
            let mut item = Item::decode(i, &[0u8; ITEM_SIZE]).expect("blank item");
            item.owner = SENTINEL;
            item.next = SENTINEL;
            item
        })
        .collect();
    items[0].owner = 0;
    items[0].set_name("쌍고검").expect("item name");
    items[0].price = 50;
    items[1].set_name("적토마").expect("item name");
    items[1].market = 1;

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
    realms[0].staff = 1;
    realms[0].capital = 18;
    realms[0].set_name_fragment(0, "촉한").expect("realm name");

    let mut cities: Vec<City> = (0..CITY_COUNT)
        .map(|i| {
            let mut city = City::decode(i, &[0u8; CITY_SIZE]).expect("blank city");
            city.governor = SENTINEL;
            city.realm = SENTINEL;
            city.first_general = SENTINEL;
            city
        })
        .collect();
    cities[18].realm = 0;
    cities[18].governor = 0;
    cities[18].gold = 5_000;
    cities[18].population = 300_000;
    cities[35].realm = 0;

    let mut relations = vec![0u16; GENERAL_COUNT];
    relations[1] = 100;
    relations[2] = 100;

    let mut world = WorldState {
        year: 189,
        month: 3,
        scene: 5,
        player_index: 0,
        player_gold: PLAYER_GOLD,
        generals,
        items,
        realms,
        cities,
        relations,
        sentiments: vec![50; CITY_COUNT],
        ..WorldState::default()
    };
    world.set_player_name("劉備").expect("player name");
    world
}

pub fn image_of(world: &WorldState) -> Vec<u8> {
    let mut image = vec![0u8; LAYOUT_END];
    world.encode_into(&mut image).expect("encode sample world");
    image
}

pub fn sample_image() -> Vec<u8> {
    image_of(&sample_world())
}

pub fn temp_save_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.dat", std::process::id(), nanos))
}

pub fn write_temp_save(prefix: &str, bytes: &[u8]) -> PathBuf {
    let path = temp_save_path(prefix);
    fs::write(&path, bytes).expect("temp save should be writable");
    path
}
