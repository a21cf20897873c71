use samguk_core::city::CITY_SIZE;
use samguk_core::general::GENERAL_SIZE;
use samguk_core::item::ITEM_SIZE;
use samguk_core::realm::REALM_SIZE;
use samguk_core::schema;
use samguk_core::{City, General, Item, Realm, Record, SENTINEL, WorldState};
use samguk_render::{
    FieldSelection, JsonStyle, TextRenderOptions, render_json_full, render_json_selected,
    render_record_dump, render_text, render_text_with_options, selected_pairs,
};

fn general(num: usize, surname: &str, given: &str) -> General {
    let mut g = General::decode(num, &[0u8; GENERAL_SIZE]).expect("blank general");
    g.set_surname(surname).expect("surname");
    g.set_given_name(given).expect("given name");
    g.realm = 0;
    g.city = 1;
    g.item = SENTINEL;
    g.strength = 99;
    g.soldiers = 12_000;
    g
}

fn small_world() -> WorldState {
    let mut blank = General::decode(2, &[0u8; GENERAL_SIZE]).expect("blank general");
    blank.realm = SENTINEL;
    blank.city = SENTINEL;
    blank.item = SENTINEL;

    let mut generals = vec![general(0, "曹", "操"), general(1, "張", "遼"), blank];
    generals[0].item = 0;

    let mut sword = Item::decode(0, &[0u8; ITEM_SIZE]).expect("blank item");
    sword.set_name("의천검").expect("item name");
    sword.owner = 0;
    sword.price = 30;
    let mut spare = Item::decode(1, &[0u8; ITEM_SIZE]).expect("blank item");
    spare.owner = SENTINEL;

    let mut wei = Realm::decode(0, &[0u8; REALM_SIZE]).expect("blank realm");
    wei.set_name_fragment(0, "위").expect("realm name");
    wei.ruler = 0;
    wei.staff = 1;
    wei.capital = 1;
    let mut gone = Realm::decode(1, &[0u8; REALM_SIZE]).expect("blank realm");
    gone.ruler = SENTINEL;

    let mut cities: Vec<City> = (0..2)
        .map(|i| City::decode(i, &[0u8; CITY_SIZE]).expect("blank city"))
        .collect();
    cities[0].realm = SENTINEL;
    cities[1].realm = 0;
    cities[1].gold = 1_234_567;

    let mut world = WorldState {
        year: 196,
        month: 7,
        scene: 2,
        player_index: 0,
        player_gold: 2_500,
        generals,
        items: vec![sword, spare],
        realms: vec![wei, gone],
        cities,
        relations: vec![0, 80, 0],
        sentiments: vec![10, 90],
        ..WorldState::default()
    };
    world.set_player_name("曹操").expect("player name");
    world
}

fn keys(value: &serde_json::Value) -> Vec<&str> {
    value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn full_json_uses_canonical_top_level_order() {
    let value = render_json_full(&small_world(), JsonStyle::CanonicalV1);
    assert_eq!(
        keys(&value),
        vec![
            "year",
            "month",
            "scene",
            "cipher_variant",
            "player",
            "gold",
            "realms",
            "generals",
            "cities",
            "items",
        ]
    );
    assert_eq!(value["cipher_variant"], 1);
    assert_eq!(value["player"]["name"], "曹操");
}

#[test]
fn full_json_lists_only_named_generals_and_active_realms() {
    let value = render_json_full(&small_world(), JsonStyle::CanonicalV1);

    let generals = value["generals"].as_array().expect("generals array");
    assert_eq!(generals.len(), 2);
    assert_eq!(generals[1]["name"], "張遼");
    assert_eq!(generals[1]["realm_name"], "위");
    assert_eq!(generals[1]["relation"], 80);
    assert_eq!(generals[1]["item"], serde_json::Value::Null);
    assert_eq!(generals[0]["item"], 0);

    let realms = value["realms"].as_array().expect("realms array");
    assert_eq!(realms.len(), 1);
    assert_eq!(realms[0]["ruler_name"], "曹操");
    assert_eq!(realms[0]["city_count"], 1);
    assert_eq!(realms[0]["general_count"], 2);
}

#[test]
fn items_resolve_owner_and_scaled_price() {
    let value = render_json_full(&small_world(), JsonStyle::CanonicalV1);
    let items = value["items"].as_array().expect("items array");
    assert_eq!(items[0]["owner_name"], "曹操");
    assert_eq!(items[0]["price"], 3_000);
    assert_eq!(items[1]["owner"], serde_json::Value::Null);
}

#[test]
fn selected_json_uses_canonical_subset_order() {
    let fields = FieldSelection {
        gold: true,
        year: true,
        cities: true,
        ..FieldSelection::default()
    };
    let value = render_json_selected(&small_world(), &fields, JsonStyle::CanonicalV1);
    assert_eq!(keys(&value), vec!["year", "gold", "cities"]);
    assert_eq!(value["cities"][0]["realm"], serde_json::Value::Null);
    assert_eq!(value["cities"][1]["sentiment"], 90);
}

#[test]
fn selected_pairs_follow_field_order() {
    let fields = FieldSelection {
        player: true,
        month: true,
        realms: true,
        ..FieldSelection::default()
    };
    assert!(fields.is_any_selected());
    assert!(!FieldSelection::default().is_any_selected());

    let pairs = selected_pairs(&small_world(), &fields);
    assert_eq!(
        pairs,
        vec![
            ("month", "7".to_string()),
            ("player", "曹操".to_string()),
            ("realm", "0=위".to_string()),
        ]
    );
}

#[test]
fn text_sheet_has_sections_and_no_trailing_whitespace() {
    let text = render_text(&small_world());
    assert!(text.contains("SAMGUK SAVE SUMMARY"));
    assert!(text.contains("Year 196, Month 7"));
    assert!(text.contains("Gold: 2,500"));
    assert!(text.contains("Gold: 1,234,567"));
    for section in [" ::: Realms :::", " ::: Generals :::", " ::: Cities :::", " ::: Items :::"] {
        assert!(text.contains(section), "missing {section}");
    }
    for line in text.lines() {
        assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
    }
}

#[test]
fn verbose_text_includes_blank_slots() {
    let world = small_world();
    let terse = render_text(&world);
    let verbose = render_text_with_options(&world, TextRenderOptions { verbose: true });
    assert!(!terse.contains("(unowned)"));
    assert!(verbose.contains("(unowned)"));
    assert!(verbose.lines().count() > terse.lines().count());
}

#[test]
fn record_dump_keeps_schema_order() {
    let raw = small_world().cities[1].encode();
    let dump = schema::dump(&City::SCHEMA, &raw).expect("dump");
    let value = render_record_dump(&dump);
    let names = keys(&value);
    assert_eq!(names.first(), Some(&"gold"));
    assert_eq!(names.last(), Some(&"reserved"));
    assert_eq!(value["gold"], 1_234_567);
    assert_eq!(value["realm"], 0);
}
