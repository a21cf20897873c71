use std::fmt::Write as _;

use samguk_core::schema::FieldValue;
use samguk_core::{City, General, Item, Realm, SENTINEL, WorldState};
use serde_json::{Map as JsonMap, Value as JsonValue};

const NAME_WIDTH: usize = 12;
const REALM_WIDTH: usize = 12;
const CITY_WIDTH: usize = 11;
const ITEM_NAME_WIDTH: usize = 16;
const SHEET_WIDTH: usize = 76;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// List every slot, including unnamed generals and unowned items.
    pub verbose: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FieldSelection {
    pub year: bool,
    pub month: bool,
    pub scene: bool,
    pub player: bool,
    pub gold: bool,
    pub generals: bool,
    pub items: bool,
    pub realms: bool,
    pub cities: bool,
}

impl FieldSelection {
    pub fn is_any_selected(&self) -> bool {
        self.year
            || self.month
            || self.scene
            || self.player
            || self.gold
            || self.generals
            || self.items
            || self.realms
            || self.cities
    }
}

pub fn render_json_full(world: &WorldState, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(default_json(world)),
    }
}

pub fn render_json_selected(
    world: &WorldState,
    fields: &FieldSelection,
    style: JsonStyle,
) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(selected_json(fields, world)),
    }
}

/// `key=value` lines for the selected fields, in a fixed order.
pub fn selected_pairs(world: &WorldState, fields: &FieldSelection) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();

    if fields.year {
        out.push(("year", world.year.to_string()));
    }
    if fields.month {
        out.push(("month", world.month.to_string()));
    }
    if fields.scene {
        out.push(("scene", world.scene.to_string()));
    }
    if fields.player {
        out.push(("player", world.player_name()));
    }
    if fields.gold {
        out.push(("gold", world.player_gold.to_string()));
    }
    if fields.realms {
        for realm in world.active_realms() {
            out.push(("realm", format!("{}={}", realm.num, realm.name())));
        }
    }
    if fields.generals {
        for general in named_generals(world) {
            out.push(("general", format!("{}={}", general.num, general.name())));
        }
    }
    if fields.cities {
        for city in &world.cities {
            let owner = world
                .realm_name(city.realm)
                .unwrap_or_else(|| "-".to_string());
            out.push(("city", format!("{}={} ({})", city.num, city.name, owner)));
        }
    }
    if fields.items {
        for item in &world.items {
            out.push(("item", format!("{}={}", item.num, item.name())));
        }
    }

    out
}

pub fn render_text(world: &WorldState) -> String {
    render_text_with_options(world, TextRenderOptions::default())
}

pub fn render_text_with_options(world: &WorldState, options: TextRenderOptions) -> String {
    let mut out = String::new();
    writeln!(&mut out).expect("writing to String cannot fail");
    writeln!(
        &mut out,
        "{}",
        centered_no_trailing("SAMGUK SAVE SUMMARY", SHEET_WIDTH)
    )
    .expect("writing to String cannot fail");
    let date = format!(
        "Year {}, Month {}  (scene {}, cipher {})",
        world.year,
        world.month,
        world.scene,
        world.variant()
    );
    writeln!(&mut out, "{}", centered_no_trailing(&date, SHEET_WIDTH))
        .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    let player = format!(
        "  Player: {} (general {})",
        world.player_name(),
        world.player_index
    );
    writeln!(
        &mut out,
        "{:<38}Gold: {}",
        player,
        format_number_with_commas(i64::from(world.player_gold))
    )
    .expect("writing to String cannot fail");
    let realms = format!(
        "  Realms: {} active of {}",
        world.active_realms().count(),
        world.realms.len()
    );
    writeln!(
        &mut out,
        "{:<38}Generals: {} named of {}",
        realms,
        named_generals(world).count(),
        world.generals.len()
    )
    .expect("writing to String cannot fail");
    writeln!(&mut out).expect("writing to String cannot fail");

    write_realms_section(&mut out, world);
    writeln!(&mut out).expect("writing to String cannot fail");
    write_generals_section(&mut out, world, options);
    writeln!(&mut out).expect("writing to String cannot fail");
    write_cities_section(&mut out, world);
    writeln!(&mut out).expect("writing to String cannot fail");
    write_items_section(&mut out, world, options);

    out
}

/// Schema dump of one raw record as an ordered JSON object.
pub fn render_record_dump(fields: &[(&'static str, FieldValue)]) -> JsonValue {
    let mut out = JsonMap::new();
    for (name, value) in fields {
        let json = match value {
            FieldValue::U8(v) => JsonValue::from(*v),
            FieldValue::U16(v) => JsonValue::from(*v),
            FieldValue::U32(v) => JsonValue::from(*v),
            FieldValue::Bytes(_) => JsonValue::String(value.to_string()),
        };
        out.insert((*name).to_string(), json);
    }
    JsonValue::Object(out)
}

fn named_generals(world: &WorldState) -> impl Iterator<Item = &General> {
    world.generals.iter().filter(|g| !g.name().is_empty())
}

fn selected_json(fields: &FieldSelection, world: &WorldState) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();

    if fields.year {
        out.insert("year".to_string(), JsonValue::from(world.year));
    }
    if fields.month {
        out.insert("month".to_string(), JsonValue::from(world.month));
    }
    if fields.scene {
        out.insert("scene".to_string(), JsonValue::from(world.scene));
    }
    if fields.player {
        out.insert("player".to_string(), player_to_json(world));
    }
    if fields.gold {
        out.insert("gold".to_string(), JsonValue::from(world.player_gold));
    }
    if fields.realms {
        out.insert("realms".to_string(), realms_to_json(world));
    }
    if fields.generals {
        out.insert("generals".to_string(), generals_to_json(world));
    }
    if fields.cities {
        out.insert("cities".to_string(), cities_to_json(world));
    }
    if fields.items {
        out.insert("items".to_string(), items_to_json(world));
    }

    out
}

fn default_json(world: &WorldState) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();

    out.insert("year".to_string(), JsonValue::from(world.year));
    out.insert("month".to_string(), JsonValue::from(world.month));
    out.insert("scene".to_string(), JsonValue::from(world.scene));
    out.insert(
        "cipher_variant".to_string(),
        JsonValue::from(world.variant().get()),
    );
    out.insert("player".to_string(), player_to_json(world));
    out.insert("gold".to_string(), JsonValue::from(world.player_gold));
    out.insert("realms".to_string(), realms_to_json(world));
    out.insert("generals".to_string(), generals_to_json(world));
    out.insert("cities".to_string(), cities_to_json(world));
    out.insert("items".to_string(), items_to_json(world));

    out
}

fn id_json(id: u16) -> JsonValue {
    if id == SENTINEL {
        JsonValue::Null
    } else {
        JsonValue::from(id)
    }
}

fn player_to_json(world: &WorldState) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("index".to_string(), JsonValue::from(world.player_index));
    out.insert("name".to_string(), JsonValue::String(world.player_name()));
    JsonValue::Object(out)
}

fn realms_to_json(world: &WorldState) -> JsonValue {
    JsonValue::Array(world.active_realms().map(|r| realm_to_json(world, r)).collect())
}

fn realm_to_json(world: &WorldState, realm: &Realm) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("num".to_string(), JsonValue::from(realm.num));
    out.insert("name".to_string(), JsonValue::String(realm.name()));
    out.insert("ruler".to_string(), id_json(realm.ruler));
    out.insert(
        "ruler_name".to_string(),
        realm
            .ruler()
            .and_then(|n| world.general(n))
            .map(|g| JsonValue::String(g.name()))
            .unwrap_or(JsonValue::Null),
    );
    out.insert("staff".to_string(), id_json(realm.staff));
    out.insert("capital".to_string(), id_json(realm.capital));
    out.insert(
        "city_count".to_string(),
        JsonValue::from(world.cities_of_realm(realm.num).len()),
    );
    out.insert(
        "general_count".to_string(),
        JsonValue::from(world.generals_in_realm(realm.num).len()),
    );
    JsonValue::Object(out)
}

fn generals_to_json(world: &WorldState) -> JsonValue {
    JsonValue::Array(
        named_generals(world)
            .map(|g| general_to_json(world, g))
            .collect(),
    )
}

pub fn general_to_json(world: &WorldState, g: &General) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("num".to_string(), JsonValue::from(g.num));
    out.insert("name".to_string(), JsonValue::String(g.name()));
    out.insert("style_name".to_string(), JsonValue::String(g.style_name()));
    out.insert(
        "gender".to_string(),
        JsonValue::String(g.gender().to_string()),
    );
    out.insert("realm".to_string(), id_json(g.realm));
    out.insert(
        "realm_name".to_string(),
        world
            .realm_name(g.realm)
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null),
    );
    out.insert("city".to_string(), id_json(g.city));
    out.insert("rank".to_string(), JsonValue::String(g.rank_name().to_string()));
    out.insert("state".to_string(), JsonValue::String(g.state().to_string()));
    out.insert("strength".to_string(), JsonValue::from(g.strength));
    out.insert("intellect".to_string(), JsonValue::from(g.intellect));
    out.insert("politics".to_string(), JsonValue::from(g.politics));
    out.insert("charisma".to_string(), JsonValue::from(g.charisma));
    out.insert("loyalty".to_string(), JsonValue::from(g.loyalty));
    out.insert("soldiers".to_string(), JsonValue::from(g.soldiers));
    out.insert("training".to_string(), JsonValue::from(g.training));
    out.insert("ambition".to_string(), JsonValue::from(g.ambition()));
    out.insert("fidelity".to_string(), JsonValue::from(g.fidelity()));
    out.insert("job".to_string(), JsonValue::String(g.job_name().to_string()));
    out.insert(
        "troop_type".to_string(),
        JsonValue::String(g.troop_type_name().to_string()),
    );
    out.insert("item".to_string(), id_json(g.item));
    out.insert(
        "relation".to_string(),
        world
            .relations
            .get(g.num)
            .map(|v| JsonValue::from(*v))
            .unwrap_or(JsonValue::Null),
    );
    out.insert("skills".to_string(), names_to_json(&g.skill_names()));
    out.insert("equipment".to_string(), names_to_json(&g.equipment_names()));
    JsonValue::Object(out)
}

fn cities_to_json(world: &WorldState) -> JsonValue {
    JsonValue::Array(world.cities.iter().map(|c| city_to_json(world, c)).collect())
}

fn city_to_json(world: &WorldState, c: &City) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("num".to_string(), JsonValue::from(c.num));
    out.insert("name".to_string(), JsonValue::String(c.name.to_string()));
    out.insert("realm".to_string(), id_json(c.realm));
    out.insert("governor".to_string(), id_json(c.governor));
    out.insert("gold".to_string(), JsonValue::from(c.gold));
    out.insert("food".to_string(), JsonValue::from(c.food));
    out.insert("population".to_string(), JsonValue::from(c.population));
    out.insert("development".to_string(), JsonValue::from(c.development));
    out.insert(
        "development_max".to_string(),
        JsonValue::from(c.development_max),
    );
    out.insert("shop".to_string(), JsonValue::from(c.shop));
    out.insert("shop_max".to_string(), JsonValue::from(c.shop_max));
    out.insert("security".to_string(), JsonValue::from(c.security));
    out.insert("defense".to_string(), JsonValue::from(c.defense));
    out.insert("tech".to_string(), JsonValue::from(c.tech));
    out.insert(
        "sentiment".to_string(),
        world
            .sentiments
            .get(c.num)
            .map(|v| JsonValue::from(*v))
            .unwrap_or(JsonValue::Null),
    );
    JsonValue::Object(out)
}

fn items_to_json(world: &WorldState) -> JsonValue {
    JsonValue::Array(world.items.iter().map(|i| item_to_json(world, i)).collect())
}

fn item_to_json(world: &WorldState, item: &Item) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("num".to_string(), JsonValue::from(item.num));
    out.insert("name".to_string(), JsonValue::String(item.name()));
    out.insert(
        "type".to_string(),
        JsonValue::String(item.type_name().to_string()),
    );
    out.insert("owner".to_string(), id_json(item.owner));
    out.insert(
        "owner_name".to_string(),
        world
            .item_owner(item)
            .map(|g| JsonValue::String(g.name()))
            .unwrap_or(JsonValue::Null),
    );
    out.insert("market".to_string(), JsonValue::Bool(item.in_market()));
    out.insert("bonus".to_string(), JsonValue::from(item.bonus));
    out.insert("price".to_string(), JsonValue::from(item.price()));
    out.insert("properties".to_string(), names_to_json(&item.property_names()));
    JsonValue::Object(out)
}

fn names_to_json(names: &[&'static str]) -> JsonValue {
    JsonValue::Array(
        names
            .iter()
            .map(|n| JsonValue::String((*n).to_string()))
            .collect(),
    )
}

fn write_realms_section(out: &mut String, world: &WorldState) {
    writeln!(out, " ::: Realms :::").expect("writing to String cannot fail");
    for realm in world.active_realms() {
        let ruler = realm
            .ruler()
            .and_then(|n| world.general(n))
            .map(General::name)
            .unwrap_or_default();
        let line = format!(
            "  {:>2}  {:<rw$}  Ruler: {:<nw$}  Cities: {:>2}  Generals: {:>3}",
            realm.num,
            fit_column(&realm.name(), REALM_WIDTH),
            fit_column(&ruler, NAME_WIDTH),
            world.cities_of_realm(realm.num).len(),
            world.generals_in_realm(realm.num).len(),
            rw = REALM_WIDTH,
            nw = NAME_WIDTH,
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
}

fn write_generals_section(out: &mut String, world: &WorldState, options: TextRenderOptions) {
    writeln!(out, " ::: Generals :::").expect("writing to String cannot fail");
    writeln!(
        out,
        "  {:>3}  {:<nw$}  {:<rw$}  STR INT POL CHA  LOY  Soldiers",
        "#",
        "Name",
        "Realm",
        nw = NAME_WIDTH,
        rw = REALM_WIDTH,
    )
    .expect("writing to String cannot fail");
    for g in &world.generals {
        let name = g.name();
        if name.is_empty() && !options.verbose {
            continue;
        }
        let realm = world.realm_name(g.realm).unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  {:>3}  {:<nw$}  {:<rw$}  {:>3} {:>3} {:>3} {:>3}  {:>3}  {:>8}",
            g.num,
            fit_column(&name, NAME_WIDTH),
            fit_column(&realm, REALM_WIDTH),
            g.strength,
            g.intellect,
            g.politics,
            g.charisma,
            g.loyalty,
            format_number_with_commas(i64::from(g.soldiers)),
            nw = NAME_WIDTH,
            rw = REALM_WIDTH,
        )
        .expect("writing to String cannot fail");
    }
}

fn write_cities_section(out: &mut String, world: &WorldState) {
    writeln!(out, " ::: Cities :::").expect("writing to String cannot fail");
    for city in &world.cities {
        let realm = world.realm_name(city.realm).unwrap_or_else(|| "-".to_string());
        let line = format!(
            "  {:>2}  {:<cw$}  {:<rw$}  Gold: {:>9}  Food: {:>9}  Pop: {:>9}",
            city.num,
            fit_column(city.name, CITY_WIDTH),
            fit_column(&realm, REALM_WIDTH),
            format_number_with_commas(i64::from(city.gold)),
            format_number_with_commas(i64::from(city.food)),
            format_number_with_commas(i64::from(city.population)),
            cw = CITY_WIDTH,
            rw = REALM_WIDTH,
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
}

fn write_items_section(out: &mut String, world: &WorldState, options: TextRenderOptions) {
    writeln!(out, " ::: Items :::").expect("writing to String cannot fail");
    for item in &world.items {
        let owner = match world.item_owner(item) {
            Some(g) => g.name(),
            None if item.in_market() => "(market)".to_string(),
            None => {
                if !options.verbose {
                    continue;
                }
                "(unowned)".to_string()
            }
        };
        let line = format!(
            "  {:>2}  {:<iw$}  {:<9}  {:<nw$}  {:>7}",
            item.num,
            fit_column(&item.name(), ITEM_NAME_WIDTH),
            item.type_name(),
            fit_column(&owner, NAME_WIDTH),
            format_number_with_commas(i64::from(item.price())),
            iw = ITEM_NAME_WIDTH,
            nw = NAME_WIDTH,
        );
        writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 3 {
        return value.chars().take(width).collect();
    }

    let mut out = String::with_capacity(width);
    for ch in value.chars().take(width - 3) {
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn centered_no_trailing(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }

    let left_padding = (width - len) / 2;
    format!("{}{}", " ".repeat(left_padding), value)
}

fn format_number_with_commas(n: i64) -> String {
    if n < 0 {
        return format!("-{}", format_number_with_commas(-n));
    }
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(12_345), "12,345");
        assert_eq!(format_number_with_commas(4_000_000_000), "4,000,000,000");
        assert_eq!(format_number_with_commas(-1_000), "-1,000");
    }

    #[test]
    fn fit_column_truncates_by_chars() {
        assert_eq!(fit_column("촉한", 4), "촉한");
        assert_eq!(fit_column("Chang'an Province", 10), "Chang'a...");
    }
}
