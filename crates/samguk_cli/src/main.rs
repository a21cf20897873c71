use std::collections::BTreeSet;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use std::time::SystemTime;

use clap::{Parser, Subcommand, ValueEnum};
use samguk_core::codec::{self, parse_world};
use samguk_core::edit::{CityField, GeneralField, ItemField, gold_from};
use samguk_core::layout::{self, RecordArray, SaveLayout};
use samguk_core::schema::{self, RecordSchema};
use samguk_core::{City, General, Item, Realm, Record, SaveError, SceneVariant, WorldState, cipher};
use samguk_render::{
    FieldSelection, JsonStyle, TextRenderOptions, render_json_full, render_json_selected,
    render_record_dump, render_text_with_options, selected_pairs,
};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "SAMGUK_LOG";

#[derive(Debug, Parser)]
#[command(author, version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[arg(value_name = "SAVE")]
    path: Option<PathBuf>,
    #[arg(long)]
    year: bool,
    #[arg(long)]
    month: bool,
    #[arg(long)]
    scene: bool,
    #[arg(long)]
    player: bool,
    #[arg(long)]
    gold: bool,
    #[arg(long)]
    generals: bool,
    #[arg(long)]
    items: bool,
    #[arg(long)]
    realms: bool,
    #[arg(long)]
    cities: bool,
    #[arg(long)]
    json: bool,
    /// Include blank general slots and unowned items in the summary.
    #[arg(long)]
    verbose: bool,
    #[arg(
        long = "set-general",
        value_name = "NUM:FIELD=VALUE",
        value_parser = parse_record_edit::<GeneralField>
    )]
    set_general: Vec<RecordEdit<GeneralField>>,
    #[arg(
        long = "set-item",
        value_name = "NUM:FIELD=VALUE",
        value_parser = parse_record_edit::<ItemField>
    )]
    set_item: Vec<RecordEdit<ItemField>>,
    #[arg(
        long = "set-city",
        value_name = "NUM:FIELD=VALUE",
        value_parser = parse_record_edit::<CityField>
    )]
    set_city: Vec<RecordEdit<CityField>>,
    #[arg(long = "set-gold", allow_hyphen_values = true)]
    set_gold: Option<i64>,
    #[arg(long, conflicts_with = "in_place")]
    output: Option<PathBuf>,
    #[arg(long = "in-place")]
    in_place: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inspect the raw save image.
    Debug {
        #[command(subcommand)]
        command: DebugCommand,
    },
}

#[derive(Debug, Subcommand)]
enum DebugCommand {
    /// Print the section map of a save file.
    Layout {
        #[arg(long)]
        json: bool,
        path: PathBuf,
    },
    /// Decrypt one record slot and dump its fields.
    Record {
        #[arg(long, value_enum)]
        kind: RecordKind,
        #[arg(long)]
        index: usize,
        #[arg(long)]
        json: bool,
        path: PathBuf,
    },
    /// Check the layout and parse the whole file.
    Validate {
        #[arg(long)]
        json: bool,
        path: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RecordKind {
    General,
    Item,
    Realm,
    City,
}

impl RecordKind {
    fn table(self) -> (RecordArray, RecordSchema) {
        match self {
            Self::General => (layout::GENERALS, General::SCHEMA),
            Self::Item => (layout::ITEMS, Item::SCHEMA),
            Self::Realm => (layout::REALMS, Realm::SCHEMA),
            Self::City => (layout::CITIES, City::SCHEMA),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RecordEdit<F> {
    slot: usize,
    field: F,
    value: i64,
}

fn parse_record_edit<F>(raw: &str) -> Result<RecordEdit<F>, String>
where
    F: FromStr<Err = SaveError>,
{
    let malformed = || format!("expected NUM:FIELD=VALUE, got {raw:?}");
    let (slot, rest) = raw.split_once(':').ok_or_else(malformed)?;
    let (field, value) = rest.split_once('=').ok_or_else(malformed)?;

    let slot = slot
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid slot {slot:?}: {e}"))?;
    let field = field.trim().parse::<F>().map_err(|e| e.to_string())?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid value {value:?}: {e}"))?;

    Ok(RecordEdit { slot, field, value })
}

#[derive(Debug, Default)]
struct Edits {
    generals: Vec<RecordEdit<GeneralField>>,
    items: Vec<RecordEdit<ItemField>>,
    cities: Vec<RecordEdit<CityField>>,
    gold: Option<i64>,
}

impl Edits {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            generals: cli.set_general.clone(),
            items: cli.set_item.clone(),
            cities: cli.set_city.clone(),
            gold: cli.set_gold,
        }
    }

    fn is_empty(&self) -> bool {
        self.generals.is_empty()
            && self.items.is_empty()
            && self.cities.is_empty()
            && self.gold.is_none()
    }

    fn apply(&self, world: &mut WorldState) -> samguk_core::Result<()> {
        for edit in &self.generals {
            let count = world.generals.len();
            let general = world
                .general_mut(edit.slot)
                .ok_or_else(|| slot_error("general", edit.slot, count))?;
            edit.field.apply(general, edit.value)?;
            debug!(slot = edit.slot, field = %edit.field, value = edit.value, "general edited");
        }
        for edit in &self.items {
            let count = world.items.len();
            let item = world
                .item_mut(edit.slot)
                .ok_or_else(|| slot_error("item", edit.slot, count))?;
            edit.field.apply(item, edit.value)?;
            debug!(slot = edit.slot, field = %edit.field, value = edit.value, "item edited");
        }
        for edit in &self.cities {
            let count = world.cities.len();
            let city = world
                .city_mut(edit.slot)
                .ok_or_else(|| slot_error("city", edit.slot, count))?;
            edit.field.apply(city, edit.value)?;
            debug!(slot = edit.slot, field = %edit.field, value = edit.value, "city edited");
        }
        if let Some(gold) = self.gold {
            world.player_gold = gold_from(gold)?;
        }
        Ok(())
    }

    /// Writes the edits back into the source file. Record-only edits go
    /// through the checked per-record saves; a gold edit rewrites every
    /// persisted record.
    fn save_in_place(&self, path: &Path, world: &WorldState) -> samguk_core::Result<()> {
        if self.gold.is_some() {
            return codec::save(path, world);
        }
        for slot in unique_slots(&self.generals) {
            codec::save_general(path, world, slot)?;
        }
        for slot in unique_slots(&self.items) {
            codec::save_item(path, world, slot)?;
        }
        for slot in unique_slots(&self.cities) {
            codec::save_city(path, world, slot)?;
        }
        Ok(())
    }
}

fn unique_slots<F>(edits: &[RecordEdit<F>]) -> BTreeSet<usize> {
    edits.iter().map(|e| e.slot).collect()
}

fn slot_error(kind: &'static str, slot: usize, count: usize) -> SaveError {
    SaveError::SlotOutOfRange { kind, slot, count }
}

fn field_selection(cli: &Cli) -> FieldSelection {
    FieldSelection {
        year: cli.year,
        month: cli.month,
        scene: cli.scene,
        player: cli.player,
        gold: cli.gold,
        generals: cli.generals,
        items: cli.items,
        realms: cli.realms,
        cities: cli.cities,
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Some(Command::Debug { command }) = &cli.command {
        run_debug(command);
        return;
    }

    let Some(path) = cli.path.clone() else {
        eprintln!("a save file path is required");
        process::exit(2);
    };
    let fields = field_selection(&cli);
    let edits = Edits::from_cli(&cli);
    let writes = cli.output.is_some() || cli.in_place;

    if !edits.is_empty() && !writes {
        eprintln!("--set-* flags require --output <PATH> or --in-place");
        process::exit(2);
    }
    if edits.is_empty() && writes {
        eprintln!("--output and --in-place require at least one --set-* flag");
        process::exit(2);
    }

    let known_mtime = codec::file_mtime(&path);
    let bytes = read_save(&path);
    let mut world = parse_world(&bytes).unwrap_or_else(|e| {
        eprintln!("Error parsing save file: {}", path.display());
        eprintln!("  {e}");
        process::exit(1);
    });

    if !edits.is_empty() {
        edits
            .apply(&mut world)
            .unwrap_or_else(|e| fail("Error applying edit", e));

        if let Some(out_path) = &cli.output {
            let mut image = bytes.clone();
            world
                .encode_into(&mut image)
                .unwrap_or_else(|e| fail("Error creating modified save bytes", e));
            fs::write(out_path, image).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {e}", out_path.display());
                process::exit(1);
            });
        } else {
            if let Err(msg) = ensure_unchanged(&path, known_mtime) {
                eprintln!("{msg}");
                process::exit(1);
            }
            edits
                .save_in_place(&path, &world)
                .unwrap_or_else(|e| fail("Error saving edits", e));
        }
    }

    if cli.json {
        let json = if fields.is_any_selected() {
            render_json_selected(&world, &fields, JsonStyle::CanonicalV1)
        } else {
            render_json_full(&world, JsonStyle::CanonicalV1)
        };
        print_json(&json);
        return;
    }

    if fields.is_any_selected() {
        for (key, value) in selected_pairs(&world, &fields) {
            println!("{key}={value}");
        }
        return;
    }

    if let Some(out_path) = &cli.output {
        println!("Wrote edited save to {}", out_path.display());
        return;
    }
    if cli.in_place {
        println!("Updated {} in place", path.display());
        return;
    }

    print!(
        "{}",
        render_text_with_options(
            &world,
            TextRenderOptions {
                verbose: cli.verbose
            }
        )
    );
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("{context}: {err}");
    process::exit(1);
}

/// Refuses an in-place write when the file's mtime moved after it was read.
fn ensure_unchanged(path: &Path, known_mtime: Option<SystemTime>) -> Result<(), String> {
    if codec::has_file_changed(path, known_mtime) {
        warn!(path = %path.display(), "save changed on disk after it was read");
        return Err(format!(
            "{} changed on disk since it was read; not overwriting",
            path.display()
        ));
    }
    Ok(())
}

fn read_save(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    })
}

fn print_json(json: &JsonValue) {
    let rendered = serde_json::to_string_pretty(json)
        .unwrap_or_else(|e| fail("Error rendering JSON output", e));
    println!("{rendered}");
}

// ---------------------------------------------------------------------------
// debug subcommands
// ---------------------------------------------------------------------------

fn run_debug(command: &DebugCommand) {
    match command {
        DebugCommand::Layout { json, path } => debug_layout(path, *json),
        DebugCommand::Record {
            kind,
            index,
            json,
            path,
        } => debug_record(path, *kind, *index, *json),
        DebugCommand::Validate { json, path } => debug_validate(path, *json),
    }
}

fn debug_layout(path: &Path, json: bool) {
    let bytes = read_save(path);
    let file_layout =
        SaveLayout::sections(bytes.len()).unwrap_or_else(|e| fail("Error building layout", e));
    let validation = file_layout.validate();

    if json {
        let sections = file_layout
            .sections
            .iter()
            .map(|s| {
                let mut out = JsonMap::new();
                out.insert("id".to_string(), JsonValue::String(s.id.to_string()));
                out.insert("start".to_string(), JsonValue::from(s.range.start));
                out.insert("end".to_string(), JsonValue::from(s.range.end));
                out.insert("len".to_string(), JsonValue::from(s.range.len()));
                out.insert("ciphered".to_string(), JsonValue::Bool(s.id.is_ciphered()));
                JsonValue::Object(out)
            })
            .collect();

        let mut out = JsonMap::new();
        out.insert("file_len".to_string(), JsonValue::from(file_layout.file_len));
        out.insert(
            "section_count".to_string(),
            JsonValue::from(file_layout.sections.len()),
        );
        out.insert(
            "validation_ok".to_string(),
            JsonValue::Bool(validation.is_ok()),
        );
        if let Err(e) = &validation {
            out.insert(
                "validation_error".to_string(),
                JsonValue::String(e.to_string()),
            );
        }
        out.insert("sections".to_string(), JsonValue::Array(sections));
        print_json(&JsonValue::Object(out));
        return;
    }

    println!("file_len={}", file_layout.file_len);
    for s in &file_layout.sections {
        println!(
            "{:<13} {:#07x}..{:#07x} {:>6}{}",
            s.id.as_str(),
            s.range.start,
            s.range.end,
            s.range.len(),
            if s.id.is_ciphered() { "  ciphered" } else { "" }
        );
    }
    match validation {
        Ok(()) => println!("validation=ok"),
        Err(e) => println!("validation=error ({e})"),
    }
}

fn debug_record(path: &Path, kind: RecordKind, index: usize, json: bool) {
    let bytes = read_save(path);
    SaveLayout::sections(bytes.len()).unwrap_or_else(|e| fail("Error building layout", e));

    let (array, record_schema) = kind.table();
    if index >= array.count {
        fail(
            "Error reading record",
            slot_error(record_schema.kind, index, array.count),
        );
    }

    let variant = SceneVariant::from_scene(bytes[layout::SCENE]);
    let raw = cipher::decrypt(variant, &bytes[array.slot_range(index)]);
    let fields =
        schema::dump(&record_schema, &raw).unwrap_or_else(|e| fail("Error decoding record", e));

    if json {
        let mut out = JsonMap::new();
        out.insert(
            "kind".to_string(),
            JsonValue::String(record_schema.kind.to_string()),
        );
        out.insert("index".to_string(), JsonValue::from(index));
        out.insert("offset".to_string(), JsonValue::from(array.offset(index)));
        out.insert("cipher_variant".to_string(), JsonValue::from(variant.get()));
        out.insert("fields".to_string(), render_record_dump(&fields));
        print_json(&JsonValue::Object(out));
        return;
    }

    println!(
        "{} {} at {:#07x}",
        record_schema.kind,
        index,
        array.offset(index)
    );
    for (name, value) in fields {
        println!("{name}={value}");
    }
}

fn debug_validate(path: &Path, json: bool) {
    let bytes = read_save(path);
    let mut errors = Vec::new();
    let mut snapshot = None;

    match SaveLayout::sections(bytes.len()) {
        Ok(file_layout) => {
            if let Err(e) = file_layout.validate() {
                errors.push(e.to_string());
            }
            match parse_world(&bytes) {
                Ok(world) => snapshot = Some(world.snapshot()),
                Err(e) => errors.push(e.to_string()),
            }
        }
        Err(e) => errors.push(e.to_string()),
    }

    let ok = errors.is_empty();
    if json {
        let mut out = JsonMap::new();
        out.insert(
            "status".to_string(),
            JsonValue::String(if ok { "ok" } else { "error" }.to_string()),
        );
        out.insert("file_len".to_string(), JsonValue::from(bytes.len()));
        out.insert(
            "errors".to_string(),
            JsonValue::Array(errors.iter().cloned().map(JsonValue::String).collect()),
        );
        if let Some(snapshot) = &snapshot {
            let value = serde_json::to_value(snapshot)
                .unwrap_or_else(|e| fail("Error rendering JSON output", e));
            out.insert("snapshot".to_string(), value);
        }
        print_json(&JsonValue::Object(out));
    } else if ok {
        println!("status=ok");
    } else {
        println!("status=error");
        for e in &errors {
            println!("error={e}");
        }
    }

    if !ok {
        process::exit(1);
    }
}
