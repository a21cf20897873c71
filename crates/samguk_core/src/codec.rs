//! Whole-file load and save.
//!
//! A load reads the header scalars in the clear, derives the cipher variant
//! from the scene byte, then decrypts and decodes every record array and the
//! trailing scalar tables. The player general named by the header must match
//! the header's player name before anything is handed back to the caller.
//!
//! Saves write in place into an existing file and never create one. A full
//! [`save`] rewrites generals, items, cities and the player's gold; realms are
//! read but not written back. The selective savers re-decode their own output
//! first and refuse to write if the record's identity does not survive.
//! Cities store no name on disk, so for them the check only confirms the slot.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Cursor, Read, Seek};
use std::path::Path;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::cipher::{self, SceneVariant};
use crate::city::City;
use crate::error::{Result, SaveError};
use crate::general::General;
use crate::item::Item;
use crate::layout::{
    self, CITIES, GENERALS, ITEMS, LAYOUT_END, PLAYER_NAME_LEN, REALMS, RecordArray,
};
use crate::reader::{LittleEndianReader, LittleEndianWriter};
use crate::realm::Realm;
use crate::schema::Record;
use crate::tables::{CITY_COUNT, GENERAL_COUNT, ITEM_COUNT};
use crate::text;
use crate::world::{WorldState, write_records};

/// Decodes a complete save image without touching the filesystem.
pub fn parse_world(bytes: &[u8]) -> Result<WorldState> {
    if bytes.len() < LAYOUT_END {
        return Err(SaveError::Truncated {
            needed: LAYOUT_END,
            actual: bytes.len(),
        });
    }
    if bytes.len() > LAYOUT_END {
        warn!(
            trailer_len = bytes.len() - LAYOUT_END,
            "save is longer than the known layout; trailer preserved"
        );
    }

    let mut r = LittleEndianReader::new(Cursor::new(bytes));

    r.seek_to(layout::YEAR as u64)?;
    let year = r.read_u16()?;
    let month = r.read_u8()?;
    let mut player_name = [0u8; PLAYER_NAME_LEN];
    player_name.copy_from_slice(&r.read_bytes(PLAYER_NAME_LEN)?);
    let scene = r.read_u8()?;
    let variant = SceneVariant::from_scene(scene);
    debug!(year, month, scene, variant = variant.get(), "header read");

    let generals: Vec<General> = read_records(&mut r, &GENERALS, variant)?;
    let items: Vec<Item> = read_records(&mut r, &ITEMS, variant)?;
    let realms: Vec<Realm> = read_records(&mut r, &REALMS, variant)?;
    let cities: Vec<City> = read_records(&mut r, &CITIES, variant)?;

    r.seek_to(layout::PLAYER_GOLD as u64)?;
    let player_gold = r.read_ciphered_u16(variant)?;
    r.skip((layout::PLAYER_INDEX - layout::GOLD_SKIP) as u64)?;
    let player_index = r.read_ciphered_u16(variant)?;

    r.seek_to(layout::RELATIONS as u64)?;
    let relations = (0..GENERAL_COUNT)
        .map(|_| r.read_ciphered_u16(variant))
        .collect::<io::Result<Vec<_>>>()?;
    r.seek_to(layout::SENTIMENTS as u64)?;
    let sentiments = (0..CITY_COUNT)
        .map(|_| r.read_ciphered_u8(variant))
        .collect::<io::Result<Vec<_>>>()?;
    debug!(
        generals = generals.len(),
        items = items.len(),
        realms = realms.len(),
        cities = cities.len(),
        "record arrays read"
    );

    let player = generals
        .get(player_index as usize)
        .ok_or(SaveError::PlayerIndexOutOfRange {
            index: player_index,
            count: GENERAL_COUNT,
        })?;
    let header_name = text::decode_fixed(&player_name);
    if player.name() != header_name {
        return Err(SaveError::PlayerMismatch {
            index: player_index,
            header: header_name,
            record: player.name(),
        });
    }
    debug!(player_index, player = %header_name, "player validated");

    Ok(WorldState {
        year,
        month,
        scene,
        player_name,
        player_index,
        player_gold,
        generals,
        items,
        realms,
        cities,
        relations,
        sentiments,
        mtime: None,
    })
}

fn read_records<T, R>(
    r: &mut LittleEndianReader<R>,
    array: &RecordArray,
    variant: SceneVariant,
) -> Result<Vec<T>>
where
    T: Record,
    R: Read + Seek,
{
    debug_assert_eq!(array.size, T::SCHEMA.size);
    let mut out = Vec::with_capacity(array.count);
    for slot in 0..array.count {
        r.seek_to(array.offset(slot) as u64)?;
        let raw = r.read_ciphered_bytes(array.size, variant)?;
        out.push(T::decode(slot, &raw)?);
    }
    Ok(out)
}

/// Loads `path` into `world`. On any error `world` is left as it was.
pub fn load(path: impl AsRef<Path>, world: &mut WorldState) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| SaveError::from_open(e, path))?;
    let mtime = file.metadata().and_then(|m| m.modified()).ok();
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    drop(file);

    let mut fresh = parse_world(&bytes)?;
    fresh.mtime = mtime;
    *world = fresh;
    info!(
        path = %path.display(),
        year = world.year,
        month = world.month,
        player = %world.player_name(),
        "save loaded"
    );
    Ok(())
}

/// Writes generals, items, cities and the player's gold back into an
/// existing save. Realms are not written. There is no rollback: an I/O error
/// part way through leaves whatever was already written.
pub fn save(path: impl AsRef<Path>, world: &WorldState) -> Result<()> {
    let path = path.as_ref();
    let file = open_existing(path)?;
    let variant = world.variant();
    let mut w = LittleEndianWriter::new(file);

    write_records(&mut w, &GENERALS, &world.generals, variant)?;
    write_records(&mut w, &ITEMS, &world.items, variant)?;
    write_records(&mut w, &CITIES, &world.cities, variant)?;
    w.seek_to(layout::PLAYER_GOLD as u64)?;
    w.write_ciphered_u16(world.player_gold, variant)?;

    w.flush()?;
    w.get_mut().sync_all()?;
    info!(
        path = %path.display(),
        generals = world.generals.len(),
        items = world.items.len(),
        cities = world.cities.len(),
        gold = world.player_gold,
        "save written"
    );
    Ok(())
}

pub fn save_general(path: impl AsRef<Path>, world: &WorldState, num: usize) -> Result<()> {
    let general = world.general(num).ok_or(SaveError::SlotOutOfRange {
        kind: "general",
        slot: num,
        count: GENERAL_COUNT,
    })?;
    save_one(path.as_ref(), &GENERALS, general, world.variant())
}

pub fn save_item(path: impl AsRef<Path>, world: &WorldState, num: usize) -> Result<()> {
    let item = world.item(num).ok_or(SaveError::SlotOutOfRange {
        kind: "item",
        slot: num,
        count: ITEM_COUNT,
    })?;
    save_one(path.as_ref(), &ITEMS, item, world.variant())
}

/// Writes one city record. City identity is derived from the slot alone, so
/// the round-trip check cannot catch a corrupted city body.
pub fn save_city(path: impl AsRef<Path>, world: &WorldState, num: usize) -> Result<()> {
    let city = world.city(num).ok_or(SaveError::SlotOutOfRange {
        kind: "city",
        slot: num,
        count: CITY_COUNT,
    })?;
    save_one(path.as_ref(), &CITIES, city, world.variant())
}

fn save_one<T: Record>(
    path: &Path,
    array: &RecordArray,
    record: &T,
    variant: SceneVariant,
) -> Result<()> {
    let slot = record.slot();
    if slot >= array.count {
        return Err(SaveError::SlotOutOfRange {
            kind: T::SCHEMA.kind,
            slot,
            count: array.count,
        });
    }

    let encrypted = cipher::encrypt(variant, &record.encode());
    let check = T::decode(slot, &cipher::decrypt(variant, &encrypted))?;
    let (expected, found) = (record.identity(), check.identity());
    if expected != found {
        warn!(
            kind = T::SCHEMA.kind,
            slot,
            expected = %expected,
            found = %found,
            "selective save refused"
        );
        return Err(SaveError::RecordRoundTripMismatch {
            kind: T::SCHEMA.kind,
            slot,
            expected,
            found,
        });
    }

    let mut w = LittleEndianWriter::new(open_existing(path)?);
    w.seek_to(array.offset(slot) as u64)?;
    w.write_bytes(&encrypted)?;
    w.flush()?;
    w.get_mut().sync_all()?;
    info!(path = %path.display(), kind = T::SCHEMA.kind, slot, "record written");
    Ok(())
}

/// Opens an existing save for in-place writing and checks it is long enough
/// to hold every region the codec writes.
fn open_existing(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| SaveError::from_open(e, path))?;
    let len = file.metadata()?.len() as usize;
    if len < LAYOUT_END {
        return Err(SaveError::Truncated {
            needed: LAYOUT_END,
            actual: len,
        });
    }
    Ok(file)
}

/// Current modification time of `path`, if the filesystem reports one.
pub fn file_mtime(path: impl AsRef<Path>) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Whether `path` has been modified since `known_mtime` was captured.
///
/// Advisory only. A missing mtime on either side counts as changed.
pub fn has_file_changed(path: impl AsRef<Path>, known_mtime: Option<SystemTime>) -> bool {
    match (file_mtime(path), known_mtime) {
        (Some(current), Some(known)) => current != known,
        _ => true,
    }
}
