use std::io::{Cursor, Seek, Write};
use std::time::SystemTime;

use serde::Serialize;

use crate::SENTINEL;
use crate::cipher::SceneVariant;
use crate::city::City;
use crate::error::{Result, SaveError};
use crate::general::General;
use crate::item::Item;
use crate::layout::{
    self, CITIES, GENERALS, ITEMS, LAYOUT_END, PLAYER_NAME_LEN, REALMS, RecordArray,
};
use crate::reader::LittleEndianWriter;
use crate::realm::Realm;
use crate::schema::Record;
use crate::tables::{CITY_COUNT, GENERAL_COUNT};
use crate::text;

/// Everything the codec reads out of one save file.
///
/// A load builds a fresh value and swaps it in whole, so a failed load never
/// leaves a half-populated world behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldState {
    pub year: u16,
    pub month: u8,
    pub scene: u8,
    /// Header copy of the player name, kept raw so it re-encodes unchanged.
    pub player_name: [u8; PLAYER_NAME_LEN],
    pub player_index: u16,
    pub player_gold: u16,
    pub generals: Vec<General>,
    pub items: Vec<Item>,
    pub realms: Vec<Realm>,
    pub cities: Vec<City>,
    /// Closeness to the player, indexed by general slot.
    pub relations: Vec<u16>,
    /// Sentiment byte, indexed by city slot.
    pub sentiments: Vec<u8>,
    /// Modification time of the file this world was loaded from.
    pub mtime: Option<SystemTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub year: u16,
    pub month: u8,
    pub scene: u8,
    pub cipher_variant: u8,
    pub player_name: String,
    pub player_index: u16,
    pub player_gold: u16,
    pub general_count: usize,
    pub item_count: usize,
    pub realm_count: usize,
    pub active_realm_count: usize,
    pub city_count: usize,
}

impl WorldState {
    pub fn variant(&self) -> SceneVariant {
        SceneVariant::from_scene(self.scene)
    }

    pub fn player_name(&self) -> String {
        text::decode_fixed(&self.player_name)
    }

    pub fn set_player_name(&mut self, name: &str) -> Result<()> {
        text::store_fixed(&mut self.player_name, name)
    }

    /// Realms that still have a ruler.
    pub fn active_realms(&self) -> impl Iterator<Item = &Realm> {
        self.realms.iter().filter(|r| !r.is_defunct())
    }

    /// The general holding `item`. The unowned sentinel never resolves.
    pub fn item_owner(&self, item: &Item) -> Option<&General> {
        item.owner().and_then(|num| self.general(num))
    }

    pub fn general(&self, num: usize) -> Option<&General> {
        self.generals.get(num)
    }

    pub fn general_mut(&mut self, num: usize) -> Option<&mut General> {
        self.generals.get_mut(num)
    }

    pub fn item(&self, num: usize) -> Option<&Item> {
        self.items.get(num)
    }

    pub fn item_mut(&mut self, num: usize) -> Option<&mut Item> {
        self.items.get_mut(num)
    }

    pub fn realm(&self, num: usize) -> Option<&Realm> {
        self.realms.get(num)
    }

    pub fn city(&self, num: usize) -> Option<&City> {
        self.cities.get(num)
    }

    pub fn city_mut(&mut self, num: usize) -> Option<&mut City> {
        self.cities.get_mut(num)
    }

    pub fn player(&self) -> Option<&General> {
        self.general(self.player_index as usize)
    }

    pub fn generals_in_city(&self, city: usize) -> Vec<&General> {
        self.generals
            .iter()
            .filter(|g| g.city != SENTINEL && g.city as usize == city)
            .collect()
    }

    pub fn generals_in_realm(&self, realm: usize) -> Vec<&General> {
        self.generals
            .iter()
            .filter(|g| g.realm != SENTINEL && g.realm as usize == realm)
            .collect()
    }

    pub fn cities_of_realm(&self, realm: usize) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| c.realm() == Some(realm))
            .collect()
    }

    /// Display name of realm `id`; `None` for the sentinel or a missing slot.
    pub fn realm_name(&self, id: u16) -> Option<String> {
        if id == SENTINEL {
            return None;
        }
        self.realm(id as usize).map(Realm::name)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            year: self.year,
            month: self.month,
            scene: self.scene,
            cipher_variant: self.variant().get(),
            player_name: self.player_name(),
            player_index: self.player_index,
            player_gold: self.player_gold,
            general_count: self.generals.len(),
            item_count: self.items.len(),
            realm_count: self.realms.len(),
            active_realm_count: self.active_realms().count(),
            city_count: self.cities.len(),
        }
    }

    /// Writes every persisted region into an existing save image. Bytes the
    /// codec does not model (header padding, the gold skip, the trailer) are
    /// left as they are.
    pub fn encode_into(&self, image: &mut [u8]) -> Result<()> {
        if image.len() < LAYOUT_END {
            return Err(SaveError::Truncated {
                needed: LAYOUT_END,
                actual: image.len(),
            });
        }
        let variant = self.variant();
        let mut w = LittleEndianWriter::new(Cursor::new(image));

        w.seek_to(layout::YEAR as u64)?;
        w.write_u16(self.year)?;
        w.write_u8(self.month)?;
        w.write_bytes(&self.player_name)?;
        w.write_u8(self.scene)?;

        write_records(&mut w, &GENERALS, &self.generals, variant)?;
        write_records(&mut w, &ITEMS, &self.items, variant)?;
        write_records(&mut w, &REALMS, &self.realms, variant)?;
        write_records(&mut w, &CITIES, &self.cities, variant)?;

        w.seek_to(layout::PLAYER_GOLD as u64)?;
        w.write_ciphered_u16(self.player_gold, variant)?;
        w.seek_to(layout::PLAYER_INDEX as u64)?;
        w.write_ciphered_u16(self.player_index, variant)?;

        check_len("relation", self.relations.len(), GENERAL_COUNT)?;
        w.seek_to(layout::RELATIONS as u64)?;
        for relation in &self.relations {
            w.write_ciphered_u16(*relation, variant)?;
        }

        check_len("sentiment", self.sentiments.len(), CITY_COUNT)?;
        w.seek_to(layout::SENTIMENTS as u64)?;
        w.write_ciphered_bytes(&self.sentiments, variant)?;

        Ok(())
    }
}

fn check_len(kind: &'static str, len: usize, count: usize) -> Result<()> {
    if len > count {
        return Err(SaveError::SlotOutOfRange {
            kind,
            slot: len - 1,
            count,
        });
    }
    Ok(())
}

/// Seeks to each record's slot and writes it through the cipher.
pub(crate) fn write_records<T, W>(
    w: &mut LittleEndianWriter<W>,
    array: &RecordArray,
    records: &[T],
    variant: SceneVariant,
) -> Result<()>
where
    T: Record,
    W: Write + Seek,
{
    debug_assert_eq!(array.size, T::SCHEMA.size);
    for record in records {
        let slot = record.slot();
        if slot >= array.count {
            return Err(SaveError::SlotOutOfRange {
                kind: T::SCHEMA.kind,
                slot,
                count: array.count,
            });
        }
        w.seek_to(array.offset(slot) as u64)?;
        w.write_ciphered_bytes(&record.encode(), variant)?;
    }
    Ok(())
}
