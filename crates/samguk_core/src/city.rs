use crate::SENTINEL;
use crate::error::Result;
use crate::schema::{
    BlobReader, BlobWriter, FieldKind, FieldSpec, Record, RecordSchema, check_blob,
};
use crate::tables::{CITY_COUNT, CITY_NAMES, name_or_unknown};

pub const CITY_SIZE: usize = 64;

pub mod field {
    use super::{FieldKind::*, FieldSpec};

    pub const GOLD: FieldSpec = FieldSpec::new("gold", 0x00, U32);
    pub const FOOD: FieldSpec = FieldSpec::new("food", 0x04, U32);
    pub const GOVERNOR: FieldSpec = FieldSpec::new("governor", 0x08, U16);
    pub const POPULATION: FieldSpec = FieldSpec::new("population", 0x0A, U32);
    pub const DEVELOPMENT: FieldSpec = FieldSpec::new("development", 0x0E, U16);
    pub const DEVELOPMENT_MAX: FieldSpec = FieldSpec::new("development_max", 0x10, U16);
    pub const SHOP: FieldSpec = FieldSpec::new("shop", 0x12, U16);
    pub const SHOP_MAX: FieldSpec = FieldSpec::new("shop_max", 0x14, U16);
    pub const SECURITY: FieldSpec = FieldSpec::new("security", 0x16, U8);
    pub const DEFENSE: FieldSpec = FieldSpec::new("defense", 0x17, U16);
    pub const TECH: FieldSpec = FieldSpec::new("tech", 0x19, U8);
    pub const REALM: FieldSpec = FieldSpec::new("realm", 0x1A, U16);
    pub const FIRST_GENERAL: FieldSpec = FieldSpec::new("first_general", 0x1C, U16);
    pub const RESERVED: FieldSpec = FieldSpec::new("reserved", 0x1E, Bytes(34));
}

pub const SCHEMA: RecordSchema = RecordSchema {
    kind: "city",
    size: CITY_SIZE,
    fields: &[
        field::GOLD,
        field::FOOD,
        field::GOVERNOR,
        field::POPULATION,
        field::DEVELOPMENT,
        field::DEVELOPMENT_MAX,
        field::SHOP,
        field::SHOP_MAX,
        field::SECURITY,
        field::DEFENSE,
        field::TECH,
        field::REALM,
        field::FIRST_GENERAL,
        field::RESERVED,
    ],
};

/// A city slot. The name is not stored in the blob; it comes from
/// [`CITY_NAMES`] by slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub num: usize,
    pub name: &'static str,
    pub gold: u32,
    pub food: u32,
    pub governor: u16,
    pub population: u32,
    pub development: u16,
    pub development_max: u16,
    pub shop: u16,
    pub shop_max: u16,
    pub security: u8,
    pub defense: u16,
    pub tech: u8,
    pub realm: u16,
    pub first_general: u16,
    pub reserved: [u8; 34],
}

impl Record for City {
    const SCHEMA: RecordSchema = SCHEMA;
    const COUNT: usize = CITY_COUNT;

    fn decode(slot: usize, raw: &[u8]) -> Result<Self> {
        check_blob(&SCHEMA, CITY_COUNT, slot, raw)?;
        let r = BlobReader::new(raw);
        Ok(Self {
            num: slot,
            name: name_or_unknown(&CITY_NAMES, slot),
            gold: r.u32(&field::GOLD),
            food: r.u32(&field::FOOD),
            governor: r.u16(&field::GOVERNOR),
            population: r.u32(&field::POPULATION),
            development: r.u16(&field::DEVELOPMENT),
            development_max: r.u16(&field::DEVELOPMENT_MAX),
            shop: r.u16(&field::SHOP),
            shop_max: r.u16(&field::SHOP_MAX),
            security: r.u8(&field::SECURITY),
            defense: r.u16(&field::DEFENSE),
            tech: r.u8(&field::TECH),
            realm: r.u16(&field::REALM),
            first_general: r.u16(&field::FIRST_GENERAL),
            reserved: r.bytes(&field::RESERVED),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = BlobWriter::new(&SCHEMA);
        w.put_u32(&field::GOLD, self.gold);
        w.put_u32(&field::FOOD, self.food);
        w.put_u16(&field::GOVERNOR, self.governor);
        w.put_u32(&field::POPULATION, self.population);
        w.put_u16(&field::DEVELOPMENT, self.development);
        w.put_u16(&field::DEVELOPMENT_MAX, self.development_max);
        w.put_u16(&field::SHOP, self.shop);
        w.put_u16(&field::SHOP_MAX, self.shop_max);
        w.put_u8(&field::SECURITY, self.security);
        w.put_u16(&field::DEFENSE, self.defense);
        w.put_u8(&field::TECH, self.tech);
        w.put_u16(&field::REALM, self.realm);
        w.put_u16(&field::FIRST_GENERAL, self.first_general);
        w.put_bytes(&field::RESERVED, &self.reserved);
        w.finish()
    }

    fn slot(&self) -> usize {
        self.num
    }

    /// Cities carry no stored name, so the slot is the identity.
    fn identity(&self) -> String {
        format!("{}:{}", self.num, self.name)
    }
}

impl City {
    pub fn governor(&self) -> Option<usize> {
        (self.governor != SENTINEL).then_some(self.governor as usize)
    }

    /// Owning realm, or `None` for an unclaimed city.
    pub fn realm(&self) -> Option<usize> {
        (self.realm != SENTINEL).then_some(self.realm as usize)
    }

    pub fn first_general(&self) -> Option<usize> {
        (self.first_general != SENTINEL).then_some(self.first_general as usize)
    }
}
