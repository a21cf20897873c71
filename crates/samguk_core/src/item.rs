use crate::SENTINEL;
use crate::bits::flag_names;
use crate::error::{Result, SaveError};
use crate::schema::{
    BlobReader, BlobWriter, FieldKind, FieldSpec, Record, RecordSchema, check_blob,
};
use crate::tables::{ITEM_COUNT, ITEM_PROPERTY_NAMES, ITEM_TYPE_NAMES, name_or_unknown};
use crate::text;

pub const ITEM_SIZE: usize = 40;
pub const ITEM_NAME_LEN: usize = 16;
/// Prices are stored in hundreds of gold.
pub const PRICE_UNIT: u32 = 100;

pub mod field {
    use super::{FieldKind::*, FieldSpec, ITEM_NAME_LEN};

    pub const OWNER: FieldSpec = FieldSpec::new("owner", 0x00, U16);
    pub const MARKET: FieldSpec = FieldSpec::new("market", 0x02, U8);
    pub const ITEM_TYPE: FieldSpec = FieldSpec::new("item_type", 0x03, U8);
    pub const NAME: FieldSpec = FieldSpec::new("name", 0x04, Bytes(ITEM_NAME_LEN));
    pub const BONUS: FieldSpec = FieldSpec::new("bonus", 0x14, U8);
    pub const PAD_A: FieldSpec = FieldSpec::new("pad_a", 0x15, U8);
    pub const PRICE: FieldSpec = FieldSpec::new("price", 0x16, U16);
    pub const NEXT: FieldSpec = FieldSpec::new("next", 0x18, U16);
    pub const PAD_B: FieldSpec = FieldSpec::new("pad_b", 0x1A, U16);
    pub const PROPERTIES: FieldSpec = FieldSpec::new("properties", 0x1C, U32);
    pub const RESERVED: FieldSpec = FieldSpec::new("reserved", 0x20, Bytes(8));
}

pub const SCHEMA: RecordSchema = RecordSchema {
    kind: "item",
    size: ITEM_SIZE,
    fields: &[
        field::OWNER,
        field::MARKET,
        field::ITEM_TYPE,
        field::NAME,
        field::BONUS,
        field::PAD_A,
        field::PRICE,
        field::NEXT,
        field::PAD_B,
        field::PROPERTIES,
        field::RESERVED,
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub num: usize,
    pub owner: u16,
    pub market: u8,
    pub item_type: u8,
    pub name: [u8; ITEM_NAME_LEN],
    pub bonus: u8,
    pub pad_a: u8,
    /// Stored price; see [`Item::price`] for the displayed amount.
    pub price: u16,
    pub next: u16,
    pub pad_b: u16,
    pub properties: u32,
    pub reserved: [u8; 8],
}

impl Record for Item {
    const SCHEMA: RecordSchema = SCHEMA;
    const COUNT: usize = ITEM_COUNT;

    fn decode(slot: usize, raw: &[u8]) -> Result<Self> {
        check_blob(&SCHEMA, ITEM_COUNT, slot, raw)?;
        let r = BlobReader::new(raw);
        Ok(Self {
            num: slot,
            owner: r.u16(&field::OWNER),
            market: r.u8(&field::MARKET),
            item_type: r.u8(&field::ITEM_TYPE),
            name: r.bytes(&field::NAME),
            bonus: r.u8(&field::BONUS),
            pad_a: r.u8(&field::PAD_A),
            price: r.u16(&field::PRICE),
            next: r.u16(&field::NEXT),
            pad_b: r.u16(&field::PAD_B),
            properties: r.u32(&field::PROPERTIES),
            reserved: r.bytes(&field::RESERVED),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = BlobWriter::new(&SCHEMA);
        w.put_u16(&field::OWNER, self.owner);
        w.put_u8(&field::MARKET, self.market);
        w.put_u8(&field::ITEM_TYPE, self.item_type);
        w.put_bytes(&field::NAME, &self.name);
        w.put_u8(&field::BONUS, self.bonus);
        w.put_u8(&field::PAD_A, self.pad_a);
        w.put_u16(&field::PRICE, self.price);
        w.put_u16(&field::NEXT, self.next);
        w.put_u16(&field::PAD_B, self.pad_b);
        w.put_u32(&field::PROPERTIES, self.properties);
        w.put_bytes(&field::RESERVED, &self.reserved);
        w.finish()
    }

    fn slot(&self) -> usize {
        self.num
    }

    fn identity(&self) -> String {
        self.name()
    }
}

impl Item {
    pub fn name(&self) -> String {
        text::decode_fixed(&self.name)
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        text::store_fixed(&mut self.name, name)
    }

    /// Owning general's slot, or `None` for the unowned sentinel.
    pub fn owner(&self) -> Option<usize> {
        (self.owner != SENTINEL).then_some(self.owner as usize)
    }

    pub fn is_owned(&self) -> bool {
        self.owner().is_some()
    }

    pub fn in_market(&self) -> bool {
        self.market != 0
    }

    pub fn type_name(&self) -> &'static str {
        name_or_unknown(&ITEM_TYPE_NAMES, self.item_type as usize)
    }

    /// Displayed price in gold.
    pub fn price(&self) -> u32 {
        u32::from(self.price) * PRICE_UNIT
    }

    /// Stores a displayed price, truncating to whole hundreds.
    pub fn set_price(&mut self, gold: u32) -> Result<()> {
        let stored = gold / PRICE_UNIT;
        self.price = u16::try_from(stored).map_err(|_| SaveError::InvalidValue {
            field: "price".to_string(),
            value: i64::from(gold),
            reason: format!("expected at most {}", u32::from(u16::MAX) * PRICE_UNIT),
        })?;
        Ok(())
    }

    pub fn next_item(&self) -> Option<usize> {
        (self.next != SENTINEL).then_some(self.next as usize)
    }

    pub fn property_names(&self) -> Vec<&'static str> {
        flag_names(self.properties, &ITEM_PROPERTY_NAMES)
    }

    pub fn property_string(&self) -> String {
        self.property_names().join(", ")
    }
}
