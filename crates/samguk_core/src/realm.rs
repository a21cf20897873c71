use crate::SENTINEL;
use crate::error::{Result, SaveError};
use crate::schema::{
    BlobReader, BlobWriter, FieldKind, FieldSpec, Record, RecordSchema, check_blob,
};
use crate::tables::REALM_COUNT;
use crate::text;

pub const REALM_SIZE: usize = 168;
pub const NAME_FRAGMENT_LEN: usize = 8;
pub const NAME_FRAGMENTS: usize = 4;

pub mod field {
    use super::{FieldKind::*, FieldSpec, NAME_FRAGMENT_LEN};
    use crate::tables::REALM_COUNT;

    pub const RULER: FieldSpec = FieldSpec::new("ruler", 0x00, U16);
    pub const STAFF: FieldSpec = FieldSpec::new("staff", 0x02, U16);
    pub const NAME_1: FieldSpec = FieldSpec::new("name_1", 0x04, Bytes(NAME_FRAGMENT_LEN));
    pub const NAME_2: FieldSpec = FieldSpec::new("name_2", 0x0C, Bytes(NAME_FRAGMENT_LEN));
    pub const NAME_3: FieldSpec = FieldSpec::new("name_3", 0x14, Bytes(NAME_FRAGMENT_LEN));
    pub const NAME_4: FieldSpec = FieldSpec::new("name_4", 0x1C, Bytes(NAME_FRAGMENT_LEN));
    pub const CAPITAL: FieldSpec = FieldSpec::new("capital", 0x24, U16);
    pub const HOSTILITY: FieldSpec = FieldSpec::new("hostility", 0x26, Bytes(REALM_COUNT));
    pub const RESERVED: FieldSpec = FieldSpec::new("reserved", 0x5C, Bytes(76));

    pub const NAMES: [FieldSpec; 4] = [NAME_1, NAME_2, NAME_3, NAME_4];
}

pub const SCHEMA: RecordSchema = RecordSchema {
    kind: "realm",
    size: REALM_SIZE,
    fields: &[
        field::RULER,
        field::STAFF,
        field::NAME_1,
        field::NAME_2,
        field::NAME_3,
        field::NAME_4,
        field::CAPITAL,
        field::HOSTILITY,
        field::RESERVED,
    ],
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Realm {
    pub num: usize,
    pub ruler: u16,
    pub staff: u16,
    pub name_fragments: [[u8; NAME_FRAGMENT_LEN]; NAME_FRAGMENTS],
    pub capital: u16,
    /// Hostility towards each other realm, indexed by realm slot.
    pub hostility: [u8; REALM_COUNT],
    pub reserved: [u8; 76],
}

impl Record for Realm {
    const SCHEMA: RecordSchema = SCHEMA;
    const COUNT: usize = REALM_COUNT;

    fn decode(slot: usize, raw: &[u8]) -> Result<Self> {
        check_blob(&SCHEMA, REALM_COUNT, slot, raw)?;
        let r = BlobReader::new(raw);
        Ok(Self {
            num: slot,
            ruler: r.u16(&field::RULER),
            staff: r.u16(&field::STAFF),
            name_fragments: field::NAMES.map(|f| r.bytes(&f)),
            capital: r.u16(&field::CAPITAL),
            hostility: r.bytes(&field::HOSTILITY),
            reserved: r.bytes(&field::RESERVED),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = BlobWriter::new(&SCHEMA);
        w.put_u16(&field::RULER, self.ruler);
        w.put_u16(&field::STAFF, self.staff);
        for (name_field, fragment) in field::NAMES.iter().zip(&self.name_fragments) {
            w.put_bytes(name_field, fragment);
        }
        w.put_u16(&field::CAPITAL, self.capital);
        w.put_bytes(&field::HOSTILITY, &self.hostility);
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

impl Realm {
    /// All four name fragments joined in order.
    pub fn name(&self) -> String {
        self.name_fragments
            .iter()
            .map(|fragment| text::decode_fixed(fragment))
            .collect()
    }

    pub fn set_name_fragment(&mut self, index: usize, fragment: &str) -> Result<()> {
        let slot = self
            .name_fragments
            .get_mut(index)
            .ok_or_else(|| SaveError::InvalidValue {
                field: "realm name fragment".to_string(),
                value: index as i64,
                reason: format!("expected 0..{}", NAME_FRAGMENTS - 1),
            })?;
        text::store_fixed(slot, fragment)
    }

    /// A realm whose ruler is the sentinel has been destroyed.
    pub fn is_defunct(&self) -> bool {
        self.ruler == SENTINEL
    }

    pub fn ruler(&self) -> Option<usize> {
        (!self.is_defunct()).then_some(self.ruler as usize)
    }

    pub fn staff(&self) -> Option<usize> {
        (self.staff != SENTINEL).then_some(self.staff as usize)
    }

    pub fn hostility_towards(&self, realm: usize) -> Option<u8> {
        self.hostility.get(realm).copied()
    }
}
