use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bits::{
    extract_lsb16, extract_lsb32, extract_msb16, flag_names, inject_lsb16, inject_lsb32,
    inject_msb16,
};
use crate::error::Result;
use crate::gender::Gender;
use crate::schema::{
    BlobReader, BlobWriter, FieldKind, FieldSpec, Record, RecordSchema, check_blob,
};
use crate::tables::{
    EQUIPMENT_NAMES, GENERAL_COUNT, JOB_NAMES, RANK_NAMES, SKILL_NAMES, STRATEGY_NAMES,
    TENDENCY_NAMES, TROOP_TYPE_NAMES, name_or_unknown,
};
use crate::text;

pub const GENERAL_SIZE: usize = 120;
pub const NAME_PART_LEN: usize = 4;
pub const RESERVED_LEN: usize = 48;

pub mod field {
    use super::{FieldKind::*, FieldSpec, NAME_PART_LEN, RESERVED_LEN};

    pub const NEXT: FieldSpec = FieldSpec::new("next", 0x00, U16);
    pub const FACE: FieldSpec = FieldSpec::new("face", 0x02, U16);
    pub const SURNAME: FieldSpec = FieldSpec::new("surname", 0x04, Bytes(NAME_PART_LEN));
    pub const GIVEN_NAME: FieldSpec = FieldSpec::new("given_name", 0x08, Bytes(NAME_PART_LEN));
    pub const STYLE_NAME: FieldSpec = FieldSpec::new("style_name", 0x0C, Bytes(NAME_PART_LEN));
    pub const REALM: FieldSpec = FieldSpec::new("realm", 0x10, U16);
    pub const CITY: FieldSpec = FieldSpec::new("city", 0x12, U16);
    pub const RELATION: FieldSpec = FieldSpec::new("relation", 0x14, U16);
    pub const ITEM: FieldSpec = FieldSpec::new("item", 0x16, U16);
    pub const SOLDIERS: FieldSpec = FieldSpec::new("soldiers", 0x18, U16);
    pub const SALARY: FieldSpec = FieldSpec::new("salary", 0x1A, U16);
    pub const TRAINING: FieldSpec = FieldSpec::new("training", 0x1C, U8);
    pub const LOYALTY: FieldSpec = FieldSpec::new("loyalty", 0x1D, U8);
    pub const STRENGTH: FieldSpec = FieldSpec::new("strength", 0x1E, U8);
    pub const INTELLECT: FieldSpec = FieldSpec::new("intellect", 0x1F, U8);
    pub const POLITICS: FieldSpec = FieldSpec::new("politics", 0x20, U8);
    pub const CHARISMA: FieldSpec = FieldSpec::new("charisma", 0x21, U8);
    pub const STRENGTH_EXP: FieldSpec = FieldSpec::new("strength_exp", 0x22, U8);
    pub const INTELLECT_EXP: FieldSpec = FieldSpec::new("intellect_exp", 0x23, U8);
    pub const POLITICS_EXP: FieldSpec = FieldSpec::new("politics_exp", 0x24, U8);
    pub const CHARISMA_EXP: FieldSpec = FieldSpec::new("charisma_exp", 0x25, U8);
    pub const RANK: FieldSpec = FieldSpec::new("rank", 0x26, U8);
    pub const STATE: FieldSpec = FieldSpec::new("state", 0x27, U8);
    pub const BIRTH_YEAR: FieldSpec = FieldSpec::new("birth_year", 0x28, U16);
    pub const DEBUT_YEAR: FieldSpec = FieldSpec::new("debut_year", 0x2A, U16);
    pub const SKILLS: FieldSpec = FieldSpec::new("skills", 0x2C, U32);
    pub const EQUIPMENT: FieldSpec = FieldSpec::new("equipment", 0x30, U16);
    pub const PERSONALITY: FieldSpec = FieldSpec::new("personality", 0x32, U16);
    pub const CONDITION: FieldSpec = FieldSpec::new("condition", 0x34, U32);
    pub const CAPTURE_COUNT: FieldSpec = FieldSpec::new("capture_count", 0x38, U8);
    pub const AMBUSH_COUNT: FieldSpec = FieldSpec::new("ambush_count", 0x39, U8);
    pub const OPERATE_COUNT: FieldSpec = FieldSpec::new("operate_count", 0x3A, U8);
    pub const TOURNAMENT_WINS: FieldSpec = FieldSpec::new("tournament_wins", 0x3B, U8);
    pub const CAPTURE_REALM: FieldSpec = FieldSpec::new("capture_realm", 0x3C, U16);
    pub const AMBUSH_REALM: FieldSpec = FieldSpec::new("ambush_realm", 0x3E, U16);
    pub const OPERATE_REALM: FieldSpec = FieldSpec::new("operate_realm", 0x40, U16);
    pub const POETRY_WINS: FieldSpec = FieldSpec::new("poetry_wins", 0x42, U8);
    pub const DEBATE_WINS: FieldSpec = FieldSpec::new("debate_wins", 0x43, U8);
    pub const MERIT: FieldSpec = FieldSpec::new("merit", 0x44, U16);
    pub const ARMY: FieldSpec = FieldSpec::new("army", 0x46, U16);
    pub const RESERVED: FieldSpec = FieldSpec::new("reserved", 0x48, Bytes(RESERVED_LEN));
}

pub const SCHEMA: RecordSchema = RecordSchema {
    kind: "general",
    size: GENERAL_SIZE,
    fields: &[
        field::NEXT,
        field::FACE,
        field::SURNAME,
        field::GIVEN_NAME,
        field::STYLE_NAME,
        field::REALM,
        field::CITY,
        field::RELATION,
        field::ITEM,
        field::SOLDIERS,
        field::SALARY,
        field::TRAINING,
        field::LOYALTY,
        field::STRENGTH,
        field::INTELLECT,
        field::POLITICS,
        field::CHARISMA,
        field::STRENGTH_EXP,
        field::INTELLECT_EXP,
        field::POLITICS_EXP,
        field::CHARISMA_EXP,
        field::RANK,
        field::STATE,
        field::BIRTH_YEAR,
        field::DEBUT_YEAR,
        field::SKILLS,
        field::EQUIPMENT,
        field::PERSONALITY,
        field::CONDITION,
        field::CAPTURE_COUNT,
        field::AMBUSH_COUNT,
        field::OPERATE_COUNT,
        field::TOURNAMENT_WINS,
        field::CAPTURE_REALM,
        field::AMBUSH_REALM,
        field::OPERATE_REALM,
        field::POETRY_WINS,
        field::DEBATE_WINS,
        field::MERIT,
        field::ARMY,
        field::RESERVED,
    ],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneralState {
    Serving,
    Free,
    Hidden,
    Captive,
    Exiled,
    Unborn,
    Dead,
    Unknown(u8),
}

impl GeneralState {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Serving,
            1 => Self::Free,
            2 => Self::Hidden,
            3 => Self::Captive,
            4 => Self::Exiled,
            5 => Self::Unborn,
            6 => Self::Dead,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match *self {
            Self::Serving => 0,
            Self::Free => 1,
            Self::Hidden => 2,
            Self::Captive => 3,
            Self::Exiled => 4,
            Self::Unborn => 5,
            Self::Dead => 6,
            Self::Unknown(other) => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Serving => "Serving",
            Self::Free => "Free",
            Self::Hidden => "Hidden",
            Self::Captive => "Captive",
            Self::Exiled => "Exiled",
            Self::Unborn => "Unborn",
            Self::Dead => "Dead",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for GeneralState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    /// `personality`, numbered from the most significant bit.
    Personality,
    /// `condition`, numbered by the span's highest bit.
    Condition,
    /// `army`, numbered by the span's highest bit.
    Army,
}

/// Attributes stored as bit spans inside `personality`, `condition` and `army`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packed {
    Ambition,
    Fidelity,
    Gender,
    Valour,
    Composure,
    Job,
    Injury,
    Growth,
    Lifespan,
    Tendency,
    Strategy,
    Turned,
    Opposite,
    TroopType,
    Formation,
    Morale,
}

impl Packed {
    pub const ALL: [Packed; 16] = [
        Packed::Ambition,
        Packed::Fidelity,
        Packed::Gender,
        Packed::Valour,
        Packed::Composure,
        Packed::Job,
        Packed::Injury,
        Packed::Growth,
        Packed::Lifespan,
        Packed::Tendency,
        Packed::Strategy,
        Packed::Turned,
        Packed::Opposite,
        Packed::TroopType,
        Packed::Formation,
        Packed::Morale,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Ambition => "ambition",
            Self::Fidelity => "fidelity",
            Self::Gender => "gender",
            Self::Valour => "valour",
            Self::Composure => "composure",
            Self::Job => "job",
            Self::Injury => "injury",
            Self::Growth => "growth",
            Self::Lifespan => "lifespan",
            Self::Tendency => "tendency",
            Self::Strategy => "strategy",
            Self::Turned => "turned",
            Self::Opposite => "opposite",
            Self::TroopType => "troop_type",
            Self::Formation => "formation",
            Self::Morale => "morale",
        }
    }

    fn span(self) -> (Container, u32, u32) {
        match self {
            Self::Ambition => (Container::Personality, 0, 3),
            Self::Fidelity => (Container::Personality, 3, 3),
            Self::Gender => (Container::Personality, 6, 1),
            Self::Valour => (Container::Personality, 7, 3),
            Self::Composure => (Container::Personality, 10, 3),
            Self::Job => (Container::Personality, 13, 3),
            Self::Injury => (Container::Condition, 3, 4),
            Self::Growth => (Container::Condition, 5, 2),
            Self::Lifespan => (Container::Condition, 9, 4),
            Self::Tendency => (Container::Condition, 12, 3),
            Self::Strategy => (Container::Condition, 15, 3),
            Self::Turned => (Container::Condition, 16, 1),
            Self::Opposite => (Container::Condition, 17, 1),
            Self::TroopType => (Container::Army, 3, 4),
            Self::Formation => (Container::Army, 7, 4),
            Self::Morale => (Container::Army, 15, 8),
        }
    }

    /// Width of the span in bits.
    pub fn bits(self) -> u32 {
        self.span().2
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct General {
    pub num: usize,
    pub next: u16,
    pub face: u16,
    pub surname: [u8; NAME_PART_LEN],
    pub given_name: [u8; NAME_PART_LEN],
    pub style_name: [u8; NAME_PART_LEN],
    pub realm: u16,
    pub city: u16,
    pub relation: u16,
    pub item: u16,
    pub soldiers: u16,
    pub salary: u16,
    pub training: u8,
    pub loyalty: u8,
    pub strength: u8,
    pub intellect: u8,
    pub politics: u8,
    pub charisma: u8,
    pub strength_exp: u8,
    pub intellect_exp: u8,
    pub politics_exp: u8,
    pub charisma_exp: u8,
    pub rank: u8,
    pub state: u8,
    pub birth_year: u16,
    pub debut_year: u16,
    pub skills: u32,
    pub equipment: u16,
    pub personality: u16,
    pub condition: u32,
    pub capture_count: u8,
    pub ambush_count: u8,
    pub operate_count: u8,
    pub tournament_wins: u8,
    pub capture_realm: u16,
    pub ambush_realm: u16,
    pub operate_realm: u16,
    pub poetry_wins: u8,
    pub debate_wins: u8,
    pub merit: u16,
    pub army: u16,
    pub reserved: [u8; RESERVED_LEN],
}

impl Record for General {
    const SCHEMA: RecordSchema = SCHEMA;
    const COUNT: usize = GENERAL_COUNT;

    fn decode(slot: usize, raw: &[u8]) -> Result<Self> {
        check_blob(&SCHEMA, GENERAL_COUNT, slot, raw)?;
        let r = BlobReader::new(raw);
        Ok(Self {
            num: slot,
            next: r.u16(&field::NEXT),
            face: r.u16(&field::FACE),
            surname: r.bytes(&field::SURNAME),
            given_name: r.bytes(&field::GIVEN_NAME),
            style_name: r.bytes(&field::STYLE_NAME),
            realm: r.u16(&field::REALM),
            city: r.u16(&field::CITY),
            relation: r.u16(&field::RELATION),
            item: r.u16(&field::ITEM),
            soldiers: r.u16(&field::SOLDIERS),
            salary: r.u16(&field::SALARY),
            training: r.u8(&field::TRAINING),
            loyalty: r.u8(&field::LOYALTY),
            strength: r.u8(&field::STRENGTH),
            intellect: r.u8(&field::INTELLECT),
            politics: r.u8(&field::POLITICS),
            charisma: r.u8(&field::CHARISMA),
            strength_exp: r.u8(&field::STRENGTH_EXP),
            intellect_exp: r.u8(&field::INTELLECT_EXP),
            politics_exp: r.u8(&field::POLITICS_EXP),
            charisma_exp: r.u8(&field::CHARISMA_EXP),
            rank: r.u8(&field::RANK),
            state: r.u8(&field::STATE),
            birth_year: r.u16(&field::BIRTH_YEAR),
            debut_year: r.u16(&field::DEBUT_YEAR),
            skills: r.u32(&field::SKILLS),
            equipment: r.u16(&field::EQUIPMENT),
            personality: r.u16(&field::PERSONALITY),
            condition: r.u32(&field::CONDITION),
            capture_count: r.u8(&field::CAPTURE_COUNT),
            ambush_count: r.u8(&field::AMBUSH_COUNT),
            operate_count: r.u8(&field::OPERATE_COUNT),
            tournament_wins: r.u8(&field::TOURNAMENT_WINS),
            capture_realm: r.u16(&field::CAPTURE_REALM),
            ambush_realm: r.u16(&field::AMBUSH_REALM),
            operate_realm: r.u16(&field::OPERATE_REALM),
            poetry_wins: r.u8(&field::POETRY_WINS),
            debate_wins: r.u8(&field::DEBATE_WINS),
            merit: r.u16(&field::MERIT),
            army: r.u16(&field::ARMY),
            reserved: r.bytes(&field::RESERVED),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut w = BlobWriter::new(&SCHEMA);
        w.put_u16(&field::NEXT, self.next);
        w.put_u16(&field::FACE, self.face);
        w.put_bytes(&field::SURNAME, &self.surname);
        w.put_bytes(&field::GIVEN_NAME, &self.given_name);
        w.put_bytes(&field::STYLE_NAME, &self.style_name);
        w.put_u16(&field::REALM, self.realm);
        w.put_u16(&field::CITY, self.city);
        w.put_u16(&field::RELATION, self.relation);
        w.put_u16(&field::ITEM, self.item);
        w.put_u16(&field::SOLDIERS, self.soldiers);
        w.put_u16(&field::SALARY, self.salary);
        w.put_u8(&field::TRAINING, self.training);
        w.put_u8(&field::LOYALTY, self.loyalty);
        w.put_u8(&field::STRENGTH, self.strength);
        w.put_u8(&field::INTELLECT, self.intellect);
        w.put_u8(&field::POLITICS, self.politics);
        w.put_u8(&field::CHARISMA, self.charisma);
        w.put_u8(&field::STRENGTH_EXP, self.strength_exp);
        w.put_u8(&field::INTELLECT_EXP, self.intellect_exp);
        w.put_u8(&field::POLITICS_EXP, self.politics_exp);
        w.put_u8(&field::CHARISMA_EXP, self.charisma_exp);
        w.put_u8(&field::RANK, self.rank);
        w.put_u8(&field::STATE, self.state);
        w.put_u16(&field::BIRTH_YEAR, self.birth_year);
        w.put_u16(&field::DEBUT_YEAR, self.debut_year);
        w.put_u32(&field::SKILLS, self.skills);
        w.put_u16(&field::EQUIPMENT, self.equipment);
        w.put_u16(&field::PERSONALITY, self.personality);
        w.put_u32(&field::CONDITION, self.condition);
        w.put_u8(&field::CAPTURE_COUNT, self.capture_count);
        w.put_u8(&field::AMBUSH_COUNT, self.ambush_count);
        w.put_u8(&field::OPERATE_COUNT, self.operate_count);
        w.put_u8(&field::TOURNAMENT_WINS, self.tournament_wins);
        w.put_u16(&field::CAPTURE_REALM, self.capture_realm);
        w.put_u16(&field::AMBUSH_REALM, self.ambush_realm);
        w.put_u16(&field::OPERATE_REALM, self.operate_realm);
        w.put_u8(&field::POETRY_WINS, self.poetry_wins);
        w.put_u8(&field::DEBATE_WINS, self.debate_wins);
        w.put_u16(&field::MERIT, self.merit);
        w.put_u16(&field::ARMY, self.army);
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

impl General {
    pub fn surname(&self) -> String {
        text::decode_fixed(&self.surname)
    }

    pub fn given_name(&self) -> String {
        text::decode_fixed(&self.given_name)
    }

    pub fn style_name(&self) -> String {
        text::decode_fixed(&self.style_name)
    }

    /// Surname followed by given name, the form the save header uses for the player.
    pub fn name(&self) -> String {
        let mut name = self.surname();
        name.push_str(&self.given_name());
        name
    }

    pub fn set_surname(&mut self, surname: &str) -> Result<()> {
        text::store_fixed(&mut self.surname, surname)
    }

    pub fn set_given_name(&mut self, given_name: &str) -> Result<()> {
        text::store_fixed(&mut self.given_name, given_name)
    }

    pub fn set_style_name(&mut self, style_name: &str) -> Result<()> {
        text::store_fixed(&mut self.style_name, style_name)
    }

    pub fn packed(&self, attr: Packed) -> u32 {
        let (container, start, length) = attr.span();
        match container {
            Container::Personality => u32::from(extract_msb16(self.personality, start, length)),
            Container::Condition => extract_lsb32(self.condition, start, length),
            Container::Army => u32::from(extract_lsb16(self.army, start, length)),
        }
    }

    /// Stores `value` into the attribute's span, masked to the span width.
    pub fn set_packed(&mut self, attr: Packed, value: u32) {
        let (container, start, length) = attr.span();
        match container {
            Container::Personality => {
                self.personality = inject_msb16(self.personality, value as u16, start, length);
            }
            Container::Condition => {
                self.condition = inject_lsb32(self.condition, value, start, length);
            }
            Container::Army => {
                self.army = inject_lsb16(self.army, value as u16, start, length);
            }
        }
    }

    pub fn ambition(&self) -> u32 {
        self.packed(Packed::Ambition)
    }

    pub fn fidelity(&self) -> u32 {
        self.packed(Packed::Fidelity)
    }

    pub fn gender(&self) -> Gender {
        Gender::from_bit(self.packed(Packed::Gender) as u16)
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.set_packed(Packed::Gender, u32::from(gender.raw()));
    }

    pub fn job_name(&self) -> &'static str {
        name_or_unknown(&JOB_NAMES, self.packed(Packed::Job) as usize)
    }

    pub fn tendency_name(&self) -> &'static str {
        name_or_unknown(&TENDENCY_NAMES, self.packed(Packed::Tendency) as usize)
    }

    pub fn strategy_name(&self) -> &'static str {
        name_or_unknown(&STRATEGY_NAMES, self.packed(Packed::Strategy) as usize)
    }

    pub fn troop_type_name(&self) -> &'static str {
        name_or_unknown(&TROOP_TYPE_NAMES, self.packed(Packed::TroopType) as usize)
    }

    pub fn is_turned(&self) -> bool {
        self.packed(Packed::Turned) != 0
    }

    pub fn is_opposite(&self) -> bool {
        self.packed(Packed::Opposite) != 0
    }

    pub fn rank_name(&self) -> &'static str {
        name_or_unknown(&RANK_NAMES, self.rank as usize)
    }

    pub fn state(&self) -> GeneralState {
        GeneralState::from_raw(self.state)
    }

    pub fn stat_total(&self) -> u32 {
        u32::from(self.strength)
            + u32::from(self.intellect)
            + u32::from(self.politics)
            + u32::from(self.charisma)
    }

    pub fn skill_names(&self) -> Vec<&'static str> {
        flag_names(self.skills, &SKILL_NAMES)
    }

    pub fn skill_string(&self) -> String {
        self.skill_names().join(", ")
    }

    pub fn equipment_names(&self) -> Vec<&'static str> {
        flag_names(u32::from(self.equipment), &EQUIPMENT_NAMES)
    }

    pub fn equipment_string(&self) -> String {
        self.equipment_names().join(", ")
    }
}
