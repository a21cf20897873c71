//! Field-by-name edits, used by the command line `--set-*` flags.
//!
//! Keys are the snake_case field names from the record schemas plus the
//! packed attribute names (`ambition`, `morale`, ...). Values are range
//! checked against the field's storage width before anything is written.

use std::fmt;
use std::str::FromStr;

use crate::bits::max_value;
use crate::city::City;
use crate::error::{Result, SaveError};
use crate::general::{General, Packed};
use crate::item::Item;

fn checked(field: &str, value: i64, max: u64) -> Result<u64> {
    if value < 0 || value as u64 > max {
        return Err(SaveError::InvalidValue {
            field: field.to_string(),
            value,
            reason: format!("expected 0..={max}"),
        });
    }
    Ok(value as u64)
}

fn to_u8(field: &str, value: i64) -> Result<u8> {
    Ok(checked(field, value, u64::from(u8::MAX))? as u8)
}

fn to_u16(field: &str, value: i64) -> Result<u16> {
    Ok(checked(field, value, u64::from(u16::MAX))? as u16)
}

fn to_u32(field: &str, value: i64) -> Result<u32> {
    Ok(checked(field, value, u64::from(u32::MAX))? as u32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralField {
    Face,
    Realm,
    City,
    Relation,
    Item,
    Soldiers,
    Salary,
    Training,
    Loyalty,
    Strength,
    Intellect,
    Politics,
    Charisma,
    StrengthExp,
    IntellectExp,
    PoliticsExp,
    CharismaExp,
    Rank,
    State,
    BirthYear,
    DebutYear,
    Skills,
    Equipment,
    Merit,
    Packed(Packed),
}

impl GeneralField {
    const PLAIN: [GeneralField; 24] = [
        Self::Face,
        Self::Realm,
        Self::City,
        Self::Relation,
        Self::Item,
        Self::Soldiers,
        Self::Salary,
        Self::Training,
        Self::Loyalty,
        Self::Strength,
        Self::Intellect,
        Self::Politics,
        Self::Charisma,
        Self::StrengthExp,
        Self::IntellectExp,
        Self::PoliticsExp,
        Self::CharismaExp,
        Self::Rank,
        Self::State,
        Self::BirthYear,
        Self::DebutYear,
        Self::Skills,
        Self::Equipment,
        Self::Merit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Face => "face",
            Self::Realm => "realm",
            Self::City => "city",
            Self::Relation => "relation",
            Self::Item => "item",
            Self::Soldiers => "soldiers",
            Self::Salary => "salary",
            Self::Training => "training",
            Self::Loyalty => "loyalty",
            Self::Strength => "strength",
            Self::Intellect => "intellect",
            Self::Politics => "politics",
            Self::Charisma => "charisma",
            Self::StrengthExp => "strength_exp",
            Self::IntellectExp => "intellect_exp",
            Self::PoliticsExp => "politics_exp",
            Self::CharismaExp => "charisma_exp",
            Self::Rank => "rank",
            Self::State => "state",
            Self::BirthYear => "birth_year",
            Self::DebutYear => "debut_year",
            Self::Skills => "skills",
            Self::Equipment => "equipment",
            Self::Merit => "merit",
            Self::Packed(attr) => attr.name(),
        }
    }

    pub fn apply(self, general: &mut General, value: i64) -> Result<()> {
        let name = self.name();
        match self {
            Self::Face => general.face = to_u16(name, value)?,
            Self::Realm => general.realm = to_u16(name, value)?,
            Self::City => general.city = to_u16(name, value)?,
            Self::Relation => general.relation = to_u16(name, value)?,
            Self::Item => general.item = to_u16(name, value)?,
            Self::Soldiers => general.soldiers = to_u16(name, value)?,
            Self::Salary => general.salary = to_u16(name, value)?,
            Self::Training => general.training = to_u8(name, value)?,
            Self::Loyalty => general.loyalty = to_u8(name, value)?,
            Self::Strength => general.strength = to_u8(name, value)?,
            Self::Intellect => general.intellect = to_u8(name, value)?,
            Self::Politics => general.politics = to_u8(name, value)?,
            Self::Charisma => general.charisma = to_u8(name, value)?,
            Self::StrengthExp => general.strength_exp = to_u8(name, value)?,
            Self::IntellectExp => general.intellect_exp = to_u8(name, value)?,
            Self::PoliticsExp => general.politics_exp = to_u8(name, value)?,
            Self::CharismaExp => general.charisma_exp = to_u8(name, value)?,
            Self::Rank => general.rank = to_u8(name, value)?,
            Self::State => general.state = to_u8(name, value)?,
            Self::BirthYear => general.birth_year = to_u16(name, value)?,
            Self::DebutYear => general.debut_year = to_u16(name, value)?,
            Self::Skills => general.skills = to_u32(name, value)?,
            Self::Equipment => general.equipment = to_u16(name, value)?,
            Self::Merit => general.merit = to_u16(name, value)?,
            Self::Packed(attr) => {
                // The packed setter masks silently; edits reject instead.
                let v = checked(name, value, max_value(attr.bits()))?;
                general.set_packed(attr, v as u32);
            }
        }
        Ok(())
    }
}

impl FromStr for GeneralField {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::PLAIN
            .into_iter()
            .chain(Packed::ALL.into_iter().map(Self::Packed))
            .find(|f| f.name() == s)
            .ok_or_else(|| SaveError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for GeneralField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Owner,
    Market,
    ItemType,
    Bonus,
    /// Displayed price in gold; stored in hundreds.
    Price,
    Next,
    Properties,
}

impl ItemField {
    const ALL: [ItemField; 7] = [
        Self::Owner,
        Self::Market,
        Self::ItemType,
        Self::Bonus,
        Self::Price,
        Self::Next,
        Self::Properties,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Market => "market",
            Self::ItemType => "item_type",
            Self::Bonus => "bonus",
            Self::Price => "price",
            Self::Next => "next",
            Self::Properties => "properties",
        }
    }

    pub fn apply(self, item: &mut Item, value: i64) -> Result<()> {
        let name = self.name();
        match self {
            Self::Owner => item.owner = to_u16(name, value)?,
            Self::Market => item.market = to_u8(name, value)?,
            Self::ItemType => item.item_type = to_u8(name, value)?,
            Self::Bonus => item.bonus = to_u8(name, value)?,
            Self::Price => item.set_price(to_u32(name, value)?)?,
            Self::Next => item.next = to_u16(name, value)?,
            Self::Properties => item.properties = to_u32(name, value)?,
        }
        Ok(())
    }
}

impl FromStr for ItemField {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| SaveError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityField {
    Gold,
    Food,
    Governor,
    Population,
    Development,
    DevelopmentMax,
    Shop,
    ShopMax,
    Security,
    Defense,
    Tech,
    Realm,
}

impl CityField {
    const ALL: [CityField; 12] = [
        Self::Gold,
        Self::Food,
        Self::Governor,
        Self::Population,
        Self::Development,
        Self::DevelopmentMax,
        Self::Shop,
        Self::ShopMax,
        Self::Security,
        Self::Defense,
        Self::Tech,
        Self::Realm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Food => "food",
            Self::Governor => "governor",
            Self::Population => "population",
            Self::Development => "development",
            Self::DevelopmentMax => "development_max",
            Self::Shop => "shop",
            Self::ShopMax => "shop_max",
            Self::Security => "security",
            Self::Defense => "defense",
            Self::Tech => "tech",
            Self::Realm => "realm",
        }
    }

    pub fn apply(self, city: &mut City, value: i64) -> Result<()> {
        let name = self.name();
        match self {
            Self::Gold => city.gold = to_u32(name, value)?,
            Self::Food => city.food = to_u32(name, value)?,
            Self::Governor => city.governor = to_u16(name, value)?,
            Self::Population => city.population = to_u32(name, value)?,
            Self::Development => city.development = to_u16(name, value)?,
            Self::DevelopmentMax => city.development_max = to_u16(name, value)?,
            Self::Shop => city.shop = to_u16(name, value)?,
            Self::ShopMax => city.shop_max = to_u16(name, value)?,
            Self::Security => city.security = to_u8(name, value)?,
            Self::Defense => city.defense = to_u16(name, value)?,
            Self::Tech => city.tech = to_u8(name, value)?,
            Self::Realm => city.realm = to_u16(name, value)?,
        }
        Ok(())
    }
}

impl FromStr for CityField {
    type Err = SaveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| SaveError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for CityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Player gold is a bare u16 in the save.
pub fn gold_from(value: i64) -> Result<u16> {
    to_u16("gold", value)
}
