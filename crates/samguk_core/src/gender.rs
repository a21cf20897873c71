use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const MALE_RAW: u16 = 0;
    pub const FEMALE_RAW: u16 = 1;

    /// Gender is a single bit in the personality word, so every raw value maps.
    pub fn from_bit(raw: u16) -> Self {
        if raw & 1 == Self::FEMALE_RAW {
            Self::Female
        } else {
            Self::Male
        }
    }

    pub fn raw(&self) -> u16 {
        match *self {
            Self::Male => Self::MALE_RAW,
            Self::Female => Self::FEMALE_RAW,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
