use std::fmt;
use std::io;
use std::ops::Range;

use crate::city::CITY_SIZE;
use crate::error::{Result, SaveError};
use crate::general::GENERAL_SIZE;
use crate::item::ITEM_SIZE;
use crate::realm::REALM_SIZE;
use crate::tables::{CITY_COUNT, GENERAL_COUNT, ITEM_COUNT, REALM_COUNT};

// Header scalars, stored without the cipher.
pub const YEAR: usize = 0x19;
pub const MONTH: usize = 0x1B;
pub const PLAYER_NAME: usize = 0x1C;
pub const PLAYER_NAME_LEN: usize = 8;
pub const SCENE: usize = 0x24;
pub const HEADER_TAIL: usize = 0x25;

pub const PLAYER_GOLD: usize = 0x15F10;
pub const GOLD_SKIP: usize = 0x15F12;
pub const PLAYER_INDEX: usize = 0x15F14;
pub const RELATIONS: usize = 0x15F16;
pub const SENTIMENTS: usize = 0x163EE;
/// First byte past the last region the codec understands.
pub const LAYOUT_END: usize = 0x16424;

/// A fixed array of equally sized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordArray {
    pub base: usize,
    pub size: usize,
    pub count: usize,
}

impl RecordArray {
    pub const fn offset(&self, slot: usize) -> usize {
        self.base + slot * self.size
    }

    pub fn slot_range(&self, slot: usize) -> Range<usize> {
        let start = self.offset(slot);
        start..start + self.size
    }

    pub const fn end(&self) -> usize {
        self.base + self.count * self.size
    }
}

pub const GENERALS: RecordArray = RecordArray {
    base: 0x40,
    size: GENERAL_SIZE,
    count: GENERAL_COUNT,
};
pub const ITEMS: RecordArray = RecordArray {
    base: 0x122E0,
    size: ITEM_SIZE,
    count: ITEM_COUNT,
};
pub const REALMS: RecordArray = RecordArray {
    base: 0x12E20,
    size: REALM_SIZE,
    count: REALM_COUNT,
};
pub const CITIES: RecordArray = RecordArray {
    base: 0x15190,
    size: CITY_SIZE,
    count: CITY_COUNT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    Header,
    Year,
    Month,
    PlayerName,
    Scene,
    HeaderTail,
    Generals,
    Items,
    Realms,
    Cities,
    PlayerGold,
    GoldSkip,
    PlayerIndex,
    Relations,
    Sentiments,
    Trailer,
}

impl SectionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Year => "year",
            Self::Month => "month",
            Self::PlayerName => "player_name",
            Self::Scene => "scene",
            Self::HeaderTail => "header_tail",
            Self::Generals => "generals",
            Self::Items => "items",
            Self::Realms => "realms",
            Self::Cities => "cities",
            Self::PlayerGold => "player_gold",
            Self::GoldSkip => "gold_skip",
            Self::PlayerIndex => "player_index",
            Self::Relations => "relations",
            Self::Sentiments => "sentiments",
            Self::Trailer => "trailer",
        }
    }

    /// Whether the region is stored through the cipher.
    pub fn is_ciphered(&self) -> bool {
        matches!(
            self,
            Self::Generals
                | Self::Items
                | Self::Realms
                | Self::Cities
                | Self::PlayerGold
                | Self::PlayerIndex
                | Self::Relations
                | Self::Sentiments
        )
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    pub id: SectionId,
    pub range: ByteRange,
}

#[derive(Debug, Clone)]
pub struct FileLayout {
    pub file_len: usize,
    pub sections: Vec<SectionLayout>,
}

impl FileLayout {
    pub fn section(&self, id: SectionId) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn validate(&self) -> io::Result<()> {
        let Some(first) = self.sections.first() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "file layout must contain at least one section",
            ));
        };

        if first.range.start != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "layout does not start at byte 0",
            ));
        }

        let mut expected = 0usize;
        for section in &self.sections {
            if section.range.start != expected {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "layout gap/overlap around section {}: expected start {:#x}, got {:#x}",
                        section.id, expected, section.range.start
                    ),
                ));
            }
            if section.range.end < section.range.start {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "invalid section range {}: {:#x}..{:#x}",
                        section.id, section.range.start, section.range.end
                    ),
                ));
            }
            expected = section.range.end;
        }

        if expected != self.file_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "layout does not cover file: ended at {}, file length {}",
                    expected, self.file_len
                ),
            ));
        }

        Ok(())
    }
}

/// The fixed section map shared by every save of this format.
pub struct SaveLayout;

impl SaveLayout {
    /// Ordered sections of a save image of `file_len` bytes. Bytes past
    /// [`LAYOUT_END`] form the trailer, which may be empty.
    pub fn sections(file_len: usize) -> Result<FileLayout> {
        if file_len < LAYOUT_END {
            return Err(SaveError::Truncated {
                needed: LAYOUT_END,
                actual: file_len,
            });
        }

        let spans = [
            (SectionId::Header, 0, YEAR),
            (SectionId::Year, YEAR, MONTH),
            (SectionId::Month, MONTH, PLAYER_NAME),
            (SectionId::PlayerName, PLAYER_NAME, SCENE),
            (SectionId::Scene, SCENE, HEADER_TAIL),
            (SectionId::HeaderTail, HEADER_TAIL, GENERALS.base),
            (SectionId::Generals, GENERALS.base, GENERALS.end()),
            (SectionId::Items, ITEMS.base, ITEMS.end()),
            (SectionId::Realms, REALMS.base, REALMS.end()),
            (SectionId::Cities, CITIES.base, CITIES.end()),
            (SectionId::PlayerGold, PLAYER_GOLD, GOLD_SKIP),
            (SectionId::GoldSkip, GOLD_SKIP, PLAYER_INDEX),
            (SectionId::PlayerIndex, PLAYER_INDEX, RELATIONS),
            (SectionId::Relations, RELATIONS, SENTIMENTS),
            (SectionId::Sentiments, SENTIMENTS, LAYOUT_END),
            (SectionId::Trailer, LAYOUT_END, file_len),
        ];

        let layout = FileLayout {
            file_len,
            sections: spans
                .into_iter()
                .map(|(id, start, end)| SectionLayout {
                    id,
                    range: ByteRange { start, end },
                })
                .collect(),
        };
        layout.validate()?;
        Ok(layout)
    }
}
