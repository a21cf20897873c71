// Record counts
pub const GENERAL_COUNT: usize = 620;
pub const ITEM_COUNT: usize = 72;
pub const REALM_COUNT: usize = 54;
pub const CITY_COUNT: usize = 54;

// --- Display name tables ---
// Bitmask tables are indexed by bit number: entry `i` names bit `i`.

pub const SKILL_NAMES: [&str; 32] = [
    "Fire Attack",
    "Ambush",
    "Rumor",
    "Entice",
    "Provoke",
    "Confuse",
    "Charge",
    "Volley",
    "Assault",
    "Naval",
    "Breach",
    "Trap",
    "Sorcery",
    "Rally",
    "Heal",
    "Scout",
    "Duel",
    "Poetry",
    "Debate",
    "Farming",
    "Commerce",
    "Construction",
    "Diplomacy",
    "Recruit",
    "Drill",
    "Taming",
    "Medicine",
    "Astrology",
    "Cavalry",
    "Archery",
    "Infantry",
    "Siege",
];

pub const EQUIPMENT_NAMES: [&str; 16] = [
    "Sword", "Spear", "Halberd", "Bow", "Crossbow", "Horse", "Armor", "Shield", "Helmet", "Book",
    "Seal", "Fan", "Wine", "Jade", "Herb", "Banner",
];

pub const ITEM_TYPE_NAMES: [&str; 8] = [
    "Sword", "Spear", "Bow", "Horse", "Book", "Seal", "Treasure", "Medicine",
];

pub const ITEM_PROPERTY_NAMES: [&str; 16] = [
    "Strength Bonus",
    "Intellect Bonus",
    "Politics Bonus",
    "Charisma Bonus",
    "Fire Ward",
    "Cures Injury",
    "Extends Life",
    "Swift Mount",
    "Duel Edge",
    "Volley Edge",
    "Naval Edge",
    "Night Sight",
    "Cursed",
    "Unique",
    "Imperial",
    "Ancient",
];

pub const RANK_NAMES: [&str; 8] = [
    "Ruler",
    "Viceroy",
    "Grand Marshal",
    "General",
    "Governor",
    "Advisor",
    "Officer",
    "Retainer",
];

pub const JOB_NAMES: [&str; 8] = [
    "Officer",
    "Warrior",
    "Strategist",
    "Scholar",
    "Merchant",
    "Bandit",
    "Hermit",
    "Physician",
];

pub const TENDENCY_NAMES: [&str; 8] = [
    "Balanced",
    "Military",
    "Civil",
    "Expansion",
    "Defensive",
    "Honorable",
    "Cunning",
    "Reckless",
];

pub const STRATEGY_NAMES: [&str; 8] = [
    "None", "Fire", "Water", "Ambush", "Siege", "Raid", "Alliance", "Intrigue",
];

pub const TROOP_TYPE_NAMES: [&str; 6] = [
    "Infantry", "Cavalry", "Archers", "Marines", "Siege", "Elite",
];

pub const CITY_NAMES: [&str; CITY_COUNT] = [
    "Xiangping",
    "Beiping",
    "Ji",
    "Nanpi",
    "Pingyuan",
    "Ye",
    "Jinyang",
    "Shangdang",
    "Beihai",
    "Langya",
    "Xiapi",
    "Xiaopei",
    "Shouchun",
    "Runan",
    "Xuchang",
    "Chenliu",
    "Puyang",
    "Qiao",
    "Luoyang",
    "Hongnong",
    "Chang'an",
    "Tianshui",
    "Anding",
    "Wuwei",
    "Xiliang",
    "Hanzhong",
    "Wudu",
    "Zitong",
    "Chengdu",
    "Jiangzhou",
    "Yong'an",
    "Jianning",
    "Yunnan",
    "Yongchang",
    "Wan",
    "Xinye",
    "Xiangyang",
    "Jiangling",
    "Jiangxia",
    "Changsha",
    "Wuling",
    "Lingling",
    "Guiyang",
    "Lujiang",
    "Jianye",
    "Wu",
    "Kuaiji",
    "Chaisang",
    "Jian'an",
    "Nanhai",
    "Jiaozhi",
    "Hefei",
    "Guangling",
    "Liaodong",
];

/// `table[index]`, or `"Unknown"` when the index is past the end.
pub fn name_or_unknown(table: &[&'static str], index: usize) -> &'static str {
    table.get(index).copied().unwrap_or("Unknown")
}
