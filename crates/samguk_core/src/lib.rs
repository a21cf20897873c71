pub mod bits;
pub mod cipher;
pub mod city;
pub mod codec;
pub mod edit;
pub mod error;
pub mod gender;
pub mod general;
pub mod item;
pub mod layout;
pub mod realm;
pub mod reader;
pub mod schema;
pub mod tables;
pub mod text;
pub mod world;

pub use cipher::SceneVariant;
pub use city::City;
pub use error::{ErrorCode, Result, SaveError};
pub use general::General;
pub use item::Item;
pub use realm::Realm;
pub use schema::Record;
pub use world::{Snapshot, WorldState};

/// Id value the save format uses for "none", "unowned" and "extinct".
pub const SENTINEL: u16 = 0xFFFF;
