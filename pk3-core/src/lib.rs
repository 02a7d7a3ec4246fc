//! core functionality for reading and writing Generation III
//! creature records (`.pk3` boxed and party slots)
//!
//! # Modules
//!
//! - `field`: declarative field codec (layouts, typed values, symbol maps)
//! - `crypto`: payload XOR cipher
//! - `codec`: record sizes, checksum and payload (de|en)cryption
//! - `substructure`: the four payload substructures and their ordering
//! - `bits`: bit-packed IV/egg/ability word
//! - `record`: boxed and active party records
//! - `builder`: fresh records with default stats
//! - `symbols`: id/name tables and the game character set

pub mod bits;
pub mod builder;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod field;
pub mod record;
pub mod substructure;
pub mod symbols;

// Re-export commonly used items
pub use bits::BitContainer;
pub use builder::RecordBuilder;
pub use codec::{ACTIVE_SIZE, BOXED_SIZE, PAYLOAD_SIZE, calc_checksum, is_empty_slot};
pub use crypto::{PayloadCipher, derive_key};
pub use error::{Error, Result};
pub use field::{
    DecodeMode, FieldCodec, FieldKind, FieldSpec, FieldValue, Fields, Layout, MAX_INT_SIZE, Text,
};
pub use record::{ActiveRecord, BattleState, BoxedRecord};
pub use substructure::{
    Attack, EffortValues, Growth, Misc, Substructure, SubstructureKind, SubstructureSet,
    order_for,
};
pub use symbols::{Charset, GEN3_CHARSET, MOVES, SymbolTable, TEXT_TERMINATOR};
