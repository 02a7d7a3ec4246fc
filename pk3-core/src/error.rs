//! Errors raised while decoding or encoding records

use crate::substructure::SubstructureKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("field `{field}` needs {needed} bytes but the buffer holds {actual}")]
    Length {
        field: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("record buffer must be {expected} bytes, got {actual}")]
    RecordSize { expected: usize, actual: usize },

    #[error("cipher input length {0} is not a multiple of 4")]
    Alignment(usize),

    #[error("unknown {table} id {raw} in field `{field}`")]
    UnknownSymbol {
        field: &'static str,
        table: &'static str,
        raw: u64,
    },

    #[error("unknown {table} name `{name}` in field `{field}`")]
    UnknownName {
        field: &'static str,
        table: &'static str,
        name: String,
    },

    #[error("value {value} does not fit in the {size} byte(s) of field `{field}`")]
    Overflow {
        field: &'static str,
        value: u64,
        size: usize,
    },

    #[error("integer field `{field}` is {size} bytes wide; at most 8 are supported")]
    IntWidth { field: &'static str, size: usize },

    #[error("character {0:?} has no byte in the game character set")]
    Unencodable(char),

    #[error("personality value and trainer id are both zero; the record would read back as an empty slot")]
    EmptyIdentity,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` holds the wrong kind of value")]
    TypeMismatch(&'static str),

    #[error("substructure {0:?} appears more than once")]
    DuplicateSubstructure(SubstructureKind),

    #[error("substructure {0:?} is missing")]
    MissingSubstructure(SubstructureKind),

    #[error("move slot {0} out of range (expected 0..4)")]
    MoveSlot(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
