//! Declarative field layouts over fixed-size byte buffers
//!
//! A [`FieldCodec`] maps named fields to `[offset, offset + size)` ranges and
//! converts between raw bytes and a [`Fields`] map of typed values. Offsets
//! are authoritative; the order of the descriptors does not matter.

use crate::error::{Error, Result};
use crate::symbols::{GEN3_CHARSET, SymbolTable, TEXT_TERMINATOR};
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How to treat raw values that have no entry in a field's symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Unknown ids are an error
    #[default]
    Strict,
    /// Unknown ids pass through as plain integers
    Lenient,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Little-endian unsigned integer, 1 to [`MAX_INT_SIZE`] bytes
    Int,
    /// Fixed-width text in the game character set, 0xFF padded on encode
    Text,
    /// Opaque bytes kept verbatim
    Raw,
    /// Integer translated through a symbol table
    Symbol(&'static SymbolTable),
    /// Opaque region handed to a nested codec by the owner of the layout
    Payload,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub offset: usize,
    pub size: usize,
}

impl FieldSpec {
    /// Little-endian unsigned integer of `size` bytes (at most [`MAX_INT_SIZE`])
    pub const fn int(name: &'static str, offset: usize, size: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Int,
            offset,
            size,
        }
    }

    /// Fixed-width text in the game character set
    pub const fn text(name: &'static str, offset: usize, size: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            offset,
            size,
        }
    }

    /// Opaque bytes
    pub const fn raw(name: &'static str, offset: usize, size: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Raw,
            offset,
            size,
        }
    }

    /// Integer translated through `table` (at most [`MAX_INT_SIZE`] bytes)
    pub const fn symbol(
        name: &'static str,
        offset: usize,
        size: usize,
        table: &'static SymbolTable,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Symbol(table),
            offset,
            size,
        }
    }

    /// Region decoded by a nested codec
    pub const fn payload(name: &'static str, offset: usize, size: usize) -> Self {
        Self {
            name,
            kind: FieldKind::Payload,
            offset,
            size,
        }
    }

    /// First byte past the field
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }

    fn slice<'a>(&self, buf: &'a [u8]) -> Result<&'a [u8]> {
        buf.get(self.offset..self.end()).ok_or(Error::Length {
            field: self.name,
            needed: self.end(),
            actual: buf.len(),
        })
    }

    fn check_int_width(&self) -> Result<()> {
        match self.kind {
            FieldKind::Int | FieldKind::Symbol(_) if self.size > MAX_INT_SIZE => {
                Err(Error::IntWidth {
                    field: self.name,
                    size: self.size,
                })
            }
            _ => Ok(()),
        }
    }

    fn decode_value(&self, raw: &[u8], mode: DecodeMode) -> Result<FieldValue> {
        self.check_int_width()?;
        let value = match self.kind {
            FieldKind::Int => FieldValue::Int(read_le(raw)),
            FieldKind::Text => FieldValue::Text(Text::from_bytes(raw)),
            FieldKind::Raw | FieldKind::Payload => FieldValue::Bytes(raw.to_vec()),
            FieldKind::Symbol(table) => {
                let id = read_le(raw);
                match table.name(id) {
                    Some(name) => FieldValue::Symbol(name.to_string()),
                    None if mode == DecodeMode::Lenient => FieldValue::Int(id),
                    None => {
                        return Err(Error::UnknownSymbol {
                            field: self.name,
                            table: table.kind(),
                            raw: id,
                        });
                    }
                }
            }
        };
        Ok(value)
    }

    fn encode_value(&self, value: &FieldValue) -> Result<Vec<u8>> {
        match (self.kind, value) {
            (FieldKind::Int | FieldKind::Symbol(_), FieldValue::Int(v)) => self.pack_int(*v),
            (FieldKind::Symbol(table), FieldValue::Symbol(name)) => {
                let id = table.id(name).ok_or_else(|| Error::UnknownName {
                    field: self.name,
                    table: table.kind(),
                    name: name.clone(),
                })?;
                self.pack_int(id)
            }
            (FieldKind::Text, FieldValue::Text(text)) => Ok(text.fit(self.size)),
            (FieldKind::Raw | FieldKind::Payload, FieldValue::Bytes(bytes)) => {
                if bytes.len() != self.size {
                    return Err(Error::Length {
                        field: self.name,
                        needed: self.size,
                        actual: bytes.len(),
                    });
                }
                Ok(bytes.clone())
            }
            _ => Err(Error::TypeMismatch(self.name)),
        }
    }

    fn pack_int(&self, value: u64) -> Result<Vec<u8>> {
        self.check_int_width()?;
        if self.size < MAX_INT_SIZE && value >> (self.size * 8) != 0 {
            return Err(Error::Overflow {
                field: self.name,
                value,
                size: self.size,
            });
        }
        Ok(value.to_le_bytes()[..self.size].to_vec())
    }
}

/// `?` in the game character set
const UNKNOWN_CHAR: u8 = 0xAC;

/// Widest integer field a codec can carry
pub const MAX_INT_SIZE: usize = 8;

#[inline]
fn read_le(raw: &[u8]) -> u64 {
    raw.iter().rev().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

/// Fixed-width text in the game character set, kept byte for byte so
/// re-encoding is lossless.
///
/// Equality ignores trailing 0xFF padding: `"AB"` equals the decoded
/// `[0xBB, 0xBC, 0xFF, 0xFF, 0xFF]`.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Text(Vec<u8>);

impl Text {
    /// Wraps bytes already in the game character set
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Encodes `s` in the game character set, failing on the first
    /// character it has no byte for
    pub fn encode(s: &str) -> Result<Self> {
        s.chars()
            .map(|ch| GEN3_CHARSET.byte_of(ch).ok_or(Error::Unencodable(ch)))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Readable view: stops at the 0xFF terminator, shows bytes outside the
    /// character set as U+FFFD and drops trailing spaces.
    pub fn to_string_lossy(&self) -> String {
        let text: String = self
            .0
            .iter()
            .take_while(|&&b| b != TEXT_TERMINATOR)
            .map(|&b| GEN3_CHARSET.char_of(b).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        text.trim_end_matches(' ').to_string()
    }

    fn unpadded(&self) -> &[u8] {
        let end = self
            .0
            .iter()
            .rposition(|&b| b != TEXT_TERMINATOR)
            .map_or(0, |i| i + 1);
        &self.0[..end]
    }

    /// Bytes padded with the terminator or truncated to `size`
    fn fit(&self, size: usize) -> Vec<u8> {
        let mut bytes = self.0.clone();
        bytes.resize(size, TEXT_TERMINATOR);
        bytes
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.unpadded() == other.unpadded()
    }
}

impl Eq for Text {}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unpadded().hash(state);
    }
}

impl From<&str> for Text {
    /// Characters outside the game character set become `?`
    fn from(s: &str) -> Self {
        Self(
            s.chars()
                .map(|ch| GEN3_CHARSET.byte_of(ch).unwrap_or(UNKNOWN_CHAR))
                .collect(),
        )
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Text({:?})", self.to_string_lossy())
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// A decoded field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(u64),
    Text(Text),
    Bytes(Vec<u8>),
    Symbol(String),
}

/// Field values by name, in layout order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fields {
    values: IndexMap<&'static str, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        self.values.insert(name, value);
    }

    pub fn with(mut self, name: &'static str, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn extend(&mut self, other: Fields) {
        self.values.extend(other.values);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    fn require(&self, name: &'static str) -> Result<&FieldValue> {
        self.values.get(name).ok_or(Error::MissingField(name))
    }

    pub fn int(&self, name: &'static str) -> Result<u64> {
        match self.require(name)? {
            FieldValue::Int(v) => Ok(*v),
            _ => Err(Error::TypeMismatch(name)),
        }
    }

    pub fn u8(&self, name: &'static str) -> Result<u8> {
        narrow(name, self.int(name)?, 1)
    }

    pub fn u16(&self, name: &'static str) -> Result<u16> {
        narrow(name, self.int(name)?, 2)
    }

    pub fn u32(&self, name: &'static str) -> Result<u32> {
        narrow(name, self.int(name)?, 4)
    }

    pub fn text(&self, name: &'static str) -> Result<&Text> {
        match self.require(name)? {
            FieldValue::Text(t) => Ok(t),
            _ => Err(Error::TypeMismatch(name)),
        }
    }

    pub fn bytes(&self, name: &'static str) -> Result<&[u8]> {
        match self.require(name)? {
            FieldValue::Bytes(b) => Ok(b),
            _ => Err(Error::TypeMismatch(name)),
        }
    }

    /// Raw bytes of a field that must be exactly `N` long
    pub fn byte_array<const N: usize>(&self, name: &'static str) -> Result<[u8; N]> {
        let bytes = self.bytes(name)?;
        bytes.try_into().map_err(|_| Error::Length {
            field: name,
            needed: N,
            actual: bytes.len(),
        })
    }

    /// Raw id of a symbolic field, whether it decoded to a name or passed
    /// through as an integer
    pub fn symbol_id(&self, name: &'static str, table: &SymbolTable) -> Result<u64> {
        match self.require(name)? {
            FieldValue::Int(v) => Ok(*v),
            FieldValue::Symbol(symbol) => table.id(symbol).ok_or_else(|| Error::UnknownName {
                field: name,
                table: table.kind(),
                name: symbol.clone(),
            }),
            _ => Err(Error::TypeMismatch(name)),
        }
    }
}

fn narrow<T: TryFrom<u64>>(field: &'static str, value: u64, size: usize) -> Result<T> {
    T::try_from(value).map_err(|_| Error::Overflow { field, value, size })
}

/// A fixed-size layout of named fields.
///
/// A codec may extend a base codec: the base fields keep their offsets and
/// occupy the start of the larger buffer.
#[derive(Debug)]
pub struct FieldCodec {
    name: &'static str,
    base: Option<&'static FieldCodec>,
    fields: &'static [FieldSpec],
    size: usize,
}

impl FieldCodec {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec], size: usize) -> Self {
        Self {
            name,
            base: None,
            fields,
            size,
        }
    }

    /// Layout whose first bytes are `base`; `fields` follow it
    pub const fn extending(
        name: &'static str,
        base: &'static FieldCodec,
        fields: &'static [FieldSpec],
        size: usize,
    ) -> Self {
        Self {
            name,
            base: Some(base),
            fields,
            size,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Total buffer size covered by the layout
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn base(&self) -> Option<&'static FieldCodec> {
        self.base
    }

    /// All descriptors, base layout first
    pub fn fields(&self) -> Vec<&'static FieldSpec> {
        let mut all = self.base.map(|base| base.fields()).unwrap_or_default();
        all.extend(self.fields.iter());
        all
    }

    /// Descriptor by name, searching the base layout too
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().into_iter().find(|spec| spec.name == name)
    }

    /// Reads every field; fails if `buf` is shorter than a field's extent
    pub fn decode(&self, buf: &[u8], mode: DecodeMode) -> Result<Fields> {
        let mut out = Fields::new();
        for spec in self.fields() {
            let raw = spec.slice(buf)?;
            out.insert(spec.name, spec.decode_value(raw, mode)?);
        }
        Ok(out)
    }

    /// Writes every field at its offset into a zeroed buffer of `size` bytes
    pub fn encode(&self, fields: &Fields) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.size];
        for spec in self.fields() {
            let value = fields.require(spec.name)?;
            let bytes = spec.encode_value(value)?;
            let actual = buf.len();
            let target = buf.get_mut(spec.offset..spec.end()).ok_or(Error::Length {
                field: spec.name,
                needed: spec.end(),
                actual,
            })?;
            target.copy_from_slice(&bytes);
        }
        Ok(buf)
    }
}

/// A typed value with a fixed field layout
pub trait Layout: Sized {
    fn codec() -> &'static FieldCodec;

    fn from_fields(fields: &Fields) -> Result<Self>;

    fn to_fields(&self) -> Fields;

    fn decode(bytes: &[u8], mode: DecodeMode) -> Result<Self> {
        Self::from_fields(&Self::codec().decode(bytes, mode)?)
    }

    fn encode(&self) -> Result<Vec<u8>> {
        Self::codec().encode(&self.to_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::MOVES;

    // Descriptors deliberately out of byte order
    static SAMPLE_FIELDS: [FieldSpec; 5] = [
        FieldSpec::text("name", 4, 5),
        FieldSpec::int("id", 0, 2),
        FieldSpec::int("flags", 2, 1),
        FieldSpec::symbol("move", 9, 2, &MOVES),
        FieldSpec::raw("reserved", 3, 1),
    ];
    static SAMPLE: FieldCodec = FieldCodec::new("sample", &SAMPLE_FIELDS, 11);

    static TRAILER_FIELDS: [FieldSpec; 1] = [FieldSpec::int("extra", 11, 4)];
    static EXTENDED: FieldCodec = FieldCodec::extending("extended", &SAMPLE, &TRAILER_FIELDS, 15);

    fn sample_bytes() -> Vec<u8> {
        vec![
            0x34, 0x12, // id
            0x07, // flags
            0xEE, // reserved
            0xBB, 0xCD, 0xC2, 0xFF, 0xFF, // name "ASH"
            0x21, 0x00, // move 33
        ]
    }

    #[test]
    fn test_decode_by_offset() {
        let fields = SAMPLE.decode(&sample_bytes(), DecodeMode::Strict).unwrap();

        assert_eq!(fields.int("id").unwrap(), 0x1234);
        assert_eq!(fields.u8("flags").unwrap(), 7);
        assert_eq!(fields.bytes("reserved").unwrap(), &[0xEE]);
        assert_eq!(fields.text("name").unwrap().to_string_lossy(), "ASH");
        assert_eq!(fields.get("move"), Some(&FieldValue::Symbol("Tackle".into())));
    }

    #[test]
    fn test_encode_is_inverse_of_decode() {
        let bytes = sample_bytes();
        let fields = SAMPLE.decode(&bytes, DecodeMode::Strict).unwrap();
        assert_eq!(SAMPLE.encode(&fields).unwrap(), bytes);
    }

    #[test]
    fn test_short_buffer() {
        let err = SAMPLE.decode(&sample_bytes()[..10], DecodeMode::Strict).unwrap_err();
        assert_eq!(
            err,
            Error::Length {
                field: "move",
                needed: 11,
                actual: 10
            }
        );
    }

    #[test]
    fn test_unknown_symbol_strict_and_lenient() {
        let mut bytes = sample_bytes();
        bytes[9] = 0xFF;
        bytes[10] = 0x01;

        let err = SAMPLE.decode(&bytes, DecodeMode::Strict).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownSymbol {
                field: "move",
                table: "move",
                raw: 0x1FF
            }
        );

        let fields = SAMPLE.decode(&bytes, DecodeMode::Lenient).unwrap();
        assert_eq!(fields.get("move"), Some(&FieldValue::Int(0x1FF)));
        assert_eq!(SAMPLE.encode(&fields).unwrap(), bytes);
    }

    #[test]
    fn test_encode_through_reverse_map() {
        let mut fields = SAMPLE.decode(&sample_bytes(), DecodeMode::Strict).unwrap();
        fields.insert("move", FieldValue::Symbol("Thunderbolt".into()));
        let bytes = SAMPLE.encode(&fields).unwrap();
        assert_eq!(&bytes[9..11], &[85, 0]);

        fields.insert("move", FieldValue::Symbol("Not A Move".into()));
        assert!(matches!(
            SAMPLE.encode(&fields),
            Err(Error::UnknownName { field: "move", .. })
        ));
    }

    #[test]
    fn test_text_padding_and_truncation() {
        let mut fields = SAMPLE.decode(&sample_bytes(), DecodeMode::Strict).unwrap();

        fields.insert("name", FieldValue::Text("AB".into()));
        let bytes = SAMPLE.encode(&fields).unwrap();
        assert_eq!(&bytes[4..9], &[0xBB, 0xBC, 0xFF, 0xFF, 0xFF]);

        fields.insert("name", FieldValue::Text("ABCDEFGH".into()));
        let bytes = SAMPLE.encode(&fields).unwrap();
        assert_eq!(&bytes[4..9], &[0xBB, 0xBC, 0xBD, 0xBE, 0xBF]);
    }

    #[test]
    fn test_encode_errors() {
        let base = SAMPLE.decode(&sample_bytes(), DecodeMode::Strict).unwrap();

        let overflow = base.clone().with("flags", FieldValue::Int(256));
        assert_eq!(
            SAMPLE.encode(&overflow).unwrap_err(),
            Error::Overflow {
                field: "flags",
                value: 256,
                size: 1
            }
        );

        let mismatch = base.clone().with("id", FieldValue::Text("x".into()));
        assert_eq!(SAMPLE.encode(&mismatch).unwrap_err(), Error::TypeMismatch("id"));

        let wrong_len = base.clone().with("reserved", FieldValue::Bytes(vec![1, 2]));
        assert!(matches!(
            SAMPLE.encode(&wrong_len),
            Err(Error::Length { field: "reserved", .. })
        ));

        let mut missing = Fields::new();
        missing.insert("id", FieldValue::Int(1));
        assert!(matches!(SAMPLE.encode(&missing), Err(Error::MissingField(_))));
    }

    #[test]
    fn test_extended_layout_aliases_base() {
        let mut bytes = sample_bytes();
        bytes.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

        let fields = EXTENDED.decode(&bytes, DecodeMode::Strict).unwrap();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields.int("extra").unwrap(), 0xDEAD_BEEF);
        assert_eq!(fields.int("id").unwrap(), 0x1234);

        let base_fields = SAMPLE.decode(&bytes[..11], DecodeMode::Strict).unwrap();
        let encoded = EXTENDED.encode(&fields).unwrap();
        assert_eq!(&encoded[..11], SAMPLE.encode(&base_fields).unwrap().as_slice());
        assert_eq!(encoded, bytes);

        assert_eq!(EXTENDED.field("id").map(|f| f.offset), Some(0));
        assert_eq!(EXTENDED.base().map(|b| b.name()), Some("sample"));
    }

    #[test]
    fn test_text_uses_game_charset() {
        let pika = Text::from_bytes(&[0xCA, 0xC3, 0xC5, 0xBB, 0xFF, 0xFF, 0xFF]);
        assert_eq!(pika.to_string_lossy(), "PIKA");
        assert_eq!(Text::from("PIKA"), pika);
        assert_eq!(&Text::from("Mr. Mime").as_bytes()[..4], &[0xC7, 0xE6, 0xAD, 0x00]);
    }

    #[test]
    fn test_text_lossy_view() {
        // 0x00 is a space, 0xFF terminates, anything after is ignored
        let text = Text::from_bytes(&[0xCC, 0xBF, 0xBE, 0x00, 0xFF, 0xBB]);
        assert_eq!(text.to_string_lossy(), "RED");
        assert_eq!(text.as_bytes().len(), 6);

        let unmapped = Text::from_bytes(&[0xBB, 0x01, 0xFF]);
        assert_eq!(unmapped.to_string_lossy(), "A\u{FFFD}");
    }

    #[test]
    fn test_text_encode() {
        assert_eq!(Text::encode("May").unwrap().as_bytes(), &[0xC7, 0xD5, 0xED]);
        assert_eq!(Text::encode("A#B").unwrap_err(), Error::Unencodable('#'));
        assert_eq!(Text::from("A#B").as_bytes(), &[0xBB, 0xAC, 0xBC]);
    }

    #[test]
    fn test_text_equality_ignores_padding() {
        assert_eq!(Text::from("AB"), Text::from_bytes(&[0xBB, 0xBC, 0xFF, 0xFF, 0xFF]));
        assert_ne!(Text::from("AB"), Text::from_bytes(&[0xBB, 0xBC, 0x00, 0xFF]));
        assert_eq!(Text::default(), Text::from_bytes(&[0xFF; 7]));
    }

    #[test]
    fn test_int_wider_than_u64_is_rejected() {
        static WIDE_FIELDS: [FieldSpec; 1] = [FieldSpec::int("wide", 0, 10)];
        static WIDE: FieldCodec = FieldCodec::new("wide", &WIDE_FIELDS, 10);

        let err = WIDE.decode(&[1u8; 10], DecodeMode::Strict).unwrap_err();
        assert_eq!(err, Error::IntWidth { field: "wide", size: 10 });

        let fields = Fields::new().with("wide", FieldValue::Int(1));
        assert_eq!(
            WIDE.encode(&fields).unwrap_err(),
            Error::IntWidth { field: "wide", size: 10 }
        );
    }
}
