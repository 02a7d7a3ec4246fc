//! Boxed (80-byte) and active party (100-byte) records
//!
//! Layout: [header(32) | encrypted payload(48) | battle state(20, active only)]

use crate::bits::BitContainer;
use crate::codec::{
    ACTIVE_SIZE, BOXED_SIZE, PAYLOAD_OFFSET, PAYLOAD_SIZE, decrypt_payload, encrypt_payload,
    is_empty_slot,
};
use crate::crypto::derive_key;
use crate::error::{Error, Result};
use crate::field::{DecodeMode, FieldCodec, FieldSpec, FieldValue, Fields, Text};
use crate::substructure::{EffortValues, SubstructureSet};
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Language byte used for English cartridges
pub const DEFAULT_LANGUAGE: u8 = 2;

/// Flags byte with the "has species" bit set
pub const DEFAULT_MISC_FLAGS: u8 = 2;

static BOXED_FIELDS: [FieldSpec; 10] = [
    FieldSpec::int("personality_value", 0, 4),
    FieldSpec::int("original_trainer_id", 4, 4),
    FieldSpec::text("nickname", 8, 10),
    FieldSpec::int("language", 18, 1),
    FieldSpec::int("misc_flags", 19, 1),
    FieldSpec::text("trainer_name", 20, 7),
    FieldSpec::int("markings", 27, 1),
    FieldSpec::int("checksum", 28, 2),
    FieldSpec::int("padding", 30, 2),
    FieldSpec::payload("payload", PAYLOAD_OFFSET, PAYLOAD_SIZE),
];

pub static BOXED_CODEC: FieldCodec = FieldCodec::new("boxed", &BOXED_FIELDS, BOXED_SIZE);

static BATTLE_FIELDS: [FieldSpec; 10] = [
    FieldSpec::int("status_condition", 80, 4),
    FieldSpec::int("level", 84, 1),
    FieldSpec::int("pokerus_days", 85, 1),
    FieldSpec::int("current_hp", 86, 2),
    FieldSpec::int("total_hp", 88, 2),
    FieldSpec::int("attack", 90, 2),
    FieldSpec::int("defense", 92, 2),
    FieldSpec::int("speed", 94, 2),
    FieldSpec::int("sp_attack", 96, 2),
    FieldSpec::int("sp_defense", 98, 2),
];

/// First 80 bytes are the boxed layout, followed by battle state
pub static ACTIVE_CODEC: FieldCodec =
    FieldCodec::extending("active", &BOXED_CODEC, &BATTLE_FIELDS, ACTIVE_SIZE);

/// An all-zero identity is how an empty slot is marked
fn check_identity(personality_value: u32, original_trainer_id: u32) -> Result<()> {
    if personality_value == 0 && original_trainer_id == 0 {
        return Err(Error::EmptyIdentity);
    }
    Ok(())
}

fn check_size(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        return Err(Error::RecordSize {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

/// A record as stored in a PC box
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxedRecord {
    /// Changing this after decode reorders the payload on the next encode
    pub personality_value: u32,
    pub original_trainer_id: u32,
    pub nickname: Text,
    pub language: u8,
    pub misc_flags: u8,
    pub trainer_name: Text,
    pub markings: u8,
    checksum: u16,
    pub padding: u16,
    substructures: SubstructureSet,
}

impl BoxedRecord {
    /// New record with a checksum matching `substructures`.
    ///
    /// Fails with [`Error::EmptyIdentity`] when both identity fields are zero.
    pub fn new(
        personality_value: u32,
        original_trainer_id: u32,
        nickname: Text,
        trainer_name: Text,
        substructures: SubstructureSet,
    ) -> Result<Self> {
        check_identity(personality_value, original_trainer_id)?;
        let mut record = Self {
            personality_value,
            original_trainer_id,
            nickname,
            language: DEFAULT_LANGUAGE,
            misc_flags: DEFAULT_MISC_FLAGS,
            trainer_name,
            markings: 0,
            checksum: 0,
            padding: 0,
            substructures,
        };
        record.refresh_checksum()?;
        Ok(record)
    }

    /// Decode a slot; `Ok(None)` for an empty slot
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>> {
        Self::decode_with(bytes, DecodeMode::Strict)
    }

    /// Decode a slot, treating unknown move ids according to `mode`
    pub fn decode_with(bytes: &[u8], mode: DecodeMode) -> Result<Option<Self>> {
        check_size(bytes, BOXED_SIZE)?;

        if is_empty_slot(bytes) {
            trace!("empty boxed slot");
            return Ok(None);
        }

        let fields = BOXED_CODEC.decode(bytes, mode)?;
        Self::from_fields(&fields, mode).map(Some)
    }

    /// Encode into an 80-byte slot. The stored checksum is written as is.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let bytes = BOXED_CODEC.encode(&self.to_fields()?)?;
        debug!(
            personality_value = self.personality_value,
            species = self.species(),
            "encoded boxed record"
        );
        Ok(bytes)
    }

    fn from_fields(fields: &Fields, mode: DecodeMode) -> Result<Self> {
        let personality_value = fields.u32("personality_value")?;
        let original_trainer_id = fields.u32("original_trainer_id")?;

        let substructures = decrypt_payload(
            fields.bytes("payload")?,
            personality_value,
            original_trainer_id,
            mode,
        )?;

        let record = Self {
            personality_value,
            original_trainer_id,
            nickname: fields.text("nickname")?.clone(),
            language: fields.u8("language")?,
            misc_flags: fields.u8("misc_flags")?,
            trainer_name: fields.text("trainer_name")?.clone(),
            markings: fields.u8("markings")?,
            checksum: fields.u16("checksum")?,
            padding: fields.u16("padding")?,
            substructures,
        };

        let calc = record.checksum()?;
        if record.checksum != calc {
            warn!(
                personality_value,
                stored = format_args!("0x{:04x}", record.checksum),
                calc = format_args!("0x{:04x}", calc),
                "checksum mismatch"
            );
        }

        debug!(
            personality_value,
            species = record.species(),
            "decoded boxed record"
        );

        Ok(record)
    }

    fn to_fields(&self) -> Result<Fields> {
        check_identity(self.personality_value, self.original_trainer_id)?;
        let payload = encrypt_payload(
            &self.substructures,
            self.personality_value,
            self.original_trainer_id,
        )?;

        Ok(Fields::new()
            .with("personality_value", FieldValue::Int(self.personality_value.into()))
            .with("original_trainer_id", FieldValue::Int(self.original_trainer_id.into()))
            .with("nickname", FieldValue::Text(self.nickname.clone()))
            .with("language", FieldValue::Int(self.language.into()))
            .with("misc_flags", FieldValue::Int(self.misc_flags.into()))
            .with("trainer_name", FieldValue::Text(self.trainer_name.clone()))
            .with("markings", FieldValue::Int(self.markings.into()))
            .with("checksum", FieldValue::Int(self.checksum.into()))
            .with("padding", FieldValue::Int(self.padding.into()))
            .with("payload", FieldValue::Bytes(payload)))
    }

    /// Key of the payload cipher, always derived from the identity fields
    pub fn cipher_key(&self) -> u32 {
        derive_key(self.personality_value, self.original_trainer_id)
    }

    /// Checksum as read from (or written to) the header
    pub fn stored_checksum(&self) -> u16 {
        self.checksum
    }

    /// Overwrite the header checksum without touching the payload
    pub fn set_stored_checksum(&mut self, checksum: u16) {
        self.checksum = checksum;
    }

    /// Checksum recomputed over the unencrypted payload
    pub fn checksum(&self) -> Result<u16> {
        self.substructures.checksum()
    }

    /// Whether the stored checksum matches the payload
    pub fn checksum_matches(&self) -> Result<bool> {
        Ok(self.checksum()? == self.checksum)
    }

    /// Store the recomputed checksum so the next encode carries it
    pub fn refresh_checksum(&mut self) -> Result<u16> {
        self.checksum = self.checksum()?;
        Ok(self.checksum)
    }

    /// Unencrypted payload in on-disk order
    pub fn plain_payload(&self) -> Result<Vec<u8>> {
        self.substructures.encode(self.personality_value)
    }

    /// The decrypted substructures
    pub fn substructures(&self) -> &SubstructureSet {
        &self.substructures
    }

    /// Direct access; the stored checksum is not refreshed
    pub fn substructures_mut(&mut self) -> &mut SubstructureSet {
        &mut self.substructures
    }

    pub fn species(&self) -> u16 {
        self.substructures.growth().species
    }

    /// Writes through to Growth and refreshes the stored checksum
    pub fn set_species(&mut self, species: u16) -> Result<()> {
        self.substructures.growth_mut().species = species;
        self.refresh_checksum().map(drop)
    }

    pub fn item_held(&self) -> u16 {
        self.substructures.growth().item_held
    }

    pub fn set_item_held(&mut self, item: u16) -> Result<()> {
        self.substructures.growth_mut().item_held = item;
        self.refresh_checksum().map(drop)
    }

    pub fn experience(&self) -> u32 {
        self.substructures.growth().experience
    }

    pub fn set_experience(&mut self, experience: u32) -> Result<()> {
        self.substructures.growth_mut().experience = experience;
        self.refresh_checksum().map(drop)
    }

    pub fn friendship(&self) -> u8 {
        self.substructures.growth().friendship
    }

    pub fn set_friendship(&mut self, friendship: u8) -> Result<()> {
        self.substructures.growth_mut().friendship = friendship;
        self.refresh_checksum().map(drop)
    }

    /// Move id and PP of a slot (0..4)
    pub fn move_at(&self, slot: usize) -> Result<(u16, u8)> {
        self.substructures.attack().move_at(slot)
    }

    pub fn move_name(&self, slot: usize) -> Result<Option<&'static str>> {
        self.substructures.attack().move_name(slot)
    }

    /// Writes both the move id and its PP
    pub fn set_move(&mut self, slot: usize, id: u16, pp: u8) -> Result<()> {
        self.substructures.attack_mut().set_move(slot, id, pp)?;
        self.refresh_checksum().map(drop)
    }

    pub fn ivs(&self) -> BitContainer {
        self.substructures.misc().ivs
    }

    pub fn set_ivs(&mut self, ivs: BitContainer) -> Result<()> {
        self.substructures.misc_mut().ivs = ivs;
        self.refresh_checksum().map(drop)
    }

    pub fn effort_values(&self) -> &EffortValues {
        self.substructures.effort_values()
    }

    pub fn set_effort_values(&mut self, evs: EffortValues) -> Result<()> {
        *self.substructures.effort_values_mut() = evs;
        self.refresh_checksum().map(drop)
    }

    /// Egg flag from the IV word
    pub fn is_egg(&self) -> bool {
        self.substructures.misc().ivs.egg
    }

    pub fn set_egg(&mut self, egg: bool) -> Result<()> {
        self.substructures.misc_mut().ivs.egg = egg;
        self.refresh_checksum().map(drop)
    }

    /// Move the record into a party slot with the given battle state
    pub fn into_active(self, battle: BattleState) -> ActiveRecord {
        ActiveRecord {
            boxed: self,
            battle,
        }
    }
}

/// Battle state kept only for party members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BattleState {
    pub status_condition: u32,
    pub level: u8,
    /// Days left before the infection wears off
    pub pokerus_days: u8,
    pub current_hp: u16,
    pub total_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub sp_attack: u16,
    pub sp_defense: u16,
}

impl BattleState {
    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            status_condition: fields.u32("status_condition")?,
            level: fields.u8("level")?,
            pokerus_days: fields.u8("pokerus_days")?,
            current_hp: fields.u16("current_hp")?,
            total_hp: fields.u16("total_hp")?,
            attack: fields.u16("attack")?,
            defense: fields.u16("defense")?,
            speed: fields.u16("speed")?,
            sp_attack: fields.u16("sp_attack")?,
            sp_defense: fields.u16("sp_defense")?,
        })
    }

    fn write_fields(&self, fields: &mut Fields) {
        fields.insert("status_condition", FieldValue::Int(self.status_condition.into()));
        fields.insert("level", FieldValue::Int(self.level.into()));
        fields.insert("pokerus_days", FieldValue::Int(self.pokerus_days.into()));
        fields.insert("current_hp", FieldValue::Int(self.current_hp.into()));
        fields.insert("total_hp", FieldValue::Int(self.total_hp.into()));
        fields.insert("attack", FieldValue::Int(self.attack.into()));
        fields.insert("defense", FieldValue::Int(self.defense.into()));
        fields.insert("speed", FieldValue::Int(self.speed.into()));
        fields.insert("sp_attack", FieldValue::Int(self.sp_attack.into()));
        fields.insert("sp_defense", FieldValue::Int(self.sp_defense.into()));
    }
}

/// A party record: a boxed record plus battle state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActiveRecord {
    pub boxed: BoxedRecord,
    pub battle: BattleState,
}

impl ActiveRecord {
    /// Decode a party slot; `Ok(None)` for an empty slot
    pub fn decode(bytes: &[u8]) -> Result<Option<Self>> {
        Self::decode_with(bytes, DecodeMode::Strict)
    }

    /// Decode a party slot, treating unknown move ids according to `mode`
    pub fn decode_with(bytes: &[u8], mode: DecodeMode) -> Result<Option<Self>> {
        check_size(bytes, ACTIVE_SIZE)?;

        if is_empty_slot(bytes) {
            trace!("empty party slot");
            return Ok(None);
        }

        let fields = ACTIVE_CODEC.decode(bytes, mode)?;
        Ok(Some(Self {
            boxed: BoxedRecord::from_fields(&fields, mode)?,
            battle: BattleState::from_fields(&fields)?,
        }))
    }

    /// Encode into a 100-byte slot whose first 80 bytes are the boxed record
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut fields = self.boxed.to_fields()?;
        self.battle.write_fields(&mut fields);
        ACTIVE_CODEC.encode(&fields)
    }

    /// The record as it would be deposited in a box
    pub fn to_boxed(&self) -> BoxedRecord {
        self.boxed.clone()
    }

    pub fn into_boxed(self) -> BoxedRecord {
        self.boxed
    }
}
