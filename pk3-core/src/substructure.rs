//! The four 12-byte substructures of the encrypted payload and their
//! personality-dependent ordering.

use crate::bits::BitContainer;
use crate::codec::{PAYLOAD_SIZE, SUBSTRUCTURE_SIZE, calc_checksum};
use crate::error::{Error, Result};
use crate::field::{DecodeMode, FieldCodec, FieldSpec, FieldValue, Fields, Layout};
use crate::symbols::MOVES;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SubstructureKind {
    Growth,
    Attack,
    EffortValues,
    Misc,
}

impl SubstructureKind {
    pub const ALL: [SubstructureKind; 4] = [
        SubstructureKind::Growth,
        SubstructureKind::Attack,
        SubstructureKind::EffortValues,
        SubstructureKind::Misc,
    ];

    /// Field layout of this substructure
    pub fn codec(self) -> &'static FieldCodec {
        match self {
            SubstructureKind::Growth => Growth::codec(),
            SubstructureKind::Attack => Attack::codec(),
            SubstructureKind::EffortValues => EffortValues::codec(),
            SubstructureKind::Misc => Misc::codec(),
        }
    }
}

use SubstructureKind::{Attack as A, EffortValues as E, Growth as G, Misc as M};

/// Physical substructure order, indexed by `personality_value % 24`
pub const ORDERINGS: [[SubstructureKind; 4]; 24] = [
    [G, A, E, M],
    [G, A, M, E],
    [G, E, A, M],
    [G, E, M, A],
    [G, M, A, E],
    [G, M, E, A],
    [A, G, E, M],
    [A, G, M, E],
    [A, E, G, M],
    [A, E, M, G],
    [A, M, G, E],
    [A, M, E, G],
    [E, G, A, M],
    [E, G, M, A],
    [E, A, G, M],
    [E, A, M, G],
    [E, M, G, A],
    [E, M, A, G],
    [M, G, A, E],
    [M, G, E, A],
    [M, A, G, E],
    [M, A, E, G],
    [M, E, G, A],
    [M, E, A, G],
];

/// Order of the substructures inside the payload for a personality value
pub fn order_for(personality_value: u32) -> [SubstructureKind; 4] {
    ORDERINGS[(personality_value % 24) as usize]
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

static GROWTH_FIELDS: [FieldSpec; 6] = [
    FieldSpec::int("species", 0, 2),
    FieldSpec::int("item_held", 2, 2),
    FieldSpec::int("experience", 4, 4),
    FieldSpec::int("pp_bonus", 8, 1),
    FieldSpec::int("friendship", 9, 1),
    FieldSpec::raw("unknown", 10, 2),
];

pub static GROWTH_CODEC: FieldCodec = FieldCodec::new("growth", &GROWTH_FIELDS, SUBSTRUCTURE_SIZE);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Growth {
    pub species: u16,
    pub item_held: u16,
    pub experience: u32,
    pub pp_bonus: u8,
    pub friendship: u8,
    pub unknown: [u8; 2],
}

impl Layout for Growth {
    fn codec() -> &'static FieldCodec {
        &GROWTH_CODEC
    }

    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            species: fields.u16("species")?,
            item_held: fields.u16("item_held")?,
            experience: fields.u32("experience")?,
            pp_bonus: fields.u8("pp_bonus")?,
            friendship: fields.u8("friendship")?,
            unknown: fields.byte_array("unknown")?,
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("species", FieldValue::Int(self.species.into()))
            .with("item_held", FieldValue::Int(self.item_held.into()))
            .with("experience", FieldValue::Int(self.experience.into()))
            .with("pp_bonus", FieldValue::Int(self.pp_bonus.into()))
            .with("friendship", FieldValue::Int(self.friendship.into()))
            .with("unknown", FieldValue::Bytes(self.unknown.to_vec()))
    }
}

// ---------------------------------------------------------------------------
// Attack
// ---------------------------------------------------------------------------

const MOVE_FIELDS: [&str; 4] = ["move_1", "move_2", "move_3", "move_4"];
const PP_FIELDS: [&str; 4] = ["pp_1", "pp_2", "pp_3", "pp_4"];

static ATTACK_FIELDS: [FieldSpec; 8] = [
    FieldSpec::symbol(MOVE_FIELDS[0], 0, 2, &MOVES),
    FieldSpec::symbol(MOVE_FIELDS[1], 2, 2, &MOVES),
    FieldSpec::symbol(MOVE_FIELDS[2], 4, 2, &MOVES),
    FieldSpec::symbol(MOVE_FIELDS[3], 6, 2, &MOVES),
    FieldSpec::int(PP_FIELDS[0], 8, 1),
    FieldSpec::int(PP_FIELDS[1], 9, 1),
    FieldSpec::int(PP_FIELDS[2], 10, 1),
    FieldSpec::int(PP_FIELDS[3], 11, 1),
];

pub static ATTACK_CODEC: FieldCodec = FieldCodec::new("attack", &ATTACK_FIELDS, SUBSTRUCTURE_SIZE);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attack {
    pub moves: [u16; 4],
    pub pp: [u8; 4],
}

impl Attack {
    /// Move id and remaining PP of a slot (0..4)
    pub fn move_at(&self, slot: usize) -> Result<(u16, u8)> {
        match (self.moves.get(slot), self.pp.get(slot)) {
            (Some(&id), Some(&pp)) => Ok((id, pp)),
            _ => Err(Error::MoveSlot(slot)),
        }
    }

    /// Replaces a move together with its PP
    pub fn set_move(&mut self, slot: usize, id: u16, pp: u8) -> Result<()> {
        if slot >= self.moves.len() {
            return Err(Error::MoveSlot(slot));
        }
        self.moves[slot] = id;
        self.pp[slot] = pp;
        Ok(())
    }

    /// Name of the move in a slot, if the id is a known move
    pub fn move_name(&self, slot: usize) -> Result<Option<&'static str>> {
        let (id, _) = self.move_at(slot)?;
        Ok(MOVES.name(id.into()))
    }
}

impl Layout for Attack {
    fn codec() -> &'static FieldCodec {
        &ATTACK_CODEC
    }

    fn from_fields(fields: &Fields) -> Result<Self> {
        let mut attack = Self::default();
        for slot in 0..4 {
            let field = MOVE_FIELDS[slot];
            let id = fields.symbol_id(field, &MOVES)?;
            attack.moves[slot] = u16::try_from(id).map_err(|_| Error::Overflow {
                field,
                value: id,
                size: 2,
            })?;
            attack.pp[slot] = fields.u8(PP_FIELDS[slot])?;
        }
        Ok(attack)
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        for (slot, &id) in self.moves.iter().enumerate() {
            let value = match MOVES.name(id.into()) {
                Some(name) => FieldValue::Symbol(name.to_string()),
                None => FieldValue::Int(id.into()),
            };
            fields.insert(MOVE_FIELDS[slot], value);
        }
        for (slot, &pp) in self.pp.iter().enumerate() {
            fields.insert(PP_FIELDS[slot], FieldValue::Int(pp.into()));
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// Effort values and contest stats
// ---------------------------------------------------------------------------

const EV_FIELDS: [&str; 12] = [
    "hp",
    "attack",
    "defense",
    "speed",
    "sp_attack",
    "sp_defense",
    "coolness",
    "beauty",
    "cuteness",
    "smartness",
    "toughness",
    "feel",
];

static EFFORT_VALUE_FIELDS: [FieldSpec; 12] = [
    FieldSpec::int(EV_FIELDS[0], 0, 1),
    FieldSpec::int(EV_FIELDS[1], 1, 1),
    FieldSpec::int(EV_FIELDS[2], 2, 1),
    FieldSpec::int(EV_FIELDS[3], 3, 1),
    FieldSpec::int(EV_FIELDS[4], 4, 1),
    FieldSpec::int(EV_FIELDS[5], 5, 1),
    FieldSpec::int(EV_FIELDS[6], 6, 1),
    FieldSpec::int(EV_FIELDS[7], 7, 1),
    FieldSpec::int(EV_FIELDS[8], 8, 1),
    FieldSpec::int(EV_FIELDS[9], 9, 1),
    FieldSpec::int(EV_FIELDS[10], 10, 1),
    FieldSpec::int(EV_FIELDS[11], 11, 1),
];

pub static EFFORT_VALUES_CODEC: FieldCodec =
    FieldCodec::new("effort_values", &EFFORT_VALUE_FIELDS, SUBSTRUCTURE_SIZE);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EffortValues {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub speed: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub coolness: u8,
    pub beauty: u8,
    pub cuteness: u8,
    pub smartness: u8,
    pub toughness: u8,
    pub feel: u8,
}

impl EffortValues {
    /// Same EV in all six battle stats, contest stats zeroed
    pub fn uniform(ev: u8) -> Self {
        Self {
            hp: ev,
            attack: ev,
            defense: ev,
            speed: ev,
            sp_attack: ev,
            sp_defense: ev,
            ..Self::default()
        }
    }

    fn as_array(&self) -> [u8; 12] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.speed,
            self.sp_attack,
            self.sp_defense,
            self.coolness,
            self.beauty,
            self.cuteness,
            self.smartness,
            self.toughness,
            self.feel,
        ]
    }

    /// Battle-stat EVs in hp, attack, defense, speed, sp_attack, sp_defense order
    pub fn battle(&self) -> [u8; 6] {
        let all = self.as_array();
        [all[0], all[1], all[2], all[3], all[4], all[5]]
    }

    /// Sum of the battle-stat EVs
    pub fn total(&self) -> u16 {
        self.battle().iter().map(|&ev| ev as u16).sum()
    }
}

impl Layout for EffortValues {
    fn codec() -> &'static FieldCodec {
        &EFFORT_VALUES_CODEC
    }

    fn from_fields(fields: &Fields) -> Result<Self> {
        let mut v = [0u8; 12];
        for (slot, name) in EV_FIELDS.into_iter().enumerate() {
            v[slot] = fields.u8(name)?;
        }
        Ok(Self {
            hp: v[0],
            attack: v[1],
            defense: v[2],
            speed: v[3],
            sp_attack: v[4],
            sp_defense: v[5],
            coolness: v[6],
            beauty: v[7],
            cuteness: v[8],
            smartness: v[9],
            toughness: v[10],
            feel: v[11],
        })
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        for (name, value) in EV_FIELDS.into_iter().zip(self.as_array()) {
            fields.insert(name, FieldValue::Int(value.into()));
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

static MISC_FIELDS: [FieldSpec; 5] = [
    FieldSpec::int("pokerus", 0, 1),
    FieldSpec::int("met_location", 1, 1),
    FieldSpec::int("origins", 2, 2),
    FieldSpec::int("ivs_egg", 4, 4),
    FieldSpec::int("ribbons", 8, 4),
];

pub static MISC_CODEC: FieldCodec = FieldCodec::new("misc", &MISC_FIELDS, SUBSTRUCTURE_SIZE);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Misc {
    pub pokerus: u8,
    pub met_location: u8,
    pub origins: u16,
    pub ivs: BitContainer,
    pub ribbons: u32,
}

impl Layout for Misc {
    fn codec() -> &'static FieldCodec {
        &MISC_CODEC
    }

    fn from_fields(fields: &Fields) -> Result<Self> {
        Ok(Self {
            pokerus: fields.u8("pokerus")?,
            met_location: fields.u8("met_location")?,
            origins: fields.u16("origins")?,
            ivs: BitContainer::decode(fields.u32("ivs_egg")?),
            ribbons: fields.u32("ribbons")?,
        })
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
            .with("pokerus", FieldValue::Int(self.pokerus.into()))
            .with("met_location", FieldValue::Int(self.met_location.into()))
            .with("origins", FieldValue::Int(self.origins.into()))
            .with("ivs_egg", FieldValue::Int(self.ivs.encode().into()))
            .with("ribbons", FieldValue::Int(self.ribbons.into()))
    }
}

// ---------------------------------------------------------------------------
// Tagged union and the set of four
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Substructure {
    Growth(Growth),
    Attack(Attack),
    EffortValues(EffortValues),
    Misc(Misc),
}

impl Substructure {
    pub fn kind(&self) -> SubstructureKind {
        match self {
            Substructure::Growth(_) => SubstructureKind::Growth,
            Substructure::Attack(_) => SubstructureKind::Attack,
            Substructure::EffortValues(_) => SubstructureKind::EffortValues,
            Substructure::Misc(_) => SubstructureKind::Misc,
        }
    }

    /// Decodes one 12-byte chunk as `kind`
    pub fn decode(kind: SubstructureKind, bytes: &[u8], mode: DecodeMode) -> Result<Self> {
        Ok(match kind {
            SubstructureKind::Growth => Substructure::Growth(Growth::decode(bytes, mode)?),
            SubstructureKind::Attack => Substructure::Attack(Attack::decode(bytes, mode)?),
            SubstructureKind::EffortValues => {
                Substructure::EffortValues(EffortValues::decode(bytes, mode)?)
            }
            SubstructureKind::Misc => Substructure::Misc(Misc::decode(bytes, mode)?),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Substructure::Growth(s) => s.encode(),
            Substructure::Attack(s) => s.encode(),
            Substructure::EffortValues(s) => s.encode(),
            Substructure::Misc(s) => s.encode(),
        }
    }
}

/// Borrowed view of one substructure, selected by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstructureRef<'a> {
    Growth(&'a Growth),
    Attack(&'a Attack),
    EffortValues(&'a EffortValues),
    Misc(&'a Misc),
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubstructureMut<'a> {
    Growth(&'a mut Growth),
    Attack(&'a mut Attack),
    EffortValues(&'a mut EffortValues),
    Misc(&'a mut Misc),
}

/// Exactly one of each substructure. The physical order is not stored; it is
/// derived from the owning record's personality value on every encode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubstructureSet {
    growth: Growth,
    attack: Attack,
    effort_values: EffortValues,
    misc: Misc,
}

impl SubstructureSet {
    pub fn new(growth: Growth, attack: Attack, effort_values: EffortValues, misc: Misc) -> Self {
        Self {
            growth,
            attack,
            effort_values,
            misc,
        }
    }

    /// Builds a set from substructures in any order. Each kind must appear
    /// exactly once.
    pub fn from_parts(parts: impl IntoIterator<Item = Substructure>) -> Result<Self> {
        let mut growth = None;
        let mut attack = None;
        let mut effort_values = None;
        let mut misc = None;

        for part in parts {
            let kind = part.kind();
            let duplicate = match part {
                Substructure::Growth(s) => growth.replace(s).is_some(),
                Substructure::Attack(s) => attack.replace(s).is_some(),
                Substructure::EffortValues(s) => effort_values.replace(s).is_some(),
                Substructure::Misc(s) => misc.replace(s).is_some(),
            };
            if duplicate {
                return Err(Error::DuplicateSubstructure(kind));
            }
        }

        Ok(Self {
            growth: growth.ok_or(Error::MissingSubstructure(SubstructureKind::Growth))?,
            attack: attack.ok_or(Error::MissingSubstructure(SubstructureKind::Attack))?,
            effort_values: effort_values
                .ok_or(Error::MissingSubstructure(SubstructureKind::EffortValues))?,
            misc: misc.ok_or(Error::MissingSubstructure(SubstructureKind::Misc))?,
        })
    }

    /// Splits the set in Growth, Attack, EffortValues, Misc order
    pub fn into_parts(self) -> [Substructure; 4] {
        [
            Substructure::Growth(self.growth),
            Substructure::Attack(self.attack),
            Substructure::EffortValues(self.effort_values),
            Substructure::Misc(self.misc),
        ]
    }

    /// Decodes a decrypted 48-byte payload laid out in `order_for(personality_value)`
    pub fn decode(plain: &[u8], personality_value: u32, mode: DecodeMode) -> Result<Self> {
        if plain.len() != PAYLOAD_SIZE {
            return Err(Error::Length {
                field: "payload",
                needed: PAYLOAD_SIZE,
                actual: plain.len(),
            });
        }

        let parts = order_for(personality_value)
            .into_iter()
            .zip(plain.chunks_exact(SUBSTRUCTURE_SIZE))
            .map(|(kind, chunk)| Substructure::decode(kind, chunk, mode))
            .collect::<Result<Vec<_>>>()?;

        Self::from_parts(parts)
    }

    /// Unencrypted payload in `order_for(personality_value)` order
    pub fn encode(&self, personality_value: u32) -> Result<Vec<u8>> {
        let mut plain = Vec::with_capacity(PAYLOAD_SIZE);
        for kind in order_for(personality_value) {
            plain.extend(self.encode_kind(kind)?);
        }
        Ok(plain)
    }

    fn encode_kind(&self, kind: SubstructureKind) -> Result<Vec<u8>> {
        match self.get(kind) {
            SubstructureRef::Growth(s) => s.encode(),
            SubstructureRef::Attack(s) => s.encode(),
            SubstructureRef::EffortValues(s) => s.encode(),
            SubstructureRef::Misc(s) => s.encode(),
        }
    }

    /// Payload checksum. Every substructure is a whole number of words, so
    /// the sum does not depend on their order.
    pub fn checksum(&self) -> Result<u16> {
        let mut plain = Vec::with_capacity(PAYLOAD_SIZE);
        for kind in SubstructureKind::ALL {
            plain.extend(self.encode_kind(kind)?);
        }
        Ok(calc_checksum(&plain))
    }

    /// Substructure by kind
    pub fn get(&self, kind: SubstructureKind) -> SubstructureRef<'_> {
        match kind {
            SubstructureKind::Growth => SubstructureRef::Growth(&self.growth),
            SubstructureKind::Attack => SubstructureRef::Attack(&self.attack),
            SubstructureKind::EffortValues => SubstructureRef::EffortValues(&self.effort_values),
            SubstructureKind::Misc => SubstructureRef::Misc(&self.misc),
        }
    }

    pub fn get_mut(&mut self, kind: SubstructureKind) -> SubstructureMut<'_> {
        match kind {
            SubstructureKind::Growth => SubstructureMut::Growth(&mut self.growth),
            SubstructureKind::Attack => SubstructureMut::Attack(&mut self.attack),
            SubstructureKind::EffortValues => {
                SubstructureMut::EffortValues(&mut self.effort_values)
            }
            SubstructureKind::Misc => SubstructureMut::Misc(&mut self.misc),
        }
    }

    pub fn growth(&self) -> &Growth {
        &self.growth
    }

    pub fn growth_mut(&mut self) -> &mut Growth {
        &mut self.growth
    }

    pub fn attack(&self) -> &Attack {
        &self.attack
    }

    pub fn attack_mut(&mut self) -> &mut Attack {
        &mut self.attack
    }

    pub fn effort_values(&self) -> &EffortValues {
        &self.effort_values
    }

    pub fn effort_values_mut(&mut self) -> &mut EffortValues {
        &mut self.effort_values
    }

    pub fn misc(&self) -> &Misc {
        &self.misc
    }

    pub fn misc_mut(&mut self) -> &mut Misc {
        &mut self.misc
    }
}
