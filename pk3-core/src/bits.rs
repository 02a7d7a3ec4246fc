//! Bit-packed IV / egg / ability word stored in the Misc substructure.
//!
//! Layout of the little-endian u32 (bit 0 = least significant):
//!
//! ```text
//! 31      30   29-25       24-20      19-15   14-10    9-5     4-0
//! ability egg  sp_defense  sp_attack  speed   defense  attack  hp
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const IV_BITS: u32 = 5;
const IV_MASK: u32 = (1 << IV_BITS) - 1;
const EGG_SHIFT: u32 = 30;
const ABILITY_SHIFT: u32 = 31;

/// Highest value an individual value can hold
pub const MAX_IV: u8 = IV_MASK as u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitContainer {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub speed: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub egg: bool,
    /// `true` selects the species' second ability
    pub ability: bool,
}

#[inline]
fn iv_at(word: u32, index: u32) -> u8 {
    ((word >> (index * IV_BITS)) & IV_MASK) as u8
}

impl BitContainer {
    /// All six IVs set to the same value, egg and ability cleared
    pub fn uniform(iv: u8) -> Self {
        Self {
            hp: iv,
            attack: iv,
            defense: iv,
            speed: iv,
            sp_attack: iv,
            sp_defense: iv,
            egg: false,
            ability: false,
        }
    }

    /// Unpacks a word. Every u32 is a valid input.
    pub fn decode(word: u32) -> Self {
        Self {
            hp: iv_at(word, 0),
            attack: iv_at(word, 1),
            defense: iv_at(word, 2),
            speed: iv_at(word, 3),
            sp_attack: iv_at(word, 4),
            sp_defense: iv_at(word, 5),
            egg: (word >> EGG_SHIFT) & 1 == 1,
            ability: (word >> ABILITY_SHIFT) & 1 == 1,
        }
    }

    /// Packs the fields back into a word.
    ///
    /// IVs wider than five bits are truncated to their low five bits, so an
    /// out-of-range value never spills into the neighbouring field.
    pub fn encode(&self) -> u32 {
        let ivs = [
            self.hp,
            self.attack,
            self.defense,
            self.speed,
            self.sp_attack,
            self.sp_defense,
        ];

        let mut word = ivs
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &iv)| {
                acc | ((iv as u32 & IV_MASK) << (i as u32 * IV_BITS))
            });

        word |= (self.egg as u32) << EGG_SHIFT;
        word |= (self.ability as u32) << ABILITY_SHIFT;
        word
    }

    /// Unpacks the word from its little-endian bytes
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::decode(u32::from_le_bytes(bytes))
    }

    /// Packs the word into little-endian bytes
    pub fn to_bytes(&self) -> [u8; 4] {
        self.encode().to_le_bytes()
    }

    /// IVs in hp, attack, defense, speed, sp_attack, sp_defense order
    pub fn ivs(&self) -> [u8; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.speed,
            self.sp_attack,
            self.sp_defense,
        ]
    }
}
