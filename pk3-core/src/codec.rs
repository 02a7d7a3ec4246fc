//! Record-level constants, the payload checksum and payload (de|en)cryption
use crate::crypto::PayloadCipher;
use crate::error::Result;
use crate::field::DecodeMode;
use crate::substructure::SubstructureSet;

/// Size of a record stored in a PC box
pub const BOXED_SIZE: usize = 80;

/// Size of a party record: the boxed layout plus battle state
pub const ACTIVE_SIZE: usize = 100;

/// Cleartext header in front of the encrypted payload
pub const HEADER_SIZE: usize = 32;

pub const PAYLOAD_OFFSET: usize = HEADER_SIZE;

/// Encrypted region holding the four substructures
pub const PAYLOAD_SIZE: usize = 4 * SUBSTRUCTURE_SIZE;

pub const SUBSTRUCTURE_SIZE: usize = 12;

/// Leading bytes (personality value + trainer id) that are zero in an empty slot
pub const EMPTY_SLOT_PREFIX: usize = 8;

/// Calculate checksum for an unencrypted payload
/// Formula: sum of all little-endian u16 words (mod 2^16)
pub fn calc_checksum(plain: &[u8]) -> u16 {
    plain
        .chunks_exact(2)
        .map(|w| u16::from_le_bytes([w[0], w[1]]))
        .fold(0u16, u16::wrapping_add)
}

/// A slot is empty when personality value and trainer id are both zero.
/// The rest of the slot may hold leftover bytes and is not looked at.
pub fn is_empty_slot(slot: &[u8]) -> bool {
    slot.len() >= EMPTY_SLOT_PREFIX && slot[..EMPTY_SLOT_PREFIX].iter().all(|&b| b == 0)
}

/// Decrypt an encrypted payload and split it into its substructures
pub fn decrypt_payload(
    encrypted: &[u8],
    personality_value: u32,
    original_trainer_id: u32,
    mode: DecodeMode,
) -> Result<SubstructureSet> {
    let plain = PayloadCipher::for_record(personality_value, original_trainer_id).decrypt(encrypted)?;
    SubstructureSet::decode(&plain, personality_value, mode)
}

/// Lay out and encrypt the substructures of a record
pub fn encrypt_payload(
    substructures: &SubstructureSet,
    personality_value: u32,
    original_trainer_id: u32,
) -> Result<Vec<u8>> {
    let plain = substructures.encode(personality_value)?;
    PayloadCipher::for_record(personality_value, original_trainer_id).encrypt(&plain)
}
