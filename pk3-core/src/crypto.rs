//! XOR stream transform for the encrypted substructure payload

use crate::error::{Error, Result};

/// Derives the payload key from a record's identity fields
#[inline]
pub fn derive_key(personality_value: u32, original_trainer_id: u32) -> u32 {
    original_trainer_id ^ personality_value
}

/// XORs every word of a block with `key`. Applying it twice is a no-op.
pub(crate) fn xor_block(v: &mut [u32], key: u32) {
    for word in v.iter_mut() {
        *word ^= key;
    }
}

/// XORs every little-endian u32 word of `data` with `key`
pub(crate) fn xor_transform(data: &[u8], key: u32) -> Result<Vec<u8>> {
    if data.len() % 4 != 0 {
        return Err(Error::Alignment(data.len()));
    }

    // LE words
    let mut v: Vec<u32> = data
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    xor_block(&mut v, key);

    Ok(v.into_iter().flat_map(u32::to_le_bytes).collect())
}

/// Cipher bound to one record's identity; the key cannot be supplied directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadCipher {
    key: u32,
}

impl PayloadCipher {
    /// Cipher keyed from the identity fields of a record
    pub fn for_record(personality_value: u32, original_trainer_id: u32) -> Self {
        Self {
            key: derive_key(personality_value, original_trainer_id),
        }
    }

    /// The derived key, for diagnostics
    pub fn key(&self) -> u32 {
        self.key
    }

    /// Encrypt a payload; the length must be a multiple of 4
    pub fn encrypt(&self, plain: &[u8]) -> Result<Vec<u8>> {
        xor_transform(plain, self.key)
    }

    /// Decrypt a payload; the length must be a multiple of 4
    pub fn decrypt(&self, cipher: &[u8]) -> Result<Vec<u8>> {
        xor_transform(cipher, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_key_vector() {
        let cipher = PayloadCipher::for_record(100, 200);
        assert_eq!(cipher.key(), 172);

        let encrypted = cipher.encrypt(&0u32.to_le_bytes()).unwrap();
        assert_eq!(u32::from_le_bytes(encrypted[..4].try_into().unwrap()), 0x0000_00AC);

        let decrypted = cipher.decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_words_are_little_endian() {
        let out = xor_transform(&[0x01, 0x02, 0x03, 0x04], 0x0000_00FF).unwrap();
        assert_eq!(out, vec![0xFE, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_misaligned_input() {
        assert_eq!(xor_transform(&[0u8; 47], 1).unwrap_err(), Error::Alignment(47));
        assert_eq!(xor_transform(&[], 1).unwrap(), Vec::<u8>::new());
    }

    proptest! {
        #[test]
        fn test_transform_is_involution(
            words in proptest::collection::vec(any::<u32>(), 0..32),
            key in any::<u32>(),
        ) {
            let data: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
            let once = xor_transform(&data, key).unwrap();
            let twice = xor_transform(&once, key).unwrap();
            prop_assert_eq!(twice, data);
        }
    }
}
