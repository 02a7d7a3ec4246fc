//! Factory for fresh records with sensible defaults
//!
//! Identity fields and the trainer name are drawn at random unless set.
//! Experience is taken as-is; level curves belong to the caller.

use crate::bits::{BitContainer, MAX_IV};
use crate::error::Result;
use crate::field::Text;
use crate::record::{ActiveRecord, BattleState, BoxedRecord, DEFAULT_LANGUAGE};
use crate::substructure::{Attack, EffortValues, Growth, Misc, SubstructureSet};
use rand::Rng;
use tracing::debug;

/// EV placed in every battle stat by default
pub const DEFAULT_EV: u8 = 85;

const TRAINER_NAME_LEN: usize = 7;
const MIN_PERSONALITY_VALUE: u32 = 100_000_000;
const MIN_TRAINER_ID: u32 = 1_000_000_000;

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    nickname: Text,
    growth: Growth,
    attack: Attack,
    effort_values: EffortValues,
    misc: Misc,
    language: u8,
    markings: u8,
    personality_value: Option<u32>,
    original_trainer_id: Option<u32>,
    trainer_name: Option<Text>,
}

impl RecordBuilder {
    /// Nickname characters outside the game character set become `?`
    pub fn new(species: u16, nickname: &str) -> Self {
        Self {
            nickname: Text::from(nickname),
            growth: Growth {
                species,
                ..Growth::default()
            },
            attack: Attack::default(),
            effort_values: EffortValues::uniform(DEFAULT_EV),
            misc: Misc {
                ivs: BitContainer::uniform(MAX_IV),
                ..Misc::default()
            },
            language: DEFAULT_LANGUAGE,
            markings: 0,
            personality_value: None,
            original_trainer_id: None,
            trainer_name: None,
        }
    }

    pub fn personality_value(mut self, value: u32) -> Self {
        self.personality_value = Some(value);
        self
    }

    pub fn original_trainer_id(mut self, id: u32) -> Self {
        self.original_trainer_id = Some(id);
        self
    }

    pub fn trainer_name(mut self, name: &str) -> Self {
        self.trainer_name = Some(Text::from(name));
        self
    }

    pub fn language(mut self, language: u8) -> Self {
        self.language = language;
        self
    }

    pub fn markings(mut self, markings: u8) -> Self {
        self.markings = markings;
        self
    }

    pub fn experience(mut self, experience: u32) -> Self {
        self.growth.experience = experience;
        self
    }

    pub fn item_held(mut self, item: u16) -> Self {
        self.growth.item_held = item;
        self
    }

    pub fn friendship(mut self, friendship: u8) -> Self {
        self.growth.friendship = friendship;
        self
    }

    pub fn pp_bonus(mut self, pp_bonus: u8) -> Self {
        self.growth.pp_bonus = pp_bonus;
        self
    }

    /// Four `(move id, pp)` pairs; use id 0 for an empty slot
    pub fn moves(mut self, moves: [(u16, u8); 4]) -> Self {
        for (slot, (id, pp)) in moves.into_iter().enumerate() {
            self.attack.moves[slot] = id;
            self.attack.pp[slot] = pp;
        }
        self
    }

    pub fn effort_values(mut self, evs: EffortValues) -> Self {
        self.effort_values = evs;
        self
    }

    pub fn ivs(mut self, ivs: BitContainer) -> Self {
        self.misc.ivs = ivs;
        self
    }

    pub fn pokerus(mut self, pokerus: u8) -> Self {
        self.misc.pokerus = pokerus;
        self
    }

    pub fn met_location(mut self, location: u8) -> Self {
        self.misc.met_location = location;
        self
    }

    pub fn origins(mut self, origins: u16) -> Self {
        self.misc.origins = origins;
        self
    }

    pub fn ribbons(mut self, ribbons: u32) -> Self {
        self.misc.ribbons = ribbons;
        self
    }

    /// Build with the thread-local generator
    pub fn build(self) -> Result<BoxedRecord> {
        self.build_with_rng(&mut rand::rng())
    }

    /// Build using `rng` for every unset identity field.
    ///
    /// Fails with `Error::EmptyIdentity` if both identity fields were set to zero.
    pub fn build_with_rng<R: Rng>(self, rng: &mut R) -> Result<BoxedRecord> {
        let personality_value = self
            .personality_value
            .unwrap_or_else(|| rng.random_range(MIN_PERSONALITY_VALUE..=u32::MAX));
        let original_trainer_id = self
            .original_trainer_id
            .unwrap_or_else(|| rng.random_range(MIN_TRAINER_ID..=u32::MAX));
        let trainer_name = self.trainer_name.unwrap_or_else(|| {
            let name: String = (0..TRAINER_NAME_LEN)
                .map(|_| rng.random_range(b'a'..=b'z') as char)
                .collect();
            Text::from(name.as_str())
        });

        let substructures =
            SubstructureSet::new(self.growth, self.attack, self.effort_values, self.misc);

        let mut record = BoxedRecord::new(
            personality_value,
            original_trainer_id,
            self.nickname,
            trainer_name,
            substructures,
        )?;
        record.language = self.language;
        record.markings = self.markings;

        debug!(
            personality_value,
            original_trainer_id,
            species = record.species(),
            "built record"
        );

        Ok(record)
    }

    /// Build straight into a party slot
    pub fn build_active(self, battle: BattleState) -> Result<ActiveRecord> {
        Ok(self.build()?.into_active(battle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DEFAULT_MISC_FLAGS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_defaults() {
        let record = RecordBuilder::new(252, "TREECKO")
            .build_with_rng(&mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(record.species(), 252);
        assert_eq!(record.nickname.to_string_lossy(), "TREECKO");
        assert_eq!(record.language, DEFAULT_LANGUAGE);
        assert_eq!(record.misc_flags, DEFAULT_MISC_FLAGS);
        assert_eq!(*record.effort_values(), EffortValues::uniform(DEFAULT_EV));
        assert_eq!(record.ivs(), BitContainer::uniform(31));
        assert!(record.personality_value >= MIN_PERSONALITY_VALUE);
        assert!(record.original_trainer_id >= MIN_TRAINER_ID);
        assert!(record.checksum_matches().unwrap());

        let name = record.trainer_name.to_string_lossy();
        assert_eq!(name.len(), TRAINER_NAME_LEN);
        assert!(name.bytes().all(|b| b.is_ascii_lowercase()));
    }

    #[test]
    fn test_seeded_builds_are_reproducible() {
        let build = || {
            RecordBuilder::new(1, "BULBASAUR")
                .build_with_rng(&mut StdRng::seed_from_u64(99))
                .unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_explicit_identity() {
        let record = RecordBuilder::new(25, "PIKACHU")
            .personality_value(100)
            .original_trainer_id(200)
            .trainer_name("ASH")
            .experience(560)
            .moves([(84, 30), (45, 40), (0, 0), (0, 0)])
            .friendship(70)
            .item_held(13)
            .build()
            .unwrap();

        assert_eq!(record.cipher_key(), 172);
        assert_eq!(record.trainer_name.to_string_lossy(), "ASH");
        assert_eq!(record.move_name(0).unwrap(), Some("Thunder Shock"));
        assert_eq!(record.move_at(1).unwrap(), (45, 40));
        assert_eq!(record.experience(), 560);

        let bytes = record.encode().unwrap();
        let decoded = BoxedRecord::decode(&bytes).unwrap().unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn test_zero_identity_fails_to_build() {
        let err = RecordBuilder::new(25, "PIKA")
            .personality_value(0)
            .original_trainer_id(0)
            .build()
            .unwrap_err();
        assert_eq!(err, crate::error::Error::EmptyIdentity);
    }

    #[test]
    fn test_nickname_is_written_in_game_charset() {
        let bytes = RecordBuilder::new(25, "AB")
            .personality_value(1)
            .original_trainer_id(2)
            .build()
            .unwrap()
            .encode()
            .unwrap();
        assert_eq!(&bytes[8..11], &[0xBB, 0xBC, 0xFF]);
        assert!(bytes[11..18].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_build_active() {
        let battle = BattleState {
            level: 50,
            current_hp: 120,
            total_hp: 120,
            ..BattleState::default()
        };
        let active = RecordBuilder::new(6, "CHARIZARD")
            .personality_value(7)
            .original_trainer_id(8)
            .build_active(battle)
            .unwrap();

        let bytes = active.encode().unwrap();
        let decoded = ActiveRecord::decode(&bytes).unwrap().unwrap();
        assert_eq!(decoded.battle.level, 50);
        assert_eq!(decoded.boxed.species(), 6);
    }
}
