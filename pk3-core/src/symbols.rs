//! Static id <-> name tables used as value maps by the field codec, and the
//! game character set used by text fields

/// A dense symbol table: the id of a name is its index in `names`.
#[derive(Debug)]
pub struct SymbolTable {
    kind: &'static str,
    names: &'static [&'static str],
}

impl SymbolTable {
    pub const fn new(kind: &'static str, names: &'static [&'static str]) -> Self {
        Self { kind, names }
    }

    /// What the table names, e.g. "move"
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Forward lookup: raw id to name
    pub fn name(&self, id: u64) -> Option<&'static str> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.names.get(i))
            .copied()
    }

    /// Reverse lookup: name to raw id. Case-insensitive.
    pub fn id(&self, name: &str) -> Option<u64> {
        self.names
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|i| i as u64)
    }
}

/// Generation III move list; id 0 marks an empty move slot
pub static MOVES: SymbolTable = SymbolTable::new("move", &MOVE_NAMES);

/// Highest move id known to Generation III games
pub const MAX_MOVE_ID: u16 = 354;

static MOVE_NAMES: [&str; MAX_MOVE_ID as usize + 1] = [
    "None", "Pound", "Karate Chop", "Double Slap", "Comet Punch", // 0
    "Mega Punch", "Pay Day", "Fire Punch", "Ice Punch", "Thunder Punch", // 5
    "Scratch", "Vice Grip", "Guillotine", "Razor Wind", "Swords Dance", // 10
    "Cut", "Gust", "Wing Attack", "Whirlwind", "Fly", // 15
    "Bind", "Slam", "Vine Whip", "Stomp", "Double Kick", // 20
    "Mega Kick", "Jump Kick", "Rolling Kick", "Sand Attack", "Headbutt", // 25
    "Horn Attack", "Fury Attack", "Horn Drill", "Tackle", "Body Slam", // 30
    "Wrap", "Take Down", "Thrash", "Double-Edge", "Tail Whip", // 35
    "Poison Sting", "Twineedle", "Pin Missile", "Leer", "Bite", // 40
    "Growl", "Roar", "Sing", "Supersonic", "Sonic Boom", // 45
    "Disable", "Acid", "Ember", "Flamethrower", "Mist", // 50
    "Water Gun", "Hydro Pump", "Surf", "Ice Beam", "Blizzard", // 55
    "Psybeam", "Bubble Beam", "Aurora Beam", "Hyper Beam", "Peck", // 60
    "Drill Peck", "Submission", "Low Kick", "Counter", "Seismic Toss", // 65
    "Strength", "Absorb", "Mega Drain", "Leech Seed", "Growth", // 70
    "Razor Leaf", "Solar Beam", "Poison Powder", "Stun Spore", "Sleep Powder", // 75
    "Petal Dance", "String Shot", "Dragon Rage", "Fire Spin", "Thunder Shock", // 80
    "Thunderbolt", "Thunder Wave", "Thunder", "Rock Throw", "Earthquake", // 85
    "Fissure", "Dig", "Toxic", "Confusion", "Psychic", // 90
    "Hypnosis", "Meditate", "Agility", "Quick Attack", "Rage", // 95
    "Teleport", "Night Shade", "Mimic", "Screech", "Double Team", // 100
    "Recover", "Harden", "Minimize", "Smokescreen", "Confuse Ray", // 105
    "Withdraw", "Defense Curl", "Barrier", "Light Screen", "Haze", // 110
    "Reflect", "Focus Energy", "Bide", "Metronome", "Mirror Move", // 115
    "Self-Destruct", "Egg Bomb", "Lick", "Smog", "Sludge", // 120
    "Bone Club", "Fire Blast", "Waterfall", "Clamp", "Swift", // 125
    "Skull Bash", "Spike Cannon", "Constrict", "Amnesia", "Kinesis", // 130
    "Soft-Boiled", "High Jump Kick", "Glare", "Dream Eater", "Poison Gas", // 135
    "Barrage", "Leech Life", "Lovely Kiss", "Sky Attack", "Transform", // 140
    "Bubble", "Dizzy Punch", "Spore", "Flash", "Psywave", // 145
    "Splash", "Acid Armor", "Crabhammer", "Explosion", "Fury Swipes", // 150
    "Bonemerang", "Rest", "Rock Slide", "Hyper Fang", "Sharpen", // 155
    "Conversion", "Tri Attack", "Super Fang", "Slash", "Substitute", // 160
    "Struggle", "Sketch", "Triple Kick", "Thief", "Spider Web", // 165
    "Mind Reader", "Nightmare", "Flame Wheel", "Snore", "Curse", // 170
    "Flail", "Conversion 2", "Aeroblast", "Cotton Spore", "Reversal", // 175
    "Spite", "Powder Snow", "Protect", "Mach Punch", "Scary Face", // 180
    "Feint Attack", "Sweet Kiss", "Belly Drum", "Sludge Bomb", "Mud-Slap", // 185
    "Octazooka", "Spikes", "Zap Cannon", "Foresight", "Destiny Bond", // 190
    "Perish Song", "Icy Wind", "Detect", "Bone Rush", "Lock-On", // 195
    "Outrage", "Sandstorm", "Giga Drain", "Endure", "Charm", // 200
    "Rollout", "False Swipe", "Swagger", "Milk Drink", "Spark", // 205
    "Fury Cutter", "Steel Wing", "Mean Look", "Attract", "Sleep Talk", // 210
    "Heal Bell", "Return", "Present", "Frustration", "Safeguard", // 215
    "Pain Split", "Sacred Fire", "Magnitude", "Dynamic Punch", "Megahorn", // 220
    "Dragon Breath", "Baton Pass", "Encore", "Pursuit", "Rapid Spin", // 225
    "Sweet Scent", "Iron Tail", "Metal Claw", "Vital Throw", "Morning Sun", // 230
    "Synthesis", "Moonlight", "Hidden Power", "Cross Chop", "Twister", // 235
    "Rain Dance", "Sunny Day", "Crunch", "Mirror Coat", "Psych Up", // 240
    "Extreme Speed", "Ancient Power", "Shadow Ball", "Future Sight", "Rock Smash", // 245
    "Whirlpool", "Beat Up", "Fake Out", "Uproar", "Stockpile", // 250
    "Spit Up", "Swallow", "Heat Wave", "Hail", "Torment", // 255
    "Flatter", "Will-O-Wisp", "Memento", "Facade", "Focus Punch", // 260
    "Smelling Salts", "Follow Me", "Nature Power", "Charge", "Taunt", // 265
    "Helping Hand", "Trick", "Role Play", "Wish", "Assist", // 270
    "Ingrain", "Superpower", "Magic Coat", "Recycle", "Revenge", // 275
    "Brick Break", "Yawn", "Knock Off", "Endeavor", "Eruption", // 280
    "Skill Swap", "Imprison", "Refresh", "Grudge", "Snatch", // 285
    "Secret Power", "Dive", "Arm Thrust", "Camouflage", "Tail Glow", // 290
    "Luster Purge", "Mist Ball", "Feather Dance", "Teeter Dance", "Blaze Kick", // 295
    "Mud Sport", "Ice Ball", "Needle Arm", "Slack Off", "Hyper Voice", // 300
    "Poison Fang", "Crush Claw", "Blast Burn", "Hydro Cannon", "Meteor Mash", // 305
    "Astonish", "Weather Ball", "Aromatherapy", "Fake Tears", "Air Cutter", // 310
    "Overheat", "Odor Sleuth", "Rock Tomb", "Silver Wind", "Metal Sound", // 315
    "Grass Whistle", "Tickle", "Cosmic Power", "Water Spout", "Signal Beam", // 320
    "Shadow Punch", "Extrasensory", "Sky Uppercut", "Sand Tomb", "Sheer Cold", // 325
    "Muddy Water", "Bullet Seed", "Aerial Ace", "Icicle Spear", "Iron Defense", // 330
    "Block", "Howl", "Dragon Claw", "Frenzy Plant", "Bulk Up", // 335
    "Bounce", "Mud Shot", "Poison Tail", "Covet", "Volt Tackle", // 340
    "Magical Leaf", "Water Sport", "Calm Mind", "Leaf Blade", "Dragon Dance", // 345
    "Rock Blast", "Shock Wave", "Water Pulse", "Doom Desire", "Psycho Boost", // 350
];

/// Byte that ends a string in the game's character set; also the padding byte
pub const TEXT_TERMINATOR: u8 = 0xFF;

/// A single-byte character set
#[derive(Debug)]
pub struct Charset {
    pairs: &'static [(u8, char)],
}

impl Charset {
    pub const fn new(pairs: &'static [(u8, char)]) -> Self {
        Self { pairs }
    }

    /// Character for a byte, if the set has one
    pub fn char_of(&self, byte: u8) -> Option<char> {
        self.pairs.iter().find(|(b, _)| *b == byte).map(|&(_, c)| c)
    }

    /// Byte for a character, if the set has one
    pub fn byte_of(&self, ch: char) -> Option<u8> {
        self.pairs.iter().find(|(_, c)| *c == ch).map(|&(b, _)| b)
    }
}

/// Western Generation III text encoding. 0x00 is a space; 0xFF terminates.
pub static GEN3_CHARSET: Charset = Charset::new(&GEN3_CHARS);
static GEN3_CHARS: [(u8, char); 76] = [
    (0x00, ' '), (0xA1, '0'), (0xA2, '1'), (0xA3, '2'), (0xA4, '3'),
    (0xA5, '4'), (0xA6, '5'), (0xA7, '6'), (0xA8, '7'), (0xA9, '8'),
    (0xAA, '9'), (0xAB, '!'), (0xAC, '?'), (0xAD, '.'), (0xAE, '-'),
    (0xB0, '\u{2026}'), (0xB1, '\u{201C}'), (0xB2, '\u{201D}'), (0xB3, '\u{2018}'), (0xB4, '\u{2019}'),
    (0xB5, '\u{2642}'), (0xB6, '\u{2640}'), (0xB8, ','), (0xBA, '/'), (0xBB, 'A'),
    (0xBC, 'B'), (0xBD, 'C'), (0xBE, 'D'), (0xBF, 'E'), (0xC0, 'F'),
    (0xC1, 'G'), (0xC2, 'H'), (0xC3, 'I'), (0xC4, 'J'), (0xC5, 'K'),
    (0xC6, 'L'), (0xC7, 'M'), (0xC8, 'N'), (0xC9, 'O'), (0xCA, 'P'),
    (0xCB, 'Q'), (0xCC, 'R'), (0xCD, 'S'), (0xCE, 'T'), (0xCF, 'U'),
    (0xD0, 'V'), (0xD1, 'W'), (0xD2, 'X'), (0xD3, 'Y'), (0xD4, 'Z'),
    (0xD5, 'a'), (0xD6, 'b'), (0xD7, 'c'), (0xD8, 'd'), (0xD9, 'e'),
    (0xDA, 'f'), (0xDB, 'g'), (0xDC, 'h'), (0xDD, 'i'), (0xDE, 'j'),
    (0xDF, 'k'), (0xE0, 'l'), (0xE1, 'm'), (0xE2, 'n'), (0xE3, 'o'),
    (0xE4, 'p'), (0xE5, 'q'), (0xE6, 'r'), (0xE7, 's'), (0xE8, 't'),
    (0xE9, 'u'), (0xEA, 'v'), (0xEB, 'w'), (0xEC, 'x'), (0xED, 'y'),
    (0xEE, 'z'),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_lookup() {
        assert_eq!(MOVES.name(0), Some("None"));
        assert_eq!(MOVES.name(33), Some("Tackle"));
        assert_eq!(MOVES.name(85), Some("Thunderbolt"));
        assert_eq!(MOVES.name(354), Some("Psycho Boost"));
        assert_eq!(MOVES.name(355), None);
        assert_eq!(MOVES.name(u64::MAX), None);
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(MOVES.id("Tackle"), Some(33));
        assert_eq!(MOVES.id("thunderbolt"), Some(85));
        assert_eq!(MOVES.id("Hyperspace Fury"), None);
    }

    #[test]
    fn test_names_are_unique() {
        for (id, name) in MOVE_NAMES.iter().enumerate() {
            assert_eq!(MOVES.id(name), Some(id as u64), "duplicate name {name}");
        }
    }

    #[test]
    fn test_charset_lookup() {
        assert_eq!(GEN3_CHARSET.char_of(0xBB), Some('A'));
        assert_eq!(GEN3_CHARSET.char_of(0xD5), Some('a'));
        assert_eq!(GEN3_CHARSET.char_of(0xA1), Some('0'));
        assert_eq!(GEN3_CHARSET.char_of(0x00), Some(' '));
        assert_eq!(GEN3_CHARSET.char_of(TEXT_TERMINATOR), None);
        assert_eq!(GEN3_CHARSET.byte_of('z'), Some(0xEE));
        assert_eq!(GEN3_CHARSET.byte_of('\u{2642}'), Some(0xB5));
        assert_eq!(GEN3_CHARSET.byte_of('#'), None);
    }

    #[test]
    fn test_charset_is_a_bijection() {
        for &(byte, ch) in GEN3_CHARS.iter() {
            assert_eq!(GEN3_CHARSET.char_of(byte), Some(ch));
            assert_eq!(GEN3_CHARSET.byte_of(ch), Some(byte), "duplicate char {ch:?}");
        }
    }
}
