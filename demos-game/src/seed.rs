//! Reversible match codes so hosts can share and replay seeded matches.
//! Code format: `DM-<WORD><NN>`, e.g. `DM-AGORA42`.

const CODE_PREFIX: &str = "DM";

pub const WORD_LIST: [&str; 64] = [
    "AGORA", "ARCHON", "ASSEMBLY", "BALLOT", "BOULE", "COUNCIL", "DEME", "DRACHMA", "EPHOR",
    "FORUM", "GROVE", "HARBOR", "HELOT", "HOPLITE", "KLEROS", "LAUREL", "LEVY", "MAGNATE",
    "MARKET", "METIC", "MINT", "OBOL", "OLIVE", "ORACLE", "ORATOR", "OSTRAKA", "PNYX", "POLIS",
    "PRESS", "PRYTANY", "QUORUM", "RALLY", "SENATE", "SHARD", "SPEECH", "STOA", "STRATEGOS",
    "TALENT", "TEMPLE", "THETES", "TITHE", "TRIBE", "TRIREME", "TYRANT", "URN", "VESSEL", "VETO",
    "VINE", "VOTE", "WINE", "ZEUGITE", "AMPHORA", "BRONZE", "CITIZEN", "DECREE", "EDICT", "FACTION",
    "GRAIN", "HERALD", "ISLAND", "JURY", "KILN", "LEDGER", "MANDATE",
];

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

fn normalize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Low 16 bits carry the word index (6 bits) and the two-digit suffix.
fn pack(word_index: u16, suffix: u8) -> u16 {
    (word_index & 0x3F) | (u16::from(suffix % 100) << 6)
}

fn unpack(packed: u16) -> (u16, u8) {
    let suffix = u8::try_from((packed >> 6) % 100).unwrap_or(0);
    (packed & 0x3F, suffix)
}

fn compose_seed(word_index: u16, suffix: u8) -> u64 {
    let packed = pack(word_index, suffix);
    let mut buf = [0u8; 9];
    buf[..6].copy_from_slice(b"DEMOS-");
    buf[6..8].copy_from_slice(&packed.to_le_bytes());
    buf[8] = 0x5A;
    (fnv1a64(&buf) & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render the code for a seed. Only the low 16 bits participate, so codes are
/// exact for seeds produced by [`parse_match_code`] or [`generate_code_from_entropy`].
#[must_use]
pub fn encode_match_code(seed: u64) -> String {
    let (word_index, suffix) = unpack((seed & 0xFFFF) as u16);
    let word = WORD_LIST
        .get(usize::from(word_index))
        .copied()
        .unwrap_or(WORD_LIST[0]);
    format!("{CODE_PREFIX}-{word}{suffix:02}")
}

/// Decode a match code into its seed.
#[must_use]
pub fn parse_match_code(code: &str) -> Option<u64> {
    let (prefix, rest) = code.trim().split_once('-')?;
    if !prefix.eq_ignore_ascii_case(CODE_PREFIX) || rest.len() < 3 || !rest.is_ascii() {
        return None;
    }
    let (word_part, suffix_part) = rest.split_at(rest.len() - 2);
    let suffix: u8 = suffix_part.parse().ok()?;
    let word = normalize_word(word_part);
    let index = WORD_LIST.iter().position(|candidate| *candidate == word)?;
    let word_index = u16::try_from(index).ok()?;
    Some(compose_seed(word_index, suffix))
}

/// Build a fresh code from host entropy (e.g. a clock reading).
#[must_use]
pub fn generate_code_from_entropy(entropy: u64) -> String {
    let word_index = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let suffix = u8::try_from((entropy >> 17) % 100).unwrap_or(0);
    encode_match_code(compose_seed(word_index, suffix))
}
