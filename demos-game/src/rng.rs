//! Per-match randomness: one user seed fans out into independent, counted
//! streams so that adding draws to one subsystem never shifts another.
use hmac::{Hmac, Mac};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

/// The only random source the engine reads from.
#[derive(Debug, Clone)]
pub struct MatchRng {
    seed: u64,
    elections: CountingRng<ChaCha20Rng>,
    turn_order: CountingRng<ChaCha20Rng>,
    bribery: CountingRng<ChaCha20Rng>,
}

impl MatchRng {
    /// Construct every stream from a host-supplied match seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            elections: CountingRng::new(derive_stream_seed(seed, b"elections")),
            turn_order: CountingRng::new(derive_stream_seed(seed, b"turn-order")),
            bribery: CountingRng::new(derive_stream_seed(seed, b"bribery")),
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Election block policy, award and name draws.
    pub const fn elections(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.elections
    }

    /// Turn order permutations.
    pub const fn turn_order(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.turn_order
    }

    /// Bribery backfire rolls.
    pub const fn bribery(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.bribery
    }

    /// Total draws across all streams.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.elections
            .draws()
            .saturating_add(self.turn_order.draws())
            .saturating_add(self.bribery.draws())
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<ChaCha20Rng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(match_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    // HMAC accepts keys of any length, so keying never fails for an 8-byte seed.
    if let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&match_seed.to_le_bytes()) {
        mac.update(domain_tag);
        let digest = mac.finalize().into_bytes();
        bytes.copy_from_slice(&digest[..8]);
    }
    u64::from_le_bytes(bytes)
}
