/// The xorshift128 generator the game engine uses for its save parameters.
///
/// Output must stay bit-exact with the engine, every derived key depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeadRandom {
    state: [u32; 4],
}

const SEED_MULTIPLIER: u32 = 0x6C07_8965;

impl SeadRandom {
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        let mut state = [0; 4];
        let mut seed = seed;

        let mut i = 0;
        while i < state.len() {
            state[i] = SEED_MULTIPLIER
                .wrapping_mul(seed ^ (seed >> 30))
                .wrapping_add(i as u32 + 1);
            seed = state[i];
            i += 1;
        }

        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        let [s0, s1, s2, s3] = self.state;
        let t = s0 ^ (s0 << 11);
        let next = t ^ (t >> 8) ^ s3 ^ (s3 >> 19);

        self.state = [s1, s2, s3, next];
        next
    }

    /// Advances the state by two `u32` draws, returning them as `(first << 32) | second`.
    pub fn next_u64(&mut self) -> u64 {
        let [s0, s1, _, s3] = self.state;
        let t0 = s0 ^ (s0 << 11);
        let t1 = s1 ^ (s1 << 11);
        let partial = t0 ^ (t0 >> 8) ^ s3;

        let hi = partial ^ (s3 >> 19);
        let lo = t1 ^ (t1 >> 8) ^ hi ^ (partial >> 19);

        self.state = [self.state[2], s3, hi, lo];
        ((hi as u64) << 32) | lo as u64
    }
}
