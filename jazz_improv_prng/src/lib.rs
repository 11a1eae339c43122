// Seedable random-number handle for corpus sampling.
//
// xoshiro256++ (Blackman & Vigna, 2019) with its state expanded from a single
// `u64` by SplitMix64. There is no process-wide seed anywhere in the
// workspace: every consumer (the window sampler, test harnesses, the CLI)
// owns a `SamplerRng` and lends it out as `&mut SamplerRng`, so two samplers
// seeded alike draw identical offsets even when they run side by side.
//
// Output must be bit-identical across platforms and optimization levels.
// Keep floating point out of the generator and its range helpers.

use serde::{Deserialize, Serialize};

/// Seed used when the caller does not pick one. Matches the fixed seed the
/// training data has always been drawn with.
pub const DEFAULT_SEED: u64 = 0;

/// Explicit xoshiro256++ generator state.
///
/// Serializable so a half-consumed stream can be checkpointed and resumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerRng {
    s: [u64; 4],
}

impl Default for SamplerRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl SamplerRng {
    /// Seed a generator. Equal seeds give equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform integer in `[low, high)`, rejection-sampled to avoid modulo
    /// bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        // (2^64 - span) % span
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform index in `[0, n)`, the usual "pick one of n" draw.
    ///
    /// Panics if `n == 0`.
    pub fn below(&mut self, n: usize) -> usize {
        assert!(n > 0, "below: n must be positive");
        self.range_usize(0, n)
    }
}

/// SplitMix64 step; only used to expand a seed into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
