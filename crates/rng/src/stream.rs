use crate::philox::philox_4x32_10;
use serde::{Deserialize, Serialize};

const F64_NORM: f64 = 1.0 / (u32::MAX as f64 + 1.0);

/// Serializable snapshot of an `RngStream`'s position, per the
/// `state()`/`set_state()` contract in §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RngState {
    pub key: [u32; 2],
    pub counter: [u32; 4],
    pub buffer: [u32; 4],
    pub buffer_index: u8,
}

/// One independent substream of the Philox-4x32-10 generator. The low 64
/// bits of the counter (`counter[0..2]`) advance once per 4-output block
/// consumed; the high 64 bits (`counter[2..4]`) identify the substream
/// and are only touched by `split`/`jump`, which is what keeps distinct
/// streams from ever producing the same counter value (I4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RngStream {
    key: [u32; 2],
    counter: [u32; 4],
    buffer: [u32; 4],
    buffer_index: u8,
}

impl RngStream {
    /// Construct a stream directly from a key and a counter position.
    /// Used by `StreamFactory` to hand out non-overlapping substreams.
    pub fn new(key: [u32; 2], counter: [u32; 4]) -> Self {
        Self {
            key,
            counter,
            buffer: [0; 4],
            buffer_index: 4, // force a refill on first draw
        }
    }

    pub fn state(&self) -> RngState {
        RngState {
            key: self.key,
            counter: self.counter,
            buffer: self.buffer,
            buffer_index: self.buffer_index,
        }
    }

    pub fn set_state(&mut self, state: RngState) {
        self.key = state.key;
        self.counter = state.counter;
        self.buffer = state.buffer;
        self.buffer_index = state.buffer_index;
    }

    fn refill(&mut self) {
        self.buffer = philox_4x32_10(self.counter, self.key);
        self.buffer_index = 0;
        increment_low(&mut self.counter);
    }

    fn next_u32(&mut self) -> u32 {
        if self.buffer_index >= 4 {
            self.refill();
        }
        let value = self.buffer[self.buffer_index as usize];
        self.buffer_index += 1;
        value
    }

    /// uniform draw on the open interval (0, 1), following Random123's
    /// convention of mapping through the midpoint of each 32-bit bucket
    /// so the result is never exactly 0.0 or 1.0.
    pub fn next_uniform(&mut self) -> f64 {
        (self.next_u32() as f64 + 0.5) * F64_NORM
    }

    /// uniform integer draw on [0, max)
    pub fn next_int(&mut self, max: u64) -> u64 {
        assert!(max > 0, "next_int requires a positive bound");
        (self.next_uniform() * max as f64).floor() as u64
    }

    /// Box-Muller normal draw, guarding the log-domain input per §4.1.
    pub fn next_normal(&mut self, mu: f64, sigma: f64) -> f64 {
        const EPS: f64 = 1e-12;
        let u1 = self.next_uniform().max(EPS);
        let u2 = self.next_uniform();
        let radius = (-2.0 * u1.ln()).sqrt();
        let z = radius * (std::f64::consts::TAU * u2).cos();
        mu + sigma * z
    }

    /// advance the counter by 2^64, i.e. skip to an entirely fresh block
    /// of the high counter half.
    pub fn jump(&mut self) {
        let hi = u64::from_le_bytes(words_to_bytes(self.counter[2], self.counter[3]));
        let hi = hi.wrapping_add(1);
        let (c2, c3) = bytes_to_words(hi.to_le_bytes());
        self.counter[2] = c2;
        self.counter[3] = c3;
        self.counter[0] = 0;
        self.counter[1] = 0;
        self.buffer_index = 4;
    }

    /// Derive an independent substream. Pure in (self, index) (I4):
    /// mixes the parent's high counter half with `index` through a
    /// splitmix64-style finalizer, giving a fresh, well-distributed
    /// high-counter value with the same key and a zeroed low counter.
    pub fn split(&self, index: u64) -> RngStream {
        let parent_hi = u64::from_le_bytes(words_to_bytes(self.counter[2], self.counter[3]));
        let mixed = splitmix64(parent_hi ^ splitmix64(index));
        let (c2, c3) = bytes_to_words(mixed.to_le_bytes());
        RngStream::new(self.key, [0, 0, c2, c3])
    }
}

fn increment_low(counter: &mut [u32; 4]) {
    let (next, carry) = counter[0].overflowing_add(1);
    counter[0] = next;
    if carry {
        counter[1] = counter[1].wrapping_add(1);
    }
}

fn words_to_bytes(lo: u32, hi: u32) -> [u8; 8] {
    let mut bytes = [0u8; 8];
    bytes[0..4].copy_from_slice(&lo.to_le_bytes());
    bytes[4..8].copy_from_slice(&hi.to_le_bytes());
    bytes
}

fn bytes_to_words(bytes: [u8; 8]) -> (u32, u32) {
    let lo = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
    let hi = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    (lo, hi)
}

/// splitmix64 finalizer, used purely as a cheap deterministic mixing
/// function for substream derivation (not as a generator in its own
/// right).
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
