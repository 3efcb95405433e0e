/// Philox-4x32-10 round constants (Salmon et al., "Parallel Random Numbers:
/// As Easy as 1, 2, 3").
const MUL0: u32 = 0xD251_1F53;
const MUL1: u32 = 0xCD9E_8D57;
const WEYL0: u32 = 0x9E37_79B9;
const WEYL1: u32 = 0xBB67_AE85;
const ROUNDS: u32 = 10;

/// One Philox-4x32-10 block evaluation: maps a 128-bit counter and a
/// 64-bit key to four independent 32-bit outputs. Pure function — same
/// inputs always produce the same outputs, which is what makes the
/// surrounding `RngStream` reproducible and splittable (I3, I4).
pub fn philox_4x32_10(mut counter: [u32; 4], mut key: [u32; 2]) -> [u32; 4] {
    for _ in 0..ROUNDS {
        counter = round(counter, key);
        key[0] = key[0].wrapping_add(WEYL0);
        key[1] = key[1].wrapping_add(WEYL1);
    }
    counter
}

fn round(c: [u32; 4], k: [u32; 2]) -> [u32; 4] {
    let (hi0, lo0) = mulhilo(c[0], MUL0);
    let (hi1, lo1) = mulhilo(c[2], MUL1);
    [hi1 ^ c[1] ^ k[0], lo1, hi0 ^ c[3] ^ k[1], lo0]
}

fn mulhilo(a: u32, b: u32) -> (u32, u32) {
    let product = (a as u64) * (b as u64);
    ((product >> 32) as u32, product as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_for_same_inputs() {
        let out1 = philox_4x32_10([1, 2, 3, 4], [5, 6]);
        let out2 = philox_4x32_10([1, 2, 3, 4], [5, 6]);
        assert_eq!(out1, out2);
    }

    #[test]
    fn sensitive_to_counter() {
        let out1 = philox_4x32_10([0, 0, 0, 0], [0, 0]);
        let out2 = philox_4x32_10([1, 0, 0, 0], [0, 0]);
        assert_ne!(out1, out2);
    }

    #[test]
    fn sensitive_to_key() {
        let out1 = philox_4x32_10([0, 0, 0, 0], [0, 0]);
        let out2 = philox_4x32_10([0, 0, 0, 0], [1, 0]);
        assert_ne!(out1, out2);
    }
}
