use lifesim_rng::{RngStream, StreamFactory};

/// A primitive polynomial over GF(2) of the form
/// `x^degree + a_{degree-1} x^{degree-1} + ... + a_1 x + 1`, packed as
/// `a` with bit `i` (from the MSB side) holding coefficient `a_i`, plus
/// the initial odd direction numbers `m_1..m_degree` (`m_k < 2^k`).
///
/// The first handful of entries below are the textbook low-degree
/// primitive polynomials / initial direction numbers used by most Sobol
/// implementations descending from Bratley & Fox (1988); dimensions
/// beyond this table are synthesized from a fixed-seed Philox stream, as
/// the spec's §4.2 documents as an acceptable substitute for the full
/// Joe-Kuo 2010 tables.
struct Polynomial {
    degree: usize,
    a: u32,
    m_init: &'static [u32],
}

const BUILTIN_POLYNOMIALS: &[Polynomial] = &[
    Polynomial { degree: 1, a: 0, m_init: &[1] },
    Polynomial { degree: 2, a: 1, m_init: &[1, 3] },
    Polynomial { degree: 3, a: 1, m_init: &[1, 3, 7] },
    Polynomial { degree: 3, a: 2, m_init: &[1, 1, 5] },
    Polynomial { degree: 4, a: 1, m_init: &[1, 1, 1, 3] },
    Polynomial { degree: 4, a: 4, m_init: &[1, 3, 3, 9] },
    Polynomial { degree: 5, a: 2, m_init: &[1, 1, 3, 13, 9] },
    Polynomial { degree: 5, a: 4, m_init: &[1, 1, 1, 5, 11] },
    Polynomial { degree: 5, a: 13, m_init: &[1, 3, 5, 7, 31] },
    Polynomial { degree: 5, a: 16, m_init: &[1, 1, 7, 3, 29] },
    Polynomial { degree: 5, a: 22, m_init: &[1, 3, 7, 15, 19] },
    Polynomial { degree: 6, a: 1, m_init: &[1, 1, 1, 1, 1, 37] },
    Polynomial { degree: 6, a: 4, m_init: &[1, 1, 3, 3, 5, 21] },
    Polynomial { degree: 6, a: 7, m_init: &[1, 3, 3, 9, 9, 55] },
    Polynomial { degree: 6, a: 8, m_init: &[1, 3, 1, 15, 21, 51] },
    Polynomial { degree: 6, a: 14, m_init: &[1, 1, 5, 5, 1, 23] },
    Polynomial { degree: 6, a: 19, m_init: &[1, 3, 5, 11, 19, 61] },
    Polynomial { degree: 6, a: 21, m_init: &[1, 1, 7, 11, 23, 15] },
    Polynomial { degree: 6, a: 28, m_init: &[1, 3, 7, 13, 13, 15] },
    Polynomial { degree: 6, a: 31, m_init: &[1, 1, 1, 7, 27, 29] },
];

const BITS: usize = 32;

/// Direction numbers `V[0..32]` for one dimension, precomputed once and
/// immutable afterward (I5).
pub fn direction_numbers_for(dimension: usize, philox_seed: &StreamFactory) -> [u32; BITS] {
    if dimension < BUILTIN_POLYNOMIALS.len() {
        let poly = &BUILTIN_POLYNOMIALS[dimension];
        return expand(poly.degree, poly.a, poly.m_init);
    }
    synthesize_beyond_table(dimension, philox_seed)
}

/// Bratley & Fox recurrence: extends the initial direction numbers
/// `m_1..m_degree` out to 32 bits via
/// `m_k = 2 a_1 m_{k-1} XOR 2^2 a_2 m_{k-2} XOR ... XOR 2^{s-1} a_{s-1} m_{k-s+1} XOR 2^s m_{k-s} XOR m_{k-s}`,
/// then sets `v_k = m_k << (32-k)`.
fn expand(degree: usize, a: u32, m_init: &[u32]) -> [u32; BITS] {
    let mut m = vec![0u32; BITS + 1];
    m[1..=degree].copy_from_slice(m_init);
    for k in (degree + 1)..=BITS {
        let mut value = m[k - degree] ^ (m[k - degree] >> degree);
        for i in 1..degree {
            let coefficient_bit = (a >> (degree - 1 - i)) & 1;
            if coefficient_bit == 1 {
                value ^= m[k - i] << i;
            }
        }
        m[k] = value;
    }
    let mut v = [0u32; BITS];
    for k in 1..=BITS {
        v[k - 1] = if k == BITS { m[k] } else { m[k] << (BITS - k) };
    }
    v
}

/// For dimensions beyond the builtin table: a fixed-seed Philox stream
/// (same for every run, regardless of master seed — §4.2 requires the
/// *direction numbers* to be independent of the master seed, only the
/// scrambling permutations are master-seed-keyed) fills odd initial
/// direction numbers for a synthetic degree-8 primitive-like recursion.
/// This is a documented placeholder for the full Joe-Kuo 2010 table.
fn synthesize_beyond_table(dimension: usize, philox_seed: &StreamFactory) -> [u32; BITS] {
    const FIXED_STREAM_ID: u32 = 0xD1A5;
    let degree = 8;
    let mut stream: RngStream = philox_seed.stream(FIXED_STREAM_ID, dimension as u32);
    let mut m_init = vec![1u32; degree];
    for (k, slot) in m_init.iter_mut().enumerate().skip(1) {
        let bound = 1u64 << (k + 1);
        *slot = (stream.next_int(bound) as u32) | 1;
    }
    let a = (stream.next_int(1 << (degree - 1)) as u32) | 1;
    expand(degree, a, &m_init)
}

/// The fixed master seed used to synthesize direction numbers beyond the
/// builtin table — *not* the simulation's master seed. This keeps the
/// direction-number table identical across every run regardless of which
/// seed the caller picks, matching §4.2's "same for every run".
pub fn fixed_direction_seed() -> StreamFactory {
    StreamFactory::new(lifesim_rng::MasterSeed::from_str(
        "lifesim-sobol-direction-numbers-v1",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_dimension_is_van_der_corput() {
        let v = direction_numbers_for(0, &fixed_direction_seed());
        assert_eq!(v[0], 1u32 << 31);
        assert_eq!(v[1], 1u32 << 30);
    }

    #[test]
    fn synthesized_dimensions_are_deterministic() {
        let seed = fixed_direction_seed();
        let v1 = direction_numbers_for(25, &seed);
        let v2 = direction_numbers_for(25, &seed);
        assert_eq!(v1, v2);
    }

    #[test]
    fn distinct_high_dimensions_diverge() {
        let seed = fixed_direction_seed();
        let v1 = direction_numbers_for(25, &seed);
        let v2 = direction_numbers_for(26, &seed);
        assert_ne!(v1, v2);
    }
}
