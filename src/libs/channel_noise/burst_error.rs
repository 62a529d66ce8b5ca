use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_derive::{Deserialize, Serialize};

use crate::libs::bitstream::bitstream::BitStream;
use crate::libs::error::error::{Error, Result};

/// Mixed into the burst offset to seed the generator, so neighbouring offsets give
/// unrelated-looking flip patterns.
pub const SEED_SALT: u64 = 432433212;

/// Which bit closes the burst window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailingEdge {
    /// Flip `offset + n - 1`: the window is exactly n bits.
    LastBurstBit,
    /// Set `offset + n - 1` to the inverse of `offset + n`, leaving `offset + n` alone. The
    /// closing bit only changes when the two were equal, and the window reads n + 1 bits.
    InvertedFollowingBit,
}

/// How many interior positions are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteriorFlips {
    /// Draw the count uniformly from [0, n - 1).
    Uniform,
    Fixed(usize),
}

impl InteriorFlips {
    pub fn burst_minus_three(burst_len: usize) -> Self {
        InteriorFlips::Fixed(burst_len.saturating_sub(3))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurstPolicy {
    pub trailing_edge: TrailingEdge,
    pub interior_flips: InteriorFlips,
}

impl Default for BurstPolicy {
    fn default() -> Self {
        Self {
            trailing_edge: TrailingEdge::LastBurstBit,
            interior_flips: InteriorFlips::Uniform,
        }
    }
}

/// Number of codeword bits a burst of `burst_len` touches under this policy.
pub fn burst_span(burst_len: usize, policy: &BurstPolicy) -> usize {
    match policy.trailing_edge {
        TrailingEdge::LastBurstBit => burst_len,
        TrailingEdge::InvertedFollowingBit => burst_len.saturating_add(1),
    }
}

/// Flips a burst of `burst_len` bits starting at `offset`, reproducibly: the offset doubles
/// as the seed. The first bit is always flipped and the closing bit follows the policy's
/// trailing edge; interior positions are drawn from [1, n - 1) and duplicate draws are
/// dropped, so the interior count is an upper bound.
pub fn corrupt(mut codeword: BitStream, burst_len: usize, offset: usize, policy: &BurstPolicy) -> Result<BitStream> {
    if burst_len < 2 {
        return Err(Error::InvalidBurstLength(burst_len));
    }
    let last_bit = offset
        .checked_add(burst_span(burst_len, policy) - 1)
        .ok_or(Error::IndexOutOfRange { index: usize::MAX, len: codeword.len() })?;
    if last_bit >= codeword.len() {
        return Err(Error::IndexOutOfRange { index: last_bit, len: codeword.len() });
    }

    let mut rng = ChaCha8Rng::seed_from_u64((offset as u64).wrapping_add(SEED_SALT));

    codeword.flip(offset)?;
    match policy.trailing_edge {
        TrailingEdge::LastBurstBit => codeword.flip(last_bit)?,
        TrailingEdge::InvertedFollowingBit => {
            let following = codeword.get(last_bit)?;
            codeword.set(last_bit - 1, !following)?
        }
    }

    let draws = match policy.interior_flips {
        InteriorFlips::Uniform => rng.gen_range(0..burst_len - 1),
        InteriorFlips::Fixed(count) => count,
    };
    let interior = burst_len - 2;
    let mut positions: Vec<usize> = Vec::with_capacity(draws.min(interior));
    if interior > 0 {
        for _ in 0..draws {
            // once every interior position is taken, later draws can only be duplicates
            if positions.len() == interior {
                break;
            }
            let pos = rng.gen_range(1..burst_len - 1);
            if !positions.contains(&pos) {
                positions.push(pos);
            }
        }
    }
    for pos in &positions {
        codeword.flip(offset + pos)?;
    }
    debug!("Burst of {} at offset {}: {} draws, interior flips at {:?}", burst_len, offset, draws, positions);
    Ok(codeword)
}

#[cfg(test)]
#[path = "./burst_error_spec.rs"]
mod burst_error_spec;
