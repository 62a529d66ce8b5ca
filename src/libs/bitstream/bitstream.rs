use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bitvec::prelude::*;

use crate::libs::error::error::{Error, Result};

/// An ordered, indexable, growable sequence of bits, MSB-first within each byte of the
/// backing store. Binary operations insist on equal lengths rather than truncating.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct BitStream {
    bits: BitVec<u8, Msb0>,
}

impl BitStream {
    pub fn new() -> Self {
        Self { bits: BitVec::new() }
    }

    /// Each byte becomes 8 bits, most significant bit first, in the order given.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self { bits: BitVec::<u8, Msb0>::from_slice(bytes) }
    }

    pub fn zeros(n: usize) -> Self {
        Self { bits: BitVec::repeat(false, n) }
    }

    pub fn ones(n: usize) -> Self {
        Self { bits: BitVec::repeat(true, n) }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        Ok(self.bits[index])
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        self.check_index(index)?;
        self.bits.set(index, value);
        Ok(())
    }

    pub fn flip(&mut self, index: usize) -> Result<()> {
        let bit = self.get(index)?;
        self.bits.set(index, !bit);
        Ok(())
    }

    pub fn leading_bit(&self) -> Option<bool> {
        self.bits.first().map(|bit| *bit)
    }

    /// Copies bits `[lo, hi)` into a new, independent stream.
    pub fn slice(&self, lo: usize, hi: usize) -> Result<BitStream> {
        if lo > hi || hi > self.len() {
            return Err(Error::Range { lo, hi, len: self.len() });
        }
        Ok(Self { bits: self.bits[lo..hi].to_bitvec() })
    }

    pub fn concat(a: &BitStream, b: &BitStream) -> BitStream {
        let mut out = a.clone();
        out.append(b);
        out
    }

    pub fn append(&mut self, other: &BitStream) {
        self.bits.extend_from_bitslice(&other.bits);
    }

    /// Drops bit 0 and appends a 0 at the end, for the caller to overwrite with the next
    /// incoming bit.
    pub fn shift_left_one(&self) -> BitStream {
        if self.is_empty() {
            return BitStream::new();
        }
        let mut bits = self.bits[1..].to_bitvec();
        bits.push(false);
        Self { bits }
    }

    pub fn xor_in_place(&mut self, other: &BitStream) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::LengthMismatch { left: self.len(), right: other.len() });
        }
        for (mut bit, other_bit) in self.bits.iter_mut().zip(other.bits.iter().by_vals()) {
            *bit ^= other_bit;
        }
        Ok(())
    }

    /// Bitwise equality that refuses to compare streams of different lengths.
    pub fn same_bits_as(&self, other: &BitStream) -> Result<bool> {
        if self.len() != other.len() {
            return Err(Error::LengthMismatch { left: self.len(), right: other.len() });
        }
        Ok(self.bits == other.bits)
    }

    pub fn is_zero(&self) -> bool {
        self.bits.not_any()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(Error::IndexOutOfRange { index, len: self.len() });
        }
        Ok(())
    }
}

impl FromStr for BitStream {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bits = BitVec::<u8, Msb0>::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return Err(Error::InvalidBitString(s.to_string())),
            }
        }
        Ok(Self { bits })
    }
}

impl Display for BitStream {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "./bitstream_spec.rs"]
mod bitstream_spec;
