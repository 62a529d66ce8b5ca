use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::debug;

use crate::libs::bitstream::bitstream::BitStream;
use crate::libs::error::error::{Error, Result};

pub const DEFAULT_POLYNOMIAL: &str = "11111";

/// A generator polynomial, most significant coefficient first. The leading coefficient is
/// always 1, so long division is well defined and `degree()` redundant bits are produced.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Polynomial {
    bits: BitStream,
}

impl Polynomial {
    pub fn new(bits: BitStream) -> Result<Self> {
        if bits.len() < 2 || bits.leading_bit() != Some(true) {
            return Err(Error::InvalidPolynomial(bits.to_string()));
        }
        Ok(Self { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Number of redundant bits: one fewer than the number of coefficients.
    pub fn degree(&self) -> usize {
        self.bits.len() - 1
    }

    pub fn bits(&self) -> &BitStream {
        &self.bits
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        // x^4 + x^3 + x^2 + x + 1, as DEFAULT_POLYNOMIAL spells it
        Self { bits: BitStream::ones(DEFAULT_POLYNOMIAL.len()) }
    }
}

impl FromStr for Polynomial {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bits = s.parse::<BitStream>()
            .map_err(|_| Error::InvalidPolynomial(s.to_string()))?;
        Polynomial::new(bits)
    }
}

impl Display for Polynomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits)
    }
}

// Modulo-2 long division, a bit at a time. The working remainder is as wide as the divisor;
// once the last dividend bit has been brought down and the final subtraction made, its
// leading bit is always 0 and only the trailing degree() bits are returned.
pub fn compute_remainder(dividend: &BitStream, divisor: &Polynomial) -> Result<BitStream> {
    let p_len = divisor.len();
    let end = dividend.len();
    let mut rem = dividend.slice(0, p_len)?;
    for i in p_len..=end {
        if rem.leading_bit() == Some(true) {
            rem.xor_in_place(divisor.bits())?;
        }
        if i < end {
            rem = rem.shift_left_one();
            rem.set(p_len - 1, dividend.get(i)?)?;
        }
    }
    rem.slice(p_len - divisor.degree(), p_len)
}

/// Appends `len_crc` zero bits to the message, divides, and returns the message followed by
/// the remainder.
pub fn encode(message: &BitStream, divisor: &Polynomial, len_crc: usize) -> Result<BitStream> {
    check_crc_length(divisor, len_crc)?;
    let padded = BitStream::concat(message, &BitStream::zeros(len_crc));
    let remainder = compute_remainder(&padded, divisor)?;
    debug!("Encoded {} message bits with divisor {}, remainder {}", message.len(), divisor, remainder);
    Ok(BitStream::concat(message, &remainder))
}

pub fn encode_bytes(message: &[u8], divisor: &Polynomial, len_crc: usize) -> Result<BitStream> {
    encode(&BitStream::from_bytes(message), divisor, len_crc)
}

/// Divides the codeword as received. An all-zero result means no error was detected.
pub fn decode(codeword: &BitStream, divisor: &Polynomial, len_crc: usize) -> Result<BitStream> {
    check_crc_length(divisor, len_crc)?;
    let remainder = compute_remainder(codeword, divisor)?;
    debug!("Decoded {} codeword bits, remainder {}", codeword.len(), remainder);
    Ok(remainder)
}

fn check_crc_length(divisor: &Polynomial, len_crc: usize) -> Result<()> {
    if len_crc != divisor.degree() {
        return Err(Error::LengthMismatch { left: len_crc, right: divisor.degree() });
    }
    Ok(())
}

#[cfg(test)]
#[path = "./crc_spec.rs"]
mod crc_spec;
