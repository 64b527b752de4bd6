//! Fee calculation
//!
//! Byron fees are linear in the size of the signed transaction:
//! `fee = constant + coefficient * size`, with both parameters carried in
//! thousandths of a lovelace and the result rounded up.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Coin, Error};

/// Linear fee algorithm, parameters in milli-lovelace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearFee {
    /// Fixed part of the fee
    constant: u64,
    /// Fee per byte
    coefficient: u64,
}

impl Default for LinearFee {
    fn default() -> Self {
        Self::BYRON_MAINNET
    }
}

impl LinearFee {
    /// 155381 lovelace plus 43.946 lovelace per byte
    pub const BYRON_MAINNET: LinearFee = LinearFee {
        constant: 155_381_000,
        coefficient: 43_946,
    };

    /// Create a fee algorithm from milli-lovelace parameters
    pub const fn new(constant_milli: u64, coefficient_milli: u64) -> Self {
        Self {
            constant: constant_milli,
            coefficient: coefficient_milli,
        }
    }

    /// Fixed part, in milli-lovelace
    pub fn constant(&self) -> u64 {
        self.constant
    }

    /// Per byte part, in milli-lovelace
    pub fn coefficient(&self) -> u64 {
        self.coefficient
    }

    /// Fee for a transaction of `size` bytes
    pub fn estimate(&self, size: usize) -> Result<Coin, Error> {
        let milli = u64::try_from(size)
            .ok()
            .and_then(|size| self.coefficient.checked_mul(size))
            .and_then(|per_byte| per_byte.checked_add(self.constant))
            .ok_or(Error::ValueOverflow)?;
        // Round up to ensure we pay at least the minimum fee
        Coin::new(milli.div_ceil(1000))
    }
}
