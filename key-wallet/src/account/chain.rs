//! Address chains beneath an account key

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bip32::ChildNumber;

/// Which chain of an account an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AddressChain {
    /// Receiving addresses, handed out to payers
    External,
    /// Change addresses, used by the wallet itself
    Internal,
}

impl AddressChain {
    /// Chain for the `internal` flag of the address generation call
    pub fn from_internal(internal: bool) -> Self {
        if internal {
            AddressChain::Internal
        } else {
            AddressChain::External
        }
    }

    /// BIP44 change index of the chain
    pub fn index(self) -> u32 {
        match self {
            AddressChain::External => 0,
            AddressChain::Internal => 1,
        }
    }

    pub(crate) fn child_number(self) -> ChildNumber {
        ChildNumber::Normal {
            index: self.index(),
        }
    }
}

impl fmt::Display for AddressChain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressChain::External => write!(f, "external"),
            AddressChain::Internal => write!(f, "internal"),
        }
    }
}
