//! Key Wallet Library
//!
//! This library provides key derivation and wallet functionality for Cardano,
//! including BIP39 mnemonics, Ed25519 hierarchical deterministic keys,
//! Byron addresses and transaction staging.

extern crate alloc;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
#[macro_use]
mod test_macros;

pub mod account;
pub mod address;
pub mod bip32;
pub mod derivation;
pub mod error;
pub mod mnemonic;
pub mod network;
pub mod transaction;
pub(crate) mod utils;
pub mod wallet;

pub use account::{Account, AddressChain};
pub use address::{AddrType, Address, Attributes, ExtendedAddr};
pub use bip32::{ChainCode, ChildNumber, DerivationPath, XPrv, XPub};
pub use derivation::KeyDerivation;
pub use error::{Error, ErrorKind, Result};
pub use mnemonic::{Entropy, Language, Mnemonic};
pub use network::Network;
pub use transaction::{Coin, LinearFee, StagingTransaction, Tx, TxId, TxIn, TxOut, TxoPointer};
pub use wallet::{Wallet, WalletConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        Address, AddressChain, ChildNumber, Coin, DerivationPath, Error, ErrorKind, KeyDerivation,
        Mnemonic, Network, Result, StagingTransaction, Wallet, XPrv, XPub,
    };
}
