//! Complete wallet management for Cardano
//!
//! A wallet owns the root extended private key derived from the mnemonic
//! entropy, its configuration, and the accounts it was asked to keep.

pub mod accounts;
pub mod config;
pub mod initialization;

use alloc::collections::BTreeMap;
use core::fmt;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

pub use self::config::WalletConfig;
use crate::account::Account;
use crate::bip32::{XPrv, XPub};
use crate::transaction::StagingTransaction;

/// Complete wallet implementation
pub struct Wallet {
    /// Unique wallet ID (Blake2b-256 hash of the root public key)
    wallet_id: [u8; 32],
    /// Wallet configuration
    config: WalletConfig,
    /// Root extended private key
    root_xprv: XPrv,
    /// Accounts kept by the wallet, by index
    accounts: BTreeMap<u32, Account>,
}

impl Wallet {
    /// Compute wallet ID from root public key
    pub fn compute_wallet_id(root_xpub: &XPub) -> [u8; 32] {
        let mut id = [0u8; 32];
        id.copy_from_slice(&Blake2b::<U32>::digest(root_xpub.as_bytes()));
        id
    }

    /// Unique wallet ID
    pub fn wallet_id(&self) -> &[u8; 32] {
        &self.wallet_id
    }

    /// Wallet configuration
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// Root extended public key
    pub fn root_xpub(&self) -> XPub {
        self.root_xprv.public()
    }

    /// Start a transaction using the configured fee algorithm
    pub fn new_staging_transaction(&self) -> StagingTransaction {
        StagingTransaction::with_fee(self.config.fee)
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format wallet ID as hex string (first 8 chars)
        let id_hex = hex::encode(&self.wallet_id[..4]);
        write!(f, "Wallet [{}...] ({}) - {} accounts", id_hex, self.config.network, self.accounts.len())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("wallet_id", &hex::encode(self.wallet_id))
            .field("config", &self.config)
            .field("root_xprv", &"<hidden>")
            .field("accounts", &self.accounts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    #[test]
    fn test_wallet_display() {
        let wallet = Wallet::from_entropy(&[0u8; 16], b"").unwrap();
        let shown = wallet.to_string();
        assert!(shown.starts_with("Wallet ["));
        assert!(shown.ends_with("(mainnet) - 0 accounts"));
    }

    #[test]
    fn test_wallet_id_follows_root_key() {
        let a = Wallet::from_entropy(&[0u8; 16], b"").unwrap();
        let b = Wallet::from_entropy(&[0u8; 16], b"").unwrap();
        let c = Wallet::from_entropy(&[1u8; 16], b"").unwrap();
        assert_eq!(a.wallet_id(), b.wallet_id());
        assert_ne!(a.wallet_id(), c.wallet_id());
        assert_eq!(a.wallet_id(), &Wallet::compute_wallet_id(&a.root_xpub()));
    }

    #[test]
    fn test_staging_uses_configured_fee() {
        let config = WalletConfig::new()
            .with_network(Network::Preview)
            .with_fee(crate::transaction::LinearFee::new(0, 0));
        let wallet = Wallet::from_entropy_with_config(&[0u8; 16], b"", config).unwrap();
        assert_eq!(wallet.new_staging_transaction().estimate_fee().unwrap().as_u64(), 0);
    }

    #[test]
    fn test_debug_hides_root_key() {
        let wallet = Wallet::from_entropy(&[0u8; 16], b"").unwrap();
        assert!(format!("{:?}", wallet).contains("<hidden>"));
    }
}
