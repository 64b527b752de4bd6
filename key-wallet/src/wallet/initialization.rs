//! Wallet initialization methods
//!
//! This module contains all methods for creating and initializing wallets.
//!
//! The root key follows the Icarus scheme: 96 bytes of
//! `PBKDF2-HMAC-SHA512(password = passphrase, salt = entropy, 4096 rounds)`
//! clamped into an extended private key. An empty passphrase is the same as
//! no passphrase at all.

use alloc::collections::BTreeMap;

use sha2::Sha512;
use tracing::debug;
use zeroize::Zeroizing;

use super::{Wallet, WalletConfig};
use crate::bip32::{XPrv, XPRV_SIZE};
use crate::error::Result;
use crate::mnemonic::{Entropy, Mnemonic};

/// PBKDF2 rounds used to stretch the entropy
pub const PBKDF2_ROUNDS: u32 = 4096;

fn root_key(entropy: &Entropy, passphrase: &[u8]) -> XPrv {
    let mut seed = Zeroizing::new([0u8; XPRV_SIZE]);
    pbkdf2::pbkdf2_hmac::<Sha512>(passphrase, entropy.as_bytes(), PBKDF2_ROUNDS, &mut seed[..]);
    XPrv::from_normalized_seed(&seed)
}

impl Wallet {
    /// Create a wallet from mnemonic entropy and a passphrase
    pub fn from_entropy(entropy: &[u8], passphrase: &[u8]) -> Result<Self> {
        Self::from_entropy_with_config(entropy, passphrase, WalletConfig::default())
    }

    /// Create a wallet from mnemonic entropy and a passphrase with a configuration
    pub fn from_entropy_with_config(
        entropy: &[u8],
        passphrase: &[u8],
        config: WalletConfig,
    ) -> Result<Self> {
        let entropy = Entropy::from_slice(entropy)?;
        Self::from_root_xprv(root_key(&entropy, passphrase), config)
    }

    /// Create a wallet from a mnemonic and a passphrase
    pub fn from_mnemonic(mnemonic: &Mnemonic, passphrase: &[u8]) -> Result<Self> {
        Self::from_mnemonic_with_config(mnemonic, passphrase, WalletConfig::default())
    }

    /// Create a wallet from a mnemonic and a passphrase with a configuration
    pub fn from_mnemonic_with_config(
        mnemonic: &Mnemonic,
        passphrase: &[u8],
        config: WalletConfig,
    ) -> Result<Self> {
        Self::from_root_xprv(root_key(mnemonic.entropy(), passphrase), config)
    }

    /// Create a wallet around an existing root extended private key
    pub fn from_root_xprv(root_xprv: XPrv, config: WalletConfig) -> Result<Self> {
        config.validate()?;
        let wallet_id = Self::compute_wallet_id(&root_xprv.public());
        debug!("created wallet {} on {}", hex::encode(&wallet_id[..4]), config.network);
        Ok(Self {
            wallet_id,
            config,
            root_xprv,
            accounts: BTreeMap::new(),
        })
    }

    /// Replace the configuration. Accounts already held keep their settings.
    pub fn with_config(mut self, config: WalletConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::network::Network;

    #[test]
    fn test_invalid_entropy_length() {
        let err = Wallet::from_entropy(&[0u8; 15], b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInputLength);
    }

    #[test]
    fn test_mnemonic_and_entropy_agree() {
        let mnemonic = Mnemonic::from_entropy(&[9u8; 32]).unwrap();
        let a = Wallet::from_mnemonic(&mnemonic, b"pass").unwrap();
        let b = Wallet::from_entropy(&[9u8; 32], b"pass").unwrap();
        assert_eq!(a.root_xpub(), b.root_xpub());
    }

    #[test]
    fn test_mnemonic_with_config() {
        let mnemonic = Mnemonic::from_entropy(&[9u8; 16]).unwrap();
        let config = WalletConfig::new().with_network(Network::Preview).with_max_address_batch(5);
        let wallet = Wallet::from_mnemonic_with_config(&mnemonic, b"", config).unwrap();

        assert_eq!(wallet.config(), &config);
        assert_eq!(wallet.root_xpub(), Wallet::from_mnemonic(&mnemonic, b"").unwrap().root_xpub());

        let invalid = WalletConfig::new().with_max_address_batch(0);
        let err = Wallet::from_mnemonic_with_config(&mnemonic, b"", invalid).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_passphrase_changes_root() {
        let a = Wallet::from_entropy(&[0u8; 16], b"").unwrap();
        let b = Wallet::from_entropy(&[0u8; 16], b"x").unwrap();
        assert_ne!(a.root_xpub(), b.root_xpub());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WalletConfig::new().with_max_address_batch(0);
        let err = Wallet::from_entropy_with_config(&[0u8; 16], b"", config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }
}
