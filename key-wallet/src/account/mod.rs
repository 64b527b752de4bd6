//! Account management for HD wallets
//!
//! An account is the hardened BIP44 node `m/44'/1815'/index'`. Addresses
//! hang below it on two soft chains, external (`0`) and internal (`1`),
//! and are derived from the account's public key.

pub mod chain;

use core::fmt;

use tracing::debug;

use crate::address::Address;
use crate::bip32::{ChildNumber, DerivationPath, XPrv, XPub, HARDENED_OFFSET};
use crate::derivation::bip44_account_path;
use crate::error::{Error, Result};
use crate::network::Network;
use crate::wallet::config::WalletConfig;

pub use chain::AddressChain;

/// A BIP44 account owning its own extended private key
pub struct Account {
    /// Caller supplied label
    alias: String,
    /// Hardened account index, without the hardened bit
    index: u32,
    /// `m/44'/1815'/index'`
    path: DerivationPath,
    /// Account-level extended private key
    xprv: XPrv,
    /// Account-level extended public key
    xpub: XPub,
    /// Network addresses are generated for
    network: Network,
    /// Maximum addresses per generation call
    max_address_batch: usize,
}

impl Account {
    /// Create an account from the root key of a wallet
    pub fn from_root(
        root: &XPrv,
        alias: impl Into<String>,
        index: u32,
        config: &WalletConfig,
    ) -> Result<Self> {
        let path = bip44_account_path(index)?;
        let xprv = root.derive_priv(&path);
        let xpub = xprv.public();
        Ok(Self {
            alias: alias.into(),
            index,
            path,
            xprv,
            xpub,
            network: config.network,
            max_address_batch: config.max_address_batch,
        })
    }

    /// Caller supplied label
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Account index
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Network addresses are generated for
    pub fn network(&self) -> Network {
        self.network
    }

    /// Derivation path of the account key
    pub fn derivation_path(&self) -> &DerivationPath {
        &self.path
    }

    /// Account-level extended public key
    pub fn xpub(&self) -> &XPub {
        &self.xpub
    }

    /// Extended public key of a chain
    pub fn chain_xpub(&self, chain: AddressChain) -> Result<XPub> {
        Ok(self.xpub.ckd_pub(chain.child_number())?)
    }

    /// Extended public key at `chain/index`
    pub fn public_key_at(&self, chain: AddressChain, index: u32) -> Result<XPub> {
        let child = ChildNumber::from_normal_idx(index)?;
        Ok(self.chain_xpub(chain)?.ckd_pub(child)?)
    }

    /// Extended private key at `chain/index`
    pub fn private_key_at(&self, chain: AddressChain, index: u32) -> Result<XPrv> {
        let child = ChildNumber::from_normal_idx(index)?;
        Ok(self.xprv.ckd_priv(chain.child_number()).ckd_priv(child))
    }

    /// Address at `chain/index`
    pub fn address_at(&self, chain: AddressChain, index: u32) -> Result<Address> {
        Ok(Address::new(&self.public_key_at(chain, index)?, self.network))
    }

    /// Generate `count` consecutive addresses of `chain` starting at `from_index`.
    ///
    /// The result is shorter than `count` only when the range runs past the
    /// last non-hardened index.
    pub fn generate_addresses(
        &self,
        chain: AddressChain,
        from_index: u32,
        count: usize,
    ) -> Result<Vec<Address>> {
        let mut addresses = Vec::new();
        self.fill_addresses(chain, from_index, count, &mut addresses)?;
        Ok(addresses)
    }

    /// Like [`Account::generate_addresses`], appending to `out`.
    ///
    /// Returns the number of addresses appended. Nothing is appended on error.
    pub fn fill_addresses(
        &self,
        chain: AddressChain,
        from_index: u32,
        count: usize,
        out: &mut Vec<Address>,
    ) -> Result<usize> {
        if count > self.max_address_batch {
            return Err(Error::ResourceLimitExceeded {
                requested: count,
                limit: self.max_address_batch,
            });
        }
        ChildNumber::from_normal_idx(from_index)?;

        let chain_xpub = self.chain_xpub(chain)?;
        let available = (HARDENED_OFFSET - from_index) as usize;
        let produced = count.min(available);
        let end = from_index + produced as u32;

        let batch = (from_index..end)
            .map(|index| {
                let xpub = chain_xpub.ckd_pub(ChildNumber::Normal {
                    index,
                })?;
                Ok(Address::new(&xpub, self.network))
            })
            .collect::<Result<Vec<_>>>()?;
        out.extend(batch);

        debug!(
            "account {} generated {} {} addresses from index {}",
            self.index, produced, chain, from_index
        );
        Ok(produced)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("alias", &self.alias)
            .field("index", &self.index)
            .field("path", &self.path)
            .field("xprv", &"<hidden>")
            .field("xpub", &self.xpub)
            .field("network", &self.network)
            .finish()
    }
}
