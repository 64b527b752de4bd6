//! Key derivation functionality
//!
//! A single [`KeyDerivation`] interface over private and public extended keys,
//! plus the BIP44 paths used for Cardano accounts and addresses.

use crate::bip32::{ChildNumber, DerivationPath, XPrv, XPub};
use crate::error::Result;

/// BIP44 purpose field
pub const BIP44_PURPOSE: u32 = 44;
/// Registered SLIP-44 coin type for ADA
pub const CARDANO_COIN_TYPE: u32 = 1815;

/// Key derivation interface
pub trait KeyDerivation: Sized {
    /// Derive the direct child at `child`
    fn derive_child(&self, child: ChildNumber) -> Result<Self>;

    /// Derive the key at the end of `path`. The master path `m` yields a fresh
    /// copy of `self`.
    fn derive_path(&self, path: &DerivationPath) -> Result<Self>;
}

impl KeyDerivation for XPrv {
    fn derive_child(&self, child: ChildNumber) -> Result<XPrv> {
        Ok(self.ckd_priv(child))
    }

    fn derive_path(&self, path: &DerivationPath) -> Result<XPrv> {
        Ok(self.derive_priv(path))
    }
}

impl KeyDerivation for XPub {
    fn derive_child(&self, child: ChildNumber) -> Result<XPub> {
        Ok(self.ckd_pub(child)?)
    }

    fn derive_path(&self, path: &DerivationPath) -> Result<XPub> {
        Ok(self.derive_pub(path)?)
    }
}

/// Derive the child of `parent` at the 31-bit `index`, hardened or not.
pub fn derive_child<K: KeyDerivation>(parent: &K, index: u32, hardened: bool) -> Result<K> {
    let child = ChildNumber::from_index(index, hardened)?;
    parent.derive_child(child)
}

/// `m/44'/1815'/account'`
pub fn bip44_account_path(account: u32) -> Result<DerivationPath> {
    Ok(DerivationPath::from(vec![
        ChildNumber::from_hardened_idx(BIP44_PURPOSE)?,
        ChildNumber::from_hardened_idx(CARDANO_COIN_TYPE)?,
        ChildNumber::from_hardened_idx(account)?,
    ]))
}

/// `m/44'/1815'/account'/chain/index`
pub fn bip44_address_path(account: u32, chain: u32, index: u32) -> Result<DerivationPath> {
    Ok(bip44_account_path(account)?
        .child(ChildNumber::from_normal_idx(chain)?)
        .child(ChildNumber::from_normal_idx(index)?))
}
