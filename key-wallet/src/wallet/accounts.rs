//! Account management for wallets
//!
//! Accounts returned by [`Wallet::create_account`] are independent of the
//! wallet. Accounts added with [`Wallet::add_account`] are kept in it.

use tracing::debug;

use super::Wallet;
use crate::account::Account;
use crate::error::{Error, Result};

impl Wallet {
    /// Derive the account `m/44'/1815'/index'`.
    ///
    /// `alias` is a label only and does not affect derivation.
    pub fn create_account(&self, alias: &str, index: u32) -> Result<Account> {
        let account = Account::from_root(&self.root_xprv, alias, index, &self.config)?;
        debug!("created account {} ({}) at {}", index, alias, account.derivation_path());
        Ok(account)
    }

    /// Derive an account and keep it in the wallet
    pub fn add_account(&mut self, alias: &str, index: u32) -> Result<&Account> {
        if self.accounts.contains_key(&index) {
            return Err(Error::InvalidParameter(format!("Account {} already exists", index)));
        }
        let account = self.create_account(alias, index)?;
        Ok(self.accounts.entry(index).or_insert(account))
    }

    /// Account kept at `index`
    pub fn account(&self, index: u32) -> Option<&Account> {
        self.accounts.get(&index)
    }

    /// Stop keeping the account at `index`
    pub fn remove_account(&mut self, index: u32) -> Option<Account> {
        self.accounts.remove(&index)
    }

    /// Accounts kept by the wallet, by increasing index
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}
