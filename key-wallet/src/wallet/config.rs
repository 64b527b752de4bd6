//! Wallet configuration
//!
//! This module defines the configuration options for wallets.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::network::Network;
use crate::transaction::LinearFee;

/// Default maximum number of addresses produced by one generation call
pub const DEFAULT_MAX_ADDRESS_BATCH: usize = 1000;

/// Wallet configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WalletConfig {
    /// Network addresses are generated for
    pub network: Network,
    /// Maximum number of addresses one generation call may produce
    pub max_address_batch: usize,
    /// Fee algorithm for staged transactions
    pub fee: LinearFee,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            max_address_batch: DEFAULT_MAX_ADDRESS_BATCH,
            fee: LinearFee::default(),
        }
    }
}

impl WalletConfig {
    /// Create a new wallet configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the network
    pub fn with_network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Set the address batch limit
    pub fn with_max_address_batch(mut self, limit: usize) -> Self {
        self.max_address_batch = limit;
        self
    }

    /// Set the fee algorithm
    pub fn with_fee(mut self, fee: LinearFee) -> Self {
        self.fee = fee;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.max_address_batch == 0 {
            return Err(crate::error::Error::InvalidParameter(
                "Address batch limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
