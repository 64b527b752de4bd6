use crate::network::Network;
use crate::wallet::{Wallet, WalletConfig};

use super::ZERO_ENTROPY;

impl Wallet {
    /// Wallet of [`ZERO_ENTROPY`] with the empty passphrase
    pub fn dummy(network: Network) -> Self {
        let config = WalletConfig::new().with_network(network);
        Wallet::from_entropy_with_config(&ZERO_ENTROPY, b"", config)
            .expect("zero entropy is a valid length")
    }
}
