//! Cardano network types

use core::fmt;

/// Protocol magic of the Cardano mainnet
pub const MAINNET_MAGIC: u32 = 764824073;
/// Protocol magic of the legacy Byron testnet
pub const TESTNET_MAGIC: u32 = 1097911063;
/// Protocol magic of the preprod testnet
pub const PREPROD_MAGIC: u32 = 1;
/// Protocol magic of the preview testnet
pub const PREVIEW_MAGIC: u32 = 2;

/// The Cardano network to act on, identified by its protocol magic.
#[derive(Copy, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Network {
    /// Cardano mainnet
    #[default]
    Mainnet,
    /// Legacy Byron testnet
    Testnet,
    /// Preprod testnet
    Preprod,
    /// Preview testnet
    Preview,
    /// Any other network, by protocol magic
    Custom(u32),
}

impl Network {
    /// Creates a `Network` from its protocol magic.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cardano_key_wallet::Network;
    ///
    /// assert_eq!(Network::Mainnet, Network::from_magic(764824073));
    /// assert_eq!(Network::Custom(42), Network::from_magic(42));
    /// ```
    pub fn from_magic(magic: u32) -> Network {
        // Note: any new entries here must be added to `magic` below
        match magic {
            MAINNET_MAGIC => Network::Mainnet,
            TESTNET_MAGIC => Network::Testnet,
            PREPROD_MAGIC => Network::Preprod,
            PREVIEW_MAGIC => Network::Preview,
            other => Network::Custom(other),
        }
    }

    /// Return the protocol magic of this network
    pub fn magic(self) -> u32 {
        // Note: any new entries here must be added to `from_magic` above
        match self {
            Network::Mainnet => MAINNET_MAGIC,
            Network::Testnet => TESTNET_MAGIC,
            Network::Preprod => PREPROD_MAGIC,
            Network::Preview => PREVIEW_MAGIC,
            Network::Custom(magic) => magic,
        }
    }

    /// The magic to embed in Byron address attributes. Mainnet addresses carry none.
    pub fn address_magic(self) -> Option<u32> {
        match self.magic() {
            MAINNET_MAGIC => None,
            magic => Some(magic),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
            Network::Preprod => write!(f, "preprod"),
            Network::Preview => write!(f, "preview"),
            Network::Custom(magic) => write!(f, "custom({})", magic),
        }
    }
}

impl core::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            "preprod" => Ok(Network::Preprod),
            "preview" => Ok(Network::Preview),
            other => other
                .parse::<u32>()
                .map(Network::from_magic)
                .map_err(|_| format!("Unknown network type: {}", s)),
        }
    }
}
