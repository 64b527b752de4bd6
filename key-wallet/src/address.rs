//! Byron address generation and encoding
//!
//! A Byron address commits to its spending data through a 28-byte root hash:
//!
//! ```text
//! spending_data = [0, bytes(xpub)]
//! root          = blake2b224(sha3_256(cbor([addr_type, spending_data, attributes])))
//! ext_addr      = cbor([bytes(root), attributes, addr_type])
//! address       = cbor([tag24(bytes(ext_addr)), crc32(ext_addr)])
//! ```
//!
//! The textual form is the base58 encoding of `address`.

use core::fmt;
use core::str::FromStr;

use blake2::digest::consts::U28;
use blake2::{Blake2b, Digest};
use ciborium::value::Value;
use sha3::Sha3_256;
use thiserror::Error;

use crate::bip32::XPub;
use crate::network::Network;
use crate::utils::{self, CborError};

/// Size of the address root hash
pub const ROOT_SIZE: usize = 28;

const ATTR_DERIVATION_PATH: u64 = 1;
const ATTR_PROTOCOL_MAGIC: u64 = 2;

/// Address decoding error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text contains characters outside the base58 alphabet
    #[error("Invalid base58 encoding")]
    InvalidBase58,
    /// Bytes are not a single well-formed CBOR item
    #[error("Malformed CBOR")]
    MalformedCbor,
    /// Bytes follow the address item
    #[error("Trailing bytes after address")]
    TrailingBytes,
    /// The address decodes but would be encoded differently
    #[error("Address is not canonically encoded")]
    NonCanonical,
    /// CBOR item does not have the shape of an address
    #[error("Invalid address structure: {0}")]
    InvalidStructure(&'static str),
    /// Embedded CRC32 does not match the payload
    #[error("Checksum mismatch: expected {expected:#010x}, found {found:#010x}")]
    ChecksumMismatch {
        /// CRC32 of the payload
        expected: u32,
        /// CRC32 carried by the address
        found: u32,
    },
    /// Root hash has the wrong size
    #[error("Invalid root hash length {0}")]
    InvalidRootLength(usize),
    /// Address type tag is not one of the known types
    #[error("Unknown address type {0}")]
    UnknownAddressType(u64),
    /// Attribute key is not one of the known keys
    #[error("Unknown address attribute {0}")]
    UnknownAttribute(u64),
}

impl From<CborError> for Error {
    fn from(e: CborError) -> Self {
        match e {
            CborError::Malformed => Error::MalformedCbor,
            CborError::TrailingBytes => Error::TrailingBytes,
            CborError::NonCanonical => Error::NonCanonical,
        }
    }
}

/// Kind of spending data an address commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddrType {
    /// Spent by a signature of an extended public key
    PubKey,
    /// Spent by a script
    Script,
    /// AVVM redemption key
    Redeem,
}

impl AddrType {
    fn to_u64(self) -> u64 {
        match self {
            AddrType::PubKey => 0,
            AddrType::Script => 1,
            AddrType::Redeem => 2,
        }
    }

    fn from_u64(tag: u64) -> Result<Self, Error> {
        match tag {
            0 => Ok(AddrType::PubKey),
            1 => Ok(AddrType::Script),
            2 => Ok(AddrType::Redeem),
            other => Err(Error::UnknownAddressType(other)),
        }
    }
}

/// Optional address attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Attributes {
    /// Encrypted derivation path payload, kept as opaque bytes
    pub derivation_path: Option<Vec<u8>>,
    /// Protocol magic of a non-mainnet network
    pub protocol_magic: Option<u32>,
}

impl Attributes {
    /// Attributes of an address on `network`
    pub fn for_network(network: Network) -> Self {
        Attributes {
            derivation_path: None,
            protocol_magic: network.address_magic(),
        }
    }

    fn to_cbor(&self) -> Value {
        let mut entries = Vec::new();
        if let Some(payload) = &self.derivation_path {
            entries.push((utils::uint(ATTR_DERIVATION_PATH), utils::bytes(payload)));
        }
        if let Some(magic) = self.protocol_magic {
            let encoded = utils::encode(&utils::uint(u64::from(magic)));
            entries.push((utils::uint(ATTR_PROTOCOL_MAGIC), Value::Bytes(encoded)));
        }
        Value::Map(entries)
    }

    fn from_cbor(value: &Value) -> Result<Self, Error> {
        let entries = value.as_map().ok_or(Error::InvalidStructure("attributes must be a map"))?;
        let mut attributes = Attributes::default();
        for (key, value) in entries {
            let key = utils::as_u64(key)
                .ok_or(Error::InvalidStructure("attribute key must be an unsigned integer"))?;
            let payload =
                value.as_bytes().ok_or(Error::InvalidStructure("attribute value must be bytes"))?;
            match key {
                ATTR_DERIVATION_PATH => attributes.derivation_path = Some(payload.clone()),
                ATTR_PROTOCOL_MAGIC => {
                    let magic = utils::as_u64(&utils::decode(payload)?)
                        .and_then(|m| u32::try_from(m).ok())
                        .ok_or(Error::InvalidStructure("protocol magic must be a 32-bit integer"))?;
                    attributes.protocol_magic = Some(magic);
                }
                other => return Err(Error::UnknownAttribute(other)),
            }
        }
        Ok(attributes)
    }
}

fn address_root(addr_type: AddrType, xpub: &XPub, attributes: &Attributes) -> [u8; ROOT_SIZE] {
    let spending_data = Value::Array(vec![utils::uint(0), utils::bytes(xpub.as_bytes())]);
    let preimage = Value::Array(vec![
        utils::uint(addr_type.to_u64()),
        spending_data,
        attributes.to_cbor(),
    ]);
    let digest = Sha3_256::digest(utils::encode(&preimage));
    let mut root = [0u8; ROOT_SIZE];
    root.copy_from_slice(&Blake2b::<U28>::digest(digest));
    root
}

/// A Byron address
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExtendedAddr {
    root: [u8; ROOT_SIZE],
    attributes: Attributes,
    addr_type: AddrType,
}

/// Addresses handled by this crate are Byron extended addresses
pub type Address = ExtendedAddr;

impl ExtendedAddr {
    /// Address of a public key on `network`
    pub fn new(xpub: &XPub, network: Network) -> Self {
        Self::with_attributes(xpub, Attributes::for_network(network))
    }

    /// Mainnet address of a public key, without attributes
    pub fn new_simple(xpub: &XPub) -> Self {
        Self::new(xpub, Network::Mainnet)
    }

    /// Address of a public key with explicit attributes
    pub fn with_attributes(xpub: &XPub, attributes: Attributes) -> Self {
        ExtendedAddr {
            root: address_root(AddrType::PubKey, xpub, &attributes),
            attributes,
            addr_type: AddrType::PubKey,
        }
    }

    /// Root hash
    pub fn root(&self) -> &[u8; ROOT_SIZE] {
        &self.root
    }

    /// Attributes carried by the address
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Kind of spending data
    pub fn addr_type(&self) -> AddrType {
        self.addr_type
    }

    /// Protocol magic embedded in the address, `None` for mainnet
    pub fn protocol_magic(&self) -> Option<u32> {
        self.attributes.protocol_magic
    }

    /// Network the address belongs to
    pub fn network(&self) -> Network {
        self.protocol_magic().map_or(Network::Mainnet, Network::from_magic)
    }

    /// Whether `xpub` is the key this address was produced from
    pub fn verify_pubkey(&self, xpub: &XPub) -> bool {
        self.addr_type == AddrType::PubKey
            && address_root(self.addr_type, xpub, &self.attributes) == self.root
    }

    fn payload(&self) -> Vec<u8> {
        utils::encode(&Value::Array(vec![
            utils::bytes(&self.root),
            self.attributes.to_cbor(),
            utils::uint(self.addr_type.to_u64()),
        ]))
    }

    pub(crate) fn to_cbor(&self) -> Value {
        let payload = self.payload();
        let crc = crc32fast::hash(&payload);
        Value::Array(vec![utils::embedded_bytes(payload), utils::uint(u64::from(crc))])
    }

    /// CBOR encoding of the address
    pub fn to_bytes(&self) -> Vec<u8> {
        utils::encode(&self.to_cbor())
    }

    /// Decode a CBOR encoded address, verifying its checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let value = utils::decode(bytes)?;
        let outer = value.as_array().ok_or(Error::InvalidStructure("address must be an array"))?;
        let [tagged, crc] = outer.as_slice() else {
            return Err(Error::InvalidStructure("address must have 2 elements"));
        };
        let payload = match tagged.as_tag() {
            Some((utils::TAG_ENCODED_CBOR, inner)) => inner
                .as_bytes()
                .ok_or(Error::InvalidStructure("tagged payload must be bytes"))?,
            _ => return Err(Error::InvalidStructure("payload must carry tag 24")),
        };
        let found = utils::as_u64(crc)
            .and_then(|c| u32::try_from(c).ok())
            .ok_or(Error::InvalidStructure("checksum must be a 32-bit integer"))?;
        let expected = crc32fast::hash(payload);
        if expected != found {
            return Err(Error::ChecksumMismatch {
                expected,
                found,
            });
        }

        let inner = utils::decode(payload)?;
        let fields =
            inner.as_array().ok_or(Error::InvalidStructure("address payload must be an array"))?;
        let [root, attributes, addr_type] = fields.as_slice() else {
            return Err(Error::InvalidStructure("address payload must have 3 elements"));
        };
        let root = root.as_bytes().ok_or(Error::InvalidStructure("root must be bytes"))?;
        let root: [u8; ROOT_SIZE] =
            root.as_slice().try_into().map_err(|_| Error::InvalidRootLength(root.len()))?;
        let attributes = Attributes::from_cbor(attributes)?;
        let addr_type = utils::as_u64(addr_type)
            .ok_or(Error::InvalidStructure("address type must be an unsigned integer"))
            .and_then(AddrType::from_u64)?;

        let addr = ExtendedAddr {
            root,
            attributes,
            addr_type,
        };
        if addr.to_bytes() != bytes {
            return Err(Error::NonCanonical);
        }
        Ok(addr)
    }

    /// Base58 text form
    pub fn to_base58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    /// Decode the base58 text form
    pub fn from_base58(s: &str) -> Result<Self, Error> {
        let bytes = bs58::decode(s).into_vec().map_err(|_| Error::InvalidBase58)?;
        Self::from_bytes(&bytes)
    }

    /// Whether `s` is a well-formed address. Never fails.
    pub fn is_valid(s: &str) -> bool {
        Self::from_base58(s).is_ok()
    }
}

/// Whether `s` is a well-formed base58 Byron address
pub fn is_valid(s: &str) -> bool {
    ExtendedAddr::is_valid(s)
}

impl fmt::Display for ExtendedAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for ExtendedAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ExtendedAddr({})", self)
    }
}

impl FromStr for ExtendedAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_base58(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ExtendedAddr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ExtendedAddr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        ExtendedAddr::from_base58(&s)
            .map_err(|e| D::Error::custom(format!("Failed to decode address: {}", e)))
    }
}
