//! Byron transactions
//!
//! Value types for transaction inputs and outputs, the immutable [`Tx`] and
//! the [`StagingTransaction`] builder that accumulates them.

pub mod builder;
pub mod fee;

use core::fmt;
use core::str::FromStr;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ciborium::value::Value;
use thiserror::Error;

use crate::address::Address;
use crate::bip32::XPUB_SIZE;
use crate::utils;

pub use self::builder::{StagingState, StagingTransaction};
pub use self::fee::LinearFee;

/// Size of a transaction id
pub const TX_ID_SIZE: usize = 32;
/// Size of an Ed25519 signature
pub const SIGNATURE_SIZE: usize = 64;

/// Transaction error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The staging transaction no longer accepts changes
    #[error("Transaction is already finalized")]
    AlreadyFinalized,
    /// Inputs do not cover outputs and fee
    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds {
        /// Sum of the inputs
        available: u64,
        /// Sum of the outputs plus the fee
        required: u64,
    },
    /// Value above the total supply
    #[error("Coin value {0} is out of bound (max {max})", max = Coin::MAX_VALUE)]
    CoinOutOfBound(u64),
    /// A sum of values went above the total supply
    #[error("Sum of values overflows")]
    ValueOverflow,
    /// The same output is spent twice
    #[error("Input {0} is already part of the transaction")]
    DuplicateInput(TxoPointer),
    /// No inputs provided
    #[error("No inputs provided")]
    NoInputs,
    /// No outputs provided
    #[error("No outputs provided")]
    NoOutputs,
    /// Text is not a 32-byte hex transaction id
    #[error("Invalid transaction id")]
    InvalidTxId,
}

/// An amount of lovelace, bounded by the total supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
pub struct Coin(u64);

impl Coin {
    /// Total supply in lovelace
    pub const MAX_VALUE: u64 = 45_000_000_000_000_000;
    /// Largest representable amount
    pub const MAX: Coin = Coin(Self::MAX_VALUE);

    /// Create a coin, failing above [`Coin::MAX`]
    pub fn new(value: u64) -> Result<Self, Error> {
        if value > Self::MAX_VALUE {
            return Err(Error::CoinOutOfBound(value));
        }
        Ok(Coin(value))
    }

    /// Zero lovelace
    pub const fn zero() -> Self {
        Coin(0)
    }

    /// Value in lovelace
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Sum of two coins, failing above [`Coin::MAX`]
    pub fn checked_add(self, other: Coin) -> Result<Coin, Error> {
        self.0
            .checked_add(other.0)
            .filter(|&v| v <= Self::MAX_VALUE)
            .map(Coin)
            .ok_or(Error::ValueOverflow)
    }

    /// Difference of two coins, `None` if `other` is larger
    pub fn checked_sub(self, other: Coin) -> Option<Coin> {
        self.0.checked_sub(other.0).map(Coin)
    }

    /// Sum of a sequence of coins
    pub fn sum<I: IntoIterator<Item = Coin>>(coins: I) -> Result<Coin, Error> {
        coins.into_iter().try_fold(Coin::zero(), Coin::checked_add)
    }
}

impl TryFrom<u64> for Coin {
    type Error = Error;

    fn try_from(value: u64) -> Result<Self, Error> {
        Coin::new(value)
    }
}

impl From<Coin> for u64 {
    fn from(coin: Coin) -> u64 {
        coin.0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Blake2b-256 hash of an encoded transaction
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TxId([u8; TX_ID_SIZE]);

impl TxId {
    /// Wrap raw hash bytes
    pub fn from_bytes(bytes: [u8; TX_ID_SIZE]) -> Self {
        TxId(bytes)
    }

    /// Hash arbitrary bytes
    pub fn hash(data: &[u8]) -> Self {
        let mut id = [0u8; TX_ID_SIZE];
        id.copy_from_slice(&Blake2b::<U32>::digest(data));
        TxId(id)
    }

    /// Raw hash bytes
    pub fn as_bytes(&self) -> &[u8; TX_ID_SIZE] {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TxId({})", self)
    }
}

impl FromStr for TxId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let mut id = [0u8; TX_ID_SIZE];
        hex::decode_to_slice(s, &mut id).map_err(|_| Error::InvalidTxId)?;
        Ok(TxId(id))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TxId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TxId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        TxId::from_str(&s).map_err(|e| D::Error::custom(format!("Failed to decode txid: {}", e)))
    }
}

/// Reference to an output of a previous transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxoPointer {
    /// Transaction that created the output
    pub id: TxId,
    /// Position of the output in that transaction
    pub index: u32,
}

impl TxoPointer {
    /// Create a new pointer
    pub fn new(id: TxId, index: u32) -> Self {
        TxoPointer {
            id,
            index,
        }
    }

    fn to_cbor(self) -> Value {
        let inner = Value::Array(vec![utils::bytes(&self.id.0), utils::uint(u64::from(self.index))]);
        Value::Array(vec![utils::uint(0), utils::embedded(&inner)])
    }
}

impl fmt::Display for TxoPointer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.index)
    }
}

/// An input being staged: the output it spends and the value it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxIn {
    /// Output being spent
    pub pointer: TxoPointer,
    /// Value of that output
    pub value: Coin,
}

/// A transaction output
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxOut {
    /// Receiving address
    pub address: Address,
    /// Amount sent
    pub value: Coin,
}

impl TxOut {
    /// Create a new output
    pub fn new(address: Address, value: Coin) -> Self {
        TxOut {
            address,
            value,
        }
    }

    fn to_cbor(&self) -> Value {
        Value::Array(vec![self.address.to_cbor(), utils::uint(self.value.0)])
    }
}

/// A finalized, unsigned transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tx {
    inputs: Vec<TxoPointer>,
    outputs: Vec<TxOut>,
}

impl Tx {
    pub(crate) fn new(inputs: Vec<TxoPointer>, outputs: Vec<TxOut>) -> Self {
        Tx {
            inputs,
            outputs,
        }
    }

    /// Outputs spent by this transaction
    pub fn inputs(&self) -> &[TxoPointer] {
        &self.inputs
    }

    /// Outputs created by this transaction
    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    fn to_cbor(&self) -> Value {
        Value::Array(vec![
            Value::Array(self.inputs.iter().map(|i| i.to_cbor()).collect()),
            Value::Array(self.outputs.iter().map(TxOut::to_cbor).collect()),
            Value::Map(Vec::new()),
        ])
    }

    /// CBOR encoding `[inputs, outputs, attributes]`
    pub fn to_bytes(&self) -> Vec<u8> {
        utils::encode(&self.to_cbor())
    }

    /// Transaction id: Blake2b-256 of the encoding
    pub fn id(&self) -> TxId {
        TxId::hash(&self.to_bytes())
    }

    /// Size of the transaction once one public key witness per input is attached
    pub fn size_with_witnesses(&self) -> usize {
        let witness = Value::Array(vec![
            utils::uint(0),
            utils::embedded(&Value::Array(vec![
                utils::bytes(&[0u8; XPUB_SIZE]),
                utils::bytes(&[0u8; SIGNATURE_SIZE]),
            ])),
        ]);
        let witnesses = Value::Array(vec![witness; self.inputs.len()]);
        utils::encode(&Value::Array(vec![self.to_cbor(), witnesses])).len()
    }
}
