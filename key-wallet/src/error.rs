//! Error types for the key-wallet library

use core::fmt;

use thiserror::Error;

/// Result type alias for key-wallet operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur in key-wallet operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Mnemonic encoding or decoding error
    #[error("Mnemonic error: {0}")]
    Mnemonic(#[from] crate::mnemonic::Error),
    /// Extended key derivation or encoding error
    #[error("BIP32 error: {0}")]
    Bip32(#[from] crate::bip32::Error),
    /// Address decoding error
    #[error("Address error: {0}")]
    Address(#[from] crate::address::Error),
    /// Transaction staging error
    #[error("Transaction error: {0}")]
    Transaction(#[from] crate::transaction::Error),
    /// More items were requested in one call than the configured limit allows
    #[error("Resource limit exceeded: requested {requested}, limit is {limit}")]
    ResourceLimitExceeded {
        /// Number of items requested
        requested: usize,
        /// Configured maximum
        limit: usize,
    },
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Coarse classification of every [`Error`].
///
/// Callers that only need to decide how to react (re-prompt, abort, report)
/// can match on the kind instead of the full error tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input had a length the operation does not support
    InvalidInputLength,
    /// Bytes or text could not be decoded into a well-formed value
    MalformedEncoding,
    /// An embedded checksum did not match the recomputed one
    ChecksumMismatch,
    /// A derivation was requested that the key cannot perform
    DerivationConstraintViolation,
    /// A configured or structural limit was reached
    ResourceLimitExceeded,
    /// The staging transaction was already finalized
    AlreadyFinalized,
    /// Inputs do not cover outputs and fee
    InsufficientFunds,
    /// Any other rejected argument
    InvalidParameter,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInputLength => "invalid input length",
            ErrorKind::MalformedEncoding => "malformed encoding",
            ErrorKind::ChecksumMismatch => "checksum mismatch",
            ErrorKind::DerivationConstraintViolation => "derivation constraint violation",
            ErrorKind::ResourceLimitExceeded => "resource limit exceeded",
            ErrorKind::AlreadyFinalized => "already finalized",
            ErrorKind::InsufficientFunds => "insufficient funds",
            ErrorKind::InvalidParameter => "invalid parameter",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        use crate::address::Error as AddressError;
        use crate::bip32::Error as Bip32Error;
        use crate::mnemonic::Error as MnemonicError;
        use crate::transaction::Error as TxError;

        match self {
            Error::Mnemonic(e) => match e {
                MnemonicError::InvalidEntropyLength(_)
                | MnemonicError::BufferTooSmall {
                    ..
                }
                | MnemonicError::InvalidWordCount(_) => ErrorKind::InvalidInputLength,
                MnemonicError::ChecksumMismatch => ErrorKind::ChecksumMismatch,
                MnemonicError::InvalidWordIndex(_)
                | MnemonicError::UnknownWord(_)
                | MnemonicError::InvalidMnemonic(_) => {
                    ErrorKind::MalformedEncoding
                }
                MnemonicError::EntropySource(_) => ErrorKind::InvalidParameter,
            },
            Error::Bip32(e) => match e {
                Bip32Error::HardenedDerivationRequiresPrivateKey(_)
                | Bip32Error::InvalidChildNumber(_) => ErrorKind::DerivationConstraintViolation,
                Bip32Error::MalformedKeyEncoding(_) | Bip32Error::InvalidDerivationPathFormat => {
                    ErrorKind::MalformedEncoding
                }
            },
            Error::Address(AddressError::ChecksumMismatch {
                ..
            }) => ErrorKind::ChecksumMismatch,
            Error::Address(_) => ErrorKind::MalformedEncoding,
            Error::Transaction(e) => match e {
                TxError::AlreadyFinalized => ErrorKind::AlreadyFinalized,
                TxError::InsufficientFunds {
                    ..
                } => ErrorKind::InsufficientFunds,
                TxError::CoinOutOfBound(_) | TxError::ValueOverflow => {
                    ErrorKind::ResourceLimitExceeded
                }
                TxError::DuplicateInput(_) | TxError::NoInputs | TxError::NoOutputs => {
                    ErrorKind::InvalidParameter
                }
                TxError::InvalidTxId => ErrorKind::MalformedEncoding,
            },
            Error::ResourceLimitExceeded {
                ..
            } => ErrorKind::ResourceLimitExceeded,
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_wrapped_errors() {
        let err: Error = crate::mnemonic::Error::ChecksumMismatch.into();
        assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);

        let err: Error = crate::bip32::Error::HardenedDerivationRequiresPrivateKey(0).into();
        assert_eq!(err.kind(), ErrorKind::DerivationConstraintViolation);

        let err: Error = crate::transaction::Error::AlreadyFinalized.into();
        assert_eq!(err.kind(), ErrorKind::AlreadyFinalized);

        let err = Error::ResourceLimitExceeded {
            requested: 10,
            limit: 5,
        };
        assert_eq!(err.kind(), ErrorKind::ResourceLimitExceeded);
        assert_eq!(err.to_string(), "Resource limit exceeded: requested 10, limit is 5");
    }
}
