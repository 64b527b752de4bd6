//! CBOR helpers shared by the address and transaction encoders

use ciborium::value::{Integer, Value};
use thiserror::Error;

/// CBOR tag for embedded CBOR data items
pub(crate) const TAG_ENCODED_CBOR: u64 = 24;

/// Why a byte string is not an acceptable CBOR item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum CborError {
    #[error("malformed CBOR")]
    Malformed,
    #[error("trailing bytes after CBOR item")]
    TrailingBytes,
    #[error("CBOR item is not canonically encoded")]
    NonCanonical,
}

/// Serialize a CBOR value. Arrays and maps use definite lengths and
/// integers the shortest form.
pub(crate) fn encode(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(value, &mut out).expect("in-memory writers don't error");
    out
}

/// Deserialize exactly one canonically encoded CBOR item.
pub(crate) fn decode(bytes: &[u8]) -> Result<Value, CborError> {
    let mut reader = bytes;
    let value: Value = ciborium::de::from_reader(&mut reader).map_err(|_| CborError::Malformed)?;
    if !reader.is_empty() {
        return Err(CborError::TrailingBytes);
    }
    if encode(&value) != bytes {
        return Err(CborError::NonCanonical);
    }
    Ok(value)
}

pub(crate) fn uint(n: u64) -> Value {
    Value::Integer(Integer::from(n))
}

pub(crate) fn bytes(b: &[u8]) -> Value {
    Value::Bytes(b.to_vec())
}

/// `tag 24(bytes(encoded))`
pub(crate) fn embedded_bytes(encoded: Vec<u8>) -> Value {
    Value::Tag(TAG_ENCODED_CBOR, Box::new(Value::Bytes(encoded)))
}

/// `tag 24(bytes(cbor(value)))`
pub(crate) fn embedded(value: &Value) -> Value {
    embedded_bytes(encode(value))
}

pub(crate) fn as_u64(value: &Value) -> Option<u64> {
    value.as_integer().and_then(|i| u64::try_from(i).ok())
}
