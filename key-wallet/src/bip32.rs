//! Ed25519 extended keys with BIP32 style derivation.
//!
//! Ed25519 derives its public key from a hash of the secret seed, which
//! rules out BIP32 arithmetic on the seed itself. Keys here are kept in the
//! extended (post-hash) form instead: a 64-byte extended secret `kL || kR`
//! plus a 32-byte chain code. `kL` is used directly as the scalar.
//!
//! Derivation follows the V2 scheme:
//!
//! * hardened (`index >= 2^31`): `Z = HMAC-SHA512(cc, 0x00 || kL || kR || index)`
//!   and `I = HMAC-SHA512(cc, 0x01 || kL || kR || index)`
//! * soft: `Z = HMAC-SHA512(cc, 0x02 || A || index)` and
//!   `I = HMAC-SHA512(cc, 0x03 || A || index)`
//!
//! then `kL' = kL + 8 * Z[0..28]`, `kR' = kR + Z[32..64]` and `cc' = I[32..64]`.
//! The index is serialized little-endian. Soft children of a public key are
//! `A' = A + (8 * Z[0..28]) * B`, which matches the public key of the soft
//! private child.

use core::fmt;
use core::str::FromStr;

use bitcoin_hashes::{sha512, Hash, HashEngine, Hmac, HmacEngine};
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Size of a serialized extended private key
pub const XPRV_SIZE: usize = 96;
/// Size of a serialized extended public key
pub const XPUB_SIZE: usize = 64;
/// Size of a chain code
pub const CHAIN_CODE_SIZE: usize = 32;
/// Size of a raw Ed25519 public key
pub const PUBLIC_KEY_SIZE: usize = 32;

/// First hardened child index
pub const HARDENED_OFFSET: u32 = 1 << 31;

/// Why a byte string is not a valid extended key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyEncodingError {
    /// Wrong number of bytes
    #[error("wrong length {got} (expected {expected})")]
    WrongLength {
        /// Required length
        expected: usize,
        /// Length received
        got: usize,
    },
    /// The three lowest bits of `kL` must be cleared
    #[error("lowest 3 bits of the extended secret must be cleared")]
    LowestBitsInvalid,
    /// The two highest bits of `kL` must be `01`
    #[error("highest 2 bits of the extended secret must be 0b01")]
    HighestBitsInvalid,
    /// The public key does not decompress to a curve point
    #[error("public key is not a point on the curve")]
    InvalidPoint,
    /// Text form is not hex
    #[error("invalid hex encoding")]
    InvalidHex,
}

/// BIP32 error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Hardened children can only be derived from a private key
    #[error("Hardened derivation of child {0} requires the private key")]
    HardenedDerivationRequiresPrivateKey(u32),
    /// Child index does not fit in 31 bits
    #[error("Invalid child number: {0} (must be less than 2^31)")]
    InvalidChildNumber(u32),
    /// Derivation path text could not be parsed
    #[error("Invalid derivation path format")]
    InvalidDerivationPathFormat,
    /// Key bytes are not a valid extended key
    #[error("Malformed key encoding: {0}")]
    MalformedKeyEncoding(#[from] KeyEncodingError),
}

/// A child number for a derived key
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChildNumber {
    /// Non-hardened key
    Normal {
        /// Key index, within [0, 2^31 - 1]
        index: u32,
    },
    /// Hardened key
    Hardened {
        /// Key index, within [0, 2^31 - 1]
        index: u32,
    },
}

impl ChildNumber {
    /// Create a [`ChildNumber::Normal`] from an index, fails if the index is hardened.
    pub fn from_normal_idx(index: u32) -> Result<Self, Error> {
        if index & HARDENED_OFFSET == 0 {
            Ok(ChildNumber::Normal {
                index,
            })
        } else {
            Err(Error::InvalidChildNumber(index))
        }
    }

    /// Create a [`ChildNumber::Hardened`] from an index, fails if the index is hardened.
    pub fn from_hardened_idx(index: u32) -> Result<Self, Error> {
        if index & HARDENED_OFFSET == 0 {
            Ok(ChildNumber::Hardened {
                index,
            })
        } else {
            Err(Error::InvalidChildNumber(index))
        }
    }

    /// Create a child number from a 31-bit index and a hardened flag.
    pub fn from_index(index: u32, hardened: bool) -> Result<Self, Error> {
        if hardened {
            Self::from_hardened_idx(index)
        } else {
            Self::from_normal_idx(index)
        }
    }

    /// Returns `true` if the child number is a [`Normal`] value.
    ///
    /// [`Normal`]: #variant.Normal
    pub fn is_normal(&self) -> bool {
        !self.is_hardened()
    }

    /// Returns `true` if the child number is a [`Hardened`] value.
    ///
    /// [`Hardened`]: #variant.Hardened
    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildNumber::Hardened { .. })
    }

    /// The 31-bit index, without the hardened bit
    pub fn index(&self) -> u32 {
        match *self {
            ChildNumber::Normal {
                index,
            }
            | ChildNumber::Hardened {
                index,
            } => index,
        }
    }
}

impl From<u32> for ChildNumber {
    fn from(number: u32) -> Self {
        if number & HARDENED_OFFSET != 0 {
            ChildNumber::Hardened {
                index: number ^ HARDENED_OFFSET,
            }
        } else {
            ChildNumber::Normal {
                index: number,
            }
        }
    }
}

impl From<ChildNumber> for u32 {
    fn from(cnum: ChildNumber) -> Self {
        match cnum {
            ChildNumber::Normal {
                index,
            } => index,
            ChildNumber::Hardened {
                index,
            } => index | HARDENED_OFFSET,
        }
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ChildNumber::Hardened {
                index,
            } => write!(f, "{}'", index),
            ChildNumber::Normal {
                index,
            } => write!(f, "{}", index),
        }
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(inp: &str) -> Result<ChildNumber, Error> {
        let is_hardened = inp.ends_with('\'') || inp.ends_with('h');
        let digits = if is_hardened {
            &inp[..inp.len() - 1]
        } else {
            inp
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidDerivationPathFormat);
        }
        let index = digits.parse::<u32>().map_err(|_| Error::InvalidDerivationPathFormat)?;
        ChildNumber::from_index(index, is_hardened)
    }
}

/// A BIP32 style derivation path
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// Path of the master key
    pub fn master() -> Self {
        DerivationPath(Vec::new())
    }

    /// Number of derivation steps
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the master path
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a child number
    pub fn push(&mut self, child: ChildNumber) {
        self.0.push(child);
    }

    /// A new path with `child` appended
    pub fn child(&self, child: ChildNumber) -> DerivationPath {
        let mut path = self.0.clone();
        path.push(child);
        DerivationPath(path)
    }

    /// Iterate over the child numbers
    pub fn iter(&self) -> core::slice::Iter<'_, ChildNumber> {
        self.0.iter()
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(numbers: Vec<ChildNumber>) -> Self {
        DerivationPath(numbers)
    }
}

impl From<&[ChildNumber]> for DerivationPath {
    fn from(numbers: &[ChildNumber]) -> Self {
        DerivationPath(numbers.to_vec())
    }
}

impl AsRef<[ChildNumber]> for DerivationPath {
    fn as_ref(&self) -> &[ChildNumber] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildNumber;
    type IntoIter = core::slice::Iter<'a, ChildNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<DerivationPath, Error> {
        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(Error::InvalidDerivationPathFormat);
        }
        let children = parts.map(str::parse).collect::<Result<Vec<ChildNumber>, Error>>()?;
        Ok(DerivationPath(children))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("m")?;
        for cn in self.0.iter() {
            write!(f, "/{}", cn)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Chain code of an extended key
#[derive(Clone, Copy, PartialEq, Eq, Hash, Zeroize)]
pub struct ChainCode([u8; CHAIN_CODE_SIZE]);

impl ChainCode {
    /// Wrap raw chain code bytes
    pub fn from_bytes(bytes: [u8; CHAIN_CODE_SIZE]) -> Self {
        ChainCode(bytes)
    }

    /// Raw chain code bytes
    pub fn to_bytes(self) -> [u8; CHAIN_CODE_SIZE] {
        self.0
    }
}

impl AsRef<[u8]> for ChainCode {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ChainCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ChainCode({})", hex::encode(self.0))
    }
}

fn hmac_sha512(key: &[u8], tag: u8, parts: &[&[u8]]) -> Zeroizing<[u8; 64]> {
    let mut engine: HmacEngine<sha512::Hash> = HmacEngine::new(key);
    engine.input(&[tag]);
    for part in parts {
        engine.input(part);
    }
    let result: Hmac<sha512::Hash> = Hmac::from_engine(engine);
    Zeroizing::new(result.to_byte_array())
}

/// `x + 8 * y[0..28]` over 256-bit little-endian integers.
fn add_28_mul8(x: &[u8], y: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry: u16 = 0;
    for i in 0..28 {
        let r = u16::from(x[i]) + (u16::from(y[i]) << 3) + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    for i in 28..32 {
        let r = u16::from(x[i]) + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    out
}

/// `x + y mod 2^256` over little-endian integers.
fn add_256bits(x: &[u8], y: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut carry: u16 = 0;
    for i in 0..32 {
        let r = u16::from(x[i]) + u16::from(y[i]) + carry;
        out[i] = (r & 0xff) as u8;
        carry = r >> 8;
    }
    out
}

fn scalar_mul_base(bytes: [u8; 32]) -> EdwardsPoint {
    let mut scalar = Scalar::from_bytes_mod_order(bytes);
    let point = EdwardsPoint::mul_base(&scalar);
    scalar.zeroize();
    point
}

/// Extended private key: `kL (32) || kR (32) || chain code (32)`.
///
/// Not `Clone`: every derived key is a fresh value with a single owner, and
/// the bytes are wiped when it is dropped.
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct XPrv([u8; XPRV_SIZE]);

impl XPrv {
    /// Build a key from 96 bytes of seed material, clamping the scalar.
    ///
    /// The three lowest bits of `kL` are cleared, the highest bit cleared
    /// and the second highest set. The third highest bit is cleared as well
    /// so that the key survives a large number of derivations before the
    /// scalar could overflow.
    pub fn from_normalized_seed(seed: &[u8; XPRV_SIZE]) -> Self {
        let mut bytes = [0u8; XPRV_SIZE];
        bytes.copy_from_slice(seed);
        bytes[0] &= 0b1111_1000;
        bytes[31] &= 0b0001_1111;
        bytes[31] |= 0b0100_0000;
        XPrv(bytes)
    }

    /// Parse a serialized extended private key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != XPRV_SIZE {
            return Err(KeyEncodingError::WrongLength {
                expected: XPRV_SIZE,
                got: bytes.len(),
            }
            .into());
        }
        if bytes[0] & 0b0000_0111 != 0 {
            return Err(KeyEncodingError::LowestBitsInvalid.into());
        }
        if bytes[31] & 0b1100_0000 != 0b0100_0000 {
            return Err(KeyEncodingError::HighestBitsInvalid.into());
        }
        let mut out = [0u8; XPRV_SIZE];
        out.copy_from_slice(bytes);
        Ok(XPrv(out))
    }

    /// Serialize the key. The returned buffer is wiped on drop.
    pub fn to_bytes(&self) -> Zeroizing<[u8; XPRV_SIZE]> {
        Zeroizing::new(self.0)
    }

    fn extended_secret_left(&self) -> &[u8] {
        &self.0[0..32]
    }

    fn extended_secret_right(&self) -> &[u8] {
        &self.0[32..64]
    }

    fn chain_code_bytes(&self) -> &[u8] {
        &self.0[64..96]
    }

    /// Chain code of this key
    pub fn chain_code(&self) -> ChainCode {
        let mut cc = [0u8; CHAIN_CODE_SIZE];
        cc.copy_from_slice(self.chain_code_bytes());
        ChainCode(cc)
    }

    /// Raw Ed25519 public key `A = kL * B`
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let mut kl = Zeroizing::new([0u8; 32]);
        kl.copy_from_slice(self.extended_secret_left());
        scalar_mul_base(*kl).compress().to_bytes()
    }

    /// Extended public key of this private key
    pub fn public(&self) -> XPub {
        let mut out = [0u8; XPUB_SIZE];
        out[..32].copy_from_slice(&self.public_key());
        out[32..].copy_from_slice(self.chain_code_bytes());
        XPub(out)
    }

    /// Private parent key to private child key
    pub fn ckd_priv(&self, child: ChildNumber) -> XPrv {
        let kl = self.extended_secret_left();
        let kr = self.extended_secret_right();
        let cc = self.chain_code_bytes();
        let index = u32::from(child).to_le_bytes();

        let (z, i) = if child.is_hardened() {
            (
                hmac_sha512(cc, 0x00, &[kl, kr, &index]),
                hmac_sha512(cc, 0x01, &[kl, kr, &index]),
            )
        } else {
            let pk = self.public_key();
            (hmac_sha512(cc, 0x02, &[&pk, &index]), hmac_sha512(cc, 0x03, &[&pk, &index]))
        };

        let mut out = [0u8; XPRV_SIZE];
        let mut left = add_28_mul8(kl, &z[0..32]);
        let mut right = add_256bits(kr, &z[32..64]);
        out[0..32].copy_from_slice(&left);
        out[32..64].copy_from_slice(&right);
        out[64..96].copy_from_slice(&i[32..64]);
        left.zeroize();
        right.zeroize();

        XPrv(out)
    }

    /// Derive the private key at the end of `path`; the master path yields a
    /// copy of this key.
    pub fn derive_priv<P: AsRef<[ChildNumber]>>(&self, path: &P) -> XPrv {
        path.as_ref().iter().fold(XPrv(self.0), |key, &child| key.ckd_priv(child))
    }
}

impl fmt::Debug for XPrv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("XPrv(***)")
    }
}

/// Extended public key: `A (32) || chain code (32)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct XPub([u8; XPUB_SIZE]);

impl XPub {
    /// Parse a serialized extended public key, checking the point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != XPUB_SIZE {
            return Err(KeyEncodingError::WrongLength {
                expected: XPUB_SIZE,
                got: bytes.len(),
            }
            .into());
        }
        let mut out = [0u8; XPUB_SIZE];
        out.copy_from_slice(bytes);
        let xpub = XPub(out);
        xpub.point()?;
        Ok(xpub)
    }

    /// Serialized form
    pub fn to_bytes(&self) -> [u8; XPUB_SIZE] {
        self.0
    }

    /// Serialized form, borrowed
    pub fn as_bytes(&self) -> &[u8; XPUB_SIZE] {
        &self.0
    }

    /// Raw Ed25519 public key
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        let mut pk = [0u8; PUBLIC_KEY_SIZE];
        pk.copy_from_slice(&self.0[..32]);
        pk
    }

    /// Chain code of this key
    pub fn chain_code(&self) -> ChainCode {
        let mut cc = [0u8; CHAIN_CODE_SIZE];
        cc.copy_from_slice(&self.0[32..]);
        ChainCode(cc)
    }

    fn point(&self) -> Result<EdwardsPoint, Error> {
        CompressedEdwardsY(self.public_key())
            .decompress()
            .ok_or(Error::MalformedKeyEncoding(KeyEncodingError::InvalidPoint))
    }

    /// Public parent key to public child key. Only soft derivation is possible.
    pub fn ckd_pub(&self, child: ChildNumber) -> Result<XPub, Error> {
        if child.is_hardened() {
            return Err(Error::HardenedDerivationRequiresPrivateKey(u32::from(child)));
        }
        let pk = self.public_key();
        let cc = &self.0[32..];
        let index = u32::from(child).to_le_bytes();

        let z = hmac_sha512(cc, 0x02, &[&pk, &index]);
        let i = hmac_sha512(cc, 0x03, &[&pk, &index]);

        let tweak = scalar_mul_base(add_28_mul8(&[0u8; 32], &z[0..32]));
        let child_point = self.point()? + tweak;

        let mut out = [0u8; XPUB_SIZE];
        out[..32].copy_from_slice(child_point.compress().as_bytes());
        out[32..].copy_from_slice(&i[32..64]);
        Ok(XPub(out))
    }

    /// Derive the public key at the end of `path`
    pub fn derive_pub<P: AsRef<[ChildNumber]>>(&self, path: &P) -> Result<XPub, Error> {
        path.as_ref().iter().try_fold(*self, |key, &child| key.ckd_pub(child))
    }
}

impl fmt::Display for XPub {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for XPub {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "XPub({})", self)
    }
}

impl FromStr for XPub {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let bytes = hex::decode(s).map_err(|_| KeyEncodingError::InvalidHex)?;
        XPub::from_bytes(&bytes)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for XPub {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for XPub {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        XPub::from_str(&s)
            .map_err(|e| D::Error::custom(format!("Failed to decode extended public key: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_key() -> XPrv {
        XPrv::from_normalized_seed(&[0x42; XPRV_SIZE])
    }

    #[test]
    fn test_normalization_clamps_scalar() {
        let key = seed_key();
        let bytes = key.to_bytes();
        assert_eq!(bytes[0] & 0b0000_0111, 0);
        assert_eq!(bytes[31] & 0b1110_0000, 0b0100_0000);
        assert!(XPrv::from_bytes(&bytes[..]).is_ok());
    }

    #[test]
    fn test_add_28_mul8_carries() {
        let x = [0xffu8; 32];
        let mut y = [0u8; 32];
        y[0] = 1;
        let out = add_28_mul8(&x, &y);
        assert_eq!(out[0], 0x07);
        assert!(out[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_add_28_mul8_ignores_high_bytes() {
        let x = [0u8; 32];
        let mut y = [0u8; 32];
        y[28..].copy_from_slice(&[0xff; 4]);
        assert_eq!(add_28_mul8(&x, &y), [0u8; 32]);
    }

    #[test]
    fn test_add_256bits_wraps() {
        let x = [0xffu8; 32];
        let mut y = [0u8; 32];
        y[0] = 1;
        assert_eq!(add_256bits(&x, &y), [0u8; 32]);
    }

    #[test]
    fn test_soft_derivation_agrees() {
        let xprv = seed_key();
        let xpub = xprv.public();
        for index in [0u32, 1, 2, 1000, HARDENED_OFFSET - 1] {
            let child = ChildNumber::from_normal_idx(index).unwrap();
            assert_eq!(xprv.ckd_priv(child).public(), xpub.ckd_pub(child).unwrap());
        }
    }

    #[test]
    fn test_hardened_requires_private() {
        let xpub = seed_key().public();
        let child = ChildNumber::from_hardened_idx(0).unwrap();
        assert_eq!(xpub.ckd_pub(child), Err(Error::HardenedDerivationRequiresPrivateKey(HARDENED_OFFSET)));
    }

    #[test]
    fn test_child_number_parsing() {
        assert_eq!("0".parse::<ChildNumber>().unwrap(), ChildNumber::Normal { index: 0 });
        assert_eq!("44'".parse::<ChildNumber>().unwrap(), ChildNumber::Hardened { index: 44 });
        assert_eq!("1815h".parse::<ChildNumber>().unwrap(), ChildNumber::Hardened { index: 1815 });
        assert!("".parse::<ChildNumber>().is_err());
        assert!("'".parse::<ChildNumber>().is_err());
        assert!("-1".parse::<ChildNumber>().is_err());
        assert!("2147483648".parse::<ChildNumber>().is_err());
    }

    #[test]
    fn test_child_number_u32_conversion() {
        let hardened = ChildNumber::from(HARDENED_OFFSET | 5);
        assert_eq!(hardened, ChildNumber::Hardened { index: 5 });
        assert_eq!(u32::from(hardened), HARDENED_OFFSET | 5);
        assert_eq!(u32::from(ChildNumber::from(7)), 7);
    }

    #[test]
    fn test_debug_hides_private_key() {
        assert_eq!(format!("{:?}", seed_key()), "XPrv(***)");
    }
}
