//! BIP39 mnemonic implementation
//!
//! Entropy is encoded as a sequence of 11-bit word indices. The entropy bits
//! are followed by a checksum made of the first `ENT / 32` bits of
//! `SHA-256(entropy)`, so every supported entropy size maps to a fixed word
//! count:
//!
//! | entropy | checksum | words |
//! |---------|----------|-------|
//! | 16 B    | 4 bits   | 12    |
//! | 20 B    | 5 bits   | 15    |
//! | 24 B    | 6 bits   | 18    |
//! | 28 B    | 7 bits   | 21    |
//! | 32 B    | 8 bits   | 24    |
//!
//! Word indices can be rendered through any BIP39 word list with
//! [`Mnemonic::phrase_in`].

use core::fmt;
use core::str::FromStr;

use bip39 as bip39_crate;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of bits carried by a single mnemonic word.
pub const WORD_BITS: usize = 11;

/// Number of words in a BIP39 word list.
pub const WORD_LIST_SIZE: u16 = 1 << WORD_BITS;

/// Entropy sizes, in bytes, that can be encoded.
pub const SUPPORTED_ENTROPY_LENGTHS: [usize; 5] = [16, 20, 24, 28, 32];

/// Mnemonic codec error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Entropy is not 16, 20, 24, 28 or 32 bytes long
    #[error("Invalid entropy length: {0} bytes (expected 16, 20, 24, 28 or 32)")]
    InvalidEntropyLength(usize),
    /// The caller-provided output cannot hold the mnemonic
    #[error("Mnemonic buffer too small: {required} words required, room for {available}")]
    BufferTooSmall {
        /// Words the entropy encodes to
        required: usize,
        /// Capacity offered by the caller
        available: usize,
    },
    /// Word count is not 12, 15, 18, 21 or 24
    #[error("Invalid mnemonic word count: {0}")]
    InvalidWordCount(usize),
    /// A word index does not fit in 11 bits
    #[error("Invalid word index: {0} (must be less than 2048)")]
    InvalidWordIndex(u16),
    /// The checksum bits do not match the decoded entropy
    #[error("Mnemonic checksum mismatch")]
    ChecksumMismatch,
    /// A phrase word is not part of the selected word list
    #[error("Unknown mnemonic word: {0}")]
    UnknownWord(String),
    /// Any other failure reported by the BIP39 codec
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    /// The system entropy source failed
    #[error("Failed to generate entropy: {0}")]
    EntropySource(String),
}

/// Number of words the given entropy length encodes to.
pub fn word_count_for_entropy(entropy_len: usize) -> Result<usize, Error> {
    if !SUPPORTED_ENTROPY_LENGTHS.contains(&entropy_len) {
        return Err(Error::InvalidEntropyLength(entropy_len));
    }
    let total_bits = entropy_len * 8 + entropy_len / 4;
    Ok(total_bits / WORD_BITS)
}

/// Entropy length, in bytes, carried by a mnemonic of `word_count` words.
pub fn entropy_len_for_word_count(word_count: usize) -> Result<usize, Error> {
    match word_count {
        12 => Ok(16),
        15 => Ok(20),
        18 => Ok(24),
        21 => Ok(28),
        24 => Ok(32),
        _ => Err(Error::InvalidWordCount(word_count)),
    }
}

impl From<bip39_crate::Error> for Error {
    fn from(err: bip39_crate::Error) -> Self {
        match err {
            bip39_crate::Error::BadEntropyBitCount(bits) => Error::InvalidEntropyLength(bits / 8),
            bip39_crate::Error::BadWordCount(count) => Error::InvalidWordCount(count),
            bip39_crate::Error::InvalidChecksum => Error::ChecksumMismatch,
            other => Error::InvalidMnemonic(other.to_string()),
        }
    }
}

/// Encode `entropy` into word indices written at the start of `out`.
///
/// Returns the number of indices written.
pub fn encode_into(entropy: &[u8], out: &mut [u16]) -> Result<usize, Error> {
    let word_count = word_count_for_entropy(entropy.len())?;
    if out.len() < word_count {
        return Err(Error::BufferTooSmall {
            required: word_count,
            available: out.len(),
        });
    }

    let mnemonic = bip39_crate::Mnemonic::from_entropy(entropy)?;
    for (slot, index) in out.iter_mut().zip(mnemonic.word_indices()) {
        // word indices are below 2048
        *slot = index as u16;
    }

    Ok(word_count)
}

/// Encode `entropy` into word indices.
///
/// `capacity` is the number of words the caller is prepared to receive; it
/// must be at least the word count of the entropy length.
pub fn encode(entropy: &[u8], capacity: usize) -> Result<Vec<u16>, Error> {
    let word_count = word_count_for_entropy(entropy.len())?;
    if capacity < word_count {
        return Err(Error::BufferTooSmall {
            required: word_count,
            available: capacity,
        });
    }
    let mut indices = vec![0u16; word_count];
    encode_into(entropy, &mut indices)?;
    Ok(indices)
}

/// Decode word indices back into entropy, verifying the checksum.
pub fn decode(indices: &[u16]) -> Result<Entropy, Error> {
    entropy_len_for_word_count(indices.len())?;
    if let Some(&bad) = indices.iter().find(|&&index| index >= WORD_LIST_SIZE) {
        return Err(Error::InvalidWordIndex(bad));
    }

    let language = bip39_crate::Language::English;
    let words = language.word_list();
    let mut phrase =
        indices.iter().map(|&index| words[usize::from(index)]).collect::<Vec<_>>().join(" ");
    let parsed = bip39_crate::Mnemonic::parse_in_normalized(language, &phrase);
    phrase.zeroize();

    Ok(Entropy(parsed?.to_entropy()))
}

/// Raw entropy seeding a mnemonic and the wallet master key
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Entropy(Vec<u8>);

impl Entropy {
    /// Create entropy from bytes, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        word_count_for_entropy(bytes.len())?;
        Ok(Self(bytes.to_vec()))
    }

    /// Generate random entropy for a mnemonic of `word_count` words.
    #[cfg(feature = "getrandom")]
    pub fn generate(word_count: usize) -> Result<Self, Error> {
        let mut bytes = vec![0u8; entropy_len_for_word_count(word_count)?];
        getrandom::getrandom(&mut bytes).map_err(|e| Error::EntropySource(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Entropy bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entropy bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of mnemonic words this entropy encodes to
    pub fn word_count(&self) -> usize {
        // Length is validated on construction.
        self.0.len() * 3 / 4
    }
}

impl AsRef<[u8]> for Entropy {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entropy({} bytes, ***)", self.0.len())
    }
}

/// Word list used to render a mnemonic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    #[cfg(feature = "all-languages")]
    ChineseSimplified,
    #[cfg(feature = "all-languages")]
    ChineseTraditional,
    #[cfg(feature = "all-languages")]
    Czech,
    #[cfg(feature = "all-languages")]
    French,
    #[cfg(feature = "all-languages")]
    Italian,
    #[cfg(feature = "all-languages")]
    Japanese,
    #[cfg(feature = "all-languages")]
    Korean,
    #[cfg(feature = "all-languages")]
    Portuguese,
    #[cfg(feature = "all-languages")]
    Spanish,
}

impl From<Language> for bip39_crate::Language {
    fn from(lang: Language) -> Self {
        match lang {
            Language::English => bip39_crate::Language::English,
            #[cfg(feature = "all-languages")]
            Language::ChineseSimplified => bip39_crate::Language::SimplifiedChinese,
            #[cfg(feature = "all-languages")]
            Language::ChineseTraditional => bip39_crate::Language::TraditionalChinese,
            #[cfg(feature = "all-languages")]
            Language::Czech => bip39_crate::Language::Czech,
            #[cfg(feature = "all-languages")]
            Language::French => bip39_crate::Language::French,
            #[cfg(feature = "all-languages")]
            Language::Italian => bip39_crate::Language::Italian,
            #[cfg(feature = "all-languages")]
            Language::Japanese => bip39_crate::Language::Japanese,
            #[cfg(feature = "all-languages")]
            Language::Korean => bip39_crate::Language::Korean,
            #[cfg(feature = "all-languages")]
            Language::Portuguese => bip39_crate::Language::Portuguese,
            #[cfg(feature = "all-languages")]
            Language::Spanish => bip39_crate::Language::Spanish,
        }
    }
}

impl Language {
    /// Word at `index` in this language's list.
    pub fn word(self, index: u16) -> Option<&'static str> {
        bip39_crate::Language::from(self).word_list().get(usize::from(index)).copied()
    }

    /// Index of `word` in this language's list.
    pub fn index_of(self, word: &str) -> Option<u16> {
        bip39_crate::Language::from(self).find_word(word)
    }
}

/// BIP39 mnemonic
///
/// Always holds a checksum-valid index sequence together with the entropy it
/// encodes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic {
    indices: Vec<u16>,
    entropy: Entropy,
}

impl Mnemonic {
    /// Generate a new mnemonic with the specified word count
    #[cfg(feature = "getrandom")]
    pub fn generate(word_count: usize) -> Result<Self, Error> {
        let entropy = Entropy::generate(word_count)?;
        Self::from_entropy(entropy.as_bytes())
    }

    /// Create a mnemonic from entropy bytes
    pub fn from_entropy(entropy: &[u8]) -> Result<Self, Error> {
        let indices = encode(entropy, word_count_for_entropy(entropy.len())?)?;
        Ok(Self {
            indices,
            entropy: Entropy::from_slice(entropy)?,
        })
    }

    /// Create a mnemonic from word indices, verifying the checksum
    pub fn from_indices(indices: &[u16]) -> Result<Self, Error> {
        let entropy = decode(indices)?;
        Ok(Self {
            indices: indices.to_vec(),
            entropy,
        })
    }

    /// Create a mnemonic from a phrase
    pub fn from_phrase(phrase: &str, language: Language) -> Result<Self, Error> {
        let mut indices = phrase
            .split_whitespace()
            .map(|word| language.index_of(word).ok_or_else(|| Error::UnknownWord(word.into())))
            .collect::<Result<Vec<u16>, Error>>()?;
        let result = Self::from_indices(&indices);
        indices.zeroize();
        result
    }

    /// Validate a mnemonic phrase
    pub fn validate(phrase: &str, language: Language) -> bool {
        Self::from_phrase(phrase, language).is_ok()
    }

    /// Get the mnemonic phrase in the given language
    pub fn phrase_in(&self, language: Language) -> String {
        self.indices
            .iter()
            .filter_map(|&index| language.word(index))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get the English mnemonic phrase
    pub fn phrase(&self) -> String {
        self.phrase_in(Language::English)
    }

    /// Word indices, checksum included
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Entropy encoded by this mnemonic
    pub fn entropy(&self) -> &Entropy {
        &self.entropy
    }

    /// Get the word count
    pub fn word_count(&self) -> usize {
        self.indices.len()
    }
}

impl FromStr for Mnemonic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_phrase(s, Language::English)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.phrase())
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words, ***)", self.indices.len())
    }
}
