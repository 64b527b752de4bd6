//! BIP32 tests

use std::str::FromStr;

use assert_matches::assert_matches;
use cardano_key_wallet::bip32::{Error, KeyEncodingError, HARDENED_OFFSET};
use cardano_key_wallet::derivation::{bip44_account_path, bip44_address_path, derive_child};
use cardano_key_wallet::test_utils::{
    ACCOUNT_0_XPRV, ACCOUNT_0_XPUB, EXTERNAL_0_XPUB, ROOT_XPRV, ROOT_XPUB,
};
use cardano_key_wallet::{ChildNumber, DerivationPath, ErrorKind, KeyDerivation, XPrv, XPub};

fn root() -> XPrv {
    XPrv::from_bytes(&hex::decode(ROOT_XPRV).unwrap()).unwrap()
}

#[test]
fn test_root_public_key() {
    assert_eq!(root().public().to_string(), ROOT_XPUB);
}

#[test]
fn test_account_derivation() {
    let account = root().derive_path(&bip44_account_path(0).unwrap()).unwrap();
    assert_eq!(hex::encode(&account.to_bytes()[..]), ACCOUNT_0_XPRV);
    assert_eq!(account.public().to_string(), ACCOUNT_0_XPUB);
}

#[test]
fn test_public_derivation_matches_private() {
    let account_xpub = XPub::from_str(ACCOUNT_0_XPUB).unwrap();
    let path = DerivationPath::from_str("m/0/0").unwrap();
    assert_eq!(account_xpub.derive_path(&path).unwrap().to_string(), EXTERNAL_0_XPUB);

    let full = root().derive_path(&bip44_address_path(0, 0, 0).unwrap()).unwrap();
    assert_eq!(full.public().to_string(), EXTERNAL_0_XPUB);
}

#[test]
fn test_hardened_derivation_requires_private_key() {
    let xpub = root().public();
    for index in [0u32, 1, 44, 1815, HARDENED_OFFSET - 1] {
        let err = derive_child(&xpub, index, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DerivationConstraintViolation);
        assert!(derive_child(&root(), index, true).is_ok());
    }
}

#[test]
fn test_index_out_of_range() {
    assert_matches!(
        ChildNumber::from_normal_idx(HARDENED_OFFSET),
        Err(Error::InvalidChildNumber(i)) if i == HARDENED_OFFSET
    );
    let err = derive_child(&root(), HARDENED_OFFSET, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DerivationConstraintViolation);
}

#[test]
fn test_xprv_byte_round_trip() {
    let bytes = hex::decode(ACCOUNT_0_XPRV).unwrap();
    let xprv = XPrv::from_bytes(&bytes).unwrap();
    assert_eq!(&xprv.to_bytes()[..], &bytes[..]);
}

#[test]
fn test_xprv_rejects_malformed_bytes() {
    let bytes = hex::decode(ROOT_XPRV).unwrap();

    assert_matches!(
        XPrv::from_bytes(&bytes[..95]),
        Err(Error::MalformedKeyEncoding(KeyEncodingError::WrongLength { expected: 96, got: 95 }))
    );

    let mut low = bytes.clone();
    low[0] |= 0b0000_0001;
    assert_matches!(
        XPrv::from_bytes(&low),
        Err(Error::MalformedKeyEncoding(KeyEncodingError::LowestBitsInvalid))
    );

    let mut high = bytes.clone();
    high[31] |= 0b1000_0000;
    assert_matches!(
        XPrv::from_bytes(&high),
        Err(Error::MalformedKeyEncoding(KeyEncodingError::HighestBitsInvalid))
    );

    let mut cleared = bytes;
    cleared[31] &= 0b0011_1111;
    assert_matches!(
        XPrv::from_bytes(&cleared),
        Err(Error::MalformedKeyEncoding(KeyEncodingError::HighestBitsInvalid))
    );
}

#[test]
fn test_xpub_rejects_malformed_bytes() {
    assert_matches!(
        XPub::from_bytes(&[0u8; 63]),
        Err(Error::MalformedKeyEncoding(KeyEncodingError::WrongLength { expected: 64, got: 63 }))
    );
    // y = 2 is not the y coordinate of any curve point
    let mut bytes = [0u8; 64];
    bytes[0] = 2;
    assert_matches!(
        XPub::from_bytes(&bytes),
        Err(Error::MalformedKeyEncoding(KeyEncodingError::InvalidPoint))
    );
    assert_matches!(XPub::from_str("zz"), Err(Error::MalformedKeyEncoding(KeyEncodingError::InvalidHex)));
}

#[test]
fn test_derivation_path_parsing() {
    // Valid paths
    assert!(DerivationPath::from_str("m").is_ok());
    assert!(DerivationPath::from_str("m/0").is_ok());
    assert!(DerivationPath::from_str("m/0'").is_ok());
    assert_eq!(
        DerivationPath::from_str("m/44'/1815'/0'/0/0").unwrap(),
        bip44_address_path(0, 0, 0).unwrap()
    );

    // Invalid paths
    assert!(DerivationPath::from_str("").is_err());
    assert!(DerivationPath::from_str("n/0").is_err());
    assert!(DerivationPath::from_str("m/").is_err());
    assert!(DerivationPath::from_str("m/0''").is_err());
}

#[test]
fn test_derivation_is_deterministic() {
    let path = bip44_address_path(7, 1, 42).unwrap();
    let a = root().derive_path(&path).unwrap();
    let b = root().derive_path(&path).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.public(), root().derive_path(&bip44_address_path(7, 1, 43).unwrap()).unwrap().public());
}

#[cfg(feature = "serde")]
#[test]
fn test_xpub_serde() {
    let xpub = XPub::from_str(ACCOUNT_0_XPUB).unwrap();
    let json = serde_json::to_string(&xpub).unwrap();
    assert_eq!(json, format!("\"{}\"", ACCOUNT_0_XPUB));
    assert_eq!(serde_json::from_str::<XPub>(&json).unwrap(), xpub);
}
