//! Wallet and account tests

use assert_matches::assert_matches;
use cardano_key_wallet::bip32::HARDENED_OFFSET;
use cardano_key_wallet::test_utils::{
    ACCOUNT_0_XPUB, EXTERNAL_ADDRESSES, INTERNAL_ADDRESSES, ROOT_XPRV_PASSPHRASE_X, ROOT_XPUB,
    TESTNET_EXTERNAL_0, ZERO_ENTROPY,
};
use cardano_key_wallet::{
    AddressChain, Error, ErrorKind, Mnemonic, Network, Wallet, WalletConfig, XPrv,
};

#[test]
fn test_zero_entropy_root_key() {
    let wallet = Wallet::from_entropy(&ZERO_ENTROPY, b"").unwrap();
    assert_eq!(wallet.root_xpub().to_string(), ROOT_XPUB);
}

#[test]
fn test_passphrase_separation() {
    let plain = Wallet::from_entropy(&ZERO_ENTROPY, b"").unwrap();
    let with_x = Wallet::from_entropy(&ZERO_ENTROPY, b"x").unwrap();
    assert_ne!(plain.root_xpub(), with_x.root_xpub());
    assert_ne!(plain.wallet_id(), with_x.wallet_id());

    let expected = XPrv::from_bytes(&hex::decode(ROOT_XPRV_PASSPHRASE_X).unwrap()).unwrap();
    assert_eq!(with_x.root_xpub(), expected.public());
}

#[test]
fn test_empty_passphrase_is_no_passphrase() {
    let mnemonic = Mnemonic::from_entropy(&ZERO_ENTROPY).unwrap();
    let recovered = Wallet::from_mnemonic(&mnemonic, b"").unwrap();
    let created = Wallet::dummy(Network::Mainnet);
    assert_eq!(recovered.root_xpub(), created.root_xpub());
}

#[test]
fn test_account_creation() {
    let wallet = Wallet::dummy(Network::Mainnet);
    let account = wallet.create_account("main", 0).unwrap();
    assert_eq!(account.xpub().to_string(), ACCOUNT_0_XPUB);
    assert_eq!(account.derivation_path().to_string(), "m/44'/1815'/0'");
    assert_eq!(account.alias(), "main");

    let other = wallet.create_account("main", 1).unwrap();
    assert_ne!(other.xpub(), account.xpub());
}

#[test]
fn test_account_index_limit() {
    let wallet = Wallet::dummy(Network::Mainnet);
    assert!(wallet.create_account("last", HARDENED_OFFSET - 1).is_ok());
    let err = wallet.create_account("too far", HARDENED_OFFSET).unwrap_err();
    assert_matches!(err, Error::Bip32(_));
    assert_eq!(err.kind(), ErrorKind::DerivationConstraintViolation);
}

#[test]
fn test_external_and_internal_addresses() {
    let wallet = Wallet::dummy(Network::Mainnet);
    let account = wallet.create_account("main", 0).unwrap();

    let external: Vec<String> = account
        .generate_addresses(AddressChain::External, 0, 3)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(external, EXTERNAL_ADDRESSES);

    let internal: Vec<String> = account
        .generate_addresses(AddressChain::from_internal(true), 0, 3)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(internal, INTERNAL_ADDRESSES);
}

#[test]
fn test_five_distinct_deterministic_addresses() {
    let wallet = Wallet::dummy(Network::Mainnet);
    let account = wallet.create_account("main", 0).unwrap();

    let first = account.generate_addresses(AddressChain::External, 0, 5).unwrap();
    let second = account.generate_addresses(AddressChain::External, 0, 5).unwrap();
    assert_eq!(first, second);

    for (i, a) in first.iter().enumerate() {
        for b in &first[i + 1..] {
            assert_ne!(a, b);
        }
    }

    // a later window overlaps the first one
    let shifted = account.generate_addresses(AddressChain::External, 2, 3).unwrap();
    assert_eq!(&shifted[..], &first[2..]);
}

#[test]
fn test_testnet_addresses() {
    let wallet = Wallet::dummy(Network::Testnet);
    let account = wallet.create_account("test", 0).unwrap();
    let address = account.address_at(AddressChain::External, 0).unwrap();
    assert_eq!(address.to_string(), TESTNET_EXTERNAL_0);
    assert_eq!(address.network(), Network::Testnet);
}

#[test]
fn test_fill_addresses_appends() {
    let wallet = Wallet::dummy(Network::Mainnet);
    let account = wallet.create_account("main", 0).unwrap();

    let mut out = Vec::new();
    assert_eq!(account.fill_addresses(AddressChain::External, 0, 2, &mut out).unwrap(), 2);
    assert_eq!(account.fill_addresses(AddressChain::External, 2, 1, &mut out).unwrap(), 1);
    let text: Vec<String> = out.iter().map(ToString::to_string).collect();
    assert_eq!(text, EXTERNAL_ADDRESSES);

    assert_eq!(account.fill_addresses(AddressChain::External, 0, 0, &mut out).unwrap(), 0);
    assert_eq!(out.len(), 3);
}

#[test]
fn test_batch_limit_from_config() {
    let config = WalletConfig::new().with_max_address_batch(10);
    let wallet = Wallet::from_entropy_with_config(&ZERO_ENTROPY, b"", config).unwrap();
    let account = wallet.create_account("main", 0).unwrap();

    let err = account.generate_addresses(AddressChain::External, 0, 11).unwrap_err();
    assert_matches!(err, Error::ResourceLimitExceeded { requested: 11, limit: 10 });
    assert_eq!(account.generate_addresses(AddressChain::External, 0, 10).unwrap().len(), 10);
}

#[test]
fn test_accounts_outlive_wallet() {
    let account = {
        let wallet = Wallet::dummy(Network::Mainnet);
        wallet.create_account("kept", 0).unwrap()
    };
    let address = account.address_at(AddressChain::External, 0).unwrap();
    assert_eq!(address.to_string(), EXTERNAL_ADDRESSES[0]);
}

#[test]
fn test_with_config_applies_to_new_accounts() {
    let mut wallet = Wallet::dummy(Network::Mainnet);
    wallet.add_account("mainnet", 0).unwrap();
    let wallet = wallet.with_config(WalletConfig::new().with_network(Network::Testnet)).unwrap();

    assert_eq!(wallet.account(0).unwrap().network(), Network::Mainnet);
    assert_eq!(wallet.create_account("testnet", 0).unwrap().network(), Network::Testnet);
}
