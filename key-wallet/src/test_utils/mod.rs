//! Shared fixtures for unit and integration tests
//!
//! Vectors below derive from 16 zero bytes of entropy
//! ("abandon abandon ... about").

mod wallet;

/// 16 bytes of zero entropy
pub const ZERO_ENTROPY: [u8; 16] = [0u8; 16];

/// Word indices of [`ZERO_ENTROPY`]
pub const ZERO_ENTROPY_INDICES: [u16; 12] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3];

/// Root extended private key with the empty passphrase
pub const ROOT_XPRV: &str = "60ce7dbec3616e9fc17e0c32578b3f380337b1b61a1f3cb9651aee30670e6f53970419a23a2e4e4082d12bf78faa8645dfc882cee2ae7179e2b07fe88098abb2072310084784c7308182dbbdb1449b2706586f1ff5cbf13d15e9b6e78c15f067";

/// Root extended private key with the passphrase `"x"`
pub const ROOT_XPRV_PASSPHRASE_X: &str = "e8f7158e2f2229e1119a98c247f210889c2643197a786b3a2edc1f8cf359755737ed8998211b71b79ddbda6f74a0ce3e2b19b792db30ce455dac1207a30a257371f8dd503bd274968582fd52d49b8d1a06df508f570911cc01130f91de12112c";

/// Root extended public key with the empty passphrase
pub const ROOT_XPUB: &str = "37fdfdbe9ac856469f8d83c66c57880246cd8bf7f852bf5b94336fe535c0efc8072310084784c7308182dbbdb1449b2706586f1ff5cbf13d15e9b6e78c15f067";

/// `m/44'/1815'/0'` extended private key
pub const ACCOUNT_0_XPRV: &str = "50fc30e83bde38470955247d32a6d35bb2bcbccc18a648bcbfbe07716f0e6f53fabf6d38e5bac238d796cdae15dedbc6083238a6ceaef6a2f6626224a2abbc02b3ea35f04f2ca79e4a69c8e920be85486e4c8c3986675d3a32b41b362cd52c40";

/// `m/44'/1815'/0'` extended public key
pub const ACCOUNT_0_XPUB: &str = "589d388a38a61902a3216b49c7e818de2375102a960f50611b26273790bcc33db3ea35f04f2ca79e4a69c8e920be85486e4c8c3986675d3a32b41b362cd52c40";

/// `m/44'/1815'/0'/0/0` extended public key
pub const EXTERNAL_0_XPUB: &str = "008254ee8b74b30fa3a7ab1f6c34e911a16fb1bb53107920cb45f1dea5ba9f07528ca351238f8c1e0e6ef281ce34818a3481c65ac00b7bb7ab7bb9d5b8b7024c";

/// Mainnet addresses `m/44'/1815'/0'/0/{0,1,2}`
pub const EXTERNAL_ADDRESSES: [&str; 3] = [
    "Ae2tdPwUPEZKcVUy5JAhPjdXa6PuWMnHDgjWdK4ZyGK33L8YWjBv2saUwaa",
    "Ae2tdPwUPEZJ4UpAGkA1kWGjKyb2qS6rcXnN8ejZth9ue1HX74xtGbY2ET6",
    "Ae2tdPwUPEZ4yB43YMJaW155Xz39Bo8KuFLdG6RSEmP4VmQhcj64HvF5aSs",
];

/// Mainnet addresses `m/44'/1815'/0'/1/{0,1,2}`
pub const INTERNAL_ADDRESSES: [&str; 3] = [
    "Ae2tdPwUPEZ5hDikdtjQ3AeZpBvnWGnXd3VS1HdZiXN3srd4wAHm6i33Bex",
    "Ae2tdPwUPEZFVHSQA3FiDnvmpTxbS4oYqdt4wokEufX5iK9EjfQdDYdj8Cf",
    "Ae2tdPwUPEZBCem2mFQrshrG7D1kesEoCcrPUFRrESBc9XtZT7zKVruPrdq",
];

/// Legacy testnet address `m/44'/1815'/0'/0/0`
pub const TESTNET_EXTERNAL_0: &str =
    "2cWKMJemoBam9CtCmvD8pTJ9sAAoDpvmTgjTbLL5jwB82pdJGnnv4xb33Gz7KHkaZUVeN";
