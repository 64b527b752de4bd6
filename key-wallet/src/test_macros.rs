//! Test macros for cardano-key-wallet.

/// Round-trips a value through JSON, optionally pinning the encoded form.
#[cfg(all(test, feature = "serde"))]
macro_rules! serde_round_trip {
    ($var:expr) => {{
        let encoded = serde_json::to_string(&$var).unwrap();
        let decoded = serde_json::from_str(&encoded).unwrap();
        assert_eq!($var, decoded);
    }};
    ($var:expr, $json:expr) => {{
        let encoded = serde_json::to_value(&$var).unwrap();
        assert_eq!(encoded, $json);
        serde_round_trip!($var);
    }};
}
