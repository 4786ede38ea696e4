use ciborium::value::Value;

use crate::authdata::{self, AuthDataError};
use crate::cbor::{cbor_bytes, cbor_get_str, cbor_int, cbor_text, text_key};

// CTAP2 authenticatorMakeCredential responses use integer keys; the WebAuthn
// attestationObject uses the text names.
const CTAP_KEY_FMT: i64 = 1;
const CTAP_KEY_AUTH_DATA: i64 = 2;
const CTAP_KEY_ATT_STMT: i64 = 3;

#[derive(Debug, thiserror::Error)]
pub enum AttestationError {
    #[error("cbor: {0}")]
    Cbor(String),
    #[error("expected a CBOR map")]
    NotAMap,
    #[error("missing authData")]
    MissingAuthData,
    #[error("authData is not a byte string")]
    AuthDataNotBytes,
    #[error("authData: {0}")]
    AuthData(#[from] AuthDataError),
}

fn is_auth_data_key(k: &Value) -> bool {
    match k {
        Value::Text(s) => s == "authData",
        Value::Integer(i) => i128::from(*i) == CTAP_KEY_AUTH_DATA as i128,
        _ => false,
    }
}

/// CTAP integer keys are renamed to their WebAuthn text names so the rest of
/// the pipeline sees one shape.
fn normalize_key(k: Value) -> Value {
    match cbor_int(&k) {
        Some(CTAP_KEY_FMT) => text_key("fmt"),
        Some(CTAP_KEY_AUTH_DATA) => text_key("authData"),
        Some(CTAP_KEY_ATT_STMT) => text_key("attStmt"),
        _ => k,
    }
}

/// Decode the envelope and replace `authData` with its decoded record.
pub fn try_decode(bytes: &[u8]) -> Result<Value, AttestationError> {
    let value = crate::cbor::decode(bytes).map_err(AttestationError::Cbor)?;
    let Value::Map(map) = value else {
        return Err(AttestationError::NotAMap);
    };
    if !map.iter().any(|(k, _)| is_auth_data_key(k)) {
        return Err(AttestationError::MissingAuthData);
    }

    let mut out = Vec::with_capacity(map.len());
    for (k, v) in map {
        if is_auth_data_key(&k) {
            let raw = cbor_bytes(&v).ok_or(AttestationError::AuthDataNotBytes)?;
            let record = authdata::try_decode_value(raw)?;
            out.push((normalize_key(k), record));
        } else {
            out.push((normalize_key(k), v));
        }
    }
    let fmt = cbor_get_str(&out, "fmt").and_then(cbor_text).unwrap_or("unknown");
    tracing::debug!(fmt, entries = out.len(), "Decoded attestation object");
    Ok(Value::Map(out))
}

/// Never fails: anything [`try_decode`] rejects becomes one diagnostic string,
/// which callers show verbatim instead of a structured object.
pub fn decode_value(bytes: &[u8]) -> Value {
    try_decode(bytes).unwrap_or_else(|e| {
        tracing::warn!(len = bytes.len(), error = %e, "Attestation object could not be decoded");
        Value::Text(format!("could not parse attestation object: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cbor::cbor_map;

    fn bv(b: &[u8]) -> Value { Value::Bytes(b.to_vec()) }
    fn tv(s: &str)  -> Value { Value::Text(s.to_string()) }
    fn iv(i: i64)   -> Value { Value::Integer(i.into()) }
    fn mv(v: Vec<(Value, Value)>) -> Value { Value::Map(v) }

    fn encode(v: Value) -> Vec<u8> {
        crate::cbor::encode(&v).unwrap()
    }

    fn assertion_auth_data() -> Vec<u8> {
        let mut data = vec![0xABu8; 32];
        data.push(0x01);
        data.extend_from_slice(&5u32.to_be_bytes());
        data
    }

    #[test]
    fn test_webauthn_keys() {
        let obj = encode(mv(vec![
            (tv("fmt"), tv("none")),
            (tv("attStmt"), mv(vec![])),
            (tv("authData"), bv(&assertion_auth_data())),
        ]));
        let v = try_decode(&obj).unwrap();
        let map = cbor_map(&v).unwrap();
        assert_eq!(cbor_get_str(map, "fmt").and_then(cbor_text), Some("none"));
        let ad = cbor_get_str(map, "authData").and_then(cbor_map).expect("decoded record");
        assert_eq!(cbor_get_str(ad, "signCount"), Some(&iv(5)));
        // order preserved
        assert!(matches!(&map[2].0, Value::Text(s) if s == "authData"));
    }

    #[test]
    fn test_ctap_integer_keys_are_renamed() {
        let obj = encode(mv(vec![
            (iv(1), tv("packed")),
            (iv(2), bv(&assertion_auth_data())),
            (iv(3), mv(vec![(tv("alg"), iv(-7)), (tv("sig"), bv(&[0x30, 0x00]))])),
        ]));
        let v = try_decode(&obj).unwrap();
        let map = cbor_map(&v).unwrap();
        assert_eq!(cbor_get_str(map, "fmt").and_then(cbor_text), Some("packed"));
        assert!(cbor_get_str(map, "authData").and_then(cbor_map).is_some());
        assert!(cbor_get_str(map, "attStmt").and_then(cbor_map).is_some());
    }

    #[test]
    fn test_missing_auth_data() {
        let obj = encode(mv(vec![(tv("fmt"), tv("none"))]));
        assert!(matches!(try_decode(&obj), Err(AttestationError::MissingAuthData)));
        let v = decode_value(&obj);
        assert!(matches!(v, Value::Text(s) if s.contains("missing authData")));
    }

    #[test]
    fn test_malformed_cbor_is_diagnostic() {
        assert!(matches!(try_decode(b"\xff\xff"), Err(AttestationError::Cbor(_))));
        assert!(matches!(decode_value(b"\xff\xff"), Value::Text(_)));
    }

    #[test]
    fn test_not_a_map() {
        let obj = encode(Value::Array(vec![iv(1)]));
        assert!(matches!(try_decode(&obj), Err(AttestationError::NotAMap)));
    }

    #[test]
    fn test_truncated_auth_data_fails_whole_object() {
        let obj = encode(mv(vec![(tv("authData"), bv(&[0u8; 20]))]));
        assert!(matches!(
            try_decode(&obj),
            Err(AttestationError::AuthData(AuthDataError::BufferUnderrun { .. }))
        ));
    }

    #[test]
    fn test_auth_data_wrong_type() {
        let obj = encode(mv(vec![(tv("authData"), tv("nope"))]));
        assert!(matches!(try_decode(&obj), Err(AttestationError::AuthDataNotBytes)));
    }
}
