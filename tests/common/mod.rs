//! Builders for credential fixtures shared by the integration tests.

#![allow(dead_code)]

use ciborium::value::Value;
use credscope::credential::encode_base64url;

pub const RP_ID_HASH: [u8; 32] = [0x49; 32];
pub const AAGUID: [u8; 16] = [
    0xf1, 0xd0, 0x6b, 0x4e, 0x3a, 0x17, 0x4c, 0x80, 0xb1, 0xd2, 0x9e, 0x3f, 0x00, 0x00, 0x00, 0x01,
];

// P-256 generator point
pub const GX: [u8; 32] = [
    0x6b, 0x17, 0xd1, 0xf2, 0xe1, 0x2c, 0x42, 0x47, 0xf8, 0xbc, 0xe6, 0xe5, 0x63, 0xa4, 0x40, 0xf2,
    0x77, 0x03, 0x7d, 0x81, 0x2d, 0xeb, 0x33, 0xa0, 0xf4, 0xa1, 0x39, 0x45, 0xd8, 0x98, 0xc2, 0x96,
];
pub const GY: [u8; 32] = [
    0x4f, 0xe3, 0x42, 0xe2, 0xfe, 0x1a, 0x7f, 0x9b, 0x8e, 0xe7, 0xeb, 0x4a, 0x7c, 0x0f, 0x9e, 0x16,
    0x2b, 0xce, 0x33, 0x57, 0x6b, 0x31, 0x5e, 0xce, 0xcb, 0xb6, 0x40, 0x68, 0x37, 0xbf, 0x51, 0xf5,
];

pub fn bv(b: &[u8]) -> Value { Value::Bytes(b.to_vec()) }
pub fn tv(s: &str)  -> Value { Value::Text(s.to_string()) }
pub fn iv(i: i64)   -> Value { Value::Integer(i.into()) }
pub fn mv(v: Vec<(Value, Value)>) -> Value { Value::Map(v) }
pub fn av(v: Vec<Value>)          -> Value { Value::Array(v) }

pub fn encode(v: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    ciborium::into_writer(v, &mut buf).unwrap();
    buf
}

/// P-256 COSE_Key (kty=2, alg=-7, crv=1, x, y).
pub fn encode_cose_key(x: &[u8; 32], y: &[u8; 32]) -> Vec<u8> {
    encode(&mv(vec![
        (iv(1), iv(2)),
        (iv(3), iv(-7)),
        (iv(-1), iv(1)),
        (iv(-2), bv(x)),
        (iv(-3), bv(y)),
    ]))
}

/// authenticatorData for a registration (UP=1, AT=1).
pub fn make_cred_auth_data(credential_id: &[u8], cose_key: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&RP_ID_HASH);
    data.push(0x41);
    data.extend_from_slice(&[0, 0, 0, 0]);
    data.extend_from_slice(&AAGUID);
    data.extend_from_slice(&(credential_id.len() as u16).to_be_bytes());
    data.extend_from_slice(credential_id);
    data.extend_from_slice(cose_key);
    data
}

/// authenticatorData for an assertion (UP=1, UV=1).
pub fn get_assertion_auth_data(sign_count: u32) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&RP_ID_HASH);
    data.push(0x05);
    data.extend_from_slice(&sign_count.to_be_bytes());
    data
}

/// "packed" attestation object with a signature and a certificate chain.
pub fn packed_attestation_object(auth_data: &[u8], certs: &[&[u8]]) -> Vec<u8> {
    encode(&mv(vec![
        (tv("fmt"), tv("packed")),
        (
            tv("attStmt"),
            mv(vec![
                (tv("alg"), iv(-7)),
                (tv("sig"), bv(&[0x30, 0x45, 0x02, 0x21])),
                (tv("x5c"), av(certs.iter().map(|c| bv(c)).collect())),
            ]),
        ),
        (tv("authData"), bv(auth_data)),
    ]))
}

pub fn client_data(kind: &str) -> Vec<u8> {
    format!(
        r#"{{"type":"{kind}","challenge":"c2VjcmV0","origin":"https://example.com","crossOrigin":false}}"#
    )
    .into_bytes()
}

/// WebAuthn JSON for a registration result.
pub fn registration_json(credential_id: &[u8], attestation_object: &[u8]) -> serde_json::Value {
    serde_json::json!({
        "id": encode_base64url(credential_id),
        "rawId": encode_base64url(credential_id),
        "type": "public-key",
        "authenticatorAttachment": "cross-platform",
        "response": {
            "clientDataJSON": encode_base64url(&client_data("webauthn.create")),
            "attestationObject": encode_base64url(attestation_object),
            "transports": ["usb"]
        },
        "clientExtensionResults": {}
    })
}

/// Registration JSON laid out like `PublicKeyCredential.toJSON()`, with the
/// SPKI `publicKey` (base64url text) ahead of the attestation object and no
/// top-level `authenticatorData`.
pub fn registration_json_with_spki(credential_id: &[u8], attestation_object: &[u8]) -> serde_json::Value {
    serde_json::json!({
        "id": encode_base64url(credential_id),
        "rawId": encode_base64url(credential_id),
        "type": "public-key",
        "response": {
            "clientDataJSON": encode_base64url(&client_data("webauthn.create")),
            "transports": ["usb"],
            "publicKey": "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEaxfR8uEsQkf4vOblY6RA8ncDfYEt6zOg9KE5RdiYwpZP40Li_hp_m47n60p8D54WK84zV2sxXs7LtkBoN79R9Q",
            "publicKeyAlgorithm": -7,
            "attestationObject": encode_base64url(attestation_object)
        },
        "clientExtensionResults": {}
    })
}

/// WebAuthn JSON for an authentication result.
pub fn assertion_json(credential_id: &[u8], sign_count: u32) -> serde_json::Value {
    serde_json::json!({
        "id": encode_base64url(credential_id),
        "rawId": encode_base64url(credential_id),
        "type": "public-key",
        "response": {
            "clientDataJSON": encode_base64url(&client_data("webauthn.get")),
            "authenticatorData": encode_base64url(&get_assertion_auth_data(sign_count)),
            "signature": encode_base64url(&[0x30, 0x44, 0x02, 0x20]),
            "userHandle": encode_base64url(b"user-1")
        },
        "clientExtensionResults": {}
    })
}
