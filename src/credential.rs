use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use ciborium::value::Value;

use crate::cbor::text_key;

/// Members that carry binary payloads in the WebAuthn JSON serialization
/// (`PublicKeyCredential.toJSON()`), base64url encoded. `response.publicKey`
/// is not listed: it holds a DER SubjectPublicKeyInfo, not a COSE key.
pub const BINARY_FIELDS: &[&str] = &[
    "rawId",
    "clientDataJSON",
    "attestationObject",
    "authenticatorData",
    "signature",
    "userHandle",
];

const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cbor: {0}")]
    Cbor(String),
    #[error("{field}: invalid base64url: {source}")]
    Base64 {
        field: String,
        source: base64::DecodeError,
    },
    #[error("credential result must be an object or map")]
    NotAMap,
}

/// A credential result from its WebAuthn JSON form.
pub fn from_json_slice(bytes: &[u8]) -> Result<Value, InputError> {
    let json: serde_json::Value = serde_json::from_slice(bytes)?;
    from_json(&json)
}

pub fn from_json(json: &serde_json::Value) -> Result<Value, InputError> {
    if !json.is_object() {
        return Err(InputError::NotAMap);
    }
    convert(json)
}

fn convert(json: &serde_json::Value) -> Result<Value, InputError> {
    use serde_json::Value as Json;
    match json {
        Json::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (k, v) in map {
                let value = match v {
                    Json::String(s) if BINARY_FIELDS.contains(&k.as_str()) => {
                        let bytes = BASE64URL
                            .decode(s)
                            .map_err(|source| InputError::Base64 { field: k.clone(), source })?;
                        Value::Bytes(bytes)
                    }
                    other => convert(other)?,
                };
                entries.push((text_key(k), value));
            }
            Ok(Value::Map(entries))
        }
        Json::Array(items) => Ok(Value::Array(items.iter().map(convert).collect::<Result<_, _>>()?)),
        scalar => Ok(crate::cbor::from_json(scalar)),
    }
}

/// A credential result previously exported as CBOR.
pub fn from_cbor(bytes: &[u8]) -> Result<Value, InputError> {
    let value = crate::cbor::decode(bytes).map_err(InputError::Cbor)?;
    match value {
        Value::Map(_) => Ok(value),
        _ => Err(InputError::NotAMap),
    }
}

/// Base64url text of `bytes`, unpadded, as used by the JSON form.
pub fn encode_base64url(bytes: &[u8]) -> String {
    BASE64URL.encode(bytes)
}
