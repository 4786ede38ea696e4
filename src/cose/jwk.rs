use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ciborium::value::Value;

use super::{CoseError, CoseKey, alg_name, curve_name};
use crate::cbor::text_map;

fn b64(bytes: &[u8]) -> Value {
    Value::Text(URL_SAFE_NO_PAD.encode(bytes))
}

/// RFC 7517 JSON Web Key for a COSE public key, as a text-keyed map.
pub fn to_jwk(key: &CoseKey) -> Result<Value, CoseError> {
    let mut entries = match key {
        CoseKey::Ec2 { crv, x, y, .. } => {
            let crv = curve_name(*crv).ok_or(CoseError::UnsupportedCurve(*crv))?;
            vec![
                ("kty", Value::Text("EC".into())),
                ("crv", Value::Text(crv.into())),
                ("x", b64(x)),
                ("y", b64(y)),
            ]
        }
        CoseKey::Okp { crv, x, .. } => {
            let crv = curve_name(*crv).ok_or(CoseError::UnsupportedCurve(*crv))?;
            vec![
                ("kty", Value::Text("OKP".into())),
                ("crv", Value::Text(crv.into())),
                ("x", b64(x)),
            ]
        }
        CoseKey::Rsa { n, e, .. } => vec![
            ("kty", Value::Text("RSA".into())),
            ("n", b64(n)),
            ("e", b64(e)),
        ],
    };
    if let Some(name) = key.alg().and_then(alg_name) {
        entries.push(("alg", Value::Text(name.into())));
    }
    Ok(text_map(entries))
}

/// COSE bytes straight to a JWK map.
pub fn cose_to_jwk(bytes: &[u8]) -> Result<Value, CoseError> {
    to_jwk(&CoseKey::from_cbor(bytes)?)
}

/// JWK as pretty JSON text.
pub fn cose_to_jwk_json(bytes: &[u8]) -> Result<String, CoseError> {
    let jwk = crate::cbor::to_json(&cose_to_jwk(bytes)?);
    serde_json::to_string_pretty(&jwk).map_err(|e| CoseError::InvalidKey(e.to_string()))
}
