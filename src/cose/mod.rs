//! COSE_Key (RFC 9052 §7) public keys as found in attested credential data.

pub mod jwk;
pub mod pem;

use ciborium::value::Value;

use crate::cbor::{cbor_bytes, cbor_get, cbor_int, cbor_map};

pub const LABEL_KTY: i64 = 1;
pub const LABEL_ALG: i64 = 3;
pub const LABEL_CRV: i64 = -1;
pub const LABEL_X: i64 = -2;
pub const LABEL_Y: i64 = -3;
pub const LABEL_RSA_N: i64 = -1;
pub const LABEL_RSA_E: i64 = -2;

pub const KTY_OKP: i64 = 1;
pub const KTY_EC2: i64 = 2;
pub const KTY_RSA: i64 = 3;

pub const CRV_P256: i64 = 1;
pub const CRV_P384: i64 = 2;
pub const CRV_P521: i64 = 3;
pub const CRV_X25519: i64 = 4;
pub const CRV_X448: i64 = 5;
pub const CRV_ED25519: i64 = 6;
pub const CRV_ED448: i64 = 7;
pub const CRV_SECP256K1: i64 = 8;

#[derive(Debug, thiserror::Error)]
pub enum CoseError {
    #[error("cbor: {0}")]
    Cbor(String),
    #[error("COSE key is not a map")]
    NotAMap,
    #[error("missing COSE key parameter {0}")]
    MissingParameter(&'static str),
    #[error("unsupported COSE key type {0}")]
    UnsupportedKeyType(i64),
    #[error("unsupported COSE curve {0}")]
    UnsupportedCurve(i64),
    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoseKey {
    Ec2 { alg: Option<i64>, crv: i64, x: Vec<u8>, y: Vec<u8> },
    Okp { alg: Option<i64>, crv: i64, x: Vec<u8> },
    Rsa { alg: Option<i64>, n: Vec<u8>, e: Vec<u8> },
}

impl CoseKey {
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, CoseError> {
        let value = crate::cbor::decode(bytes).map_err(CoseError::Cbor)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, CoseError> {
        let map = cbor_map(value).ok_or(CoseError::NotAMap)?;
        let int = |label, name| cbor_get(map, label).and_then(cbor_int).ok_or(CoseError::MissingParameter(name));
        let bytes = |label, name| {
            cbor_get(map, label)
                .and_then(cbor_bytes)
                .map(<[u8]>::to_vec)
                .ok_or(CoseError::MissingParameter(name))
        };

        let kty = int(LABEL_KTY, "kty")?;
        let alg = cbor_get(map, LABEL_ALG).and_then(cbor_int);
        match kty {
            KTY_EC2 => Ok(CoseKey::Ec2 {
                alg,
                crv: int(LABEL_CRV, "crv")?,
                x: bytes(LABEL_X, "x")?,
                y: bytes(LABEL_Y, "y")?,
            }),
            KTY_OKP => Ok(CoseKey::Okp {
                alg,
                crv: int(LABEL_CRV, "crv")?,
                x: bytes(LABEL_X, "x")?,
            }),
            KTY_RSA => Ok(CoseKey::Rsa {
                alg,
                n: bytes(LABEL_RSA_N, "n")?,
                e: bytes(LABEL_RSA_E, "e")?,
            }),
            other => Err(CoseError::UnsupportedKeyType(other)),
        }
    }

    pub fn alg(&self) -> Option<i64> {
        match self {
            CoseKey::Ec2 { alg, .. } | CoseKey::Okp { alg, .. } | CoseKey::Rsa { alg, .. } => *alg,
        }
    }
}

/// JOSE name for a COSE algorithm identifier (IANA COSE Algorithms registry).
pub fn alg_name(alg: i64) -> Option<&'static str> {
    Some(match alg {
        -7 => "ES256",
        -35 => "ES384",
        -36 => "ES512",
        -47 => "ES256K",
        -8 => "EdDSA",
        -37 => "PS256",
        -38 => "PS384",
        -39 => "PS512",
        -257 => "RS256",
        -258 => "RS384",
        -259 => "RS512",
        -65535 => "RS1",
        _ => return None,
    })
}

pub fn curve_name(crv: i64) -> Option<&'static str> {
    Some(match crv {
        CRV_P256 => "P-256",
        CRV_P384 => "P-384",
        CRV_P521 => "P-521",
        CRV_X25519 => "X25519",
        CRV_X448 => "X448",
        CRV_ED25519 => "Ed25519",
        CRV_ED448 => "Ed448",
        CRV_SECP256K1 => "secp256k1",
        _ => return None,
    })
}
