use p256::pkcs8::{EncodePublicKey, LineEnding};

use super::{CRV_ED25519, CRV_P256, CoseError, CoseKey};

/// SubjectPublicKeyInfo header for an Ed25519 key (RFC 8410 §4); the 32-byte
/// key follows.
const ED25519_SPKI_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// `-----BEGIN PUBLIC KEY-----` SubjectPublicKeyInfo PEM. P-256 and Ed25519 only.
pub fn to_pem(key: &CoseKey) -> Result<String, CoseError> {
    match key {
        CoseKey::Ec2 { crv: CRV_P256, x, y, .. } => {
            let mut sec1 = Vec::with_capacity(1 + x.len() + y.len());
            sec1.push(0x04);
            sec1.extend_from_slice(x);
            sec1.extend_from_slice(y);
            let pk = p256::PublicKey::from_sec1_bytes(&sec1)
                .map_err(|e| CoseError::InvalidKey(format!("P-256 point: {e}")))?;
            pk.to_public_key_pem(LineEnding::LF)
                .map_err(|e| CoseError::InvalidKey(e.to_string()))
        }
        CoseKey::Okp { crv: CRV_ED25519, x, .. } => {
            if x.len() != 32 {
                return Err(CoseError::InvalidKey(format!("Ed25519 key is {} bytes", x.len())));
            }
            let mut der = ED25519_SPKI_PREFIX.to_vec();
            der.extend_from_slice(x);
            pem_rfc7468::encode_string("PUBLIC KEY", LineEnding::LF, &der)
                .map_err(|e| CoseError::InvalidKey(e.to_string()))
        }
        CoseKey::Ec2 { crv, .. } | CoseKey::Okp { crv, .. } => Err(CoseError::UnsupportedCurve(*crv)),
        CoseKey::Rsa { .. } => Err(CoseError::UnsupportedKeyType(super::KTY_RSA)),
    }
}

pub fn cose_to_pem(bytes: &[u8]) -> Result<String, CoseError> {
    to_pem(&CoseKey::from_cbor(bytes)?)
}
