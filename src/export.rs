use ciborium::value::Value;

use crate::cose::{self, CoseError};
use crate::transform::{ExportAction, FieldKind, Registry};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{0} is not an exportable field")]
    UnsupportedField(String),
    #[error("{action} is not available for {field}")]
    UnsupportedAction { field: String, action: ExportAction },
    #[error("malformed {field}: {reason}")]
    MalformedEncoding { field: String, reason: String },
    #[error("public key: {0}")]
    Key(#[from] CoseError),
    #[error("cbor: {0}")]
    Cbor(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// CBOR encoding of an untransformed tree.
pub fn to_cbor(tree: &Value) -> Result<Vec<u8>, ExportError> {
    crate::cbor::encode(tree).map_err(ExportError::Cbor)
}

pub fn from_cbor(bytes: &[u8]) -> Result<Value, ExportError> {
    crate::cbor::decode(bytes).map_err(ExportError::Cbor)
}

/// Pretty JSON text of a tree. Remaining byte strings (certificates, COSE
/// keys in a parsed copy) are written as hex.
pub fn to_pretty_json(tree: &Value) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&crate::cbor::to_json(tree))?)
}

fn malformed(field: &str, reason: impl Into<String>) -> ExportError {
    ExportError::MalformedEncoding { field: field.to_string(), reason: reason.into() }
}

/// Raw bytes of a binary-origin value, either still bytes or rendered as hex.
fn binary(field: &str, value: &Value) -> Result<Vec<u8>, ExportError> {
    match value {
        Value::Bytes(b) => Ok(b.clone()),
        Value::Text(s) => hex::decode(s).map_err(|e| malformed(field, format!("not hex: {e}"))),
        _ => Err(malformed(field, "expected bytes")),
    }
}

fn certificates(field: &str, value: &Value) -> Result<Vec<Vec<u8>>, ExportError> {
    let Value::Array(items) = value else {
        return Err(malformed(field, "expected a certificate array"));
    };
    items.iter().map(|c| binary(field, c)).collect()
}

fn describe_chain(chain: &[Vec<u8>]) -> String {
    chain
        .iter()
        .enumerate()
        .map(|(i, der)| format!("Certificate #{}\n{}", i + 1, crate::cert::describe(der)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Exportable bytes for one field value (as found in a parsed or prettified
/// copy) and the action invoked on it.
pub fn export_field(field: &str, value: &Value, action: ExportAction) -> Result<Vec<u8>, ExportError> {
    let kind = Registry::full()
        .get(field)
        .ok_or_else(|| ExportError::UnsupportedField(field.to_string()))?;
    if !kind.export_actions().contains(&action) {
        return Err(ExportError::UnsupportedAction { field: field.to_string(), action });
    }

    let out = match (kind, action) {
        (FieldKind::Hex, ExportAction::Download) => binary(field, value)?,
        (FieldKind::CertificateChain, ExportAction::View) => {
            describe_chain(&certificates(field, value)?).into_bytes()
        }
        (FieldKind::CertificateChain, ExportAction::Pem) => {
            let chain = certificates(field, value)?;
            crate::cert::chain_to_pem(chain.iter().map(Vec::as_slice))
                .map_err(|e| malformed(field, e.to_string()))?
                .into_bytes()
        }
        (FieldKind::PublicKey, ExportAction::Jwk) if matches!(value, Value::Map(_)) => {
            to_pretty_json(value)?.into_bytes()
        }
        (FieldKind::PublicKey, ExportAction::Cose | ExportAction::Pem) if matches!(value, Value::Map(_)) => {
            return Err(malformed(field, "original COSE key bytes are not available in a prettified tree"));
        }
        (FieldKind::PublicKey, ExportAction::Cose) => binary(field, value)?,
        (FieldKind::PublicKey, ExportAction::Jwk) => {
            cose::jwk::cose_to_jwk_json(&binary(field, value)?)?.into_bytes()
        }
        (FieldKind::PublicKey, ExportAction::Pem) => {
            cose::pem::cose_to_pem(&binary(field, value)?)?.into_bytes()
        }
        _ => return Err(ExportError::UnsupportedAction { field: field.to_string(), action }),
    };
    tracing::debug!(field, %action, len = out.len(), "Exported field");
    Ok(out)
}
