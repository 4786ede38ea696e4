use std::collections::BTreeMap;

use ciborium::value::Value;
use serde::Serialize;

use crate::cose::jwk;

/// What a rendered field can be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportAction {
    /// The field's raw bytes.
    Download,
    /// Decoded certificate details, one block per certificate.
    View,
    /// PEM text (certificate chain or public key).
    Pem,
    /// The original COSE_Key bytes.
    Cose,
    /// JSON Web Key text.
    Jwk,
}

impl std::fmt::Display for ExportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Download => "download",
            Self::View     => "view",
            Self::Pem      => "pem",
            Self::Cose     => "cose",
            Self::Jwk      => "jwk",
        })
    }
}

/// How a registered field is decoded or formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Hex,
    CertificateChain,
    PublicKey,
    AuthenticatorData,
    AttestationObject,
    ClientData,
}

impl FieldKind {
    /// Pure and total: input that is not in the expected binary shape is
    /// returned unchanged, so an already transformed value is left alone.
    pub fn transform(self, value: &Value) -> Value {
        match (self, value) {
            (Self::Hex, Value::Bytes(b)) => Value::Text(hex::encode(b)),
            (Self::CertificateChain, Value::Array(certs)) => Value::Array(
                certs
                    .iter()
                    .map(|c| match c {
                        Value::Bytes(der) => Value::Text(hex::encode(der)),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            (Self::PublicKey, Value::Bytes(cose)) => jwk::cose_to_jwk(cose).unwrap_or_else(|e| {
                tracing::warn!(len = cose.len(), error = %e, "Public key could not be converted to JWK");
                Value::Text(format!("could not convert public key: {e}"))
            }),
            (Self::AuthenticatorData, Value::Bytes(b)) => crate::authdata::decode_value(b),
            (Self::AttestationObject, Value::Bytes(b)) => crate::attestation::decode_value(b),
            (Self::ClientData, Value::Bytes(b)) => crate::client_data::decode_value(b),
            _ => value.clone(),
        }
    }

    pub fn export_actions(self) -> &'static [ExportAction] {
        use ExportAction::*;
        match self {
            Self::Hex               => &[Download],
            Self::CertificateChain  => &[View, Pem],
            Self::PublicKey         => &[Cose, Jwk, Pem],
            Self::AuthenticatorData
            | Self::AttestationObject
            | Self::ClientData      => &[],
        }
    }

    /// Whether `value` is in the form this field is exported from in a
    /// parsed tree. A base64url SPKI string under `publicKey` is not.
    pub fn is_exportable_value(self, value: &Value) -> bool {
        match self {
            Self::Hex => matches!(value, Value::Bytes(_)),
            Self::CertificateChain => {
                matches!(value, Value::Array(certs) if certs.iter().all(|c| matches!(c, Value::Bytes(_))))
            }
            Self::PublicKey => matches!(value, Value::Bytes(_) | Value::Map(_)),
            Self::AuthenticatorData | Self::AttestationObject | Self::ClientData => false,
        }
    }

    /// Decoders that turn an opaque binary container into a sub-tree, as
    /// opposed to formatters of leaf values.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::AuthenticatorData | Self::AttestationObject | Self::ClientData)
    }
}

const FIELDS: &[(&str, FieldKind)] = &[
    ("rawId",             FieldKind::Hex),
    ("signature",         FieldKind::Hex),
    ("sig",               FieldKind::Hex),
    ("userHandle",        FieldKind::Hex),
    ("x5c",               FieldKind::CertificateChain),
    ("publicKey",         FieldKind::PublicKey),
    ("authenticatorData", FieldKind::AuthenticatorData),
    ("authData",          FieldKind::AuthenticatorData),
    ("attestationObject", FieldKind::AttestationObject),
    ("clientDataJSON",    FieldKind::ClientData),
];

/// Immutable field-name → transform table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<&'static str, FieldKind>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every known field.
    pub fn full() -> Self {
        Self { entries: FIELDS.iter().copied().collect() }
    }

    /// Container decoders only; leaf fields keep their bytes so they can be
    /// exported afterwards.
    pub fn structural() -> Self {
        Self {
            entries: FIELDS.iter().copied().filter(|(_, k)| k.is_structural()).collect(),
        }
    }

    /// The named subset of known fields; unknown names are ignored.
    pub fn only(names: &[&str]) -> Self {
        Self {
            entries: FIELDS
                .iter()
                .copied()
                .filter(|(name, _)| names.contains(name))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<FieldKind> {
        self.entries.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_covers_every_field() {
        let reg = Registry::full();
        assert_eq!(reg.entries.len(), FIELDS.len());
        assert_eq!(reg.get("x5c"), Some(FieldKind::CertificateChain));
        assert_eq!(reg.get("authData"), Some(FieldKind::AuthenticatorData));
        assert_eq!(reg.get("nope"), None);
    }

    #[test]
    fn test_structural_subset() {
        let reg = Registry::structural();
        let names: Vec<_> = reg.entries.keys().copied().collect();
        assert_eq!(
            names,
            vec!["attestationObject", "authData", "authenticatorData", "clientDataJSON"]
        );
    }

    #[test]
    fn test_only_ignores_unknown() {
        let reg = Registry::only(&["x5c", "bogus"]);
        assert_eq!(reg.entries.keys().copied().collect::<Vec<_>>(), vec!["x5c"]);
        assert!(Registry::empty().entries.is_empty());
    }

    #[test]
    fn test_export_actions() {
        assert_eq!(FieldKind::Hex.export_actions(), &[ExportAction::Download]);
        assert_eq!(
            FieldKind::PublicKey.export_actions(),
            &[ExportAction::Cose, ExportAction::Jwk, ExportAction::Pem]
        );
        assert!(FieldKind::ClientData.export_actions().is_empty());
    }

    #[test]
    fn test_exportable_value_shapes() {
        let spki = Value::Text("MFkwEwYHKoZIzj0CAQ".into());
        assert!(!FieldKind::PublicKey.is_exportable_value(&spki));
        assert!(FieldKind::PublicKey.is_exportable_value(&Value::Bytes(vec![0xa5])));
        assert!(FieldKind::PublicKey.is_exportable_value(&Value::Map(vec![])));
        assert!(FieldKind::CertificateChain.is_exportable_value(&Value::Array(vec![Value::Bytes(vec![0x30])])));
        assert!(!FieldKind::CertificateChain.is_exportable_value(&Value::Array(vec![Value::Text("30".into())])));
        assert!(!FieldKind::Hex.is_exportable_value(&Value::Null));
    }

    #[test]
    fn test_hex_passes_through_text() {
        let t = Value::Text("abcd".into());
        assert_eq!(FieldKind::Hex.transform(&t), t);
        assert_eq!(FieldKind::Hex.transform(&Value::Bytes(vec![0xab, 0xcd])), t);
    }

    #[test]
    fn test_public_key_garbage_is_diagnostic() {
        let v = FieldKind::PublicKey.transform(&Value::Bytes(vec![0x01]));
        assert!(matches!(v, Value::Text(s) if s.starts_with("could not convert public key")));
    }

    #[test]
    fn test_action_display_matches_cli_name() {
        use clap::ValueEnum;
        for action in ExportAction::value_variants() {
            let pv = action.to_possible_value().unwrap();
            assert_eq!(pv.get_name(), action.to_string());
        }
    }
}
