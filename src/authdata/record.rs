use ciborium::value::Value;

use super::{AAGUID_LEN, AuthDataError, AuthenticatorFlags, ByteReader, RP_ID_HASH_LEN};
use crate::cbor::text_map;

/// Credential public key as it sits in the attested credential data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoseKeyBytes {
    /// Exactly the bytes the key occupied in the buffer.
    pub raw: Vec<u8>,
    /// The key decoded and re-encoded in shortest form, or why it could not be.
    pub canonical: Result<Vec<u8>, AuthDataError>,
}

impl CoseKeyBytes {
    /// Decode one CBOR value from the front of `reader`, consuming only its bytes.
    /// On a decode failure the whole tail is taken as the key.
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, AuthDataError> {
        let tail = reader.peek_rest();
        let mut cursor = tail;
        match ciborium::from_reader::<Value, _>(&mut cursor) {
            Ok(value) => {
                let used = tail.len() - cursor.len();
                let raw = reader.read_bytes(used)?.to_vec();
                let canonical = crate::cbor::encode(&value).map_err(AuthDataError::MalformedEncoding);
                Ok(Self { raw, canonical })
            }
            Err(e) => {
                let offset = reader.position();
                let raw = reader.read_rest().to_vec();
                tracing::warn!(offset, len = raw.len(), error = %e, "Credential public key is not valid CBOR");
                Ok(Self {
                    raw,
                    canonical: Err(AuthDataError::MalformedEncoding(format!(
                        "credential public key: {e}"
                    ))),
                })
            }
        }
    }

    fn to_value(&self) -> Value {
        match &self.canonical {
            Ok(bytes) => Value::Bytes(bytes.clone()),
            Err(e) => Value::Text(format!("could not decode public key: {e}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestedCredentialData {
    pub aaguid: [u8; AAGUID_LEN],
    pub credential_id: Vec<u8>,
    pub public_key: CoseKeyBytes,
}

impl AttestedCredentialData {
    fn read(reader: &mut ByteReader<'_>) -> Result<Self, AuthDataError> {
        let aaguid = reader.read_array::<AAGUID_LEN>()?;
        let cred_id_len = reader.read_u16_be()? as usize;
        let credential_id = reader.read_bytes(cred_id_len)?.to_vec();
        let public_key = CoseKeyBytes::read(reader)?;
        Ok(Self { aaguid, credential_id, public_key })
    }

    pub fn to_value(&self) -> Value {
        text_map([
            ("aaguid",             Value::Text(hex::encode(self.aaguid))),
            ("credentialIdLength", Value::Integer((self.credential_id.len() as u64).into())),
            ("credentialId",       Value::Text(hex::encode(&self.credential_id))),
            ("publicKey",          self.public_key.to_value()),
        ])
    }
}

/// Decoded authenticator data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorData {
    pub rp_id_hash: [u8; RP_ID_HASH_LEN],
    pub flags: AuthenticatorFlags,
    pub sign_count: u32,
    pub attested: Option<AttestedCredentialData>,
    /// Bytes after the last decoded section. With the ED flag these are the
    /// (undecoded) extensions.
    pub tail: Vec<u8>,
}

/// Header decoded, attested credential data possibly failed.
struct Partial {
    rp_id_hash: [u8; RP_ID_HASH_LEN],
    flags: AuthenticatorFlags,
    sign_count: u32,
    attested: Option<Result<AttestedCredentialData, AuthDataError>>,
    /// `None` when the attested credential data failed and the end of the
    /// decoded sections is unknown.
    tail: Option<Vec<u8>>,
}

fn read_partial(bytes: &[u8]) -> Result<Partial, AuthDataError> {
    let mut reader = ByteReader::new(bytes);
    let rp_id_hash = reader.read_array::<RP_ID_HASH_LEN>()?;
    let flags = AuthenticatorFlags(reader.read_u8()?);
    let sign_count = reader.read_u32_be()?;
    tracing::debug!(flags = %format_args!("{:#04x}", flags.0), sign_count, "Decoded authenticator data header");

    let attested = flags
        .attested_credential_data()
        .then(|| AttestedCredentialData::read(&mut reader));
    let tail = match attested {
        Some(Err(_)) => None,
        _ => Some(reader.read_rest().to_vec()),
    };
    Ok(Partial { rp_id_hash, flags, sign_count, attested, tail })
}

impl AuthenticatorData {
    /// Strict decode: any underrun, including inside the attested credential
    /// data, fails the whole record. A public key that is not valid CBOR does
    /// not; it is kept as raw bytes with the reason attached.
    pub fn parse(bytes: &[u8]) -> Result<Self, AuthDataError> {
        let p = read_partial(bytes)?;
        Ok(Self {
            rp_id_hash: p.rp_id_hash,
            flags: p.flags,
            sign_count: p.sign_count,
            attested: p.attested.transpose()?,
            tail: p.tail.unwrap_or_default(),
        })
    }

    /// Binary layout of this record; inverse of [`AuthenticatorData::parse`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&self.rp_id_hash);
        data.push(self.flags.0);
        data.extend_from_slice(&self.sign_count.to_be_bytes());
        if let Some(acd) = &self.attested {
            data.extend_from_slice(&acd.aaguid);
            data.extend_from_slice(&(acd.credential_id.len() as u16).to_be_bytes());
            data.extend_from_slice(&acd.credential_id);
            data.extend_from_slice(&acd.public_key.raw);
        }
        data.extend_from_slice(&self.tail);
        data
    }

    pub fn to_value(&self) -> Value {
        record_value(
            &self.rp_id_hash,
            self.flags,
            self.sign_count,
            self.attested.as_ref().map(AttestedCredentialData::to_value),
            Some(self.tail.as_slice()),
        )
    }
}

fn record_value(
    rp_id_hash: &[u8],
    flags: AuthenticatorFlags,
    sign_count: u32,
    attested: Option<Value>,
    tail: Option<&[u8]>,
) -> Value {
    let mut entries = vec![
        ("rpIdHash",  Value::Text(hex::encode(rp_id_hash))),
        ("flags",     flags.to_value()),
        ("signCount", Value::Integer(sign_count.into())),
    ];
    if let Some(acd) = attested {
        entries.push(("attestedCredentialData", acd));
    }
    let Some(tail) = tail else {
        return text_map(entries);
    };
    if flags.extension_data_included() {
        entries.push((
            "extensions",
            text_map([
                ("decoded", Value::Bool(false)),
                ("raw",     Value::Text(hex::encode(tail))),
            ]),
        ));
    } else if !tail.is_empty() {
        entries.push(("unparsedTrailingBytes", Value::Text(hex::encode(tail))));
    }
    text_map(entries)
}

/// Tree form of the record. Only a failure in the fixed header is returned;
/// a failure inside the attested credential data replaces that sub-record
/// with a diagnostic string.
pub fn try_decode_value(bytes: &[u8]) -> Result<Value, AuthDataError> {
    let p = read_partial(bytes)?;
    let attested = p.attested.map(|res| match res {
        Ok(acd) => acd.to_value(),
        Err(e) => {
            tracing::warn!(error = %e, "Attested credential data could not be decoded");
            Value::Text(format!("could not parse attested credential data: {e}"))
        }
    });
    Ok(record_value(&p.rp_id_hash, p.flags, p.sign_count, attested, p.tail.as_deref()))
}

/// Like [`try_decode_value`] but never fails: a header failure becomes a
/// single diagnostic string.
pub fn decode_value(bytes: &[u8]) -> Value {
    try_decode_value(bytes).unwrap_or_else(|e| {
        tracing::warn!(len = bytes.len(), error = %e, "Authenticator data header could not be decoded");
        Value::Text(format!("could not parse authenticator data: {e}"))
    })
}
