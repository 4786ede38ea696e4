use ciborium::value::Value;

#[derive(Debug, thiserror::Error)]
pub enum ClientDataError {
    #[error("not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("not JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// clientDataJSON bytes as a structured value.
pub fn try_decode(bytes: &[u8]) -> Result<Value, ClientDataError> {
    let text = std::str::from_utf8(bytes)?;
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(crate::cbor::from_json(&json))
}

pub fn decode_value(bytes: &[u8]) -> Value {
    try_decode(bytes).unwrap_or_else(|e| {
        tracing::warn!(len = bytes.len(), error = %e, "Client data could not be decoded");
        Value::Text(format!("could not parse client data: {e}"))
    })
}
