use ciborium::value::Value;

// Lookup helpers over decoded CBOR maps. Maps stay as ordered pair lists so
// that traversal and re-encoding preserve the producer's key order.

pub fn decode(data: &[u8]) -> Result<Value, String> {
    ciborium::from_reader(data).map_err(|e| e.to_string())
}

pub fn encode(value: &Value) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| e.to_string())?;
    Ok(buf)
}

pub fn cbor_get(map: &[(Value, Value)], key: i64) -> Option<&Value> {
    let target = Value::Integer(key.into());
    map.iter().find(|(k, _)| k == &target).map(|(_, v)| v)
}

pub fn cbor_get_str<'a>(map: &'a [(Value, Value)], key: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(k, _)| matches!(k, Value::Text(s) if s == key))
        .map(|(_, v)| v)
}

pub fn cbor_bytes(v: &Value) -> Option<&[u8]> {
    match v { Value::Bytes(b) => Some(b), _ => None }
}

pub fn cbor_text(v: &Value) -> Option<&str> {
    match v { Value::Text(s) => Some(s), _ => None }
}

pub fn cbor_int(v: &Value) -> Option<i64> {
    match v { Value::Integer(i) => i64::try_from(i128::from(*i)).ok(), _ => None }
}

pub fn cbor_map(v: &Value) -> Option<&[(Value, Value)]> {
    match v { Value::Map(m) => Some(m), _ => None }
}

pub fn text_key(key: &str) -> Value {
    Value::Text(key.to_string())
}

/// Builds a text-keyed map in the given order.
pub fn text_map<I>(entries: I) -> Value
where
    I: IntoIterator<Item = (&'static str, Value)>,
{
    Value::Map(entries.into_iter().map(|(k, v)| (text_key(k), v)).collect())
}

/// Tree form used for display: byte strings become lowercase hex, non-text
/// keys are stringified and tags are unwrapped.
pub fn to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;
    match value {
        Value::Integer(i) => {
            let n = i128::from(*i);
            match i64::try_from(n) {
                Ok(n) => Json::from(n),
                Err(_) => match u64::try_from(n) {
                    Ok(n) => Json::from(n),
                    Err(_) => Json::String(n.to_string()),
                },
            }
        }
        Value::Bytes(b) => Json::String(hex::encode(b)),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or_else(|| Json::String(f.to_string())),
        Value::Text(s) => Json::String(s.clone()),
        Value::Bool(b) => Json::Bool(*b),
        Value::Null => Json::Null,
        Value::Tag(_, inner) => to_json(inner),
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(k, v)| (key_to_string(k), to_json(v)))
                .collect(),
        ),
        _ => Json::Null,
    }
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::Text(s) => s.clone(),
        Value::Integer(i) => i128::from(*i).to_string(),
        Value::Bytes(b) => hex::encode(b),
        Value::Bool(b) => b.to_string(),
        other => to_json(other).to_string(),
    }
}

/// Inverse of the JSON input path: JSON scalars and containers as CBOR.
pub fn from_json(value: &serde_json::Value) -> Value {
    use serde_json::Value as Json;
    match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Integer(u.into())
            } else {
                Value::Float(n.as_f64().unwrap_or_default())
            }
        }
        Json::String(s) => Value::Text(s.clone()),
        Json::Array(items) => Value::Array(items.iter().map(from_json).collect()),
        Json::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (text_key(k), from_json(v)))
                .collect(),
        ),
    }
}
