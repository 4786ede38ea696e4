use ciborium::value::Value;
use serde::Serialize;

use super::registry::{ExportAction, Registry};

/// Rebuild `tree` with every registered key's value replaced by its
/// transform. Recursion continues into whatever map or array ends up under a
/// key, transformed or not; scalars (including hex strings and bytes) end it.
/// The input is never modified.
pub fn transform(tree: &Value, registry: &Registry) -> Value {
    match tree {
        Value::Map(entries) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| {
                    let kind = match k {
                        Value::Text(name) => registry.get(name),
                        _ => None,
                    };
                    let v = match kind {
                        Some(kind) => transform(&kind.transform(v), registry),
                        None => transform(v, registry),
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| transform(v, registry)).collect()),
        Value::Tag(tag, inner) => Value::Tag(*tag, Box::new(transform(inner, registry))),
        scalar => scalar.clone(),
    }
}

/// A registered field found in a tree, with the exports it allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportableField {
    pub path: String,
    pub field: String,
    pub actions: Vec<ExportAction>,
}

fn push_segment(path: &str, segment: &str) -> String {
    format!("{path}/{segment}")
}

/// Every registered field with at least one export action whose value is in
/// an exportable form, depth-first in tree order. Paths are `/`-separated map
/// keys and array indexes.
pub fn exportable_fields(tree: &Value, registry: &Registry) -> Vec<ExportableField> {
    let mut out = Vec::new();
    collect_exportable(tree, registry, "", &mut out);
    out
}

fn collect_exportable(tree: &Value, registry: &Registry, path: &str, out: &mut Vec<ExportableField>) {
    match tree {
        Value::Map(entries) => {
            for (k, v) in entries {
                let Some(name) = key_segment(k) else { continue };
                let here = push_segment(path, &name);
                if let Some(kind) = registry.get(&name) {
                    let actions = kind.export_actions();
                    if !actions.is_empty() && kind.is_exportable_value(v) {
                        out.push(ExportableField {
                            path: here.clone(),
                            field: name.clone(),
                            actions: actions.to_vec(),
                        });
                    }
                }
                collect_exportable(v, registry, &here, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                collect_exportable(v, registry, &push_segment(path, &i.to_string()), out);
            }
        }
        Value::Tag(_, inner) => collect_exportable(inner, registry, path, out),
        _ => {}
    }
}

fn key_segment(k: &Value) -> Option<String> {
    match k {
        Value::Text(s) => Some(s.clone()),
        Value::Integer(i) => Some(i128::from(*i).to_string()),
        _ => None,
    }
}

/// Resolve a `/`-separated path produced by [`exportable_fields`].
pub fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .try_fold(tree, |node, segment| match node {
            Value::Map(entries) => entries
                .iter()
                .find(|(k, _)| key_segment(k).as_deref() == Some(segment))
                .map(|(_, v)| v),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Tag(_, inner) => lookup(inner, segment),
            _ => None,
        })
}

/// First value stored under `name`, depth-first, with its path.
pub fn find_first<'a>(tree: &'a Value, name: &str) -> Option<(String, &'a Value)> {
    find_in(tree, name, "", &|_| true)
}

/// Like [`find_first`], but a registered field is only matched where its
/// value is in an exportable form.
pub fn find_exportable<'a>(tree: &'a Value, registry: &Registry, name: &str) -> Option<(String, &'a Value)> {
    let kind = registry.get(name);
    find_in(tree, name, "", &|v| kind.is_none_or(|k| k.is_exportable_value(v)))
}

fn find_in<'a>(
    tree: &'a Value,
    name: &str,
    path: &str,
    accept: &dyn Fn(&Value) -> bool,
) -> Option<(String, &'a Value)> {
    match tree {
        Value::Map(entries) => entries.iter().find_map(|(k, v)| {
            let seg = key_segment(k)?;
            let here = push_segment(path, &seg);
            if seg == name && accept(v) {
                Some((here, v))
            } else {
                find_in(v, name, &here, accept)
            }
        }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, v)| find_in(v, name, &push_segment(path, &i.to_string()), accept)),
        Value::Tag(_, inner) => find_in(inner, name, path, accept),
        _ => None,
    }
}
