pub mod registry;
pub mod walk;

use ciborium::value::Value;

pub use registry::{ExportAction, FieldKind, Registry};
pub use walk::{ExportableField, exportable_fields, find_exportable, find_first, lookup, transform};

/// Copy with binary containers (attestation object, authenticator data,
/// client data) decoded but leaf blobs kept as bytes, for field export.
pub fn parsed(tree: &Value) -> Value {
    transform(tree, &Registry::structural())
}

/// Copy with every registered field decoded or formatted, for display.
pub fn prettified(tree: &Value) -> Value {
    transform(tree, &Registry::full())
}
