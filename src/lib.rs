pub mod attestation;
pub mod authdata;
pub mod cbor;
pub mod cert;
pub mod client_data;
pub mod config;
pub mod cose;
pub mod credential;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod transform;

use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;
use ciborium::value::Value;

use config::InputFormat;
use transform::{ExportAction, Registry};

/// One credential result in its three forms.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    /// As loaded; the source for CBOR round-trip export.
    pub original: Value,
    /// Binary containers decoded, leaf blobs still bytes; the source for
    /// field export.
    pub parsed: Value,
    /// Everything decoded and formatted; the source for display.
    pub prettified: Value,
}

pub fn inspect(original: Value) -> Inspection {
    let parsed = transform::parsed(&original);
    let prettified = transform::prettified(&original);
    Inspection { original, parsed, prettified }
}

pub fn load(path: &Path, format: InputFormat) -> error::Result<Value> {
    let bytes = std::fs::read(path)?;
    let value = match format {
        InputFormat::Json => credential::from_json_slice(&bytes)?,
        InputFormat::Cbor => credential::from_cbor(&bytes)?,
    };
    tracing::debug!(path = %path.display(), ?format, "Loaded credential");
    Ok(value)
}

/// Export one field of a parsed tree. `field` is either a field name (first
/// exportable match, depth-first) or a `/`-separated path.
pub fn export_by_field(parsed: &Value, field: &str, action: ExportAction) -> error::Result<Vec<u8>> {
    let registry = Registry::full();
    let (name, value) = if field.starts_with('/') {
        let value = transform::lookup(parsed, field)
            .ok_or_else(|| error::Error::FieldNotFound(field.to_string()))?;
        let name = field.rsplit('/').find(|s| !s.is_empty()).unwrap_or(field);
        if registry.get(name).is_some_and(|kind| !kind.is_exportable_value(value)) {
            return Err(export::ExportError::MalformedEncoding {
                field: field.to_string(),
                reason: "value is not in an exportable form".into(),
            }
            .into());
        }
        (name, value)
    } else {
        let (path, value) = transform::find_exportable(parsed, &registry, field)
            .ok_or_else(|| error::Error::FieldNotFound(field.to_string()))?;
        tracing::debug!(field, %path, "Resolved field");
        (field, value)
    };
    Ok(export::export_field(name, value, action)?)
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // A subscriber may already be installed when run() is called more than once.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cfg: config::Config) -> anyhow::Result<()> {
    init_logging(cfg.verbose);
    tracing::info!(input = %cfg.input.display(), "Starting credscope");

    diagnostics::check(&cfg)?;

    let original = load(&cfg.input, cfg.format)
        .with_context(|| format!("failed to load {}", cfg.input.display()))?;
    let insp = inspect(original);
    let mut stdout = std::io::stdout().lock();

    if let Some(path) = &cfg.export_cbor {
        let bytes = export::to_cbor(&insp.original)?;
        std::fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), len = bytes.len(), "Wrote CBOR export");
    }

    if let Some(path) = &cfg.export_json {
        let text = export::to_pretty_json(&insp.prettified)?;
        std::fs::write(path, text.as_bytes()).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote JSON export");
    }

    if cfg.list_exports {
        let fields = transform::exportable_fields(&insp.parsed, &Registry::full());
        writeln!(stdout, "{}", serde_json::to_string_pretty(&fields)?)?;
    }

    if let (Some(field), Some(action)) = (&cfg.field, cfg.action) {
        let bytes = export_by_field(&insp.parsed, field, action)?;
        match &cfg.out {
            Some(path) => {
                std::fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
                tracing::info!(field = %field, %action, path = %path.display(), "Exported field");
            }
            None => stdout.write_all(&bytes)?,
        }
    } else if !cfg.quiet && !cfg.list_exports {
        writeln!(stdout, "{}", export::to_pretty_json(&insp.prettified)?)?;
    }

    Ok(())
}
