use std::path::PathBuf;

use crate::transform::ExportAction;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// WebAuthn JSON (`PublicKeyCredential.toJSON()`), binary members base64url.
    #[default]
    Json,
    /// A credential previously written with --export-cbor.
    Cbor,
}

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "credscope", version, about)]
pub struct Config {
    /// Credential result to inspect.
    pub input: PathBuf,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(long, value_enum, default_value_t = InputFormat::Json)]
    pub format: InputFormat,
    /// Write the untransformed credential as CBOR.
    #[arg(long)]
    pub export_cbor: Option<PathBuf>,
    /// Write the decoded credential as pretty JSON.
    #[arg(long)]
    pub export_json: Option<PathBuf>,
    /// Field name (first match) or /-separated path to export.
    #[arg(long, requires = "action")]
    pub field: Option<String>,
    #[arg(long, value_enum, requires = "field")]
    pub action: Option<ExportAction>,
    /// Destination for --field; text exports go to stdout without it.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// List exportable fields and their actions as JSON.
    #[arg(long)]
    pub list_exports: bool,
    /// Do not print the decoded credential.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            verbose: 0,
            format: InputFormat::Json,
            export_cbor: None,
            export_json: None,
            field: None,
            action: None,
            out: None,
            list_exports: false,
            quiet: false,
        }
    }

    /// Outputs the run will write to, for preflight checks.
    pub fn output_paths(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.export_cbor, &self.export_json, &self.out]
            .into_iter()
            .flatten()
    }
}
