#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Input: {0}")]
    Input(#[from] crate::credential::InputError),
    #[error("Export: {0}")]
    Export(#[from] crate::export::ExportError),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("No field {0} in the credential")]
    FieldNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
