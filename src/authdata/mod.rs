pub mod flags;
pub mod reader;
pub mod record;

pub use flags::AuthenticatorFlags;
pub use reader::ByteReader;
pub use record::{AttestedCredentialData, AuthenticatorData, CoseKeyBytes, decode_value, try_decode_value};

pub const RP_ID_HASH_LEN: usize = 32;
pub const AAGUID_LEN: usize = 16;
/// rpIdHash + flags + signCount.
pub const HEADER_LEN: usize = RP_ID_HASH_LEN + 1 + 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthDataError {
    #[error("buffer underrun at offset {offset}: needed {needed} byte(s), {remaining} remaining")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),
}
