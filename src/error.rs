use thiserror::Error;

/// Errors surfaced by the NTRUEncrypt operations.
///
/// `DecryptionFailure` is deliberately vague: the Dm0 check, the message
/// format check and the R-consistency check all collapse into it so that a
/// caller (or an attacker) cannot tell which one tripped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported parameter set")]
    UnsupportedParameterSet,

    #[error("message too long for chosen parameter set")]
    MessageTooLong,

    #[error("invalid key")]
    InvalidKey,

    #[error("malformed {0} blob")]
    MalformedBlob(&'static str),

    #[error("decryption error")]
    DecryptionFailure,

    #[error("byte source exhausted")]
    SourceExhausted,
}
