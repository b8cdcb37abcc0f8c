use thiserror::Error;

/// Errors produced while decoding, validating, persisting or chaining
/// UCAN tokens. All of these abort the operation that raised them.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum UcanError {
    #[error("Invalid UCAN format: {0}")]
    InvalidFormat(String),

    #[error("Invalid base64url multibase encoding: {0}")]
    InvalidEncoding(String),

    #[error("Expired")]
    Expired,

    #[error("Not active yet (too early)")]
    NotActive,

    #[error("Signature could not be verified: {0}")]
    SignatureInvalid(String),

    #[error("Invalid UCAN link: {0}")]
    InvalidUcanLink(String),

    #[error("Invalid redelegation: proof index {index} out of range for {proof_count} proofs")]
    InvalidRedelegation { index: usize, proof_count: usize },

    #[error("No UCAN found in store for CID {0}")]
    StoreMiss(String),

    #[error("Unsupported key algorithm for multicodec {0:#x}")]
    UnsupportedAlgorithm(u64),
}

/// Errors produced while interpreting a capability under a particular
/// semantics. `TypeMismatch` means the capability belongs to some other
/// family and is recoverable: the proof chain reducer and the
/// delegation scanner skip such capabilities rather than failing.
/// The remaining variants are fatal.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum CapabilityParseError {
    #[error("Capability is not addressed by these semantics: {0}")]
    TypeMismatch(String),

    #[error("Not a valid resource URI: {0}")]
    InvalidUri(String),

    #[error("Caveat must be a JSON object, got: {0}")]
    InvalidCaveat(String),
}
