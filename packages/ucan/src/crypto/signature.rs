use strum_macros::{Display, EnumString};

/// The JWT signature algorithms that may appear in the `alg` field of
/// a UCAN header. See: <https://www.rfc-editor.org/rfc/rfc7518> and
/// <https://www.rfc-editor.org/rfc/rfc8037.html#appendix-A.4>
#[derive(Debug, Display, EnumString, Eq, PartialEq)]
pub enum JwtSignatureAlgorithm {
    EdDSA,
    RS256,
}
