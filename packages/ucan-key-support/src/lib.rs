//! Ready-to-use [KeyMaterial][ucan::crypto::KeyMaterial]
//! implementations for the signature algorithms that UCAN headers
//! name: Ed25519 ("EdDSA") and RSA ("RS256"). Each module exposes a
//! constructor function suitable for registering with a
//! [DidParser][ucan::crypto::did::DidParser].

pub mod ed25519;
pub mod rsa;
