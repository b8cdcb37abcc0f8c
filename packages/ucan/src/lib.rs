//! UCANs are chainable, signed capability tokens based on
//! [JSON Web Tokens][JWT docs]. A principal issues a token delegating
//! a subset of its authority to an audience; the audience can extend
//! the chain by issuing further attenuated tokens that reference their
//! proofs by CID. Visit [https://ucan.xyz][UCAN docs] for an
//! introduction.
//!
//! Use the [`builder::UcanBuilder`] to construct and sign tokens with
//! any [`crypto::KeyMaterial`] implementation:
//!
//! ```rust,ignore
//! use ucan::{builder::UcanBuilder, crypto::KeyMaterial};
//!
//! fn generate_token<K: KeyMaterial>(issuer_key: &K, audience_did: &str) -> Result<String, anyhow::Error> {
//!     UcanBuilder::default()
//!         .issued_by(issuer_key)
//!         .for_audience(audience_did)
//!         .with_lifetime(60)
//!         .build()?
//!         .sign()?
//!         .encode()
//! }
//! ```
//!
//! To interpret the capabilities a token grants, resolve its proofs
//! into a [`chain::ProofChain`] and reduce it under the capability
//! semantics of your application domain; see the [`capability`] module
//! for defining domain semantics. Key support is brought by the
//! embedder via a [`crypto::did::DidParser`] so that this library can
//! remain agnostic of backing key implementations.
//!
//! [JWT docs]: https://jwt.io/
//! [UCAN docs]: https://ucan.xyz/

pub mod builder;
pub mod capability;
pub mod chain;
pub mod crypto;
pub mod error;
pub mod serde;
pub mod store;
pub mod time;
pub mod ucan;

pub use self::ucan::Ucan;

#[cfg(test)]
mod tests;
