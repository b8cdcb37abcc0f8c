use crate::{
    capability::{proof::ProofDelegationSemantics, Capability, CapabilitySemantics},
    crypto::KeyMaterial,
    serde::{multibase_b64url_encode, Base64Encode},
    time::now,
    ucan::{Code, FactsMap, Ucan, UcanHeader, UcanPayload, UCAN_VERSION},
};
use anyhow::{anyhow, Result};
use log::warn;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

/// A UCAN that has all the state it needs in order to be signed, but
/// has not been signed yet. Useful for bespoke signing flows where the
/// unsigned artifact travels elsewhere before signing.
pub struct Signable<'a, K>
where
    K: KeyMaterial,
{
    pub issuer: &'a K,
    pub audience: String,

    pub capabilities: Vec<Capability>,

    pub expiration: Option<u64>,
    pub not_before: Option<u64>,

    pub facts: FactsMap,
    pub proofs: Vec<String>,
    pub add_nonce: bool,
}

impl<'a, K> Signable<'a, K>
where
    K: KeyMaterial,
{
    /// The header field components of the UCAN JWT
    pub fn ucan_header(&self) -> UcanHeader {
        UcanHeader {
            alg: self.issuer.get_jwt_algorithm_name(),
            typ: "JWT".into(),
        }
    }

    /// The payload field components of the UCAN JWT
    pub fn ucan_payload(&self) -> Result<UcanPayload> {
        let nonce = self
            .add_nonce
            .then(|| multibase_b64url_encode(&rand::thread_rng().gen::<[u8; 32]>()));

        let facts = match self.facts.is_empty() {
            true => None,
            false => Some(self.facts.clone()),
        };

        let proofs = match self.proofs.is_empty() {
            true => None,
            false => Some(self.proofs.clone()),
        };

        Ok(UcanPayload {
            ucv: UCAN_VERSION.into(),
            iss: self.issuer.get_did()?,
            aud: self.audience.clone(),
            exp: self.expiration,
            nbf: self.not_before,
            nnc: nonce,
            caps: self.capabilities.clone().try_into()?,
            fct: facts,
            prf: proofs,
        })
    }

    /// Produces a [Ucan], with finalized fields and signed data
    /// suitable for encoding as a JWT token string
    pub fn sign(&self) -> Result<Ucan> {
        let header = self.ucan_header();
        let payload = self.ucan_payload()?;

        let header_base64 = header.jwt_base64_encode()?;
        let payload_base64 = payload.jwt_base64_encode()?;

        let data_to_sign = format!("{header_base64}.{payload_base64}").into_bytes();
        let signature = self.issuer.sign(&data_to_sign)?;

        Ok(Ucan::new(header, payload, data_to_sign, signature))
    }
}

/// A builder API for UCAN tokens
#[derive(Clone)]
pub struct UcanBuilder<'a, K>
where
    K: KeyMaterial,
{
    issuer: Option<&'a K>,
    audience: Option<String>,

    capabilities: Vec<Capability>,

    lifetime: Option<u64>,
    expiration: Option<u64>,
    not_before: Option<u64>,

    facts: FactsMap,
    proofs: Vec<String>,
    add_nonce: bool,
}

impl<'a, K> Default for UcanBuilder<'a, K>
where
    K: KeyMaterial,
{
    /// Create an empty builder. Before finalizing, you need to at
    /// least call `issued_by` and `for_audience`. A builder with
    /// neither `with_lifetime` nor `with_expiration` produces a token
    /// that never expires.
    fn default() -> Self {
        UcanBuilder {
            issuer: None,
            audience: None,

            capabilities: Vec::new(),

            lifetime: None,
            expiration: None,
            not_before: None,

            facts: BTreeMap::new(),
            proofs: Vec::new(),
            add_nonce: false,
        }
    }
}

impl<'a, K> UcanBuilder<'a, K>
where
    K: KeyMaterial,
{
    /// The UCAN must be signed with the private key of the issuer to
    /// be valid.
    pub fn issued_by(mut self, issuer: &'a K) -> Self {
        self.issuer = Some(issuer);
        self
    }

    /// This is the identity this UCAN transfers rights to. It could be
    /// the DID of a service you are presenting this UCAN to, or the
    /// DID of something that will use it as a proof to continue the
    /// chain as an issuer.
    pub fn for_audience(mut self, audience: &str) -> Self {
        self.audience = Some(String::from(audience));
        self
    }

    /// The number of seconds into the future (relative to when build()
    /// is invoked) to set the expiration. Ignored if an explicit
    /// expiration is set.
    pub fn with_lifetime(mut self, seconds: u64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    /// Set the POSIX timestamp (in seconds) at which the UCAN expires.
    /// Overrides a configured lifetime.
    pub fn with_expiration(mut self, timestamp: u64) -> Self {
        self.expiration = Some(timestamp);
        self
    }

    /// Set the POSIX timestamp (in seconds) of when the UCAN becomes
    /// active.
    pub fn not_before(mut self, timestamp: u64) -> Self {
        self.not_before = Some(timestamp);
        self
    }

    /// Add a fact or proof of knowledge to this UCAN.
    pub fn with_fact<T: Serialize>(mut self, key: &str, fact: T) -> Self {
        match serde_json::to_value(fact) {
            Ok(value) => {
                self.facts.insert(key.to_owned(), value);
            }
            Err(error) => warn!("Could not add fact to UCAN: {}", error),
        }
        self
    }

    /// Will ensure that the built UCAN includes a number used once.
    pub fn with_nonce(mut self) -> Self {
        self.add_nonce = true;
        self
    }

    /// Includes a UCAN in the list of proofs for the UCAN to be built.
    /// Note that the proof's audience must match this UCAN's issuer or
    /// else the proof chain will be invalidated! The proof is
    /// referenced by a CID using the default hasher unless one is
    /// provided.
    pub fn witnessed_by(mut self, authority: &Ucan, hasher: Option<Code>) -> Result<Self> {
        match authority.to_cid(hasher) {
            Ok((cid, _)) => {
                self.proofs.push(cid.to_string());
                Ok(self)
            }
            Err(error) => Err(anyhow!("Failed to add authority to proofs: {}", error)),
        }
    }

    /// Claim a capability by inheritance (from an authorizing proof)
    /// or implicitly by ownership of the resource by this UCAN's
    /// issuer
    pub fn claiming_capability<C>(mut self, capability: C) -> Self
    where
        C: Into<Capability>,
    {
        self.capabilities.push(capability.into());
        self
    }

    /// Claim capabilities by inheritance (from an authorizing proof)
    /// or implicitly by ownership of the resources by this UCAN's
    /// issuer
    pub fn claiming_capabilities<C>(mut self, capabilities: &[C]) -> Self
    where
        C: Into<Capability> + Clone,
    {
        for capability in capabilities {
            self.capabilities.push(capability.clone().into());
        }
        self
    }

    /// Delegate all capabilities from a given proof to the audience of
    /// the UCAN you're building: the proof is added to the proof list
    /// and a `prf:<index> / ucan/DELEGATE` capability is claimed over
    /// it.
    pub fn delegating_from(mut self, authority: &Ucan, hasher: Option<Code>) -> Result<Self> {
        let (cid, _) = authority
            .to_cid(hasher)
            .map_err(|error| anyhow!("Could not encode authoritative UCAN: {}", error))?;

        self.proofs.push(cid.to_string());
        let index = self.proofs.len() - 1;

        let capability = ProofDelegationSemantics {}
            .parse(&format!("prf:{index}"), "ucan/DELEGATE", None)
            .map_err(|error| anyhow!("Could not produce delegation capability: {}", error))?;
        self.capabilities.push(Capability::from(&capability));

        Ok(self)
    }

    fn implied_expiration(&self) -> Option<u64> {
        if self.expiration.is_some() {
            self.expiration
        } else {
            self.lifetime.map(|lifetime| now() + lifetime)
        }
    }

    pub fn build(self) -> Result<Signable<'a, K>> {
        match &self.issuer {
            Some(issuer) => match &self.audience {
                Some(audience) => Ok(Signable {
                    issuer,
                    audience: audience.clone(),
                    not_before: self.not_before,
                    expiration: self.implied_expiration(),
                    facts: self.facts.clone(),
                    capabilities: self.capabilities.clone(),
                    proofs: self.proofs.clone(),
                    add_nonce: self.add_nonce,
                }),
                None => Err(anyhow!("Missing audience")),
            },
            None => Err(anyhow!("Missing issuer")),
        }
    }
}
