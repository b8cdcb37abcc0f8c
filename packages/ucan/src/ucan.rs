use crate::{
    capability::Capabilities,
    crypto::did::DidParser,
    error::UcanError,
    serde::{multibase_b64url_decode, multibase_b64url_encode, Base64Encode},
    time::now,
};
use anyhow::Result;
use cid::Cid;
use multihash_codetable::MultihashDigest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, str::FromStr};

pub use multihash_codetable::Code;

/// The version string stamped into the `ucv` field of tokens produced
/// here. Any version is accepted on decode.
pub const UCAN_VERSION: &str = "0.10.0-dev";

/// Multicodec value of the `raw` codec, the only codec UCAN CIDs use.
pub const RAW_CODEC: u64 = 0x55;

pub type FactsMap = BTreeMap<String, Value>;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct UcanHeader {
    pub alg: String,
    pub typ: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct UcanPayload {
    pub ucv: String,
    pub iss: String,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nnc: Option<String>,
    pub caps: Capabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fct: Option<FactsMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prf: Option<Vec<String>>,
}

/// A signed UCAN token. The three wire segments (header, payload,
/// signature) are kept alongside the exact bytes that were signed, so
/// that third-party tokens verify regardless of how their JSON was
/// formatted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ucan {
    header: UcanHeader,
    payload: UcanPayload,
    data_to_sign: Vec<u8>,
    signature: Vec<u8>,
}

impl Ucan {
    pub fn new(
        header: UcanHeader,
        payload: UcanPayload,
        data_to_sign: Vec<u8>,
        signature: Vec<u8>,
    ) -> Self {
        Ucan {
            header,
            payload,
            data_to_sign,
            signature,
        }
    }

    /// Validate the UCAN's temporal bounds and signature. A `None`
    /// timestamp means "now".
    pub fn validate(&self, now_time: Option<u64>, did_parser: &mut DidParser) -> Result<()> {
        if self.is_expired(now_time) {
            return Err(UcanError::Expired.into());
        }

        if self.is_too_early(now_time) {
            return Err(UcanError::NotActive.into());
        }

        self.check_signature(did_parser)
    }

    /// Verify that the signed data was signed by the stated issuer
    pub fn check_signature(&self, did_parser: &mut DidParser) -> Result<()> {
        let key = did_parser.parse(&self.payload.iss)?;

        key.verify(&self.data_to_sign, &self.signature)
            .map_err(|error| UcanError::SignatureInvalid(error.to_string()).into())
    }

    /// Produce the wire form: three multibase base64url segments
    /// joined by dots
    pub fn encode(&self) -> Result<String> {
        let header = self.header.jwt_base64_encode()?;
        let payload = self.payload.jwt_base64_encode()?;
        let signature = multibase_b64url_encode(&self.signature);

        Ok(format!("{header}.{payload}.{signature}"))
    }

    /// Returns true if the UCAN has passed its expiration time. A
    /// token without an expiration never expires.
    pub fn is_expired(&self, now_time: Option<u64>) -> bool {
        match self.payload.exp {
            Some(exp) => exp < now_time.unwrap_or_else(now),
            None => false,
        }
    }

    /// Returns true if the not-before time is still in the future. A
    /// token without one is active immediately.
    pub fn is_too_early(&self, now_time: Option<u64>) -> bool {
        match self.payload.nbf {
            Some(nbf) => nbf > now_time.unwrap_or_else(now),
            None => false,
        }
    }

    /// Returns true if this UCAN's lifetime begins no later than the
    /// other's. A token without a not-before has an unbounded start
    /// time, so one that specifies an nbf never begins before it.
    pub fn lifetime_begins_before(&self, other: &Ucan) -> bool {
        match (self.payload.nbf, other.payload.nbf) {
            (Some(nbf), Some(other_nbf)) => nbf <= other_nbf,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    /// Returns true if this UCAN expires no earlier than the other
    pub fn lifetime_ends_after(&self, other: &Ucan) -> bool {
        match (self.payload.exp, other.payload.exp) {
            (Some(exp), Some(other_exp)) => exp >= other_exp,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }

    /// Returns true if this UCAN's lifetime fully encompasses the
    /// other's
    pub fn lifetime_encompasses(&self, other: &Ucan) -> bool {
        self.lifetime_begins_before(other) && self.lifetime_ends_after(other)
    }

    /// Derive the content address of this token: a v1 CID over the
    /// encoded string with the `raw` codec. Returns the encoded string
    /// alongside, since deriving it is most of the work.
    pub fn to_cid(&self, hasher: Option<Code>) -> Result<(Cid, String)> {
        let token = self.encode()?;
        let hash = hasher
            .unwrap_or_else(Self::default_hasher)
            .digest(token.as_bytes());

        Ok((Cid::new_v1(RAW_CODEC, hash), token))
    }

    /// The hasher used for CIDs when no override is given
    pub fn default_hasher() -> Code {
        Code::Blake3_256
    }

    pub fn algorithm(&self) -> &str {
        &self.header.alg
    }

    pub fn issuer(&self) -> &str {
        &self.payload.iss
    }

    pub fn audience(&self) -> &str {
        &self.payload.aud
    }

    pub fn proofs(&self) -> &[String] {
        self.payload.prf.as_deref().unwrap_or(&[])
    }

    pub fn expires_at(&self) -> Option<u64> {
        self.payload.exp
    }

    pub fn not_before(&self) -> Option<u64> {
        self.payload.nbf
    }

    pub fn nonce(&self) -> Option<&str> {
        self.payload.nnc.as_deref()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.payload.caps
    }

    pub fn facts(&self) -> Option<&FactsMap> {
        self.payload.fct.as_ref()
    }

    pub fn version(&self) -> &str {
        &self.payload.ucv
    }

    /// The exact bytes covered by the signature
    pub fn data_to_sign(&self) -> &[u8] {
        &self.data_to_sign
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }
}

impl FromStr for Ucan {
    type Err = anyhow::Error;

    fn from_str(ucan_token: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = ucan_token.split('.').collect();

        if parts.len() != 3 {
            return Err(UcanError::InvalidFormat(format!(
                "Expected three dot-separated segments, got {}",
                parts.len()
            ))
            .into());
        }

        // The signed portion is preserved byte-for-byte; re-encoding
        // the parsed JSON could change it and break verification
        let data_to_sign = format!("{}.{}", parts[0], parts[1]).into_bytes();

        let header_bytes = multibase_b64url_decode(parts[0])?;
        let header: UcanHeader = serde_json::from_slice(&header_bytes).map_err(|error| {
            UcanError::InvalidFormat(format!("Could not parse UCAN header JSON: {error}"))
        })?;

        let payload_bytes = multibase_b64url_decode(parts[1])?;
        let payload: UcanPayload = serde_json::from_slice(&payload_bytes).map_err(|error| {
            UcanError::InvalidFormat(format!("Could not parse UCAN payload JSON: {error}"))
        })?;

        let signature = multibase_b64url_decode(parts[2])?;

        Ok(Ucan::new(header, payload, data_to_sign, signature))
    }
}

impl<'a> TryFrom<&'a str> for Ucan {
    type Error = anyhow::Error;

    fn try_from(ucan_token: &str) -> Result<Self, Self::Error> {
        Ucan::from_str(ucan_token)
    }
}

impl TryFrom<String> for Ucan {
    type Error = anyhow::Error;

    fn try_from(ucan_token: String) -> Result<Self, Self::Error> {
        Ucan::from_str(ucan_token.as_str())
    }
}
