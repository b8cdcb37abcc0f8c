use crate::{
    error::UcanError,
    ucan::{Code, Ucan, RAW_CODEC},
};
use anyhow::Result;
use cid::Cid;
use multihash_codetable::MultihashDigest;
use std::collections::HashMap;

/// Content-addressed persistence for UCAN tokens that may be
/// referenced as proofs by other UCANs. A token's address is the CID
/// of its encoded string form under the `raw` codec; writes with the
/// same content are idempotent.
pub trait UcanStore {
    /// Read the encoded token stored under a CID
    fn read_ucan_string(&self, cid: &Cid) -> Result<String>;

    /// Store an encoded token, first checking that it actually decodes
    /// as a UCAN. Returns the assigned CID.
    fn write_ucan_string(&mut self, token: &str, hasher: Option<Code>) -> Result<Cid>;

    fn read_ucan(&self, cid: &Cid) -> Result<Ucan> {
        Ucan::try_from(self.read_ucan_string(cid)?.as_str())
    }

    fn write_ucan(&mut self, ucan: &Ucan, hasher: Option<Code>) -> Result<Cid> {
        self.write_ucan_string(&ucan.encode()?, hasher)
    }
}

/// A basic in-memory store. This serves tests and small embedders;
/// anything that shares it across threads must serialize writes
/// externally.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tokens: HashMap<Cid, String>,
}

impl UcanStore for MemoryStore {
    fn read_ucan_string(&self, cid: &Cid) -> Result<String> {
        self.tokens
            .get(cid)
            .cloned()
            .ok_or_else(|| UcanError::StoreMiss(cid.to_string()).into())
    }

    fn write_ucan_string(&mut self, token: &str, hasher: Option<Code>) -> Result<Cid> {
        Ucan::try_from(token)?;

        let hash = hasher
            .unwrap_or_else(Ucan::default_hasher)
            .digest(token.as_bytes());
        let cid = Cid::new_v1(RAW_CODEC, hash);

        self.tokens.insert(cid, token.to_owned());

        Ok(cid)
    }
}
