use super::KeyMaterial;
use crate::error::UcanError;
use anyhow::{anyhow, Result};
use std::{collections::BTreeMap, sync::Arc};

pub const DID_KEY_PREFIX: &str = "did:key:z";

/// Multicodec value for an Ed25519 public key
pub const ED25519_MULTICODEC: u64 = 0xed;
/// Multicodec value for an RSA public key (PKCS#1 DER bytes)
pub const RSA_MULTICODEC: u64 = 0x1205;

pub type BytesToKey = fn(&[u8]) -> Result<Box<dyn KeyMaterial>>;
pub type KeyConstructorSlice = [(u64, BytesToKey)];
pub type KeyConstructors = BTreeMap<u64, BytesToKey>;
pub type KeyCache = BTreeMap<String, Arc<Box<dyn KeyMaterial>>>;

/// Produce a `did:key` string for raw verifying-key bytes: an unsigned
/// varint multicodec prefix followed by the key bytes, base58btc
/// encoded under the `z` multibase prefix.
pub fn format_did_key(multicodec: u64, key_bytes: &[u8]) -> String {
    let mut buffer = unsigned_varint::encode::u64_buffer();
    let prefix = unsigned_varint::encode::u64(multicodec, &mut buffer);

    format!(
        "{}{}",
        DID_KEY_PREFIX,
        bs58::encode([prefix, key_bytes].concat()).into_string()
    )
}

/// Converts `did:key` strings into corresponding [KeyMaterial]
/// implementations. The parser decodes the multicodec value from a
/// given DID and matches it to a registered constructor that produces
/// a verifying key. Parsed keys are cached by DID string.
pub struct DidParser {
    key_constructors: KeyConstructors,
    key_cache: KeyCache,
}

impl DidParser {
    pub fn new(key_constructor_slice: &KeyConstructorSlice) -> Self {
        let mut key_constructors = BTreeMap::new();
        for (multicodec, constructor) in key_constructor_slice {
            key_constructors.insert(*multicodec, *constructor);
        }
        DidParser {
            key_constructors,
            key_cache: BTreeMap::new(),
        }
    }

    pub fn parse(&mut self, did: &str) -> Result<Arc<Box<dyn KeyMaterial>>> {
        if !did.starts_with(DID_KEY_PREFIX) {
            return Err(anyhow!("Expected a base58btc-encoded did:key, got: {}", did));
        }

        if let Some(key) = self.key_cache.get(did) {
            return Ok(key.clone());
        }

        let did_bytes = bs58::decode(&did[DID_KEY_PREFIX.len()..]).into_vec()?;
        let (multicodec, key_bytes) = unsigned_varint::decode::u64(&did_bytes)
            .map_err(|error| anyhow!("Could not decode multicodec prefix: {}", error))?;

        match self.key_constructors.get(&multicodec) {
            Some(constructor) => {
                let key = Arc::new(constructor(key_bytes)?);
                self.key_cache.insert(did.to_owned(), key.clone());
                Ok(key)
            }
            None => Err(UcanError::UnsupportedAlgorithm(multicodec).into()),
        }
    }
}
