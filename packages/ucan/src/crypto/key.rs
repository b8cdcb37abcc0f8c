use anyhow::Result;
use std::sync::Arc;

/// This trait must be implemented by a struct that encapsulates
/// cryptographic keypair data. It represents the minimum API required
/// for producing a signed UCAN from a keypair and verifying such
/// signatures. Implementations that only hold a public key can verify
/// but will fail to sign.
pub trait KeyMaterial {
    /// The JWT `alg` name for signatures produced by this key, e.g.
    /// "EdDSA" or "RS256"
    fn get_jwt_algorithm_name(&self) -> String;

    /// A `did:key` string for the verifying half of this key
    fn get_did(&self) -> Result<String>;

    /// Sign some data with this key
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>>;

    /// Verify the alleged signature of some data against this key
    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<()>;
}

impl KeyMaterial for Box<dyn KeyMaterial> {
    fn get_jwt_algorithm_name(&self) -> String {
        self.as_ref().get_jwt_algorithm_name()
    }

    fn get_did(&self) -> Result<String> {
        self.as_ref().get_did()
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        self.as_ref().sign(payload)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<()> {
        self.as_ref().verify(payload, signature)
    }
}

impl<K> KeyMaterial for Arc<K>
where
    K: KeyMaterial,
{
    fn get_jwt_algorithm_name(&self) -> String {
        (**self).get_jwt_algorithm_name()
    }

    fn get_did(&self) -> Result<String> {
        (**self).get_did()
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        (**self).sign(payload)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<()> {
        (**self).verify(payload, signature)
    }
}
