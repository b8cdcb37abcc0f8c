use crate::crypto::{
    did::{format_did_key, KeyConstructorSlice, ED25519_MULTICODEC},
    JwtSignatureAlgorithm, KeyMaterial,
};
use anyhow::{anyhow, Result};
use ed25519_zebra::{
    Signature, SigningKey as Ed25519PrivateKey, VerificationKey as Ed25519PublicKey,
};

pub const SUPPORTED_KEYS: &KeyConstructorSlice = &[(ED25519_MULTICODEC, bytes_to_ed25519_key)];

pub fn bytes_to_ed25519_key(bytes: &[u8]) -> Result<Box<dyn KeyMaterial>> {
    let public_key = Ed25519PublicKey::try_from(bytes)?;
    Ok(Box::new(Ed25519KeyMaterial(public_key, None)))
}

#[derive(Clone)]
pub struct Ed25519KeyMaterial(pub Ed25519PublicKey, pub Option<Ed25519PrivateKey>);

impl KeyMaterial for Ed25519KeyMaterial {
    fn get_jwt_algorithm_name(&self) -> String {
        JwtSignatureAlgorithm::EdDSA.to_string()
    }

    fn get_did(&self) -> Result<String> {
        Ok(format_did_key(ED25519_MULTICODEC, self.0.as_ref()))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        match &self.1 {
            Some(private_key) => {
                let signature = private_key.sign(payload);
                let bytes: [u8; 64] = signature.into();
                Ok(bytes.to_vec())
            }
            None => Err(anyhow!("No private key; cannot sign data")),
        }
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<()> {
        let signature = Signature::try_from(signature)?;
        self.0
            .verify(&signature, payload)
            .map_err(|error| anyhow!("Could not verify signature: {:?}", error))
    }
}
