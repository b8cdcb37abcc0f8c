use anyhow::{anyhow, Result};
use rsa::{
    pkcs1::{DecodeRsaPublicKey, EncodeRsaPublicKey},
    Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey,
};
use sha2::{Digest, Sha256};
use ucan::crypto::{did::format_did_key, JwtSignatureAlgorithm, KeyMaterial};

pub use ucan::crypto::did::RSA_MULTICODEC;

pub fn bytes_to_rsa_key(bytes: &[u8]) -> Result<Box<dyn KeyMaterial>> {
    let public_key = RsaPublicKey::from_pkcs1_der(bytes)?;
    Ok(Box::new(RsaKeyMaterial(public_key, None)))
}

#[derive(Clone)]
pub struct RsaKeyMaterial(pub RsaPublicKey, pub Option<RsaPrivateKey>);

impl KeyMaterial for RsaKeyMaterial {
    fn get_jwt_algorithm_name(&self) -> String {
        JwtSignatureAlgorithm::RS256.to_string()
    }

    fn get_did(&self) -> Result<String> {
        let document = self.0.to_pkcs1_der()?;
        Ok(format_did_key(RSA_MULTICODEC, document.as_bytes()))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        let hashed = hasher.finalize();

        match &self.1 {
            Some(private_key) => {
                let padding = Pkcs1v15Sign::new::<Sha256>();
                Ok(private_key.sign(padding, hashed.as_ref())?)
            }
            None => Err(anyhow!("No private key; cannot sign data")),
        }
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<()> {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        let hashed = hasher.finalize();

        let padding = Pkcs1v15Sign::new::<Sha256>();
        self.0
            .verify(padding, hashed.as_ref(), signature)
            .map_err(|error| anyhow!("Could not verify signature: {}", error))
    }
}
