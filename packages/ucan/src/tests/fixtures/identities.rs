use super::Ed25519KeyMaterial;
use crate::crypto::KeyMaterial;
use anyhow::Result;
use base64::Engine;
use ed25519_zebra::{SigningKey as Ed25519PrivateKey, VerificationKey as Ed25519PublicKey};

pub const ALICE_BASE64_KEY: &str =
    "U+bzp2GaFQHso587iSFWPSeCzbSfn/CbNHEz7ilKRZ1UQMmMS7qq4UhTzKn3X9Nj/4xgrwa+UqhMOeo4Ki8JUw==";
pub const BOB_BASE64_KEY: &str =
    "G4+QCX1b3a45IzQsQd4gFMMe0UB1UOx9bCsh8uOiKLER69eAvVXvc8P2yc4Iig42Bv7JD2zJxhyFALyTKBHipg==";
pub const MALLORY_BASE64_KEY: &str =
    "LR9AL2MYkMARuvmV3MJV8sKvbSOdBtpggFCW8K62oZDR6UViSXdSV/dDcD8S9xVjS61vh62JITx7qmLgfQUSZQ==";

pub fn ed25519_key_from_base64(encoded_key: &str) -> Result<Ed25519KeyMaterial> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded_key)?;
    let private_key_bytes: [u8; 32] = bytes[0..32].try_into()?;
    let private_key = Ed25519PrivateKey::from(private_key_bytes);
    let public_key = Ed25519PublicKey::from(&private_key);

    Ok(Ed25519KeyMaterial(public_key, Some(private_key)))
}

pub struct Identities {
    pub alice_key: Ed25519KeyMaterial,
    pub bob_key: Ed25519KeyMaterial,
    pub mallory_key: Ed25519KeyMaterial,

    pub alice_did: String,
    pub bob_did: String,
    pub mallory_did: String,
}

impl Identities {
    pub fn new() -> Self {
        let alice_key = ed25519_key_from_base64(ALICE_BASE64_KEY).unwrap();
        let bob_key = ed25519_key_from_base64(BOB_BASE64_KEY).unwrap();
        let mallory_key = ed25519_key_from_base64(MALLORY_BASE64_KEY).unwrap();

        Identities {
            alice_did: alice_key.get_did().unwrap(),
            bob_did: bob_key.get_did().unwrap(),
            mallory_did: mallory_key.get_did().unwrap(),

            alice_key,
            bob_key,
            mallory_key,
        }
    }
}
