//! Bridge to the Ethereum signing provider.
//!
//! Every authenticated operation signs a personal message (EIP-191
//! `\x19Ethereum Signed Message:\n` envelope); the server verifies by
//! signature recovery against the account address it has on file. Which
//! bytes get signed per operation is decided in [`crate::policy`], not here.

use std::str::FromStr as _;

use alloy::primitives::Signature;
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use secrecy::{ExposeSecret as _, SecretString};

use crate::Result;
use crate::error::Error;
use crate::types::Address;

/// Local-key signer adapter.
#[derive(Clone, Debug)]
pub struct EthSigner {
    inner: PrivateKeySigner,
}

impl EthSigner {
    pub fn from_private_key(private_key: &SecretString) -> Result<Self> {
        PrivateKeySigner::from_str(private_key.expose_secret())
            .map_err(|e| Error::validation(format!("invalid private key: {e}")))
            .map(|inner| Self { inner })
    }

    /// The account address all signatures recover to.
    #[must_use]
    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Signs `message` as a personal message.
    ///
    /// Fails with a signing error if the underlying key cannot produce a
    /// signature; the caller must not send the request in that case.
    pub async fn sign(&self, message: &[u8]) -> Result<Signature> {
        self.inner.sign_message(message).await.map_err(Error::signing)
    }

    /// Recovers the signing address of a personal-message signature.
    ///
    /// Pure computation, used by the pre-send self-check and by tests.
    pub fn recover(message: &[u8], signature: &Signature) -> Result<Address> {
        signature
            .recover_address_from_msg(message)
            .map_err(Error::signing)
    }

    /// Wire encoding of a signature: 0x-prefixed 65-byte hex.
    #[must_use]
    pub fn signature_hex(signature: &Signature) -> String {
        format!("0x{}", alloy::hex::encode(signature.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;

    use super::*;

    fn test_signer() -> EthSigner {
        let key = SecretString::from(
            "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
        );
        EthSigner::from_private_key(&key).expect("valid test key")
    }

    #[test]
    fn rejects_malformed_private_key() {
        let key = SecretString::from("not-a-key");
        let err = EthSigner::from_private_key(&key).expect_err("key is garbage");
        assert_eq!(
            err.kind(),
            crate::error::Kind::Validation,
            "bad key is a validation error"
        );
    }

    #[tokio::test]
    async fn recover_round_trips_arbitrary_messages() {
        let signer = test_signer();
        let mut rng = rand::rng();

        for _ in 0..16 {
            let len = rng.random_range(1..256);
            let mut message = vec![0u8; len];
            rng.fill(&mut message[..]);

            let signature = signer.sign(&message).await.expect("signing succeeds");
            let recovered =
                EthSigner::recover(&message, &signature).expect("recovery succeeds");
            assert_eq!(recovered, signer.address(), "round trip recovers signer");
        }
    }

    #[tokio::test]
    async fn signature_hex_is_sixty_five_bytes() {
        let signer = test_signer();
        let signature = signer.sign(b"hello").await.expect("signing succeeds");
        let hex = EthSigner::signature_hex(&signature);
        assert!(hex.starts_with("0x"), "wire form is 0x-prefixed");
        assert_eq!(hex.len(), 2 + 65 * 2, "r || s || v");
    }
}
