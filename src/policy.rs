//! Per-operation signing policy.
//!
//! Each signed operation derives its message bytes differently, and the
//! server re-derives the same bytes from the plaintext payload before
//! recovering the signature. The mapping is an external contract: a
//! mismatch in hex case, `0x` prefix, or serialization order makes the
//! server reject (or worse, misattribute) the request. Keeping the whole
//! table in one enum keeps it auditable.
//!
//! Conventions, fixed by the server:
//! - `CancelOrder` signs a *string*: the lowercase, unprefixed hex of
//!   keccak256 over the order id rendered in base 16.
//! - `RegisterOrderList` signs the canonical JSON serialization of the
//!   request object.
//! - `SubmitOrder` signs the raw 32 bytes of the 0x order hash.

use alloy::primitives::keccak256;

use crate::Result;
use crate::types::{B256, OrderId, RegistrationRequest};

/// What gets signed, per operation.
#[derive(Clone, Debug)]
pub enum SigningPolicy<'a> {
    CancelOrder { order_id: OrderId },
    RegisterOrderList { request: &'a RegistrationRequest },
    SubmitOrder { order_hash: B256 },
}

impl SigningPolicy<'_> {
    /// The exact bytes handed to the personal-message signer.
    pub fn message_bytes(&self) -> Result<Vec<u8>> {
        match self {
            SigningPolicy::CancelOrder { order_id } => {
                let digest = keccak256(format!("{order_id:x}").as_bytes());
                Ok(alloy::hex::encode(digest).into_bytes())
            }
            SigningPolicy::RegisterOrderList { request } => {
                Ok(serde_json::to_string(request)?.into_bytes())
            }
            SigningPolicy::SubmitOrder { order_hash } => Ok(order_hash.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    #[test]
    fn cancel_message_is_unprefixed_hex_of_keccak_of_hex_id() {
        let message = SigningPolicy::CancelOrder { order_id: 1 }
            .message_bytes()
            .expect("derivation is infallible for cancel");
        // keccak256(b"1"), lowercase hex, no 0x.
        assert_eq!(
            message,
            b"c89efdaa54c0f20c7adf612882df0950f5a951637e0307cdcb4c672f298b8bc6"
        );
    }

    #[test]
    fn cancel_renders_order_id_in_base_16() {
        let ten = SigningPolicy::CancelOrder { order_id: 10 }
            .message_bytes()
            .expect("derivation is infallible for cancel");
        let expected = alloy::hex::encode(keccak256(b"a"));
        assert_eq!(ten, expected.into_bytes(), "id 10 hashes as \"a\"");
    }

    #[test]
    fn register_message_is_the_request_json() {
        let request =
            RegistrationRequest::new(address!("90F8bf6A479f320ead074411a4B0e7944Ea8c9C1"));
        let message = SigningPolicy::RegisterOrderList { request: &request }
            .message_bytes()
            .expect("request serializes");
        let text = String::from_utf8(message).expect("json is utf-8");
        assert_eq!(
            text,
            "{\"address\":\"0x90f8bf6a479f320ead074411a4b0e7944ea8c9c1\",\
             \"usage\":\"efx-portal-orders\"}"
        );
    }

    #[test]
    fn submit_message_is_the_raw_hash_bytes() {
        let hash = B256::repeat_byte(0xab);
        let message = SigningPolicy::SubmitOrder { order_hash: hash }
            .message_bytes()
            .expect("derivation is infallible for submit");
        assert_eq!(message, hash.to_vec(), "signs the 32 raw digest bytes");
    }
}
