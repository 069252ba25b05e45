//! Shared type aliases and small wire types.

pub use alloy::primitives::{Address, B256, U256};
pub use rust_decimal::Decimal;

/// Opaque server-side order identifier.
pub type OrderId = u64;

/// Unix timestamp in seconds.
pub type Timestamp = i64;

/// Usage tag the API expects on order-list registrations.
pub const ORDER_LIST_USAGE: &str = "efx-portal-orders";

/// Account attestation sent to `/trustless/registerOrderlist`.
///
/// Signed as a whole; field order here is the canonical serialization the
/// server re-derives, so it must not change.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegistrationRequest {
    pub address: Address,
    pub usage: String,
}

impl RegistrationRequest {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            usage: ORDER_LIST_USAGE.to_owned(),
        }
    }
}

/// Protocol tag the API uses to scope trustless operations.
pub const PROTOCOL: &str = "0x";

/// The only order type the trustless endpoint accepts.
pub const ORDER_TYPE_EXCHANGE_LIMIT: &str = "EXCHANGE LIMIT";
