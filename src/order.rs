//! 0x protocol v1 order construction and canonical hashing.
//!
//! The trustless endpoint settles through the 0x v1 exchange contract, so a
//! submitted order carries a full 0x order object. Its hash is keccak256
//! over the contract's packed field encoding (six addresses, then six
//! uint256 values); the result is byte-compatible with
//! `ZeroEx.getOrderHashHex`, which is what the server verifies against.

use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::keccak256;
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::Error;
use crate::types::{Address, B256, Decimal, U256};

/// A 0x v1 order, pre-signature.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZeroExOrder {
    pub exchange_contract_address: Address,
    pub maker: Address,
    pub taker: Address,
    pub maker_token_address: Address,
    pub taker_token_address: Address,
    pub fee_recipient: Address,
    #[serde(with = "u256_string")]
    pub maker_token_amount: U256,
    #[serde(with = "u256_string")]
    pub taker_token_amount: U256,
    #[serde(with = "u256_string")]
    pub maker_fee: U256,
    #[serde(with = "u256_string")]
    pub taker_fee: U256,
    #[serde(with = "u256_string")]
    pub expiration_unix_timestamp_sec: U256,
    #[serde(with = "u256_string")]
    pub salt: U256,
}

impl ZeroExOrder {
    /// Canonical order hash: keccak256 of the packed field encoding.
    #[must_use]
    pub fn hash(&self) -> B256 {
        let mut packed = Vec::with_capacity(6 * 20 + 6 * 32);
        for address in [
            self.exchange_contract_address,
            self.maker,
            self.taker,
            self.maker_token_address,
            self.taker_token_address,
            self.fee_recipient,
        ] {
            packed.extend_from_slice(address.as_slice());
        }
        for value in [
            self.maker_token_amount,
            self.taker_token_amount,
            self.maker_fee,
            self.taker_fee,
            self.expiration_unix_timestamp_sec,
            self.salt,
        ] {
            packed.extend_from_slice(&value.to_be_bytes::<32>());
        }
        keccak256(&packed)
    }
}

/// A 0x order plus the personal-message signature over its hash, in the
/// wire shape `/trustless/submitOrder` expects under `orderObject`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedZeroExOrder {
    #[serde(flatten)]
    pub order: ZeroExOrder,
    #[serde(rename = "ecSignature")]
    pub ec_signature: String,
}

/// Converts a decimal amount to on-chain base units.
///
/// Scaling must be exact: an amount with more fractional digits than the
/// token supports is rejected rather than rounded.
pub(crate) fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256> {
    if amount.is_sign_negative() {
        return Err(Error::validation(format!(
            "amount cannot be negative: {amount}"
        )));
    }
    let amount = amount.normalize();
    let scale = amount.scale();
    if scale > decimals {
        return Err(Error::validation(format!(
            "amount {amount} has {scale} decimal places but the token supports {decimals}"
        )));
    }

    let mantissa = amount.mantissa().unsigned_abs();
    Ok(U256::from(mantissa) * U256::from(10u8).pow(U256::from(decimals - scale)))
}

/// Random 256-bit order salt.
pub(crate) fn random_salt() -> U256 {
    U256::from_be_bytes(rand::rng().random::<[u8; 32]>())
}

/// Mask to <= 2^53 - 1 because the backend parses ids as IEEE 754.
const fn to_ieee_754_int(value: u64) -> u64 {
    value & ((1 << 53) - 1)
}

/// Time-derived client order id, unique enough per submission.
pub(crate) fn generate_cid() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards");
    let millis = u64::try_from(now.as_millis()).unwrap_or(u64::MAX);
    let jitter: u64 = rand::rng().random_range(0..1 << 10);
    to_ieee_754_int((millis << 10) | jitter)
}

/// Normalizes an exchange pair to its wire form: `ETHUSD` -> `tETHUSD`.
pub(crate) fn normalize_symbol(symbol: &str) -> Result<String> {
    let bare = symbol.strip_prefix('t').unwrap_or(symbol);
    if bare.len() < 6 || bare.len() > 10 || !bare.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::validation(format!("malformed symbol `{symbol}`")));
    }
    Ok(format!("t{bare}"))
}

/// Splits a normalized pair into (base, quote) currency symbols.
///
/// The base currency is always three characters; the quote is the rest.
pub(crate) fn split_symbol(normalized: &str) -> Result<(&str, &str)> {
    let bare = normalized
        .strip_prefix('t')
        .ok_or_else(|| Error::validation(format!("symbol `{normalized}` is not normalized")))?;
    if bare.len() < 6 {
        return Err(Error::validation(format!("malformed symbol `{normalized}`")));
    }
    Ok(bare.split_at(3))
}

/// Serde adapter for the wire convention of uint256 as base-10 strings.
pub(crate) mod u256_string {
    use serde::de::Error as _;
    use serde::{Deserialize as _, Deserializer, Serializer};

    use crate::types::U256;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    fn sample_order() -> ZeroExOrder {
        ZeroExOrder {
            exchange_contract_address: address!("12459C951127e0c374FF9105DdA097662A027093"),
            maker: address!("90F8bf6A479f320ead074411a4B0e7944Ea8c9C1"),
            taker: Address::ZERO,
            maker_token_address: address!("dAC17F958D2ee523a2206206994597C13D831ec7"),
            taker_token_address: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            fee_recipient: Address::ZERO,
            maker_token_amount: U256::from(100_000_000u64),
            taker_token_amount: U256::from(1_000_000_000_000_000_000u64),
            maker_fee: U256::ZERO,
            taker_fee: U256::ZERO,
            expiration_unix_timestamp_sec: U256::from(1_600_000_000u64),
            salt: U256::from(42u64),
        }
    }

    #[test]
    fn hash_packs_addresses_then_uints() {
        let order = sample_order();
        let mut packed = Vec::new();
        packed.extend_from_slice(order.exchange_contract_address.as_slice());
        packed.extend_from_slice(order.maker.as_slice());
        packed.extend_from_slice(order.taker.as_slice());
        packed.extend_from_slice(order.maker_token_address.as_slice());
        packed.extend_from_slice(order.taker_token_address.as_slice());
        packed.extend_from_slice(order.fee_recipient.as_slice());
        for value in [
            order.maker_token_amount,
            order.taker_token_amount,
            order.maker_fee,
            order.taker_fee,
            order.expiration_unix_timestamp_sec,
            order.salt,
        ] {
            packed.extend_from_slice(&value.to_be_bytes::<32>());
        }
        assert_eq!(order.hash(), keccak256(&packed), "hash is over packed fields");
    }

    #[test]
    fn hash_changes_when_any_field_changes() {
        let order = sample_order();
        let mut changed = order.clone();
        changed.salt = U256::from(43u64);
        assert_ne!(order.hash(), changed.hash(), "salt is part of the hash");
    }

    #[test]
    fn wire_json_round_trips_amounts_as_decimal_strings() {
        let order = sample_order();
        let json = serde_json::to_value(&order).expect("order serializes");
        assert_eq!(
            json["takerTokenAmount"], "1000000000000000000",
            "uint256 rides as a base-10 string"
        );
        assert_eq!(json["salt"], "42");
        let back: ZeroExOrder = serde_json::from_value(json).expect("order deserializes");
        assert_eq!(back, order, "wire round trip is lossless");
    }

    #[test]
    fn base_unit_scaling_is_exact() {
        let one_and_a_half = Decimal::new(15, 1);
        assert_eq!(
            to_base_units(one_and_a_half, 18).expect("scales"),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(
            to_base_units(Decimal::new(100, 0), 6).expect("scales"),
            U256::from(100_000_000u64)
        );
    }

    #[test]
    fn over_precise_amounts_are_rejected() {
        let err = to_base_units(Decimal::new(1_234_567, 7), 6).expect_err("7 > 6 decimals");
        assert_eq!(err.kind(), crate::error::Kind::Validation);
    }

    #[test]
    fn symbols_normalize_with_and_without_prefix() {
        assert_eq!(normalize_symbol("ETHUSD").expect("valid"), "tETHUSD");
        assert_eq!(normalize_symbol("tETHUSD").expect("valid"), "tETHUSD");
        assert!(normalize_symbol("ETH").is_err(), "too short");
        assert!(normalize_symbol("ETH/USD").is_err(), "non-alphanumeric");
    }

    #[test]
    fn pairs_split_into_base_and_quote() {
        let (base, quote) = split_symbol("tETHUSD").expect("valid pair");
        assert_eq!((base, quote), ("ETH", "USD"));
        let (base, quote) = split_symbol("tZRXETH").expect("valid pair");
        assert_eq!((base, quote), ("ZRX", "ETH"));
    }

    #[test]
    fn cids_fit_ieee_754_integers() {
        for _ in 0..32 {
            assert!(generate_cid() < (1 << 53), "cid must survive a JSON number");
        }
    }
}
