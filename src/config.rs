//! Client configuration: API origin, signing key, and the currency table.
//!
//! All of this is immutable after construction. The client never mutates
//! configuration at runtime; a different setup means a different client.

use std::collections::BTreeMap;

use alloy::primitives::address;
use phf::phf_map;
use secrecy::SecretString;
use url::Url;

use crate::Result;
use crate::error::Error;
use crate::types::Address;

/// Default production API origin.
pub const DEFAULT_API_URL: &str = "https://api.ethfinex.com";

/// 0x protocol v1 exchange contract on Ethereum mainnet.
pub const MAINNET_EXCHANGE_CONTRACT: Address =
    address!("12459C951127e0c374FF9105DdA097662A027093");

/// How long a submitted order's on-chain commitment stays valid.
pub const DEFAULT_ORDER_VALIDITY_SECS: i64 = 30 * 24 * 3600;

/// On-chain identity of a listed currency.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token {
    pub address: Address,
    pub decimals: u32,
}

/// Mainnet listings the exchange settles against. ETH trades as its
/// wrapped ERC-20 form; USD settles as USDT.
static MAINNET_CURRENCIES: phf::Map<&'static str, Token> = phf_map! {
    "ETH" => Token {
        address: address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
        decimals: 18,
    },
    "USD" => Token {
        address: address!("dAC17F958D2ee523a2206206994597C13D831ec7"),
        decimals: 6,
    },
    "ZRX" => Token {
        address: address!("E41d2489571d322189246DaFA5ebDe1F4699F498"),
        decimals: 18,
    },
    "MKR" => Token {
        address: address!("9f8F72aA9304c8B593d555F12eF6589cC3A579A2"),
        decimals: 18,
    },
    "OMG" => Token {
        address: address!("d26114cd6EE289AccF82350c8d8487fecB456A5E"),
        decimals: 18,
    },
};

/// Symbol to on-chain token mapping, fixed at client construction.
#[derive(Clone, Debug)]
pub struct CurrencyTable {
    entries: BTreeMap<String, Token>,
}

impl CurrencyTable {
    /// The built-in mainnet listings.
    #[must_use]
    pub fn mainnet() -> Self {
        Self {
            entries: MAINNET_CURRENCIES
                .entries()
                .map(|(symbol, token)| ((*symbol).to_owned(), *token))
                .collect(),
        }
    }

    /// A table from caller-supplied listings, replacing the defaults.
    pub fn new(entries: impl IntoIterator<Item = (String, Token)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&Token> {
        self.entries.get(symbol)
    }

    /// Like [`get`](Self::get), but an unknown symbol is a config error.
    pub fn lookup(&self, symbol: &str) -> Result<&Token> {
        self.entries
            .get(symbol)
            .ok_or_else(|| Error::config(format!("unknown currency `{symbol}`")))
    }

    #[must_use]
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Trustless client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub host: Url,
    pub private_key: SecretString,
    pub currencies: CurrencyTable,
    pub exchange_contract: Address,
    pub order_validity_secs: i64,
}

impl ClientConfig {
    /// Production config for the given signing key.
    pub fn new(private_key: SecretString) -> Result<Self> {
        Self::with_host(DEFAULT_API_URL, private_key)
    }

    /// Config pointed at a non-default origin, e.g. a local mock server.
    pub fn with_host(host: &str, private_key: SecretString) -> Result<Self> {
        Ok(Self {
            host: Url::parse(host)?,
            private_key,
            currencies: CurrencyTable::mainnet(),
            exchange_contract: MAINNET_EXCHANGE_CONTRACT,
            order_validity_secs: DEFAULT_ORDER_VALIDITY_SECS,
        })
    }

    #[must_use]
    pub fn currencies(mut self, currencies: CurrencyTable) -> Self {
        self.currencies = currencies;
        self
    }

    #[must_use]
    pub fn exchange_contract(mut self, contract: Address) -> Self {
        self.exchange_contract = contract;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn mainnet_table_resolves_known_symbols() {
        let table = CurrencyTable::mainnet();
        let zrx = table.lookup("ZRX").expect("ZRX is listed");
        assert_eq!(zrx.decimals, 18, "ZRX uses 18 decimals");
        assert_eq!(table.lookup("USD").expect("USD is listed").decimals, 6);
    }

    #[test]
    fn unknown_symbol_is_a_config_error() {
        let table = CurrencyTable::mainnet();
        let err = table.lookup("DOGE").expect_err("DOGE is not listed");
        assert_eq!(err.kind(), Kind::Config, "unknown symbol maps to Config");
    }
}
