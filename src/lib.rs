//! Ethfinex trustless REST API client.
//!
//! Stateless glue between a caller and the exchange's `/trustless/*`
//! endpoints: each operation assembles a JSON payload, signs the
//! operation-specific message with the account's key (Ethereum
//! personal-message scheme), POSTs it, and returns the decoded response.
//! The server authenticates by recovering the signature to the account
//! address; no sessions, no API keys.
//!
//! ```no_run
//! use efx_client_sdk::{ClientConfig, TrustlessClient};
//! use secrecy::SecretString;
//!
//! # async fn run() -> efx_client_sdk::Result<()> {
//! let key = SecretString::from(std::env::var("EFX_PRIVATE_KEY").unwrap());
//! let client = TrustlessClient::new(ClientConfig::new(key)?)?;
//!
//! let ack = client.submit_order("ETHUSD", "1".parse().unwrap(), "100".parse().unwrap()).await?;
//! println!("{ack}");
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod order;
mod policy;
mod signer;
mod transport;
mod types;

pub use client::{RegisterOrderListResponse, ReleaseTokensResponse, TrustlessClient};
pub use config::{
    ClientConfig, CurrencyTable, DEFAULT_API_URL, MAINNET_EXCHANGE_CONTRACT, Token,
};
pub use error::{Error, Kind};
pub use order::{SignedZeroExOrder, ZeroExOrder};
pub use policy::SigningPolicy;
pub use signer::EthSigner;
pub use types::{
    Address, B256, Decimal, ORDER_LIST_USAGE, ORDER_TYPE_EXCHANGE_LIMIT, OrderId, PROTOCOL,
    RegistrationRequest, Timestamp, U256,
};

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
