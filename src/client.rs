//! The trustless API client.
//!
//! One method per endpoint. Each call composes its payload, signs the
//! operation's message where the endpoint requires one, POSTs, and hands
//! the decoded response back. The client keeps no state between calls
//! beyond its immutable configuration.

use chrono::Utc;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::Result;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::order::{
    SignedZeroExOrder, ZeroExOrder, generate_cid, normalize_symbol, random_salt, split_symbol,
    to_base_units,
};
use crate::policy::SigningPolicy;
use crate::signer::EthSigner;
use crate::transport::Transport;
use crate::types::{
    Address, Decimal, ORDER_TYPE_EXCHANGE_LIMIT, OrderId, PROTOCOL, RegistrationRequest,
    Timestamp, U256,
};

const CANCEL_ORDER_PATH: &str = "/trustless/cancelOrder";
const GET_ORDER_PATH: &str = "/trustless/getOrder";
const GET_ORDERS_PATH: &str = "/trustless/getOrders";
const GET_PENDING_ORDERS_PATH: &str = "/trustless/getPendingOrders";
// Lowercase `l` is the server's spelling.
const REGISTER_ORDER_LIST_PATH: &str = "/trustless/registerOrderlist";
const RELEASE_TOKENS_PATH: &str = "/trustless/releaseTokens";
const SUBMIT_ORDER_PATH: &str = "/trustless/submitOrder";

#[derive(Debug, Serialize)]
struct CancelOrderPayload {
    #[serde(rename = "OrderId")]
    order_id: OrderId,
    #[serde(rename = "ethOrderMethod")]
    eth_order_method: &'static str,
    signature: String,
}

#[derive(Debug, Serialize)]
struct GetOrderPayload {
    id: OrderId,
}

#[derive(Debug, Serialize)]
struct GetOrdersPayload {}

#[derive(Debug, Serialize)]
struct GetPendingOrdersPayload {
    protocol: &'static str,
}

#[derive(Debug, Serialize)]
struct RegisterOrderListPayload {
    request: RegistrationRequest,
    signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseTokensPayload {
    address: Address,
    token_address: Address,
    unlock_until: Timestamp,
}

#[derive(Debug, Serialize)]
struct SubmitOrderPayload {
    cid: u64,
    #[serde(rename = "type")]
    order_type: &'static str,
    symbol: String,
    amount: Decimal,
    price: Decimal,
    protocol: &'static str,
    #[serde(rename = "orderObject")]
    order_object: SignedZeroExOrder,
}

/// Ack for `/trustless/registerOrderlist`.
#[derive(Clone, Debug, Deserialize)]
pub struct RegisterOrderListResponse {
    pub status: String,
    pub id: u64,
}

/// Ack for `/trustless/releaseTokens`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseTokensResponse {
    pub status: String,
    pub release_signature: String,
}

/// Stateless client for the exchange's trustless REST API.
#[derive(Clone, Debug)]
pub struct TrustlessClient {
    config: ClientConfig,
    signer: EthSigner,
    transport: Transport,
}

impl TrustlessClient {
    /// Creates a client with a fresh HTTP connection pool.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_client(config, ReqwestClient::new())
    }

    /// Creates a client over a caller-supplied HTTP client.
    pub fn with_client(config: ClientConfig, client: ReqwestClient) -> Result<Self> {
        let signer = EthSigner::from_private_key(&config.private_key)?;
        let transport = Transport::new(config.host.clone(), client);
        Ok(Self {
            config,
            signer,
            transport,
        })
    }

    /// The account every signed request is attributed to.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Cancels a previously placed order.
    ///
    /// The signature proves the cancel came from the order's account; the
    /// server re-derives the message from the plaintext order id.
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Value> {
        let message = SigningPolicy::CancelOrder { order_id }.message_bytes()?;
        let signature = self.signer.sign(&message).await?;

        debug!(order_id, "cancelling order");
        let payload = CancelOrderPayload {
            order_id,
            eth_order_method: PROTOCOL,
            signature: EthSigner::signature_hex(&signature),
        };
        self.transport.post(CANCEL_ORDER_PATH, &payload).await
    }

    /// Fetches a single order by id. Unsigned.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Value> {
        self.transport
            .post(GET_ORDER_PATH, &GetOrderPayload { id: order_id })
            .await
    }

    /// Fetches all orders for the account. Unsigned, empty payload.
    pub async fn get_orders(&self) -> Result<Value> {
        self.transport.post(GET_ORDERS_PATH, &GetOrdersPayload {}).await
    }

    /// Fetches orders awaiting settlement. Unsigned.
    pub async fn get_pending_orders(&self) -> Result<Value> {
        self.transport
            .post(
                GET_PENDING_ORDERS_PATH,
                &GetPendingOrdersPayload { protocol: PROTOCOL },
            )
            .await
    }

    /// Registers this account for portal order tracking.
    ///
    /// The request object is signed as a whole; the server recovers the
    /// signature against `request.address`.
    pub async fn register_order_list(&self) -> Result<RegisterOrderListResponse> {
        let request = RegistrationRequest::new(self.address());
        let message = SigningPolicy::RegisterOrderList { request: &request }.message_bytes()?;
        let signature = self.signer.sign(&message).await?;

        debug!("registering order list");
        let payload = RegisterOrderListPayload {
            request,
            signature: EthSigner::signature_hex(&signature),
        };
        self.transport.post(REGISTER_ORDER_LIST_PATH, &payload).await
    }

    /// Asks the exchange to release locked tokens back to the wallet.
    ///
    /// Fails with a config error before any network attempt if `symbol` is
    /// not in the currency table.
    pub async fn release_tokens(
        &self,
        symbol: &str,
        unlock_until: Timestamp,
    ) -> Result<ReleaseTokensResponse> {
        if unlock_until <= 0 {
            return Err(Error::validation(format!(
                "unlockUntil must be a positive timestamp, got {unlock_until}"
            )));
        }
        let token = self.config.currencies.lookup(symbol)?;

        debug!(symbol, unlock_until, "releasing tokens");
        let payload = ReleaseTokensPayload {
            address: self.address(),
            token_address: token.address,
            unlock_until,
        };
        self.transport.post(RELEASE_TOKENS_PATH, &payload).await
    }

    /// Places an `EXCHANGE LIMIT` order.
    ///
    /// Positive `amount` buys the base currency, negative sells it. The
    /// on-chain order object is built, hashed, and signed locally; the
    /// server verifies the signature against the hash it re-derives from
    /// the order object.
    pub async fn submit_order(
        &self,
        symbol: &str,
        amount: Decimal,
        price: Decimal,
    ) -> Result<Value> {
        let symbol = normalize_symbol(symbol)?;
        let order_object = self.sign_order(&symbol, amount, price).await?;

        debug!(%symbol, %amount, %price, "submitting order");
        let payload = SubmitOrderPayload {
            cid: generate_cid(),
            order_type: ORDER_TYPE_EXCHANGE_LIMIT,
            symbol,
            amount,
            price,
            protocol: PROTOCOL,
            order_object,
        };
        self.transport.post(SUBMIT_ORDER_PATH, &payload).await
    }

    /// Builds and signs the 0x order object for a limit order without
    /// sending it.
    pub async fn sign_order(
        &self,
        symbol: &str,
        amount: Decimal,
        price: Decimal,
    ) -> Result<SignedZeroExOrder> {
        let symbol = normalize_symbol(symbol)?;
        if amount.is_zero() {
            return Err(Error::validation("amount must be non-zero"));
        }
        if price.is_zero() || price.is_sign_negative() {
            return Err(Error::validation(format!(
                "price must be positive, got {price}"
            )));
        }

        let (base, quote) = split_symbol(&symbol)?;
        let base_token = *self.config.currencies.lookup(base)?;
        let quote_token = *self.config.currencies.lookup(quote)?;

        let size = amount.abs();
        let base_units = to_base_units(size, base_token.decimals)?;
        let quote_units = to_base_units((size * price).normalize(), quote_token.decimals)?;

        // Buy: the maker gives quote and receives base. Sell: the reverse.
        let buying = amount.is_sign_positive();
        let (maker_token, maker_amount, taker_token, taker_amount) = if buying {
            (quote_token.address, quote_units, base_token.address, base_units)
        } else {
            (base_token.address, base_units, quote_token.address, quote_units)
        };

        let expiration = Utc::now().timestamp() + self.config.order_validity_secs;
        let expiration = u64::try_from(expiration)
            .map_err(|e| Error::validation(format!("expiration out of range: {e}")))?;

        let order = ZeroExOrder {
            exchange_contract_address: self.config.exchange_contract,
            maker: self.address(),
            taker: Address::ZERO,
            maker_token_address: maker_token,
            taker_token_address: taker_token,
            fee_recipient: Address::ZERO,
            maker_token_amount: maker_amount,
            taker_token_amount: taker_amount,
            maker_fee: U256::ZERO,
            taker_fee: U256::ZERO,
            expiration_unix_timestamp_sec: U256::from(expiration),
            salt: random_salt(),
        };

        let message = SigningPolicy::SubmitOrder {
            order_hash: order.hash(),
        }
        .message_bytes()?;
        let signature = self.signer.sign(&message).await?;

        // Pre-send self-check: a signature the server cannot attribute to
        // this account must never leave the client.
        let recovered = EthSigner::recover(&message, &signature)?;
        if recovered != self.address() {
            return Err(Error::signing_failed(format!(
                "signature recovered to {recovered}, expected {}",
                self.address()
            )));
        }

        Ok(SignedZeroExOrder {
            order,
            ec_signature: EthSigner::signature_hex(&signature),
        })
    }
}
