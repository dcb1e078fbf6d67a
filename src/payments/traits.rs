//! Payment gateway trait definitions
//!
//! Defines the operations exposed to callers, independent of how requests
//! reach the gateway.

use crate::error::ClientResult;
use crate::payments::outcome::Outcome;
use crate::payments::request::RequestMap;
use crate::payments::types::{CreditCardPayment, MbwayPayment, MbwayStatus, MultibancoReference};
use async_trait::async_trait;

/// Operations offered by the gateway.
///
/// Every method validates the request and resolves credentials before any
/// network traffic. `Err` is reserved for validation, configuration and
/// decode errors; everything the gateway (or the network) says comes back
/// as an [`Outcome`].
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a Multibanco payment reference.
    ///
    /// Required fields: `orderid`, `amount`.
    async fn create_multibanco_reference(
        &self,
        request: RequestMap,
    ) -> ClientResult<Outcome<MultibancoReference>>;

    /// Start a credit card payment and obtain the redirect URL.
    ///
    /// Required fields: `orderid`, `amount`. The success, error and cancel
    /// callback URLs come from configuration.
    async fn init_credit_card(&self, request: RequestMap) -> ClientResult<Outcome<CreditCardPayment>>;

    /// Push an MB WAY payment request to the customer's phone.
    ///
    /// Required fields: `orderid`, `amount`, `mobilenumber`.
    async fn init_mbway(&self, request: RequestMap) -> ClientResult<Outcome<MbwayPayment>>;

    /// Query the state of an MB WAY payment.
    ///
    /// Required fields: `orderid`.
    async fn mbway_status(&self, request: RequestMap) -> ClientResult<Outcome<MbwayStatus>>;
}
