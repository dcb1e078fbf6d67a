//! Client for the ifthenpay payment gateway.
//!
//! Every operation goes through the same pipeline: required-field
//! validation, credential injection, a single HTTP exchange, response
//! normalization and a per-operation status table. Callers always receive
//! either a fatal [`ClientError`] (bad request, missing configuration,
//! undecodable answer) or an [`Outcome`].
//!
//! ```no_run
//! use ifthenpay::{IfthenpayClient, PaymentGateway, Registry, RequestMap};
//!
//! # async fn run() -> Result<(), ifthenpay::ClientError> {
//! let registry = Registry::new().with("mbway_key", "ABC-123456");
//! let client = IfthenpayClient::from_registry(registry)?;
//!
//! let outcome = client
//!     .mbway_status(RequestMap::new().with("orderid", "1001"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod payments;
pub mod transport;

pub use config::{ConfigSource, CredentialResolver, EnvSource, Registry};
pub use error::{ClientError, ClientResult};
pub use payments::outcome::{Failure, FailureKind, Outcome};
pub use payments::providers::IfthenpayClient;
pub use payments::request::RequestMap;
pub use payments::traits::PaymentGateway;
pub use payments::types::{
    CreditCardPayment, DomainStatus, MbwayPayment, MbwayStatus, MultibancoReference,
};
pub use transport::{HttpMethod, HttpTransport, RawResponse, Transport, TransportFailure};
