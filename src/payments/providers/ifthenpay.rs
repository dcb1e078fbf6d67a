//! ifthenpay gateway client
//!
//! Each operation runs the same pipeline: required-field check, credential
//! injection, one HTTP exchange, normalization, then classification through
//! the operation's status table.

use crate::config::{
    CredentialResolver, Registry, CCARD_CANCEL_URL, CCARD_ERROR_URL, CCARD_KEY, CCARD_SUCCESS_URL,
    MBWAY_KEY, MB_KEY,
};
use crate::error::ClientResult;
use crate::payments::normalize::{normalize, Payload};
use crate::payments::outcome::{
    Outcome, StatusTable, CREDIT_CARD_INIT, MBWAY_INIT, MBWAY_STATUS, MULTIBANCO_REFERENCE,
};
use crate::payments::request::RequestMap;
use crate::payments::traits::PaymentGateway;
use crate::payments::types::{
    CreditCardPayment, DomainStatus, MbwayPayment, MbwayStatus, MultibancoReference,
};
use crate::payments::validation::validate;
use crate::transport::{HttpMethod, HttpTransport, Transport};
use async_trait::async_trait;
use tracing::{error, info, warn};

/// Static description of one gateway endpoint.
#[derive(Debug)]
pub struct Operation {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub required: &'static [&'static str],
    pub table: &'static StatusTable,
}

pub static MULTIBANCO_REFERENCE_OP: Operation = Operation {
    name: "multibanco_reference",
    method: HttpMethod::Post,
    path: "/multibanco/reference/init",
    required: &["orderid", "amount"],
    table: &MULTIBANCO_REFERENCE,
};

// The card key is appended to this path as its last segment.
pub static CREDIT_CARD_INIT_OP: Operation = Operation {
    name: "credit_card_init",
    method: HttpMethod::Post,
    path: "/creditcard/init",
    required: &["orderid", "amount"],
    table: &CREDIT_CARD_INIT,
};

pub static MBWAY_INIT_OP: Operation = Operation {
    name: "mbway_init",
    method: HttpMethod::Post,
    path: "/spg/payment/mbway",
    required: &["orderid", "amount", "mobilenumber"],
    table: &MBWAY_INIT,
};

pub static MBWAY_STATUS_OP: Operation = Operation {
    name: "mbway_status",
    method: HttpMethod::Get,
    path: "/spg/payment/mbway/status",
    required: &["orderid"],
    table: &MBWAY_STATUS,
};

/// ifthenpay client over any [`Transport`].
#[derive(Debug, Clone)]
pub struct IfthenpayClient<T = HttpTransport> {
    transport: T,
    resolver: CredentialResolver,
}

impl IfthenpayClient<HttpTransport> {
    pub fn new(resolver: CredentialResolver) -> ClientResult<Self> {
        Ok(Self::with_transport(HttpTransport::new()?, resolver))
    }

    /// Client reading everything from `IFTHENPAY_*` environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(CredentialResolver::from_env())
    }

    /// Client reading from `registry` first, then the environment.
    pub fn from_registry(registry: Registry) -> ClientResult<Self> {
        Self::new(CredentialResolver::new(registry))
    }
}

impl<T: Transport> IfthenpayClient<T> {
    pub fn with_transport(transport: T, resolver: CredentialResolver) -> Self {
        Self {
            transport,
            resolver,
        }
    }

    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send an already validated and augmented request and classify the
    /// answer. `path` may differ from `op.path` when it embeds a key.
    async fn execute(
        &self,
        op: &Operation,
        path: &str,
        request: &RequestMap,
    ) -> ClientResult<Outcome<(DomainStatus, Payload)>> {
        let url = format!("{}{}", self.resolver.api_endpoint(), path);
        let raw = self.transport.send(op.method, &url, request).await;

        let normalized = normalize(&raw).map_err(|e| {
            error!("{}: {}", op.name, e);
            e
        })?;

        let outcome = op.table.classify(normalized);
        match &outcome {
            Outcome::Success((status, _)) => info!("{} succeeded: status={}", op.name, status),
            Outcome::Failure(failure) => warn!(
                "{} failed ({:?}): {}",
                op.name, failure.kind, failure.message
            ),
        }
        Ok(outcome)
    }
}

fn order_id(request: &RequestMap) -> String {
    request
        .get("orderid")
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .unwrap_or_default()
}

#[async_trait]
impl<T: Transport> PaymentGateway for IfthenpayClient<T> {
    async fn create_multibanco_reference(
        &self,
        mut request: RequestMap,
    ) -> ClientResult<Outcome<MultibancoReference>> {
        let op = &MULTIBANCO_REFERENCE_OP;
        validate(&request, op.required)?;
        request.insert("mbkey", self.resolver.resolve_key(MB_KEY)?);

        info!("Creating Multibanco reference: orderid={}", order_id(&request));

        let outcome = self.execute(op, op.path, &request).await?;
        Ok(outcome.map(|(status, payload)| MultibancoReference::from_payload(status, payload)))
    }

    async fn init_credit_card(
        &self,
        mut request: RequestMap,
    ) -> ClientResult<Outcome<CreditCardPayment>> {
        let op = &CREDIT_CARD_INIT_OP;
        validate(&request, op.required)?;
        let key = self.resolver.resolve_key(CCARD_KEY)?;
        request.insert("successurl", self.resolver.resolve_callback(CCARD_SUCCESS_URL)?);
        request.insert("errorurl", self.resolver.resolve_callback(CCARD_ERROR_URL)?);
        request.insert("cancelurl", self.resolver.resolve_callback(CCARD_CANCEL_URL)?);

        info!("Starting credit card payment: orderid={}", order_id(&request));

        let path = format!("{}/{}", op.path, key);
        let outcome = self.execute(op, &path, &request).await?;
        Ok(outcome.map(|(status, payload)| CreditCardPayment::from_payload(status, payload)))
    }

    async fn init_mbway(&self, mut request: RequestMap) -> ClientResult<Outcome<MbwayPayment>> {
        let op = &MBWAY_INIT_OP;
        validate(&request, op.required)?;
        request.insert("mbwaykey", self.resolver.resolve_key(MBWAY_KEY)?);

        info!("Starting MB WAY payment: orderid={}", order_id(&request));

        let outcome = self.execute(op, op.path, &request).await?;
        Ok(outcome.map(|(status, payload)| MbwayPayment::from_payload(status, payload)))
    }

    async fn mbway_status(&self, mut request: RequestMap) -> ClientResult<Outcome<MbwayStatus>> {
        let op = &MBWAY_STATUS_OP;
        validate(&request, op.required)?;
        request.insert("mbwaykey", self.resolver.resolve_key(MBWAY_KEY)?);

        info!("Querying MB WAY payment status: orderid={}", order_id(&request));

        let outcome = self.execute(op, op.path, &request).await?;
        Ok(outcome.map(|(status, payload)| MbwayStatus::from_payload(status, payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, API_ENDPOINT};
    use crate::error::ClientError;
    use crate::payments::outcome::{Failure, FailureKind};
    use crate::transport::{RawResponse, TransportFailure};
    use std::sync::{Arc, Mutex};

    /// Records every call and answers with a canned response.
    struct RecordingTransport {
        response: RawResponse,
        calls: Mutex<Vec<(HttpMethod, String, RequestMap)>>,
    }

    impl RecordingTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self::with_response(RawResponse::Completed {
                status,
                body: body.as_bytes().to_vec(),
            })
        }

        fn with_response(response: RawResponse) -> Self {
            Self {
                response,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(HttpMethod, String, RequestMap)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, method: HttpMethod, url: &str, request: &RequestMap) -> RawResponse {
            self.calls
                .lock()
                .unwrap()
                .push((method, url.to_string(), request.clone()));
            self.response.clone()
        }
    }

    fn configured() -> Registry {
        Registry::new()
            .with(API_ENDPOINT, "https://gw.test/api/")
            .with(MB_KEY, "MB-KEY")
            .with(CCARD_KEY, "CC-KEY")
            .with(MBWAY_KEY, "MBW-KEY")
            .with(CCARD_SUCCESS_URL, "https://shop.test/ok")
            .with(CCARD_ERROR_URL, "https://shop.test/err")
            .with(CCARD_CANCEL_URL, "https://shop.test/cancel")
    }

    // Registry only, so nothing in the test process environment leaks in.
    fn client(transport: RecordingTransport, registry: Registry) -> IfthenpayClient<RecordingTransport> {
        let sources: Vec<Arc<dyn ConfigSource>> = vec![Arc::new(registry)];
        IfthenpayClient::with_transport(transport, CredentialResolver::from_sources(sources))
    }

    #[tokio::test]
    async fn test_multibanco_success() {
        let transport = RecordingTransport::replying(
            200,
            r#"{"Status":"0","Entity":"11200","Reference":"000000291","Amount":"10","RequestId":"abc"}"#,
        );
        let client = client(transport, configured());

        let request = RequestMap::new().with("orderid", "123456").with("amount", 10);
        let record = client
            .create_multibanco_reference(request)
            .await
            .unwrap()
            .success()
            .unwrap();

        assert_eq!(record.status, DomainStatus::Confirmed);
        assert_eq!(record.entity.as_deref(), Some("11200"));
        assert_eq!(record.reference.as_deref(), Some("000000291"));
        assert_eq!(record.payload.text("status").as_deref(), Some("confirmed"));
        assert_eq!(record.payload.text("requestid").as_deref(), Some("abc"));

        let calls = client.transport().calls();
        assert_eq!(calls.len(), 1);
        let (method, url, sent) = &calls[0];
        assert_eq!(*method, HttpMethod::Post);
        assert_eq!(url, "https://gw.test/api/multibanco/reference/init");
        assert_eq!(sent.get("mbkey").and_then(|v| v.as_str()), Some("MB-KEY"));
        assert_eq!(sent.get("orderid").and_then(|v| v.as_str()), Some("123456"));
    }

    #[tokio::test]
    async fn test_multibanco_business_failure() {
        let transport = RecordingTransport::replying(200, r#"{"Status":"9","Message":"Not Authorized."}"#);
        let client = client(transport, configured());

        let outcome = client
            .create_multibanco_reference(RequestMap::new().with("orderid", "1").with("amount", 10))
            .await
            .unwrap();

        assert_eq!(
            outcome.failure(),
            Some(&Failure::new(FailureKind::Gateway, "Not Authorized."))
        );
    }

    #[tokio::test]
    async fn test_missing_field_makes_no_network_call() {
        let client = client(RecordingTransport::replying(200, "{}"), configured());

        let err = client
            .init_mbway(RequestMap::new().with("orderid", "1").with("amount", 5))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::missing_field("mobilenumber"));

        let err = client
            .create_multibanco_reference(RequestMap::new().with("amount", 5))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::missing_field("orderid"));

        let err = client.mbway_status(RequestMap::new()).await.unwrap_err();
        assert!(err.is_validation());

        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_validation_runs_before_credential_lookup() {
        let client = client(RecordingTransport::replying(200, "{}"), Registry::new());
        let err = client
            .init_credit_card(RequestMap::new().with("orderid", "1"))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::missing_field("amount"));
    }

    #[tokio::test]
    async fn test_missing_wallet_key_is_configuration_error() {
        let client = client(RecordingTransport::replying(200, r#"{"Status":"000"}"#), Registry::new());

        let err = client
            .init_mbway(
                RequestMap::new()
                    .with("orderid", "1")
                    .with("amount", 5)
                    .with("mobilenumber", "912345678"),
            )
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::authentication(MBWAY_KEY));
        assert!(err.is_configuration());
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_callback_is_configuration_error() {
        let registry = configured();
        registry.remove(CCARD_ERROR_URL);
        let client = client(RecordingTransport::replying(200, r#"{"Status":"0"}"#), registry);

        let err = client
            .init_credit_card(RequestMap::new().with("orderid", "1").with("amount", 5))
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::callback_missing(CCARD_ERROR_URL));
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_credit_card_injects_key_in_path_and_callbacks() {
        let transport = RecordingTransport::replying(
            200,
            r#"{"Status":"0","PaymentUrl":"https://pay.test/cc/1","RequestId":"r-1","Message":"Success"}"#,
        );
        let client = client(transport, configured());

        let record = client
            .init_credit_card(
                RequestMap::new()
                    .with("orderid", "7")
                    .with("amount", "12.50")
                    .with("successurl", "https://attacker.test"),
            )
            .await
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(record.payment_url.as_deref(), Some("https://pay.test/cc/1"));

        let calls = client.transport().calls();
        let (_, url, sent) = &calls[0];
        assert_eq!(url, "https://gw.test/api/creditcard/init/CC-KEY");
        assert_eq!(sent.get("successurl").and_then(|v| v.as_str()), Some("https://shop.test/ok"));
        assert_eq!(sent.get("errorurl").and_then(|v| v.as_str()), Some("https://shop.test/err"));
        assert_eq!(sent.get("cancelurl").and_then(|v| v.as_str()), Some("https://shop.test/cancel"));
    }

    #[tokio::test]
    async fn test_credit_card_unauthorized() {
        let client = client(RecordingTransport::replying(200, r#"{"Status":"-1"}"#), configured());
        let outcome = client
            .init_credit_card(RequestMap::new().with("orderid", "7").with("amount", 1))
            .await
            .unwrap();
        assert_eq!(outcome.failure().map(|f| f.message.as_str()), Some("Unauthorized."));
    }

    #[tokio::test]
    async fn test_mbway_init_declined_is_failure() {
        let client = client(RecordingTransport::replying(200, r#"{"Status":"122"}"#), configured());
        let outcome = client
            .init_mbway(
                RequestMap::new()
                    .with("orderid", "1")
                    .with("amount", 5)
                    .with("mobilenumber", "351#912345678"),
            )
            .await
            .unwrap();
        assert_eq!(outcome.failure().map(|f| f.message.as_str()), Some("Declined."));
    }

    #[tokio::test]
    async fn test_mbway_status_declined_is_success() {
        let client = client(RecordingTransport::replying(200, r#"{"Status":"122"}"#), configured());
        let record = client
            .mbway_status(RequestMap::new().with("orderid", "1"))
            .await
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(record.status, DomainStatus::Declined);

        let calls = client.transport().calls();
        let (method, url, sent) = &calls[0];
        assert_eq!(*method, HttpMethod::Get);
        assert_eq!(url, "https://gw.test/api/spg/payment/mbway/status");
        assert_eq!(sent.get("mbwaykey").and_then(|v| v.as_str()), Some("MBW-KEY"));
    }

    #[tokio::test]
    async fn test_network_failure_is_transport_outcome() {
        let transport = RecordingTransport::with_response(RawResponse::Failed(TransportFailure::new("timeout")));
        let client = client(transport, configured());

        let outcome = client
            .mbway_status(RequestMap::new().with("orderid", "1"))
            .await
            .unwrap();
        assert_eq!(
            outcome.failure(),
            Some(&Failure::new(FailureKind::Transport, "network error: timeout"))
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let client = client(RecordingTransport::replying(502, "Bad Gateway"), configured());
        let err = client
            .mbway_status(RequestMap::new().with("orderid", "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }
}
