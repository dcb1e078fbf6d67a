//! Domain-level result types
//!
//! Each successful operation yields a typed record. The commonly used fields
//! are pulled out of the normalized payload; the full payload (with `status`
//! already replaced by the domain symbol) stays available for anything else
//! the gateway sends.

use crate::payments::normalize::Payload;
use serde::Serialize;
use std::fmt;

/// Status symbol substituted for the gateway's raw code on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Confirmed,
    Paid,
    Rejected,
    Expired,
    Declined,
}

impl DomainStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DomainStatus::Confirmed => "confirmed",
            DomainStatus::Paid => "paid",
            DomainStatus::Rejected => "rejected",
            DomainStatus::Expired => "expired",
            DomainStatus::Declined => "declined",
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multibanco reference the customer pays at an ATM or home banking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultibancoReference {
    pub status: DomainStatus,
    pub entity: Option<String>,
    pub reference: Option<String>,
    pub amount: Option<String>,
    pub request_id: Option<String>,
    pub expiry_date: Option<String>,
    pub payload: Payload,
}

impl MultibancoReference {
    pub fn from_payload(status: DomainStatus, payload: Payload) -> Self {
        Self {
            status,
            entity: payload.text("entity"),
            reference: payload.text("reference"),
            amount: payload.text("amount"),
            request_id: payload.text("requestid"),
            expiry_date: payload.text("expirydate"),
            payload,
        }
    }
}

/// Card payment created; the customer must be redirected to `payment_url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditCardPayment {
    pub status: DomainStatus,
    pub payment_url: Option<String>,
    pub request_id: Option<String>,
    pub payload: Payload,
}

impl CreditCardPayment {
    pub fn from_payload(status: DomainStatus, payload: Payload) -> Self {
        Self {
            status,
            payment_url: payload.text("paymenturl"),
            request_id: payload.text("requestid"),
            payload,
        }
    }
}

/// MB WAY push notification sent to the customer's phone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MbwayPayment {
    pub status: DomainStatus,
    pub request_id: Option<String>,
    pub amount: Option<String>,
    pub order_id: Option<String>,
    pub message: Option<String>,
    pub payload: Payload,
}

impl MbwayPayment {
    pub fn from_payload(status: DomainStatus, payload: Payload) -> Self {
        Self {
            status,
            request_id: payload.text("requestid"),
            amount: payload.text("amount"),
            order_id: payload.text("orderid"),
            message: payload.message(),
            payload,
        }
    }
}

/// Current state of an MB WAY payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MbwayStatus {
    pub status: DomainStatus,
    pub request_id: Option<String>,
    pub message: Option<String>,
    pub payload: Payload,
}

impl MbwayStatus {
    pub fn from_payload(status: DomainStatus, payload: Payload) -> Self {
        Self {
            status,
            request_id: payload.text("requestid"),
            message: payload.message(),
            payload,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == DomainStatus::Paid
    }
}
