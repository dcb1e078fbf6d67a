//! Outcome mapping
//!
//! The gateway reports business results inside the body, usually under HTTP
//! 200, using a per-endpoint vocabulary of string codes. Each operation owns
//! a [`StatusTable`] describing how those codes map to an [`Outcome`]. Any
//! code not in the table goes through the table's fallback rule.

use crate::payments::normalize::{Normalized, Payload, STATUS_FIELD};
use crate::payments::types::DomainStatus;
use serde::Serialize;
use std::fmt;

pub const UNKNOWN_ERROR: &str = "Unknown error.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "status")]
pub enum FailureKind {
    /// The HTTP exchange never completed.
    Transport,
    /// The gateway answered with a non-200 status.
    Http(u16),
    /// The gateway answered 200 but reported a failure code.
    Gateway,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Worth trying again later: network failures and 5xx answers.
    pub fn is_retryable(&self) -> bool {
        match self.kind {
            FailureKind::Transport => true,
            FailureKind::Http(status) => status >= 500,
            FailureKind::Gateway => false,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "data")]
pub enum Outcome<T> {
    Success(T),
    Failure(Failure),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

/// What a status code resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Succeed(DomainStatus),
    /// Fail with a fixed message.
    Fail(&'static str),
    /// Fail with the payload's `message`, or the given text if it has none.
    FailWithMessage(&'static str),
    /// Fail with the given prefix followed by the unrecognized code.
    FailWithCode(&'static str),
}

#[derive(Debug)]
pub struct StatusTable {
    pub entries: &'static [(&'static str, Rule)],
    pub fallback: Rule,
}

impl StatusTable {
    pub fn rule_for(&self, code: &str) -> Rule {
        self.entries
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, rule)| *rule)
            .unwrap_or(self.fallback)
    }

    /// Map a normalized response to an outcome. On success the payload's
    /// `status` is replaced by the domain symbol.
    pub fn classify(&self, normalized: Normalized) -> Outcome<(DomainStatus, Payload)> {
        let payload = match normalized {
            Normalized::Unreachable(message) => {
                return Outcome::Failure(Failure::new(FailureKind::Transport, message))
            }
            Normalized::Rejected { status, payload } => {
                let message = payload.message().unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                return Outcome::Failure(Failure::new(FailureKind::Http(status), message));
            }
            Normalized::Accepted(payload) => payload,
        };

        let Some(code) = payload.status_code() else {
            return Outcome::Failure(Failure::new(FailureKind::Gateway, UNKNOWN_ERROR));
        };

        let message = match self.rule_for(&code) {
            Rule::Succeed(status) => {
                let mut payload = payload;
                payload.insert(STATUS_FIELD, status.as_str());
                return Outcome::Success((status, payload));
            }
            Rule::Fail(text) => text.to_string(),
            Rule::FailWithMessage(fallback) => {
                payload.message().unwrap_or_else(|| fallback.to_string())
            }
            Rule::FailWithCode(prefix) => format!("{}{}", prefix, code),
        };
        Outcome::Failure(Failure::new(FailureKind::Gateway, message))
    }
}

pub static MULTIBANCO_REFERENCE: StatusTable = StatusTable {
    entries: &[("0", Rule::Succeed(DomainStatus::Confirmed))],
    fallback: Rule::FailWithMessage(UNKNOWN_ERROR),
};

pub static CREDIT_CARD_INIT: StatusTable = StatusTable {
    entries: &[
        ("0", Rule::Succeed(DomainStatus::Confirmed)),
        ("-1", Rule::Fail("Unauthorized.")),
    ],
    fallback: Rule::FailWithMessage(UNKNOWN_ERROR),
};

pub static MBWAY_INIT: StatusTable = StatusTable {
    entries: &[
        ("000", Rule::Succeed(DomainStatus::Confirmed)),
        ("122", Rule::Fail("Declined.")),
    ],
    fallback: Rule::Fail("Could not complete."),
};

// "123" (request not found) stays a failure even though the query itself
// went through.
pub static MBWAY_STATUS: StatusTable = StatusTable {
    entries: &[
        ("000", Rule::Succeed(DomainStatus::Paid)),
        ("020", Rule::Succeed(DomainStatus::Rejected)),
        ("101", Rule::Succeed(DomainStatus::Expired)),
        ("122", Rule::Succeed(DomainStatus::Declined)),
        ("123", Rule::FailWithMessage("Request not found.")),
    ],
    fallback: Rule::FailWithCode("Unknown error. Status code: "),
};
