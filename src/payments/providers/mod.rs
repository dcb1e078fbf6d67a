//! Payment gateway implementations
//!
//! Concrete implementations of the PaymentGateway trait.

pub mod ifthenpay;

pub use ifthenpay::IfthenpayClient;
