//! Payment gateway integration module
//!
//! Request building, response normalization and outcome mapping for the
//! ifthenpay payment methods (Multibanco, credit card, MB WAY).

pub mod normalize;
pub mod outcome;
pub mod providers;
pub mod request;
pub mod traits;
pub mod types;
pub mod validation;
