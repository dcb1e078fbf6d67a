//! Required-field checks, run before any credential lookup or network call.

use crate::error::{ClientError, ClientResult};
use crate::payments::request::RequestMap;

/// Fails on the first field in `required` (in order) that `request` lacks.
pub fn validate(request: &RequestMap, required: &[&str]) -> ClientResult<()> {
    match required.iter().find(|field| !request.contains(field)) {
        Some(field) => Err(ClientError::missing_field(*field)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_all_present() {
        let request = RequestMap::new()
            .with("orderid", "1")
            .with("amount", 5)
            .with("extra", "x");
        assert!(validate(&request, &["orderid", "amount"]).is_ok());
    }

    #[test]
    fn test_reports_first_missing_in_order() {
        let request = RequestMap::new().with("orderid", "1");
        assert_eq!(
            validate(&request, &["orderid", "amount", "mobilenumber"]),
            Err(ClientError::missing_field("amount"))
        );
        assert_eq!(
            validate(&request, &["mobilenumber", "amount"]),
            Err(ClientError::missing_field("mobilenumber"))
        );
    }

    #[test]
    fn test_null_value_is_missing() {
        let request = RequestMap::new()
            .with("orderid", "1")
            .with("amount", Value::Null);
        assert_eq!(
            validate(&request, &["orderid", "amount"]),
            Err(ClientError::missing_field("amount"))
        );
    }

    #[test]
    fn test_nothing_required() {
        assert!(validate(&RequestMap::new(), &[]).is_ok());
    }
}
