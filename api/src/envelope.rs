//! The `{get, parameters, errors, results, paging, response}` wrapper that
//! every API-Football endpoint returns.

use crate::error::{errors_empty, ApiError, ApiResult};
use crate::raw::Raw;
use serde_json::Value;

/// Pagination block. Only the `players` endpoint pages in practice; every
/// other endpoint reports (or omits) `1/1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub current: u32,
    pub total: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self { current: 1, total: 1 }
    }
}

/// Extract the records of an envelope.
///
/// A truthy `results` means `response` must be present: an array yields its
/// items, a single object (team statistics) yields a one-element vector. A
/// falsy `results` with a non-empty `errors` is an upstream failure; with an
/// empty `errors` it simply means nothing matched.
pub fn unwrap(envelope: &Value) -> ApiResult<Vec<Value>> {
    let raw = Raw::new(envelope);

    if raw.get("results").is_truthy() {
        return match envelope.get("response") {
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(Value::Null) | None => Err(ApiError::Contract(
                "envelope reports results but has no response".into(),
            )),
            Some(other) => Ok(vec![other.clone()]),
        };
    }

    match envelope.get("errors") {
        Some(errors) if !errors_empty(errors) => Err(ApiError::from_errors(errors)),
        _ => Ok(Vec::new()),
    }
}

pub fn paging(envelope: &Value) -> Paging {
    let block = Raw::new(envelope).get("paging");
    let defaults = Paging::default();
    Paging {
        current: block.get("current").u32().unwrap_or(defaults.current),
        total: block.get("total").u32().unwrap_or(defaults.total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_response_yields_items() {
        let env = json!({"results": 2, "errors": [], "response": [{"a": 1}, {"a": 2}]});
        let items = unwrap(&env).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["a"], 2);
    }

    #[test]
    fn object_response_yields_single_record() {
        let env = json!({"results": 11, "errors": [], "response": {"form": "WWDL"}});
        let items = unwrap(&env).unwrap();
        assert_eq!(items, vec![json!({"form": "WWDL"})]);
    }

    #[test]
    fn missing_response_is_a_contract_violation() {
        let env = json!({"results": 3, "errors": []});
        let err = unwrap(&env).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn empty_result_without_errors_is_not_an_error() {
        let env = json!({"results": 0, "errors": [], "response": []});
        assert!(unwrap(&env).unwrap().is_empty());

        let env = json!({"results": 0, "errors": {}});
        assert!(unwrap(&env).unwrap().is_empty());
    }

    #[test]
    fn empty_result_with_errors_is_classified() {
        let env = json!({"results": 0, "errors": {"token": "Error/Missing application key."}, "response": []});
        assert!(matches!(unwrap(&env), Err(ApiError::Authentication { .. })));
    }

    #[test]
    fn paging_defaults_to_single_page() {
        assert_eq!(paging(&json!({})), Paging { current: 1, total: 1 });
        assert_eq!(
            paging(&json!({"paging": {"current": 2, "total": 9}})),
            Paging { current: 2, total: 9 }
        );
    }
}
