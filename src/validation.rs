//! Input checks shared by every menu and order operation.
//!
//! They are pure functions, run before the store is touched.

use crate::errors::{Error, Result};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static RECORD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("record id pattern is valid"));

/// Identifier of a stored record: 24 hexadecimal characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a new random identifier for a record about to be created
    pub fn generate() -> RecordId {
        let mut rng = rand::thread_rng();
        let bytes: [u8; 12] = rng.gen();
        RecordId(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        validate_id(s)
    }
}

/// Check that a client supplied identifier is well formed
pub fn validate_id(id: &str) -> Result<RecordId> {
    if RECORD_ID.is_match(id) {
        Ok(RecordId(id.to_ascii_lowercase()))
    } else {
        Err(Error::BadRequest("id is invalid".to_string()))
    }
}

/// Check that a quantity can be stored on an order line. Any non-negative count is accepted.
pub fn validate_quantity(quantity: i64) -> Result<i64> {
    if quantity < 0 {
        return Err(invalid_quantity());
    }
    Ok(quantity)
}

/// Extract a quantity from a JSON value.
///
/// Integers are taken as is, floats only when they hold a whole value in the `i64` range.
pub fn quantity_from_json(value: Option<&serde_json::Value>) -> Result<i64> {
    value
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().and_then(whole_number)))
        .ok_or_else(invalid_quantity)
}

fn whole_number(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which no longer fits
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

fn invalid_quantity() -> Error {
    Error::BadRequest("quantity is invalid".to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("66e0cb8332a8fb1c7597e252").is_ok());
        assert_eq!(
            validate_id("66E0CB8332A8FB1C7597E252").unwrap().as_str(),
            "66e0cb8332a8fb1c7597e252"
        );

        for bad in ["", "aa", "not-an-id", "66e0cb8332a8fb1c7597e25", "66e0cb8332a8fb1c7597e25z"] {
            match validate_id(bad) {
                Err(Error::BadRequest(msg)) => assert_eq!(msg, "id is invalid"),
                other => panic!("unexpected result for {:?}: {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_generated_ids_are_valid() {
        for _ in 0..100 {
            let id = RecordId::generate();
            assert_eq!(validate_id(id.as_str()).unwrap(), id);
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(0).unwrap(), 0);
        assert_eq!(validate_quantity(12).unwrap(), 12);
        assert!(matches!(validate_quantity(-1), Err(Error::BadRequest(_))));
        assert_eq!(validate_quantity(5_000_000_000).unwrap(), 5_000_000_000);
        assert_eq!(validate_quantity(i64::MAX).unwrap(), i64::MAX);
    }

    #[test]
    fn test_quantity_from_json() {
        assert_eq!(quantity_from_json(Some(&json!(3))).unwrap(), 3);
        assert_eq!(quantity_from_json(Some(&json!(-3))).unwrap(), -3);
        assert!(quantity_from_json(Some(&json!("3"))).is_err());
        assert_eq!(quantity_from_json(Some(&json!(2.0))).unwrap(), 2);
        assert_eq!(quantity_from_json(Some(&json!(5_000_000_000u64))).unwrap(), 5_000_000_000);
        assert!(quantity_from_json(Some(&json!(1.5))).is_err());
        assert!(quantity_from_json(Some(&json!(1e300))).is_err());
        assert!(quantity_from_json(Some(&json!(u64::MAX))).is_err());
        assert!(quantity_from_json(Some(&json!(null))).is_err());
        assert!(quantity_from_json(None).is_err());
    }
}
