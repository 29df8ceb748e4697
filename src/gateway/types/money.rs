//! Amount input type for API boundary enforcement

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request amount, accepted as a JSON string (`"12.50"`) or number (`12.5`).
///
/// Strings are format-checked before parsing: no leading or trailing dot,
/// no exponent, no explicit sign. Sign, zero and precision rules are enforced
/// by the services so every entry point reports them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl std::ops::Deref for StrictDecimal {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn parse_amount_str(s: &str) -> Result<Decimal, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("amount cannot be empty".to_string());
    }
    if s.starts_with('.') || s.ends_with('.') {
        return Err(format!("invalid amount format: {}", s));
    }
    if s.contains(['e', 'E']) {
        return Err("invalid amount format: scientific notation not allowed".to_string());
    }
    if s.starts_with('+') {
        return Err("invalid amount format: + prefix not allowed".to_string());
    }
    Decimal::from_str(s).map_err(|e| format!("invalid amount: {}", e))
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalOrString {
            String(String),
            Number(serde_json::Number),
        }

        let decimal = match DecimalOrString::deserialize(deserializer)? {
            DecimalOrString::String(s) => parse_amount_str(&s),
            DecimalOrString::Number(n) => parse_amount_str(&n.to_string()),
        }
        .map_err(D::Error::custom)?;

        Ok(StrictDecimal(decimal))
    }
}

impl Serialize for StrictDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}
