//! Currency exchange response.

use rust_decimal::Decimal;
use serde::Deserialize;

/// The result of converting an amount between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExchangeResult {
    /// The converted amount.
    pub result: Decimal,
    #[serde(default)]
    pub info: Option<ExchangeInfo>,
}

/// Rate metadata attached to a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExchangeInfo {
    /// The rate that was applied.
    pub rate: Decimal,
}

impl ExchangeResult {
    /// The applied rate, if the API reported one.
    #[must_use]
    pub fn rate(&self) -> Option<Decimal> {
        self.info.as_ref().map(|info| info.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_conversion_response() {
        let json = r#"{"success": true, "query": {"from": "USD", "to": "EUR", "amount": 10},
                       "info": {"rate": 0.92}, "result": 9.2}"#;
        let exchange: ExchangeResult = serde_json::from_str(json).expect("valid exchange JSON");
        assert_eq!(exchange.result, Decimal::new(92, 1));
        assert_eq!(exchange.rate(), Some(Decimal::new(92, 2)));
    }
}
