//! Market quote returned by the upstream price API.

use rust_decimal::Decimal;

use crate::cache::CacheKey;

/// Buy/sell prices for one Steam market item.
///
/// A quote is never mutated after it is fetched; a refresh produces a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub app_id: String,
    pub market_hash_name: String,
    /// Highest outstanding buy order, in currency units
    pub highest_buy_order: Decimal,
    /// Lowest outstanding sell order, in currency units
    pub lowest_sell_order: Decimal,
}

impl Quote {
    /// Creates a quote for `key` with the given prices.
    pub fn new(key: &CacheKey, highest_buy_order: Decimal, lowest_sell_order: Decimal) -> Self {
        Self {
            app_id: key.app_id().to_string(),
            market_hash_name: key.market_hash_name().to_string(),
            highest_buy_order,
            lowest_sell_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_takes_key_fields() {
        let key = CacheKey::new("730", "AK-47 | Redline (Field-Tested)");
        let quote = Quote::new(&key, dec!(5.67), dec!(6.12));

        assert_eq!(quote.app_id, "730");
        assert_eq!(quote.market_hash_name, "AK-47 | Redline (Field-Tested)");
        assert_eq!(quote.highest_buy_order, dec!(5.67));
    }
}
