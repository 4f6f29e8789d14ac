use serde::{Deserialize, Serialize};

use super::constant::PRICE_REFRESH_TTL_MS;

/// USD quote as cached by the price service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub usd_price: f64,
    /// Unix time in milliseconds of the last refresh
    pub last_updated: i64,
}

impl Price {
    /// A cached quote is fresh while it is at most `PRICE_REFRESH_TTL_MS` old.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.last_updated >= now_ms - PRICE_REFRESH_TTL_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1_000_000, 1_000_000, true)]
    #[case(1_000_000, 1_600_000, true)]
    #[case(1_000_000, 1_600_001, false)]
    fn freshness_follows_the_ttl(#[case] last_updated: i64, #[case] now: i64, #[case] fresh: bool) {
        let price = Price { usd_price: 3000.0, last_updated };
        assert_eq!(price.is_fresh(now), fresh);
    }
}
