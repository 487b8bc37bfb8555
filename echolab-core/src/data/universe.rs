//! The asset universe: short asset codes mapped to provider tickers.
//!
//! Queries address assets by short code (`NQ`, `ES`, `YM`); the provider
//! wants the continuous-futures ticker (`NQ=F`, ...). Unknown codes pass
//! through unchanged so any Yahoo ticker can be cached under its own name.

/// A tradable asset known to the default universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Short code used in queries and cache partitions.
    pub code: &'static str,
    /// Provider ticker.
    pub ticker: &'static str,
    /// Display name.
    pub name: &'static str,
}

/// Index futures shipped by default.
pub const DEFAULT_UNIVERSE: &[Asset] = &[
    Asset {
        code: "NQ",
        ticker: "NQ=F",
        name: "NASDAQ 100 E-Mini",
    },
    Asset {
        code: "ES",
        ticker: "ES=F",
        name: "S&P 500 E-Mini",
    },
    Asset {
        code: "YM",
        ticker: "YM=F",
        name: "Dow Jones Mini",
    },
];

/// Resolve an asset code to its provider ticker. Codes outside the default
/// universe are used verbatim.
pub fn provider_ticker(code: &str) -> String {
    let upper = code.to_ascii_uppercase();
    DEFAULT_UNIVERSE
        .iter()
        .find(|a| a.code == upper)
        .map(|a| a.ticker.to_string())
        .unwrap_or(upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_futures_tickers() {
        assert_eq!(provider_ticker("NQ"), "NQ=F");
        assert_eq!(provider_ticker("es"), "ES=F");
    }

    #[test]
    fn unknown_codes_pass_through_uppercased() {
        assert_eq!(provider_ticker("spy"), "SPY");
    }
}
