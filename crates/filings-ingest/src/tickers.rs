//! Ticker feed parsing
//!
//! The feed is a JSON object keyed by a running index:
//!
//! ```json
//! {"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::decoder::normalize_cik;
use crate::error::Result;
use crate::models::Ticker;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CikValue {
    Number(u64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    cik_str: CikValue,
    ticker: String,
    title: String,
}

/// Parse the ticker feed into records ordered by feed index.
///
/// The CIK is rendered as decimal text without zero padding so it joins
/// against submission CIKs.
pub fn parse_tickers(bytes: &[u8]) -> Result<Vec<Ticker>> {
    let feed: BTreeMap<String, FeedEntry> = serde_json::from_slice(bytes)?;

    let mut entries: Vec<(String, FeedEntry)> = feed.into_iter().collect();
    // Numeric keys in numeric order, anything else after them
    entries.sort_by_cached_key(|(key, _)| (key.parse::<u64>().unwrap_or(u64::MAX), key.clone()));

    Ok(entries
        .into_iter()
        .map(|(_, entry)| Ticker {
            cik: match entry.cik_str {
                CikValue::Number(n) => n.to_string(),
                CikValue::Text(text) => normalize_cik(text.trim()),
            },
            ticker: entry.ticker,
            name: entry.title,
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::IngestError;

    #[test]
    fn test_parse_tickers_in_index_order() {
        let feed = br#"{
            "10": {"cik_str": 1018724, "ticker": "AMZN", "title": "AMAZON COM INC"},
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "2": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
        }"#;
        let tickers = parse_tickers(feed).unwrap();
        let symbols: Vec<_> = tickers.iter().map(|t| t.ticker.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "AMZN"]);
        assert_eq!(
            tickers[0],
            Ticker {
                cik: "320193".to_string(),
                ticker: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
            }
        );
    }

    #[test]
    fn test_padded_text_cik_is_normalized() {
        let feed = br#"{"0": {"cik_str": "0000320193", "ticker": "AAPL", "title": "Apple Inc."}}"#;
        let tickers = parse_tickers(feed).unwrap();
        assert_eq!(tickers[0].cik, "320193");
    }

    #[test]
    fn test_zero_cik_matches_submission_rendering() {
        let feed = br#"{
            "0": {"cik_str": 0, "ticker": "A", "title": "Numeric"},
            "1": {"cik_str": "0000000000", "ticker": "B", "title": "Padded"}
        }"#;
        let tickers = parse_tickers(feed).unwrap();
        assert_eq!(tickers[0].cik, "0");
        assert_eq!(tickers[1].cik, "0");
        assert_eq!(tickers[0].cik, normalize_cik("0000000000"));
    }

    #[test]
    fn test_empty_feed() {
        assert!(parse_tickers(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_feed() {
        assert!(matches!(parse_tickers(b"[1, 2]"), Err(IngestError::Json(_))));
        assert!(matches!(
            parse_tickers(br#"{"0": {"ticker": "AAPL"}}"#),
            Err(IngestError::Json(_))
        ));
    }
}
