//! Field coercions shared by every table decoder
//!
//! Three outcomes exist for a numeric token and they stay separate until the
//! column's rule collapses them:
//!
//! | token       | required int | optional int | decimal        |
//! |-------------|--------------|--------------|----------------|
//! | empty       | `-1`         | `None`       | `None`         |
//! | parsable    | value        | `Some(v)`    | `Some(v)`      |
//! | unparsable  | `0` + warn   | `Some(0)` + warn | `None` + warn |
//!
//! The collapsed value of a required integer cannot tell a published `-1` or
//! `0` from the empty/unparsable cases; only the raw token can.

use bigdecimal::BigDecimal;
use std::str::FromStr;
use tracing::warn;

use super::DecodeError;
use crate::models::EntityKind;

/// Value returned by a required integer column for an empty token
pub const EMPTY_INT_SENTINEL: i64 = -1;

/// Value substituted for an unparsable integer token
pub const MALFORMED_INT_SUBSTITUTE: i64 = 0;

/// Outcome of parsing one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<T> {
    Present(T),
    Absent,
    Malformed,
}

impl<T: FromStr> Parsed<T> {
    pub fn from_token(token: &str) -> Self {
        if token.is_empty() {
            return Parsed::Absent;
        }
        match token.parse() {
            Ok(value) => Parsed::Present(value),
            Err(_) => Parsed::Malformed,
        }
    }
}

/// Positional view over one data row.
///
/// Construction checks the column count once, so the accessors can index
/// without further bounds handling.
pub struct Row<'a> {
    kind: EntityKind,
    tokens: &'a [&'a str],
}

impl<'a> Row<'a> {
    pub fn new(
        kind: EntityKind,
        tokens: &'a [&'a str],
        columns: usize,
    ) -> Result<Self, DecodeError> {
        if tokens.len() < columns {
            return Err(DecodeError::ShortRow {
                kind,
                expected: columns,
                actual: tokens.len(),
            });
        }
        Ok(Self { kind, tokens })
    }

    /// Raw token
    pub fn str(&self, index: usize) -> &'a str {
        self.tokens[index]
    }

    pub fn text(&self, index: usize) -> String {
        self.tokens[index].to_string()
    }

    /// Empty token is absent, anything else is kept verbatim
    pub fn opt_text(&self, index: usize) -> Option<String> {
        let token = self.tokens[index];
        (!token.is_empty()).then(|| token.to_string())
    }

    /// True only when the token equals `literal` exactly
    pub fn flag(&self, index: usize, literal: &str) -> bool {
        self.tokens[index] == literal
    }

    pub fn int(&self, index: usize, field: &'static str) -> i64 {
        match Parsed::<i64>::from_token(self.tokens[index]) {
            Parsed::Present(value) => value,
            Parsed::Absent => EMPTY_INT_SENTINEL,
            Parsed::Malformed => {
                self.warn_malformed(index, field, "integer");
                MALFORMED_INT_SUBSTITUTE
            },
        }
    }

    pub fn opt_int(&self, index: usize, field: &'static str) -> Option<i64> {
        match Parsed::<i64>::from_token(self.tokens[index]) {
            Parsed::Present(value) => Some(value),
            Parsed::Absent => None,
            Parsed::Malformed => {
                self.warn_malformed(index, field, "integer");
                Some(MALFORMED_INT_SUBSTITUTE)
            },
        }
    }

    pub fn decimal(&self, index: usize, field: &'static str) -> Option<BigDecimal> {
        match Parsed::<BigDecimal>::from_token(self.tokens[index]) {
            Parsed::Present(value) => Some(value),
            Parsed::Absent => None,
            Parsed::Malformed => {
                self.warn_malformed(index, field, "decimal");
                None
            },
        }
    }

    /// A decimal column that must be populated in every published row.
    ///
    /// An empty token is a format violation. An unparsable one is logged and
    /// comes back as `None`; zero is a legitimate value and is never
    /// substituted.
    pub fn required_decimal(
        &self,
        index: usize,
        field: &'static str,
    ) -> Result<Option<BigDecimal>, DecodeError> {
        if self.tokens[index].is_empty() {
            return Err(DecodeError::MissingValue {
                kind: self.kind,
                field,
            });
        }
        Ok(self.decimal(index, field))
    }

    fn warn_malformed(&self, index: usize, field: &'static str, expected: &str) {
        warn!(
            kind = %self.kind,
            field,
            column = index,
            token = self.tokens[index],
            "Cannot parse token as {}",
            expected
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn row<'a>(tokens: &'a [&'a str]) -> Row<'a> {
        Row::new(EntityKind::Numeric, tokens, tokens.len()).unwrap()
    }

    #[test]
    fn test_parsed_three_way() {
        assert_eq!(Parsed::<i64>::from_token(""), Parsed::Absent);
        assert_eq!(Parsed::<i64>::from_token("42"), Parsed::Present(42));
        assert_eq!(Parsed::<i64>::from_token("-7"), Parsed::Present(-7));
        assert_eq!(Parsed::<i64>::from_token("4.2"), Parsed::Malformed);
        assert_eq!(Parsed::<i64>::from_token(" 1"), Parsed::Malformed);
    }

    #[test]
    fn test_required_int_rules() {
        let tokens = ["", "12", "abc", "0", "-1"];
        let row = row(&tokens);
        assert_eq!(row.int(0, "a"), EMPTY_INT_SENTINEL);
        assert_eq!(row.int(1, "b"), 12);
        assert_eq!(row.int(2, "c"), MALFORMED_INT_SUBSTITUTE);
        assert_eq!(row.int(3, "d"), 0);
        assert_eq!(row.int(4, "e"), -1);
    }

    #[test]
    fn test_optional_int_rules() {
        let tokens = ["", "3", "x3"];
        let row = row(&tokens);
        assert_eq!(row.opt_int(0, "a"), None);
        assert_eq!(row.opt_int(1, "b"), Some(3));
        // Parse failures are zero, never absent
        assert_eq!(row.opt_int(2, "c"), Some(0));
    }

    #[test]
    fn test_text_rules() {
        let tokens = ["", " padded ", "x\r"];
        let row = row(&tokens);
        assert_eq!(row.opt_text(0), None);
        assert_eq!(row.opt_text(1).as_deref(), Some(" padded "));
        assert_eq!(row.text(2), "x\r");
        assert_eq!(row.text(0), "");
    }

    #[test]
    fn test_flag_literal_only() {
        let tokens = ["1", "-1", "true", "0", ""];
        let row = row(&tokens);
        assert!(row.flag(0, "1"));
        assert!(!row.flag(1, "1"));
        assert!(row.flag(1, "-1"));
        assert!(!row.flag(2, "1"));
        assert!(!row.flag(3, "1"));
        assert!(!row.flag(4, "-1"));
    }

    #[test]
    fn test_decimal_rules() {
        let tokens = ["", "0", "-0.0645", "n/a"];
        let row = row(&tokens);
        assert_eq!(row.decimal(0, "a"), None);
        assert_eq!(row.decimal(1, "b"), Some(BigDecimal::from(0)));
        assert_eq!(
            row.decimal(2, "c"),
            Some(BigDecimal::from_str("-0.0645").unwrap())
        );
        assert_eq!(row.decimal(3, "d"), None);
    }

    #[test]
    fn test_required_decimal_rules() {
        let tokens = ["", "0.3187", "bogus"];
        let row = row(&tokens);
        assert!(matches!(
            row.required_decimal(0, "durp"),
            Err(DecodeError::MissingValue { field: "durp", .. })
        ));
        assert_eq!(
            row.required_decimal(1, "durp").unwrap(),
            Some(BigDecimal::from_str("0.3187").unwrap())
        );
        assert_eq!(row.required_decimal(2, "durp").unwrap(), None);
    }

    #[test]
    fn test_short_row_rejected() {
        let tokens = ["a", "b"];
        let err = Row::new(EntityKind::Dimension, &tokens, 3).err().unwrap();
        assert_eq!(
            err,
            DecodeError::ShortRow {
                kind: EntityKind::Dimension,
                expected: 3,
                actual: 2
            }
        );
    }
}
