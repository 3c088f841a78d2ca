//! SUB decoder

use super::fields::Row;
use super::DecodeError;
use crate::models::{EntityKind, Submission};

/// Strip zero padding from a CIK token.
///
/// An all-zero token renders as `0`, the same text the ticker feed's numeric
/// CIK produces, so the two tables still join on it.
pub fn normalize_cik(token: &str) -> String {
    let trimmed = token.trim_start_matches('0');
    if trimmed.is_empty() && !token.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn decode_submission(tokens: &[&str]) -> Result<Submission, DecodeError> {
    let row = Row::new(EntityKind::Submission, tokens, EntityKind::Submission.columns())?;
    Ok(Submission {
        adsh: row.text(0),
        cik: normalize_cik(row.str(1)),
        name: row.text(2),
        sic: row.text(3),
        countryba: row.text(4),
        stprba: row.opt_text(5),
        cityba: row.text(6),
        zipba: row.opt_text(7),
        bas1: row.opt_text(8),
        bas2: row.opt_text(9),
        baph: row.opt_text(10),
        countryma: row.opt_text(11),
        stprma: row.opt_text(12),
        cityma: row.opt_text(13),
        zipma: row.opt_text(14),
        mas1: row.opt_text(15),
        mas2: row.opt_text(16),
        countryinc: row.text(17),
        stprinc: row.opt_text(18),
        ein: row.opt_text(19),
        former: row.opt_text(20),
        changed: row.opt_text(21),
        afs: row.opt_text(22),
        wksi: row.flag(23, "1"),
        fye: row.text(24),
        form: row.text(25),
        period: row.text(26),
        fy: row.text(27),
        fp: row.text(28),
        filed: row.text(29),
        accepted: row.text(30),
        prevrpt: row.flag(31, "1"),
        detail: row.flag(32, "1"),
        instance: row.text(33),
        nciks: row.int(34, "nciks"),
        aciks: row.opt_text(35),
        pubfloatusd: row.decimal(36, "pubfloatusd"),
        floatdate: row.opt_text(37),
        floataxis: row.opt_text(38),
        floatmems: row.opt_int(39, "floatmems"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn apple_10q() -> Vec<&'static str> {
        vec![
            "0000320193-21-000010",
            "0000320193",
            "APPLE INC",
            "3571",
            "US",
            "CA",
            "CUPERTINO",
            "95014",
            "ONE APPLE PARK WAY",
            "",
            "(408) 996-1010",
            "US",
            "CA",
            "CUPERTINO",
            "95014",
            "ONE APPLE PARK WAY",
            "",
            "US",
            "CA",
            "942404110",
            "APPLE COMPUTER INC",
            "19970808",
            "1-LAF",
            "0",
            "0925",
            "10-Q",
            "20201231",
            "2021",
            "Q1",
            "20210128",
            "2021-01-28 18:04:00.0",
            "0",
            "1",
            "aapl-20201226_htm.xml",
            "1",
            "",
            "",
            "",
            "",
            "",
        ]
    }

    #[test]
    fn test_normalize_cik() {
        assert_eq!(normalize_cik("0000320193"), "320193");
        assert_eq!(normalize_cik("320193"), "320193");
        assert_eq!(normalize_cik("0000000000"), "0");
        assert_eq!(normalize_cik(""), "");
    }

    #[test]
    fn test_decode_submission() {
        let tokens = apple_10q();
        let sub = decode_submission(&tokens).unwrap();
        assert_eq!(sub.adsh, "0000320193-21-000010");
        assert_eq!(sub.cik, "320193");
        assert_eq!(sub.name, "APPLE INC");
        assert_eq!(sub.stprba.as_deref(), Some("CA"));
        assert_eq!(sub.bas2, None);
        assert_eq!(sub.former.as_deref(), Some("APPLE COMPUTER INC"));
        assert_eq!(sub.afs.as_deref(), Some("1-LAF"));
        assert!(!sub.wksi);
        assert!(!sub.prevrpt);
        assert!(sub.detail);
        assert_eq!(sub.form, "10-Q");
        assert_eq!(sub.fp, "Q1");
        assert_eq!(sub.nciks, 1);
        assert_eq!(sub.aciks, None);
        assert_eq!(sub.pubfloatusd, None);
        assert_eq!(sub.floatmems, None);
    }

    #[test]
    fn test_decode_submission_public_float() {
        let mut tokens = apple_10q();
        tokens[36] = "2000000000000.00";
        tokens[37] = "20200331";
        tokens[39] = "2";
        let sub = decode_submission(&tokens).unwrap();
        assert_eq!(
            sub.pubfloatusd,
            Some(BigDecimal::from_str("2000000000000.00").unwrap())
        );
        assert_eq!(sub.floatdate.as_deref(), Some("20200331"));
        assert_eq!(sub.floatmems, Some(2));
    }

    #[test]
    fn test_decode_submission_bad_counts_are_substituted() {
        let mut tokens = apple_10q();
        tokens[34] = "";
        tokens[39] = "many";
        let sub = decode_submission(&tokens).unwrap();
        assert_eq!(sub.nciks, -1);
        assert_eq!(sub.floatmems, Some(0));
    }

    fn fully_populated() -> Vec<&'static str> {
        let mut tokens = apple_10q();
        tokens[9] = "SUITE 100";
        tokens[16] = "SUITE 100";
        tokens[35] = "0001234567";
        tokens[36] = "2000000000000.00";
        tokens[37] = "20200331";
        tokens[38] = "us-gaap_StatementClassOfStockAxis";
        tokens[39] = "2";
        tokens
    }

    #[test]
    fn test_every_optional_column_may_be_empty() {
        let optional: [(usize, fn(&Submission) -> bool); 21] = [
            (5, |s| s.stprba.is_none()),
            (7, |s| s.zipba.is_none()),
            (8, |s| s.bas1.is_none()),
            (9, |s| s.bas2.is_none()),
            (10, |s| s.baph.is_none()),
            (11, |s| s.countryma.is_none()),
            (12, |s| s.stprma.is_none()),
            (13, |s| s.cityma.is_none()),
            (14, |s| s.zipma.is_none()),
            (15, |s| s.mas1.is_none()),
            (16, |s| s.mas2.is_none()),
            (18, |s| s.stprinc.is_none()),
            (19, |s| s.ein.is_none()),
            (20, |s| s.former.is_none()),
            (21, |s| s.changed.is_none()),
            (22, |s| s.afs.is_none()),
            (35, |s| s.aciks.is_none()),
            (36, |s| s.pubfloatusd.is_none()),
            (37, |s| s.floatdate.is_none()),
            (38, |s| s.floataxis.is_none()),
            (39, |s| s.floatmems.is_none()),
        ];

        let full = decode_submission(&fully_populated()).unwrap();
        for (column, is_absent) in optional {
            assert!(!is_absent(&full), "column {} present in the full row", column);

            let mut tokens = fully_populated();
            tokens[column] = "";
            let sub = decode_submission(&tokens).unwrap();
            assert!(is_absent(&sub), "empty column {} decodes as absent", column);
            assert_eq!(decode_submission(&tokens).unwrap(), sub);
        }
    }

    #[test]
    fn test_decode_submission_short_row() {
        let tokens = apple_10q();
        let err = decode_submission(&tokens[..39]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ShortRow {
                kind: EntityKind::Submission,
                expected: 40,
                actual: 39
            }
        );
    }
}
