//! NUM and TXT decoders

use bigdecimal::BigDecimal;

use super::fields::Row;
use super::DecodeError;
use crate::models::{EntityKind, NumericFact, TextFact};

/// Fractional digits kept for a numeric fact value
pub const NUM_VALUE_SCALE: i64 = 4;

fn round_value(value: BigDecimal) -> BigDecimal {
    let (_, scale) = value.as_bigint_and_exponent();
    if scale > NUM_VALUE_SCALE {
        value.round(NUM_VALUE_SCALE)
    } else {
        value
    }
}

pub fn decode_numeric(tokens: &[&str]) -> Result<NumericFact, DecodeError> {
    let row = Row::new(EntityKind::Numeric, tokens, EntityKind::Numeric.columns())?;
    Ok(NumericFact {
        adsh: row.text(0),
        tag: row.text(1),
        version: row.text(2),
        ddate: row.text(3),
        qtrs: row.int(4, "qtrs"),
        uom: row.text(5),
        dimh: row.text(6),
        iprx: row.int(7, "iprx"),
        value: row.decimal(8, "value").map(round_value),
        footnote: row.opt_text(9),
        footlen: row.int(10, "footlen"),
        dimn: row.int(11, "dimn"),
        coreg: row.opt_text(12),
        durp: row.required_decimal(13, "durp")?,
        datp: row.required_decimal(14, "datp")?,
        dcml: row.int(15, "dcml"),
    })
}

pub fn decode_text(tokens: &[&str]) -> Result<TextFact, DecodeError> {
    let row = Row::new(EntityKind::Text, tokens, EntityKind::Text.columns())?;
    Ok(TextFact {
        adsh: row.text(0),
        tag: row.text(1),
        version: row.text(2),
        ddate: row.text(3),
        qtrs: row.int(4, "qtrs"),
        iprx: row.int(5, "iprx"),
        lang: row.text(6),
        dcml: row.int(7, "dcml"),
        durp: row.required_decimal(8, "durp")?,
        datp: row.required_decimal(9, "datp")?,
        dimh: row.text(10),
        dimn: row.opt_int(11, "dimn"),
        coreg: row.opt_text(12),
        escaped: row.flag(13, "1"),
        srclen: row.int(14, "srclen"),
        txtlen: row.opt_int(15, "txtlen"),
        footnote: row.opt_text(16),
        footlen: row.opt_int(17, "footlen"),
        context: row.text(18),
        value: row.opt_text(19),
    })
}
