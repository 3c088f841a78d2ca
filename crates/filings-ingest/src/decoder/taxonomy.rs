//! TAG and DIM decoders

use super::fields::Row;
use super::DecodeError;
use crate::models::{Dimension, EntityKind, Tag};

pub fn decode_tag(tokens: &[&str]) -> Result<Tag, DecodeError> {
    let row = Row::new(EntityKind::Tag, tokens, EntityKind::Tag.columns())?;
    Ok(Tag {
        tag: row.text(0),
        version: row.text(1),
        custom: row.flag(2, "1"),
        is_abstract: row.flag(3, "1"),
        datatype: row.opt_text(4),
        iord: row.opt_text(5),
        crdr: row.opt_text(6),
        tlabel: row.opt_text(7),
        doc: row.opt_text(8),
    })
}

pub fn decode_dimension(tokens: &[&str]) -> Result<Dimension, DecodeError> {
    let row = Row::new(EntityKind::Dimension, tokens, EntityKind::Dimension.columns())?;
    Ok(Dimension {
        dimh: row.text(0),
        segments: row.text(1),
        segt: row.flag(2, "1"),
    })
}
