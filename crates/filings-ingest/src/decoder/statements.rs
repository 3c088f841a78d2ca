//! PRE, REN and CAL decoders

use super::fields::Row;
use super::DecodeError;
use crate::models::{Calculation, EntityKind, Presentation, Rendering};

pub fn decode_presentation(tokens: &[&str]) -> Result<Presentation, DecodeError> {
    let row = Row::new(EntityKind::Presentation, tokens, EntityKind::Presentation.columns())?;
    Ok(Presentation {
        adsh: row.text(0),
        report: row.int(1, "report"),
        line: row.int(2, "line"),
        stmt: row.text(3),
        inpth: row.text(4),
        tag: row.text(5),
        version: row.text(6),
        prole: row.text(7),
        plabel: row.text(8),
        negating: row.flag(9, "1"),
    })
}

pub fn decode_rendering(tokens: &[&str]) -> Result<Rendering, DecodeError> {
    let row = Row::new(EntityKind::Rendering, tokens, EntityKind::Rendering.columns())?;
    Ok(Rendering {
        adsh: row.text(0),
        report: row.text(1),
        rfile: row.text(2),
        menucat: row.opt_text(3),
        shortname: row.text(4),
        longname: row.text(5),
        roleuri: row.opt_text(6),
        parentroleuri: row.opt_text(7),
        parentreport: row.opt_text(8),
        ultparentrpt: row.opt_text(9),
    })
}

pub fn decode_calculation(tokens: &[&str]) -> Result<Calculation, DecodeError> {
    let row = Row::new(EntityKind::Calculation, tokens, EntityKind::Calculation.columns())?;
    Ok(Calculation {
        adsh: row.text(0),
        grp: row.int(1, "grp"),
        arc: row.int(2, "arc"),
        // Weight of the arc, published as -1 or 1
        negative: row.flag(3, "-1"),
        ptag: row.text(4),
        pversion: row.text(5),
        ctag: row.text(6),
        cversion: row.text(7),
    })
}
