//! Row decoders for the data set tables
//!
//! Each table has a fixed positional layout. A decoder receives the
//! tab-split tokens of one data row and produces a typed [`Record`]:
//!
//! - rows with fewer tokens than the layout are rejected with
//!   [`DecodeError::ShortRow`]; extra trailing tokens are ignored
//! - bad numeric tokens are logged and substituted (see [`fields`])
//! - an empty `durp`/`datp` is a fatal [`DecodeError::MissingValue`]

pub mod fields;

mod facts;
mod statements;
mod submission;
mod taxonomy;

use thiserror::Error;

use crate::models::{EntityKind, Record};

pub use facts::{decode_numeric, decode_text, NUM_VALUE_SCALE};
pub use statements::{decode_calculation, decode_presentation, decode_rendering};
pub use submission::{decode_submission, normalize_cik};
pub use taxonomy::{decode_dimension, decode_tag};

/// Structural problems with a data row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{kind} row has {actual} columns, expected at least {expected}")]
    ShortRow {
        kind: EntityKind,
        expected: usize,
        actual: usize,
    },

    #[error("{kind} row has an empty {field} value")]
    MissingValue {
        kind: EntityKind,
        field: &'static str,
    },

    #[error("{kind} records are not read from data set archives")]
    Unsupported { kind: EntityKind },
}

impl EntityKind {
    /// Number of columns in the published layout
    pub fn columns(self) -> usize {
        match self {
            EntityKind::Submission => 40,
            EntityKind::Tag => 9,
            EntityKind::Dimension => 3,
            EntityKind::Numeric => 16,
            EntityKind::Text => 20,
            EntityKind::Presentation => 10,
            EntityKind::Rendering => 10,
            EntityKind::Calculation => 8,
            EntityKind::Ticker => 3,
        }
    }

    /// Decode one data row of this table
    pub fn decode(self, tokens: &[&str]) -> Result<Record, DecodeError> {
        match self {
            EntityKind::Submission => decode_submission(tokens).map(Record::Submission),
            EntityKind::Tag => decode_tag(tokens).map(Record::Tag),
            EntityKind::Dimension => decode_dimension(tokens).map(Record::Dimension),
            EntityKind::Numeric => decode_numeric(tokens).map(Record::Numeric),
            EntityKind::Text => decode_text(tokens).map(Record::Text),
            EntityKind::Presentation => decode_presentation(tokens).map(Record::Presentation),
            EntityKind::Rendering => decode_rendering(tokens).map(Record::Rendering),
            EntityKind::Calculation => decode_calculation(tokens).map(Record::Calculation),
            EntityKind::Ticker => Err(DecodeError::Unsupported { kind: self }),
        }
    }
}
