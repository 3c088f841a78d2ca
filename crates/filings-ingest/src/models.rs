//! Record types for the financial statement data sets
//!
//! One flat struct per published table. Optional columns are `Option`, so an
//! empty source token stays distinguishable from zero or an empty string.
//! Monetary values and precision fractions use [`BigDecimal`]; nothing here is
//! ever a binary float.

use bigdecimal::BigDecimal;
use std::fmt;

/// The tables carried by a quarterly archive, plus the separately loaded
/// ticker lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Submission,
    Tag,
    Dimension,
    Numeric,
    Text,
    Presentation,
    Rendering,
    Calculation,
    Ticker,
}

impl EntityKind {
    /// Kinds that appear as entries inside a data set archive
    pub const ARCHIVE_KINDS: [EntityKind; 8] = [
        EntityKind::Submission,
        EntityKind::Tag,
        EntityKind::Dimension,
        EntityKind::Numeric,
        EntityKind::Text,
        EntityKind::Presentation,
        EntityKind::Rendering,
        EntityKind::Calculation,
    ];

    /// Every kind the destination store holds
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Submission,
        EntityKind::Tag,
        EntityKind::Dimension,
        EntityKind::Numeric,
        EntityKind::Text,
        EntityKind::Presentation,
        EntityKind::Rendering,
        EntityKind::Calculation,
        EntityKind::Ticker,
    ];

    /// Entry name inside the archive, `None` for the ticker table
    pub fn entry_name(self) -> Option<&'static str> {
        match self {
            EntityKind::Submission => Some("sub.tsv"),
            EntityKind::Tag => Some("tag.tsv"),
            EntityKind::Dimension => Some("dim.tsv"),
            EntityKind::Numeric => Some("num.tsv"),
            EntityKind::Text => Some("txt.tsv"),
            EntityKind::Presentation => Some("pre.tsv"),
            EntityKind::Rendering => Some("ren.tsv"),
            EntityKind::Calculation => Some("cal.tsv"),
            EntityKind::Ticker => None,
        }
    }

    /// Resolve an archive entry name to its table.
    ///
    /// Only the final path component is compared, and the comparison is exact:
    /// the published names are lowercase and anything else is skipped.
    pub fn from_entry_name(name: &str) -> Option<Self> {
        let file_name = name.rsplit('/').next().unwrap_or(name);
        Self::ARCHIVE_KINDS
            .into_iter()
            .find(|kind| kind.entry_name() == Some(file_name))
    }

    /// Destination table name
    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Submission => "data_subs",
            EntityKind::Tag => "data_tags",
            EntityKind::Dimension => "data_dims",
            EntityKind::Numeric => "data_nums",
            EntityKind::Text => "data_txts",
            EntityKind::Presentation => "data_pres",
            EntityKind::Rendering => "data_rens",
            EntityKind::Calculation => "data_cals",
            EntityKind::Ticker => "data_tickers",
        }
    }

    /// Short code used in logs, e.g. `SUB`
    pub fn code(self) -> &'static str {
        match self {
            EntityKind::Submission => "SUB",
            EntityKind::Tag => "TAG",
            EntityKind::Dimension => "DIM",
            EntityKind::Numeric => "NUM",
            EntityKind::Text => "TXT",
            EntityKind::Presentation => "PRE",
            EntityKind::Rendering => "REN",
            EntityKind::Calculation => "CAL",
            EntityKind::Ticker => "TICKER",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One submission (filing), keyed by accession number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Accession number, 20 characters
    pub adsh: String,
    /// Registrant CIK with leading zeros removed
    pub cik: String,
    pub name: String,
    /// Standard Industrial Classification code
    pub sic: String,
    pub countryba: String,
    pub stprba: Option<String>,
    pub cityba: String,
    pub zipba: Option<String>,
    pub bas1: Option<String>,
    pub bas2: Option<String>,
    pub baph: Option<String>,
    pub countryma: Option<String>,
    pub stprma: Option<String>,
    pub cityma: Option<String>,
    pub zipma: Option<String>,
    pub mas1: Option<String>,
    pub mas2: Option<String>,
    pub countryinc: String,
    pub stprinc: Option<String>,
    pub ein: Option<String>,
    pub former: Option<String>,
    pub changed: Option<String>,
    /// Filer status (1-LAF, 2-ACC, 3-SRA, 4-NON, 5-SML), absent when unassigned
    pub afs: Option<String>,
    /// Well-known seasoned issuer
    pub wksi: bool,
    pub fye: String,
    pub form: String,
    pub period: String,
    pub fy: String,
    pub fp: String,
    pub filed: String,
    pub accepted: String,
    /// Submission was amended before the data set cutoff
    pub prevrpt: bool,
    /// Footnotes and schedules are tagged at the detail level
    pub detail: bool,
    pub instance: String,
    pub nciks: i64,
    /// Space separated co-registrant CIKs; may end in `PARTIAL`
    pub aciks: Option<String>,
    pub pubfloatusd: Option<BigDecimal>,
    pub floatdate: Option<String>,
    pub floataxis: Option<String>,
    pub floatmems: Option<i64>,
}

/// A taxonomy element definition.
///
/// `version` is the defining accession number for custom tags and a taxonomy
/// identifier (e.g. `us-gaap/2021`) for standard ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub tag: String,
    pub version: String,
    pub custom: bool,
    pub is_abstract: bool,
    pub datatype: Option<String>,
    /// `I` for point in time, `D` for duration
    pub iord: Option<String>,
    /// Natural balance, debit or credit
    pub crdr: Option<String>,
    pub tlabel: Option<String>,
    pub doc: Option<String>,
}

/// Axis/member qualifiers attached to facts, keyed by `dimh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// 32 hex character MD5 of `segments`
    pub dimh: String,
    /// `Axis=Member;` pairs in lexical axis order, at most 1024 characters
    pub segments: String,
    /// `segments` was truncated
    pub segt: bool,
}

/// A numeric fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericFact {
    pub adsh: String,
    pub tag: String,
    pub version: String,
    /// Period end date rounded to a month end, `YYYYMMDD`
    pub ddate: String,
    /// Duration in quarters, 0 for point in time
    pub qtrs: i64,
    pub uom: String,
    pub dimh: String,
    /// Priority among facts sharing the rest of the key; 1 is preferred
    pub iprx: i64,
    /// Reported value rounded to four fractional digits, absent when nil
    pub value: Option<BigDecimal>,
    pub footnote: Option<String>,
    pub footlen: i64,
    pub dimn: i64,
    pub coreg: Option<String>,
    /// Duration deviation from `qtrs` as a fraction in [-1, 1]
    pub durp: Option<BigDecimal>,
    /// Date deviation from `ddate` as a fraction in [-1, 1]
    pub datp: Option<BigDecimal>,
    /// `decimals` attribute, INF encoded as 32767
    pub dcml: i64,
}

/// A text fact, same key shape as [`NumericFact`] without the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFact {
    pub adsh: String,
    pub tag: String,
    pub version: String,
    pub ddate: String,
    pub qtrs: i64,
    pub iprx: i64,
    pub lang: String,
    /// Language preference score, en-US encoded as 32767
    pub dcml: i64,
    pub durp: Option<BigDecimal>,
    pub datp: Option<BigDecimal>,
    pub dimh: String,
    pub dimn: Option<i64>,
    pub coreg: Option<String>,
    /// Markup was stripped from the value
    pub escaped: bool,
    pub srclen: i64,
    pub txtlen: Option<i64>,
    pub footnote: Option<String>,
    pub footlen: Option<i64>,
    pub context: String,
    pub value: Option<String>,
}

/// Placement of a tag on a rendered statement line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub adsh: String,
    pub report: i64,
    pub line: i64,
    /// Statement code: BS, IS, CF, EQ, CI, CP, UN
    pub stmt: String,
    pub inpth: String,
    pub tag: String,
    pub version: String,
    pub prole: String,
    pub plabel: String,
    pub negating: bool,
}

/// Metadata about one rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub adsh: String,
    pub report: String,
    /// `H` for .htm, `X` for .xml
    pub rfile: String,
    pub menucat: Option<String>,
    pub shortname: String,
    pub longname: String,
    pub roleuri: Option<String>,
    pub parentroleuri: Option<String>,
    pub parentreport: Option<String>,
    pub ultparentrpt: Option<String>,
}

/// A weighted parent/child arc in a calculation graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    pub adsh: String,
    pub grp: i64,
    pub arc: i64,
    /// Arc weight is -1 rather than +1
    pub negative: bool,
    pub ptag: String,
    pub pversion: String,
    pub ctag: String,
    pub cversion: String,
}

/// Ticker symbol to registrant mapping from the ticker feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    /// CIK rendered without leading zeros, matching [`Submission::cik`]
    pub cik: String,
    pub ticker: String,
    pub name: String,
}

/// A decoded row of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Submission(Submission),
    Tag(Tag),
    Dimension(Dimension),
    Numeric(NumericFact),
    Text(TextFact),
    Presentation(Presentation),
    Rendering(Rendering),
    Calculation(Calculation),
    Ticker(Ticker),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Submission(_) => EntityKind::Submission,
            Record::Tag(_) => EntityKind::Tag,
            Record::Dimension(_) => EntityKind::Dimension,
            Record::Numeric(_) => EntityKind::Numeric,
            Record::Text(_) => EntityKind::Text,
            Record::Presentation(_) => EntityKind::Presentation,
            Record::Rendering(_) => EntityKind::Rendering,
            Record::Calculation(_) => EntityKind::Calculation,
            Record::Ticker(_) => EntityKind::Ticker,
        }
    }
}
