//! SQLite destination store
//!
//! Every batch is one transaction holding one or more multi-row `INSERT`
//! statements. Statements are split so no single one binds more than
//! [`SQLITE_MAX_PARAMS`] values.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::query_builder::Separated;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{QueryBuilder, Sqlite, Transaction};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use super::tables::{columns, create_table_sql};
use super::{check_batch_kind, FilingStore};
use crate::error::{IngestError, Result};
use crate::models::{
    Calculation, Dimension, EntityKind, NumericFact, Presentation, Record, Rendering, Submission,
    Tag, TextFact, Ticker,
};
use crate::pipeline::ensure_destination_absent;

/// Bound parameter limit of the bundled SQLite
pub const SQLITE_MAX_PARAMS: usize = 32_766;

/// SQLite-backed [`FilingStore`]
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new database file at `path`.
    ///
    /// Fails with [`IngestError::DestinationExists`] if the file is already
    /// there; runs only ever build a fresh database.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        ensure_destination_absent(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "Created destination database");
        Ok(Self { pool })
    }

    /// Private in-memory database
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // The database lives exactly as long as its single connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl FilingStore for SqliteStore {
    async fn create_schema(&self, kinds: &[EntityKind]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for &kind in kinds {
            for statement in create_table_sql(kind) {
                sqlx::query(&statement).execute(&mut *tx).await?;
            }
            debug!(kind = %kind, table = kind.table_name(), "Created table");
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert_batch(&self, kind: EntityKind, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        check_batch_kind(kind, records)?;

        let mut tx = self.pool.begin().await?;
        match kind {
            EntityKind::Submission => insert_rows::<Submission>(&mut tx, records).await?,
            EntityKind::Tag => insert_rows::<Tag>(&mut tx, records).await?,
            EntityKind::Dimension => insert_rows::<Dimension>(&mut tx, records).await?,
            EntityKind::Numeric => insert_rows::<NumericFact>(&mut tx, records).await?,
            EntityKind::Text => insert_rows::<TextFact>(&mut tx, records).await?,
            EntityKind::Presentation => insert_rows::<Presentation>(&mut tx, records).await?,
            EntityKind::Rendering => insert_rows::<Rendering>(&mut tx, records).await?,
            EntityKind::Calculation => insert_rows::<Calculation>(&mut tx, records).await?,
            EntityKind::Ticker => insert_rows::<Ticker>(&mut tx, records).await?,
        }
        tx.commit().await?;

        debug!(kind = %kind, records = records.len(), "Inserted batch");
        Ok(())
    }

    async fn count(&self, kind: EntityKind) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table_name());
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }
}

fn insert_prefix(kind: EntityKind) -> String {
    let names = columns(kind)
        .iter()
        .map(|column| format!("\"{}\"", column.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {} ({}) ", kind.table_name(), names)
}

async fn insert_rows<T: SqliteRow>(
    tx: &mut Transaction<'_, Sqlite>,
    records: &[Record],
) -> Result<()> {
    let rows = records
        .iter()
        .map(|record| {
            T::from_record(record).ok_or(IngestError::RecordKindMismatch {
                expected: T::KIND,
                actual: record.kind(),
            })
        })
        .collect::<Result<Vec<&T>>>()?;

    let rows_per_statement = (SQLITE_MAX_PARAMS / columns(T::KIND).len()).max(1);
    let prefix = insert_prefix(T::KIND);

    for chunk in rows.chunks(rows_per_statement) {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(prefix.as_str());
        query_builder.push_values(chunk.iter().copied(), |mut b, row| row.bind(&mut b));
        query_builder.build().execute(&mut **tx).await?;
    }

    Ok(())
}

fn decimal_text(value: &Option<BigDecimal>) -> Option<String> {
    value.as_ref().map(BigDecimal::to_string)
}

/// A record type with a destination table
trait SqliteRow: Sync {
    const KIND: EntityKind;

    fn from_record(record: &Record) -> Option<&Self>;

    /// Bind every column in [`columns`] order
    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>);
}

impl SqliteRow for Submission {
    const KIND: EntityKind = EntityKind::Submission;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Submission(sub) => Some(sub),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.adsh.as_str())
            .push_bind(self.cik.as_str())
            .push_bind(self.name.as_str())
            .push_bind(self.sic.as_str())
            .push_bind(self.countryba.as_str())
            .push_bind(self.stprba.as_deref())
            .push_bind(self.cityba.as_str())
            .push_bind(self.zipba.as_deref())
            .push_bind(self.bas1.as_deref())
            .push_bind(self.bas2.as_deref())
            .push_bind(self.baph.as_deref())
            .push_bind(self.countryma.as_deref())
            .push_bind(self.stprma.as_deref())
            .push_bind(self.cityma.as_deref())
            .push_bind(self.zipma.as_deref())
            .push_bind(self.mas1.as_deref())
            .push_bind(self.mas2.as_deref())
            .push_bind(self.countryinc.as_str())
            .push_bind(self.stprinc.as_deref())
            .push_bind(self.ein.as_deref())
            .push_bind(self.former.as_deref())
            .push_bind(self.changed.as_deref())
            .push_bind(self.afs.as_deref())
            .push_bind(self.wksi)
            .push_bind(self.fye.as_str())
            .push_bind(self.form.as_str())
            .push_bind(self.period.as_str())
            .push_bind(self.fy.as_str())
            .push_bind(self.fp.as_str())
            .push_bind(self.filed.as_str())
            .push_bind(self.accepted.as_str())
            .push_bind(self.prevrpt)
            .push_bind(self.detail)
            .push_bind(self.instance.as_str())
            .push_bind(self.nciks)
            .push_bind(self.aciks.as_deref())
            .push_bind(decimal_text(&self.pubfloatusd))
            .push_bind(self.floatdate.as_deref())
            .push_bind(self.floataxis.as_deref())
            .push_bind(self.floatmems);
    }
}

impl SqliteRow for Tag {
    const KIND: EntityKind = EntityKind::Tag;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.tag.as_str())
            .push_bind(self.version.as_str())
            .push_bind(self.custom)
            .push_bind(self.is_abstract)
            .push_bind(self.datatype.as_deref())
            .push_bind(self.iord.as_deref())
            .push_bind(self.crdr.as_deref())
            .push_bind(self.tlabel.as_deref())
            .push_bind(self.doc.as_deref());
    }
}

impl SqliteRow for Dimension {
    const KIND: EntityKind = EntityKind::Dimension;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Dimension(dim) => Some(dim),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.dimh.as_str())
            .push_bind(self.segments.as_str())
            .push_bind(self.segt);
    }
}

impl SqliteRow for NumericFact {
    const KIND: EntityKind = EntityKind::Numeric;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Numeric(num) => Some(num),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.adsh.as_str())
            .push_bind(self.tag.as_str())
            .push_bind(self.version.as_str())
            .push_bind(self.ddate.as_str())
            .push_bind(self.qtrs)
            .push_bind(self.uom.as_str())
            .push_bind(self.dimh.as_str())
            .push_bind(self.iprx)
            .push_bind(decimal_text(&self.value))
            .push_bind(self.footnote.as_deref())
            .push_bind(self.footlen)
            .push_bind(self.dimn)
            .push_bind(self.coreg.as_deref())
            .push_bind(decimal_text(&self.durp))
            .push_bind(decimal_text(&self.datp))
            .push_bind(self.dcml);
    }
}

impl SqliteRow for TextFact {
    const KIND: EntityKind = EntityKind::Text;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Text(txt) => Some(txt),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.adsh.as_str())
            .push_bind(self.tag.as_str())
            .push_bind(self.version.as_str())
            .push_bind(self.ddate.as_str())
            .push_bind(self.qtrs)
            .push_bind(self.iprx)
            .push_bind(self.lang.as_str())
            .push_bind(self.dcml)
            .push_bind(decimal_text(&self.durp))
            .push_bind(decimal_text(&self.datp))
            .push_bind(self.dimh.as_str())
            .push_bind(self.dimn)
            .push_bind(self.coreg.as_deref())
            .push_bind(self.escaped)
            .push_bind(self.srclen)
            .push_bind(self.txtlen)
            .push_bind(self.footnote.as_deref())
            .push_bind(self.footlen)
            .push_bind(self.context.as_str())
            .push_bind(self.value.as_deref());
    }
}

impl SqliteRow for Presentation {
    const KIND: EntityKind = EntityKind::Presentation;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Presentation(pre) => Some(pre),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.adsh.as_str())
            .push_bind(self.report)
            .push_bind(self.line)
            .push_bind(self.stmt.as_str())
            .push_bind(self.inpth.as_str())
            .push_bind(self.tag.as_str())
            .push_bind(self.version.as_str())
            .push_bind(self.prole.as_str())
            .push_bind(self.plabel.as_str())
            .push_bind(self.negating);
    }
}

impl SqliteRow for Rendering {
    const KIND: EntityKind = EntityKind::Rendering;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Rendering(ren) => Some(ren),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.adsh.as_str())
            .push_bind(self.report.as_str())
            .push_bind(self.rfile.as_str())
            .push_bind(self.menucat.as_deref())
            .push_bind(self.shortname.as_str())
            .push_bind(self.longname.as_str())
            .push_bind(self.roleuri.as_deref())
            .push_bind(self.parentroleuri.as_deref())
            .push_bind(self.parentreport.as_deref())
            .push_bind(self.ultparentrpt.as_deref());
    }
}

impl SqliteRow for Calculation {
    const KIND: EntityKind = EntityKind::Calculation;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Calculation(cal) => Some(cal),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.adsh.as_str())
            .push_bind(self.grp)
            .push_bind(self.arc)
            .push_bind(self.negative)
            .push_bind(self.ptag.as_str())
            .push_bind(self.pversion.as_str())
            .push_bind(self.ctag.as_str())
            .push_bind(self.cversion.as_str());
    }
}

impl SqliteRow for Ticker {
    const KIND: EntityKind = EntityKind::Ticker;

    fn from_record(record: &Record) -> Option<&Self> {
        match record {
            Record::Ticker(ticker) => Some(ticker),
            _ => None,
        }
    }

    fn bind<'a>(&'a self, b: &mut Separated<'_, 'a, Sqlite, &'static str>) {
        b.push_bind(self.cik.as_str())
            .push_bind(self.ticker.as_str())
            .push_bind(self.name.as_str());
    }
}
