//! Destination table layouts
//!
//! Column order matches the published column order of each table, so the
//! loaded tables read the same as the source files. Decimal columns are
//! `TEXT` holding the exact decimal rendering.

use crate::models::EntityKind;

/// One destination column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableColumn {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
}

const fn required(name: &'static str, sql_type: &'static str) -> TableColumn {
    TableColumn {
        name,
        sql_type,
        nullable: false,
    }
}

const fn optional(name: &'static str, sql_type: &'static str) -> TableColumn {
    TableColumn {
        name,
        sql_type,
        nullable: true,
    }
}

const SUB_COLUMNS: [TableColumn; 40] = [
    required("adsh", "TEXT"),
    required("cik", "TEXT"),
    required("name", "TEXT"),
    required("sic", "TEXT"),
    required("countryba", "TEXT"),
    optional("stprba", "TEXT"),
    required("cityba", "TEXT"),
    optional("zipba", "TEXT"),
    optional("bas1", "TEXT"),
    optional("bas2", "TEXT"),
    optional("baph", "TEXT"),
    optional("countryma", "TEXT"),
    optional("stprma", "TEXT"),
    optional("cityma", "TEXT"),
    optional("zipma", "TEXT"),
    optional("mas1", "TEXT"),
    optional("mas2", "TEXT"),
    required("countryinc", "TEXT"),
    optional("stprinc", "TEXT"),
    optional("ein", "TEXT"),
    optional("former", "TEXT"),
    optional("changed", "TEXT"),
    optional("afs", "TEXT"),
    required("wksi", "INTEGER"),
    required("fye", "TEXT"),
    required("form", "TEXT"),
    required("period", "TEXT"),
    required("fy", "TEXT"),
    required("fp", "TEXT"),
    required("filed", "TEXT"),
    required("accepted", "TEXT"),
    required("prevrpt", "INTEGER"),
    required("detail", "INTEGER"),
    required("instance", "TEXT"),
    required("nciks", "INTEGER"),
    optional("aciks", "TEXT"),
    optional("pubfloatusd", "TEXT"),
    optional("floatdate", "TEXT"),
    optional("floataxis", "TEXT"),
    optional("floatmems", "INTEGER"),
];

const TAG_COLUMNS: [TableColumn; 9] = [
    required("tag", "TEXT"),
    required("version", "TEXT"),
    required("custom", "INTEGER"),
    required("abstract", "INTEGER"),
    optional("datatype", "TEXT"),
    optional("iord", "TEXT"),
    optional("crdr", "TEXT"),
    optional("tlabel", "TEXT"),
    optional("doc", "TEXT"),
];

const DIM_COLUMNS: [TableColumn; 3] = [
    required("dimh", "TEXT"),
    required("segments", "TEXT"),
    required("segt", "INTEGER"),
];

const NUM_COLUMNS: [TableColumn; 16] = [
    required("adsh", "TEXT"),
    required("tag", "TEXT"),
    required("version", "TEXT"),
    required("ddate", "TEXT"),
    required("qtrs", "INTEGER"),
    required("uom", "TEXT"),
    required("dimh", "TEXT"),
    required("iprx", "INTEGER"),
    optional("value", "TEXT"),
    optional("footnote", "TEXT"),
    required("footlen", "INTEGER"),
    required("dimn", "INTEGER"),
    optional("coreg", "TEXT"),
    optional("durp", "TEXT"),
    optional("datp", "TEXT"),
    required("dcml", "INTEGER"),
];

const TXT_COLUMNS: [TableColumn; 20] = [
    required("adsh", "TEXT"),
    required("tag", "TEXT"),
    required("version", "TEXT"),
    required("ddate", "TEXT"),
    required("qtrs", "INTEGER"),
    required("iprx", "INTEGER"),
    required("lang", "TEXT"),
    required("dcml", "INTEGER"),
    optional("durp", "TEXT"),
    optional("datp", "TEXT"),
    required("dimh", "TEXT"),
    optional("dimn", "INTEGER"),
    optional("coreg", "TEXT"),
    required("escaped", "INTEGER"),
    required("srclen", "INTEGER"),
    optional("txtlen", "INTEGER"),
    optional("footnote", "TEXT"),
    optional("footlen", "INTEGER"),
    required("context", "TEXT"),
    optional("value", "TEXT"),
];

const PRE_COLUMNS: [TableColumn; 10] = [
    required("adsh", "TEXT"),
    required("report", "INTEGER"),
    required("line", "INTEGER"),
    required("stmt", "TEXT"),
    required("inpth", "TEXT"),
    required("tag", "TEXT"),
    required("version", "TEXT"),
    required("prole", "TEXT"),
    required("plabel", "TEXT"),
    required("negating", "INTEGER"),
];

const REN_COLUMNS: [TableColumn; 10] = [
    required("adsh", "TEXT"),
    required("report", "TEXT"),
    required("rfile", "TEXT"),
    optional("menucat", "TEXT"),
    required("shortname", "TEXT"),
    required("longname", "TEXT"),
    optional("roleuri", "TEXT"),
    optional("parentroleuri", "TEXT"),
    optional("parentreport", "TEXT"),
    optional("ultparentrpt", "TEXT"),
];

const CAL_COLUMNS: [TableColumn; 8] = [
    required("adsh", "TEXT"),
    required("grp", "INTEGER"),
    required("arc", "INTEGER"),
    required("negative", "INTEGER"),
    required("ptag", "TEXT"),
    required("pversion", "TEXT"),
    required("ctag", "TEXT"),
    required("cversion", "TEXT"),
];

const TICKER_COLUMNS: [TableColumn; 3] = [
    required("cik", "TEXT"),
    required("ticker", "TEXT"),
    required("name", "TEXT"),
];

/// Columns of the destination table for `kind`, in insert order
pub fn columns(kind: EntityKind) -> &'static [TableColumn] {
    match kind {
        EntityKind::Submission => &SUB_COLUMNS,
        EntityKind::Tag => &TAG_COLUMNS,
        EntityKind::Dimension => &DIM_COLUMNS,
        EntityKind::Numeric => &NUM_COLUMNS,
        EntityKind::Text => &TXT_COLUMNS,
        EntityKind::Presentation => &PRE_COLUMNS,
        EntityKind::Rendering => &REN_COLUMNS,
        EntityKind::Calculation => &CAL_COLUMNS,
        EntityKind::Ticker => &TICKER_COLUMNS,
    }
}

/// Identity columns, indexed for lookups
pub fn key_columns(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Submission => &["adsh"],
        EntityKind::Tag => &["tag", "version"],
        EntityKind::Dimension => &["dimh"],
        EntityKind::Numeric => &["adsh", "tag", "version", "ddate", "qtrs", "uom", "dimh", "iprx"],
        EntityKind::Text => &["adsh", "tag", "version", "ddate", "qtrs", "iprx"],
        EntityKind::Presentation => &["adsh", "report", "line"],
        EntityKind::Rendering => &["adsh", "report"],
        EntityKind::Calculation => &["adsh", "grp", "arc"],
        EntityKind::Ticker => &["cik"],
    }
}

/// `CREATE TABLE` and `CREATE INDEX` statements for `kind`
pub fn create_table_sql(kind: EntityKind) -> Vec<String> {
    let table = kind.table_name();
    let definitions = columns(kind)
        .iter()
        .map(|column| {
            if column.nullable {
                format!("    \"{}\" {}", column.name, column.sql_type)
            } else {
                format!("    \"{}\" {} NOT NULL", column.name, column.sql_type)
            }
        })
        .collect::<Vec<_>>()
        .join(",\n");

    let keys = key_columns(kind)
        .iter()
        .map(|name| format!("\"{}\"", name))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n)", table, definitions),
        format!("CREATE INDEX IF NOT EXISTS idx_{}_key ON {} ({})", table, table, keys),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_counts_match_published_layouts() {
        for kind in EntityKind::ARCHIVE_KINDS {
            assert_eq!(columns(kind).len(), kind.columns(), "{}", kind);
        }
        assert_eq!(columns(EntityKind::Ticker).len(), 3);
    }

    #[test]
    fn test_key_columns_exist() {
        for kind in EntityKind::ALL {
            for key in key_columns(kind) {
                assert!(
                    columns(kind).iter().any(|column| column.name == *key),
                    "{} has no column {}",
                    kind,
                    key
                );
            }
        }
    }

    #[test]
    fn test_create_table_sql() {
        let statements = create_table_sql(EntityKind::Dimension);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS data_dims ("));
        assert!(statements[0].contains("\"segt\" INTEGER NOT NULL"));
        assert_eq!(
            statements[1],
            "CREATE INDEX IF NOT EXISTS idx_data_dims_key ON data_dims (\"dimh\")"
        );
    }

    #[test]
    fn test_reserved_words_are_quoted() {
        let statements = create_table_sql(EntityKind::Tag);
        assert!(statements[0].contains("\"abstract\" INTEGER NOT NULL"));
        let statements = create_table_sql(EntityKind::Numeric);
        assert!(statements[0].contains("\"value\" TEXT,"));
    }
}
