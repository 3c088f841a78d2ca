//! Shared fixtures for the ingestion integration tests
//!
//! Builds a small quarterly archive in memory and serves it, together with a
//! ticker feed, from a wiremock server.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const ARCHIVE_PATH: &str = "/files/dera/data/financial-statement-data-sets/2021q1.zip";
pub const TICKERS_PATH: &str = "/files/company_tickers.json";

pub const SUB_TSV: &str = concat!(
    "adsh\tcik\tname\tsic\tcountryba\tstprba\tcityba\tzipba\tbas1\tbas2\tbaph\tcountryma\t",
    "stprma\tcityma\tzipma\tmas1\tmas2\tcountryinc\tstprinc\tein\tformer\tchanged\tafs\twksi\t",
    "fye\tform\tperiod\tfy\tfp\tfiled\taccepted\tprevrpt\tdetail\tinstance\tnciks\taciks\t",
    "pubfloatusd\tfloatdate\tfloataxis\tfloatmems\n",
    "0000320193-21-000010\t0000320193\tAPPLE INC\t3571\tUS\tCA\tCUPERTINO\t95014\t",
    "ONE APPLE PARK WAY\t\t(408) 996-1010\tUS\tCA\tCUPERTINO\t95014\tONE APPLE PARK WAY\t\t",
    "US\tCA\t942404110\tAPPLE COMPUTER INC\t19970808\t1-LAF\t0\t0925\t10-Q\t20201231\t2021\t",
    "Q1\t20210128\t2021-01-28 18:04:00.0\t0\t1\taapl-20201226_htm.xml\t1\t\t\t\t\t\n",
);

pub const DIM_TSV: &str = concat!(
    "dimh\tsegments\tsegt\n",
    "a1b2c3d4e5f60718293a4b5c6d7e8f90\tLegalEntity=Xyz;\t0\n",
    "0x00000000\t\t0\n",
);

pub const NUM_TSV: &str = concat!(
    "adsh\ttag\tversion\tddate\tqtrs\tuom\tdimh\tiprx\tvalue\tfootnote\tfootlen\tdimn\tcoreg\t",
    "durp\tdatp\tdcml\n",
    "0000320193-21-000010\tAssets\tus-gaap/2020\t20201231\t0\tUSD\t0x00000000\t0\t",
    "354054000000\t\t\t0\t\t0.0\t-0.0027\t-6\n",
    "0000320193-21-000010\tEarningsPerShareBasic\tus-gaap/2020\t20201231\t1\tUSD/shares\t",
    "0x00000000\t0\t1.704999\t\t\t0\t\t0.0109\t-0.0054\t2\n",
    "0000320193-21-000010\tLiabilities\tus-gaap/2020\t20201231\t0\tUSD\t0x00000000\t0\t",
    "\tRestated\t8\t0\t\t0.0\t-0.0027\t-6\r\n",
);

pub const TAG_TSV: &str = "tag\tversion\tcustom\tabstract\tdatatype\tiord\tcrdr\ttlabel\tdoc\n";

// Final row has no trailing line feed
pub const CAL_TSV: &str = concat!(
    "adsh\tgrp\tarc\tnegative\tptag\tpversion\tctag\tcversion\n",
    "0000320193-21-000010\t3\t2\t-1\tGrossProfit\tus-gaap/2020\t",
    "CostOfGoodsAndServicesSold\tus-gaap/2020",
);

pub const TICKERS_JSON: &str = r#"{
    "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
    "1": {"cik_str": 789019, "ticker": "MSFT", "title": "MICROSOFT CORP"}
}"#;

/// Zip archive with five data set tables, an unrelated entry and a directory
pub fn quarter_archive() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let entries = [
        ("sub.tsv", SUB_TSV),
        ("readme.htm", "<html><body>Financial Statement Data Sets</body></html>"),
        ("dim.tsv", DIM_TSV),
        ("num.tsv", NUM_TSV),
        ("tag.tsv", TAG_TSV),
        ("cal.tsv", CAL_TSV),
    ];
    writer.add_directory("notes/", options).unwrap();
    for (name, contents) in entries {
        writer.start_file(name, options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Serve the archive and the ticker feed; each is expected to be fetched
/// exactly once
pub async fn mock_publisher() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ARCHIVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(quarter_archive()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(TICKERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(TICKERS_JSON))
        .expect(1)
        .mount(&server)
        .await;

    server
}

pub fn archive_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), ARCHIVE_PATH)
}

pub fn tickers_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), TICKERS_PATH)
}
