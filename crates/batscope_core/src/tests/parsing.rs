//! Tests for whole-file parsing
//!
//! These tests verify:
//! - Header lines populate the run metadata
//! - Malformed lines are skipped and counted without aborting
//! - Parsing the same text twice gives identical results

use std::io::Cursor;

use crate::error::SkipReason;
use crate::model::{ScalarRecord, VectorId, VectorRecord};
use crate::parser::{
    ScalarParser, VectorParseOptions, parse_reader, parse_scalar_str, parse_vector_str,
};
use crate::series::{ScalarTable, VectorSeriesSet};

const SCALAR_FILE: &str = r#"version 3
run General-0-20251103-14:05:09-4242
attr configname General
attr datetime 20251103-14:05:09
attr network BatSwarmNetwork
param **.numUAVs 3

scalar BatSwarmNetwork.uav[0].batAlgorithm finalFitness 12
scalar BatSwarmNetwork.uav[1].batAlgorithm finalFitness 8
scalar BatSwarmNetwork.uav[2].batAlgorithm finalFitness 20
scalar BatSwarmNetwork.uav[0].batAlgorithm obstaclesAvoided 3
scalar "BatSwarmNetwork.uav[1].batAlgorithm" "obstacles avoided" 1
module BatSwarmNetwork.uav[2].mobility
scalar distanceTravelled 1520.5
statistic BatSwarmNetwork.uav[2].batAlgorithm fitness:stats
field count 40
field mean 31.75
bin -inf 0
scalar BatSwarmNetwork.uav[0].batAlgorithm finalFitness not-a-number
scalar BatSwarmNetwork.uav[0].batAlgorithm
attr late ignored
"#;

const VECTOR_FILE: &str = "\
version 3
run General-0-20251103-14:05:09-4242
attr configname General
vector 0 BatSwarmNetwork.uav[0].batAlgorithm fitness:vector ETV
vector 1 BatSwarmNetwork.uav[1].batAlgorithm fitness:vector ETV
0 12 0.0 100
1 13 0.0 60
0 480 5.0 70
1 481 5.0 40
0 902 10.0 55
1 903 10.0 25
garbage line here
0 1000 nan 1
";

#[test]
fn test_scalar_file() {
    let parsed = parse_scalar_str(SCALAR_FILE);

    assert_eq!(parsed.metadata.version, Some(3));
    assert_eq!(
        parsed.metadata.run_id.as_deref(),
        Some("General-0-20251103-14:05:09-4242")
    );
    assert_eq!(parsed.metadata.config_name(), Some("General"));
    assert_eq!(parsed.metadata.attribute("late"), None);

    assert_eq!(parsed.records.len(), 8);
    assert_eq!(
        parsed.records[0],
        ScalarRecord {
            entity_path: "BatSwarmNetwork.uav[0].batAlgorithm".to_string(),
            metric_name: "finalFitness".to_string(),
            value: 12.0,
        }
    );
    assert_eq!(parsed.records[4].metric_name, "obstacles avoided");
    assert_eq!(
        parsed.records[5].entity_path,
        "BatSwarmNetwork.uav[2].mobility"
    );
    assert_eq!(parsed.records[7].metric_name, "fitness:stats.mean");

    assert_eq!(parsed.stats.skipped(SkipReason::InvalidNumber), 1);
    assert_eq!(parsed.stats.skipped(SkipReason::TokenCount), 1);
    assert_eq!(parsed.stats.total_skipped(), 2);

    let table = ScalarTable::build(parsed.records);
    assert_eq!(
        table.get("BatSwarmNetwork.uav[0].batAlgorithm", "finalFitness"),
        Some(12.0)
    );
}

#[test]
fn test_vector_file() {
    let parsed = parse_vector_str(VECTOR_FILE, VectorParseOptions::default());

    assert_eq!(parsed.stats.records, 8);
    assert_eq!(parsed.stats.skipped(SkipReason::UnrecognizedLine), 1);
    assert_eq!(parsed.stats.skipped(SkipReason::InvalidNumber), 1);

    let set = VectorSeriesSet::build(parsed.records);
    let first = set.get(VectorId(0)).unwrap();
    assert_eq!(first.times().collect::<Vec<_>>(), vec![0.0, 5.0, 10.0]);
    assert_eq!(first.values().collect::<Vec<_>>(), vec![100.0, 70.0, 55.0]);
}

#[test]
fn test_parsing_is_idempotent() {
    let options = VectorParseOptions::default();
    assert_eq!(parse_scalar_str(SCALAR_FILE), parse_scalar_str(SCALAR_FILE));
    assert_eq!(
        parse_vector_str(VECTOR_FILE, options),
        parse_vector_str(VECTOR_FILE, options)
    );
}

#[test]
fn test_reader_matches_str_and_handles_crlf() {
    let crlf = SCALAR_FILE.replace('\n', "\r\n");
    let from_reader = parse_reader(ScalarParser::new(), Cursor::new(crlf.into_bytes())).unwrap();
    assert_eq!(from_reader.records, parse_scalar_str(SCALAR_FILE).records);
}

#[test]
fn test_reader_survives_invalid_utf8() {
    let mut bytes = b"scalar Net.uav[0].batAlgorithm finalFitness 1\n".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
    bytes.extend_from_slice(b"scalar Net.uav[1].batAlgorithm finalFitness 2\n");

    let parsed = parse_reader(ScalarParser::new(), Cursor::new(bytes)).unwrap();
    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.stats.total_skipped(), 1);
}

#[test]
fn test_empty_input() {
    let parsed = parse_vector_str("", VectorParseOptions::default());
    assert!(parsed.records.is_empty());
    assert_eq!(parsed.stats.lines, 0);
    assert!(VectorSeriesSet::build(parsed.records).is_empty());
}

#[test]
fn test_declarations_come_before_their_samples() {
    let parsed = parse_vector_str(VECTOR_FILE, VectorParseOptions::default());
    let first_sample = parsed
        .records
        .iter()
        .position(|r| matches!(r, VectorRecord::Sample(_)))
        .unwrap();
    assert_eq!(first_sample, 2);
}
