//! Line-oriented parsers for scalar (`.sca`) and vector (`.vec`) result files
//!
//! Both parsers classify one line at a time and never abort: malformed lines
//! are skipped and counted in [`ParseStats`]. The whole-file helpers collect
//! the record stream together with the run header ([`RunMetadata`]).
//!
//! ```ignore
//! use batscope_core::parser::{parse_scalar_str, parse_vector_str, VectorParseOptions};
//!
//! let scalars = parse_scalar_str("scalar Net.uav[0].batAlgorithm finalFitness 12.5\n");
//! let vectors = parse_vector_str(vec_text, VectorParseOptions::default());
//! ```

mod scalar;
mod vector;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReadError, SkipReason};
use crate::model::{RunMetadata, ScalarRecord, VectorRecord};

pub use scalar::ScalarParser;
pub use vector::{VectorParseOptions, VectorParser};

/// Run header line shared by both file families
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderLine {
    Version(u32),
    Run(String),
    Attr { key: String, value: String },
}

/// Classification of a single input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome<R> {
    Record(R),
    Header(HeaderLine),
    /// Blank lines, comments, context lines and metadata we do not keep
    Ignored,
    Skipped(SkipReason),
}

/// A stateful parser fed one line at a time
pub trait LineParser {
    type Record;

    fn parse_line(&mut self, line: &str) -> LineOutcome<Self::Record>;
}

/// Per-file counters of what the parser did with each line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines: u64,
    pub records: u64,
    pub headers: u64,
    pub ignored: u64,
    pub skipped_token_count: u64,
    pub skipped_invalid_number: u64,
    pub skipped_missing_context: u64,
    pub skipped_invalid_columns: u64,
    pub skipped_unrecognized: u64,
}

impl ParseStats {
    pub fn record_skip(&mut self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::TokenCount => &mut self.skipped_token_count,
            SkipReason::InvalidNumber => &mut self.skipped_invalid_number,
            SkipReason::MissingContext => &mut self.skipped_missing_context,
            SkipReason::InvalidColumns => &mut self.skipped_invalid_columns,
            SkipReason::UnrecognizedLine => &mut self.skipped_unrecognized,
        };
        *counter += 1;
    }

    pub fn skipped(&self, reason: SkipReason) -> u64 {
        match reason {
            SkipReason::TokenCount => self.skipped_token_count,
            SkipReason::InvalidNumber => self.skipped_invalid_number,
            SkipReason::MissingContext => self.skipped_missing_context,
            SkipReason::InvalidColumns => self.skipped_invalid_columns,
            SkipReason::UnrecognizedLine => self.skipped_unrecognized,
        }
    }

    #[must_use]
    pub fn total_skipped(&self) -> u64 {
        self.skipped_token_count
            + self.skipped_invalid_number
            + self.skipped_missing_context
            + self.skipped_invalid_columns
            + self.skipped_unrecognized
    }
}

/// Records, header and counters of one parsed file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile<R> {
    pub metadata: RunMetadata,
    pub records: Vec<R>,
    pub stats: ParseStats,
}

pub type ParsedScalarFile = ParsedFile<ScalarRecord>;
pub type ParsedVectorFile = ParsedFile<VectorRecord>;

impl<R> Default for ParsedFile<R> {
    fn default() -> Self {
        Self {
            metadata: RunMetadata::default(),
            records: Vec::new(),
            stats: ParseStats::default(),
        }
    }
}

impl<R> ParsedFile<R> {
    fn feed<P>(&mut self, parser: &mut P, line: &str)
    where
        P: LineParser<Record = R>,
    {
        self.stats.lines += 1;
        match parser.parse_line(line) {
            LineOutcome::Record(record) => {
                self.stats.records += 1;
                self.records.push(record);
            }
            LineOutcome::Header(header) => {
                self.stats.headers += 1;
                self.apply_header(header);
            }
            LineOutcome::Ignored => self.stats.ignored += 1,
            LineOutcome::Skipped(reason) => {
                tracing::debug!("skipping line {} ({reason}): {line:?}", self.stats.lines);
                self.stats.record_skip(reason);
            }
        }
    }

    fn apply_header(&mut self, header: HeaderLine) {
        match header {
            HeaderLine::Version(v) => self.metadata.version = Some(v),
            HeaderLine::Run(id) => self.metadata.run_id = Some(id),
            HeaderLine::Attr { key, value } => {
                self.metadata.attributes.insert(key, value);
            }
        }
    }
}

/// Run `parser` over every line of `text`
pub fn parse_str<P: LineParser>(mut parser: P, text: &str) -> ParsedFile<P::Record> {
    let mut parsed = ParsedFile::default();
    for line in text.lines() {
        parsed.feed(&mut parser, line);
    }
    parsed
}

/// Run `parser` over every line of `reader`
///
/// Invalid UTF-8 is replaced rather than treated as an error, so a damaged
/// line is skipped like any other malformed line.
pub fn parse_reader<P: LineParser, B: BufRead>(
    mut parser: P,
    mut reader: B,
) -> io::Result<ParsedFile<P::Record>> {
    let mut parsed = ParsedFile::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        parsed.feed(&mut parser, line.trim_end_matches(['\n', '\r']));
    }
    Ok(parsed)
}

fn read_file<P: LineParser>(parser: P, path: &Path) -> Result<ParsedFile<P::Record>, ReadError> {
    let io_err = |source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let parsed = parse_reader(parser, BufReader::new(file)).map_err(io_err)?;
    tracing::debug!(
        "parsed {} ({} records, {} skipped)",
        path.display(),
        parsed.stats.records,
        parsed.stats.total_skipped()
    );
    Ok(parsed)
}

pub fn parse_scalar_str(text: &str) -> ParsedScalarFile {
    parse_str(ScalarParser::new(), text)
}

pub fn parse_vector_str(text: &str, options: VectorParseOptions) -> ParsedVectorFile {
    parse_str(VectorParser::new(options), text)
}

/// Read and parse a `.sca` file
pub fn read_scalar_file(path: &Path) -> Result<ParsedScalarFile, ReadError> {
    read_file(ScalarParser::new(), path)
}

/// Read and parse a `.vec` file
pub fn read_vector_file(
    path: &Path,
    options: VectorParseOptions,
) -> Result<ParsedVectorFile, ReadError> {
    read_file(VectorParser::new(options), path)
}

/// Split a line on whitespace, treating a double-quoted run as one token.
///
/// Quotes are stripped. An unterminated quote extends to the end of the line.
pub(crate) fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted.find('"').unwrap_or(quoted.len());
            tokens.push(&quoted[..end]);
            rest = quoted.get(end + 1..).unwrap_or("");
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            tokens.push(&rest[..end]);
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }

    tokens
}

/// Parse a finite floating-point field
pub(crate) fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

const SETTING_KEYWORDS: [&str; 3] = ["param", "itervar", "config"];

/// Classify run header lines.
///
/// Returns `None` when the keyword is not a header keyword. `attr` lines that
/// follow a result line describe that result, not the run, and are ignored.
pub(crate) fn classify_header<R>(tokens: &[&str], in_results: bool) -> Option<LineOutcome<R>> {
    let outcome = match tokens {
        ["version", version] => match version.parse() {
            Ok(v) => LineOutcome::Header(HeaderLine::Version(v)),
            Err(_) => LineOutcome::Skipped(SkipReason::InvalidNumber),
        },
        ["run", id] => LineOutcome::Header(HeaderLine::Run((*id).to_string())),
        ["attr", ..] if in_results => LineOutcome::Ignored,
        ["attr", key, value @ ..] if !value.is_empty() => LineOutcome::Header(HeaderLine::Attr {
            key: (*key).to_string(),
            value: value.join(" "),
        }),
        ["version" | "run" | "attr", ..] => LineOutcome::Skipped(SkipReason::TokenCount),
        [keyword, ..] if SETTING_KEYWORDS.contains(keyword) => LineOutcome::Ignored,
        _ => return None,
    };
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain() {
        assert_eq!(
            tokenize("  scalar Net.uav[0]  finalFitness\t12.5 "),
            vec!["scalar", "Net.uav[0]", "finalFitness", "12.5"]
        );
    }

    #[test]
    fn test_tokenize_quoted() {
        assert_eq!(
            tokenize(r#"scalar Net.host "packets sent" 10"#),
            vec!["scalar", "Net.host", "packets sent", "10"]
        );
        assert_eq!(tokenize(r#"attr note "open"#), vec!["attr", "note", "open"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite("1.5e2"), Some(150.0));
        assert_eq!(parse_finite("-0"), Some(0.0));
        assert_eq!(parse_finite("nan"), None);
        assert_eq!(parse_finite("inf"), None);
        assert_eq!(parse_finite("12m"), None);
    }

    #[test]
    fn test_classify_header() {
        let header = classify_header::<()>(&["attr", "configname", "General"], false);
        assert_eq!(
            header,
            Some(LineOutcome::Header(HeaderLine::Attr {
                key: "configname".to_string(),
                value: "General".to_string(),
            }))
        );
        assert_eq!(
            classify_header::<()>(&["attr", "unit", "m"], true),
            Some(LineOutcome::Ignored)
        );
        assert_eq!(
            classify_header::<()>(&["version", "two"], false),
            Some(LineOutcome::Skipped(SkipReason::InvalidNumber))
        );
        assert_eq!(
            classify_header::<()>(&["run"], false),
            Some(LineOutcome::Skipped(SkipReason::TokenCount))
        );
        assert_eq!(
            classify_header::<()>(&["param", "**.speed", "5mps"], false),
            Some(LineOutcome::Ignored)
        );
        assert_eq!(classify_header::<()>(&["scalar", "a", "b", "1"], false), None);
    }

    #[test]
    fn test_parse_stats_skip_counters() {
        let mut stats = ParseStats::default();
        stats.record_skip(SkipReason::TokenCount);
        stats.record_skip(SkipReason::TokenCount);
        stats.record_skip(SkipReason::InvalidNumber);

        assert_eq!(stats.skipped(SkipReason::TokenCount), 2);
        assert_eq!(stats.skipped(SkipReason::InvalidNumber), 1);
        assert_eq!(stats.skipped(SkipReason::MissingContext), 0);
        assert_eq!(stats.total_skipped(), 3);
    }

    #[test]
    fn test_parse_reader_handles_crlf_and_bad_utf8() {
        let mut bytes = b"scalar Net.uav[0] finalFitness 1.5\r\n".to_vec();
        bytes.extend_from_slice(b"scalar Net.uav[1] final\xffFitness 2.5\n");
        bytes.extend_from_slice(b"scalar Net.uav[2] finalFitness 3.5");

        let parsed = parse_reader(ScalarParser::new(), &bytes[..]).unwrap();

        assert_eq!(parsed.stats.lines, 3);
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed.records[0].value, 1.5);
        assert_eq!(parsed.records[2].value, 3.5);
    }
}
